//! Named-event emitters that listeners attach to.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::error;

use crate::descriptor::Transport;

pub use futures::future::BoxFuture;

/// A callback attached to an emitter. It receives the emitted arguments only.
pub type Listener<A> = Arc<dyn Fn(A) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Something listeners can be attached to, either persistently or for one shot.
pub trait EventSource<A>: Send + Sync {
    fn on(&self, event: &str, listener: Listener<A>);
    fn once(&self, event: &str, listener: Listener<A>);
    fn clear(&self);
}

struct Subscription<A> {
    listener: Listener<A>,
    once: bool,
}

pub struct Emitter<A> {
    label: &'static str,
    subscriptions: Mutex<HashMap<String, Vec<Subscription<A>>>>,
}

impl<A> Emitter<A> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            subscriptions: Mutex::new(HashMap::new()),
        }
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.lock().get(event).map_or(0, Vec::len)
    }

    fn subscribe(&self, event: &str, listener: Listener<A>, once: bool) {
        self.lock()
            .entry(event.to_owned())
            .or_default()
            .push(Subscription { listener, once });
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Subscription<A>>>> {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A> Emitter<A>
where
    A: Clone + Send + 'static,
{
    /// Invoke every listener for `event` in attachment order and return how many ran.
    ///
    /// One-shot listeners are detached before they run. A failing listener is
    /// logged and does not stop the rest.
    pub async fn emit(&self, event: &str, args: A) -> usize {
        let fired: Vec<Listener<A>> = {
            let mut subscriptions = self.lock();
            let Some(entries) = subscriptions.get_mut(event) else {
                return 0;
            };

            let fired: Vec<Listener<A>> =
                entries.iter().map(|sub| sub.listener.clone()).collect();
            entries.retain(|sub| !sub.once);
            if entries.is_empty() {
                subscriptions.remove(event);
            }
            fired
        };

        for listener in &fired {
            if let Err(source) = listener(args.clone()).await {
                error!(?source, emitter = self.label, event, "event listener failed");
            }
        }

        fired.len()
    }
}

impl<A> EventSource<A> for Emitter<A> {
    fn on(&self, event: &str, listener: Listener<A>) {
        self.subscribe(event, listener, false);
    }

    fn once(&self, event: &str, listener: Listener<A>) {
        self.subscribe(event, listener, true);
    }

    fn clear(&self) {
        self.lock().clear();
    }
}

/// The two emitters the bot exposes: the gateway client and the REST transport.
pub struct Listeners<A> {
    pub client: Emitter<A>,
    pub rest: Emitter<A>,
}

impl<A> Listeners<A> {
    pub fn new() -> Self {
        Self {
            client: Emitter::new("client"),
            rest: Emitter::new("rest"),
        }
    }

    pub fn targets(&self) -> ListenerTargets<'_, A> {
        ListenerTargets {
            client: &self.client,
            rest: &self.rest,
        }
    }
}

impl<A> Default for Listeners<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowed attachment points handed to the event loader.
pub struct ListenerTargets<'a, A> {
    pub client: &'a dyn EventSource<A>,
    pub rest: &'a dyn EventSource<A>,
}

impl<'a, A> ListenerTargets<'a, A> {
    pub fn get(&self, transport: Transport) -> &'a dyn EventSource<A> {
        match transport {
            Transport::Client => self.client,
            Transport::Rest => self.rest,
        }
    }
}
