pub mod config;
pub mod dispatch;
pub mod gate;
pub mod lifecycle;
pub mod publish;

use std::fmt;
use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tokio::sync::{Mutex, MutexGuard, RwLock};

use ember_loader::{CommandRegistry, EventCallbacks, EventRegistry, Listeners};

pub use config::Config;

pub type Error = anyhow::Error;

pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Arguments handed to event listeners.
#[derive(Clone)]
pub enum EventArgs {
    /// A gateway event and the context it arrived with.
    Gateway {
        ctx: serenity::Context,
        event: Arc<serenity::FullEvent>,
    },
    /// A rate-limit notice from the HTTP transport.
    Rest(Arc<::serenity::http::RatelimitInfo>),
}

pub type BotListeners = Listeners<EventArgs>;
pub type BotEventCallbacks = EventCallbacks<EventArgs, BotHandle>;

/// The client reference appended to every event callback.
#[derive(Clone)]
pub struct BotHandle {
    pub http: Arc<serenity::Http>,
    pub cache: Arc<serenity::Cache>,
    pub config: Arc<Config>,
    pub commands: Arc<RwLock<CommandRegistry>>,
}

impl BotHandle {
    pub fn new(ctx: &serenity::Context, data: &Data) -> Self {
        Self {
            http: ctx.http.clone(),
            cache: ctx.cache.clone(),
            config: data.config.clone(),
            commands: data.commands.clone(),
        }
    }
}

#[derive(Clone)]
pub struct Data {
    pub config: Arc<Config>,
    pub commands: Arc<RwLock<CommandRegistry>>,
    pub events: Arc<RwLock<EventRegistry<EventArgs>>>,
    pub listeners: Arc<BotListeners>,
    pub callbacks: Arc<BotEventCallbacks>,
    load_lock: Arc<Mutex<()>>,
}

impl Data {
    pub fn new(
        config: Arc<Config>,
        listeners: Arc<BotListeners>,
        callbacks: BotEventCallbacks,
    ) -> Self {
        Self {
            config,
            commands: Default::default(),
            events: Default::default(),
            listeners,
            callbacks: Arc::new(callbacks),
            load_lock: Default::default(),
        }
    }

    /// Held for the whole of a load pass so passes never interleave.
    pub async fn begin_load(&self) -> MutexGuard<'_, ()> {
        self.load_lock.lock().await
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
