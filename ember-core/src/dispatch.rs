//! Routing of incoming gateway and HTTP events into the listener emitters.

use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;

use crate::{BotListeners, EventArgs};

/// Name rate-limit notices are emitted under on the REST emitter.
pub const RATELIMIT_EVENT: &str = "ratelimit";

/// Emit a gateway event on the client emitter under its snake_case name.
pub async fn dispatch_gateway_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    listeners: &BotListeners,
) -> usize {
    let name = event.snake_case_name();
    if listeners.client.listener_count(name) == 0 {
        return 0;
    }

    let args = EventArgs::Gateway {
        ctx: ctx.clone(),
        event: Arc::new(event.clone()),
    };
    listeners.client.emit(name, args).await
}

/// Serenity event handler that forwards HTTP rate-limit notices to the REST emitter.
pub struct RestBridge {
    listeners: Arc<BotListeners>,
}

impl RestBridge {
    pub fn new(listeners: Arc<BotListeners>) -> Self {
        Self { listeners }
    }
}

#[async_trait]
impl serenity::EventHandler for RestBridge {
    async fn ratelimit(&self, data: ::serenity::http::RatelimitInfo) {
        self.listeners
            .rest
            .emit(RATELIMIT_EVENT, EventArgs::Rest(Arc::new(data)))
            .await;
    }
}
