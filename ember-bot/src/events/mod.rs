mod interaction_create;
mod ratelimit;
mod ready;

use ember_core::BotEventCallbacks;

/// Callbacks that event descriptors can name as their `handler`.
pub fn callbacks() -> BotEventCallbacks {
    let mut callbacks = BotEventCallbacks::new();
    callbacks
        .register("ready", ready::on_ready)
        .register("interaction_create", interaction_create::on_interaction_create)
        .register("ratelimit", ratelimit::on_ratelimit);
    callbacks
}
