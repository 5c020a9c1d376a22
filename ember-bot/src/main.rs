mod events;

use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;

use ember_core::dispatch::{RestBridge, dispatch_gateway_event};
use ember_core::{BotListeners, Config, Data, Error, gate, lifecycle};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    dotenvy::dotenv().ok();

    let config = Arc::new(Config::from_env()?);
    info!(
        dev_guild_id = %config.dev_guild_id,
        owners = config.owners.len(),
        commands_dir = %config.commands_dir.display(),
        events_dir = %config.events_dir.display(),
        "configuration loaded"
    );

    let listeners = Arc::new(BotListeners::new());
    let intents = serenity::GatewayIntents::GUILDS;

    let setup_config = config.clone();
    let setup_listeners = listeners.clone();
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: ember_commands::commands(),
            command_check: Some(|ctx| Box::pin(gate::command_check(ctx))),
            pre_command: |ctx| Box::pin(gate::pre_command(ctx)),
            event_handler: |ctx, event, _framework, data| {
                Box::pin(async move {
                    dispatch_gateway_event(ctx, event, &data.listeners).await;
                    Ok(())
                })
            },
            on_error: |error| Box::pin(on_error(error)),
            owners: config.owners.clone(),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            let config = setup_config.clone();
            let listeners = setup_listeners.clone();
            Box::pin(async move {
                info!("Ember is loading descriptors...");

                let data = Data::new(config, listeners, events::callbacks());
                lifecycle::reload(ctx, &data, &framework.options().commands).await;

                Ok(data)
            })
        })
        .build();

    info!("Ember is connecting...");

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .event_handler(RestBridge::new(listeners))
        .await?;

    client.start().await?;
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(?error, command = %ctx.command().qualified_name, "command error");

            let embed = ember_utils::embed::error_embed(
                "Command Error",
                "Something went wrong while running this command.",
            );

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::CommandCheckFailed { error, ctx, .. } => {
            if let Some(error) = error {
                error!(?error, "command check errored");
            }

            let embed = ember_utils::embed::error_embed(
                "Unavailable",
                "This command is not available right now.",
            );

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::UnknownInteraction { interaction, .. } => {
            debug!(command = %interaction.data.name, "unknown interaction");
        }
        other => {
            error!(?other, "framework error");
        }
    }
}
