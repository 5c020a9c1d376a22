//! Load passes over the descriptor directories, at startup and on `/reload`.

use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use ember_loader::{BatchOutcome, CommandLoad, LoadReport};
use ember_utils::formatting::pluralize;

use crate::publish::{DiscordPublisher, PoiseCatalog};
use crate::{BotHandle, Data, Error};

pub struct ReloadSummary {
    pub events: LoadReport,
    pub commands: anyhow::Result<CommandLoad>,
}

impl ReloadSummary {
    /// Short multi-line description suitable for a chat reply.
    pub fn describe(&self) -> String {
        let mut lines = vec![format!(
            "Events: {} loaded, {} rejected",
            self.events.ok_count(),
            self.events.bad_count()
        )];

        match &self.commands {
            Ok(load) => {
                lines.push(format!(
                    "Commands: {} loaded, {} rejected",
                    load.report.ok_count(),
                    load.report.bad_count()
                ));
                lines.push(format!("Global: {}", describe_outcome(&load.global.outcome)));
                lines.push(format!("Guild: {}", describe_outcome(&load.guild.outcome)));
            }
            Err(source) => lines.push(format!("Commands: skipped ({source})")),
        }

        lines.join("\n")
    }
}

fn describe_outcome(outcome: &BatchOutcome) -> String {
    match outcome {
        BatchOutcome::Published(count) => format!("published {}", pluralize(*count, "command")),
        BatchOutcome::Failed(reason) => format!("failed ({reason})"),
    }
}

/// Rebuild the command registry and publish both batches.
pub async fn load_commands(
    ctx: &serenity::Context,
    data: &Data,
    commands: &[poise::Command<Data, Error>],
) -> anyhow::Result<CommandLoad> {
    let publisher = DiscordPublisher::new(&ctx.http, data.config.dev_guild_id, commands);
    let mut registry = data.commands.write().await;

    let load = ember_loader::load_commands(
        &data.config.commands_dir,
        &mut *registry,
        &PoiseCatalog(commands),
        &publisher,
    )
    .await?;

    println!("{}", load.report.render(&data.config.cli));
    info!(
        loaded = load.report.ok_count(),
        rejected = load.report.bad_count(),
        global = load.global.names.len(),
        guild = load.guild.names.len(),
        "command load finished"
    );

    Ok(load)
}

/// Rebuild the event registry and reattach every listener.
pub async fn load_events(ctx: &serenity::Context, data: &Data) -> LoadReport {
    let client = BotHandle::new(ctx, data);
    let mut registry = data.events.write().await;

    let report = ember_loader::load_events(
        &data.config.events_dir,
        &mut *registry,
        data.callbacks.as_ref(),
        &client,
        data.listeners.targets(),
    )
    .await;

    println!("{}", report.render(&data.config.cli));
    info!(
        loaded = report.ok_count(),
        rejected = report.bad_count(),
        "event load finished"
    );

    report
}

/// Run both loaders as one pass.
pub async fn reload(
    ctx: &serenity::Context,
    data: &Data,
    commands: &[poise::Command<Data, Error>],
) -> ReloadSummary {
    let _pass = data.begin_load().await;

    let events = load_events(ctx, data).await;
    let commands = load_commands(ctx, data, commands).await;
    if let Err(source) = &commands {
        warn!(?source, "command load skipped");
    }

    ReloadSummary { events, commands }
}
