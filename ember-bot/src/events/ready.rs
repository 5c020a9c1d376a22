use poise::serenity_prelude as serenity;
use tracing::info;

use ember_core::{BotHandle, EventArgs};

pub async fn on_ready(args: EventArgs, bot: BotHandle) -> anyhow::Result<()> {
    let EventArgs::Gateway { event, .. } = args else {
        return Ok(());
    };
    let serenity::FullEvent::Ready { data_about_bot } = event.as_ref() else {
        return Ok(());
    };

    let loaded = bot.commands.read().await.command_count();
    info!(
        user = %data_about_bot.user.name,
        guilds = data_about_bot.guilds.len(),
        commands = loaded,
        "Ember has awoken!"
    );
    Ok(())
}
