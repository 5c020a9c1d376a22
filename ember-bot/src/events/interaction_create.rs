use poise::serenity_prelude as serenity;
use tracing::{debug, warn};

use ember_core::{BotHandle, EventArgs};

pub async fn on_interaction_create(args: EventArgs, bot: BotHandle) -> anyhow::Result<()> {
    let EventArgs::Gateway { event, .. } = args else {
        return Ok(());
    };
    let serenity::FullEvent::InteractionCreate { interaction } = event.as_ref() else {
        return Ok(());
    };
    let serenity::Interaction::Command(command) = interaction else {
        return Ok(());
    };

    debug!(
        command = %command.data.name,
        user = %command.user.id,
        guild = ?command.guild_id,
        "command interaction received"
    );

    if !bot.commands.read().await.contains_command(&command.data.name) {
        warn!(command = %command.data.name, "interaction for a command with no loaded descriptor");
    }
    Ok(())
}
