use tracing::info;

use ember_core::{Context, Error, lifecycle};

/// Reload command and event descriptors from disk.
#[poise::command(slash_command, category = "Developer")]
pub async fn reload(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;
    info!(user = %ctx.author().id, "reload requested");

    let summary = lifecycle::reload(
        ctx.serenity_context(),
        ctx.data(),
        &ctx.framework().options().commands,
    )
    .await;

    ctx.send(
        poise::CreateReply::default()
            .content(format!("```\n{}\n```", summary.describe()))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}
