use ember_core::{Context, Error};

/// Check that the bot is responding.
#[poise::command(slash_command, category = "Utility")]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content("pong!")
            .ephemeral(true),
    )
    .await?;
    Ok(())
}
