use tracing::{error, warn};

use poise::serenity_prelude as serenity;

use ember_core::{Context, Error};
use ember_utils::embed::{moderation_action_embed, moderation_dm_embed};
use ember_utils::permissions::{HierarchyVerdict, has_user_permission, moderation_hierarchy};

const DEFAULT_REASON: &str = "No reason provided";

async fn reply(ctx: Context<'_>, content: &str) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(content)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Kick a member from the server.
#[poise::command(slash_command, guild_only, category = "Moderation")]
pub async fn kick(
    ctx: Context<'_>,
    #[description = "The member to kick"] user: serenity::User,
    #[description = "Reason for the kick"] reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return reply(ctx, "This command can only be used in a server.").await;
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::KICK_MEMBERS,
    )
    .await?
    {
        return reply(ctx, "You need the Kick Members permission to do that.").await;
    }

    if user.id == ctx.author().id {
        return reply(ctx, "You can't kick yourself.").await;
    }

    let bot_id = ctx.framework().bot_id;
    if user.id == bot_id {
        return reply(ctx, "I can't kick myself.").await;
    }

    match moderation_hierarchy(ctx.http(), guild_id, ctx.author().id, bot_id, user.id).await? {
        HierarchyVerdict::Allowed => {}
        HierarchyVerdict::ActorTooLow => {
            return reply(ctx, "That member's highest role is not below yours.").await;
        }
        HierarchyVerdict::BotTooLow => {
            return reply(ctx, "That member's highest role is not below mine.").await;
        }
    }

    let guild_name = guild_id
        .name(ctx.cache())
        .unwrap_or_else(|| "the server".to_owned());
    let dm = serenity::CreateMessage::new().embed(moderation_dm_embed(
        &guild_name,
        "kicked",
        reason.as_deref(),
    ));
    if let Err(source) = user.direct_message(ctx, dm).await {
        warn!(?source, user = %user.id, "could not notify kicked member");
    }

    let kick_result = guild_id
        .kick_with_reason(ctx.http(), user.id, reason.as_deref().unwrap_or(DEFAULT_REASON))
        .await;

    if let Err(source) = kick_result {
        error!(?source, "kick request failed");
        return reply(
            ctx,
            "I couldn't kick that user. Check role hierarchy and permissions.",
        )
        .await;
    }

    // The interaction reply is ephemeral once deferred; the action embed goes
    // to the channel instead.
    let embed = moderation_action_embed(&user, "kicked", reason.as_deref());
    ctx.channel_id()
        .send_message(ctx, serenity::CreateMessage::new().embed(embed))
        .await?;

    reply(ctx, &format!("Kicked {}.", user.name)).await
}
