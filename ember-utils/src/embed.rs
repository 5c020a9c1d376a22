use poise::serenity_prelude as serenity;

use crate::formatting::sanitize_mentions;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0xE0_6C_2C;

pub fn error_embed(title: &str, description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title.to_owned())
        .description(description)
        .color(DEFAULT_EMBED_COLOR)
}

pub fn moderation_action_embed(
    target: &serenity::User,
    action_past_tense: &str,
    reason: Option<&str>,
) -> serenity::CreateEmbed {
    let reason = sanitize_mentions(reason.unwrap_or("No reason provided"));
    let display_name = target.global_name.clone().unwrap_or_else(|| target.name.clone());

    serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .author(
            serenity::CreateEmbedAuthor::new(format!(
                "{} has been {}",
                display_name, action_past_tense
            ))
            .icon_url(target.face()),
        )
        .description(format!(
            "**Target :** <@{}>\n**Reason :** {}",
            target.id.get(),
            reason
        ))
}

pub fn moderation_dm_embed(
    guild_name: &str,
    action_past_tense: &str,
    reason: Option<&str>,
) -> serenity::CreateEmbed {
    let description = match reason {
        Some(reason) => format!("**Reason :** {}", sanitize_mentions(reason)),
        None => "No additional details were provided.".to_owned(),
    };

    serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .title(format!(
            "You have been {} from {}",
            action_past_tense, guild_name
        ))
        .description(description)
}
