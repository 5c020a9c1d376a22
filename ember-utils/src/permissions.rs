use std::collections::HashMap;

use poise::serenity_prelude as serenity;

/// Resolve a member's effective guild permissions from their roles.
///
/// The guild owner resolves to every permission.
pub async fn resolve_user_permissions(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> anyhow::Result<serenity::Permissions> {
    let guild = guild_id.to_partial_guild(http).await?;
    if guild.owner_id == user_id {
        return Ok(serenity::Permissions::all());
    }

    let member = guild_id.member(http, user_id).await?;
    let roles = guild_id.roles(http).await?;

    let mut resolved = serenity::Permissions::empty();
    let everyone_role_id = serenity::RoleId::new(guild_id.get());

    for role in roles.values() {
        if role.id == everyone_role_id || member.roles.contains(&role.id) {
            resolved |= role.permissions;
        }
    }

    Ok(resolved)
}

pub async fn has_user_permission(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    required: serenity::Permissions,
) -> anyhow::Result<bool> {
    let perms = resolve_user_permissions(http, guild_id, user_id).await?;

    Ok(perms.contains(serenity::Permissions::ADMINISTRATOR) || perms.contains(required))
}

/// Position of the highest role a member holds, `0` when they only have `@everyone`.
pub fn highest_role_position(
    member_roles: &[serenity::RoleId],
    positions: &HashMap<serenity::RoleId, u16>,
) -> u16 {
    member_roles
        .iter()
        .filter_map(|role_id| positions.get(role_id).copied())
        .max()
        .unwrap_or(0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HierarchyVerdict {
    Allowed,
    ActorTooLow,
    BotTooLow,
}

/// Decide whether a moderator (and the bot) sit above the target.
///
/// The guild owner bypasses the moderator check; the bot never does.
pub fn check_hierarchy(
    actor_is_owner: bool,
    actor_position: u16,
    bot_position: u16,
    target_position: u16,
) -> HierarchyVerdict {
    if !actor_is_owner && target_position >= actor_position {
        return HierarchyVerdict::ActorTooLow;
    }

    if target_position >= bot_position {
        return HierarchyVerdict::BotTooLow;
    }

    HierarchyVerdict::Allowed
}

/// Fetch roles for the moderator, the bot and the target and compare them.
pub async fn moderation_hierarchy(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    actor_id: serenity::UserId,
    bot_id: serenity::UserId,
    target_id: serenity::UserId,
) -> anyhow::Result<HierarchyVerdict> {
    let guild = guild_id.to_partial_guild(http).await?;
    let positions: HashMap<serenity::RoleId, u16> = guild_id
        .roles(http)
        .await?
        .into_iter()
        .map(|(role_id, role)| (role_id, role.position))
        .collect();

    let actor = guild_id.member(http, actor_id).await?;
    let bot = guild_id.member(http, bot_id).await?;
    let target = guild_id.member(http, target_id).await?;

    Ok(check_hierarchy(
        guild.owner_id == actor_id,
        highest_role_position(&actor.roles, &positions),
        highest_role_position(&bot.roles, &positions),
        highest_role_position(&target.roles, &positions),
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use poise::serenity_prelude as serenity;

    use super::{HierarchyVerdict, check_hierarchy, highest_role_position};

    #[test]
    fn highest_position_ignores_unknown_roles() {
        let positions = HashMap::from([
            (serenity::RoleId::new(10), 3_u16),
            (serenity::RoleId::new(11), 7_u16),
        ]);

        let roles = [
            serenity::RoleId::new(10),
            serenity::RoleId::new(11),
            serenity::RoleId::new(99),
        ];
        assert_eq!(highest_role_position(&roles, &positions), 7);
        assert_eq!(highest_role_position(&[], &positions), 0);
    }

    #[test]
    fn moderator_must_outrank_target() {
        assert_eq!(check_hierarchy(false, 5, 10, 5), HierarchyVerdict::ActorTooLow);
        assert_eq!(check_hierarchy(false, 6, 10, 5), HierarchyVerdict::Allowed);
    }

    #[test]
    fn owner_bypasses_moderator_check_but_not_bot_check() {
        assert_eq!(check_hierarchy(true, 0, 10, 5), HierarchyVerdict::Allowed);
        assert_eq!(check_hierarchy(true, 0, 5, 5), HierarchyVerdict::BotTooLow);
    }

    #[test]
    fn bot_must_outrank_target() {
        assert_eq!(check_hierarchy(false, 9, 4, 4), HierarchyVerdict::BotTooLow);
    }
}
