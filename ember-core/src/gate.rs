//! Admission of incoming invocations against the loaded command registry.

use tracing::{debug, warn};

use ember_loader::CommandRegistry;

use crate::{Context, Error};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    NotLoaded,
    OwnerOnly,
}

/// Owners can always run this, so a failed command load can be retried.
pub const RELOAD_COMMAND: &str = "reload";

/// Decide whether `qualified_name` (poise form, e.g. `mod ban`) may run.
///
/// The root command must be loaded; a sub-command additionally needs its
/// `parent.child` tag loaded. [`RELOAD_COMMAND`] is admitted for owners even
/// when it is not loaded.
pub fn admit(registry: &CommandRegistry, qualified_name: &str, is_owner: bool) -> Admission {
    let parts: Vec<&str> = qualified_name.split_whitespace().collect();
    let Some((root, rest)) = parts.split_first() else {
        return Admission::NotLoaded;
    };

    let Some(spec) = registry.command(root) else {
        if *root == RELOAD_COMMAND && rest.is_empty() && is_owner {
            return Admission::Allowed;
        }
        return Admission::NotLoaded;
    };

    if spec.developer && !is_owner {
        return Admission::OwnerOnly;
    }

    if !rest.is_empty() && !registry.contains_sub_command(&parts.join(".")) {
        return Admission::NotLoaded;
    }

    Admission::Allowed
}

pub async fn command_check(ctx: Context<'_>) -> Result<bool, Error> {
    let is_owner = ctx
        .framework()
        .options()
        .owners
        .contains(&ctx.author().id);
    let qualified_name = &ctx.command().qualified_name;

    let admission = {
        let registry = ctx.data().commands.read().await;
        admit(&registry, qualified_name, is_owner)
    };

    match admission {
        Admission::Allowed => Ok(true),
        Admission::NotLoaded => {
            debug!(command = %qualified_name, "rejected invocation of an unloaded command");
            Ok(false)
        }
        Admission::OwnerOnly => {
            debug!(
                command = %qualified_name,
                user_id = %ctx.author().id,
                "rejected developer command"
            );
            Ok(false)
        }
    }
}

/// Whether the descriptor behind `qualified_name` asks for an initial reply.
pub fn wants_initial_reply(registry: &CommandRegistry, qualified_name: &str) -> bool {
    qualified_name
        .split_whitespace()
        .next()
        .and_then(|root| registry.command(root))
        .is_some_and(|spec| spec.initial_reply)
}

/// Defer commands whose descriptor asks for an initial reply.
///
/// The deferral is ephemeral, so refusals sent afterwards stay private.
pub async fn pre_command(ctx: Context<'_>) {
    let qualified_name = &ctx.command().qualified_name;
    let initial_reply = {
        let registry = ctx.data().commands.read().await;
        wants_initial_reply(&registry, qualified_name)
    };

    if initial_reply {
        if let Err(source) = ctx.defer_ephemeral().await {
            warn!(?source, command = %qualified_name, "failed to defer interaction");
        }
    }
}
