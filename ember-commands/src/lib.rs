pub mod developer;
pub mod moderation;
pub mod utility;

use ember_core::{Data, Error};

/// Every command compiled into the bot.
///
/// Only those with a loaded descriptor are published and admitted.
pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::ping::ping(),
        moderation::kick::kick(),
        developer::reload::reload(),
    ]
}

#[cfg(test)]
mod tests {
    use super::commands;

    #[test]
    fn command_names_are_unique_slash_commands() {
        let commands = commands();
        let mut names: Vec<&str> = commands.iter().map(|command| command.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();

        assert_eq!(names, ["kick", "ping", "reload"]);
        assert!(commands.iter().all(|command| command.slash_action.is_some()));
    }
}
