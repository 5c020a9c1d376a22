//! Serenity-backed implementations of the loader's publisher and catalog.

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use tracing::warn;

use ember_loader::{CommandCatalog, CommandPublisher, CommandSpec};

use crate::{Data, Error};

/// Resolves descriptor names against the poise commands compiled into the bot.
pub struct PoiseCatalog<'a>(pub &'a [poise::Command<Data, Error>]);

impl<'a> PoiseCatalog<'a> {
    fn find(&self, name: &str) -> Option<&'a poise::Command<Data, Error>> {
        self.0.iter().find(|command| command.name == name)
    }
}

impl CommandCatalog for PoiseCatalog<'_> {
    fn has_command(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    fn has_sub_command(&self, tag: &str) -> bool {
        let mut parts = tag.split('.');
        let Some(mut current) = parts.next().and_then(|root| self.find(root)) else {
            return false;
        };

        let mut depth = 0;
        for part in parts {
            match current
                .subcommands
                .iter()
                .find(|command| command.name == part)
            {
                Some(next) => {
                    current = next;
                    depth += 1;
                }
                None => return false,
            }
        }

        depth > 0
    }
}

pub struct DiscordPublisher<'a> {
    http: &'a serenity::Http,
    guild_id: serenity::GuildId,
    commands: &'a [poise::Command<Data, Error>],
}

impl<'a> DiscordPublisher<'a> {
    pub fn new(
        http: &'a serenity::Http,
        guild_id: serenity::GuildId,
        commands: &'a [poise::Command<Data, Error>],
    ) -> Self {
        Self {
            http,
            guild_id,
            commands,
        }
    }

    fn build(&self, batch: &[CommandSpec]) -> Vec<serenity::CreateCommand> {
        batch
            .iter()
            .filter_map(|spec| {
                let Some(command) = PoiseCatalog(self.commands).find(&spec.name) else {
                    warn!(command = %spec.name, "descriptor has no compiled command; not published");
                    return None;
                };
                let Some(mut create) = command.create_as_slash_command() else {
                    warn!(command = %spec.name, "command is not a slash command; not published");
                    return None;
                };

                if let Some(description) = &spec.description {
                    create = create.description(description.clone());
                }
                Some(create)
            })
            .collect()
    }
}

#[async_trait]
impl CommandPublisher for DiscordPublisher<'_> {
    type Guild = serenity::PartialGuild;

    async fn resolve_dev_guild(&self) -> anyhow::Result<serenity::PartialGuild> {
        Ok(self.guild_id.to_partial_guild(self.http).await?)
    }

    async fn publish_global(&self, batch: &[CommandSpec]) -> anyhow::Result<usize> {
        let published =
            serenity::Command::set_global_commands(self.http, self.build(batch)).await?;
        Ok(published.len())
    }

    async fn publish_guild(
        &self,
        guild: &serenity::PartialGuild,
        batch: &[CommandSpec],
    ) -> anyhow::Result<usize> {
        let published = guild.id.set_commands(self.http, self.build(batch)).await?;
        Ok(published.len())
    }
}

#[cfg(test)]
mod tests {
    use ember_loader::CommandCatalog;

    use super::PoiseCatalog;
    use crate::{Data, Error};

    fn command(
        name: &str,
        subcommands: Vec<poise::Command<Data, Error>>,
    ) -> poise::Command<Data, Error> {
        poise::Command {
            name: name.to_owned(),
            subcommands,
            ..Default::default()
        }
    }

    #[test]
    fn found_commands_outlive_the_catalog_wrapper() {
        let commands = vec![command("ping", Vec::new())];
        let found = PoiseCatalog(&commands).find("ping");

        assert_eq!(found.map(|command| command.name.as_str()), Some("ping"));
        assert!(PoiseCatalog(&commands).find("kick").is_none());
    }

    #[test]
    fn resolves_commands_and_nested_sub_commands() {
        let commands = vec![
            command("ping", Vec::new()),
            command(
                "mod",
                vec![
                    command("ban", Vec::new()),
                    command("note", vec![command("add", Vec::new())]),
                ],
            ),
        ];
        let catalog = PoiseCatalog(&commands);

        assert!(catalog.has_command("ping"));
        assert!(catalog.has_command("mod"));
        assert!(!catalog.has_command("ban"));

        assert!(catalog.has_sub_command("mod.ban"));
        assert!(catalog.has_sub_command("mod.note.add"));
        assert!(!catalog.has_sub_command("mod"));
        assert!(!catalog.has_sub_command("mod.kick"));
        assert!(!catalog.has_sub_command("nope.ban"));
    }
}
