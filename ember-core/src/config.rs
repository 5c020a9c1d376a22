use std::collections::HashSet;
use std::env;
use std::fmt;
use std::path::PathBuf;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;

use ember_loader::StatusGlyphs;
use ember_utils::parse::parse_id_list;

pub const DEFAULT_COMMANDS_DIR: &str = "commands";
pub const DEFAULT_EVENTS_DIR: &str = "events";

#[derive(Clone)]
pub struct Config {
    pub token: String,
    /// Guild that receives the non-global command batch.
    pub dev_guild_id: serenity::GuildId,
    pub owners: HashSet<serenity::UserId>,
    pub commands_dir: PathBuf,
    pub events_dir: PathBuf,
    pub cli: StatusGlyphs,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let token = lookup("DISCORD_TOKEN")
            .filter(|value| !value.trim().is_empty())
            .context("DISCORD_TOKEN is not set")?;

        let guild_raw = lookup("DISCORD_GUILD_ID").context("DISCORD_GUILD_ID is not set")?;
        let guild_id = guild_raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("DISCORD_GUILD_ID `{guild_raw}` is not a valid id"))?;
        if guild_id == 0 {
            anyhow::bail!("DISCORD_GUILD_ID must not be 0");
        }

        let owners = match lookup("OWNER_IDS") {
            Some(raw) => parse_id_list(&raw)
                .context("OWNER_IDS is malformed")?
                .into_iter()
                .filter(|id| *id != 0)
                .map(serenity::UserId::new)
                .collect(),
            None => HashSet::new(),
        };

        let defaults = StatusGlyphs::default();

        Ok(Self {
            token,
            dev_guild_id: serenity::GuildId::new(guild_id),
            owners,
            commands_dir: lookup("COMMANDS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_COMMANDS_DIR)),
            events_dir: lookup("EVENTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EVENTS_DIR)),
            cli: StatusGlyphs {
                ok: lookup("CLI_STATUS_OK").unwrap_or(defaults.ok),
                bad: lookup("CLI_STATUS_BAD").unwrap_or(defaults.bad),
            },
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("dev_guild_id", &self.dev_guild_id)
            .field("owners", &self.owners)
            .field("commands_dir", &self.commands_dir)
            .field("events_dir", &self.events_dir)
            .field("cli", &self.cli)
            .finish()
    }
}
