//! Declarative descriptor files and their classification.
//!
//! A descriptor file is parsed into one of the raw shapes below, then
//! classified into a [`Descriptor`]. Classification is pure: it never touches
//! registries, catalogs or the network.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Raw shape of a file under the commands directory.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CommandFile {
    #[serde(default)]
    pub ignore: bool,
    pub data: Option<CommandMetadata>,
    #[serde(default, alias = "subCommand")]
    pub sub_command: Option<String>,
    #[serde(default)]
    pub global: bool,
    #[serde(default)]
    pub developer: bool,
    #[serde(default, alias = "initialReply")]
    pub initial_reply: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CommandMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Raw shape of a file under the events directory.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EventFile {
    pub event: Option<EventFields>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EventFields {
    #[serde(default)]
    pub ignore: bool,
    pub name: Option<String>,
    #[serde(default)]
    pub rest: bool,
    #[serde(default)]
    pub once: bool,
    #[serde(default, alias = "friendlyName")]
    pub friendly_name: Option<String>,
    pub handler: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Descriptor {
    Command(CommandSpec),
    SubCommand(SubCommandSpec),
    Event(EventSpec),
    Invalid(InvalidDescriptor),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandScope {
    Global,
    Guild,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: String,
    pub description: Option<String>,
    pub scope: CommandScope,
    pub developer: bool,
    pub initial_reply: bool,
    pub source: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubCommandSpec {
    pub tag: String,
    pub source: PathBuf,
}

/// Which emitter a listener is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transport {
    Client,
    Rest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenMode {
    On,
    Once,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventSpec {
    pub name: String,
    pub friendly_name: Option<String>,
    pub transport: Transport,
    pub mode: ListenMode,
    pub handler: String,
    pub source: PathBuf,
}

/// A descriptor that was rejected. Event-only display fields stay `None` for commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidDescriptor {
    pub source: PathBuf,
    pub reason: String,
    pub friendly_name: Option<String>,
    pub mode: Option<ListenMode>,
}

impl Descriptor {
    pub fn invalid(source: &Path, reason: impl Into<String>) -> Self {
        Descriptor::Invalid(InvalidDescriptor {
            source: source.to_path_buf(),
            reason: reason.into(),
            friendly_name: None,
            mode: None,
        })
    }
}

/// Parse a command file. `None` means it sets `ignore = true`; the other
/// fields of an ignored file are never validated.
pub fn parse_command_file(text: &str) -> anyhow::Result<Option<CommandFile>> {
    let table: toml::Table = text.parse().context("invalid command descriptor")?;
    if is_ignored(&table) {
        return Ok(None);
    }

    let file = toml::Value::Table(table)
        .try_into()
        .context("invalid command descriptor")?;
    Ok(Some(file))
}

/// Parse an event file. `None` means its `[event]` table sets `ignore = true`.
pub fn parse_event_file(text: &str) -> anyhow::Result<Option<EventFile>> {
    let table: toml::Table = text.parse().context("invalid event descriptor")?;
    if table
        .get("event")
        .and_then(toml::Value::as_table)
        .is_some_and(is_ignored)
    {
        return Ok(None);
    }

    let file = toml::Value::Table(table)
        .try_into()
        .context("invalid event descriptor")?;
    Ok(Some(file))
}

fn is_ignored(table: &toml::Table) -> bool {
    table.get("ignore").and_then(toml::Value::as_bool) == Some(true)
}

/// Classify a command file. `None` means the file opted out with `ignore`.
pub fn classify_command(file: CommandFile, source: &Path) -> Option<Descriptor> {
    if file.ignore {
        return None;
    }

    let tag = non_blank(file.sub_command);
    if file.data.is_none() && tag.is_none() {
        return Some(Descriptor::invalid(
            source,
            "missing both `data` and `sub_command`",
        ));
    }

    if let Some(tag) = tag {
        return Some(Descriptor::SubCommand(SubCommandSpec {
            tag,
            source: source.to_path_buf(),
        }));
    }

    let metadata = file.data.unwrap_or_default();
    let Some(name) = non_blank(metadata.name) else {
        return Some(Descriptor::invalid(source, "`data.name` is missing"));
    };

    Some(Descriptor::Command(CommandSpec {
        name,
        description: non_blank(metadata.description),
        scope: if file.global {
            CommandScope::Global
        } else {
            CommandScope::Guild
        },
        developer: file.developer,
        initial_reply: file.initial_reply,
        source: source.to_path_buf(),
    }))
}

/// Classify an event file. `None` means there is no `[event]` table or it is ignored.
pub fn classify_event(file: EventFile, source: &Path) -> Option<Descriptor> {
    let event = file.event?;
    if event.ignore {
        return None;
    }

    let mode = if event.once {
        ListenMode::Once
    } else {
        ListenMode::On
    };
    let friendly_name = non_blank(event.friendly_name);

    let Some(name) = non_blank(event.name) else {
        return Some(Descriptor::Invalid(InvalidDescriptor {
            source: source.to_path_buf(),
            reason: "`event.name` is missing".to_owned(),
            friendly_name,
            mode: Some(mode),
        }));
    };

    Some(Descriptor::Event(EventSpec {
        handler: non_blank(event.handler).unwrap_or_else(|| name.clone()),
        name,
        friendly_name,
        transport: if event.rest {
            Transport::Rest
        } else {
            Transport::Client
        },
        mode,
        source: source.to_path_buf(),
    }))
}

/// Last path component of a descriptor file, used when it has no usable name.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("unknown")
        .to_owned()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
