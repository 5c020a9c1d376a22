//! Command classification, registration and remote publication.

use std::path::Path;

use anyhow::Context as _;
use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::DESCRIPTOR_EXTENSION;
use crate::descriptor::{
    CommandScope, CommandSpec, Descriptor, classify_command, file_label, parse_command_file,
};
use crate::discovery::discover;
use crate::registry::CommandRegistry;
use crate::report::{LoadReport, ReportKind, ReportRow, RowKind, Status};

/// Remote side of command registration.
///
/// Both publish calls are bulk replaces: whatever is not in the batch is
/// removed remotely.
#[async_trait]
pub trait CommandPublisher: Send + Sync {
    type Guild: Send + Sync;

    async fn resolve_dev_guild(&self) -> anyhow::Result<Self::Guild>;

    async fn publish_global(&self, batch: &[CommandSpec]) -> anyhow::Result<usize>;

    async fn publish_guild(
        &self,
        guild: &Self::Guild,
        batch: &[CommandSpec],
    ) -> anyhow::Result<usize>;
}

/// The set of command callbacks compiled into the binary.
pub trait CommandCatalog: Sync {
    fn has_command(&self, name: &str) -> bool;

    /// `tag` is `parent.child`.
    fn has_sub_command(&self, tag: &str) -> bool;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOutcome {
    Published(usize),
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batch {
    pub names: Vec<String>,
    pub outcome: BatchOutcome,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLoad {
    pub report: LoadReport,
    pub global: Batch,
    pub guild: Batch,
}

/// Rebuild the command registry from the descriptor files under `root` and
/// publish both batches.
///
/// Fails without touching the registry when the development guild cannot be
/// resolved. A failed publish is reported in the returned batch outcome.
pub async fn load_commands<P, K>(
    root: &Path,
    registry: &mut CommandRegistry,
    catalog: &K,
    publisher: &P,
) -> anyhow::Result<CommandLoad>
where
    P: CommandPublisher,
    K: CommandCatalog + ?Sized,
{
    let guild = publisher
        .resolve_dev_guild()
        .await
        .context("development guild could not be resolved; command load aborted")?;

    registry.clear();

    let files = discover(root, DESCRIPTOR_EXTENSION);
    let mut report = LoadReport::new(ReportKind::Commands, files.len());
    let mut global: Vec<CommandSpec> = Vec::new();
    let mut guild_batch: Vec<CommandSpec> = Vec::new();

    for (position, path) in files.iter().enumerate() {
        let index = position + 1;
        debug!(index, total = files.len(), file = %path.display(), "loading command file");

        let descriptor = match read_command(path).await {
            Ok(Some(descriptor)) => descriptor,
            Ok(None) => continue,
            Err(source) => {
                warn!(?source, file = %path.display(), "malformed command descriptor");
                Descriptor::invalid(path, format!("{source:#}"))
            }
        };

        let row = match descriptor {
            Descriptor::Command(spec) => {
                if !catalog.has_command(&spec.name) {
                    bad_row(index, spec.name.clone(), format!("no command named `{}`", spec.name))
                } else {
                    let kind = match spec.scope {
                        CommandScope::Global => RowKind::Global,
                        CommandScope::Guild => RowKind::Dev,
                    };
                    let label = spec.name.clone();

                    if let Some(previous) = registry.insert_command(spec.clone()) {
                        warn!(
                            command = %spec.name,
                            previous = %previous.source.display(),
                            current = %spec.source.display(),
                            "command registered twice; the later file wins"
                        );
                        global.retain(|entry| entry.name != spec.name);
                        guild_batch.retain(|entry| entry.name != spec.name);
                    }

                    match spec.scope {
                        CommandScope::Global => global.push(spec),
                        CommandScope::Guild => guild_batch.push(spec),
                    }

                    ok_row(index, label, kind)
                }
            }
            Descriptor::SubCommand(spec) => {
                if !catalog.has_sub_command(&spec.tag) {
                    bad_row(index, spec.tag.clone(), format!("no sub-command `{}`", spec.tag))
                } else {
                    let label = spec.tag.clone();
                    if let Some(previous) = registry.insert_sub_command(spec) {
                        warn!(
                            tag = %label,
                            previous = %previous.source.display(),
                            "sub-command registered twice; the later file wins"
                        );
                    }
                    ok_row(index, label, RowKind::Sub)
                }
            }
            Descriptor::Invalid(invalid) => {
                bad_row(index, file_label(&invalid.source), invalid.reason)
            }
            Descriptor::Event(spec) => bad_row(
                index,
                file_label(&spec.source),
                "event descriptor in the commands directory".to_owned(),
            ),
        };

        report.push(row);
    }

    let global_outcome = outcome("global", publisher.publish_global(&global).await);
    let guild_outcome = outcome("guild", publisher.publish_guild(&guild, &guild_batch).await);

    Ok(CommandLoad {
        report,
        global: Batch {
            names: global.into_iter().map(|spec| spec.name).collect(),
            outcome: global_outcome,
        },
        guild: Batch {
            names: guild_batch.into_iter().map(|spec| spec.name).collect(),
            outcome: guild_outcome,
        },
    })
}

async fn read_command(path: &Path) -> anyhow::Result<Option<Descriptor>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let Some(file) = parse_command_file(&text)? else {
        return Ok(None);
    };
    Ok(classify_command(file, path))
}

fn outcome(scope: &'static str, result: anyhow::Result<usize>) -> BatchOutcome {
    match result {
        Ok(count) => {
            info!(count, scope, "updated application commands");
            BatchOutcome::Published(count)
        }
        Err(source) => {
            error!(?source, scope, "bulk command registration failed");
            BatchOutcome::Failed(format!("{source:#}"))
        }
    }
}

fn ok_row(index: usize, label: String, kind: RowKind) -> ReportRow {
    ReportRow {
        index,
        label,
        event: None,
        kind,
        status: Status::Ok,
        detail: None,
    }
}

fn bad_row(index: usize, label: String, detail: String) -> ReportRow {
    ReportRow {
        index,
        label,
        event: None,
        kind: RowKind::Unknown,
        status: Status::Bad,
        detail: Some(detail),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    struct Catalog(HashSet<&'static str>);

    impl CommandCatalog for Catalog {
        fn has_command(&self, name: &str) -> bool {
            self.0.contains(name)
        }

        fn has_sub_command(&self, tag: &str) -> bool {
            self.0.contains(tag)
        }
    }

    fn catalog() -> Catalog {
        Catalog(HashSet::from(["ping", "kick", "reload", "mod.ban"]))
    }

    #[derive(Default)]
    struct Publisher {
        missing_guild: bool,
        fail_global: bool,
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl Publisher {
        fn calls(&self) -> Vec<(String, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, scope: &str, batch: &[CommandSpec]) {
            self.calls.lock().unwrap().push((
                scope.to_owned(),
                batch.iter().map(|spec| spec.name.clone()).collect(),
            ));
        }
    }

    #[async_trait]
    impl CommandPublisher for Publisher {
        type Guild = u64;

        async fn resolve_dev_guild(&self) -> anyhow::Result<u64> {
            if self.missing_guild {
                anyhow::bail!("unknown guild");
            }
            Ok(42)
        }

        async fn publish_global(&self, batch: &[CommandSpec]) -> anyhow::Result<usize> {
            self.record("global", batch);
            if self.fail_global {
                anyhow::bail!("403 Forbidden");
            }
            Ok(batch.len())
        }

        async fn publish_guild(&self, guild: &u64, batch: &[CommandSpec]) -> anyhow::Result<usize> {
            self.record(&format!("guild:{guild}"), batch);
            Ok(batch.len())
        }
    }

    fn write(root: &Path, name: &str, body: &str) {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, body).unwrap();
    }

    #[tokio::test]
    async fn classifies_registers_and_publishes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/ping.toml", "global = true\n[data]\nname = \"ping\"");
        write(dir.path(), "b/kick.toml", "[data]\nname = \"kick\"");
        write(dir.path(), "c/ban.toml", "subCommand = \"mod.ban\"");
        write(dir.path(), "d/old.toml", "ignore = true\n[data]\nname = \"old\"");

        let publisher = Publisher::default();
        let mut registry = CommandRegistry::new();
        let load = load_commands(dir.path(), &mut registry, &catalog(), &publisher)
            .await
            .unwrap();

        assert_eq!(registry.command_names(), vec!["kick", "ping"]);
        assert_eq!(registry.sub_command_tags(), vec!["mod.ban"]);
        assert_eq!(load.global.names, vec!["ping"]);
        assert_eq!(load.guild.names, vec!["kick"]);
        assert_eq!(load.global.outcome, BatchOutcome::Published(1));
        assert_eq!(load.guild.outcome, BatchOutcome::Published(1));
        assert_eq!(load.report.labels(), vec!["ping", "kick", "mod.ban"]);
        assert_eq!(load.report.files, 4);
        assert_eq!(
            publisher.calls(),
            vec![
                ("global".to_owned(), vec!["ping".to_owned()]),
                ("guild:42".to_owned(), vec!["kick".to_owned()]),
            ]
        );
    }

    #[tokio::test]
    async fn unresolved_guild_aborts_before_touching_registry() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ping.toml", "[data]\nname = \"ping\"");

        let mut registry = CommandRegistry::new();
        registry.insert_sub_command(crate::descriptor::SubCommandSpec {
            tag: "mod.ban".to_owned(),
            source: "before.toml".into(),
        });
        let before = registry.clone();

        let publisher = Publisher {
            missing_guild: true,
            ..Default::default()
        };
        let result = load_commands(dir.path(), &mut registry, &catalog(), &publisher).await;

        assert!(result.is_err());
        assert_eq!(registry, before);
        assert!(publisher.calls().is_empty());
    }

    #[tokio::test]
    async fn bad_descriptors_get_one_row_and_no_registration() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "1_empty.toml", "global = true");
        write(dir.path(), "2_broken.toml", "[data\nname = ");
        write(dir.path(), "3_unknown.toml", "[data]\nname = \"dance\"");
        write(dir.path(), "4_nameless.toml", "[data]\ndescription = \"?\"");

        let publisher = Publisher::default();
        let mut registry = CommandRegistry::new();
        let load = load_commands(dir.path(), &mut registry, &catalog(), &publisher)
            .await
            .unwrap();

        assert_eq!(registry.command_count(), 0);
        assert_eq!(load.report.rows.len(), 4);
        assert_eq!(load.report.bad_count(), 4);
        assert_eq!(
            load.report.labels(),
            vec!["1_empty.toml", "2_broken.toml", "dance", "4_nameless.toml"]
        );
        assert!(load.global.names.is_empty());
        assert!(load.guild.names.is_empty());
    }

    #[tokio::test]
    async fn ignored_file_with_mistyped_fields_leaves_no_row() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "old.toml",
            "ignore = true\nglobal = \"yes\"\n[data]\nname = \"ping\"",
        );

        let publisher = Publisher::default();
        let mut registry = CommandRegistry::new();
        let load = load_commands(dir.path(), &mut registry, &catalog(), &publisher)
            .await
            .unwrap();

        assert!(load.report.rows.is_empty());
        assert_eq!(registry.command_count(), 0);
        assert_eq!(load.report.files, 1);
    }

    #[tokio::test]
    async fn duplicate_names_keep_the_last_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "1.toml", "[data]\nname = \"ping\"");
        write(dir.path(), "2.toml", "global = true\n[data]\nname = \"ping\"");

        let publisher = Publisher::default();
        let mut registry = CommandRegistry::new();
        let load = load_commands(dir.path(), &mut registry, &catalog(), &publisher)
            .await
            .unwrap();

        assert_eq!(registry.command_count(), 1);
        assert_eq!(
            registry.command("ping").map(|spec| spec.scope),
            Some(CommandScope::Global)
        );
        assert_eq!(load.global.names, vec!["ping"]);
        assert!(load.guild.names.is_empty());
    }

    #[tokio::test]
    async fn failed_global_publish_still_publishes_guild_batch() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ping.toml", "global = true\n[data]\nname = \"ping\"");
        write(dir.path(), "kick.toml", "[data]\nname = \"kick\"");

        let publisher = Publisher {
            fail_global: true,
            ..Default::default()
        };
        let mut registry = CommandRegistry::new();
        let load = load_commands(dir.path(), &mut registry, &catalog(), &publisher)
            .await
            .unwrap();

        assert!(matches!(
            load.global.outcome,
            BatchOutcome::Failed(ref reason) if reason.contains("403")
        ));
        assert_eq!(load.guild.outcome, BatchOutcome::Published(1));
        assert_eq!(publisher.calls().len(), 2);
        assert!(registry.contains_command("ping"));
    }

    #[tokio::test]
    async fn reloading_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ping.toml", "global = true\n[data]\nname = \"ping\"");
        write(dir.path(), "ban.toml", "sub_command = \"mod.ban\"");

        let publisher = Publisher::default();
        let mut registry = CommandRegistry::new();
        let first = load_commands(dir.path(), &mut registry, &catalog(), &publisher)
            .await
            .unwrap();
        let after_first = registry.clone();
        let second = load_commands(dir.path(), &mut registry, &catalog(), &publisher)
            .await
            .unwrap();

        assert_eq!(registry, after_first);
        assert_eq!(first, second);
    }
}
