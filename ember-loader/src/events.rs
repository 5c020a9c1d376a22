//! Event classification and listener attachment.

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use futures::FutureExt;
use tracing::{debug, warn};

use crate::DESCRIPTOR_EXTENSION;
use crate::descriptor::{Descriptor, ListenMode, classify_event, parse_event_file};
use crate::discovery::discover;
use crate::emitter::{BoxFuture, Listener, ListenerTargets};
use crate::registry::EventRegistry;
use crate::report::{LoadReport, ReportKind, ReportRow, RowKind, Status, event_label};

/// A compiled event callback: emitted arguments first, then the client handle.
pub type EventCallback<A, C> =
    Arc<dyn Fn(A, C) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Event callbacks addressable by the `handler` key of an event descriptor.
pub struct EventCallbacks<A, C> {
    entries: HashMap<String, EventCallback<A, C>>,
}

impl<A, C> EventCallbacks<A, C>
where
    A: 'static,
    C: 'static,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn register<F, Fut>(&mut self, key: impl Into<String>, callback: F) -> &mut Self
    where
        F: Fn(A, C) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let callback: EventCallback<A, C> =
            Arc::new(move |args: A, client: C| -> BoxFuture<'static, anyhow::Result<()>> {
                callback(args, client).boxed()
            });
        self.entries.insert(key.into(), callback);
        self
    }

    pub fn get(&self, key: &str) -> Option<&EventCallback<A, C>> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A, C> Default for EventCallbacks<A, C>
where
    A: 'static,
    C: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Rebuild the event registry from the descriptor files under `root`.
///
/// Both emitters are cleared with the registry, so reloading never stacks
/// listeners. Each registered callback is wrapped so it receives `client`
/// after the emitted arguments, and attached to the emitter chosen by its
/// `rest` flag through the path chosen by its `once` flag.
pub async fn load_events<A, C>(
    root: &Path,
    registry: &mut EventRegistry<A>,
    callbacks: &EventCallbacks<A, C>,
    client: &C,
    targets: ListenerTargets<'_, A>,
) -> LoadReport
where
    A: Send + 'static,
    C: Clone + Send + Sync + 'static,
{
    registry.clear();
    targets.client.clear();
    targets.rest.clear();

    let files = discover(root, DESCRIPTOR_EXTENSION);
    let mut report = LoadReport::new(ReportKind::Events, files.len());

    for (position, path) in files.iter().enumerate() {
        let index = position + 1;
        debug!(index, total = files.len(), file = %path.display(), "loading event file");

        let descriptor = match read_event(path).await {
            Ok(Some(descriptor)) => descriptor,
            Ok(None) => continue,
            Err(source) => {
                warn!(?source, file = %path.display(), "malformed event descriptor");
                Descriptor::invalid(path, format!("{source:#}"))
            }
        };

        let row = match descriptor {
            Descriptor::Event(spec) => {
                let label = event_label(
                    spec.friendly_name.as_deref(),
                    Some(spec.name.as_str()),
                    &spec.source,
                );
                let kind = mode_kind(Some(spec.mode));

                match callbacks.get(&spec.handler) {
                    None => ReportRow {
                        index,
                        label,
                        event: Some(spec.name.clone()),
                        kind,
                        status: Status::Bad,
                        detail: Some(format!("no event callback named `{}`", spec.handler)),
                    },
                    Some(callback) => {
                        let listener = wrap(callback.clone(), client.clone());
                        let target = targets.get(spec.transport);
                        match spec.mode {
                            ListenMode::Once => target.once(&spec.name, listener.clone()),
                            ListenMode::On => target.on(&spec.name, listener.clone()),
                        }

                        let event = spec.name.clone();
                        if registry.insert(spec, listener) {
                            warn!(
                                event = %event,
                                "event named by more than one file; every listener stays attached"
                            );
                        }

                        ReportRow {
                            index,
                            label,
                            event: Some(event),
                            kind,
                            status: Status::Ok,
                            detail: None,
                        }
                    }
                }
            }
            Descriptor::Invalid(invalid) => ReportRow {
                index,
                label: event_label(invalid.friendly_name.as_deref(), None, &invalid.source),
                event: None,
                kind: mode_kind(invalid.mode),
                status: Status::Bad,
                detail: Some(invalid.reason),
            },
            Descriptor::Command(_) | Descriptor::SubCommand(_) => ReportRow {
                index,
                label: event_label(None, None, path),
                event: None,
                kind: RowKind::Unknown,
                status: Status::Bad,
                detail: Some("command descriptor in the events directory".to_owned()),
            },
        };

        report.push(row);
    }

    report
}

async fn read_event(path: &Path) -> anyhow::Result<Option<Descriptor>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let Some(file) = parse_event_file(&text)? else {
        return Ok(None);
    };
    Ok(classify_event(file, path))
}

fn wrap<A, C>(callback: EventCallback<A, C>, client: C) -> Listener<A>
where
    A: Send + 'static,
    C: Clone + Send + Sync + 'static,
{
    Arc::new(move |args: A| callback(args, client.clone()))
}

fn mode_kind(mode: Option<ListenMode>) -> RowKind {
    match mode {
        Some(ListenMode::Once) => RowKind::Once,
        Some(ListenMode::On) => RowKind::On,
        None => RowKind::Unknown,
    }
}
