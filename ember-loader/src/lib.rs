pub mod commands;
pub mod descriptor;
pub mod discovery;
pub mod emitter;
pub mod events;
pub mod registry;
pub mod report;

pub use commands::{
    Batch, BatchOutcome, CommandCatalog, CommandLoad, CommandPublisher, load_commands,
};
pub use descriptor::{
    CommandScope, CommandSpec, Descriptor, EventSpec, ListenMode, SubCommandSpec, Transport,
};
pub use emitter::{BoxFuture, Emitter, EventSource, Listener, ListenerTargets, Listeners};
pub use events::{EventCallback, EventCallbacks, load_events};
pub use registry::{CommandRegistry, EventRegistry, RegisteredEvent};
pub use report::{LoadReport, ReportKind, ReportRow, RowKind, Status, StatusGlyphs};

/// Extension of descriptor files picked up by discovery.
pub const DESCRIPTOR_EXTENSION: &str = "toml";
