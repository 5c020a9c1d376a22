//! In-memory registries rebuilt from scratch on every load.

use std::collections::BTreeMap;

use crate::descriptor::{CommandSpec, EventSpec, SubCommandSpec};
use crate::emitter::Listener;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandSpec>,
    sub_commands: BTreeMap<String, SubCommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.sub_commands.clear();
    }

    /// Insert a command under its name, returning the entry it replaced.
    pub fn insert_command(&mut self, spec: CommandSpec) -> Option<CommandSpec> {
        self.commands.insert(spec.name.clone(), spec)
    }

    /// Insert a sub-command under its tag, returning the entry it replaced.
    pub fn insert_sub_command(&mut self, spec: SubCommandSpec) -> Option<SubCommandSpec> {
        self.sub_commands.insert(spec.tag.clone(), spec)
    }

    pub fn command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    pub fn sub_command(&self, tag: &str) -> Option<&SubCommandSpec> {
        self.sub_commands.get(tag)
    }

    pub fn contains_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn contains_sub_command(&self, tag: &str) -> bool {
        self.sub_commands.contains_key(tag)
    }

    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    pub fn command_names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    pub fn sub_command_tags(&self) -> Vec<&str> {
        self.sub_commands.keys().map(String::as_str).collect()
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    pub fn sub_command_count(&self) -> usize {
        self.sub_commands.len()
    }
}

/// An event listener as registered by the loader, kept alongside its descriptor.
pub struct RegisteredEvent<A> {
    pub spec: EventSpec,
    pub listener: Listener<A>,
}

pub struct EventRegistry<A> {
    events: BTreeMap<String, RegisteredEvent<A>>,
}

impl<A> EventRegistry<A> {
    pub fn new() -> Self {
        Self {
            events: BTreeMap::new(),
        }
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Register a listener under the event name. Returns `true` if it replaced one.
    pub fn insert(&mut self, spec: EventSpec, listener: Listener<A>) -> bool {
        let name = spec.name.clone();
        self.events
            .insert(name, RegisteredEvent { spec, listener })
            .is_some()
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredEvent<A>> {
        self.events.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.events.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.events.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<A> Default for EventRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}
