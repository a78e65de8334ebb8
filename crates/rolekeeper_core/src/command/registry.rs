//! Slash-command registration table.

use std::collections::BTreeMap;

pub const UPDATE_COMMAND: &str = "update";
pub const UPDATE_ALL_COMMAND: &str = "update-all";

/// Handler selected for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Reconcile the invoking member.
    UpdateSelf,
    /// Reconcile every guild member.
    UpdateAll,
}

/// Who may run a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAccess {
    Everyone,
    Administrator,
}

/// How the adapter should deliver the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyMode {
    /// Immediate reply visible to the invoker only.
    Ephemeral,
    /// Acknowledge first, then send the reply as a followup.
    Deferred,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: CommandKind,
    pub access: CommandAccess,
    pub reply: ReplyMode,
}

/// Name-keyed command table shared by registration and dispatch.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bot's command set: `update` and `update-all`.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(CommandSpec {
            name: UPDATE_COMMAND,
            description: "Update your roles",
            kind: CommandKind::UpdateSelf,
            access: CommandAccess::Everyone,
            reply: ReplyMode::Ephemeral,
        });
        registry.register(CommandSpec {
            name: UPDATE_ALL_COMMAND,
            description: "Update all users roles",
            kind: CommandKind::UpdateAll,
            access: CommandAccess::Administrator,
            reply: ReplyMode::Deferred,
        });
        registry
    }

    /// Registers or replaces the spec stored under `spec.name`.
    pub fn register(&mut self, spec: CommandSpec) -> Option<CommandSpec> {
        self.commands.insert(spec.name, spec)
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name.trim())
    }

    /// Iterates specs sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
