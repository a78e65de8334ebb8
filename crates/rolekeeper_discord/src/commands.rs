//! Slash-command builders derived from the core registry.

use rolekeeper_core::{CommandAccess, CommandRegistry, CommandSpec};
use serenity::all::{CreateCommand, Permissions};

pub fn create_command(spec: &CommandSpec) -> CreateCommand {
    let command = CreateCommand::new(spec.name).description(spec.description);
    match spec.access {
        CommandAccess::Everyone => command,
        CommandAccess::Administrator => {
            command.default_member_permissions(Permissions::ADMINISTRATOR)
        }
    }
}

pub fn create_commands(registry: &CommandRegistry) -> Vec<CreateCommand> {
    registry.iter().map(create_command).collect()
}
