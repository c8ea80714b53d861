use crate::errors::ShellResult;
use crate::session::{Flow, Session};
use once_cell::sync::Lazy;
use std::io::Write;

/// Trait that all builtin commands must implement
pub trait BuiltinCommand: Send + Sync {
    /// The command name (e.g., "cd", "status")
    fn name(&self) -> &'static str;

    /// Execute the command with the given arguments.
    /// args[0] is the command name itself
    fn execute(
        &self,
        args: &[String],
        session: &mut Session,
        out: &mut dyn Write,
    ) -> ShellResult<Flow>;
}

/// Central registry for all builtin commands, searched in registration order
pub struct BuiltinRegistry {
    commands: Vec<Box<dyn BuiltinCommand>>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn register<C: BuiltinCommand + 'static>(&mut self, cmd: C) {
        self.commands.push(Box::new(cmd));
    }

    /// Check if a command name is a builtin
    pub fn is_builtin(&self, name: &str) -> bool {
        self.commands.iter().any(|c| c.name() == name)
    }

    /// Get all builtin command names (for completion)
    pub fn builtin_names(&self) -> Vec<&'static str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    /// Execute a builtin command by name
    pub fn execute(
        &self,
        name: &str,
        args: &[String],
        session: &mut Session,
        out: &mut dyn Write,
    ) -> Option<ShellResult<Flow>> {
        self.commands
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.execute(args, session, out))
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global registry instance
pub static BUILTINS: Lazy<BuiltinRegistry> = Lazy::new(|| {
    let mut registry = BuiltinRegistry::new();

    registry.register(super::builtins::ExitCommand);
    registry.register(super::builtins::CdCommand);
    registry.register(super::builtins::StatusCommand);

    registry
});
