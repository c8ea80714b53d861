pub mod builtins;
pub mod external;
pub mod registry;

use crate::errors::ShellResult;
use crate::parser::Command;
use crate::session::{Flow, Session};
use std::io::Write;

pub use external::run_external_command;
pub use registry::{BuiltinCommand, BuiltinRegistry, BUILTINS};

/// Route a parsed command to a builtin or to process spawning.
/// Commands without arguments are skipped.
pub fn handle_command(
    command: &Command,
    session: &mut Session,
    out: &mut dyn Write,
) -> ShellResult<Flow> {
    let Some(name) = command.name() else {
        return Ok(Flow::Continue);
    };

    match BUILTINS.execute(name, &command.arguments, session, out) {
        Some(result) => result,
        None => run_external_command(command, session, out),
    }
}
