use crate::commands::registry::BuiltinCommand;
use crate::errors::ShellResult;
use crate::session::{Flow, Session};
use std::io::Write;

pub struct ExitCommand;

impl BuiltinCommand for ExitCommand {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn execute(
        &self,
        _args: &[String],
        _session: &mut Session,
        _out: &mut dyn Write,
    ) -> ShellResult<Flow> {
        // background jobs are signalled by the main loop on its way out
        Ok(Flow::Exit(0))
    }
}
