use crate::commands::registry::BuiltinCommand;
use crate::errors::ShellResult;
use crate::session::{Flow, Session};
use std::io::Write;

pub struct StatusCommand;

impl BuiltinCommand for StatusCommand {
    fn name(&self) -> &'static str {
        "status"
    }

    fn execute(
        &self,
        _args: &[String],
        session: &mut Session,
        out: &mut dyn Write,
    ) -> ShellResult<Flow> {
        writeln!(out, "{}", session.last_status)?;
        out.flush()?;
        Ok(Flow::Continue)
    }
}
