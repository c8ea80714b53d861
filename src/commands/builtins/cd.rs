use crate::commands::registry::BuiltinCommand;
use crate::errors::{ShellError, ShellResult};
use crate::session::{Flow, Session};
use std::env;
use std::io::Write;
use tracing::debug;

pub struct CdCommand;

impl BuiltinCommand for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn execute(
        &self,
        args: &[String],
        session: &mut Session,
        _out: &mut dyn Write,
    ) -> ShellResult<Flow> {
        let target = match args.get(1) {
            Some(path) => path.clone(),
            None => env::var(&session.config.home_var).map_err(|_| {
                ShellError::InvalidDirectory(format!(
                    "cd: {} environment variable not set",
                    session.config.home_var
                ))
            })?,
        };

        env::set_current_dir(&target).map_err(|_| {
            ShellError::InvalidDirectory(format!("cd: {}: no such file or directory", target))
        })?;

        if let Ok(cwd) = env::current_dir() {
            debug!(cwd = %cwd.display(), "changed directory");
            env::set_var("PWD", cwd);
        }
        Ok(Flow::Continue)
    }
}
