pub mod cli;
pub mod commands;
pub mod completion;
pub mod config;
pub mod errors;
pub mod jobs;
pub mod parser;
pub mod redirection;
pub mod repl;
pub mod session;
pub mod signals;
pub mod status;

use errors::{ShellError, ShellResult};
use repl::{handle_command_input, LineSource};
use session::{Flow, Session};
use std::io::Write;
use tracing::warn;

/// Main loop of the shell.
///
/// Each iteration reports finished background jobs and pending signal
/// notices, then reads and runs one line. Returns the exit code once `exit`
/// runs or input ends; background jobs have been signalled by then. Only a
/// fatal error is returned as `Err`.
pub fn run_shell(
    source: &mut dyn LineSource,
    session: &mut Session,
    out: &mut dyn Write,
) -> ShellResult<i32> {
    loop {
        report_finished_jobs(session, out)?;
        report_signal_notices(session, out)?;

        let input = match source.read_line(&session.config.prompt, out) {
            Ok(Some(input)) => input,
            Ok(None) => return Ok(session.shutdown(0)),
            Err(e) => {
                eprintln!("{}", e);
                return Ok(session.shutdown(0));
            }
        };

        match handle_command_input(&input, session, out) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit(code)) => return Ok(session.shutdown(code)),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => report_error(&e, out)?,
        }
    }
}

/// Print and forget every background job that has finished
pub fn report_finished_jobs(session: &mut Session, out: &mut dyn Write) -> ShellResult<()> {
    for (pid, status) in session.jobs.reap() {
        writeln!(out, "background pid {} is done: {}", pid, status)?;
    }
    out.flush()?;
    Ok(())
}

/// Print notices queued up by the signal handlers
pub fn report_signal_notices(session: &mut Session, out: &mut dyn Write) -> ShellResult<()> {
    for notice in session.signals.drain() {
        writeln!(out, "{}", notice)?;
    }
    out.flush()?;
    Ok(())
}

/// Recoverable errors are shown on the shell's output stream
fn report_error(e: &ShellError, out: &mut dyn Write) -> ShellResult<()> {
    if matches!(e, ShellError::IoError(_) | ShellError::SysError(_)) {
        warn!(error = %e, "command failed");
    }
    writeln!(out, "{}", e)?;
    out.flush()?;
    Ok(())
}
