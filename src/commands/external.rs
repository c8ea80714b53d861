use crate::errors::{ShellError, ShellResult};
use crate::parser::Command;
use crate::redirection::setup_redirection;
use crate::session::{Flow, Session};
use crate::signals;
use crate::status::ProcessStatus;
use nix::errno::Errno;
use nix::sys::signal::Signal;
use std::io::{self, Write};
use std::os::unix::process::CommandExt;
use std::process::{self, Child};
use tracing::debug;

/// Exit value recorded when the program image could not be started
pub const EXEC_FAILURE_STATUS: i32 = 2;

/// Exit value recorded when a redirection could not be set up
pub const REDIRECTION_FAILURE_STATUS: i32 = 1;

/// Spawn an external command, either waiting for it or handing it to the
/// background registry.
pub fn run_external_command(
    command: &Command,
    session: &mut Session,
    out: &mut dyn Write,
) -> ShellResult<Flow> {
    let Some(name) = command.name() else {
        return Ok(Flow::Continue);
    };

    if command.background && session.jobs.is_full() {
        return Err(ShellError::JobLimit(session.jobs.len()));
    }

    let mut cmd = process::Command::new(name);
    cmd.args(&command.arguments[1..]);

    if let Err(e) = setup_redirection(&mut cmd, command) {
        if !command.background {
            session.last_status = ProcessStatus::Exited(REDIRECTION_FAILURE_STATUS);
        }
        return Err(e);
    }

    let background = command.background;
    // SAFETY: the hook only calls sigaction, which is async-signal-safe
    unsafe {
        cmd.pre_exec(move || {
            signals::set_child_dispositions(background).map_err(io::Error::from)
        });
    }

    // anything buffered must reach the terminal before the child writes to it
    out.flush()?;

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            let err = spawn_error(name, e);
            if !background && !err.is_fatal() {
                session.last_status = ProcessStatus::Exited(EXEC_FAILURE_STATUS);
            }
            return Err(err);
        }
    };
    debug!(pid = child.id(), name, background, "spawned child");

    if background {
        let pid = session.jobs.insert(child)?;
        writeln!(out, "background pid is {}", pid)?;
        out.flush()?;
    } else {
        wait_foreground(child, session, out)?;
    }

    Ok(Flow::Continue)
}

/// Block until the foreground child terminates and record how it ended.
fn wait_foreground(
    mut child: Child,
    session: &mut Session,
    out: &mut dyn Write,
) -> ShellResult<()> {
    let status = ProcessStatus::from(child.wait()?);
    debug!(pid = child.id(), %status, "foreground child finished");
    session.last_status = status;

    if let ProcessStatus::Signaled(signo) = status {
        if signo == Signal::SIGINT as i32 {
            session.signals.discard_interrupts();
        }
        writeln!(out, "{}", status)?;
        out.flush()?;
    }
    Ok(())
}

/// Running out of processes or memory is fatal; anything else means the
/// program could not be started.
fn spawn_error(name: &str, e: io::Error) -> ShellError {
    match e.raw_os_error().map(Errno::from_raw) {
        Some(Errno::EAGAIN) | Some(Errno::ENOMEM) => ShellError::Fatal(e.to_string()),
        Some(Errno::ENOENT) => ShellError::CommandNotFound(name.to_string()),
        _ => ShellError::ExecutionError(format!("{}: {}", name, e)),
    }
}
