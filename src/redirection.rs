use crate::errors::{ShellError, ShellResult};
use crate::parser::Command;
use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::process::{self, Stdio};
use tracing::debug;

/// Permission bits for files created by output redirection
pub const OUTPUT_FILE_MODE: u32 = 0o644;

/// Open a redirection source read-only. The file must already exist.
pub fn open_input(path: &str) -> ShellResult<File> {
    File::open(path).map_err(|e| {
        debug!(path, error = %e, "input redirection failed");
        ShellError::RedirectionError(format!("cannot open {} for input", path))
    })
}

/// Open a redirection target for writing, creating or truncating it.
pub fn open_output(path: &str) -> ShellResult<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(OUTPUT_FILE_MODE)
        .open(path)
        .map_err(|e| {
            debug!(path, error = %e, "output redirection failed");
            ShellError::RedirectionError(format!("cannot open {} for output", path))
        })
}

/// Wire the parsed redirections onto the process about to be spawned.
///
/// Background commands get the null device for any stream that was not
/// redirected explicitly, so they never read from or write to the terminal.
pub fn setup_redirection(cmd: &mut process::Command, command: &Command) -> ShellResult<()> {
    match &command.input_path {
        Some(path) => {
            cmd.stdin(Stdio::from(open_input(path)?));
        }
        None if command.background => {
            cmd.stdin(Stdio::null());
        }
        None => {}
    }

    match &command.output_path {
        Some(path) => {
            cmd.stdout(Stdio::from(open_output(path)?));
        }
        None if command.background => {
            cmd.stdout(Stdio::null());
        }
        None => {}
    }

    Ok(())
}
