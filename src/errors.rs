use std::io;
use thiserror::Error;

/// Error type for shell operations
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("{0}: no such file or directory")]
    CommandNotFound(String),

    #[error("Input error: {0}")]
    InputError(String),

    #[error("{0}")]
    RedirectionError(String),

    #[error("Execution error: {0}")]
    ExecutionError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("System error: {0}")]
    SysError(#[from] nix::Error),

    #[error("{0}")]
    InvalidDirectory(String),

    #[error("background job limit reached ({0} running)")]
    JobLimit(usize),

    /// The shell can no longer create processes.
    #[error("fork failed: {0}")]
    Fatal(String),
}

impl ShellError {
    /// Whether the shell must terminate after reporting this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Fatal(_))
    }
}

pub type ShellResult<T> = Result<T, ShellError>;
