use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

/// How a child process ended: either a normal exit code or the number of
/// the signal that killed it. The two are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Exited(i32),
    Signaled(i32),
}

impl Default for ProcessStatus {
    fn default() -> Self {
        ProcessStatus::Exited(0)
    }
}

impl From<ExitStatus> for ProcessStatus {
    fn from(status: ExitStatus) -> Self {
        match (status.code(), status.signal()) {
            (Some(code), _) => ProcessStatus::Exited(code),
            (None, Some(signo)) => ProcessStatus::Signaled(signo),
            // Child::wait never passes WUNTRACED/WCONTINUED, so a stopped or
            // continued status cannot get here
            (None, None) => ProcessStatus::Exited(-1),
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessStatus::Exited(code) => write!(f, "exit value {}", code),
            ProcessStatus::Signaled(signo) => write!(f, "terminated by signal {}", signo),
        }
    }
}
