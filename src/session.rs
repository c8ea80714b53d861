use crate::config::ShellConfig;
use crate::jobs::JobRegistry;
use crate::signals::{self, SignalWatcher};
use crate::status::ProcessStatus;

/// What the main loop should do after a command has been handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(i32),
}

/// Mutable state shared by the parser, builtins and process supervisor for
/// the lifetime of the shell.
#[derive(Debug)]
pub struct Session {
    pub config: ShellConfig,
    /// Outcome of the most recent foreground child
    pub last_status: ProcessStatus,
    pub jobs: JobRegistry,
    pub signals: SignalWatcher,
}

impl Session {
    pub fn new(config: ShellConfig) -> Self {
        let jobs = JobRegistry::new(config.max_background_jobs);
        Self {
            config,
            last_status: ProcessStatus::default(),
            jobs,
            signals: SignalWatcher::new(),
        }
    }

    pub fn foreground_only(&self) -> bool {
        signals::foreground_only()
    }

    /// Signal every outstanding background job and return the exit code
    /// the shell should terminate with.
    pub fn shutdown(&mut self, code: i32) -> i32 {
        self.jobs.terminate_all();
        code
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}
