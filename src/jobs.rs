use crate::errors::{ShellError, ShellResult};
use crate::status::ProcessStatus;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::collections::BTreeMap;
use std::process::Child;
use tracing::debug;

/// Default number of background children tracked at once
pub const DEFAULT_CAPACITY: usize = 512;

/// Background children that have been spawned but not yet reaped.
///
/// Only the main loop touches the registry: insert on spawn, remove on reap.
#[derive(Debug)]
pub struct JobRegistry {
    jobs: BTreeMap<u32, Child>,
    capacity: usize,
}

impl JobRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            jobs: BTreeMap::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.jobs.len() >= self.capacity
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.jobs.contains_key(&pid)
    }

    pub fn pids(&self) -> Vec<u32> {
        self.jobs.keys().copied().collect()
    }

    /// Start tracking a background child. Returns its pid.
    pub fn insert(&mut self, child: Child) -> ShellResult<u32> {
        if self.is_full() {
            return Err(ShellError::JobLimit(self.jobs.len()));
        }
        let pid = child.id();
        self.jobs.insert(pid, child);
        debug!(pid, running = self.jobs.len(), "registered background job");
        Ok(pid)
    }

    /// Collect every background child that has terminated, without blocking.
    ///
    /// Each finished child is returned once and its slot is freed. Only
    /// registered pids are waited on, so a foreground wait never races this.
    pub fn reap(&mut self) -> Vec<(u32, ProcessStatus)> {
        let mut finished = Vec::new();

        for (pid, child) in self.jobs.iter_mut() {
            match child.try_wait() {
                Ok(Some(status)) => finished.push((*pid, ProcessStatus::from(status))),
                Ok(None) => {}
                Err(e) => debug!(pid, error = %e, "failed to poll background job"),
            }
        }

        for (pid, status) in &finished {
            self.jobs.remove(pid);
            debug!(pid, %status, "reaped background job");
        }

        finished
    }

    /// Ask every registered child to terminate. Does not wait for them.
    pub fn terminate_all(&mut self) {
        for pid in self.jobs.keys() {
            let Ok(raw) = i32::try_from(*pid) else {
                continue;
            };
            if let Err(e) = kill(Pid::from_raw(raw), Signal::SIGTERM) {
                debug!(pid, error = %e, "failed to signal background job");
            }
        }
        self.jobs.clear();
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
