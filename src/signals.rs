//! Interactive interrupt (SIGINT) and stop (SIGTSTP) handling.
//!
//! The handlers only bump atomic counters. Everything user-visible happens on
//! the main loop, which compares the counters against what it has already
//! reported. The parity of the stop counter is the foreground-only flag.

use nix::libc::c_int;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

static STOP_COUNT: AtomicUsize = AtomicUsize::new(0);
static INTERRUPT_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Serializes tests that deliver fake signals or watch for notices
#[cfg(test)]
pub(crate) static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

extern "C" fn on_interrupt(_: c_int) {
    INTERRUPT_COUNT.fetch_add(1, Ordering::SeqCst);
}

extern "C" fn on_stop(_: c_int) {
    STOP_COUNT.fetch_add(1, Ordering::SeqCst);
}

/// Whether a trailing `&` is currently ignored
pub fn foreground_only() -> bool {
    STOP_COUNT.load(Ordering::SeqCst) % 2 == 1
}

/// Flip foreground-only mode exactly as a delivered SIGTSTP would.
/// Returns the new state.
pub fn toggle_foreground_only() -> bool {
    let previous = STOP_COUNT.fetch_add(1, Ordering::SeqCst);
    previous % 2 == 0
}

/// Install the shell's own handlers. Interrupted system calls are restarted
/// so a blocking foreground wait is not cut short.
pub fn install_shell_handlers() -> nix::Result<()> {
    let interrupt = SigAction::new(
        SigHandler::Handler(on_interrupt),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    let stop = SigAction::new(
        SigHandler::Handler(on_stop),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );

    // SAFETY: both handlers only touch atomics
    unsafe {
        sigaction(Signal::SIGINT, &interrupt)?;
        sigaction(Signal::SIGTSTP, &stop)?;
    }
    debug!("installed SIGINT and SIGTSTP handlers");
    Ok(())
}

/// Signal dispositions for a freshly forked child, applied before exec.
///
/// Foreground children take the default SIGINT action, background children
/// ignore it. Every child ignores SIGTSTP. Only async-signal-safe calls are
/// made here.
pub fn set_child_dispositions(background: bool) -> nix::Result<()> {
    let interrupt = if background {
        SigHandler::SigIgn
    } else {
        SigHandler::SigDfl
    };
    let interrupt = SigAction::new(interrupt, SaFlags::empty(), SigSet::empty());
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());

    // SAFETY: runs between fork and exec, replacing handlers wholesale
    unsafe {
        sigaction(Signal::SIGINT, &interrupt)?;
        sigaction(Signal::SIGTSTP, &ignore)?;
    }
    Ok(())
}

/// Something a signal handler asked the main loop to report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Interrupt,
    ForegroundOnly(bool),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Interrupt => Ok(()),
            Notice::ForegroundOnly(true) => {
                write!(f, "Entering foreground-only mode (& is now ignored)")
            }
            Notice::ForegroundOnly(false) => write!(f, "Exiting foreground-only mode"),
        }
    }
}

/// Tracks which signal deliveries the main loop has already reported
#[derive(Debug)]
pub struct SignalWatcher {
    stops_seen: usize,
    interrupts_seen: usize,
}

impl SignalWatcher {
    pub fn new() -> Self {
        Self {
            stops_seen: STOP_COUNT.load(Ordering::SeqCst),
            interrupts_seen: INTERRUPT_COUNT.load(Ordering::SeqCst),
        }
    }

    /// Collect notices for every delivery since the last call, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();

        let interrupts = INTERRUPT_COUNT.load(Ordering::SeqCst);
        if interrupts != self.interrupts_seen {
            self.interrupts_seen = interrupts;
            notices.push(Notice::Interrupt);
        }

        let stops = STOP_COUNT.load(Ordering::SeqCst);
        for n in self.stops_seen + 1..=stops {
            notices.push(Notice::ForegroundOnly(n % 2 == 1));
        }
        self.stops_seen = stops;

        notices
    }

    /// Forget pending interrupts; used when a foreground child died of the
    /// same interrupt and its termination notice already covers it.
    pub fn discard_interrupts(&mut self) {
        self.interrupts_seen = INTERRUPT_COUNT.load(Ordering::SeqCst);
    }
}

impl Default for SignalWatcher {
    fn default() -> Self {
        Self::new()
    }
}
