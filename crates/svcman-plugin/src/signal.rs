//! Scoped signal masking around fork.

use nix::sys::signal::{self, SigHandler, SigSet, SigmaskHow, Signal};

use svcman_core::{AppError, AppResult};

/// Signals the framework normally intercepts; a forked plugin child gets
/// their default dispositions back before its hook runs.
const CHILD_RESET_SIGNALS: [Signal; 7] = [
    Signal::SIGCHLD,
    Signal::SIGHUP,
    Signal::SIGINT,
    Signal::SIGQUIT,
    Signal::SIGTERM,
    Signal::SIGUSR1,
    Signal::SIGWINCH,
];

/// Blocks every signal for the lifetime of the value.
///
/// Held across `fork` so no signal can reach the child before its handlers
/// are reset, nor the parent between fork and mask restoration. Dropping
/// the guard restores the saved mask, on every exit path of the caller —
/// error, child, or parent.
pub(crate) struct BlockedSignals {
    saved: SigSet,
}

impl BlockedSignals {
    pub(crate) fn block_all() -> AppResult<Self> {
        let mut saved = SigSet::empty();
        signal::sigprocmask(
            SigmaskHow::SIG_SETMASK,
            Some(&SigSet::all()),
            Some(&mut saved),
        )
        .map_err(|e| AppError::process(format!("Failed to block signals: {e}")))?;
        Ok(Self { saved })
    }
}

impl Drop for BlockedSignals {
    fn drop(&mut self) {
        let _ = signal::sigprocmask(SigmaskHow::SIG_SETMASK, Some(&self.saved), None);
    }
}

/// Restores default dispositions for the framework-intercepted signals.
/// Child-side only, called immediately after fork.
pub(crate) fn reset_child_dispositions() {
    for sig in CHILD_RESET_SIGNALS {
        // SAFETY: installing SIG_DFL is async-signal-safe and the child has
        // not yet run any plugin code.
        let _ = unsafe { signal::signal(sig, SigHandler::SigDfl) };
    }
}
