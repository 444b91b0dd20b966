//! Child-exit collection tolerant of signal-interruption races.

use nix::errno::Errno;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::Pid;

/// Exit code reported for children that terminated abnormally.
pub const EXIT_FAILURE: i32 = 1;

/// Wraps `waitpid`, insulating callers from spurious wake-ups.
///
/// A wait call may be woken by an unrelated signal without the target
/// having changed state; the reaper retries until the requested pid is
/// confirmed reaped.
#[derive(Debug)]
pub struct ProcessReaper;

impl ProcessReaper {
    /// Waits until `pid` is reaped.
    ///
    /// Returns the child's exit code if it exited normally,
    /// [`EXIT_FAILURE`] if it was terminated by a signal, and `None` only
    /// when waiting itself failed for a reason unrelated to the child's
    /// state (for example, no such child).
    pub fn wait_for(pid: Pid) -> Option<i32> {
        loop {
            match waitpid(pid, None) {
                Ok(WaitStatus::Exited(reaped, code)) if reaped == pid => return Some(code),
                Ok(WaitStatus::Signaled(reaped, _, _)) if reaped == pid => {
                    return Some(EXIT_FAILURE);
                }
                // Non-terminal state change; the target is not reaped yet.
                Ok(_) => continue,
                Err(Errno::EINTR) => continue,
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    fn spawn_sh(script: &str) -> Pid {
        let child = Command::new("sh")
            .arg("-c")
            .arg(script)
            .spawn()
            .expect("spawn sh");
        Pid::from_raw(child.id() as i32)
    }

    #[test]
    fn test_reports_true_exit_code() {
        let pid = spawn_sh("exit 7");
        assert_eq!(ProcessReaper::wait_for(pid), Some(7));
    }

    #[test]
    fn test_abnormal_termination_maps_to_failure() {
        let pid = spawn_sh("kill -9 $$");
        assert_eq!(ProcessReaper::wait_for(pid), Some(EXIT_FAILURE));
    }

    #[test]
    fn test_unknown_pid_yields_none() {
        // Pid::max territory; nothing we spawned.
        assert_eq!(ProcessReaper::wait_for(Pid::from_raw(i32::MAX)), None);
    }

    #[test]
    fn test_waits_for_the_requested_pid_specifically() {
        // An unrelated sibling exits first; the reaper must still report
        // the slower target's own code.
        let _sibling = spawn_sh("exit 0");
        let target = spawn_sh("sleep 0.2; exit 3");
        assert_eq!(ProcessReaper::wait_for(target), Some(3));
    }
}
