//! Blocking waits on launched processes

use super::{ExitOutcome, NativePlatform, Platform, ProcessHandle};
use crate::{CoreError, Result};
use tracing::{debug, warn};

/// Block until the process exits and report how it ended
///
/// A successful wait reaps the process: the handle is released and becomes
/// invalid, so a second wait fails instead of observing a reused pid.
/// There is no timeout; the calling thread is blocked for the remaining
/// lifetime of the process. Terminate the process out of band (for example
/// with [`ProcessHandle::kill`] from another holder) to unblock a waiter.
///
/// # Errors
///
/// Returns [`CoreError::ProcessWait`] for an invalid handle, when the OS wait
/// primitive fails (for example the process is not a child of the caller),
/// or when no exit code can be retrieved.
pub fn wait_for_exit_status(handle: &mut ProcessHandle) -> Result<ExitOutcome> {
    if !handle.is_valid() {
        return Err(CoreError::ProcessWait(
            "cannot wait on an invalid process handle".to_string(),
        ));
    }

    let pid = handle.pid();
    let outcome = NativePlatform::wait(handle.native_id())?;
    debug!("Process {:?} finished: {:?}", pid, outcome);
    handle.mark_exited();
    Ok(outcome)
}

/// Block until the process exits and return its exit code
///
/// Returns `None` without blocking for an invalid handle. Also returns `None`
/// when the wait itself fails or the process terminated abnormally (killed by
/// a signal): in both cases no exit code exists. A returned code is the
/// process's exit status, untransformed. The handle is invalid afterwards
/// whenever the process was reaped.
pub fn wait_for_exit(handle: &mut ProcessHandle) -> Option<i32> {
    let pid = handle.pid();
    match wait_for_exit_status(handle) {
        Ok(ExitOutcome::Exited(code)) => Some(code),
        Ok(ExitOutcome::Signaled(signal)) => {
            debug!("Process {:?} was terminated by signal {}", pid, signal);
            None
        }
        Err(e) => {
            warn!("Failed to wait for process {:?}: {}", pid, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::INVALID_PID;

    #[test]
    fn test_invalid_handle_does_not_block() {
        let mut handle = ProcessHandle::from_native(INVALID_PID);
        assert_eq!(wait_for_exit(&mut handle), None);
        match wait_for_exit_status(&mut handle) {
            Err(CoreError::ProcessWait(_)) => {}
            other => panic!("Expected ProcessWait error, got: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_waiting_on_non_child_fails() {
        // The current process is not a child of itself, so waitpid reports ECHILD
        let mut handle = ProcessHandle::current();
        assert_eq!(wait_for_exit(&mut handle), None);
        // A failed wait reaped nothing, so the handle is kept
        assert!(handle.is_valid());
    }
}
