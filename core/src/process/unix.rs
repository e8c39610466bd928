//! Unix process backend built on pids and `waitpid`
//!
//! ## Identity
//!
//! A process is named by its pid. Pids are plain integers, so "duplicating"
//! one is a copy and releasing one is a no-op; ownership only matters for the
//! handle-based Windows backend.
//!
//! ## Spawning
//!
//! Children are started through `std::process::Command`, which forks and
//! execs and reports exec failures back to the parent over a close-on-exec
//! pipe. A failed exec is therefore an error here, never a pid for a process
//! that is about to exit with a bogus status. `argv[0]` is set explicitly so
//! worker markers reach the child untouched.
//!
//! `PATH` is never searched. A bare name such as `sh` is resolved against the
//! working directory, matching how `CreateProcessW` treats an application
//! name on Windows.
//!
//! ## Waiting
//!
//! `waitpid` is retried on `EINTR`. Normal exit yields the exit status;
//! termination by signal yields [`ExitOutcome::Signaled`], never a code.

use super::{ExitOutcome, Platform};
use crate::{CoreError, Result};
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{getpid, Pid};
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::Command;
use tracing::{debug, error};

/// Unix implementation of [`Platform`]
#[derive(Copy, Clone, Debug, Default)]
pub struct UnixPlatform;

impl Platform for UnixPlatform {
    type NativeId = libc::pid_t;

    const INVALID_ID: libc::pid_t = -1;

    // 0 and negative values select process groups in waitpid/kill
    fn is_valid(id: libc::pid_t) -> bool {
        id > 0
    }

    fn current() -> Result<libc::pid_t> {
        Ok(getpid().as_raw())
    }

    fn duplicate(id: libc::pid_t) -> Result<libc::pid_t> {
        Ok(id)
    }

    fn release(_id: libc::pid_t) {}

    fn pid(id: libc::pid_t) -> Option<u32> {
        u32::try_from(id).ok()
    }

    fn spawn(executable: &Path, argv: &[String]) -> Result<libc::pid_t> {
        // Command only consults PATH for names without a separator
        let program = match executable.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => executable.to_path_buf(),
            _ => Path::new(".").join(executable),
        };
        let mut command = Command::new(&program);
        if let Some((arg0, rest)) = argv.split_first() {
            command.arg0(arg0).args(rest);
        }

        let child = command.spawn().map_err(|e| {
            CoreError::ProcessSpawn(format!("Failed to spawn '{}': {}", executable.display(), e))
        })?;

        // Dropping `Child` neither kills nor reaps; the pid is reaped by `wait`
        let raw_pid = libc::pid_t::try_from(child.id()).map_err(|_| {
            CoreError::ProcessSpawn(format!("Spawned child pid {} out of range", child.id()))
        })?;
        debug!("Spawned process {} from '{}'", raw_pid, executable.display());
        Ok(raw_pid)
    }

    fn wait(id: libc::pid_t) -> Result<ExitOutcome> {
        let pid = Pid::from_raw(id);
        loop {
            match waitpid(pid, None) {
                Ok(WaitStatus::Exited(_, code)) => return Ok(ExitOutcome::Exited(code)),
                Ok(WaitStatus::Signaled(_, signal, _)) => {
                    return Ok(ExitOutcome::Signaled(signal as i32))
                }
                Ok(status) => {
                    debug!("Process {} reported {:?}, still waiting", pid, status);
                }
                Err(Errno::EINTR) => continue,
                Err(e) => {
                    error!("waitpid failed for process {}: {}", pid, e);
                    return Err(CoreError::ProcessWait(format!(
                        "Failed to wait for process {}: {}",
                        pid, e
                    )));
                }
            }
        }
    }

    fn kill(id: libc::pid_t) -> Result<()> {
        let pid = Pid::from_raw(id);
        debug!("Sending SIGKILL to process {}", pid);

        match kill(pid, Signal::SIGKILL) {
            Ok(()) => Ok(()),
            Err(Errno::ESRCH) => Err(CoreError::ProcessSignal(format!(
                "Process {} does not exist",
                pid
            ))),
            Err(e) => {
                error!("Failed to send SIGKILL to process {}: {}", pid, e);
                Err(CoreError::ProcessSignal(format!(
                    "Failed to send SIGKILL to process {}: {}",
                    pid, e
                )))
            }
        }
    }
}
