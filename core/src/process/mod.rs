//! Process lifecycle primitives for the Hatch core library
//!
//! This module launches worker and extension processes, identifies processes
//! through an owned [`ProcessHandle`], and blocks until a process exits.
//!
//! ## Platform Support
//!
//! - **Unix**: pids, `fork`/`exec` through `std::process::Command`, `waitpid`
//! - **Windows**: duplicated process `HANDLE`s, `CreateProcessW` with an
//!   encoded command line, `WaitForSingleObject`/`GetExitCodeProcess`
//!
//! Both backends implement [`Platform`]; the rest of the crate talks only to
//! [`NativePlatform`], which is picked at build time.
//!
//! ## Failure reporting
//!
//! Launch, duplication and wait failures never panic. The `try_*` functions
//! return [`crate::CoreError`]; the plain functions log the error and return
//! an invalid handle, `None`, or `false`.

use crate::Result;
use std::fmt;
use std::path::Path;

mod handle;
mod launch;
mod wait;

#[cfg(unix)]
pub mod unix;

#[cfg(windows)]
pub mod windows;

pub use handle::ProcessHandle;
pub use launch::{
    launch_extension, launch_worker, try_launch_extension, try_launch_worker, verbose_token,
    LaunchSpec,
};
pub use wait::{wait_for_exit, wait_for_exit_status};

/// Operations a platform backend must supply
///
/// Every method works on the raw native identifier; ownership and release
/// are handled by [`ProcessHandle`].
pub trait Platform {
    /// The OS identifier for a process (pid or handle)
    type NativeId: Copy + Eq + fmt::Debug + Send + Sync;

    /// Reserved value that never names a real process
    const INVALID_ID: Self::NativeId;

    /// Whether `id` may refer to a real process
    fn is_valid(id: Self::NativeId) -> bool {
        id != Self::INVALID_ID
    }

    /// An owned identifier for the calling process
    fn current() -> Result<Self::NativeId>;

    /// An independently owned identifier for the same process as `id`
    fn duplicate(id: Self::NativeId) -> Result<Self::NativeId>;

    /// Release an identifier obtained from `current`, `duplicate` or `spawn`
    fn release(id: Self::NativeId);

    /// The OS process id behind `id`
    fn pid(id: Self::NativeId) -> Option<u32>;

    /// Start `executable` with `argv` delivered verbatim as the child's arguments
    fn spawn(executable: &Path, argv: &[String]) -> Result<Self::NativeId>;

    /// Block until the process exits and decode how it ended
    fn wait(id: Self::NativeId) -> Result<ExitOutcome>;

    /// Forcefully terminate the process
    fn kill(id: Self::NativeId) -> Result<()>;
}

/// How a waited-on process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Normal termination with the process's own exit status
    Exited(i32),
    /// Terminated by a signal; no exit code exists (Unix only)
    Signaled(i32),
}

impl ExitOutcome {
    /// The exit code, if the process terminated normally
    pub fn code(self) -> Option<i32> {
        match self {
            ExitOutcome::Exited(code) => Some(code),
            ExitOutcome::Signaled(_) => None,
        }
    }
}

/// Backend for the platform this crate was built for
#[cfg(unix)]
pub type NativePlatform = unix::UnixPlatform;

/// Backend for the platform this crate was built for
#[cfg(windows)]
pub type NativePlatform = windows::WindowsPlatform;

/// Native process identifier on this platform
pub type NativeId = <NativePlatform as Platform>::NativeId;

/// Sentinel identifier that never refers to a process
pub const INVALID_PID: NativeId = <NativePlatform as Platform>::INVALID_ID;
