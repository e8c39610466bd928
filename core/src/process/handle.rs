//! Owned references to OS processes

use super::{NativeId, NativePlatform, Platform, INVALID_PID};
use tracing::{debug, error, warn};

/// An owned reference to one OS process
///
/// On Unix this is a pid. On Windows it is a process `HANDLE` that this value
/// owns exclusively and closes on drop. A handle built from [`INVALID_PID`]
/// or from a failed lookup/duplication is invalid and never refers to a
/// process; every query on it is well defined.
///
/// `ProcessHandle` is deliberately not `Clone`. Use [`ProcessHandle::duplicate`]
/// to obtain a second, independently owned reference.
#[derive(Debug)]
pub struct ProcessHandle {
    id: NativeId,
}

impl ProcessHandle {
    /// A handle that refers to no process
    pub const fn invalid() -> Self {
        Self { id: INVALID_PID }
    }

    /// Take ownership of an identifier the caller already owns
    pub(crate) fn from_owned(id: NativeId) -> Self {
        Self { id }
    }

    /// A handle for the calling process itself
    pub fn current() -> Self {
        match NativePlatform::current() {
            Ok(id) => Self::from_owned(id),
            Err(e) => {
                error!("Failed to open the current process: {}", e);
                Self::invalid()
            }
        }
    }

    /// Wrap a caller-supplied identifier
    ///
    /// The identifier is duplicated, so the caller keeps ownership of `id`
    /// and may close it without affecting the returned handle. On Windows the
    /// returned [`native_id`](Self::native_id) therefore differs from `id`.
    pub fn from_native(id: NativeId) -> Self {
        if !NativePlatform::is_valid(id) {
            return Self::invalid();
        }
        match NativePlatform::duplicate(id) {
            Ok(dup) => Self::from_owned(dup),
            Err(e) => {
                warn!("Failed to duplicate process identifier {:?}: {}", id, e);
                Self::invalid()
            }
        }
    }

    /// An independently owned handle for the same process
    pub fn duplicate(&self) -> Self {
        Self::from_native(self.id)
    }

    /// Whether this handle refers to a process
    pub fn is_valid(&self) -> bool {
        NativePlatform::is_valid(self.id)
    }

    /// The raw pid or handle; [`INVALID_PID`] for an invalid handle
    pub fn native_id(&self) -> NativeId {
        self.id
    }

    /// The OS process id, or `None` for an invalid handle
    pub fn pid(&self) -> Option<u32> {
        if self.is_valid() {
            NativePlatform::pid(self.id)
        } else {
            None
        }
    }

    /// Forcefully terminate the process, returning `false` on failure
    ///
    /// The handle stays valid so the terminated process can still be waited on.
    pub fn kill(&mut self) -> bool {
        if !self.is_valid() {
            return false;
        }
        match NativePlatform::kill(self.id) {
            Ok(()) => {
                debug!("Killed process {:?}", self.id);
                true
            }
            Err(e) => {
                warn!("Failed to kill process {:?}: {}", self.id, e);
                false
            }
        }
    }

    /// Forget a process that has been reaped
    ///
    /// After a successful wait the pid may be reused by an unrelated process,
    /// so the id is released and the handle becomes invalid.
    pub(crate) fn mark_exited(&mut self) {
        if self.is_valid() {
            NativePlatform::release(self.id);
        }
        self.id = INVALID_PID;
    }
}

impl Default for ProcessHandle {
    fn default() -> Self {
        Self::invalid()
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        if self.is_valid() {
            NativePlatform::release(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_handle_is_invalid() {
        let handle = ProcessHandle::from_native(INVALID_PID);
        assert!(!handle.is_valid());
        assert_eq!(handle.native_id(), INVALID_PID);
        assert_eq!(handle.pid(), None);
    }

    #[test]
    fn test_default_is_invalid() {
        let mut handle = ProcessHandle::default();
        assert!(!handle.is_valid());
        assert!(!handle.kill());
    }

    #[cfg(unix)]
    #[test]
    fn test_process_group_selectors_are_invalid() {
        for id in [0, -2, libc::pid_t::MIN] {
            let mut handle = ProcessHandle::from_native(id);
            assert!(!handle.is_valid(), "pid {} should be invalid", id);
            assert_eq!(handle.pid(), None);
            assert!(!handle.kill());
        }
    }

    #[test]
    fn test_mark_exited_invalidates() {
        let mut handle = ProcessHandle::current();
        handle.mark_exited();
        assert!(!handle.is_valid());
        assert_eq!(handle.native_id(), INVALID_PID);
        assert_eq!(handle.pid(), None);
        assert!(!handle.kill());
    }

    #[test]
    fn test_current_matches_process_id() {
        let handle = ProcessHandle::current();
        assert!(handle.is_valid());
        assert_eq!(handle.pid(), Some(std::process::id()));
    }

    #[test]
    fn test_duplicate_outlives_original() {
        let original = ProcessHandle::current();
        let copy = original.duplicate();
        drop(original);

        assert!(copy.is_valid());
        assert_eq!(copy.pid(), Some(std::process::id()));
    }
}
