//! Integration tests for process identity
//!
//! These tests verify that `ProcessHandle`:
//! - Treats the sentinel identifier as invalid
//! - Identifies the calling process
//! - Duplicates native identifiers into independently owned handles

#![allow(unsafe_code)] // Required for OS calls that produce raw identifiers

use hatch_core::{ProcessHandle, INVALID_PID};

#[test]
fn test_constructor() {
    let p = ProcessHandle::from_native(INVALID_PID);
    assert!(!p.is_valid());
    assert_eq!(p.pid(), None);
}

#[cfg(unix)]
#[test]
fn test_constructor_posix() {
    let pid = unsafe { libc::getpid() };
    let p = ProcessHandle::from_native(pid);
    assert!(p.is_valid());
    assert_eq!(p.native_id(), pid);
}

#[cfg(windows)]
#[test]
fn test_constructor_windows() {
    use windows_sys::Win32::Foundation::{CloseHandle, FALSE};
    use windows_sys::Win32::System::Threading::{
        GetCurrentProcessId, OpenProcess, PROCESS_ALL_ACCESS,
    };

    let handle = unsafe { OpenProcess(PROCESS_ALL_ACCESS, FALSE, GetCurrentProcessId()) };
    assert_ne!(handle, 0);

    let p = ProcessHandle::from_native(handle);
    assert!(p.is_valid());
    assert_ne!(p.native_id(), handle);

    // Closing the source must not affect the duplicate
    unsafe { CloseHandle(handle) };
    assert_eq!(p.pid(), Some(std::process::id()));
}

#[test]
fn test_getpid() {
    let process = ProcessHandle::current();
    assert!(process.is_valid());
    assert_eq!(process.pid(), Some(std::process::id()));
}

#[test]
fn test_duplicate_refers_to_same_process() {
    let process = ProcessHandle::current();
    let copy = process.duplicate();

    assert!(copy.is_valid());
    assert_eq!(copy.pid(), process.pid());

    #[cfg(windows)]
    assert_ne!(copy.native_id(), process.native_id());
    #[cfg(unix)]
    assert_eq!(copy.native_id(), process.native_id());
}

#[test]
fn test_duplicate_of_invalid_is_invalid() {
    let invalid = ProcessHandle::invalid();
    assert!(!invalid.duplicate().is_valid());
}
