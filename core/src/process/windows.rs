//! Windows process backend built on owned process handles
//!
//! ## Identity
//!
//! A process is named by a `HANDLE` that the holder owns. Wrapping a handle
//! received from elsewhere always goes through `DuplicateHandle`, so the
//! wrapped value can be closed independently of the caller's copy.
//!
//! ## Spawning
//!
//! `CreateProcessW` takes one flat command line rather than an argument
//! vector. The vector is encoded with [`crate::args::encode_command_line`] so
//! the child's runtime splits it back into exactly the original arguments.
//! `argv[0]` follows the stricter program-name rule and may not contain `"`.
//! The application name is passed explicitly, so `PATH` is never searched.
//!
//! ## Waiting
//!
//! `WaitForSingleObject` is retried until the process object is signaled,
//! then `GetExitCodeProcess` supplies the code. A reported `STILL_ACTIVE`
//! after a signaled wait is treated as a failure, not a real exit code.

// Win32 calls are FFI; every block below only passes owned, live handles
#![allow(unsafe_code)]

use super::{ExitOutcome, Platform};
use crate::args::encode_command_line;
use crate::{CoreError, Result};
use std::ffi::OsStr;
use std::iter::once;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use std::{io, mem, ptr};
use tracing::{debug, error};
use windows_sys::Win32::Foundation::{
    CloseHandle, DuplicateHandle, DUPLICATE_SAME_ACCESS, FALSE, HANDLE, INVALID_HANDLE_VALUE,
};
use windows_sys::Win32::System::Threading::{
    CreateProcessW, GetCurrentProcess, GetCurrentProcessId, GetExitCodeProcess, GetProcessId,
    OpenProcess, TerminateProcess, WaitForSingleObject, INFINITE, PROCESS_ALL_ACCESS,
    PROCESS_INFORMATION, STARTUPINFOW,
};

const WAIT_OBJECT_0: u32 = 0x0000_0000;
const WAIT_FAILED: u32 = 0xFFFF_FFFF;
const STILL_ACTIVE: u32 = 259;

/// Exit code given to processes terminated through [`Platform::kill`]
const KILLED_EXIT_CODE: u32 = 1;

/// Windows implementation of [`Platform`]
#[derive(Copy, Clone, Debug, Default)]
pub struct WindowsPlatform;

fn to_wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(once(0)).collect()
}

impl Platform for WindowsPlatform {
    type NativeId = HANDLE;

    const INVALID_ID: HANDLE = INVALID_HANDLE_VALUE;

    fn is_valid(id: HANDLE) -> bool {
        id != INVALID_HANDLE_VALUE && id != 0
    }

    fn current() -> Result<HANDLE> {
        // A real handle rather than the GetCurrentProcess pseudo-handle, so it
        // can be closed and duplicated like any other
        let handle = unsafe { OpenProcess(PROCESS_ALL_ACCESS, FALSE, GetCurrentProcessId()) };
        if handle == 0 {
            return Err(CoreError::IoError(io::Error::last_os_error()));
        }
        Ok(handle)
    }

    fn duplicate(id: HANDLE) -> Result<HANDLE> {
        let mut target: HANDLE = 0;
        let ok = unsafe {
            let me = GetCurrentProcess();
            DuplicateHandle(me, id, me, &mut target, 0, FALSE, DUPLICATE_SAME_ACCESS)
        };
        if ok == 0 {
            let err = io::Error::last_os_error();
            return Err(CoreError::HandleDuplication(format!(
                "DuplicateHandle failed for {:?}: {}",
                id, err
            )));
        }
        Ok(target)
    }

    fn release(id: HANDLE) {
        if unsafe { CloseHandle(id) } == 0 {
            debug!(
                "CloseHandle failed for {:?}: {}",
                id,
                io::Error::last_os_error()
            );
        }
    }

    fn pid(id: HANDLE) -> Option<u32> {
        match unsafe { GetProcessId(id) } {
            0 => None,
            pid => Some(pid),
        }
    }

    fn spawn(executable: &Path, argv: &[String]) -> Result<HANDLE> {
        let application = to_wide(executable.as_os_str());
        let mut command_line = to_wide(OsStr::new(&encode_command_line(argv)?));

        let mut startup: STARTUPINFOW = unsafe { mem::zeroed() };
        startup.cb = mem::size_of::<STARTUPINFOW>() as u32;
        let mut info: PROCESS_INFORMATION = unsafe { mem::zeroed() };

        let ok = unsafe {
            CreateProcessW(
                application.as_ptr(),
                command_line.as_mut_ptr(),
                ptr::null(),
                ptr::null(),
                FALSE,
                0,
                ptr::null(),
                ptr::null(),
                &startup,
                &mut info,
            )
        };
        if ok == 0 {
            let err = io::Error::last_os_error();
            return Err(CoreError::ProcessSpawn(format!(
                "Failed to spawn '{}': {}",
                executable.display(),
                err
            )));
        }

        // Only the process handle is kept
        unsafe { CloseHandle(info.hThread) };
        debug!(
            "Spawned process {} from '{}'",
            info.dwProcessId,
            executable.display()
        );
        Ok(info.hProcess)
    }

    fn wait(id: HANDLE) -> Result<ExitOutcome> {
        loop {
            match unsafe { WaitForSingleObject(id, INFINITE) } {
                WAIT_OBJECT_0 => break,
                WAIT_FAILED => {
                    let err = io::Error::last_os_error();
                    error!("WaitForSingleObject failed for {:?}: {}", id, err);
                    return Err(CoreError::ProcessWait(format!(
                        "Failed to wait for process {:?}: {}",
                        id, err
                    )));
                }
                other => debug!("WaitForSingleObject returned {:#x}, still waiting", other),
            }
        }

        let mut code: u32 = 0;
        if unsafe { GetExitCodeProcess(id, &mut code) } == 0 {
            let err = io::Error::last_os_error();
            return Err(CoreError::ProcessWait(format!(
                "Failed to read exit code of {:?}: {}",
                id, err
            )));
        }
        if code == STILL_ACTIVE {
            return Err(CoreError::ProcessWait(format!(
                "Process {:?} signaled but reports STILL_ACTIVE",
                id
            )));
        }

        // Exit codes are DWORDs; keep the bit pattern
        Ok(ExitOutcome::Exited(code as i32))
    }

    fn kill(id: HANDLE) -> Result<()> {
        if unsafe { TerminateProcess(id, KILLED_EXIT_CODE) } == 0 {
            let err = io::Error::last_os_error();
            error!("TerminateProcess failed for {:?}: {}", id, err);
            return Err(CoreError::ProcessSignal(format!(
                "Failed to terminate process {:?}: {}",
                id, err
            )));
        }
        Ok(())
    }
}
