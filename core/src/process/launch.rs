//! Worker and extension launch conventions

use super::{NativePlatform, Platform, ProcessHandle};
use crate::{CoreError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// What to launch and with which arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchSpec {
    /// A worker receives `argv` verbatim; by convention `argv[0]` is a worker marker
    Worker {
        executable: PathBuf,
        argv: Vec<String>,
    },
    /// An extension receives six positional arguments in this exact order
    Extension {
        executable: PathBuf,
        name: String,
        socket: String,
        timeout: String,
        interval: String,
        verbose: String,
    },
}

impl LaunchSpec {
    /// Path of the image to execute
    pub fn executable(&self) -> &Path {
        match self {
            LaunchSpec::Worker { executable, .. } | LaunchSpec::Extension { executable, .. } => {
                executable
            }
        }
    }

    /// The argument vector the child will observe
    ///
    /// For extensions this is `[executable, name, socket, timeout, interval, verbose]`.
    /// A worker with an empty `argv` gets the executable path as `argv[0]`.
    pub fn argv(&self) -> Vec<String> {
        match self {
            LaunchSpec::Worker { executable, argv } if argv.is_empty() => {
                vec![executable.to_string_lossy().into_owned()]
            }
            LaunchSpec::Worker { argv, .. } => argv.clone(),
            LaunchSpec::Extension {
                executable,
                name,
                socket,
                timeout,
                interval,
                verbose,
            } => vec![
                executable.to_string_lossy().into_owned(),
                name.clone(),
                socket.clone(),
                timeout.clone(),
                interval.clone(),
                verbose.clone(),
            ],
        }
    }

    /// Spawn the process this value describes
    ///
    /// The executable is taken as a path and `PATH` is never searched; a bare
    /// name resolves against the working directory. On Windows `argv[0]` may
    /// not contain `"`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ProcessSpawn`] if the image cannot be executed or
    /// an argument cannot be passed to the OS.
    pub fn try_launch(&self) -> Result<ProcessHandle> {
        let executable = self.executable();
        let argv = self.argv();

        if let Some(bad) = argv.iter().find(|a| a.contains('\0')) {
            return Err(CoreError::ProcessSpawn(format!(
                "argument {:?} contains a NUL byte",
                bad
            )));
        }

        debug!("Launching {} {:?}", executable.display(), argv);
        let id = NativePlatform::spawn(executable, &argv).map_err(|e| {
            error!("Failed to launch '{}': {}", executable.display(), e);
            e
        })?;

        let handle = ProcessHandle::from_owned(id);
        debug!(
            "Launched '{}' as pid {:?}",
            executable.display(),
            handle.pid()
        );
        Ok(handle)
    }

    /// Spawn the process, returning `None` on failure
    pub fn launch(&self) -> Option<ProcessHandle> {
        self.try_launch().ok()
    }
}

/// The literal token an extension receives for its verbosity flag
pub fn verbose_token(verbose: bool) -> &'static str {
    if verbose {
        "true"
    } else {
        "false"
    }
}

/// Launch a worker, passing `argv` to the child exactly as given
///
/// # Errors
///
/// Returns [`CoreError::ProcessSpawn`] if the worker cannot be started.
pub fn try_launch_worker<S: AsRef<str>>(
    executable: impl AsRef<Path>,
    argv: &[S],
) -> Result<ProcessHandle> {
    LaunchSpec::Worker {
        executable: executable.as_ref().to_path_buf(),
        argv: argv.iter().map(|a| a.as_ref().to_string()).collect(),
    }
    .try_launch()
}

/// Launch a worker, passing `argv` to the child exactly as given
///
/// Returns `None` if the process could not be started; a returned handle
/// always refers to a process that was successfully executed.
pub fn launch_worker<S: AsRef<str>>(
    executable: impl AsRef<Path>,
    argv: &[S],
) -> Option<ProcessHandle> {
    try_launch_worker(executable, argv).ok()
}

/// Launch an extension with the six-field positional contract
///
/// # Errors
///
/// Returns [`CoreError::ProcessSpawn`] if the extension cannot be started.
pub fn try_launch_extension(
    executable: impl AsRef<Path>,
    name: &str,
    socket: &str,
    timeout: &str,
    interval: &str,
    verbose: &str,
) -> Result<ProcessHandle> {
    LaunchSpec::Extension {
        executable: executable.as_ref().to_path_buf(),
        name: name.to_string(),
        socket: socket.to_string(),
        timeout: timeout.to_string(),
        interval: interval.to_string(),
        verbose: verbose.to_string(),
    }
    .try_launch()
}

/// Launch an extension with the six-field positional contract
///
/// The child observes `[executable, name, socket, timeout, interval, verbose]`
/// as its arguments. Returns `None` if the process could not be started.
pub fn launch_extension(
    executable: impl AsRef<Path>,
    name: &str,
    socket: &str,
    timeout: &str,
    interval: &str,
    verbose: &str,
) -> Option<ProcessHandle> {
    try_launch_extension(executable, name, socket, timeout, interval, verbose).ok()
}
