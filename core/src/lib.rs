//! Core functionality for the Hatch project
//!
//! Hatch launches privilege-separated worker processes and out-of-process
//! extensions, identifies them through owned [`ProcessHandle`]s, and waits for
//! them to exit, with one contract across Unix pids and Windows handles.
//! Process-wide environment access lives in [`env`] so parents can hand
//! parameters to the children they spawn.

pub mod args;
pub mod config;
pub mod env;
pub mod error;
#[doc(hidden)]
pub mod fixtures;
pub mod process;

#[cfg(test)]
mod error_tests;

pub use config::ExtensionSettings;
pub use env::Environment;
pub use error::{CoreError, Result};
pub use process::{
    launch_extension, launch_worker, wait_for_exit, wait_for_exit_status, ExitOutcome,
    LaunchSpec, ProcessHandle, INVALID_PID,
};

/// Core utilities and helper functions
pub mod utils {
    use tracing::info;

    /// Initialize tracing for the application
    ///
    /// Logs go to stderr so that processes launched as workers or extensions
    /// keep stdout free for their own protocol.
    pub fn init_tracing(level: &str) -> crate::Result<()> {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| crate::CoreError::InitializationError(e.to_string()))?;

        info!("Tracing initialized with level: {}", level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_fails() {
        // The first call may race with other tests; the second must always fail
        let _ = utils::init_tracing("debug");
        match utils::init_tracing("debug") {
            Err(CoreError::InitializationError(_)) => {}
            other => panic!("Expected InitializationError, got: {:?}", other),
        }
    }
}
