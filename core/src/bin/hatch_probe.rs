//! Probe process for launch-contract tests
//!
//! Behavior:
//! - argv equal to the worker fixture: exit with `WORKER_SUCCESS_CODE`
//! - six arguments matching the extension fixture (the socket may be
//!   overridden through `HATCH_PROBE_SOCKET`): exit with `EXTENSION_SUCCESS_CODE`
//! - `--exit-code N`: exit with `N`
//! - `--sleep SECS`: sleep, then exit 0
//! - anything else: exit with `PROBE_MISMATCH_CODE`

use hatch_core::fixtures::*;
use hatch_core::Environment;
use std::process::exit;
use std::time::Duration;
use tracing::debug;

fn is_worker(args: &[String]) -> bool {
    args.iter().map(String::as_str).eq(WORKER_ARGS)
}

fn is_extension(args: &[String]) -> bool {
    let expected_socket = Environment::lock()
        .get(PROBE_SOCKET_ENV)
        .unwrap_or_else(|| EXTENSION_SOCKET.to_string());

    match args {
        [_exe, name, socket, timeout, interval, verbose] => {
            (name == EXTENSION_NAME || name == QUOTED_EXTENSION_NAME)
                && *socket == expected_socket
                && timeout == EXTENSION_TIMEOUT
                && interval == EXTENSION_INTERVAL
                && verbose == EXTENSION_VERBOSE
        }
        _ => false,
    }
}

fn main() {
    let _ = hatch_core::utils::init_tracing("warn");

    let args: Vec<String> = std::env::args_os()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    debug!("hatch_probe received {:?}", args);

    if is_worker(&args) {
        exit(WORKER_SUCCESS_CODE);
    }
    if is_extension(&args) {
        exit(EXTENSION_SUCCESS_CODE);
    }

    match args.get(1).map(String::as_str) {
        Some("--exit-code") => {
            let code = args.get(2).and_then(|s| s.parse().ok());
            exit(code.unwrap_or(PROBE_MISMATCH_CODE));
        }
        Some("--sleep") => {
            let secs = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(60);
            std::thread::sleep(Duration::from_secs(secs));
            exit(0);
        }
        _ => exit(PROBE_MISMATCH_CODE),
    }
}
