//! Launch-contract fixtures shared by the test suite and `hatch_probe`
//!
//! The probe binary exits with one of the sentinel codes below only when the
//! arguments it received match these fixtures exactly, which lets tests check
//! argument delivery end to end through a real spawn.

/// Exit code the probe uses after receiving [`WORKER_ARGS`]
pub const WORKER_SUCCESS_CODE: i32 = 0x2a;

/// Exit code the probe uses after receiving a matching extension contract
pub const EXTENSION_SUCCESS_CODE: i32 = 0x45;

/// Exit code the probe uses when its arguments match no fixture
pub const PROBE_MISMATCH_CODE: i32 = 0x63;

/// Argument vector of the worker fixture; `argv[0]` is the worker marker
pub const WORKER_ARGS: [&str; 4] = [
    "hatch: worker",
    "--worker-id",
    "value with spaces",
    "quoted\"value",
];

/// Extension name of the extension fixture
pub const EXTENSION_NAME: &str = "extension-test";

/// Extension name carrying embedded quote characters
pub const QUOTED_EXTENSION_NAME: &str = "exten\"sion-te\"st";

/// Socket path expected when [`PROBE_SOCKET_ENV`] is unset
pub const EXTENSION_SOCKET: &str = "socket-name";

/// Timeout token of the extension fixture
pub const EXTENSION_TIMEOUT: &str = "100";

/// Interval token of the extension fixture
pub const EXTENSION_INTERVAL: &str = "5";

/// Verbosity token of the extension fixture
pub const EXTENSION_VERBOSE: &str = "true";

/// When set in the probe's environment, the socket path it expects instead
/// of [`EXTENSION_SOCKET`]
pub const PROBE_SOCKET_ENV: &str = "HATCH_PROBE_SOCKET";
