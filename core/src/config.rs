//! Extension launch settings
//!
//! The timeout, interval and verbosity an extension is launched with can come
//! from a TOML file, from environment variables set by a parent, or from the
//! defaults below. Values are validated with field-path error messages and
//! rendered into the textual tokens of the extension launch contract.

use crate::env::Environment;
use crate::process::{try_launch_extension, verbose_token, ProcessHandle};
use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Environment variable overriding [`ExtensionSettings::timeout_secs`]
pub const ENV_EXTENSION_TIMEOUT: &str = "HATCH_EXTENSION_TIMEOUT";
/// Environment variable overriding [`ExtensionSettings::interval_secs`]
pub const ENV_EXTENSION_INTERVAL: &str = "HATCH_EXTENSION_INTERVAL";
/// Environment variable overriding [`ExtensionSettings::verbose`]
pub const ENV_EXTENSION_VERBOSE: &str = "HATCH_EXTENSION_VERBOSE";

fn default_timeout_secs() -> u64 {
    3
}

fn default_interval_secs() -> u64 {
    3
}

/// Settings shared by every extension launch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExtensionSettings {
    /// Seconds the extension waits for the host socket to appear
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Seconds between the extension's liveness checks of the host
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Whether the extension should log verbosely
    #[serde(default)]
    pub verbose: bool,
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            interval_secs: default_interval_secs(),
            verbose: false,
        }
    }
}

impl ExtensionSettings {
    /// Validate the settings and return `Result<()>` with field-path errors
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(CoreError::ValidationError(
                "timeoutSecs: must be greater than 0".to_string(),
            ));
        }
        if self.interval_secs == 0 {
            return Err(CoreError::ValidationError(
                "intervalSecs: must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Defaults overlaid with any `HATCH_EXTENSION_*` variables that are set
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a variable is present but unparsable,
    /// or a validation error if the result is out of range.
    pub fn from_env(env: &Environment) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(raw) = env.get(ENV_EXTENSION_TIMEOUT) {
            settings.timeout_secs = parse_env_u64(ENV_EXTENSION_TIMEOUT, &raw)?;
        }
        if let Some(raw) = env.get(ENV_EXTENSION_INTERVAL) {
            settings.interval_secs = parse_env_u64(ENV_EXTENSION_INTERVAL, &raw)?;
        }
        if let Some(raw) = env.get(ENV_EXTENSION_VERBOSE) {
            settings.verbose = parse_env_bool(ENV_EXTENSION_VERBOSE, &raw)?;
        }

        settings.validate()?;
        debug!("Extension settings from environment: {:?}", settings);
        Ok(settings)
    }

    /// Launch an extension with these settings
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-range settings, or
    /// [`CoreError::ProcessSpawn`] if the extension cannot be started.
    pub fn launch(
        &self,
        executable: impl AsRef<Path>,
        name: &str,
        socket: &str,
    ) -> Result<ProcessHandle> {
        self.validate()?;
        try_launch_extension(
            executable,
            name,
            socket,
            &self.timeout_secs.to_string(),
            &self.interval_secs.to_string(),
            verbose_token(self.verbose),
        )
    }
}

fn parse_env_u64(key: &str, raw: &str) -> Result<u64> {
    raw.trim().parse().map_err(|e| {
        CoreError::ConfigurationError(format!("{}: invalid number '{}': {}", key, raw, e))
    })
}

fn parse_env_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(CoreError::ConfigurationError(format!(
            "{}: invalid boolean '{}'",
            key, raw
        ))),
    }
}

/// Load extension settings from a TOML file path
pub fn load_extension_settings_from_toml_path(path: impl AsRef<Path>) -> Result<ExtensionSettings> {
    let data = fs::read_to_string(&path).map_err(|e| {
        CoreError::ConfigurationError(format!("Failed to read config {:?}: {}", path.as_ref(), e))
    })?;
    load_extension_settings_from_toml_str(&data)
}

/// Load extension settings from a TOML string
pub fn load_extension_settings_from_toml_str(input: &str) -> Result<ExtensionSettings> {
    let settings: ExtensionSettings = toml::from_str(input)
        .map_err(|e| CoreError::ConfigurationError(format!("TOML parse error: {}", e)))?;
    settings.validate()?;
    Ok(settings)
}
