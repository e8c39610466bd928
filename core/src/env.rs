//! Process-wide environment variable access
//!
//! The environment table is global mutable state shared with every thread
//! and inherited by every child spawned afterwards. All access in this crate
//! goes through an [`Environment`] value, which holds a process-wide lock for
//! as long as it lives. Readers and writers that use this type are therefore
//! serialised; code that calls `std::env` directly can still race with them.

use crate::{CoreError, Result};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Exclusive handle on the calling process's environment table
#[derive(Debug)]
pub struct Environment {
    _guard: MutexGuard<'static, ()>,
}

impl Environment {
    /// Acquire the environment, blocking while another holder exists
    pub fn lock() -> Self {
        // A panic while holding the lock cannot leave the table half-written
        let guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        Self { _guard: guard }
    }

    /// Read a variable. Present-but-empty values are returned as `Some("")`.
    pub fn get(&self, key: &str) -> Option<String> {
        if validate_key(key).is_err() {
            return None;
        }
        let value = std::env::var_os(key)?;
        match value.into_string() {
            Ok(value) => Some(value),
            Err(raw) => {
                debug!(key, "environment value is not valid UTF-8, decoding lossily");
                Some(raw.to_string_lossy().into_owned())
            }
        }
    }

    /// Set a variable, overwriting any existing value
    pub fn try_set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        if value.contains('\0') {
            return Err(CoreError::Environment(format!(
                "value for '{}' contains a NUL byte",
                key
            )));
        }
        std::env::set_var(key, value);
        Ok(())
    }

    /// Remove a variable. Removing an absent variable succeeds.
    pub fn try_unset(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        std::env::remove_var(key);
        Ok(())
    }

    /// Set a variable, returning `false` if the key or value is not representable
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        self.try_set(key, value)
            .map_err(|e| warn!("Failed to set environment variable: {}", e))
            .is_ok()
    }

    /// Remove a variable, returning `false` if the key is not representable
    pub fn unset(&mut self, key: &str) -> bool {
        self.try_unset(key)
            .map_err(|e| warn!("Failed to unset environment variable: {}", e))
            .is_ok()
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CoreError::Environment("key cannot be empty".to_string()));
    }
    if key.contains('=') || key.contains('\0') {
        return Err(CoreError::Environment(format!(
            "key '{}' contains '=' or a NUL byte",
            key.escape_debug()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tri_state_round_trip() {
        let mut env = Environment::lock();
        let key = "HATCH_ENV_UNIT_ROUND_TRIP";

        assert_eq!(env.get(key), None);
        assert!(env.set(key, "true"));
        assert_eq!(env.get(key).as_deref(), Some("true"));
        assert!(env.unset(key));
        assert_eq!(env.get(key), None);
    }

    #[test]
    fn test_empty_value_is_present() {
        let mut env = Environment::lock();
        let key = "HATCH_ENV_UNIT_EMPTY";

        assert!(env.set(key, ""));
        assert_eq!(env.get(key).as_deref(), Some(""));
        assert!(env.unset(key));
    }

    #[test]
    fn test_set_overwrites() {
        let mut env = Environment::lock();
        let key = "HATCH_ENV_UNIT_OVERWRITE";

        assert!(env.set(key, "first"));
        assert!(env.set(key, "second"));
        assert_eq!(env.get(key).as_deref(), Some("second"));
        assert!(env.unset(key));
    }

    #[test]
    fn test_unset_is_idempotent() {
        let mut env = Environment::lock();
        let key = "HATCH_ENV_UNIT_NEVER_SET";

        assert!(env.unset(key));
        assert!(env.unset(key));
        assert_eq!(env.get(key), None);
    }

    #[test]
    fn test_unrepresentable_keys_and_values_fail() {
        let mut env = Environment::lock();

        assert!(!env.set("", "value"));
        assert!(!env.set("HATCH=BAD", "value"));
        assert!(!env.set("HATCH_ENV_UNIT_NUL", "a\0b"));
        assert!(!env.unset("HATCH\0BAD"));
        assert_eq!(env.get("HATCH=BAD"), None);

        match env.try_set("", "value") {
            Err(CoreError::Environment(_)) => {}
            other => panic!("Expected Environment error, got: {:?}", other),
        }
    }
}
