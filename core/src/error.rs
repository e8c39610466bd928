//! Core error types and utilities

use thiserror::Error;

/// Core-specific error types
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Initialization error: {0}")]
    InitializationError(String),

    #[error("Process spawn error: {0}")]
    ProcessSpawn(String),

    #[error("Process wait error: {0}")]
    ProcessWait(String),

    #[error("Process signal error: {0}")]
    ProcessSignal(String),

    #[error("Handle duplication error: {0}")]
    HandleDuplication(String),

    #[error("Environment error: {0}")]
    Environment(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CoreError {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::ConfigurationError(_) => "CORE001",
            CoreError::ValidationError(_) => "CORE002",
            CoreError::InitializationError(_) => "CORE003",
            CoreError::ProcessSpawn(_) => "CORE010",
            CoreError::ProcessWait(_) => "CORE011",
            CoreError::ProcessSignal(_) => "CORE012",
            CoreError::HandleDuplication(_) => "CORE013",
            CoreError::Environment(_) => "CORE020",
            CoreError::IoError(_) => "CORE005",
        }
    }
}

/// Core-specific result type
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CoreError::ConfigurationError("test".to_string()).code(), "CORE001");
        assert_eq!(CoreError::ValidationError("test".to_string()).code(), "CORE002");
        assert_eq!(CoreError::InitializationError("test".to_string()).code(), "CORE003");
        assert_eq!(CoreError::ProcessSpawn("test".to_string()).code(), "CORE010");
        assert_eq!(CoreError::ProcessWait("test".to_string()).code(), "CORE011");
        assert_eq!(CoreError::ProcessSignal("test".to_string()).code(), "CORE012");
        assert_eq!(CoreError::HandleDuplication("test".to_string()).code(), "CORE013");
        assert_eq!(CoreError::Environment("test".to_string()).code(), "CORE020");
    }

    #[test]
    fn test_error_display() {
        let error = CoreError::ProcessSpawn("image not found".to_string());
        assert_eq!(error.to_string(), "Process spawn error: image not found");
    }

    #[test]
    fn test_codes_are_unique() {
        let codes = [
            CoreError::ConfigurationError(String::new()).code(),
            CoreError::ValidationError(String::new()).code(),
            CoreError::InitializationError(String::new()).code(),
            CoreError::ProcessSpawn(String::new()).code(),
            CoreError::ProcessWait(String::new()).code(),
            CoreError::ProcessSignal(String::new()).code(),
            CoreError::HandleDuplication(String::new()).code(),
            CoreError::Environment(String::new()).code(),
            CoreError::IoError(std::io::Error::other("x")).code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
