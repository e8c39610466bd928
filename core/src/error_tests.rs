#[cfg(test)]
mod tests {
    use crate::error::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_core_error_display() {
        let err = CoreError::ValidationError("timeout_secs: must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: timeout_secs: must be > 0"
        );

        let err = CoreError::ProcessWait("no child 42".to_string());
        assert_eq!(err.to_string(), "Process wait error: no child 42");

        let err = CoreError::ProcessSignal("EPERM".to_string());
        assert_eq!(err.to_string(), "Process signal error: EPERM");

        let err = CoreError::HandleDuplication("access denied".to_string());
        assert_eq!(err.to_string(), "Handle duplication error: access denied");

        let err = CoreError::Environment("key contains '='".to_string());
        assert_eq!(err.to_string(), "Environment error: key contains '='");
    }

    #[test]
    fn test_core_error_from_std_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let core_err: CoreError = io_err.into();

        if let CoreError::IoError(_) = core_err {
            // Expected variant
        } else {
            panic!("Expected CoreError::IoError variant");
        }
        assert_eq!(core_err.code(), "CORE005");
    }

    #[test]
    fn test_io_error_is_exposed_as_source() {
        let core_err: CoreError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(core_err.source().is_some());
    }

    #[test]
    fn test_result_type_alias() {
        #[allow(clippy::unnecessary_wraps)]
        fn returns_result() -> Result<u32> {
            Ok(42)
        }

        fn returns_error() -> Result<u32> {
            Err(CoreError::ProcessSpawn("missing".to_string()))
        }

        assert!(returns_result().is_ok());
        assert!(returns_error().is_err());
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = CoreError::ProcessSpawn("test".to_string());

        let _: &dyn Error = &err;

        // String-backed variants carry no source
        assert!(err.source().is_none());
    }
}
