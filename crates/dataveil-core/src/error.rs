use thiserror::Error;

/// Errors shared across the dataveil crates.
///
/// Display implementations never contain raw field values — configuration
/// and provider messages only.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("synthetic provider error: {0}")]
    Provider(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::InvalidConfiguration("negative redact length".into());
        assert_eq!(
            format!("{}", err),
            "invalid configuration: negative redact length"
        );
    }

    #[test]
    fn test_core_result_type_alias() {
        fn ok_fn() -> CoreResult<u32> {
            Ok(7)
        }
        assert_eq!(ok_fn().unwrap(), 7);
    }
}
