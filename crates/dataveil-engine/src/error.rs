use dataveil_core::FieldName;
use thiserror::Error;

/// Errors raised while masking one entry.
///
/// A failed masking call produces no partial result: callers must not
/// cache anything when one of these comes back.
#[derive(Debug, Error)]
pub enum MaskError {
    #[error("no masking policy configured for field: {0}")]
    PolicyMissing(FieldName),

    #[error("synthetic provider failed: {0}")]
    Provider(String),

    #[error("secret store error: {0}")]
    Secret(String),
}

pub type MaskResult<T> = Result<T, MaskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_missing_names_the_field() {
        let err = MaskError::PolicyMissing(FieldName::new("ssn"));
        assert_eq!(
            format!("{}", err),
            "no masking policy configured for field: ssn"
        );
    }

    #[test]
    fn test_error_display_non_empty() {
        let errors = vec![
            MaskError::PolicyMissing(FieldName::new("email")),
            MaskError::Provider("generator unavailable".into()),
            MaskError::Secret("lock poisoned".into()),
        ];
        for err in errors {
            assert!(!format!("{}", err).is_empty());
        }
    }
}
