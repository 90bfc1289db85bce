use dataveil_core::{EntryId, FieldName};
use dataveil_engine::MaskError;
use thiserror::Error;

/// Errors from dataset store operations. All recoverable at the call
/// boundary; a failed operation leaves the store unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("entry not found: {0}")]
    NotFound(EntryId),

    #[error("unknown field: {0}")]
    UnknownField(FieldName),

    #[error(transparent)]
    Mask(#[from] MaskError),

    #[error("lock poisoned: {0}")]
    Lock(String),

    #[error("export error: {0}")]
    Export(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
