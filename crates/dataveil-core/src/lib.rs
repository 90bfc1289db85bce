//! dataveil-core
//!
//! Shared vocabulary for the dataveil masking toolkit: typed identifiers,
//! the field policy sum type, the policy map, and the synthetic-value
//! capability trait. No masking semantics live here — the engine and the
//! dataset store build on these types.

pub mod error;
pub mod traits;
pub mod types;

pub use error::*;
pub use traits::*;
pub use types::*;
