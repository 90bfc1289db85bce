//! dataveil-store
//!
//! The dataset store: owns the raw entries and the masked-entry cache,
//! assigns monotonically increasing identifiers, and enforces the
//! invalidation invariant — a masked entry exists for an id iff it has a
//! valid cached mask, destroyed on any raw mutation and recreated only by
//! an explicit masking request. Also carries the JSON export surface.

pub mod dataset;
pub mod error;
pub mod export;

pub use dataset::Dataset;
pub use error::{StoreError, StoreResult};
pub use export::{entry_dump, masked_dump, original_dump, save_to_file};
