//! dataveil
//!
//! Interactive field-level data masking tool. An operator names a dataset,
//! declares its fields, binds one masking policy per field, and then adds,
//! edits, masks, and exports entries from a menu loop. The semantics live
//! in the library crates: `dataveil-engine` (the policy transforms and the
//! per-entry secrets) and `dataveil-store` (entries, the masked cache, and
//! its invalidation rule).

pub mod shell;

pub use shell::{run, ShellError, ShellOptions, ShellResult};
