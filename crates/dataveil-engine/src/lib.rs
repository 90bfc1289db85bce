//! dataveil-engine
//!
//! The masking policy engine and its two collaborators: the per-entry
//! secret store (keyed tokenization material) and the synthetic value
//! provider (fake-data substitution). The engine is a pure transformation
//! over (entry id, raw entry, policy map) — caching and invalidation are
//! the dataset store's concern.
//!
//! Transform semantics:
//! - `none` — pass-through
//! - `pseudonymize` — `"{field}_{id}"`, deterministic
//! - `tokenize` — HMAC-SHA256 of the raw value under a per-entry random
//!   secret, hex-encoded; one secret per entry, shared by all tokenized
//!   fields of a pass, never exposed
//! - `redact(n)` — `*` padding followed by the last `n` characters
//! - `mask(category)` — synthetic replacement from the provider

pub mod engine;
pub mod error;
pub mod secret;
pub mod synthetic;

pub use engine::{pseudonymize, redact, MaskingEngine};
pub use error::{MaskError, MaskResult};
pub use secret::{SecretStore, SECRET_LEN};
pub use synthetic::{FakeProvider, FixedProvider};
