use crate::error::{MaskError, MaskResult};
use crate::secret::{SecretStore, SECRET_LEN};
use dataveil_core::{Entry, EntryId, FieldName, FieldPolicy, MaskedEntry, PolicyMap, SyntheticProvider};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use tracing::debug;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

const MASK_CHAR: char = '*';

/// Deterministic replacement derived from field name and entry id.
/// Collision-free across distinct (field, id) pairs.
pub fn pseudonymize(field: &FieldName, id: EntryId) -> String {
    format!("{}_{}", field, id)
}

/// Partial masking preserving the last `visible_suffix` characters.
///
/// Character-wise, not byte-wise, so multi-byte values redact cleanly.
/// A suffix length covering the whole value passes it through unchanged.
pub fn redact(value: &str, visible_suffix: usize) -> String {
    let total = value.chars().count();
    if visible_suffix >= total {
        return value.to_string();
    }
    let hidden = total - visible_suffix;
    let mut out = String::with_capacity(value.len());
    out.extend(std::iter::repeat(MASK_CHAR).take(hidden));
    out.extend(value.chars().skip(hidden));
    out
}

/// One-way keyed digest of a raw value under a per-entry secret,
/// rendered as hex. Not reversible without the secret, which never
/// leaves the engine.
fn tokenize(value: &str, secret: &[u8; SECRET_LEN]) -> MaskResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| MaskError::Secret(format!("invalid digest key: {}", e)))?;
    mac.update(value.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// The masking policy engine: maps (field, policy, raw value) to a
/// transformed value, one entry at a time.
///
/// The engine owns the per-entry secret store and the synthetic value
/// provider. It never mutates raw entries and never caches output; the
/// dataset store decides what to keep.
pub struct MaskingEngine {
    provider: Arc<dyn SyntheticProvider>,
    secrets: SecretStore,
}

impl MaskingEngine {
    pub fn new(provider: Arc<dyn SyntheticProvider>) -> Self {
        Self {
            provider,
            secrets: SecretStore::new(),
        }
    }

    /// Produce the masked counterpart of `entry`.
    ///
    /// Fails with `PolicyMissing` if any field of the entry has no policy,
    /// and with `Provider` if synthetic generation fails; in both cases no
    /// partial output is returned. The only side effect is writing the
    /// entry's secret when a `tokenize` field is processed — all tokenized
    /// fields of one pass share that secret.
    pub fn mask_entry(
        &self,
        id: EntryId,
        entry: &Entry,
        policies: &PolicyMap,
    ) -> MaskResult<MaskedEntry> {
        let mut secret: Option<Zeroizing<[u8; SECRET_LEN]>> = None;
        let mut masked = MaskedEntry::with_capacity(entry.len());

        for (field, value) in entry {
            let policy = policies
                .get(field)
                .ok_or_else(|| MaskError::PolicyMissing(field.clone()))?;

            let output = match policy {
                FieldPolicy::None => value.clone(),
                FieldPolicy::Pseudonymize => pseudonymize(field, id),
                FieldPolicy::Tokenize => {
                    if secret.is_none() {
                        secret = Some(self.secrets.get_or_create(id)?);
                    }
                    // Unwrap is fine: just populated above.
                    tokenize(value, secret.as_ref().unwrap())?
                }
                FieldPolicy::Redact { visible_suffix } => redact(value, *visible_suffix),
                FieldPolicy::Mask { category } => self
                    .provider
                    .generate(*category)
                    .map_err(|e| MaskError::Provider(e.to_string()))?,
            };
            masked.insert(field.clone(), output);
        }

        debug!(entry_id = %id, fields = masked.len(), "masked entry");
        Ok(masked)
    }

    /// Drop the per-entry secret, so the next masking pass derives fresh
    /// token values. Called by the dataset store on deletion and on cache
    /// invalidation.
    pub fn drop_secret(&self, id: EntryId) -> MaskResult<bool> {
        self.secrets.remove(id)
    }

    /// Whether a secret is currently stored for `id` (for inspection).
    pub fn has_secret(&self, id: EntryId) -> MaskResult<bool> {
        self.secrets.contains(id)
    }
}
