use crate::error::{MaskError, MaskResult};
use dataveil_core::EntryId;
use std::collections::HashMap;
use std::sync::Mutex;
use zeroize::Zeroizing;

/// Bytes of entropy per entry secret (256 bits).
pub const SECRET_LEN: usize = 32;

/// One randomly generated secret per tokenized entry, keyed by entry id.
///
/// The secret keys the tokenization digest for every `tokenize` field of
/// that entry, so two tokenized fields of one record share key material
/// while distinct records never do. Secrets are held zeroized-on-drop and
/// never leave the engine crate.
pub struct SecretStore {
    secrets: Mutex<HashMap<EntryId, Zeroizing<[u8; SECRET_LEN]>>>,
}

fn lock_secrets(
    mutex: &Mutex<HashMap<EntryId, Zeroizing<[u8; SECRET_LEN]>>>,
) -> MaskResult<std::sync::MutexGuard<'_, HashMap<EntryId, Zeroizing<[u8; SECRET_LEN]>>>> {
    mutex
        .lock()
        .map_err(|e| MaskError::Secret(format!("lock poisoned: {}", e)))
}

impl SecretStore {
    pub fn new() -> Self {
        Self {
            secrets: Mutex::new(HashMap::new()),
        }
    }

    /// Return the existing secret for `id`, or generate, store, and return
    /// a fresh cryptographically random one.
    pub fn get_or_create(&self, id: EntryId) -> MaskResult<Zeroizing<[u8; SECRET_LEN]>> {
        let mut secrets = lock_secrets(&self.secrets)?;
        if let Some(secret) = secrets.get(&id) {
            return Ok(secret.clone());
        }

        use rand::RngCore;
        let mut bytes = Zeroizing::new([0u8; SECRET_LEN]);
        rand::rngs::OsRng.fill_bytes(&mut *bytes);
        secrets.insert(id, bytes.clone());
        Ok(bytes)
    }

    /// Remove the secret for `id`. Called on entry deletion and on cache
    /// invalidation, so a re-mask derives fresh tokens. Returns whether a
    /// secret was present.
    pub fn remove(&self, id: EntryId) -> MaskResult<bool> {
        let mut secrets = lock_secrets(&self.secrets)?;
        Ok(secrets.remove(&id).is_some())
    }

    pub fn contains(&self, id: EntryId) -> MaskResult<bool> {
        let secrets = lock_secrets(&self.secrets)?;
        Ok(secrets.contains_key(&id))
    }

    /// Number of stored secrets (for inspection in tests).
    pub fn count(&self) -> usize {
        lock_secrets(&self.secrets).map(|s| s.len()).unwrap_or(0)
    }
}

impl Default for SecretStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_is_stable() {
        let store = SecretStore::new();
        let id = EntryId::new(1);

        let first = store.get_or_create(id).unwrap();
        let second = store.get_or_create(id).unwrap();
        assert_eq!(&*first, &*second);
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_distinct_entries_get_distinct_secrets() {
        let store = SecretStore::new();
        let a = store.get_or_create(EntryId::new(1)).unwrap();
        let b = store.get_or_create(EntryId::new(2)).unwrap();
        assert_ne!(&*a, &*b);
    }

    #[test]
    fn test_remove_then_recreate_rotates() {
        let store = SecretStore::new();
        let id = EntryId::new(9);

        let before = store.get_or_create(id).unwrap();
        assert!(store.remove(id).unwrap());
        assert!(!store.contains(id).unwrap());

        let after = store.get_or_create(id).unwrap();
        assert_ne!(&*before, &*after);
    }

    #[test]
    fn test_remove_absent() {
        let store = SecretStore::new();
        assert!(!store.remove(EntryId::new(404)).unwrap());
    }
}
