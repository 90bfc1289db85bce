use crate::error::{StoreError, StoreResult};
use dataveil_core::{Entry, EntryId, FieldName, MaskedEntry, PolicyMap};
use dataveil_engine::MaskingEngine;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tracing::debug;

struct DatasetState {
    entries: HashMap<EntryId, Entry>,
    masked: HashMap<EntryId, MaskedEntry>,
    /// Next identifier to assign. Monotonic: max assigned + 1, never
    /// reused, independent of how many entries currently exist.
    next_id: u64,
}

/// One named dataset: raw entries, their masked-entry cache, the policy
/// map bound at creation, and the masking engine that fills the cache.
///
/// Per entry id the lifecycle is Unmasked → Masked → (field update)
/// → Unmasked → …, with deletion terminal from either state. Any raw
/// mutation discards the cached mask; a stale mask is never served.
///
/// All state sits behind one lock held for the duration of a logical
/// operation, so invalidation and cache population are atomic per id.
pub struct Dataset {
    name: String,
    fields: Vec<FieldName>,
    policies: PolicyMap,
    engine: MaskingEngine,
    state: Mutex<DatasetState>,
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("policies", &self.policies)
            .finish_non_exhaustive()
    }
}

fn lock_state(mutex: &Mutex<DatasetState>) -> StoreResult<std::sync::MutexGuard<'_, DatasetState>> {
    mutex
        .lock()
        .map_err(|e| StoreError::Lock(format!("{}", e)))
}

impl Dataset {
    /// Create a dataset with its declared field set and per-field policies.
    ///
    /// Configuration is validated here, before any entry exists: the name
    /// and field list must be non-empty, fields must be distinct, and
    /// every declared field must carry a policy.
    pub fn new(
        name: impl Into<String>,
        fields: Vec<FieldName>,
        policies: PolicyMap,
        engine: MaskingEngine,
    ) -> StoreResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StoreError::InvalidConfiguration(
                "dataset name cannot be empty".into(),
            ));
        }
        if fields.is_empty() {
            return Err(StoreError::InvalidConfiguration(
                "dataset must declare at least one field".into(),
            ));
        }
        let mut seen = HashSet::new();
        for field in &fields {
            if field.is_empty() {
                return Err(StoreError::InvalidConfiguration(
                    "field names cannot be empty".into(),
                ));
            }
            if !seen.insert(field.clone()) {
                return Err(StoreError::InvalidConfiguration(format!(
                    "duplicate field: {}",
                    field
                )));
            }
            if !policies.covers(field) {
                return Err(StoreError::InvalidConfiguration(format!(
                    "no policy configured for declared field: {}",
                    field
                )));
            }
        }

        Ok(Self {
            name,
            fields,
            policies,
            engine,
            state: Mutex::new(DatasetState {
                entries: HashMap::new(),
                masked: HashMap::new(),
                next_id: 1,
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields, in declaration order (export order).
    pub fn fields(&self) -> &[FieldName] {
        &self.fields
    }

    pub fn policies(&self) -> &PolicyMap {
        &self.policies
    }

    /// Store a raw entry under the next identifier. The masked cache is
    /// untouched — the new entry starts unmasked.
    pub fn add_entry(&self, entry: Entry) -> StoreResult<EntryId> {
        let mut state = lock_state(&self.state)?;
        let id = EntryId::new(state.next_id);
        state.next_id += 1;
        state.entries.insert(id, entry);
        debug!(entry_id = %id, dataset = %self.name, "added entry");
        Ok(id)
    }

    /// Remove the raw entry along with its cached mask and its secret.
    pub fn delete_entry(&self, id: EntryId) -> StoreResult<()> {
        let mut state = lock_state(&self.state)?;
        if state.entries.remove(&id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        state.masked.remove(&id);
        self.engine.drop_secret(id)?;
        debug!(entry_id = %id, dataset = %self.name, "deleted entry");
        Ok(())
    }

    /// Overwrite one raw field value and unconditionally invalidate the
    /// entry's cached mask. The entry's tokenization secret is dropped
    /// with the cache, so a later re-mask derives fresh tokens.
    ///
    /// Checks run before any mutation: `NotFound` for an absent id,
    /// `UnknownField` for a field outside the declared set.
    pub fn update_field(
        &self,
        id: EntryId,
        field: &FieldName,
        value: impl Into<String>,
    ) -> StoreResult<()> {
        let mut state = lock_state(&self.state)?;
        if !state.entries.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if !self.fields.contains(field) {
            return Err(StoreError::UnknownField(field.clone()));
        }

        let entry = state
            .entries
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        entry.insert(field.clone(), value.into());
        state.masked.remove(&id);
        self.engine.drop_secret(id)?;
        debug!(entry_id = %id, field = %field, "updated field, mask invalidated");
        Ok(())
    }

    /// Return the cached mask for `id`, computing and caching it first if
    /// absent. Idempotent with respect to the cache: repeated calls with
    /// no intervening mutation return the identical cached value. On any
    /// masking failure nothing is cached.
    pub fn get_masked(&self, id: EntryId) -> StoreResult<MaskedEntry> {
        let mut state = lock_state(&self.state)?;
        if let Some(masked) = state.masked.get(&id) {
            return Ok(masked.clone());
        }
        let entry = state.entries.get(&id).ok_or(StoreError::NotFound(id))?;
        let masked = self.engine.mask_entry(id, entry, &self.policies)?;
        state.masked.insert(id, masked.clone());
        Ok(masked)
    }

    /// Mask every entry that currently lacks a cached mask. Entries
    /// already masked are left untouched — no re-masking, no secret
    /// rotation. Returns how many entries were newly masked.
    pub fn mask_all(&self) -> StoreResult<usize> {
        let mut state = lock_state(&self.state)?;
        let pending: Vec<EntryId> = state
            .entries
            .keys()
            .filter(|id| !state.masked.contains_key(id))
            .copied()
            .collect();

        for id in &pending {
            let entry = state.entries.get(id).ok_or(StoreError::NotFound(*id))?;
            let masked = self.engine.mask_entry(*id, entry, &self.policies)?;
            state.masked.insert(*id, masked);
        }
        debug!(count = pending.len(), dataset = %self.name, "masked pending entries");
        Ok(pending.len())
    }

    pub fn get_entry(&self, id: EntryId) -> StoreResult<Entry> {
        let state = lock_state(&self.state)?;
        state
            .entries
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Whether `id` currently holds a valid cached mask.
    pub fn is_masked(&self, id: EntryId) -> StoreResult<bool> {
        let state = lock_state(&self.state)?;
        if !state.entries.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        Ok(state.masked.contains_key(&id))
    }

    /// All current entry identifiers, ascending.
    pub fn entry_ids(&self) -> StoreResult<Vec<EntryId>> {
        let state = lock_state(&self.state)?;
        let mut ids: Vec<EntryId> = state.entries.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }

    pub fn len(&self) -> usize {
        lock_state(&self.state).map(|s| s.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point-in-time copy of the raw entries, ascending by id.
    pub fn raw_snapshot(&self) -> StoreResult<Vec<(EntryId, Entry)>> {
        let state = lock_state(&self.state)?;
        let mut rows: Vec<(EntryId, Entry)> = state
            .entries
            .iter()
            .map(|(id, e)| (*id, e.clone()))
            .collect();
        rows.sort_by_key(|(id, _)| *id);
        Ok(rows)
    }

    /// Point-in-time copy of the masked cache, ascending by id. Contains
    /// only entries whose mask is currently valid.
    pub fn masked_snapshot(&self) -> StoreResult<Vec<(EntryId, MaskedEntry)>> {
        let state = lock_state(&self.state)?;
        let mut rows: Vec<(EntryId, MaskedEntry)> = state
            .masked
            .iter()
            .map(|(id, e)| (*id, e.clone()))
            .collect();
        rows.sort_by_key(|(id, _)| *id);
        Ok(rows)
    }
}
