//! JSON export surface.
//!
//! A dump is a record keyed by string-form entry identifier (ascending),
//! each mapping to its field map with fields in declared order. Snapshots
//! are point-in-time copies, never live views.

use crate::dataset::Dataset;
use crate::error::{StoreError, StoreResult};
use dataveil_core::{Entry, EntryId, FieldName};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::info;

/// Render one entry as a JSON object, fields in declared order.
pub fn entry_dump(fields: &[FieldName], entry: &Entry) -> Value {
    let mut object = Map::with_capacity(entry.len());
    for field in fields {
        if let Some(value) = entry.get(field) {
            object.insert(field.to_string(), Value::String(value.clone()));
        }
    }
    // Undeclared fields (if any) follow the declared ones, sorted.
    let mut extras: Vec<&FieldName> = entry
        .keys()
        .filter(|f| !fields.contains(f))
        .collect();
    extras.sort();
    for field in extras {
        object.insert(field.to_string(), Value::String(entry[field].clone()));
    }
    Value::Object(object)
}

fn rows_to_json(fields: &[FieldName], rows: &[(EntryId, Entry)]) -> Value {
    let mut dump = Map::with_capacity(rows.len());
    for (id, entry) in rows {
        dump.insert(id.to_string(), entry_dump(fields, entry));
    }
    Value::Object(dump)
}

/// Render the raw entries as a JSON dump.
pub fn original_dump(dataset: &Dataset) -> StoreResult<Value> {
    let rows = dataset.raw_snapshot()?;
    Ok(rows_to_json(dataset.fields(), &rows))
}

/// Render the masked cache as a JSON dump. Only entries holding a valid
/// cached mask appear; callers wanting full coverage run `mask_all` first.
pub fn masked_dump(dataset: &Dataset) -> StoreResult<Value> {
    let rows = dataset.masked_snapshot()?;
    Ok(rows_to_json(dataset.fields(), &rows))
}

/// Write a dump to a file as pretty-printed JSON.
pub fn save_to_file(dump: &Value, path: &Path) -> StoreResult<()> {
    let text = serde_json::to_string_pretty(dump)
        .map_err(|e| StoreError::Export(format!("serialization failed: {}", e)))?;
    fs::write(path, text)
        .map_err(|e| StoreError::Export(format!("write {} failed: {}", path.display(), e)))?;
    info!(path = %path.display(), "wrote export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataveil_core::{FieldPolicy, PolicyMap};
    use dataveil_engine::{FixedProvider, MaskingEngine};
    use std::sync::Arc;

    fn dataset() -> Dataset {
        let fields = vec![FieldName::new("name"), FieldName::new("ssn")];
        let mut policies = PolicyMap::new();
        policies.set(FieldName::new("name"), FieldPolicy::None);
        policies.set(FieldName::new("ssn"), FieldPolicy::Redact { visible_suffix: 4 });
        let engine = MaskingEngine::new(Arc::new(FixedProvider::new("x")));
        Dataset::new("people", fields, policies, engine).unwrap()
    }

    fn entry(name: &str, ssn: &str) -> Entry {
        [
            (FieldName::new("name"), name.to_string()),
            (FieldName::new("ssn"), ssn.to_string()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_original_dump_keyed_by_string_id() {
        let ds = dataset();
        ds.add_entry(entry("Alice", "123-45-6789")).unwrap();
        ds.add_entry(entry("Bob", "987-65-4321")).unwrap();

        let dump = original_dump(&ds).unwrap();
        assert_eq!(dump["1"]["name"], "Alice");
        assert_eq!(dump["2"]["name"], "Bob");
    }

    #[test]
    fn test_fields_render_in_declared_order() {
        let ds = dataset();
        ds.add_entry(entry("Alice", "123-45-6789")).unwrap();

        let dump = original_dump(&ds).unwrap();
        let keys: Vec<&String> = dump["1"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["name", "ssn"]);
    }

    #[test]
    fn test_masked_dump_covers_only_cached_masks() {
        let ds = dataset();
        let id1 = ds.add_entry(entry("Alice", "123-45-6789")).unwrap();
        ds.add_entry(entry("Bob", "987-65-4321")).unwrap();
        ds.get_masked(id1).unwrap();

        let dump = masked_dump(&ds).unwrap();
        let object = dump.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(dump["1"]["ssn"], "*******6789");
    }

    #[test]
    fn test_save_to_file_round_trip() {
        let ds = dataset();
        ds.add_entry(entry("Alice", "123-45-6789")).unwrap();
        let dump = original_dump(&ds).unwrap();

        let dir = std::env::temp_dir().join("dataveil-export-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("people_original.txt");
        save_to_file(&dump, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, dump);
        let _ = fs::remove_dir_all(&dir);
    }
}
