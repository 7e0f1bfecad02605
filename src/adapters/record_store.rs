//! In-memory record storage with tombstone tracking.
//!
//! Records live in one logical store per entity type, keyed by the textual
//! form of their id. Deleted ids go into a tombstone set for the lifetime of
//! the process and are never re-served as live records, so a frontend that
//! deletes something sees it stay deleted.
//!
//! A single coarse lock guards all mutation; the critical sections are small
//! read-modify-write operations and contention is not a concern for a
//! development mock server.

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct RecordStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    /// entity type -> (canonical id -> record)
    records: HashMap<String, HashMap<String, Value>>,
    /// entity type -> deleted ids, in both literal and canonical form
    tombstones: HashMap<String, HashSet<String>>,
    /// Process-wide sequential id counter, never reused across entity types.
    next_id: i64,
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner::default())),
        }
    }

    /// Upsert a record. A record without an `id` is assigned the next
    /// sequential integer id. Returns the stored copy, id included.
    pub async fn store_record(&self, entity_type: &str, mut record: Value) -> Value {
        let mut inner = self.inner.write().await;

        let has_id = record
            .get("id")
            .map(|id| !id.is_null())
            .unwrap_or(false);
        if !has_id {
            if let Some(map) = record.as_object_mut() {
                inner.next_id += 1;
                map.insert("id".to_string(), Value::from(inner.next_id));
            }
        }

        let key = record_key(&record);
        inner
            .records
            .entry(entity_type.to_string())
            .or_default()
            .insert(key, record.clone());
        record
    }

    /// Store a value under an explicit id, for responses that are not objects
    /// and so cannot carry their own `id` field. Returns the stored copy.
    pub async fn store_value(&self, entity_type: &str, id: &str, value: Value) -> Value {
        let mut inner = self.inner.write().await;
        inner
            .records
            .entry(entity_type.to_string())
            .or_default()
            .insert(canonical_id(id), value.clone());
        value
    }

    /// Fetch by id: numeric-coerced lookup first, then literal. Never
    /// auto-creates.
    pub async fn get_record(&self, entity_type: &str, id: &str) -> Option<Value> {
        let inner = self.inner.read().await;
        let records = inner.records.get(entity_type)?;
        records
            .get(&canonical_id(id))
            .or_else(|| records.get(id))
            .cloned()
    }

    /// Merge `patch` over an existing record, keeping `id` immutable.
    /// Returns `None` when no record exists (the caller maps that to 404).
    pub async fn update_record(
        &self,
        entity_type: &str,
        id: &str,
        patch: &Value,
    ) -> Option<Value> {
        let mut inner = self.inner.write().await;
        let records = inner.records.get_mut(entity_type)?;
        let key = if records.contains_key(&canonical_id(id)) {
            canonical_id(id)
        } else if records.contains_key(id) {
            id.to_string()
        } else {
            return None;
        };

        let record = records.get_mut(&key)?;
        if let (Some(target), Some(fields)) = (record.as_object_mut(), patch.as_object()) {
            for (name, value) in fields {
                if name != "id" {
                    target.insert(name.clone(), value.clone());
                }
            }
        }
        Some(record.clone())
    }

    /// Remove a record and tombstone its id. Returns whether a record was
    /// actually removed.
    pub async fn delete_record(&self, entity_type: &str, id: &str) -> bool {
        let mut inner = self.inner.write().await;
        let removed = match inner.records.get_mut(entity_type) {
            Some(records) => records
                .remove(&canonical_id(id))
                .or_else(|| records.remove(id))
                .is_some(),
            None => false,
        };

        if removed {
            let tombstones = inner.tombstones.entry(entity_type.to_string()).or_default();
            tombstones.insert(id.to_string());
            tombstones.insert(canonical_id(id));
        }
        removed
    }

    /// Tombstone membership check, representation-agnostic. Consulted before
    /// any auto-generation path so a deleted id never silently reappears.
    pub async fn is_record_deleted(&self, entity_type: &str, id: &str) -> bool {
        let inner = self.inner.read().await;
        inner
            .tombstones
            .get(entity_type)
            .map(|set| set.contains(id) || set.contains(&canonical_id(id)))
            .unwrap_or(false)
    }

    /// Snapshot of all live records of an entity type.
    pub async fn get_all_records(&self, entity_type: &str) -> Vec<Value> {
        let inner = self.inner.read().await;
        inner
            .records
            .get(entity_type)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical key for an id: numeric ids normalize through i64 so "07", "7",
/// and 7 address the same record; everything else is used literally.
fn canonical_id(id: &str) -> String {
    match id.trim().parse::<i64>() {
        Ok(n) => n.to_string(),
        Err(_) => id.to_string(),
    }
}

fn record_key(record: &Value) -> String {
    match record.get("id") {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => canonical_id(s),
        _ => String::new(),
    }
}
