// crates/custodian-core/src/runtime/memory.rs
// ============================================================================
// Module: In-Memory Record Store
// Description: Volatile RecordStore with deep-copy semantics for every access.
// Purpose: Provide the reference backend and test-isolation storage tier.
// Dependencies: crate::core, crate::interfaces, serde_json
// ============================================================================

//! ## Overview
//! The in-memory store keeps records as JSON values behind a mutex and
//! round-trips through serialization on every save and load, so values handed
//! to callers are always independent copies: mutating a returned record never
//! affects what a subsequent load returns. Insertion order is tracked
//! explicitly so listings and pagination are stable and deterministic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Mutex;

use serde_json::Value;

use crate::core::identifiers::generate_record_id;
use crate::core::time::Timestamp;
use crate::interfaces::FilterSupport;
use crate::interfaces::RecordStore;
use crate::interfaces::StorageError;
use crate::interfaces::StorageFilter;
use crate::interfaces::StorageRecord;

// ============================================================================
// SECTION: Store State
// ============================================================================

/// Mutable state behind the store mutex.
#[derive(Debug, Default)]
struct MemoryInner {
    /// Records keyed by identifier, stored as detached JSON values.
    records: BTreeMap<String, Value>,
    /// Identifiers in insertion order for deterministic listings.
    order: Vec<String>,
}

/// Volatile record store holding independent JSON copies of every record.
///
/// # Invariants
/// - Save and delete are atomic with respect to the single record they touch.
/// - `order` contains exactly the keys of `records`, in insertion order;
///   overwriting a record keeps its original position.
#[derive(Debug, Default)]
pub struct MemoryStore<T> {
    /// Guarded record map and insertion order.
    inner: Mutex<MemoryInner>,
    /// Marker tying the store to its record type.
    _marker: PhantomData<fn() -> T>,
}

impl<T> MemoryStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Mutex::new(MemoryInner::default()), _marker: PhantomData }
    }

    /// Removes every record. Intended for test isolation.
    pub fn reset(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.records.clear();
            inner.order.clear();
        }
    }
}

/// Maps a poisoned-mutex failure into the storage taxonomy.
fn lock_poisoned() -> StorageError {
    StorageError::Unknown { message: "memory store mutex poisoned".to_string(), source: None }
}

/// Serializes a record into a detached JSON value.
fn detach<T: StorageRecord>(record: &T) -> Result<Value, StorageError> {
    serde_json::to_value(record).map_err(|source| StorageError::Unknown {
        message: "record serialization failed".to_string(),
        source: Some(Box::new(source)),
    })
}

/// Deserializes a detached JSON value back into a record.
fn attach<T: StorageRecord>(id: &str, value: &Value) -> Result<T, StorageError> {
    serde_json::from_value(value.clone()).map_err(|source| StorageError::InvalidData {
        message: format!("stored record {id} failed to deserialize: {source}"),
    })
}

impl<T: StorageRecord> RecordStore<T> for MemoryStore<T> {
    fn load(&self, id: &str) -> Result<T, StorageError> {
        let inner = self.inner.lock().map_err(|_| lock_poisoned())?;
        let value = inner
            .records
            .get(id)
            .ok_or_else(|| StorageError::NotFound { id: id.to_string() })?;
        attach(id, value)
    }

    fn save(&self, mut record: T) -> Result<String, StorageError> {
        record.validate_structure()?;
        let id = match record.record_id() {
            Some(id) => id.to_string(),
            None => {
                let generated = generate_record_id(T::ID_PREFIX, Timestamp::now());
                record.assign_id(generated.clone());
                generated
            }
        };
        let value = detach(&record)?;
        let mut inner = self.inner.lock().map_err(|_| lock_poisoned())?;
        if inner.records.insert(id.clone(), value).is_none() {
            inner.order.push(id.clone());
        }
        Ok(id)
    }

    fn list(&self, filter: Option<&StorageFilter>) -> Result<Vec<String>, StorageError> {
        let inner = self.inner.lock().map_err(|_| lock_poisoned())?;
        let Some(filter) = filter else {
            return Ok(inner.order.clone());
        };
        let mut matching = Vec::new();
        for id in &inner.order {
            let Some(value) = inner.records.get(id) else {
                continue;
            };
            let record: T = attach(id, value)?;
            let matches = match record.filter_meta() {
                Some(meta) => filter.matches(meta),
                None => filter.is_pagination_only(),
            };
            if matches {
                matching.push(id.clone());
            }
        }
        Ok(filter.paginate(matching))
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().map_err(|_| lock_poisoned())?;
        if inner.records.remove(id).is_none() {
            return Err(StorageError::NotFound { id: id.to_string() });
        }
        inner.order.retain(|existing| existing != id);
        Ok(())
    }

    fn exists(&self, id: &str) -> bool {
        self.inner.lock().map(|inner| inner.records.contains_key(id)).unwrap_or(false)
    }

    fn native_filters(&self) -> FilterSupport {
        FilterSupport::FULL
    }
}
