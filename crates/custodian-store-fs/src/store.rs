// crates/custodian-store-fs/src/store.rs
// ============================================================================
// Module: File-Per-Record Store
// Description: Durable RecordStore backed by one JSON file per record.
// Purpose: Persist governed records with sanitized keys and atomic writes.
// Dependencies: custodian-core, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Records live under `root/{prefix}/{id}.json`, where `prefix` comes from
//! the record type. Saves write through a tempfile in the target directory
//! followed by an atomic rename, so a record file is always either the old or
//! the new version, never a torn write. Enumeration sorts by file name;
//! store-generated identifiers sort by creation time, so listing order is
//! creation order.
//!
//! Security posture: identifiers are untrusted input and are validated to a
//! conservative character set before being mapped to a path; traversal is not
//! representable through accepted identifiers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::ErrorKind;
use std::io::Write;
use std::marker::PhantomData;
use std::path::Path;
use std::path::PathBuf;

use custodian_core::FilterSupport;
use custodian_core::RecordStore;
use custodian_core::StorageError;
use custodian_core::StorageFilter;
use custodian_core::StorageRecord;
use custodian_core::Timestamp;
use custodian_core::generate_record_id;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// File extension for stored records.
const RECORD_EXTENSION: &str = "json";

/// Maximum accepted identifier length in bytes.
const MAX_ID_LENGTH: usize = 255;

// ============================================================================
// SECTION: Identifier Sanitization
// ============================================================================

/// Validates an identifier before it is mapped to a storage path.
///
/// Accepted identifiers are non-empty, at most [`MAX_ID_LENGTH`] bytes, use
/// only `[A-Za-z0-9._-]`, and do not start with a dot. Everything capable of
/// expressing path traversal falls outside this set.
fn sanitize_id(id: &str) -> Result<(), StorageError> {
    if id.is_empty() {
        return Err(StorageError::InvalidData {
            message: "record identifier must not be empty".to_string(),
        });
    }
    if id.len() > MAX_ID_LENGTH {
        return Err(StorageError::InvalidData {
            message: format!("record identifier exceeds {MAX_ID_LENGTH} bytes"),
        });
    }
    if id.starts_with('.') {
        return Err(StorageError::InvalidData {
            message: "record identifier must not start with a dot".to_string(),
        });
    }
    if let Some(bad) =
        id.chars().find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(StorageError::InvalidData {
            message: format!("record identifier contains forbidden character '{bad}'"),
        });
    }
    Ok(())
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Durable file-per-record store.
///
/// # Invariants
/// - Saves are atomic per record (tempfile write + rename).
/// - Only pagination is honored natively in listings; see
///   [`FilterSupport::PAGINATION_ONLY`].
#[derive(Debug)]
pub struct FsStore<T> {
    /// Root directory containing the per-prefix record directories.
    root: PathBuf,
    /// Marker tying the store to its record type.
    _marker: PhantomData<fn() -> T>,
}

impl<T: StorageRecord> FsStore<T> {
    /// Creates a store rooted at the given directory.
    ///
    /// The directory tree is created lazily on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), _marker: PhantomData }
    }

    /// Returns the directory holding records of this type.
    fn record_dir(&self) -> PathBuf {
        self.root.join(T::ID_PREFIX)
    }

    /// Returns the path for a sanitized identifier.
    fn record_path(&self, id: &str) -> PathBuf {
        self.record_dir().join(format!("{id}.{RECORD_EXTENSION}"))
    }

    /// Maps an I/O failure on `path` into the storage taxonomy.
    fn io_error(path: &Path, action: &str, source: std::io::Error) -> StorageError {
        StorageError::Connection {
            message: format!("{action} failed for {}", path.display()),
            source: Some(Box::new(source)),
        }
    }
}

impl<T: StorageRecord> RecordStore<T> for FsStore<T> {
    fn load(&self, id: &str) -> Result<T, StorageError> {
        sanitize_id(id)?;
        let path = self.record_path(id);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound { id: id.to_string() });
            }
            Err(source) => return Err(Self::io_error(&path, "read", source)),
        };
        serde_json::from_str(&raw).map_err(|source| StorageError::InvalidData {
            message: format!("stored record {id} is not valid JSON: {source}"),
        })
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
        sanitize_id(&id)?;
        let dir = self.record_dir();
        fs::create_dir_all(&dir).map_err(|source| Self::io_error(&dir, "create", source))?;
        let body = serde_json::to_vec_pretty(&record).map_err(|source| StorageError::Unknown {
            message: "record serialization failed".to_string(),
            source: Some(Box::new(source)),
        })?;
        let mut staged = tempfile::NamedTempFile::new_in(&dir)
            .map_err(|source| Self::io_error(&dir, "stage", source))?;
        staged.write_all(&body).map_err(|source| Self::io_error(&dir, "write", source))?;
        let path = self.record_path(&id);
        staged.persist(&path).map_err(|source| StorageError::Connection {
            message: format!("atomic rename failed for {}", path.display()),
            source: Some(Box::new(source)),
        })?;
        Ok(id)
    }

    fn list(&self, filter: Option<&StorageFilter>) -> Result<Vec<String>, StorageError> {
        let dir = self.record_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(Self::io_error(&dir, "enumerate", source)),
        };
        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Self::io_error(&dir, "enumerate", source))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(stem) = name.strip_suffix(&format!(".{RECORD_EXTENSION}")) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(match filter {
            Some(filter) => filter.paginate(ids),
            None => ids,
        })
    }

    fn delete(&self, id: &str) -> Result<(), StorageError> {
        sanitize_id(id)?;
        let path = self.record_path(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound { id: id.to_string() })
            }
            Err(source) => Err(Self::io_error(&path, "delete", source)),
        }
    }

    fn exists(&self, id: &str) -> bool {
        sanitize_id(id).is_ok() && self.record_path(id).is_file()
    }

    fn native_filters(&self) -> FilterSupport {
        FilterSupport::PAGINATION_ONLY
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::use_debug,
        reason = "Test-only assertions favor direct unwrap/expect for clarity."
    )]

    use super::*;

    #[test]
    fn sanitizer_accepts_generated_id_shapes() {
        assert!(sanitize_id("art-0001700000000000-a1b2c3d4e5f6").is_ok());
        assert!(sanitize_id("art-1_copy.v2").is_ok());
    }

    #[test]
    fn sanitizer_rejects_traversal_and_separator_characters() {
        for bad in ["../escape", "a/b", "a\\b", "", ".hidden", "nul\0byte", "space id"] {
            assert!(sanitize_id(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn sanitizer_rejects_overlong_identifiers() {
        let long = "a".repeat(MAX_ID_LENGTH + 1);
        assert!(sanitize_id(&long).is_err());
    }
}
