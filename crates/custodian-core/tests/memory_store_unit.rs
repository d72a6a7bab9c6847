// crates/custodian-core/tests/memory_store_unit.rs
// ============================================================================
// Module: Memory Store Tests
// Description: Unit tests for the volatile in-memory record store.
// Purpose: Validate copy semantics, filtering, pagination, and the error taxonomy.
// Dependencies: custodian-core
// ============================================================================

//! Behavior tests for [`custodian_core::MemoryStore`].

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use custodian_core::Artifact;
use custodian_core::ArtifactContent;
use custodian_core::ArtifactId;
use custodian_core::ArtifactMeta;
use custodian_core::Exportability;
use custodian_core::Governance;
use custodian_core::MemoryStore;
use custodian_core::Provenance;
use custodian_core::RecordStore;
use custodian_core::StorageError;
use custodian_core::StorageFilter;
use custodian_core::Timestamp;
use custodian_core::UserId;
use custodian_core::Visibility;

/// Builds a saveable artifact with the given id and visibility.
fn artifact(id: &str, visibility: Visibility) -> Artifact {
    Artifact {
        id: ArtifactId::new(id),
        schema_version: "1.0".to_string(),
        meta: ArtifactMeta {
            created_at: Timestamp::from_unix_millis(1_600_000_000_000),
            updated_at: None,
            visibility,
            owner_user_id: Some(UserId::new("u1")),
            owner_org_id: None,
            tags: BTreeSet::new(),
            title: None,
            description: None,
        },
        content: ArtifactContent {
            content_type: "note".to_string(),
            data: BTreeMap::new(),
            format: None,
        },
        provenance: Provenance {
            source: "test".to_string(),
            source_url: None,
            extraction_method: None,
            chain: Vec::new(),
        },
        governance: Governance {
            exportability: Exportability::Allowed,
            retention: None,
            classification: None,
            compliance_tags: Vec::new(),
        },
        extraction: None,
    }
}

#[test]
fn save_then_load_round_trips_the_record() {
    let store = MemoryStore::new();
    let saved = artifact("art-1", Visibility::Public);
    let id = store.save(saved.clone()).unwrap();
    assert_eq!(id, "art-1");
    let loaded = store.load(&id).unwrap();
    assert_eq!(loaded, saved);
}

#[test]
fn mutating_a_loaded_copy_never_affects_subsequent_loads() {
    let store = MemoryStore::new();
    let id = store.save(artifact("art-1", Visibility::Public)).unwrap();
    let mut first = store.load(&id).unwrap();
    first.meta.title = Some("mutated".to_string());
    first.content.data.insert("k".to_string(), serde_json::json!("v"));
    let second = store.load(&id).unwrap();
    assert_eq!(second.meta.title, None);
    assert!(second.content.data.is_empty());
}

#[test]
fn save_assigns_a_generated_sortable_id_when_absent() {
    let store = MemoryStore::new();
    let mut unsaved = artifact("", Visibility::Public);
    unsaved.id = ArtifactId::new("");
    let id = store.save(unsaved).unwrap();
    assert!(id.starts_with("art-"));
    let loaded = store.load(&id).unwrap();
    assert_eq!(loaded.id.as_str(), id);
}

#[test]
fn save_rejects_structural_violations_as_invalid_data() {
    let store = MemoryStore::new();
    let mut broken = artifact("art-1", Visibility::Public);
    broken.schema_version = String::new();
    let result = store.save(broken);
    assert!(matches!(result, Err(StorageError::InvalidData { .. })));
}

#[test]
fn load_and_delete_of_missing_records_fail_not_found() {
    let store: MemoryStore<Artifact> = MemoryStore::new();
    assert!(matches!(store.load("absent"), Err(StorageError::NotFound { .. })));
    assert!(matches!(store.delete("absent"), Err(StorageError::NotFound { .. })));
    assert!(!store.exists("absent"));
}

#[test]
fn delete_removes_the_record_and_exists_reflects_it() {
    let store = MemoryStore::new();
    let id = store.save(artifact("art-1", Visibility::Public)).unwrap();
    assert!(store.exists(&id));
    store.delete(&id).unwrap();
    assert!(!store.exists(&id));
}

#[test]
fn list_honors_visibility_filter_and_pagination_in_insertion_order() {
    let store = MemoryStore::new();
    for index in 1..=5 {
        store.save(artifact(&format!("pub-{index}"), Visibility::Public)).unwrap();
    }
    store.save(artifact("priv-1", Visibility::Private)).unwrap();

    let filter = StorageFilter {
        visibility: Some(Visibility::Public),
        limit: Some(2),
        offset: Some(1),
        ..StorageFilter::default()
    };
    let ids = store.list(Some(&filter)).unwrap();
    assert_eq!(ids, vec!["pub-2".to_string(), "pub-3".to_string()]);
}

#[test]
fn pagination_is_stable_across_repeated_calls() {
    let store = MemoryStore::new();
    for index in 1..=5 {
        store.save(artifact(&format!("art-{index}"), Visibility::Public)).unwrap();
    }
    let filter = StorageFilter { limit: Some(3), offset: Some(1), ..StorageFilter::default() };
    let first = store.list(Some(&filter)).unwrap();
    let second = store.list(Some(&filter)).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn tag_filter_uses_union_semantics() {
    let store = MemoryStore::new();
    let mut tagged = artifact("art-1", Visibility::Public);
    tagged.meta.tags = BTreeSet::from(["alpha".to_string()]);
    store.save(tagged).unwrap();
    let mut other = artifact("art-2", Visibility::Public);
    other.meta.tags = BTreeSet::from(["beta".to_string()]);
    store.save(other).unwrap();

    let filter = StorageFilter {
        tags: BTreeSet::from(["alpha".to_string(), "gamma".to_string()]),
        ..StorageFilter::default()
    };
    let ids = store.list(Some(&filter)).unwrap();
    assert_eq!(ids, vec!["art-1".to_string()]);
}

#[test]
fn owner_filter_matches_only_owned_records() {
    let store = MemoryStore::new();
    store.save(artifact("mine", Visibility::Public)).unwrap();
    let mut theirs = artifact("theirs", Visibility::Public);
    theirs.meta.owner_user_id = Some(UserId::new("u2"));
    store.save(theirs).unwrap();

    let filter =
        StorageFilter { owner_user_id: Some(UserId::new("u1")), ..StorageFilter::default() };
    assert_eq!(store.list(Some(&filter)).unwrap(), vec!["mine".to_string()]);
}

#[test]
fn overwriting_a_record_keeps_its_insertion_position() {
    let store = MemoryStore::new();
    store.save(artifact("art-1", Visibility::Public)).unwrap();
    store.save(artifact("art-2", Visibility::Public)).unwrap();
    let mut updated = artifact("art-1", Visibility::Public);
    updated.meta.title = Some("updated".to_string());
    store.save(updated).unwrap();
    assert_eq!(store.list(None).unwrap(), vec!["art-1".to_string(), "art-2".to_string()]);
}

#[test]
fn reset_clears_the_store_for_test_isolation() {
    let store = MemoryStore::new();
    store.save(artifact("art-1", Visibility::Public)).unwrap();
    store.reset();
    assert!(store.list(None).unwrap().is_empty());
    assert!(!store.exists("art-1"));
}
