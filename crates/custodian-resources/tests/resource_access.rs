// crates/custodian-resources/tests/resource_access.rs
// ============================================================================
// Module: Resource Access Tests
// Description: Unit tests for address routing, gating order, and listings.
// Purpose: Validate the export/read asymmetry and the signature gate ordering.
// Dependencies: custodian-resources, custodian-core, custodian-store-fs
// ============================================================================

//! Behavior tests for the resource access protocol.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::use_debug,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use custodian_core::Artifact;
use custodian_core::ArtifactContent;
use custodian_core::ArtifactId;
use custodian_core::ArtifactMeta;
use custodian_core::AuditEvent;
use custodian_core::AuditSink;
use custodian_core::Envelope;
use custodian_core::EnvelopeId;
use custodian_core::Exportability;
use custodian_core::Governance;
use custodian_core::IdentityContext;
use custodian_core::MemoryStore;
use custodian_core::NoopAuditSink;
use custodian_core::Provenance;
use custodian_core::RecordStore;
use custodian_core::SealError;
use custodian_core::SealVerifier;
use custodian_core::SignatureRecord;
use custodian_core::SignerId;
use custodian_core::StorageFilter;
use custodian_core::Timestamp;
use custodian_core::UserId;
use custodian_core::VerifyDecision;
use custodian_core::Visibility;
use custodian_resources::ArtifactProvider;
use custodian_resources::ENVELOPE_CONTENT_TYPE;
use custodian_resources::EnvelopeProvider;
use custodian_resources::ResourceAddress;
use custodian_resources::ResourceError;
use custodian_resources::ResourceKind;
use custodian_resources::ResourceProvider;
use custodian_resources::ResourceRegistry;
use custodian_store_fs::FsStore;

/// Fixed evaluation instant for deterministic decisions.
const NOW: Timestamp = Timestamp::from_unix_millis(1_700_000_000_000);

/// Builds an artifact with the given id, visibility, and exportability.
fn artifact(id: &str, visibility: Visibility, exportability: Exportability) -> Artifact {
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
            exportability,
            retention: None,
            classification: None,
            compliance_tags: Vec::new(),
        },
        extraction: None,
    }
}

/// Wraps an artifact in a structurally valid envelope.
fn envelope(id: &str, wrapped: Artifact) -> Envelope {
    Envelope {
        id: EnvelopeId::new(id),
        artifact: wrapped,
        signature: SignatureRecord {
            algorithm: "ed25519".to_string(),
            signer_id: SignerId::new("did:example:alice"),
            value: "c2lnbmF0dXJl".to_string(),
            public_key: None,
        },
        sealed_at: Timestamp::from_unix_millis(1_650_000_000_000),
    }
}

/// Scripted verifier that counts invocations.
struct ScriptedVerifier {
    /// Whether verification reports success.
    verdict: bool,
    /// Number of verify calls observed.
    calls: AtomicUsize,
}

impl ScriptedVerifier {
    fn new(verdict: bool) -> Arc<Self> {
        Arc::new(Self { verdict, calls: AtomicUsize::new(0) })
    }
}

impl SealVerifier for ScriptedVerifier {
    fn verify(&self, _envelope: &Envelope) -> Result<VerifyDecision, SealError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.verdict {
            Ok(VerifyDecision::verified())
        } else {
            Ok(VerifyDecision::unverified("scripted rejection"))
        }
    }
}

/// Audit sink recording every event for assertions.
#[derive(Default)]
struct RecordingAudit {
    /// Captured events.
    events: Mutex<Vec<AuditEvent>>,
}

impl AuditSink for RecordingAudit {
    fn record(&self, event: &AuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Builds a registry over fresh in-memory stores.
fn registry(
    artifacts: Arc<MemoryStore<Artifact>>,
    envelopes: Arc<MemoryStore<Envelope>>,
    verifier: Arc<ScriptedVerifier>,
) -> ResourceRegistry {
    ResourceRegistry::new()
        .with_provider(Arc::new(ArtifactProvider::new(artifacts, Arc::new(NoopAuditSink))))
        .with_provider(Arc::new(EnvelopeProvider::new(
            envelopes,
            verifier,
            Arc::new(NoopAuditSink),
        )))
}

#[test]
fn registry_routes_by_kind_and_rejects_unknown_addresses() {
    let artifacts = Arc::new(MemoryStore::new());
    artifacts.save(artifact("art-1", Visibility::Public, Exportability::Allowed)).unwrap();
    let registry = registry(artifacts, Arc::new(MemoryStore::new()), ScriptedVerifier::new(true));

    let content = registry.read("custodian://artifact/art-1", None, NOW).unwrap();
    assert_eq!(content.content_type, "application/json");
    assert!(content.body.contains("art-1"));

    assert!(matches!(
        registry.read("custodian://widget/art-1", None, NOW),
        Err(ResourceError::InvalidAddress { .. })
    ));
    assert!(matches!(
        registry.read("nonsense", None, NOW),
        Err(ResourceError::InvalidAddress { .. })
    ));
}

#[test]
fn missing_records_surface_as_provider_not_found() {
    let registry = registry(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
        ScriptedVerifier::new(true),
    );
    assert!(matches!(
        registry.read("custodian://artifact/absent", None, NOW),
        Err(ResourceError::NotFound { .. })
    ));
}

#[test]
fn single_reads_use_export_purpose_while_listings_use_read_purpose() {
    let artifacts = Arc::new(MemoryStore::new());
    artifacts.save(artifact("art-1", Visibility::Public, Exportability::Prohibited)).unwrap();
    let provider = ArtifactProvider::new(artifacts, Arc::new(NoopAuditSink));

    // Discovery succeeds: listing is a coarse read-purpose filter.
    let entries = provider.list(None, NOW);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].address.to_string(), "custodian://artifact/art-1");

    // Releasing content is export-purpose and the prohibition denies it.
    let address = ResourceAddress::new(ResourceKind::Artifact, "art-1");
    let denied = provider.read(&address, None, NOW);
    match denied {
        Err(ResourceError::AccessDenied { reasons }) => {
            assert!(reasons[0].contains("prohibited"));
        }
        other => panic!("expected access denied, got {other:?}"),
    }
}

#[test]
fn unverifiable_envelopes_fail_closed_before_any_policy_evaluation() {
    let envelopes = Arc::new(MemoryStore::new());
    envelopes
        .save(envelope("env-1", artifact("art-1", Visibility::Public, Exportability::Allowed)))
        .unwrap();
    let verifier = ScriptedVerifier::new(false);
    let audit = Arc::new(RecordingAudit::default());
    let provider = EnvelopeProvider::new(envelopes, verifier.clone(), audit.clone());

    let address = ResourceAddress::new(ResourceKind::Envelope, "env-1");
    let result = provider.read(&address, None, NOW);
    assert!(matches!(result, Err(ResourceError::InvalidSignature { .. })));
    assert_eq!(verifier.calls.load(Ordering::SeqCst), 1);
    // Policy was never evaluated, so no access decision reached the audit seam.
    assert!(audit.events.lock().unwrap().is_empty());
}

#[test]
fn verified_envelopes_release_with_the_envelope_content_type() {
    let envelopes = Arc::new(MemoryStore::new());
    envelopes
        .save(envelope("env-1", artifact("art-1", Visibility::Public, Exportability::Allowed)))
        .unwrap();
    let provider =
        EnvelopeProvider::new(envelopes, ScriptedVerifier::new(true), Arc::new(NoopAuditSink));

    let address = ResourceAddress::new(ResourceKind::Envelope, "env-1");
    let content = provider.read(&address, None, NOW).unwrap();
    assert_eq!(content.content_type, ENVELOPE_CONTENT_TYPE);
    assert!(content.body.contains("did:example:alice"));
}

#[test]
fn envelope_listing_skips_unverifiable_entries() {
    let envelopes = Arc::new(MemoryStore::new());
    envelopes
        .save(envelope("env-1", artifact("art-1", Visibility::Public, Exportability::Allowed)))
        .unwrap();
    let provider =
        EnvelopeProvider::new(envelopes, ScriptedVerifier::new(false), Arc::new(NoopAuditSink));
    assert!(provider.list(None, NOW).is_empty());
}

#[test]
fn artifact_listing_skips_entries_the_identity_cannot_read() {
    let artifacts = Arc::new(MemoryStore::new());
    artifacts.save(artifact("pub-1", Visibility::Public, Exportability::Allowed)).unwrap();
    artifacts.save(artifact("priv-1", Visibility::Private, Exportability::Allowed)).unwrap();
    let provider = ArtifactProvider::new(artifacts, Arc::new(NoopAuditSink));

    let anonymous = provider.list(None, NOW);
    assert_eq!(anonymous.len(), 1);
    assert_eq!(anonymous[0].address.id, "pub-1");

    let owner = IdentityContext::new(UserId::new("u1"));
    let owned = provider.list(Some(&owner), NOW);
    assert_eq!(owned.len(), 2);
}

#[test]
fn listing_falls_back_to_the_id_when_no_title_is_set() {
    let artifacts = Arc::new(MemoryStore::new());
    let mut titled = artifact("art-titled", Visibility::Public, Exportability::Allowed);
    titled.meta.title = Some("Quarterly Report".to_string());
    artifacts.save(titled).unwrap();
    artifacts.save(artifact("art-plain", Visibility::Public, Exportability::Allowed)).unwrap();
    let provider = ArtifactProvider::new(artifacts, Arc::new(NoopAuditSink));

    let entries = provider.list(None, NOW);
    let names: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();
    assert!(names.contains(&"Quarterly Report"));
    assert!(names.contains(&"art-plain"));
}

#[test]
fn residual_filters_are_reapplied_over_pagination_only_backends() {
    let root = tempfile::tempdir().unwrap();
    let store: Arc<FsStore<Artifact>> = Arc::new(FsStore::new(root.path()));
    store.save(artifact("art-1", Visibility::Public, Exportability::Allowed)).unwrap();
    store.save(artifact("art-2", Visibility::Private, Exportability::Allowed)).unwrap();
    let provider = ArtifactProvider::new(store, Arc::new(NoopAuditSink));

    // The filesystem backend ignores visibility natively; the provider must
    // re-apply it after loading.
    let filter = StorageFilter { visibility: Some(Visibility::Public), ..StorageFilter::default() };
    let owner = IdentityContext::new(UserId::new("u1"));
    let entries = provider.list_filtered(Some(&filter), Some(&owner), NOW);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].address.id, "art-1");
}

#[test]
fn aggregate_listing_spans_both_kinds() {
    let artifacts = Arc::new(MemoryStore::new());
    artifacts.save(artifact("art-1", Visibility::Public, Exportability::Allowed)).unwrap();
    let envelopes = Arc::new(MemoryStore::new());
    envelopes
        .save(envelope("env-1", artifact("art-2", Visibility::Public, Exportability::Allowed)))
        .unwrap();
    let registry = registry(artifacts, envelopes, ScriptedVerifier::new(true));

    let entries = registry.list(None, NOW);
    let kinds: BTreeSet<ResourceKind> = entries.iter().map(|entry| entry.address.kind).collect();
    assert_eq!(entries.len(), 2);
    assert!(kinds.contains(&ResourceKind::Artifact));
    assert!(kinds.contains(&ResourceKind::Envelope));
}
