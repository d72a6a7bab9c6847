// crates/custodian-core/src/lib.rs
// ============================================================================
// Module: Custodian Core
// Description: Data model, governance engine, and storage contract.
// Purpose: Provide the governed-record foundation every other crate builds on.
// Dependencies: serde, serde_json, thiserror, time, rand, sha2
// ============================================================================

//! ## Overview
//! Custodian mediates access to governed, versioned data records (artifacts)
//! and sealed wrappers around them (envelopes). This crate holds the typed
//! data model, the pure governance engine that decides whether a caller may
//! read, export, modify, or delete a record, and the backend-agnostic storage
//! and capability contracts the rest of the workspace plugs into.
//!
//! Security posture: the governance engine is the authoritative gate in front
//! of content release; callers must consult it before returning any governed
//! record across the trust boundary.

/// Core data model and governance logic.
pub mod core;
/// Backend-agnostic contracts.
pub mod interfaces;
/// Reference backend implementations.
pub mod runtime;

pub use self::core::artifact::Artifact;
pub use self::core::artifact::ArtifactContent;
pub use self::core::artifact::ArtifactMeta;
pub use self::core::artifact::DraftArtifact;
pub use self::core::artifact::DraftError;
pub use self::core::artifact::DraftGovernance;
pub use self::core::artifact::DraftMeta;
pub use self::core::artifact::ExtractionInfo;
pub use self::core::artifact::Exportability;
pub use self::core::artifact::Governance;
pub use self::core::artifact::Provenance;
pub use self::core::artifact::ProvenanceAction;
pub use self::core::artifact::RetentionPolicy;
pub use self::core::artifact::Visibility;
pub use self::core::envelope::Envelope;
pub use self::core::envelope::SignatureRecord;
pub use self::core::governance::AccessDecision;
pub use self::core::governance::AccessPurpose;
pub use self::core::governance::GovernanceReport;
pub use self::core::governance::apply_default_governance;
pub use self::core::governance::can_access;
pub use self::core::governance::can_export;
pub use self::core::governance::check_visibility;
pub use self::core::governance::is_expired;
pub use self::core::governance::validate_governance;
pub use self::core::governance::validate_governance_value;
pub use self::core::identifiers::ArtifactId;
pub use self::core::identifiers::CURRENT_SCHEMA_VERSION;
pub use self::core::identifiers::EnvelopeId;
pub use self::core::identifiers::OrgId;
pub use self::core::identifiers::SignerId;
pub use self::core::identifiers::UserId;
pub use self::core::identifiers::generate_record_id;
pub use self::core::identity::Capability;
pub use self::core::identity::IdentityContext;
pub use self::core::time::TimeParseError;
pub use self::core::time::Timestamp;
pub use self::interfaces::AuditEvent;
pub use self::interfaces::AuditSink;
pub use self::interfaces::ContentExtractor;
pub use self::interfaces::ExtractionInput;
pub use self::interfaces::ExtractorError;
pub use self::interfaces::FilterSupport;
pub use self::interfaces::NoopAuditSink;
pub use self::interfaces::RecordStore;
pub use self::interfaces::SealError;
pub use self::interfaces::SealSigner;
pub use self::interfaces::SealVerifier;
pub use self::interfaces::StorageError;
pub use self::interfaces::StorageFilter;
pub use self::interfaces::StorageRecord;
pub use self::interfaces::VerifyDecision;
pub use self::runtime::MemoryStore;
