// crates/custodian-core/src/interfaces/mod.rs
// ============================================================================
// Module: Custodian Interfaces
// Description: Backend-agnostic contracts for storage, sealing, and extraction.
// Purpose: Define the seams other components plug into without backend detail.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how Custodian integrates with storage backends and
//! cryptographic capabilities without embedding backend-specific details.
//! Implementations must be deterministic and fail closed on missing or
//! invalid data.
//!
//! Security posture: interface implementations consume untrusted inputs; the
//! storage layer validates structure before persisting and the seal verifier
//! gates envelope release.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::artifact::Artifact;
use crate::core::artifact::ArtifactMeta;
use crate::core::artifact::DraftArtifact;
use crate::core::artifact::Visibility;
use crate::core::envelope::Envelope;
use crate::core::governance::AccessPurpose;
use crate::core::identifiers::SignerId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Storage Errors
// ============================================================================

/// Storage failure taxonomy shared by every backend.
///
/// # Invariants
/// - Every backend failure is one of these variants; wrapping preserves the
///   underlying cause for diagnostics.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No record exists under the identifier.
    #[error("record not found: {id}")]
    NotFound {
        /// The missing identifier.
        id: String,
    },
    /// A record already exists under the identifier.
    #[error("record already exists: {id}")]
    AlreadyExists {
        /// The conflicting identifier.
        id: String,
    },
    /// The backend refused access.
    #[error("storage permission denied: {message}")]
    PermissionDenied {
        /// Backend-supplied detail.
        message: String,
    },
    /// The record violates structural requirements.
    #[error("invalid record data: {message}")]
    InvalidData {
        /// What was structurally wrong.
        message: String,
    },
    /// The backend could not be reached or read.
    #[error("storage connection error: {message}")]
    Connection {
        /// Backend-supplied detail.
        message: String,
        /// Underlying cause.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// An unclassified backend failure.
    #[error("storage error: {message}")]
    Unknown {
        /// Backend-supplied detail.
        message: String,
        /// Underlying cause.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

// ============================================================================
// SECTION: Storage Records
// ============================================================================

/// Entity stored through the [`RecordStore`] contract.
///
/// Implemented by [`Artifact`] and [`Envelope`]; the contract shape is
/// identical for both, parameterized by entity type.
pub trait StorageRecord: Clone + Serialize + for<'de> Deserialize<'de> + Send + Sync {
    /// Identifier prefix used when the store generates identifiers.
    const ID_PREFIX: &'static str;

    /// Returns the record identifier when one has been assigned.
    fn record_id(&self) -> Option<&str>;

    /// Assigns a store-generated identifier.
    fn assign_id(&mut self, id: String);

    /// Validates entity-type-specific structural requirements before persist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidData`] describing the first violation.
    fn validate_structure(&self) -> Result<(), StorageError>;

    /// Returns the artifact metadata used for filter matching, when the
    /// record carries any.
    fn filter_meta(&self) -> Option<&ArtifactMeta>;
}

impl StorageRecord for Artifact {
    const ID_PREFIX: &'static str = "art";

    fn record_id(&self) -> Option<&str> {
        if self.id.is_empty() { None } else { Some(self.id.as_str()) }
    }

    fn assign_id(&mut self, id: String) {
        self.id = crate::core::identifiers::ArtifactId::new(id);
    }

    fn validate_structure(&self) -> Result<(), StorageError> {
        if self.schema_version.trim().is_empty() {
            return Err(StorageError::InvalidData {
                message: "artifact schema_version must not be empty".to_string(),
            });
        }
        if self.content.content_type.trim().is_empty() {
            return Err(StorageError::InvalidData {
                message: "artifact content_type must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn filter_meta(&self) -> Option<&ArtifactMeta> {
        Some(&self.meta)
    }
}

impl StorageRecord for Envelope {
    const ID_PREFIX: &'static str = "env";

    fn record_id(&self) -> Option<&str> {
        if self.id.is_empty() { None } else { Some(self.id.as_str()) }
    }

    fn assign_id(&mut self, id: String) {
        self.id = crate::core::identifiers::EnvelopeId::new(id);
    }

    fn validate_structure(&self) -> Result<(), StorageError> {
        if self.artifact.id.is_empty() {
            return Err(StorageError::InvalidData {
                message: "envelope artifact must carry an identifier".to_string(),
            });
        }
        if self.signature.value.trim().is_empty() {
            return Err(StorageError::InvalidData {
                message: "envelope signature value must not be empty".to_string(),
            });
        }
        if self.signature.signer_id.as_str().trim().is_empty() {
            return Err(StorageError::InvalidData {
                message: "envelope signer identity must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn filter_meta(&self) -> Option<&ArtifactMeta> {
        None
    }
}

// ============================================================================
// SECTION: Storage Filters
// ============================================================================

/// Filter applied to storage listings.
///
/// # Invariants
/// - Tag matching is union semantics: a record matches when it carries any
///   filter tag.
/// - `offset` applies after all other filters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StorageFilter {
    /// Match records owned by this user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_user_id: Option<crate::core::identifiers::UserId>,
    /// Match records owned by this organization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_org_id: Option<crate::core::identifiers::OrgId>,
    /// Match records carrying any of these tags.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    /// Match records with this visibility tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    /// Maximum number of identifiers to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Number of matching identifiers to skip before returning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl StorageFilter {
    /// Returns true when the metadata satisfies every non-pagination field.
    #[must_use]
    pub fn matches(&self, meta: &ArtifactMeta) -> bool {
        if let Some(owner) = &self.owner_user_id
            && meta.owner_user_id.as_ref() != Some(owner)
        {
            return false;
        }
        if let Some(org) = &self.owner_org_id
            && meta.owner_org_id.as_ref() != Some(org)
        {
            return false;
        }
        if let Some(visibility) = self.visibility
            && meta.visibility != visibility
        {
            return false;
        }
        if !self.tags.is_empty() && self.tags.is_disjoint(&meta.tags) {
            return false;
        }
        true
    }

    /// Applies pagination to an already-filtered identifier sequence.
    #[must_use]
    pub fn paginate(&self, ids: Vec<String>) -> Vec<String> {
        let offset = self.offset.unwrap_or(0);
        let limit = self.limit.unwrap_or(usize::MAX);
        ids.into_iter().skip(offset).take(limit).collect()
    }

    /// Returns the portion of the filter the backend did not honor natively.
    ///
    /// Callers load-and-filter with the residual; pagination is never
    /// residual because backends that cannot paginate return everything.
    #[must_use]
    pub fn residual(&self, support: FilterSupport) -> Self {
        Self {
            owner_user_id: if support.owner { None } else { self.owner_user_id.clone() },
            owner_org_id: if support.org { None } else { self.owner_org_id.clone() },
            tags: if support.tags { BTreeSet::new() } else { self.tags.clone() },
            visibility: if support.visibility { None } else { self.visibility },
            limit: None,
            offset: None,
        }
    }

    /// Returns true when no non-pagination field is set.
    #[must_use]
    pub fn is_pagination_only(&self) -> bool {
        self.owner_user_id.is_none()
            && self.owner_org_id.is_none()
            && self.tags.is_empty()
            && self.visibility.is_none()
    }
}

/// Which filter fields a backend honors natively in [`RecordStore::list`].
///
/// # Invariants
/// - A backend honoring a field applies it before pagination; callers
///   re-apply only the residual portion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSupport {
    /// Owner-user filtering is applied natively.
    pub owner: bool,
    /// Owner-organization filtering is applied natively.
    pub org: bool,
    /// Tag filtering is applied natively.
    pub tags: bool,
    /// Visibility filtering is applied natively.
    pub visibility: bool,
    /// Pagination is applied natively.
    pub pagination: bool,
}

impl FilterSupport {
    /// Support tier for backends honoring every filter field.
    pub const FULL: Self =
        Self { owner: true, org: true, tags: true, visibility: true, pagination: true };
    /// Support tier for backends honoring only pagination.
    pub const PAGINATION_ONLY: Self =
        Self { owner: false, org: false, tags: false, visibility: false, pagination: true };
}

// ============================================================================
// SECTION: Record Store
// ============================================================================

/// Uniform create/read/list/delete contract over stored records.
///
/// The shape is identical for artifacts and envelopes; backends differ only
/// in durability and in which filters they honor natively.
pub trait RecordStore<T: StorageRecord>: Send + Sync {
    /// Loads the record stored under `id`.
    ///
    /// Returned values are independent copies; mutating them never affects a
    /// subsequent load.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] when absent, or a backend error.
    fn load(&self, id: &str) -> Result<T, StorageError>;

    /// Validates and persists the record, assigning a generated identifier
    /// when absent, and returns the stored identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidData`] on structural violation, or a
    /// backend error.
    fn save(&self, record: T) -> Result<String, StorageError>;

    /// Returns identifiers of records matching the filter, honoring the
    /// fields reported by [`native_filters`](Self::native_filters).
    ///
    /// # Errors
    ///
    /// Returns a backend error when enumeration fails.
    fn list(&self, filter: Option<&StorageFilter>) -> Result<Vec<String>, StorageError>;

    /// Deletes the record stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] when absent, or a backend error.
    fn delete(&self, id: &str) -> Result<(), StorageError>;

    /// Returns true when a record exists under `id`. Never fails.
    fn exists(&self, id: &str) -> bool;

    /// Reports which filter fields [`list`](Self::list) honors natively.
    fn native_filters(&self) -> FilterSupport;
}

// ============================================================================
// SECTION: Sealing Capabilities
// ============================================================================

/// Sealing capability failure.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SealError {
    /// Key material was structurally unusable.
    #[error("seal key error: {message}")]
    Key {
        /// What was wrong with the key material.
        message: String,
    },
    /// The signing or verification primitive failed.
    #[error("seal capability error: {message}")]
    Capability {
        /// Capability-supplied detail.
        message: String,
    },
}

/// Outcome of envelope signature verification.
///
/// # Invariants
/// - `verified == false` always carries a reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyDecision {
    /// Whether the signature verified.
    pub verified: bool,
    /// Reason when verification failed.
    pub reason: Option<String>,
}

impl VerifyDecision {
    /// Returns a verified decision.
    #[must_use]
    pub const fn verified() -> Self {
        Self { verified: true, reason: None }
    }

    /// Returns an unverified decision with a reason.
    #[must_use]
    pub fn unverified(reason: impl Into<String>) -> Self {
        Self { verified: false, reason: Some(reason.into()) }
    }
}

/// Signing capability producing sealed envelopes.
///
/// Production implementations must supply genuine asymmetric-cryptography
/// primitives; accepting arbitrary key material is a test-stub behavior only.
pub trait SealSigner: Send + Sync {
    /// Signs the artifact and returns the sealed envelope.
    ///
    /// # Errors
    ///
    /// Returns [`SealError::Key`] for unusable key material and
    /// [`SealError::Capability`] when the primitive fails.
    fn sign(
        &self,
        artifact: &Artifact,
        key: &[u8],
        signer: &SignerId,
        algorithm: &str,
        sealed_at: Timestamp,
    ) -> Result<Envelope, SealError>;
}

/// Verification capability gating envelope release.
///
/// An unverifiable envelope must never reach policy evaluation; callers fail
/// closed on any non-verified decision.
pub trait SealVerifier: Send + Sync {
    /// Verifies the envelope signature against its wrapped artifact.
    ///
    /// # Errors
    ///
    /// Returns [`SealError::Capability`] when the primitive itself fails;
    /// signature mismatch is a [`VerifyDecision`], not an error.
    fn verify(&self, envelope: &Envelope) -> Result<VerifyDecision, SealError>;
}

// ============================================================================
// SECTION: Extraction Capability
// ============================================================================

/// Input handed to the pluggable extraction capability.
///
/// # Invariants
/// - `text` is non-empty after trimming; the tool pipeline rejects empty
///   input before the capability is invoked.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractionInput {
    /// Content text to extract from.
    pub text: String,
    /// Optional base64-encoded image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Optional caller-supplied metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

/// Extraction capability failure.
#[derive(Debug, Error)]
#[error("extraction capability error: {message}")]
pub struct ExtractorError {
    /// Capability-supplied detail.
    pub message: String,
}

/// Content extraction capability producing draft artifacts.
pub trait ContentExtractor: Send + Sync {
    /// Extracts a draft artifact from the input.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError`] when extraction fails.
    fn extract(&self, input: &ExtractionInput) -> Result<DraftArtifact, ExtractorError>;
}

// ============================================================================
// SECTION: Audit Hook
// ============================================================================

/// One access decision emitted to the audit seam.
///
/// # Invariants
/// - `reasons` preserves the order produced by the governance engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// When the decision was made.
    pub at: Timestamp,
    /// Acting user, when an identity was resolved.
    pub actor: Option<crate::core::identifiers::UserId>,
    /// Purpose the decision was evaluated for.
    pub purpose: AccessPurpose,
    /// Resource the decision concerned.
    pub resource: String,
    /// Whether access was allowed.
    pub allowed: bool,
    /// Ordered denial reasons; empty when allowed.
    pub reasons: Vec<String>,
}

/// Audit sink receiving access decisions at policy decision points.
///
/// Custodian ships only the decision hook; persistence and shipping of audit
/// records belong to the embedding system.
pub trait AuditSink: Send + Sync {
    /// Records one access decision.
    fn record(&self, event: &AuditEvent);
}

/// Audit sink that discards every event.
///
/// # Invariants
/// - Never fails and never blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &AuditEvent) {}
}
