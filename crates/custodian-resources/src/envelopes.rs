// crates/custodian-resources/src/envelopes.rs
// ============================================================================
// Module: Envelope Resource Provider
// Description: Address resolution for sealed envelope records.
// Purpose: Gate envelope release behind signature verification and policy.
// Dependencies: custodian-core, crate::address, crate::provider
// ============================================================================

//! ## Overview
//! The envelope provider resolves `custodian://envelope/{id}` addresses. The
//! signature-verification gate runs before any governance evaluation: an
//! unverifiable envelope is never evaluated against access policy and fails
//! closed as an invalid signature. Verified envelopes are then gated on the
//! wrapped artifact's policy exactly like a direct artifact read.
//!
//! Security posture: verification ordering is a trust-boundary invariant, not
//! an optimization; reordering it would leak policy information about
//! envelopes nobody vouches for.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use custodian_core::AccessDecision;
use custodian_core::AccessPurpose;
use custodian_core::AuditEvent;
use custodian_core::AuditSink;
use custodian_core::Envelope;
use custodian_core::IdentityContext;
use custodian_core::RecordStore;
use custodian_core::SealVerifier;
use custodian_core::StorageError;
use custodian_core::Timestamp;
use custodian_core::can_access;

use crate::address::ResourceAddress;
use crate::address::ResourceKind;
use crate::provider::ResourceContent;
use crate::provider::ResourceEntry;
use crate::provider::ResourceError;
use crate::provider::ResourceProvider;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Content type announced for envelope resources.
pub const ENVELOPE_CONTENT_TYPE: &str = "application/custodian-envelope+json";

// ============================================================================
// SECTION: Provider
// ============================================================================

/// Resource provider for sealed envelopes.
pub struct EnvelopeProvider {
    /// Backing envelope store.
    store: Arc<dyn RecordStore<Envelope>>,
    /// Signature verification capability.
    verifier: Arc<dyn SealVerifier>,
    /// Audit sink receiving every access decision.
    audit: Arc<dyn AuditSink>,
}

impl EnvelopeProvider {
    /// Creates a provider over the given store, verifier, and audit sink.
    #[must_use]
    pub fn new(
        store: Arc<dyn RecordStore<Envelope>>,
        verifier: Arc<dyn SealVerifier>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self { store, verifier, audit }
    }

    /// Runs the fail-closed signature gate for one envelope.
    ///
    /// Capability failures and unverified decisions both collapse to an
    /// invalid-signature outcome; policy is never consulted for either.
    fn verify_gate(&self, envelope: &Envelope) -> Result<(), ResourceError> {
        match self.verifier.verify(envelope) {
            Ok(decision) if decision.verified => Ok(()),
            Ok(decision) => Err(ResourceError::InvalidSignature {
                reason: decision.reason.unwrap_or_else(|| "signature unverified".to_string()),
            }),
            Err(source) => Err(ResourceError::InvalidSignature { reason: source.to_string() }),
        }
    }

    /// Emits one access decision to the audit seam.
    fn emit(
        &self,
        identity: Option<&IdentityContext>,
        purpose: AccessPurpose,
        resource: String,
        decision: &AccessDecision,
        now: Timestamp,
    ) {
        self.audit.record(&AuditEvent {
            at: now,
            actor: identity.map(|identity| identity.user_id.clone()),
            purpose,
            resource,
            allowed: decision.allowed,
            reasons: decision.reasons.clone(),
        });
    }
}

impl ResourceProvider for EnvelopeProvider {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Envelope
    }

    fn read(
        &self,
        address: &ResourceAddress,
        identity: Option<&IdentityContext>,
        now: Timestamp,
    ) -> Result<ResourceContent, ResourceError> {
        let envelope = self
            .store
            .load(&address.id)
            .map_err(|source| ResourceError::from_storage(address, source))?;
        self.verify_gate(&envelope)?;
        let decision = can_access(&envelope.artifact, identity, AccessPurpose::Export, now);
        self.emit(identity, AccessPurpose::Export, address.to_string(), &decision, now);
        if !decision.allowed {
            return Err(ResourceError::AccessDenied { reasons: decision.reasons });
        }
        let body = serde_json::to_string_pretty(&envelope).map_err(|source| {
            ResourceError::Storage {
                source: StorageError::Unknown {
                    message: "envelope serialization failed".to_string(),
                    source: Some(Box::new(source)),
                },
            }
        })?;
        Ok(ResourceContent { content_type: ENVELOPE_CONTENT_TYPE.to_string(), body })
    }

    fn list(&self, identity: Option<&IdentityContext>, now: Timestamp) -> Vec<ResourceEntry> {
        let Ok(ids) = self.store.list(None) else {
            return Vec::new();
        };
        let mut entries = Vec::new();
        for id in ids {
            let Ok(envelope) = self.store.load(&id) else {
                continue;
            };
            if self.verify_gate(&envelope).is_err() {
                continue;
            }
            let address = ResourceAddress::new(ResourceKind::Envelope, &id);
            let decision = can_access(&envelope.artifact, identity, AccessPurpose::Read, now);
            self.emit(identity, AccessPurpose::Read, address.to_string(), &decision, now);
            if !decision.allowed {
                continue;
            }
            entries.push(ResourceEntry {
                name: envelope.artifact.meta.title.clone().unwrap_or_else(|| id.clone()),
                description: envelope.artifact.meta.description.clone(),
                content_type: ENVELOPE_CONTENT_TYPE.to_string(),
                address,
            });
        }
        entries
    }
}
