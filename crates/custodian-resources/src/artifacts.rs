// crates/custodian-resources/src/artifacts.rs
// ============================================================================
// Module: Artifact Resource Provider
// Description: Address resolution for governed artifact records.
// Purpose: Gate artifact reads behind the governance engine.
// Dependencies: custodian-core, crate::address, crate::provider
// ============================================================================

//! ## Overview
//! The artifact provider resolves `custodian://artifact/{id}` addresses. A
//! single-address read releases full content and therefore evaluates purpose
//! `export`; listings evaluate purpose `read`. When the backing store honors
//! only part of a listing filter natively, the provider re-applies the
//! residual portion after loading each record.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use custodian_core::AccessDecision;
use custodian_core::AccessPurpose;
use custodian_core::Artifact;
use custodian_core::AuditEvent;
use custodian_core::AuditSink;
use custodian_core::IdentityContext;
use custodian_core::RecordStore;
use custodian_core::StorageError;
use custodian_core::StorageFilter;
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

/// Content type announced for artifact resources.
pub const ARTIFACT_CONTENT_TYPE: &str = "application/json";

// ============================================================================
// SECTION: Provider
// ============================================================================

/// Resource provider for governed artifacts.
pub struct ArtifactProvider {
    /// Backing artifact store.
    store: Arc<dyn RecordStore<Artifact>>,
    /// Audit sink receiving every access decision.
    audit: Arc<dyn AuditSink>,
}

impl ArtifactProvider {
    /// Creates a provider over the given store and audit sink.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore<Artifact>>, audit: Arc<dyn AuditSink>) -> Self {
        Self { store, audit }
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

    /// Enumerates artifacts matching the filter and visible to the identity.
    ///
    /// The backend applies the filter fields it honors natively; the residual
    /// portion is re-applied here after loading. Entries that fail to load or
    /// fail the read-purpose check are skipped rather than failing the whole
    /// listing.
    #[must_use]
    pub fn list_filtered(
        &self,
        filter: Option<&StorageFilter>,
        identity: Option<&IdentityContext>,
        now: Timestamp,
    ) -> Vec<ResourceEntry> {
        let residual = filter.map(|filter| filter.residual(self.store.native_filters()));
        let Ok(ids) = self.store.list(filter) else {
            return Vec::new();
        };
        let mut entries = Vec::new();
        for id in ids {
            let Ok(artifact) = self.store.load(&id) else {
                continue;
            };
            if let Some(residual) = &residual
                && !residual.matches(&artifact.meta)
            {
                continue;
            }
            let address = ResourceAddress::new(ResourceKind::Artifact, &id);
            let decision = can_access(&artifact, identity, AccessPurpose::Read, now);
            self.emit(identity, AccessPurpose::Read, address.to_string(), &decision, now);
            if !decision.allowed {
                continue;
            }
            entries.push(ResourceEntry {
                name: artifact.meta.title.clone().unwrap_or_else(|| id.clone()),
                description: artifact.meta.description.clone(),
                content_type: ARTIFACT_CONTENT_TYPE.to_string(),
                address,
            });
        }
        entries
    }
}

impl ResourceProvider for ArtifactProvider {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Artifact
    }

    fn read(
        &self,
        address: &ResourceAddress,
        identity: Option<&IdentityContext>,
        now: Timestamp,
    ) -> Result<ResourceContent, ResourceError> {
        let artifact = self
            .store
            .load(&address.id)
            .map_err(|source| ResourceError::from_storage(address, source))?;
        let decision = can_access(&artifact, identity, AccessPurpose::Export, now);
        self.emit(identity, AccessPurpose::Export, address.to_string(), &decision, now);
        if !decision.allowed {
            return Err(ResourceError::AccessDenied { reasons: decision.reasons });
        }
        let body = serde_json::to_string_pretty(&artifact).map_err(|source| {
            ResourceError::Storage {
                source: StorageError::Unknown {
                    message: "artifact serialization failed".to_string(),
                    source: Some(Box::new(source)),
                },
            }
        })?;
        Ok(ResourceContent { content_type: ARTIFACT_CONTENT_TYPE.to_string(), body })
    }

    fn list(&self, identity: Option<&IdentityContext>, now: Timestamp) -> Vec<ResourceEntry> {
        self.list_filtered(None, identity, now)
    }
}
