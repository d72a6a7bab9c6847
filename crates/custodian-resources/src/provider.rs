// crates/custodian-resources/src/provider.rs
// ============================================================================
// Module: Resource Provider Contract
// Description: Provider trait and error taxonomy for resource resolution.
// Purpose: Define how addresses become gated content releases.
// Dependencies: custodian-core, crate::address
// ============================================================================

//! ## Overview
//! A resource provider resolves addresses of one kind into serialized
//! content, applying the governance engine (and for envelopes the signature
//! gate) before anything is released. Single-address reads evaluate purpose
//! `export` because content is about to leave the trust boundary; listings
//! evaluate purpose `read` as a coarse discovery filter. That asymmetry is
//! intentional and load-bearing.
//!
//! Security posture: providers are the last gate before content release and
//! must fail closed on unverifiable envelopes and on any denied decision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use custodian_core::IdentityContext;
use custodian_core::StorageError;
use custodian_core::Timestamp;
use thiserror::Error;

use crate::address::ResourceAddress;
use crate::address::ResourceKind;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Resource resolution failure taxonomy.
///
/// # Invariants
/// - Variants are stable; the external adapter maps them to its own error
///   surface without inspecting messages.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The addressed record does not exist.
    #[error("resource not found: {address}")]
    NotFound {
        /// The address that missed.
        address: String,
    },
    /// The governance engine denied access.
    #[error("resource access denied: {}", reasons.join("; "))]
    AccessDenied {
        /// Ordered denial reasons from the governance engine.
        reasons: Vec<String>,
    },
    /// The address failed to parse or named an unknown kind.
    #[error("invalid resource address: {message}")]
    InvalidAddress {
        /// What was wrong with the address.
        message: String,
    },
    /// The envelope signature could not be verified.
    #[error("invalid envelope signature: {reason}")]
    InvalidSignature {
        /// Why verification failed.
        reason: String,
    },
    /// The storage layer failed.
    #[error("resource storage error")]
    Storage {
        /// Underlying storage failure.
        #[source]
        source: StorageError,
    },
}

impl ResourceError {
    /// Translates a storage failure at an address into the resource taxonomy.
    ///
    /// `NotFound` becomes a provider-level `NotFound`; everything else is
    /// wrapped with the cause preserved.
    #[must_use]
    pub fn from_storage(address: &ResourceAddress, source: StorageError) -> Self {
        match source {
            StorageError::NotFound { .. } => Self::NotFound { address: address.to_string() },
            other => Self::Storage { source: other },
        }
    }
}

// ============================================================================
// SECTION: Content and Entries
// ============================================================================

/// Serialized resource content with an announced content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceContent {
    /// Announced content type.
    pub content_type: String,
    /// Serialized entity body.
    pub body: String,
}

/// One enumerable resource in a listing.
///
/// # Invariants
/// - `name` falls back to the record identifier when no title is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    /// Resource address.
    pub address: ResourceAddress,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Announced content type.
    pub content_type: String,
}

// ============================================================================
// SECTION: Provider Trait
// ============================================================================

/// Resolver for one resource kind.
pub trait ResourceProvider: Send + Sync {
    /// Returns the kind this provider resolves.
    fn kind(&self) -> ResourceKind;

    /// Resolves a single address into released content.
    ///
    /// Evaluates access with purpose `export`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] when the address is malformed, the record is
    /// missing, verification fails, or policy denies release.
    fn read(
        &self,
        address: &ResourceAddress,
        identity: Option<&IdentityContext>,
        now: Timestamp,
    ) -> Result<ResourceContent, ResourceError>;

    /// Enumerates resources visible to the identity.
    ///
    /// Evaluates access with purpose `read` and silently skips entries that
    /// fail to load, fail verification, or fail the read check.
    fn list(&self, identity: Option<&IdentityContext>, now: Timestamp) -> Vec<ResourceEntry>;
}
