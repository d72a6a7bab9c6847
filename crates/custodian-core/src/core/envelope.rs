// crates/custodian-core/src/core/envelope.rs
// ============================================================================
// Module: Envelope Model
// Description: Cryptographically sealed wrapper around exactly one artifact.
// Purpose: Define the immutable envelope record and its signature aggregate.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! An envelope binds one artifact to a signature record and a seal timestamp.
//! Envelopes are immutable once sealed: the storage surface exposes only
//! create, read, and delete, never update. Envelope identifiers are derived
//! from the wrapped artifact at seal time and are never user-supplied.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::artifact::Artifact;
use crate::core::identifiers::EnvelopeId;
use crate::core::identifiers::SignerId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Signature Record
// ============================================================================

/// Signature aggregate stored inside an envelope.
///
/// # Invariants
/// - `value` is the base64-encoded signature over the canonical JSON
///   serialization of the wrapped artifact.
/// - `public_key`, when present, is base64-encoded verification key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// Signature algorithm identifier.
    pub algorithm: String,
    /// Signer identity bound to the signature.
    pub signer_id: SignerId,
    /// Base64-encoded signature value.
    pub value: String,
    /// Optional base64-encoded public key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

// ============================================================================
// SECTION: Envelope
// ============================================================================

/// An immutable signed wrapper around exactly one artifact.
///
/// # Invariants
/// - `id` is derived via [`EnvelopeId::derive`] at seal time.
/// - The record never changes after sealing; re-sealing produces a new
///   envelope with a new identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Derived envelope identifier.
    pub id: EnvelopeId,
    /// The wrapped artifact.
    pub artifact: Artifact,
    /// Signature aggregate.
    pub signature: SignatureRecord,
    /// Seal timestamp.
    pub sealed_at: Timestamp,
}
