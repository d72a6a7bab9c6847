// crates/custodian-core/src/core/identifiers.rs
// ============================================================================
// Module: Custodian Identifiers
// Description: Canonical opaque identifiers for artifacts, envelopes, and callers.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde, rand, sha2
// ============================================================================

//! ## Overview
//! This module defines the canonical identifiers used throughout Custodian.
//! Identifiers are opaque strings on the wire. Generated record identifiers
//! are practically unique and sort by creation time; envelope identifiers are
//! always derived from their artifact and never user-supplied.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Schema version stamped on newly assembled artifacts.
pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

/// Number of hex characters in the random suffix of a generated identifier.
const GENERATED_SUFFIX_HEX_CHARS: usize = 12;

/// Number of hex characters taken from the digest for a derived envelope id.
const ENVELOPE_SUFFIX_HEX_CHARS: usize = 12;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Artifact identifier.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Creates a new artifact identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the identifier is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ArtifactId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ArtifactId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Envelope identifier derived from an artifact identifier.
///
/// # Invariants
/// - Derived via [`EnvelopeId::derive`] at seal time; never user-supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvelopeId(String);

impl EnvelopeId {
    /// Creates an envelope identifier from its stored wire form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives an envelope identifier from the artifact it wraps.
    ///
    /// The suffix hashes the artifact identifier, the seal timestamp, and a
    /// random salt so repeated seals of the same artifact stay distinct.
    #[must_use]
    pub fn derive(artifact_id: &ArtifactId, sealed_at: Timestamp) -> Self {
        let salt: u64 = rand::random();
        let mut hasher = Sha256::new();
        hasher.update(artifact_id.as_str().as_bytes());
        hasher.update(sealed_at.as_unix_millis().to_be_bytes());
        hasher.update(salt.to_be_bytes());
        let digest = hasher.finalize();
        let mut suffix = String::with_capacity(ENVELOPE_SUFFIX_HEX_CHARS);
        for byte in digest.iter().take(ENVELOPE_SUFFIX_HEX_CHARS / 2) {
            suffix.push_str(&format!("{byte:02x}"));
        }
        Self(format!("{artifact_id}-seal-{suffix}"))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the identifier is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EnvelopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// User identifier resolved by the external identity layer.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new user identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Organization identifier resolved by the external identity layer.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgId(String);

impl OrgId {
    /// Creates a new organization identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for OrgId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for OrgId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Signer identity bound to an envelope signature.
///
/// # Invariants
/// - Opaque UTF-8 string; scheme-prefix policy is enforced at the seal boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignerId(String);

impl SignerId {
    /// Creates a new signer identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for SignerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SignerId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Identifier Generation
// ============================================================================

/// Generates a practically unique record identifier that sorts by creation time.
///
/// The wire form is `{prefix}-{unix_millis:013}-{random:012x}`. The zero-padded
/// millisecond component keeps lexicographic order aligned with creation order
/// for any realistic clock value; the random suffix disambiguates records
/// created within the same millisecond.
#[must_use]
pub fn generate_record_id(prefix: &str, now: Timestamp) -> String {
    let millis = now.as_unix_millis().max(0);
    let random: u64 = rand::random();
    let suffix = random & ((1 << (GENERATED_SUFFIX_HEX_CHARS * 4)) - 1);
    format!("{prefix}-{millis:013}-{suffix:012x}")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::expect_used,
        clippy::unwrap_used,
        reason = "Test-only assertions favor direct unwrap/expect for clarity."
    )]

    use super::*;

    #[test]
    fn generated_ids_sort_by_creation_time() {
        let earlier = generate_record_id("art", Timestamp::from_unix_millis(1_000));
        let later = generate_record_id("art", Timestamp::from_unix_millis(2_000));
        assert!(earlier < later);
    }

    #[test]
    fn generated_ids_are_distinct_within_one_millisecond() {
        let now = Timestamp::from_unix_millis(5_000);
        let first = generate_record_id("art", now);
        let second = generate_record_id("art", now);
        assert_ne!(first, second);
    }

    #[test]
    fn envelope_ids_embed_the_artifact_id() {
        let artifact_id = ArtifactId::new("art-0000000001000-abcdef012345");
        let envelope_id = EnvelopeId::derive(&artifact_id, Timestamp::from_unix_millis(1_000));
        assert!(envelope_id.as_str().starts_with(artifact_id.as_str()));
        assert!(envelope_id.as_str().contains("-seal-"));
    }

    #[test]
    fn repeated_derivation_yields_distinct_envelope_ids() {
        let artifact_id = ArtifactId::new("art-1");
        let sealed_at = Timestamp::from_unix_millis(1_000);
        let first = EnvelopeId::derive(&artifact_id, sealed_at);
        let second = EnvelopeId::derive(&artifact_id, sealed_at);
        assert_ne!(first, second);
    }
}
