// crates/custodian-resources/src/address.rs
// ============================================================================
// Module: Resource Addresses
// Description: Opaque address scheme for governed resources.
// Purpose: Parse and format `custodian://{kind}/{id}` addresses.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Resources are addressed as `custodian://{kind}/{id}` with two kinds in
//! this system: artifacts and envelopes. Addresses are opaque to callers;
//! parsing rejects anything outside the exact shape rather than guessing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Address scheme prefix including separator.
pub const SCHEME_PREFIX: &str = "custodian://";

// ============================================================================
// SECTION: Resource Kind
// ============================================================================

/// Kind segment of a resource address.
///
/// # Invariants
/// - Wire labels are exactly `artifact` and `envelope`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Governed artifact records.
    Artifact,
    /// Sealed envelope records.
    Envelope,
}

impl ResourceKind {
    /// Returns the stable address label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Artifact => "artifact",
            Self::Envelope => "envelope",
        }
    }

    /// Parses an address label into a kind.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "artifact" => Some(Self::Artifact),
            "envelope" => Some(Self::Envelope),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Resource Address
// ============================================================================

/// A parsed resource address.
///
/// # Invariants
/// - `id` is non-empty and contains no path separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAddress {
    /// Addressed resource kind.
    pub kind: ResourceKind,
    /// Addressed record identifier.
    pub id: String,
}

/// Error raised when an address fails to parse.
#[derive(Debug, thiserror::Error)]
#[error("invalid resource address: {message}")]
pub struct AddressParseError {
    /// What was wrong with the address.
    pub message: String,
}

impl ResourceAddress {
    /// Creates an address from a kind and identifier.
    #[must_use]
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }

    /// Parses an opaque address string.
    ///
    /// # Errors
    ///
    /// Returns [`AddressParseError`] when the scheme, kind, or identifier
    /// segment is malformed.
    pub fn parse(raw: &str) -> Result<Self, AddressParseError> {
        let Some(rest) = raw.strip_prefix(SCHEME_PREFIX) else {
            return Err(AddressParseError {
                message: format!("address must start with {SCHEME_PREFIX}"),
            });
        };
        let Some((kind_label, id)) = rest.split_once('/') else {
            return Err(AddressParseError {
                message: "address must have the shape {kind}/{id}".to_string(),
            });
        };
        let Some(kind) = ResourceKind::parse(kind_label) else {
            return Err(AddressParseError { message: format!("unknown resource kind: {kind_label}") });
        };
        if id.is_empty() {
            return Err(AddressParseError { message: "address identifier is empty".to_string() });
        }
        if id.contains('/') {
            return Err(AddressParseError {
                message: "address identifier must not contain '/'".to_string(),
            });
        }
        Ok(Self { kind, id: id.to_string() })
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME_PREFIX}{}/{}", self.kind, self.id)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
