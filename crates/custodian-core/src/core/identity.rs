// crates/custodian-core/src/core/identity.rs
// ============================================================================
// Module: Identity Context
// Description: Resolved caller identity consumed by the governance engine.
// Purpose: Carry caller capabilities and grants as explicit per-request values.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! An identity context is produced by the external resolver layer and threaded
//! through every call that needs it as an explicit value. There is no shared
//! mutable "current identity" slot anywhere in Custodian: under concurrent
//! dispatch such a slot would let one request's identity leak into another.
//!
//! Privilege is modeled as a capability set rather than role-string
//! comparison; policy code tests capability membership only.
//!
//! Security posture: identity contexts arrive from an external trust boundary
//! and are treated as already authenticated but otherwise untrusted data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ArtifactId;
use crate::core::identifiers::OrgId;
use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Capabilities
// ============================================================================

/// A capability asserted by a resolved identity.
///
/// # Invariants
/// - Variants are compared by membership, never by string equality on role
///   names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Administrative authority: bypasses visibility checks and may modify or
    /// delete records owned by others. Never bypasses expiry.
    Administer,
    /// An opaque asserted capability with no built-in policy meaning.
    Assert(String),
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Administer => f.write_str("administer"),
            Self::Assert(label) => label.fmt(f),
        }
    }
}

// ============================================================================
// SECTION: Identity Context
// ============================================================================

/// Resolved caller identity.
///
/// # Invariants
/// - `user_id` is always present; a request with no identity is represented
///   as `None` at call sites, never as an empty context.
/// - The context is immutable once resolved; enrichment produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityContext {
    /// Resolved user identifier.
    pub user_id: UserId,
    /// Capabilities asserted for this caller.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub capabilities: BTreeSet<Capability>,
    /// Organization the caller belongs to, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<OrgId>,
    /// Explicit permission grants of the form `artifact:read:<id>`.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub permissions: BTreeSet<String>,
}

impl IdentityContext {
    /// Creates a minimal context for the given user with no capabilities.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            capabilities: BTreeSet::new(),
            org_id: None,
            permissions: BTreeSet::new(),
        }
    }

    /// Returns true when the caller asserts administrative authority.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.capabilities.contains(&Capability::Administer)
    }

    /// Returns true when the caller holds an explicit read grant for the
    /// given artifact.
    #[must_use]
    pub fn has_read_grant(&self, artifact_id: &ArtifactId) -> bool {
        self.permissions.contains(&format!("artifact:read:{artifact_id}"))
    }
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
    fn admin_is_capability_membership_not_string_comparison() {
        let mut identity = IdentityContext::new(UserId::new("u1"));
        assert!(!identity.is_admin());
        identity.capabilities.insert(Capability::Assert("administer".to_string()));
        assert!(!identity.is_admin());
        identity.capabilities.insert(Capability::Administer);
        assert!(identity.is_admin());
    }

    #[test]
    fn read_grants_match_the_exact_artifact() {
        let mut identity = IdentityContext::new(UserId::new("u1"));
        identity.permissions.insert("artifact:read:art-1".to_string());
        assert!(identity.has_read_grant(&ArtifactId::new("art-1")));
        assert!(!identity.has_read_grant(&ArtifactId::new("art-2")));
    }
}
