// crates/custodian-core/src/core/governance.rs
// ============================================================================
// Module: Governance Engine
// Description: Pure access-policy decisions over artifact governance fields.
// Purpose: Decide export, expiry, visibility, and purpose-scoped access.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The governance engine is a set of pure functions over an artifact's policy
//! fields and an optional caller identity. It performs no I/O and holds no
//! state; callers pass `now` explicitly so every decision is deterministic.
//!
//! ## Invariants
//! - Expiry denies every purpose for every identity; there is no
//!   administrative bypass.
//! - Denial reasons accumulate in check order; the reason list is empty
//!   exactly when access is allowed.
//!
//! Security posture: these functions are the authoritative gate in front of
//! every content release and mutation; they must fail closed on absent
//! identity for any non-public access.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::artifact::Artifact;
use crate::core::artifact::DraftArtifact;
use crate::core::artifact::Exportability;
use crate::core::artifact::Visibility;
use crate::core::identity::IdentityContext;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Access Purpose
// ============================================================================

/// The purpose an access decision is evaluated for.
///
/// # Invariants
/// - Variants are stable for audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessPurpose {
    /// Coarse read used for discovery and listings.
    Read,
    /// Content release across the trust boundary.
    Export,
    /// Whole-record mutation through an explicit save.
    Modify,
    /// Record deletion.
    Delete,
}

impl AccessPurpose {
    /// Returns the stable label for the purpose.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Export => "export",
            Self::Modify => "modify",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for AccessPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Access Decision
// ============================================================================

/// The allow/deny plus ordered-reasons result of a policy evaluation.
///
/// # Invariants
/// - `reasons` is empty if and only if `allowed` is true.
/// - Reasons accumulate in check order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    /// Whether access is allowed.
    pub allowed: bool,
    /// Ordered denial reasons; empty when allowed.
    pub reasons: Vec<String>,
}

impl AccessDecision {
    /// Returns an allow decision.
    #[must_use]
    pub const fn allow() -> Self {
        Self { allowed: true, reasons: Vec::new() }
    }

    /// Returns a deny decision with a single reason.
    #[must_use]
    pub fn deny(reason: impl Into<String>) -> Self {
        Self { allowed: false, reasons: vec![reason.into()] }
    }
}

// ============================================================================
// SECTION: Policy Functions
// ============================================================================

/// Returns true when the artifact's exportability tier permits export.
#[must_use]
pub const fn can_export(artifact: &Artifact) -> bool {
    matches!(artifact.governance.exportability, Exportability::Allowed)
}

/// Returns true when the artifact's retention policy has lapsed at `now`.
///
/// An absolute `expires_at` takes precedence over `duration_days` when both
/// are set; validation surfaces that state as a warning rather than resolving
/// it two different ways. Absent retention never expires.
#[must_use]
pub fn is_expired(artifact: &Artifact, now: Timestamp) -> bool {
    let Some(retention) = &artifact.governance.retention else {
        return false;
    };
    if let Some(expires_at) = retention.expires_at {
        return expires_at.is_before(now);
    }
    if let Some(days) = retention.duration_days {
        return artifact.meta.created_at.plus_days(days).is_before(now);
    }
    false
}

/// Returns true when the identity may see the artifact under its visibility
/// tier.
///
/// Public is always visible. Private is visible only to the owning user.
/// Shared is visible to the owner, to members of the owning organization, and
/// to holders of an explicit `artifact:read:<id>` grant. Absent identity fails
/// every non-public tier.
#[must_use]
pub fn check_visibility(artifact: &Artifact, identity: Option<&IdentityContext>) -> bool {
    match artifact.meta.visibility {
        Visibility::Public => true,
        Visibility::Private => {
            let Some(identity) = identity else {
                return false;
            };
            artifact.meta.owner_user_id.as_ref() == Some(&identity.user_id)
        }
        Visibility::Shared => {
            let Some(identity) = identity else {
                return false;
            };
            if artifact.meta.owner_user_id.as_ref() == Some(&identity.user_id) {
                return true;
            }
            if let (Some(owner_org), Some(caller_org)) =
                (&artifact.meta.owner_org_id, &identity.org_id)
                && owner_org == caller_org
            {
                return true;
            }
            identity.has_read_grant(&artifact.id)
        }
    }
}

/// Evaluates whether the identity may access the artifact for the given
/// purpose.
///
/// Checks run in a fixed order: expiry first (denies every purpose and every
/// identity, administrators included), then the owner-or-admin gate for
/// mutation, then visibility for reads (administrators bypass visibility
/// only), then exportability for exports.
#[must_use]
pub fn can_access(
    artifact: &Artifact,
    identity: Option<&IdentityContext>,
    purpose: AccessPurpose,
    now: Timestamp,
) -> AccessDecision {
    if is_expired(artifact, now) {
        return AccessDecision::deny("expired");
    }
    match purpose {
        AccessPurpose::Modify | AccessPurpose::Delete => {
            let Some(identity) = identity else {
                return AccessDecision::deny("authentication required");
            };
            let is_owner = artifact.meta.owner_user_id.as_ref() == Some(&identity.user_id);
            if !is_owner && !identity.is_admin() {
                return AccessDecision::deny("only owner or admin");
            }
            AccessDecision::allow()
        }
        AccessPurpose::Read | AccessPurpose::Export => {
            let admin = identity.is_some_and(IdentityContext::is_admin);
            if !admin && !check_visibility(artifact, identity) {
                return AccessDecision::deny("visibility check failed");
            }
            if purpose == AccessPurpose::Export && !can_export(artifact) {
                let reason = match artifact.governance.exportability {
                    Exportability::Prohibited => "export prohibited by governance policy",
                    Exportability::Restricted | Exportability::Allowed => {
                        "export restricted; clearance required"
                    }
                };
                return AccessDecision::deny(reason);
            }
            AccessDecision::allow()
        }
    }
}

// ============================================================================
// SECTION: Governance Validation
// ============================================================================

/// Structural validation outcome for an artifact's governance aggregate.
///
/// # Invariants
/// - `errors` and `warnings` are disjoint; warnings never invalidate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GovernanceReport {
    /// Fatal validation errors.
    pub errors: Vec<String>,
    /// Advisory warnings.
    pub warnings: Vec<String>,
}

impl GovernanceReport {
    /// Returns true when no errors were recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates the governance aggregate of a typed artifact.
///
/// The typed model cannot represent a missing aggregate or an unknown
/// exportability value (those are wire errors); lenient JSON intake paths
/// report them via [`validate_governance_value`]. This function covers the
/// remaining structural concerns: retention precedence and content sanity.
#[must_use]
pub fn validate_governance(artifact: &Artifact) -> GovernanceReport {
    let mut report = GovernanceReport::default();
    if let Some(retention) = &artifact.governance.retention {
        if retention.duration_days.is_some() && retention.expires_at.is_some() {
            report.warnings.push(
                "retention sets both duration_days and expires_at; expires_at takes precedence"
                    .to_string(),
            );
        }
        if let Some(days) = retention.duration_days
            && days == 0
        {
            report.errors.push("retention duration_days must be greater than zero".to_string());
        }
    }
    if let Some(classification) = &artifact.governance.classification
        && classification.trim().is_empty()
    {
        report.errors.push("governance classification must not be blank".to_string());
    }
    report
}

/// Validates the governance section of a raw JSON artifact value.
///
/// Lenient intake accepts records that the typed model would reject, so
/// structural absences surface as report entries instead of parse failures.
/// A missing `governance` aggregate is a single fatal error that
/// short-circuits the remaining governance checks.
#[must_use]
pub fn validate_governance_value(value: &serde_json::Value) -> GovernanceReport {
    let mut report = GovernanceReport::default();
    let Some(governance) = value.get("governance") else {
        report.errors.push("governance aggregate is missing".to_string());
        return report;
    };
    match governance.get("exportability").and_then(serde_json::Value::as_str) {
        Some(raw) => {
            if serde_json::from_value::<Exportability>(serde_json::Value::String(raw.to_string()))
                .is_err()
            {
                report.errors.push(format!("invalid exportability value: {raw}"));
            }
        }
        None => report.errors.push("governance exportability is missing or not a string".to_string()),
    }
    let retention = governance.get("retention");
    if let Some(retention) = retention
        && retention.get("duration_days").is_some()
        && retention.get("expires_at").is_some()
    {
        report.warnings.push(
            "retention sets both duration_days and expires_at; expires_at takes precedence"
                .to_string(),
        );
    }
    if value.get("meta").and_then(|meta| meta.get("visibility")).is_none() {
        report.warnings.push("meta visibility is missing; will default to private".to_string());
    }
    report
}

// ============================================================================
// SECTION: Governance Defaults
// ============================================================================

/// Fills governance gaps in a draft with the fixed default policy.
///
/// Defaults are `exportability: restricted`, `visibility: private`, and
/// `created_at: now`. Explicitly supplied values always win, which makes the
/// function idempotent: defaults only ever fill gaps, never overwrite.
#[must_use]
pub fn apply_default_governance(mut draft: DraftArtifact, now: Timestamp) -> DraftArtifact {
    if draft.governance.exportability.is_none() {
        draft.governance.exportability = Some(Exportability::Restricted);
    }
    if draft.meta.visibility.is_none() {
        draft.meta.visibility = Some(Visibility::Private);
    }
    if draft.meta.created_at.is_none() {
        draft.meta.created_at = Some(now);
    }
    draft
}
