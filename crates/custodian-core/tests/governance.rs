// crates/custodian-core/tests/governance.rs
// ============================================================================
// Module: Governance Engine Tests
// Description: Scenario coverage for purpose-scoped access decisions.
// Purpose: Validate expiry, visibility, ownership, and export gating order.
// Dependencies: custodian-core
// ============================================================================

//! Access-decision scenarios over artifact governance fields.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::collections::BTreeMap;

use custodian_core::AccessPurpose;
use custodian_core::Artifact;
use custodian_core::ArtifactContent;
use custodian_core::ArtifactId;
use custodian_core::ArtifactMeta;
use custodian_core::Capability;
use custodian_core::Exportability;
use custodian_core::Governance;
use custodian_core::IdentityContext;
use custodian_core::OrgId;
use custodian_core::Provenance;
use custodian_core::RetentionPolicy;
use custodian_core::Timestamp;
use custodian_core::UserId;
use custodian_core::Visibility;
use custodian_core::can_access;
use custodian_core::check_visibility;
use custodian_core::is_expired;
use custodian_core::validate_governance;
use custodian_core::validate_governance_value;
use serde_json::json;

/// Fixed evaluation instant for deterministic expiry checks.
const NOW: Timestamp = Timestamp::from_unix_millis(1_700_000_000_000);

/// Builds a minimal artifact with the given policy fields.
fn artifact(visibility: Visibility, exportability: Exportability) -> Artifact {
    Artifact {
        id: ArtifactId::new("art-1"),
        schema_version: "1.0".to_string(),
        meta: ArtifactMeta {
            created_at: Timestamp::from_unix_millis(1_600_000_000_000),
            updated_at: None,
            visibility,
            owner_user_id: Some(UserId::new("u1")),
            owner_org_id: Some(OrgId::new("org1")),
            tags: std::collections::BTreeSet::new(),
            title: None,
            description: None,
        },
        content: ArtifactContent {
            content_type: "note".to_string(),
            data: BTreeMap::new(),
            format: None,
        },
        provenance: Provenance {
            source: "test".to_string(),
            source_url: None,
            extraction_method: None,
            chain: Vec::new(),
        },
        governance: Governance {
            exportability,
            retention: None,
            classification: None,
            compliance_tags: Vec::new(),
        },
        extraction: None,
    }
}

/// Builds an identity for the given user with no extra capabilities.
fn identity(user: &str) -> IdentityContext {
    IdentityContext::new(UserId::new(user))
}

/// Builds an administrative identity.
fn admin() -> IdentityContext {
    let mut context = identity("root");
    context.capabilities.insert(Capability::Administer);
    context
}

#[test]
fn owner_reads_private_artifact_and_stranger_is_denied() {
    let subject = artifact(Visibility::Private, Exportability::Allowed);
    let decision = can_access(&subject, Some(&identity("u1")), AccessPurpose::Read, NOW);
    assert!(decision.allowed);
    assert!(decision.reasons.is_empty());

    let denied = can_access(&subject, Some(&identity("u2")), AccessPurpose::Read, NOW);
    assert!(!denied.allowed);
    assert_eq!(denied.reasons, vec!["visibility check failed".to_string()]);
}

#[test]
fn public_read_needs_no_identity_but_prohibited_export_fails() {
    let subject = artifact(Visibility::Public, Exportability::Prohibited);
    assert!(can_access(&subject, None, AccessPurpose::Read, NOW).allowed);

    let denied = can_access(&subject, None, AccessPurpose::Export, NOW);
    assert!(!denied.allowed);
    assert_eq!(denied.reasons, vec!["export prohibited by governance policy".to_string()]);
}

#[test]
fn restricted_export_denial_is_distinguishable_from_prohibited() {
    let restricted = artifact(Visibility::Public, Exportability::Restricted);
    let denied = can_access(&restricted, None, AccessPurpose::Export, NOW);
    assert!(!denied.allowed);
    assert_eq!(denied.reasons, vec!["export restricted; clearance required".to_string()]);
}

#[test]
fn prohibited_export_denies_even_administrators() {
    let subject = artifact(Visibility::Public, Exportability::Prohibited);
    let denied = can_access(&subject, Some(&admin()), AccessPurpose::Export, NOW);
    assert!(!denied.allowed);
}

#[test]
fn expiry_denies_every_purpose_with_no_admin_bypass() {
    let mut subject = artifact(Visibility::Public, Exportability::Allowed);
    subject.governance.retention = Some(RetentionPolicy {
        duration_days: None,
        expires_at: Some(Timestamp::from_unix_millis(1_600_000_000_001)),
        auto_delete: false,
    });
    for purpose in
        [AccessPurpose::Read, AccessPurpose::Export, AccessPurpose::Modify, AccessPurpose::Delete]
    {
        let denied = can_access(&subject, Some(&admin()), purpose, NOW);
        assert!(!denied.allowed, "expired artifact allowed {purpose}");
        assert_eq!(denied.reasons, vec!["expired".to_string()]);
    }
}

#[test]
fn duration_days_expiry_counts_from_creation() {
    let mut subject = artifact(Visibility::Public, Exportability::Allowed);
    subject.governance.retention =
        Some(RetentionPolicy { duration_days: Some(30), expires_at: None, auto_delete: false });
    // 1_600_000_000_000 + 30 days is well before NOW.
    assert!(is_expired(&subject, NOW));
    let fresh = Timestamp::from_unix_millis(1_600_000_000_000 + 24 * 60 * 60 * 1_000);
    assert!(!is_expired(&subject, fresh));
}

#[test]
fn expires_at_takes_precedence_over_duration_days() {
    let mut subject = artifact(Visibility::Public, Exportability::Allowed);
    // Duration alone would have expired long ago; the later absolute expiry wins.
    subject.governance.retention = Some(RetentionPolicy {
        duration_days: Some(1),
        expires_at: Some(Timestamp::from_unix_millis(1_900_000_000_000)),
        auto_delete: false,
    });
    assert!(!is_expired(&subject, NOW));
}

#[test]
fn absent_retention_never_expires() {
    let subject = artifact(Visibility::Public, Exportability::Allowed);
    assert!(!is_expired(&subject, Timestamp::from_unix_millis(i64::MAX)));
}

#[test]
fn modify_and_delete_require_identity_then_owner_or_admin() {
    let subject = artifact(Visibility::Private, Exportability::Allowed);

    let anonymous = can_access(&subject, None, AccessPurpose::Modify, NOW);
    assert_eq!(anonymous.reasons, vec!["authentication required".to_string()]);

    let stranger = can_access(&subject, Some(&identity("u2")), AccessPurpose::Delete, NOW);
    assert_eq!(stranger.reasons, vec!["only owner or admin".to_string()]);

    assert!(can_access(&subject, Some(&identity("u1")), AccessPurpose::Modify, NOW).allowed);
    assert!(can_access(&subject, Some(&admin()), AccessPurpose::Delete, NOW).allowed);
}

#[test]
fn admin_bypasses_visibility_for_reads_only() {
    let subject = artifact(Visibility::Private, Exportability::Allowed);
    assert!(can_access(&subject, Some(&admin()), AccessPurpose::Read, NOW).allowed);
    assert!(can_access(&subject, Some(&admin()), AccessPurpose::Export, NOW).allowed);
}

#[test]
fn shared_visibility_admits_owner_org_member_and_explicit_grant() {
    let subject = artifact(Visibility::Shared, Exportability::Allowed);

    assert!(check_visibility(&subject, Some(&identity("u1"))));

    let mut org_member = identity("u3");
    org_member.org_id = Some(OrgId::new("org1"));
    assert!(check_visibility(&subject, Some(&org_member)));

    let mut granted = identity("u4");
    granted.permissions.insert("artifact:read:art-1".to_string());
    assert!(check_visibility(&subject, Some(&granted)));

    assert!(!check_visibility(&subject, Some(&identity("u5"))));
    assert!(!check_visibility(&subject, None));
}

#[test]
fn retention_precedence_is_a_warning_not_an_error() {
    let mut subject = artifact(Visibility::Public, Exportability::Allowed);
    subject.governance.retention = Some(RetentionPolicy {
        duration_days: Some(10),
        expires_at: Some(Timestamp::from_unix_millis(1_900_000_000_000)),
        auto_delete: false,
    });
    let report = validate_governance(&subject);
    assert!(report.is_valid());
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("expires_at takes precedence"));
}

#[test]
fn raw_validation_flags_missing_governance_as_single_fatal_error() {
    let report = validate_governance_value(&json!({
        "id": "art-1",
        "meta": {"created_at": "2024-01-01T00:00:00Z", "visibility": "public"}
    }));
    assert!(!report.is_valid());
    assert_eq!(report.errors, vec!["governance aggregate is missing".to_string()]);
}

#[test]
fn raw_validation_warns_on_missing_visibility() {
    let report = validate_governance_value(&json!({
        "id": "art-1",
        "governance": {"exportability": "allowed"},
        "meta": {"created_at": "2024-01-01T00:00:00Z"}
    }));
    assert!(report.is_valid());
    assert!(report.warnings.iter().any(|warning| warning.contains("default to private")));
}

#[test]
fn raw_validation_rejects_unknown_exportability() {
    let report = validate_governance_value(&json!({
        "governance": {"exportability": "open"}
    }));
    assert!(report.errors.iter().any(|error| error.contains("invalid exportability")));
}
