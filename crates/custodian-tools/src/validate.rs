// crates/custodian-tools/src/validate.rs
// ============================================================================
// Module: Validate Tool
// Description: Structural validation of raw artifact records.
// Purpose: Report everything wrong with a record instead of failing on parse.
// Dependencies: custodian-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Validation takes a raw JSON value rather than a typed artifact so that a
//! record with missing aggregates produces a report listing every problem,
//! not a single deserialization failure. Strict mode promotes warnings to
//! errors for callers that want advisory conditions to block.

// ============================================================================
// SECTION: Imports
// ============================================================================

use custodian_core::Artifact;
use custodian_core::Timestamp;
use custodian_core::Visibility;
use custodian_core::validate_governance_value;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Report
// ============================================================================

/// Prefix stamped on warnings promoted to errors in strict mode.
const STRICT_PREFIX: &str = "strict:";

/// Validation outcome for one record.
///
/// # Invariants
/// - `valid` is true exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationReport {
    /// Whether the record passed validation.
    pub valid: bool,
    /// Fatal structural errors.
    pub errors: Vec<String>,
    /// Advisory warnings.
    pub warnings: Vec<String>,
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates the structure of a raw artifact record.
///
/// Checks identifier, schema version, governance (via the governance
/// engine's lenient validator), visibility, content, provenance, and the
/// creation timestamp. In strict mode every warning is re-emitted as an
/// error prefixed `strict:` and the record is invalid if any warning existed.
#[must_use]
pub fn validate_artifact_value(value: &Value, strict: bool) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    match value.get("id").and_then(Value::as_str) {
        Some(id) if !id.trim().is_empty() => {}
        Some(_) => errors.push("artifact id must not be blank".to_string()),
        None => errors.push("artifact id is missing or not a string".to_string()),
    }
    match value.get("schema_version").and_then(Value::as_str) {
        Some(version) if !version.trim().is_empty() => {}
        Some(_) => errors.push("schema_version must not be blank".to_string()),
        None => errors.push("schema_version is missing or not a string".to_string()),
    }

    let governance_report = validate_governance_value(value);
    errors.extend(governance_report.errors);
    warnings.extend(governance_report.warnings);

    if let Some(raw) = value
        .get("meta")
        .and_then(|meta| meta.get("visibility"))
        .and_then(Value::as_str)
        && serde_json::from_value::<Visibility>(Value::String(raw.to_string())).is_err()
    {
        warnings.push(format!("unknown visibility value: {raw}"));
    }

    match value.get("content") {
        Some(content) => match content.get("content_type").and_then(Value::as_str) {
            Some(content_type) if !content_type.trim().is_empty() => {}
            Some(_) => errors.push("content content_type must not be blank".to_string()),
            None => errors.push("content content_type is missing or not a string".to_string()),
        },
        None => errors.push("content aggregate is missing".to_string()),
    }

    match value.get("provenance") {
        Some(provenance) => match provenance.get("source").and_then(Value::as_str) {
            Some(source) if !source.trim().is_empty() => {}
            Some(_) => errors.push("provenance source must not be blank".to_string()),
            None => errors.push("provenance source is missing or not a string".to_string()),
        },
        None => errors.push("provenance aggregate is missing".to_string()),
    }

    match value.get("meta").and_then(|meta| meta.get("created_at")).and_then(Value::as_str) {
        Some(raw) => {
            if Timestamp::parse_rfc3339(raw).is_err() {
                errors.push(format!("meta created_at is not a valid RFC 3339 timestamp: {raw}"));
            }
        }
        None => errors.push("meta created_at is missing or not a string".to_string()),
    }

    if strict {
        for warning in &warnings {
            errors.push(format!("{STRICT_PREFIX} {warning}"));
        }
    }
    ValidationReport { valid: errors.is_empty(), errors, warnings }
}

/// Validates a typed artifact through its canonical JSON form.
///
/// Typed artifacts cannot express most structural absences, so this is a
/// convenience for callers holding a parsed record.
#[must_use]
pub fn validate_artifact(artifact: &Artifact, strict: bool) -> ValidationReport {
    match serde_json::to_value(artifact) {
        Ok(value) => validate_artifact_value(&value, strict),
        Err(source) => ValidationReport {
            valid: false,
            errors: vec![format!("artifact serialization failed: {source}")],
            warnings: Vec::new(),
        },
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
