// crates/custodian-core/src/core/artifact.rs
// ============================================================================
// Module: Artifact Model
// Description: Governed, versioned data record with metadata and provenance.
// Purpose: Define the canonical artifact aggregates and their wire forms.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! An artifact is the unit of governed data in Custodian: an identified,
//! versioned record carrying metadata, opaque content, a provenance trail, and
//! the governance policy that gates every access to it. Governance field
//! values are part of the wire contract and round-trip exactly; unknown
//! values are deserialization errors, never coerced.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::ArtifactId;
use crate::core::identifiers::OrgId;
use crate::core::identifiers::UserId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Governance Enumerations
// ============================================================================

/// Policy tier controlling whether content may leave the trust boundary.
///
/// # Invariants
/// - Wire values are exactly `allowed`, `restricted`, `prohibited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exportability {
    /// Content may be exported.
    Allowed,
    /// Export requires out-of-band clearance; denied by this layer.
    Restricted,
    /// Export is never permitted.
    Prohibited,
}

impl Exportability {
    /// Returns the stable wire label for the value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::Restricted => "restricted",
            Self::Prohibited => "prohibited",
        }
    }
}

impl fmt::Display for Exportability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy tier controlling who may read an artifact at all.
///
/// # Invariants
/// - Wire values are exactly `public`, `private`, `shared`.
/// - Absent on the wire defaults to `private`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Readable by anyone, identity or not.
    Public,
    /// Readable only by the owning user.
    #[default]
    Private,
    /// Readable by the owner, the owning organization, or explicit grants.
    Shared,
}

impl Visibility {
    /// Returns the stable wire label for the value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Shared => "shared",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Aggregates
// ============================================================================

/// Descriptive and ownership metadata for an artifact.
///
/// # Invariants
/// - `visibility` defaults to [`Visibility::Private`] when absent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMeta {
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Last update timestamp, set only by explicit saves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    /// Visibility tier.
    #[serde(default)]
    pub visibility: Visibility,
    /// Owning user identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_user_id: Option<UserId>,
    /// Owning organization identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_org_id: Option<OrgId>,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    /// Optional human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Opaque artifact content.
///
/// # Invariants
/// - `data` is opaque to the governance layer; only presence is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactContent {
    /// Opaque type tag for the payload.
    pub content_type: String,
    /// Opaque payload map.
    #[serde(default)]
    pub data: BTreeMap<String, Value>,
    /// Optional format hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// One recorded action in an artifact's provenance chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceAction {
    /// When the action occurred.
    pub timestamp: Timestamp,
    /// Action label.
    pub action: String,
    /// Actor who performed the action.
    pub actor: String,
    /// Action-specific detail map.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub detail: BTreeMap<String, Value>,
}

/// Provenance trail for an artifact.
///
/// # Invariants
/// - `chain` is ordered oldest-first and is append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// Source identifier.
    pub source: String,
    /// Optional source URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Optional extraction-method tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_method: Option<String>,
    /// Ordered chain of prior actions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chain: Vec<ProvenanceAction>,
}

/// Retention policy attached to an artifact's governance aggregate.
///
/// # Invariants
/// - When both fields are set, `expires_at` takes precedence; validation
///   surfaces this as a warning rather than resolving it silently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Retention duration in days from creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
    /// Absolute expiry timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
    /// Whether expired artifacts are eligible for automatic deletion.
    #[serde(default)]
    pub auto_delete: bool,
}

/// Governance policy attached to an artifact.
///
/// # Invariants
/// - Always present on persisted artifacts; `exportability` is authoritative
///   for export decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Governance {
    /// Exportability tier.
    pub exportability: Exportability,
    /// Optional retention policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention: Option<RetentionPolicy>,
    /// Optional classification tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    /// Optional compliance tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compliance_tags: Vec<String>,
}

/// Extraction metadata stamped by the tool pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionInfo {
    /// Model identifier that produced the artifact.
    pub model: String,
    /// Optional model version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    /// Optional confidence score in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Optional extraction timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_at: Option<Timestamp>,
}

// ============================================================================
// SECTION: Artifact
// ============================================================================

/// A governed, versioned data record.
///
/// # Invariants
/// - Persisted artifacts carry a non-empty `id`, a non-empty
///   `schema_version`, and a present `governance` aggregate.
/// - Mutation happens only through whole-record saves; there is no
///   partial-field patch operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Artifact identifier.
    pub id: ArtifactId,
    /// Schema version string.
    pub schema_version: String,
    /// Descriptive and ownership metadata.
    pub meta: ArtifactMeta,
    /// Opaque content.
    pub content: ArtifactContent,
    /// Provenance trail.
    pub provenance: Provenance,
    /// Governance policy.
    pub governance: Governance,
    /// Extraction metadata when produced by the tool pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction: Option<ExtractionInfo>,
}

// ============================================================================
// SECTION: Draft Artifact
// ============================================================================

/// Error raised when a draft cannot be assembled into an artifact.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    /// A required aggregate or field was absent.
    #[error("draft artifact missing required field: {field}")]
    Missing {
        /// Name of the missing field.
        field: &'static str,
    },
}

/// All-optional mirror of [`ArtifactMeta`] used on intake paths.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DraftMeta {
    /// Creation timestamp, filled by governance defaults when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Visibility tier, filled by governance defaults when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    /// Owning user identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_user_id: Option<UserId>,
    /// Owning organization identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_org_id: Option<OrgId>,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    /// Optional human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// All-optional mirror of [`Governance`] used on intake paths.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DraftGovernance {
    /// Exportability tier, filled by governance defaults when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exportability: Option<Exportability>,
    /// Optional retention policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention: Option<RetentionPolicy>,
    /// Optional classification tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    /// Optional compliance tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compliance_tags: Vec<String>,
}

/// Partially specified artifact produced by extraction capabilities.
///
/// # Invariants
/// - Defaults only ever fill gaps; explicitly supplied values are preserved
///   through [`assemble`](Self::assemble) and governance defaulting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DraftArtifact {
    /// Artifact identifier, assigned by storage when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ArtifactId>,
    /// Schema version, defaulted to the current schema when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Draft metadata.
    #[serde(default)]
    pub meta: DraftMeta,
    /// Opaque content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ArtifactContent>,
    /// Provenance trail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
    /// Draft governance policy.
    #[serde(default)]
    pub governance: DraftGovernance,
    /// Extraction metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction: Option<ExtractionInfo>,
}

impl DraftArtifact {
    /// Assembles the draft into a full artifact.
    ///
    /// Callers run governance defaulting first; this only checks that the
    /// aggregates an artifact cannot exist without are present.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::Missing`] when content, provenance, a creation
    /// timestamp, or an exportability tier is absent.
    pub fn assemble(self) -> Result<Artifact, DraftError> {
        let content = self.content.ok_or(DraftError::Missing { field: "content" })?;
        let provenance = self.provenance.ok_or(DraftError::Missing { field: "provenance" })?;
        let created_at =
            self.meta.created_at.ok_or(DraftError::Missing { field: "meta.created_at" })?;
        let exportability = self
            .governance
            .exportability
            .ok_or(DraftError::Missing { field: "governance.exportability" })?;
        Ok(Artifact {
            id: self.id.unwrap_or_else(|| ArtifactId::new("")),
            schema_version: self
                .schema_version
                .unwrap_or_else(|| crate::core::identifiers::CURRENT_SCHEMA_VERSION.to_string()),
            meta: ArtifactMeta {
                created_at,
                updated_at: None,
                visibility: self.meta.visibility.unwrap_or_default(),
                owner_user_id: self.meta.owner_user_id,
                owner_org_id: self.meta.owner_org_id,
                tags: self.meta.tags,
                title: self.meta.title,
                description: self.meta.description,
            },
            content,
            provenance,
            governance: Governance {
                exportability,
                retention: self.governance.retention,
                classification: self.governance.classification,
                compliance_tags: self.governance.compliance_tags,
            },
            extraction: self.extraction,
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
