// crates/custodian-tools/src/extract.rs
// ============================================================================
// Module: Extract Tool
// Description: Content-to-artifact intake pipeline.
// Purpose: Turn raw content into a governed artifact with provenance.
// Dependencies: custodian-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Extraction turns raw caller content into a draft artifact through the
//! pluggable extraction capability, fills governance gaps with the default
//! policy, stamps ownership from the resolved identity, records the intake in
//! the provenance chain, and optionally persists the result. Every artifact
//! leaving this tool carries a governance aggregate; nothing ungoverned is
//! ever handed to storage.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use custodian_core::Artifact;
use custodian_core::ArtifactId;
use custodian_core::ContentExtractor;
use custodian_core::DraftError;
use custodian_core::ExtractionInput;
use custodian_core::ExtractorError;
use custodian_core::IdentityContext;
use custodian_core::ProvenanceAction;
use custodian_core::RecordStore;
use custodian_core::StorageError;
use custodian_core::Timestamp;
use custodian_core::apply_default_governance;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Request and Outcome
// ============================================================================

/// One extraction request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractRequest {
    /// Content text to extract from.
    pub text: String,
    /// Optional base64-encoded image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Caller-supplied metadata forwarded to the capability.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
    /// Whether the extracted artifact is persisted.
    #[serde(default)]
    pub persist: bool,
}

/// Result of a successful extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractOutcome {
    /// The assembled artifact.
    pub artifact: Artifact,
    /// Identifier assigned by storage when the request asked to persist.
    pub stored_id: Option<String>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Extract tool failure taxonomy.
///
/// # Invariants
/// - Variants are stable; lower-layer causes are preserved as sources.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The request was rejected before the capability was invoked.
    #[error("invalid extraction input: {message}")]
    InvalidInput {
        /// What was wrong with the request.
        message: String,
    },
    /// The extraction capability failed.
    #[error("extraction failed")]
    ExtractionFailed {
        /// Capability failure.
        #[source]
        source: ExtractorError,
    },
    /// Persisting the extracted artifact failed.
    #[error("failed to store extracted artifact")]
    StorageFailed {
        /// Storage failure.
        #[source]
        source: StorageError,
    },
}

impl From<DraftError> for ExtractError {
    fn from(source: DraftError) -> Self {
        Self::InvalidInput { message: source.to_string() }
    }
}

// ============================================================================
// SECTION: Extract Tool
// ============================================================================

/// Intake pipeline from raw content to governed artifact.
pub struct ExtractTool {
    /// Pluggable extraction capability.
    extractor: Arc<dyn ContentExtractor>,
    /// Artifact store used when the request asks to persist.
    store: Arc<dyn RecordStore<Artifact>>,
}

impl ExtractTool {
    /// Creates the tool over an extraction capability and an artifact store.
    #[must_use]
    pub fn new(extractor: Arc<dyn ContentExtractor>, store: Arc<dyn RecordStore<Artifact>>) -> Self {
        Self { extractor, store }
    }

    /// Runs the extraction pipeline.
    ///
    /// Input is rejected before the capability runs when the text is empty
    /// after trimming. The draft gets default governance, ownership stamped
    /// from `identity`, and an `extracted` provenance action appended before
    /// assembly.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidInput`] for empty input or a draft the
    /// capability left unassemblable, [`ExtractError::ExtractionFailed`] when
    /// the capability fails, and [`ExtractError::StorageFailed`] when the
    /// persist step fails.
    pub fn extract(
        &self,
        request: &ExtractRequest,
        identity: Option<&IdentityContext>,
        now: Timestamp,
    ) -> Result<ExtractOutcome, ExtractError> {
        if request.text.trim().is_empty() {
            return Err(ExtractError::InvalidInput {
                message: "extraction text must not be empty".to_string(),
            });
        }
        let input = ExtractionInput {
            text: request.text.clone(),
            image: request.image.clone(),
            metadata: request.metadata.clone(),
        };
        let draft = self
            .extractor
            .extract(&input)
            .map_err(|source| ExtractError::ExtractionFailed { source })?;
        let mut draft = apply_default_governance(draft, now);
        if let Some(identity) = identity {
            if draft.meta.owner_user_id.is_none() {
                draft.meta.owner_user_id = Some(identity.user_id.clone());
            }
            if draft.meta.owner_org_id.is_none() {
                draft.meta.owner_org_id = identity.org_id.clone();
            }
        }
        let mut artifact = draft.assemble()?;
        artifact.provenance.chain.push(ProvenanceAction {
            timestamp: now,
            action: "extracted".to_string(),
            actor: identity.map_or_else(|| "anonymous".to_string(), |id| id.user_id.to_string()),
            detail: BTreeMap::new(),
        });
        let stored_id = if request.persist {
            let id = self
                .store
                .save(artifact.clone())
                .map_err(|source| ExtractError::StorageFailed { source })?;
            artifact.id = ArtifactId::new(id.clone());
            Some(id)
        } else {
            None
        };
        Ok(ExtractOutcome { artifact, stored_id })
    }
}
