// crates/custodian-tools/src/seal.rs
// ============================================================================
// Module: Seal Tool
// Description: Governance-gated envelope creation pipeline.
// Purpose: Seal an artifact into a signed envelope only when policy allows.
// Dependencies: custodian-core, serde, thiserror
// ============================================================================

//! ## Overview
//! Sealing wraps an artifact in a signed envelope. Preconditions run in a
//! fixed order and each failure stops the pipeline before anything later
//! runs: artifact identity, governance validation, exportability, signer
//! format, and key decoding all pass before the signing capability is ever
//! invoked, and signing succeeds before any store write. Governance warnings
//! are advisory; they ride along on the outcome and never block a seal.
//!
//! Security posture: exportability is checked here even though the resource
//! layer checks it again on release; a prohibited artifact must never be
//! signed in the first place.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use custodian_core::Artifact;
use custodian_core::Envelope;
use custodian_core::Exportability;
use custodian_core::RecordStore;
use custodian_core::SealSigner;
use custodian_core::SignerId;
use custodian_core::StorageError;
use custodian_core::Timestamp;
use custodian_core::can_export;
use custodian_core::validate_governance;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Seal tool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealConfig {
    /// Required signer identifier prefix.
    pub signer_prefix: String,
    /// Signature algorithm label recorded on envelopes.
    pub algorithm: String,
}

impl Default for SealConfig {
    fn default() -> Self {
        Self { signer_prefix: "did:".to_string(), algorithm: "ed25519".to_string() }
    }
}

// ============================================================================
// SECTION: Request, Outcome, Errors
// ============================================================================

/// One seal request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SealRequest {
    /// Artifact to seal.
    pub artifact: Artifact,
    /// Signer identity; must carry the configured prefix.
    pub signer: SignerId,
    /// Hex-encoded private key material, optionally `0x`-prefixed.
    pub key_hex: String,
    /// Whether the sealed envelope is persisted.
    pub persist: bool,
}

/// Result of a successful seal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SealOutcome {
    /// The sealed envelope.
    pub envelope: Envelope,
    /// Identifier assigned by storage when the request asked to persist.
    pub stored_id: Option<String>,
    /// Advisory governance warnings carried through from validation.
    pub warnings: Vec<String>,
}

/// Seal tool failure taxonomy.
///
/// # Invariants
/// - Variants are stable; lower-layer causes are preserved as sources.
#[derive(Debug, Error)]
pub enum SealToolError {
    /// The request was structurally unusable.
    #[error("invalid seal input: {message}")]
    InvalidInput {
        /// What was wrong with the request.
        message: String,
    },
    /// The artifact's governance refused the seal.
    #[error("governance violation: {message}")]
    GovernanceViolation {
        /// The refusing policy condition.
        message: String,
    },
    /// The key material failed to decode.
    #[error("invalid key material: {message}")]
    InvalidKey {
        /// What was wrong with the key material.
        message: String,
    },
    /// The signing capability failed.
    #[error("signing failed")]
    SigningFailed {
        /// Capability failure.
        #[source]
        source: custodian_core::SealError,
    },
    /// Persisting the envelope failed.
    #[error("failed to store envelope")]
    StorageFailed {
        /// Storage failure.
        #[source]
        source: StorageError,
    },
}

// ============================================================================
// SECTION: Key Decoding
// ============================================================================

/// Decodes hex-encoded key material.
///
/// Accepts an optional `0x` prefix; the digit count must be even and every
/// digit must be hex. Decoding runs before the signing capability so unusable
/// key material never reaches a cryptographic primitive.
///
/// # Errors
///
/// Returns [`SealToolError::InvalidKey`] describing the first violation.
pub fn decode_hex_key(raw: &str) -> Result<Vec<u8>, SealToolError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() {
        return Err(SealToolError::InvalidKey {
            message: "key material must not be empty".to_string(),
        });
    }
    if digits.len() % 2 != 0 {
        return Err(SealToolError::InvalidKey {
            message: "key hex must have an even number of digits".to_string(),
        });
    }
    let mut bytes = Vec::with_capacity(digits.len() / 2);
    let raw_bytes = digits.as_bytes();
    for pair in raw_bytes.chunks_exact(2) {
        let high = hex_digit(pair[0])?;
        let low = hex_digit(pair[1])?;
        bytes.push((high << 4) | low);
    }
    Ok(bytes)
}

/// Decodes one ASCII hex digit.
fn hex_digit(digit: u8) -> Result<u8, SealToolError> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        other => Err(SealToolError::InvalidKey {
            message: format!("key hex contains non-hex byte '{}'", char::from(other)),
        }),
    }
}

// ============================================================================
// SECTION: Seal Tool
// ============================================================================

/// Governance-gated sealing pipeline.
pub struct SealTool {
    /// Signing capability producing the envelope.
    signer: Arc<dyn SealSigner>,
    /// Envelope store used when the request asks to persist.
    store: Arc<dyn RecordStore<Envelope>>,
    /// Tool configuration.
    config: SealConfig,
}

impl SealTool {
    /// Creates the tool over a signing capability and an envelope store.
    #[must_use]
    pub fn new(
        signer: Arc<dyn SealSigner>,
        store: Arc<dyn RecordStore<Envelope>>,
        config: SealConfig,
    ) -> Self {
        Self { signer, store, config }
    }

    /// Runs the sealing pipeline.
    ///
    /// # Errors
    ///
    /// In check order: [`SealToolError::InvalidInput`] for a missing artifact
    /// id or a signer without the configured prefix,
    /// [`SealToolError::GovernanceViolation`] for governance errors or a
    /// non-exportable artifact, [`SealToolError::InvalidKey`] for undecodable
    /// key material, [`SealToolError::SigningFailed`] when the capability
    /// fails, and [`SealToolError::StorageFailed`] when the persist step
    /// fails.
    pub fn seal(&self, request: &SealRequest, now: Timestamp) -> Result<SealOutcome, SealToolError> {
        let artifact = &request.artifact;
        if artifact.id.is_empty() {
            return Err(SealToolError::InvalidInput {
                message: "artifact must carry an identifier before sealing".to_string(),
            });
        }
        let report = validate_governance(artifact);
        if !report.is_valid() {
            return Err(SealToolError::GovernanceViolation {
                message: report.errors.join("; "),
            });
        }
        if !can_export(artifact) {
            let message = match artifact.governance.exportability {
                Exportability::Prohibited => "export prohibited by governance policy",
                Exportability::Restricted | Exportability::Allowed => {
                    "export restricted; clearance required"
                }
            };
            return Err(SealToolError::GovernanceViolation { message: message.to_string() });
        }
        if !request.signer.as_str().starts_with(&self.config.signer_prefix) {
            return Err(SealToolError::InvalidInput {
                message: format!(
                    "signer identifier must start with {}",
                    self.config.signer_prefix
                ),
            });
        }
        let key = decode_hex_key(&request.key_hex)?;
        let envelope = self
            .signer
            .sign(artifact, &key, &request.signer, &self.config.algorithm, now)
            .map_err(|source| SealToolError::SigningFailed { source })?;
        let stored_id = if request.persist {
            Some(
                self.store
                    .save(envelope.clone())
                    .map_err(|source| SealToolError::StorageFailed { source })?,
            )
        } else {
            None
        };
        Ok(SealOutcome { envelope, stored_id, warnings: report.warnings })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
