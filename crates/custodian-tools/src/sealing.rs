// crates/custodian-tools/src/sealing.rs
// ============================================================================
// Module: Ed25519 Sealing
// Description: Genuine asymmetric signing and verification for envelopes.
// Purpose: Implement the seal capability contracts over ed25519-dalek.
// Dependencies: base64, custodian-core, ed25519-dalek, serde_json
// ============================================================================

//! ## Overview
//! The shipped sealing capability signs the canonical JSON serialization of
//! an artifact with Ed25519. Key material is the 32-byte seed; the signature
//! and the embedded public key travel base64-encoded inside the envelope's
//! signature record.
//!
//! Security posture: verification fails closed. An envelope without an
//! embedded public key, or with key or signature material that does not
//! decode to the exact Ed25519 lengths, is unverified, never an error the
//! caller might mistake for a transient fault.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use custodian_core::Artifact;
use custodian_core::Envelope;
use custodian_core::EnvelopeId;
use custodian_core::SealError;
use custodian_core::SealSigner;
use custodian_core::SealVerifier;
use custodian_core::SignatureRecord;
use custodian_core::SignerId;
use custodian_core::Timestamp;
use custodian_core::VerifyDecision;
use ed25519_dalek::SECRET_KEY_LENGTH;
use ed25519_dalek::Signature;
use ed25519_dalek::Signer;
use ed25519_dalek::SigningKey;
use ed25519_dalek::Verifier;
use ed25519_dalek::VerifyingKey;

// ============================================================================
// SECTION: Canonical Form
// ============================================================================

/// Serializes the artifact to its canonical signing form.
///
/// Map aggregates are ordered containers, so the byte form is deterministic
/// for a given artifact value.
fn canonical_bytes(artifact: &Artifact) -> Result<Vec<u8>, SealError> {
    serde_json::to_vec(artifact).map_err(|source| SealError::Capability {
        message: format!("artifact serialization failed: {source}"),
    })
}

// ============================================================================
// SECTION: Sealer
// ============================================================================

/// Ed25519 signing capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Sealer;

impl Ed25519Sealer {
    /// Creates the sealer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SealSigner for Ed25519Sealer {
    fn sign(
        &self,
        artifact: &Artifact,
        key: &[u8],
        signer: &SignerId,
        algorithm: &str,
        sealed_at: Timestamp,
    ) -> Result<Envelope, SealError> {
        let seed: [u8; SECRET_KEY_LENGTH] = key.try_into().map_err(|_| SealError::Key {
            message: format!(
                "ed25519 key material must be exactly {SECRET_KEY_LENGTH} bytes, got {}",
                key.len()
            ),
        })?;
        let signing_key = SigningKey::from_bytes(&seed);
        let message = canonical_bytes(artifact)?;
        let signature = signing_key.sign(&message);
        Ok(Envelope {
            id: EnvelopeId::derive(&artifact.id, sealed_at),
            artifact: artifact.clone(),
            signature: SignatureRecord {
                algorithm: algorithm.to_string(),
                signer_id: signer.clone(),
                value: BASE64.encode(signature.to_bytes()),
                public_key: Some(BASE64.encode(signing_key.verifying_key().to_bytes())),
            },
            sealed_at,
        })
    }
}

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// Ed25519 verification capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519SealVerifier;

impl Ed25519SealVerifier {
    /// Creates the verifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SealVerifier for Ed25519SealVerifier {
    fn verify(&self, envelope: &Envelope) -> Result<VerifyDecision, SealError> {
        let Some(encoded_key) = &envelope.signature.public_key else {
            return Ok(VerifyDecision::unverified("envelope carries no public key"));
        };
        let Ok(key_bytes) = BASE64.decode(encoded_key) else {
            return Ok(VerifyDecision::unverified("public key is not valid base64"));
        };
        let Ok(key_array) = <[u8; 32]>::try_from(key_bytes.as_slice()) else {
            return Ok(VerifyDecision::unverified("public key has the wrong length"));
        };
        let Ok(verifying_key) = VerifyingKey::from_bytes(&key_array) else {
            return Ok(VerifyDecision::unverified("public key is not a valid ed25519 point"));
        };
        let Ok(signature_bytes) = BASE64.decode(&envelope.signature.value) else {
            return Ok(VerifyDecision::unverified("signature is not valid base64"));
        };
        let Ok(signature) = Signature::from_slice(&signature_bytes) else {
            return Ok(VerifyDecision::unverified("signature has the wrong length"));
        };
        let message = canonical_bytes(&envelope.artifact)?;
        if verifying_key.verify(&message, &signature).is_ok() {
            Ok(VerifyDecision::verified())
        } else {
            Ok(VerifyDecision::unverified("signature does not match artifact"))
        }
    }
}
