// crates/custodian-tools/src/lib.rs
// ============================================================================
// Module: Custodian Tools
// Description: Tool pipeline, identity composition, and sealing capability.
// Purpose: Provide the governed intake, sealing, and validation operations.
// Dependencies: async-trait, base64, custodian-core, ed25519-dalek, serde_json
// ============================================================================

//! ## Overview
//! The tools crate holds the operations an external adapter exposes: extract
//! (content to governed artifact), seal (artifact to signed envelope), and
//! validate (structural report over a raw record), plus the composable
//! identity resolvers that turn request metadata into identity contexts and
//! the Ed25519 implementation of the sealing capability.
//!
//! Security posture: every tool checks its governance preconditions itself
//! rather than trusting the caller; the seal pipeline in particular refuses
//! non-exportable artifacts before any key material is touched.

/// Identity resolver composition.
pub mod auth;
/// Content-to-artifact intake pipeline.
pub mod extract;
/// Governance-gated envelope creation.
pub mod seal;
/// Ed25519 sealing capability.
pub mod sealing;
/// Structural record validation.
pub mod validate;

pub use auth::AuthRequest;
pub use auth::CAPABILITIES_HEADER;
pub use auth::HeaderResolver;
pub use auth::IdentityResolver;
pub use auth::ORG_HEADER;
pub use auth::OrgEnricher;
pub use auth::PERMISSIONS_HEADER;
pub use auth::ResolverChain;
pub use auth::USER_HEADER;
pub use extract::ExtractError;
pub use extract::ExtractOutcome;
pub use extract::ExtractRequest;
pub use extract::ExtractTool;
pub use seal::SealConfig;
pub use seal::SealOutcome;
pub use seal::SealRequest;
pub use seal::SealTool;
pub use seal::SealToolError;
pub use seal::decode_hex_key;
pub use sealing::Ed25519SealVerifier;
pub use sealing::Ed25519Sealer;
pub use validate::ValidationReport;
pub use validate::validate_artifact;
pub use validate::validate_artifact_value;
