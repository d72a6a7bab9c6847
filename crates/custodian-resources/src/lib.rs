// crates/custodian-resources/src/lib.rs
// ============================================================================
// Module: Custodian Resources
// Description: Resource address resolution with governance and signature gates.
// Purpose: Turn opaque addresses into policy-gated content releases.
// Dependencies: custodian-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This crate implements the resource access protocol: opaque
//! `custodian://{kind}/{id}` addresses resolve through a storage lookup, the
//! governance engine, and (for envelopes) a fail-closed signature gate before
//! any content is released. Listings are coarse discovery and degrade
//! gracefully; single reads release full content and fail fast.
//!
//! Security posture: this crate sits on the trust boundary between storage
//! and the external adapter; every release path must consult the governance
//! engine and the envelope path must verify before evaluating policy.

/// Address parsing and formatting.
pub mod address;
/// Artifact resource provider.
pub mod artifacts;
/// Envelope resource provider.
pub mod envelopes;
/// Provider contract and error taxonomy.
pub mod provider;
/// Provider registry.
pub mod registry;

pub use address::AddressParseError;
pub use address::ResourceAddress;
pub use address::ResourceKind;
pub use address::SCHEME_PREFIX;
pub use artifacts::ARTIFACT_CONTENT_TYPE;
pub use artifacts::ArtifactProvider;
pub use envelopes::ENVELOPE_CONTENT_TYPE;
pub use envelopes::EnvelopeProvider;
pub use provider::ResourceContent;
pub use provider::ResourceEntry;
pub use provider::ResourceError;
pub use provider::ResourceProvider;
pub use registry::ResourceRegistry;
