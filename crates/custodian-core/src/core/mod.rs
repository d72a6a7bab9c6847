// crates/custodian-core/src/core/mod.rs
// ============================================================================
// Module: Custodian Core Model
// Description: Data model and pure governance logic for governed records.
// Purpose: Group the artifact, envelope, identity, and policy modules.
// Dependencies: serde, serde_json, time
// ============================================================================

//! ## Overview
//! The core model holds the typed records Custodian governs and the pure
//! decision functions that gate access to them. Nothing here performs I/O.

/// Artifact model and aggregates.
pub mod artifact;
/// Envelope model.
pub mod envelope;
/// Pure governance decision functions.
pub mod governance;
/// Canonical identifiers.
pub mod identifiers;
/// Identity context and capabilities.
pub mod identity;
/// Canonical timestamps.
pub mod time;
