// crates/custodian-store-fs/src/lib.rs
// ============================================================================
// Module: Custodian Filesystem Store
// Description: Durable file-per-record storage backend.
// Purpose: Persist artifacts and envelopes as one JSON file per record.
// Dependencies: custodian-core, serde_json, tempfile
// ============================================================================

//! ## Overview
//! This crate implements the [`custodian_core::RecordStore`] contract on top
//! of a plain directory tree: one pretty-printed JSON file per record,
//! written atomically via a tempfile rename. Identifiers are sanitized before
//! they ever touch a path, and the store honors only pagination natively;
//! callers re-apply richer filters per the storage contract.
//!
//! Security posture: record identifiers may arrive from untrusted callers and
//! must never be able to escape the store root; see the sanitization rules in
//! [`store`].

/// File-per-record store implementation.
pub mod store;

pub use store::FsStore;
