// crates/custodian-core/src/runtime/mod.rs
// ============================================================================
// Module: Custodian Core Runtime
// Description: Reference implementations of the core storage contract.
// Purpose: Provide the volatile in-memory backend shipped with the core.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Runtime holds the reference backend implementations that ship with the
//! core crate. Durable backends live in their own crates against the same
//! [`crate::interfaces::RecordStore`] contract.

/// Volatile in-memory record store.
pub mod memory;

pub use memory::MemoryStore;
