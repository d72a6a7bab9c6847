// crates/custodian-resources/src/registry.rs
// ============================================================================
// Module: Resource Registry
// Description: Routes opaque addresses to the provider for their kind.
// Purpose: Give the external adapter one entry point for reads and listings.
// Dependencies: crate::address, crate::provider
// ============================================================================

//! ## Overview
//! The registry is the single resolution entry point for the external
//! adapter: it parses opaque address strings, routes to the provider
//! registered for the kind, and aggregates listings across every provider.
//! Unknown kinds and malformed addresses are invalid-address errors; the
//! registry adds no policy of its own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use custodian_core::IdentityContext;
use custodian_core::Timestamp;

use crate::address::ResourceAddress;
use crate::address::ResourceKind;
use crate::provider::ResourceContent;
use crate::provider::ResourceEntry;
use crate::provider::ResourceError;
use crate::provider::ResourceProvider;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Registry of resource providers keyed by kind.
///
/// # Invariants
/// - At most one provider per kind; registration replaces.
#[derive(Default)]
pub struct ResourceRegistry {
    /// Providers keyed by the kind they resolve.
    providers: BTreeMap<ResourceKind, Arc<dyn ResourceProvider>>,
}

impl ResourceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider under its own kind.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn ResourceProvider>) -> Self {
        self.providers.insert(provider.kind(), provider);
        self
    }

    /// Resolves an opaque address string into released content.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidAddress`] for malformed addresses and
    /// unregistered kinds, otherwise whatever the provider returns.
    pub fn read(
        &self,
        raw_address: &str,
        identity: Option<&IdentityContext>,
        now: Timestamp,
    ) -> Result<ResourceContent, ResourceError> {
        let address = ResourceAddress::parse(raw_address)
            .map_err(|source| ResourceError::InvalidAddress { message: source.message })?;
        let provider = self.providers.get(&address.kind).ok_or_else(|| {
            ResourceError::InvalidAddress {
                message: format!("no provider registered for kind {}", address.kind),
            }
        })?;
        provider.read(&address, identity, now)
    }

    /// Enumerates resources across every registered provider.
    ///
    /// Providers skip entries the identity may not read; a provider with
    /// nothing visible simply contributes nothing.
    #[must_use]
    pub fn list(&self, identity: Option<&IdentityContext>, now: Timestamp) -> Vec<ResourceEntry> {
        self.providers.values().flat_map(|provider| provider.list(identity, now)).collect()
    }
}
