// crates/custodian-tools/src/auth.rs
// ============================================================================
// Module: Identity Composition
// Description: Composable resolvers turning request metadata into identities.
// Purpose: Build one identity decision from ordered, single-purpose resolvers.
// Dependencies: async-trait, custodian-core
// ============================================================================

//! ## Overview
//! Identity resolution is composed from small resolvers: a chain tries each
//! resolver in registration order and the first resolved identity wins, and
//! an enricher wraps a resolver to fill gaps in what it produced without ever
//! overwriting a field the inner resolver set. The resolved context is handed
//! to callers as an explicit value; nothing here stores identity in shared
//! state.
//!
//! Security posture: resolvers consume transport metadata that has already
//! been authenticated by the embedding system. This layer decides what the
//! request asserts, never whether the assertion is genuine.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use custodian_core::Capability;
use custodian_core::IdentityContext;
use custodian_core::OrgId;
use custodian_core::UserId;

// ============================================================================
// SECTION: Header Names
// ============================================================================

/// Header carrying the asserted user identifier.
pub const USER_HEADER: &str = "x-custodian-user";

/// Header carrying a comma-separated capability list.
pub const CAPABILITIES_HEADER: &str = "x-custodian-capabilities";

/// Header carrying the asserted organization identifier.
pub const ORG_HEADER: &str = "x-custodian-org";

/// Header carrying a comma-separated permission-grant list.
pub const PERMISSIONS_HEADER: &str = "x-custodian-permissions";

// ============================================================================
// SECTION: Auth Request
// ============================================================================

/// Request metadata handed to identity resolvers.
///
/// # Invariants
/// - Header names are stored lowercase; lookups are by exact key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthRequest {
    /// Lowercased header name to value.
    pub headers: BTreeMap<String, String>,
}

impl AuthRequest {
    /// Creates an empty request with no metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header, lowercasing the name.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Returns the header value under the lowercased name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

// ============================================================================
// SECTION: Resolver Contract
// ============================================================================

/// One strategy for resolving a caller identity from request metadata.
///
/// Returning `None` means this resolver has no opinion; it is not a denial.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Attempts to resolve an identity from the request.
    async fn resolve(&self, request: &AuthRequest) -> Option<IdentityContext>;
}

// ============================================================================
// SECTION: Header Resolver
// ============================================================================

/// Built-in resolver reading the `x-custodian-*` identity headers.
///
/// The user header is required; capability, organization, and permission
/// headers are optional refinements. The literal capability `administer` maps
/// to [`Capability::Administer`]; everything else is carried as an opaque
/// assertion.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderResolver;

impl HeaderResolver {
    /// Creates the header resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Splits a comma-separated header value into trimmed non-empty items.
    fn split_list(value: &str) -> impl Iterator<Item = &str> {
        value.split(',').map(str::trim).filter(|item| !item.is_empty())
    }
}

#[async_trait]
impl IdentityResolver for HeaderResolver {
    async fn resolve(&self, request: &AuthRequest) -> Option<IdentityContext> {
        let user = request.header(USER_HEADER)?.trim();
        if user.is_empty() {
            return None;
        }
        let capabilities: BTreeSet<Capability> = request
            .header(CAPABILITIES_HEADER)
            .into_iter()
            .flat_map(Self::split_list)
            .map(|label| {
                if label == "administer" {
                    Capability::Administer
                } else {
                    Capability::Assert(label.to_string())
                }
            })
            .collect();
        let permissions: BTreeSet<String> = request
            .header(PERMISSIONS_HEADER)
            .into_iter()
            .flat_map(Self::split_list)
            .map(str::to_string)
            .collect();
        let org_id = request
            .header(ORG_HEADER)
            .map(str::trim)
            .filter(|org| !org.is_empty())
            .map(OrgId::new);
        Some(IdentityContext {
            user_id: UserId::new(user),
            capabilities,
            org_id,
            permissions,
        })
    }
}

// ============================================================================
// SECTION: Resolver Chain
// ============================================================================

/// Ordered chain of resolvers; the first resolved identity wins.
///
/// # Invariants
/// - Resolvers after the first match are never invoked.
#[derive(Default)]
pub struct ResolverChain {
    /// Resolvers in registration order.
    resolvers: Vec<Arc<dyn IdentityResolver>>,
}

impl ResolverChain {
    /// Creates an empty chain that resolves nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a resolver to the end of the chain.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn IdentityResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }
}

#[async_trait]
impl IdentityResolver for ResolverChain {
    async fn resolve(&self, request: &AuthRequest) -> Option<IdentityContext> {
        for resolver in &self.resolvers {
            if let Some(identity) = resolver.resolve(request).await {
                return Some(identity);
            }
        }
        None
    }
}

// ============================================================================
// SECTION: Organization Enricher
// ============================================================================

/// Wraps a resolver and fills a missing organization on its output.
///
/// # Invariants
/// - An unresolved request passes through as `None`.
/// - An organization set by the inner resolver is never overwritten.
pub struct OrgEnricher {
    /// Resolver whose output is enriched.
    inner: Arc<dyn IdentityResolver>,
    /// Organization applied when the inner resolver left it unset.
    default_org: OrgId,
}

impl OrgEnricher {
    /// Wraps a resolver with a default organization.
    #[must_use]
    pub fn new(inner: Arc<dyn IdentityResolver>, default_org: OrgId) -> Self {
        Self { inner, default_org }
    }
}

#[async_trait]
impl IdentityResolver for OrgEnricher {
    async fn resolve(&self, request: &AuthRequest) -> Option<IdentityContext> {
        let mut identity = self.inner.resolve(request).await?;
        if identity.org_id.is_none() {
            identity.org_id = Some(self.default_org.clone());
        }
        Some(identity)
    }
}
