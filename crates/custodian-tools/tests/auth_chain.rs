// crates/custodian-tools/tests/auth_chain.rs
// ============================================================================
// Module: Identity Composition Tests
// Description: Unit tests for resolver chaining and enrichment.
// Purpose: Validate first-match-wins ordering and non-overwriting enrichment.
// Dependencies: custodian-tools, custodian-core, tokio
// ============================================================================

//! Behavior tests for identity resolver composition.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use custodian_core::Capability;
use custodian_core::IdentityContext;
use custodian_core::OrgId;
use custodian_core::UserId;
use custodian_tools::AuthRequest;
use custodian_tools::HeaderResolver;
use custodian_tools::IdentityResolver;
use custodian_tools::OrgEnricher;
use custodian_tools::ResolverChain;

/// Resolver returning a fixed outcome and counting invocations.
struct ScriptedResolver {
    /// Identity returned on every call.
    outcome: Option<IdentityContext>,
    /// Number of resolve calls observed.
    calls: AtomicUsize,
}

impl ScriptedResolver {
    fn new(outcome: Option<IdentityContext>) -> Arc<Self> {
        Arc::new(Self { outcome, calls: AtomicUsize::new(0) })
    }
}

#[async_trait]
impl IdentityResolver for ScriptedResolver {
    async fn resolve(&self, _request: &AuthRequest) -> Option<IdentityContext> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

#[tokio::test]
async fn chain_stops_at_the_first_resolved_identity() {
    let first = ScriptedResolver::new(Some(IdentityContext::new(UserId::new("u1"))));
    let second = ScriptedResolver::new(Some(IdentityContext::new(UserId::new("u2"))));
    let chain = ResolverChain::new().with_resolver(first.clone()).with_resolver(second.clone());

    let identity = chain.resolve(&AuthRequest::new()).await.unwrap();
    assert_eq!(identity.user_id, UserId::new("u1"));
    assert_eq!(first.calls.load(Ordering::SeqCst), 1);
    assert_eq!(second.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn chain_falls_through_resolvers_with_no_opinion() {
    let first = ScriptedResolver::new(None);
    let second = ScriptedResolver::new(Some(IdentityContext::new(UserId::new("u2"))));
    let chain = ResolverChain::new().with_resolver(first.clone()).with_resolver(second.clone());

    let identity = chain.resolve(&AuthRequest::new()).await.unwrap();
    assert_eq!(identity.user_id, UserId::new("u2"));
    assert_eq!(first.calls.load(Ordering::SeqCst), 1);
    assert_eq!(second.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_chain_resolves_nothing() {
    assert!(ResolverChain::new().resolve(&AuthRequest::new()).await.is_none());
}

#[tokio::test]
async fn enricher_fills_a_missing_organization() {
    let inner = ScriptedResolver::new(Some(IdentityContext::new(UserId::new("u1"))));
    let enricher = OrgEnricher::new(inner, OrgId::new("org-default"));

    let identity = enricher.resolve(&AuthRequest::new()).await.unwrap();
    assert_eq!(identity.org_id, Some(OrgId::new("org-default")));
}

#[tokio::test]
async fn enricher_never_overwrites_a_resolved_organization() {
    let mut resolved = IdentityContext::new(UserId::new("u1"));
    resolved.org_id = Some(OrgId::new("org-resolved"));
    let enricher = OrgEnricher::new(ScriptedResolver::new(Some(resolved)), OrgId::new("org-default"));

    let identity = enricher.resolve(&AuthRequest::new()).await.unwrap();
    assert_eq!(identity.org_id, Some(OrgId::new("org-resolved")));
}

#[tokio::test]
async fn enricher_passes_unresolved_requests_through() {
    let enricher = OrgEnricher::new(ScriptedResolver::new(None), OrgId::new("org-default"));
    assert!(enricher.resolve(&AuthRequest::new()).await.is_none());
}

#[tokio::test]
async fn header_resolver_reads_the_identity_headers() {
    let request = AuthRequest::new()
        .with_header("X-Custodian-User", "u9")
        .with_header("X-Custodian-Capabilities", "administer, reviewer")
        .with_header("X-Custodian-Org", "org-3")
        .with_header("X-Custodian-Permissions", "artifact:read:art-1, artifact:read:art-2");

    let identity = HeaderResolver::new().resolve(&request).await.unwrap();
    assert_eq!(identity.user_id, UserId::new("u9"));
    assert!(identity.capabilities.contains(&Capability::Administer));
    assert!(identity.capabilities.contains(&Capability::Assert("reviewer".to_string())));
    assert_eq!(identity.org_id, Some(OrgId::new("org-3")));
    assert!(identity.permissions.contains("artifact:read:art-1"));
    assert!(identity.permissions.contains("artifact:read:art-2"));
}

#[tokio::test]
async fn header_resolver_requires_a_user_header() {
    let resolver = HeaderResolver::new();
    assert!(resolver.resolve(&AuthRequest::new()).await.is_none());
    let blank = AuthRequest::new().with_header("x-custodian-user", "   ");
    assert!(resolver.resolve(&blank).await.is_none());
}

#[tokio::test]
async fn header_resolver_treats_capabilities_as_membership_not_roles() {
    let request = AuthRequest::new()
        .with_header("x-custodian-user", "u1")
        .with_header("x-custodian-capabilities", "Administer");

    // Capability labels are exact; a differently cased label is an opaque
    // assertion, not administrative authority.
    let identity = HeaderResolver::new().resolve(&request).await.unwrap();
    assert!(!identity.is_admin());
    assert!(identity.capabilities.contains(&Capability::Assert("Administer".to_string())));
}
