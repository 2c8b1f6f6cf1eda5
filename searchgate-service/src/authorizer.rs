//! Authorization collaborator contract.
//!
//! The gateway consumes authorization decisions; it never evaluates policy
//! itself. Decisions come in two granularities, distinguished by the shape
//! of the request:
//!
//! - A request with a capability and no resource asks "can this caller
//!   ever see results gated by this capability" (kind-level).
//! - A request with both asks "can this caller see this specific resource"
//!   (resource-level).

use crate::error::Result;
use async_trait::async_trait;

/// One authorization request.
///
/// Two requests are the same request (and are evaluated at most once per
/// query by the [`DecisionBatcher`](crate::DecisionBatcher)) when both the
/// capability and the resource reference are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessRequest {
    /// The capability being checked.
    pub capability: String,

    /// Resource reference for resource-level checks. `None` for
    /// kind-level checks.
    pub resource: Option<String>,
}

impl AccessRequest {
    /// Create a kind-level request (capability only).
    pub fn for_capability(capability: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
            resource: None,
        }
    }

    /// Create a resource-level request.
    pub fn for_resource(capability: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
            resource: Some(resource.into()),
        }
    }
}

/// One authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access allowed unconditionally.
    Allow,
    /// Access denied.
    Deny,
    /// Access depends on a finer-grained check. At kind level this means
    /// each hit must pass a resource-level check; at resource level it
    /// does not admit the hit (there is no finer granularity left).
    Conditional,
}

/// Caller context an authorization decision is evaluated against.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    /// Caller identity token. `None` is an anonymous caller.
    pub identity: Option<String>,
}

impl AuthContext {
    /// Context for an anonymous caller.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context for an identified caller.
    pub fn with_identity(identity: impl Into<String>) -> Self {
        Self {
            identity: Some(identity.into()),
        }
    }
}

/// Authorization decision engine.
///
/// Implementations evaluate a batch of requests against a caller context
/// and return exactly one decision per request, in request order. The
/// gateway treats any failure as fatal for the current query: it never
/// substitutes a default decision.
#[async_trait]
pub trait Authorizer: std::fmt::Debug + Send + Sync {
    /// Evaluate a batch of authorization requests.
    ///
    /// Implementations should construct failures with
    /// [`GatewayError::authorization`](crate::GatewayError::authorization).
    async fn authorize(
        &self,
        requests: &[AccessRequest],
        ctx: &AuthContext,
    ) -> Result<Vec<AccessDecision>>;
}
