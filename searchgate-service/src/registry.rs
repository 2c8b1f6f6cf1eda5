//! Result-kind registry and kind-level authorization.
//!
//! The registry maps each result kind the gateway knows about to an
//! optional visibility capability. It is configuration: supplied at
//! gateway construction, read-only afterwards.

use crate::authorizer::{AccessDecision, AccessRequest, Authorizer};
use crate::batch::DecisionBatcher;
use crate::error::Result;
use std::collections::{BTreeMap, HashMap};

/// Registered result kinds and their visibility capabilities.
///
/// A kind with no capability is visible to every caller; a kind with one
/// is gated by a kind-level authorization decision. Iteration order is the
/// kind name order, so authorization batches are deterministic.
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    kinds: BTreeMap<String, Option<String>>,
}

impl KindRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kind visible to every caller.
    pub fn register(mut self, kind: impl Into<String>) -> Self {
        self.kinds.insert(kind.into(), None);
        self
    }

    /// Register a kind gated by a visibility capability.
    pub fn register_gated(
        mut self,
        kind: impl Into<String>,
        capability: impl Into<String>,
    ) -> Self {
        self.kinds.insert(kind.into(), Some(capability.into()));
        self
    }

    /// Look up a kind. `None` means the kind is not registered; the inner
    /// option is the kind's visibility capability.
    pub fn lookup(&self, kind: &str) -> Option<Option<&str>> {
        self.kinds.get(kind).map(|cap| cap.as_deref())
    }

    /// The visibility capability gating a kind, if any.
    pub fn capability(&self, kind: &str) -> Option<&str> {
        self.kinds.get(kind).and_then(|cap| cap.as_deref())
    }

    /// All registered kind names, in name order.
    pub fn kind_names(&self) -> Vec<String> {
        self.kinds.keys().cloned().collect()
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether the registry has no kinds.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Resolve a kind-level decision for each requested kind.
///
/// Kinds with no configured capability are allowed without an external
/// request. All gated kinds are submitted to the batcher together, so
/// their decisions are evaluated concurrently in one authorizer call.
/// Requested kinds that are not registered are skipped entirely: they get
/// no decision, are never passed to the engine, and any hit claiming one
/// is dropped by the filter.
pub(crate) async fn resolve_kind_decisions<A: Authorizer>(
    registry: &KindRegistry,
    kinds: &[String],
    batcher: &mut DecisionBatcher<'_, A>,
) -> Result<HashMap<String, AccessDecision>> {
    let mut decisions = HashMap::with_capacity(kinds.len());
    let mut gated: Vec<(String, AccessRequest)> = Vec::new();

    for kind in kinds {
        match registry.lookup(kind) {
            None => {
                tracing::debug!(kind = %kind, "requested kind not registered; skipped");
            }
            Some(None) => {
                decisions.insert(kind.clone(), AccessDecision::Allow);
            }
            Some(Some(capability)) => {
                gated.push((kind.clone(), AccessRequest::for_capability(capability)));
            }
        }
    }

    if !gated.is_empty() {
        let requests: Vec<AccessRequest> = gated.iter().map(|(_, r)| r.clone()).collect();
        let resolved = batcher.load_many(&requests).await?;
        for ((kind, _), decision) in gated.into_iter().zip(resolved) {
            tracing::debug!(kind = %kind, ?decision, "kind visibility resolved");
            decisions.insert(kind, decision);
        }
    }

    Ok(decisions)
}
