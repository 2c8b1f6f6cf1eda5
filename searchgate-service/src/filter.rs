//! Per-hit authorization filtering.
//!
//! Applies kind-level decisions to one raw engine page and resolves
//! resource-level checks for conditional kinds, preserving the engine's
//! relevance order throughout.

use crate::authorizer::{AccessDecision, AccessRequest, Authorizer};
use crate::batch::DecisionBatcher;
use crate::error::Result;
use crate::registry::KindRegistry;
use searchgate_protocol::SearchHit;
use std::collections::HashMap;

/// What to do with one hit, decided in the first pass over a page.
enum Verdict {
    Keep,
    Drop,
    /// Pending resource-level check; index into the batch of requests.
    Check(usize),
}

/// Filter one raw engine page down to the authorized hits.
///
/// - Hits of `Allow` kinds pass through untouched (never resource-checked).
/// - Hits of `Deny` kinds are dropped, as are hits whose kind has no
///   decision at all (the engine returned a kind it was not asked for).
/// - Hits of `Conditional` kinds are checked at resource granularity. All
///   such checks for the page are issued through the batcher as one batch
///   and the hit is kept only on an explicit `Allow`.
/// - A conditional hit that cannot be checked (its kind has no capability
///   configured, or its document carries no resource reference) passes
///   through. This fails open at this narrow point; a stricter deployment
///   policy would exclude such hits instead.
pub(crate) async fn filter_hits<A: Authorizer>(
    hits: Vec<SearchHit>,
    kind_decisions: &HashMap<String, AccessDecision>,
    registry: &KindRegistry,
    batcher: &mut DecisionBatcher<'_, A>,
) -> Result<Vec<SearchHit>> {
    let mut pending: Vec<AccessRequest> = Vec::new();
    let mut verdicts: Vec<Verdict> = Vec::with_capacity(hits.len());

    for hit in &hits {
        let verdict = match kind_decisions.get(&hit.kind) {
            None => {
                tracing::warn!(kind = %hit.kind, "engine returned hit of an unrequested kind; dropped");
                Verdict::Drop
            }
            Some(AccessDecision::Allow) => Verdict::Keep,
            Some(AccessDecision::Deny) => Verdict::Drop,
            Some(AccessDecision::Conditional) => {
                let capability = registry.capability(&hit.kind);
                let resource = hit
                    .document
                    .authorization
                    .as_ref()
                    .map(|auth| auth.resource.as_str());
                match (capability, resource) {
                    (Some(capability), Some(resource)) => {
                        let index = pending.len();
                        pending.push(AccessRequest::for_resource(capability, resource));
                        Verdict::Check(index)
                    }
                    // No capability configured or no resource reference:
                    // the hit cannot be checked at resource granularity and
                    // passes through.
                    _ => Verdict::Keep,
                }
            }
        };
        verdicts.push(verdict);
    }

    let resolved = if pending.is_empty() {
        Vec::new()
    } else {
        batcher.load_many(&pending).await?
    };

    let filtered = hits
        .into_iter()
        .zip(verdicts)
        .filter_map(|(hit, verdict)| match verdict {
            Verdict::Keep => Some(hit),
            Verdict::Drop => None,
            Verdict::Check(index) => {
                matches!(resolved[index], AccessDecision::Allow).then_some(hit)
            }
        })
        .collect();

    Ok(filtered)
}
