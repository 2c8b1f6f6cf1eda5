//! Query-scoped authorization batching.
//!
//! A [`DecisionBatcher`] collects the authorization requests issued while
//! answering one search query and evaluates them with as few round trips
//! to the [`Authorizer`] as possible: identical requests (same capability,
//! same resource reference) are evaluated at most once per query, and each
//! [`load_many`](DecisionBatcher::load_many) round dispatches all of its
//! cache misses as a single batched call.
//!
//! The batcher is owned by one query invocation and dropped with it. Its
//! cache is never shared between queries: a decision made for one caller
//! must not leak into another request, and decisions must not go stale
//! across requests.

use crate::authorizer::{AccessDecision, AccessRequest, AuthContext, Authorizer};
use crate::error::{GatewayError, Result};
use std::collections::{HashMap, HashSet};

/// Deduplicating, batching front-end to an [`Authorizer`].
pub struct DecisionBatcher<'a, A: Authorizer> {
    authorizer: &'a A,
    ctx: &'a AuthContext,
    cache: HashMap<AccessRequest, AccessDecision>,
}

impl<'a, A: Authorizer> DecisionBatcher<'a, A> {
    /// Create a batcher for one query invocation.
    pub fn new(authorizer: &'a A, ctx: &'a AuthContext) -> Self {
        Self {
            authorizer,
            ctx,
            cache: HashMap::new(),
        }
    }

    /// Resolve a batch of requests, one decision per request in request
    /// order.
    ///
    /// Requests already decided earlier in this query are answered from
    /// the cache; the remaining distinct requests go to the authorizer as
    /// one call. Returns an error if the authorizer fails or answers with
    /// the wrong number of decisions.
    pub async fn load_many(&mut self, requests: &[AccessRequest]) -> Result<Vec<AccessDecision>> {
        let mut misses: Vec<AccessRequest> = Vec::new();
        let mut queued: HashSet<&AccessRequest> = HashSet::new();
        for request in requests {
            if !self.cache.contains_key(request) && queued.insert(request) {
                misses.push(request.clone());
            }
        }

        if !misses.is_empty() {
            tracing::debug!(
                requested = requests.len(),
                evaluated = misses.len(),
                "dispatching authorization batch"
            );
            let decisions = self.authorizer.authorize(&misses, self.ctx).await?;
            if decisions.len() != misses.len() {
                return Err(GatewayError::authorization(format!(
                    "authorizer returned {} decisions for {} requests",
                    decisions.len(),
                    misses.len()
                )));
            }
            for (request, decision) in misses.into_iter().zip(decisions) {
                self.cache.insert(request, decision);
            }
        }

        requests
            .iter()
            .map(|request| {
                self.cache.get(request).copied().ok_or_else(|| {
                    GatewayError::authorization(format!("no decision for request {request:?}"))
                })
            })
            .collect()
    }

    /// Resolve a single request. Convenience form of
    /// [`load_many`](Self::load_many).
    pub async fn load(&mut self, request: &AccessRequest) -> Result<AccessDecision> {
        let mut decisions = self.load_many(std::slice::from_ref(request)).await?;
        decisions
            .pop()
            .ok_or_else(|| GatewayError::authorization("empty decision batch"))
    }

    /// Number of distinct decisions cached so far in this query.
    pub fn decided(&self) -> usize {
        self.cache.len()
    }
}

impl<A: Authorizer> std::fmt::Debug for DecisionBatcher<'_, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionBatcher")
            .field("decided", &self.cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockAuthorizer;

    #[tokio::test]
    async fn test_duplicates_evaluated_once() {
        let authorizer = MockAuthorizer::allow_all();
        let ctx = AuthContext::anonymous();
        let mut batcher = DecisionBatcher::new(&authorizer, &ctx);

        let request = AccessRequest::for_resource("read_code", "repo:1");
        let decisions = batcher
            .load_many(&[request.clone(), request.clone(), request.clone()])
            .await
            .unwrap();

        assert_eq!(decisions.len(), 3);
        assert_eq!(authorizer.call_count(), 1);
        assert_eq!(authorizer.request_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_spans_rounds() {
        let authorizer = MockAuthorizer::allow_all();
        let ctx = AuthContext::anonymous();
        let mut batcher = DecisionBatcher::new(&authorizer, &ctx);

        let a = AccessRequest::for_resource("read_code", "repo:1");
        let b = AccessRequest::for_resource("read_code", "repo:2");

        batcher.load_many(&[a.clone(), b.clone()]).await.unwrap();
        assert_eq!(authorizer.call_count(), 1);

        // Second round: one cached request, one new.
        let c = AccessRequest::for_resource("read_code", "repo:3");
        batcher.load_many(&[a.clone(), c]).await.unwrap();
        assert_eq!(authorizer.call_count(), 2);
        // Only the new request reached the authorizer.
        assert_eq!(authorizer.request_count(), 3);

        // Fully cached round dispatches nothing.
        batcher.load_many(&[a, b]).await.unwrap();
        assert_eq!(authorizer.call_count(), 2);
        assert_eq!(batcher.decided(), 3);
    }

    #[tokio::test]
    async fn test_decisions_align_with_request_order() {
        let authorizer = MockAuthorizer::default_deny()
            .with_decision(
                AccessRequest::for_resource("read_code", "repo:ok"),
                AccessDecision::Allow,
            );
        let ctx = AuthContext::anonymous();
        let mut batcher = DecisionBatcher::new(&authorizer, &ctx);

        let decisions = batcher
            .load_many(&[
                AccessRequest::for_resource("read_code", "repo:no"),
                AccessRequest::for_resource("read_code", "repo:ok"),
                AccessRequest::for_resource("read_code", "repo:no"),
            ])
            .await
            .unwrap();

        assert_eq!(
            decisions,
            vec![
                AccessDecision::Deny,
                AccessDecision::Allow,
                AccessDecision::Deny
            ]
        );
    }

    #[tokio::test]
    async fn test_wrong_length_response_is_an_error() {
        let authorizer = MockAuthorizer::truncating();
        let ctx = AuthContext::anonymous();
        let mut batcher = DecisionBatcher::new(&authorizer, &ctx);

        let result = batcher
            .load_many(&[
                AccessRequest::for_resource("read_code", "repo:1"),
                AccessRequest::for_resource("read_code", "repo:2"),
            ])
            .await;

        assert!(matches!(result, Err(GatewayError::Authorization { .. })));
    }

    #[tokio::test]
    async fn test_load_single() {
        let authorizer = MockAuthorizer::allow_all();
        let ctx = AuthContext::anonymous();
        let mut batcher = DecisionBatcher::new(&authorizer, &ctx);

        let request = AccessRequest::for_capability("read_wiki");
        assert_eq!(batcher.load(&request).await.unwrap(), AccessDecision::Allow);
        assert_eq!(batcher.load(&request).await.unwrap(), AccessDecision::Allow);
        assert_eq!(authorizer.call_count(), 1);
    }
}
