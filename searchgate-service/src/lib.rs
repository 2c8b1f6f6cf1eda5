//! Authorization-aware search gateway.
//!
//! This crate sits between a client issuing a search query and an
//! underlying search engine. It decides which result kinds the caller may
//! see at all, narrows the engine query to those kinds, filters individual
//! hits the caller is not authorized to see, and returns exactly one page
//! of authorized results with previous/next cursors, all under a soft
//! latency budget that degrades to an under-filled page rather than
//! blocking on a slow authorization backend.
//!
//! # Architecture
//!
//! - [`SearchGateway`]: Main entry point; owns the pagination flow
//! - [`SearchEngine`]: Trait for the underlying engine (indexing, ranking
//!   and the engine's own pagination are its business, not ours)
//! - [`Authorizer`]: Trait for the authorization decision engine
//! - [`DecisionBatcher`]: Per-query dedup/batching front-end to the
//!   authorizer
//! - [`KindRegistry`]: Which result kinds exist and which capability, if
//!   any, gates each one
//!
//! # Example
//!
//! ```ignore
//! use searchgate_service::{GatewayConfig, KindRegistry, SearchGateway};
//! use searchgate_protocol::SearchQuery;
//!
//! let registry = KindRegistry::new()
//!     .register("notes")
//!     .register_gated("code", "read_code");
//! let gateway = SearchGateway::with_defaults(engine, authorizer, registry);
//!
//! let page = gateway.query(SearchQuery::new("tokenizer"), &ctx).await?;
//! ```

mod authorizer;
mod batch;
mod config;
mod engine;
mod error;
mod filter;
mod paginate;
mod registry;

#[cfg(test)]
pub(crate) mod testutil;

pub use authorizer::{AccessDecision, AccessRequest, AuthContext, Authorizer};
pub use batch::DecisionBatcher;
pub use config::GatewayConfig;
pub use engine::{EnginePage, EngineRequest, SearchEngine};
pub use error::{GatewayError, Result};
pub use registry::KindRegistry;

use paginate::LoopOutcome;
use searchgate_protocol::{cursor, ResultSet, SearchQuery};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// Warning attached to a result set when the latency budget ran out before
/// pagination completed.
pub const BUDGET_EXHAUSTED_WARNING: &str =
    "latency budget exhausted before pagination completed; results may be incomplete";

/// Authorization-enforcing search gateway.
///
/// One gateway serves many concurrent queries; each query gets its own
/// decision batcher and accumulator, so no authorization state is shared
/// or reused across requests.
pub struct SearchGateway<E: SearchEngine, A: Authorizer> {
    engine: Arc<E>,
    authorizer: Arc<A>,
    registry: KindRegistry,
    config: GatewayConfig,
}

impl<E: SearchEngine, A: Authorizer> SearchGateway<E, A> {
    /// Create a gateway, validating the configuration.
    pub fn new(
        engine: E,
        authorizer: A,
        registry: KindRegistry,
        config: GatewayConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine: Arc::new(engine),
            authorizer: Arc::new(authorizer),
            registry,
            config,
        })
    }

    /// Create a gateway with the default configuration.
    pub fn with_defaults(engine: E, authorizer: A, registry: KindRegistry) -> Self {
        Self {
            engine: Arc::new(engine),
            authorizer: Arc::new(authorizer),
            registry,
            config: GatewayConfig::default(),
        }
    }

    /// The underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The authorization collaborator.
    pub fn authorizer(&self) -> &A {
        &self.authorizer
    }

    /// The kind registry.
    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    /// The gateway configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Execute one search query and return one page of authorized results.
    ///
    /// Fatal failures (engine fetch, authorizer call, malformed cursor)
    /// abort the whole query. An under-filled page (because the engine
    /// ran out of results or the latency budget elapsed) is a success;
    /// budget exhaustion additionally suppresses the next-page cursor and
    /// attaches [`BUDGET_EXHAUSTED_WARNING`].
    pub async fn query(&self, query: SearchQuery, ctx: &AuthContext) -> Result<ResultSet> {
        let started = Instant::now();
        let page = cursor::decode_page(query.cursor.as_deref())?;

        let mut batcher = DecisionBatcher::new(self.authorizer.as_ref(), ctx);

        let requested = self.requested_kinds(&query);
        let kind_decisions =
            registry::resolve_kind_decisions(&self.registry, &requested, &mut batcher).await?;

        // Denied kinds are dropped here so the engine never fetches
        // results the caller categorically cannot see.
        let searchable: Vec<String> = requested
            .into_iter()
            .filter(|kind| {
                matches!(
                    kind_decisions.get(kind),
                    Some(AccessDecision::Allow | AccessDecision::Conditional)
                )
            })
            .collect();

        let page_size = self.config.page_size;
        let offset = (page as usize).saturating_mul(page_size);
        let target = offset.saturating_add(page_size);

        let outcome = if searchable.is_empty() {
            tracing::debug!(term = %query.term, "no searchable kinds; skipping engine");
            LoopOutcome::empty()
        } else {
            let request = EngineRequest {
                term: query.term.clone(),
                filter: query.filter.clone(),
                kinds: searchable,
                cursor: None,
            };
            paginate::collect_authorized(
                self.engine.as_ref(),
                request,
                target,
                self.config.latency_budget,
                &kind_decisions,
                &self.registry,
                &mut batcher,
            )
            .await?
        };

        let total = outcome.authorized.len();
        let has_next =
            !outcome.budget_exhausted && (outcome.source_has_more || total > target);
        let hits: Vec<_> = outcome
            .authorized
            .into_iter()
            .skip(offset)
            .take(page_size)
            .collect();

        tracing::debug!(
            page,
            returned = hits.len(),
            accumulated = total,
            has_next,
            budget_exhausted = outcome.budget_exhausted,
            "search page served"
        );

        let mut result = ResultSet::new(hits, started.elapsed().as_millis() as u64);
        result.previous_page_cursor = (page > 0).then(|| cursor::encode_page(page - 1));
        result.next_page_cursor = has_next.then(|| cursor::encode_page(page + 1));
        if outcome.budget_exhausted {
            result = result.with_warning(BUDGET_EXHAUSTED_WARNING);
        }
        Ok(result)
    }

    /// The kind set a query asks for: explicit kinds, or every registered
    /// kind, deduplicated and narrowed by the configured restrictions.
    fn requested_kinds(&self, query: &SearchQuery) -> Vec<String> {
        let kinds = match &query.kinds {
            Some(kinds) => kinds.clone(),
            None => self.registry.kind_names(),
        };
        let mut seen = HashSet::new();
        let kinds: Vec<String> = kinds
            .into_iter()
            .filter(|kind| seen.insert(kind.clone()))
            .collect();
        self.config.apply_kind_restrictions(kinds)
    }
}

impl<E: SearchEngine, A: Authorizer> std::fmt::Debug for SearchGateway<E, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchGateway")
            .field("engine", &self.engine)
            .field("authorizer", &self.authorizer)
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish()
    }
}
