//! Budgeted fetch/filter pagination loop.
//!
//! The underlying engine paginates over unfiltered candidates; a page of
//! *authorized* results may therefore span several engine pages. This
//! module walks the engine's pages sequentially (the engine cursor for
//! page N+1 is only known once page N responds), filters each page, and
//! accumulates until it either has enough authorized results, the engine
//! runs dry, or the latency budget runs out.
//!
//! The budget is cooperative: checked once per fetch+filter cycle, in one
//! place. A single slow fetch or authorization batch can overshoot the
//! budget by its own duration; it is a soft ceiling, not a deadline.

use crate::authorizer::{AccessDecision, Authorizer};
use crate::batch::DecisionBatcher;
use crate::engine::{EngineRequest, SearchEngine};
use crate::error::Result;
use crate::filter::filter_hits;
use crate::registry::KindRegistry;
use searchgate_protocol::SearchHit;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    /// The engine reported no further pages.
    SourceExhausted,
    /// Enough authorized results were accumulated.
    TargetReached,
    /// The latency budget ran out.
    BudgetExhausted,
}

/// Outcome of one pagination loop.
pub(crate) struct LoopOutcome {
    /// All authorized results accumulated, in relevance-then-fetch order.
    pub authorized: Vec<SearchHit>,
    /// Whether the engine still had a next page when the loop stopped.
    pub source_has_more: bool,
    /// Whether the budget was exhausted, measured when the loop stopped.
    pub budget_exhausted: bool,
}

impl LoopOutcome {
    /// Outcome of a loop that never ran (nothing searchable).
    pub fn empty() -> Self {
        Self {
            authorized: Vec::new(),
            source_has_more: false,
            budget_exhausted: false,
        }
    }
}

/// Fetch and filter engine pages until `target` authorized results are
/// accumulated, the engine runs dry, or `budget` elapses.
///
/// `request` carries the restricted kind set; its cursor field is driven
/// by this loop, passing the engine's own next-page cursor back verbatim.
/// Engine and authorizer failures propagate immediately: no retries, no
/// partial results from a failed fetch.
pub(crate) async fn collect_authorized<E: SearchEngine, A: Authorizer>(
    engine: &E,
    mut request: EngineRequest,
    target: usize,
    budget: Duration,
    kind_decisions: &HashMap<String, AccessDecision>,
    registry: &KindRegistry,
    batcher: &mut DecisionBatcher<'_, A>,
) -> Result<LoopOutcome> {
    let start = Instant::now();
    let mut accumulator: Vec<SearchHit> = Vec::new();

    let stop = loop {
        let page = engine.fetch(&request).await?;
        let fetched = page.hits.len();
        let next_cursor = page.next_cursor;

        let authorized = filter_hits(page.hits, kind_decisions, registry, batcher).await?;
        accumulator.extend(authorized);

        tracing::debug!(
            fetched,
            accumulated = accumulator.len(),
            target,
            "engine page filtered"
        );

        match next_cursor {
            None => break StopReason::SourceExhausted,
            Some(cursor) => request.cursor = Some(cursor),
        }
        if accumulator.len() >= target {
            break StopReason::TargetReached;
        }
        if start.elapsed() > budget {
            break StopReason::BudgetExhausted;
        }
    };

    // Measured at stop time rather than taken from the stop reason: a loop
    // that reached its target after overrunning the budget must not claim
    // a next page either.
    let budget_exhausted = start.elapsed() > budget;
    if budget_exhausted {
        tracing::warn!(
            accumulated = accumulator.len(),
            target,
            elapsed_ms = start.elapsed().as_millis() as u64,
            budget_ms = budget.as_millis() as u64,
            "latency budget exhausted during pagination"
        );
    }

    Ok(LoopOutcome {
        authorized: accumulator,
        source_has_more: stop != StopReason::SourceExhausted,
        budget_exhausted,
    })
}
