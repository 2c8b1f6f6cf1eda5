//! Test doubles shared by the unit tests.

use crate::authorizer::{AccessDecision, AccessRequest, AuthContext, Authorizer};
use crate::engine::{EnginePage, EngineRequest, SearchEngine};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use searchgate_protocol::{Document, SearchHit};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Build a hit without authorization metadata.
pub(crate) fn hit(kind: impl Into<String>, location: impl Into<String>) -> SearchHit {
    let location = location.into();
    let title = location.clone();
    SearchHit::new(kind, Document::new(location, title))
}

/// Build a hit carrying a resource reference.
pub(crate) fn hit_with_resource(
    kind: impl Into<String>,
    location: impl Into<String>,
    resource: impl Into<String>,
) -> SearchHit {
    let location = location.into();
    let title = location.clone();
    SearchHit::new(kind, Document::new(location, title).with_resource(resource))
}

/// Scripted engine: a fixed hit list served in fixed-size pages, with the
/// page index as the engine cursor.
#[derive(Debug)]
pub(crate) struct MockEngine {
    pages: Vec<Vec<SearchHit>>,
    fetch_delay: Option<Duration>,
    failure: Option<String>,
    fetch_count: AtomicUsize,
    requests: Mutex<Vec<EngineRequest>>,
}

impl MockEngine {
    /// Serve `hits` in pages of `per_page`.
    pub fn paged(hits: Vec<SearchHit>, per_page: usize) -> Self {
        Self {
            pages: hits.chunks(per_page).map(<[SearchHit]>::to_vec).collect(),
            fetch_delay: None,
            failure: None,
            fetch_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail every fetch.
    pub fn failing(message: impl Into<String>) -> Self {
        let mut engine = Self::paged(Vec::new(), 1);
        engine.failure = Some(message.into());
        engine
    }

    /// Sleep this long inside every fetch.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    /// Number of fetches served.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<EngineRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchEngine for MockEngine {
    async fn fetch(&self, request: &EngineRequest) -> Result<EnginePage> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(message) = &self.failure {
            return Err(GatewayError::upstream(message.clone()));
        }
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }

        let index = match &request.cursor {
            None => 0,
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| GatewayError::upstream(format!("unknown cursor {cursor:?}")))?,
        };
        let hits = self.pages.get(index).cloned().unwrap_or_default();
        let next_cursor = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());
        Ok(EnginePage { hits, next_cursor })
    }
}

/// Table-driven authorizer recording every batch it receives.
#[derive(Debug)]
pub(crate) struct MockAuthorizer {
    decisions: HashMap<AccessRequest, AccessDecision>,
    default: AccessDecision,
    truncate: bool,
    failure: Option<String>,
    calls: AtomicUsize,
    batches: Mutex<Vec<Vec<AccessRequest>>>,
}

impl MockAuthorizer {
    fn with_default_decision(default: AccessDecision) -> Self {
        Self {
            decisions: HashMap::new(),
            default,
            truncate: false,
            failure: None,
            calls: AtomicUsize::new(0),
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Allow every request not overridden with [`with_decision`](Self::with_decision).
    pub fn allow_all() -> Self {
        Self::with_default_decision(AccessDecision::Allow)
    }

    /// Deny every request not overridden with [`with_decision`](Self::with_decision).
    pub fn default_deny() -> Self {
        Self::with_default_decision(AccessDecision::Deny)
    }

    /// Misbehave: return one decision fewer than requested.
    pub fn truncating() -> Self {
        let mut authorizer = Self::allow_all();
        authorizer.truncate = true;
        authorizer
    }

    /// Fail every call.
    pub fn failing(message: impl Into<String>) -> Self {
        let mut authorizer = Self::allow_all();
        authorizer.failure = Some(message.into());
        authorizer
    }

    /// Pin the decision for one request.
    pub fn with_decision(mut self, request: AccessRequest, decision: AccessDecision) -> Self {
        self.decisions.insert(request, decision);
        self
    }

    /// Change the fallback decision.
    pub fn with_default(mut self, decision: AccessDecision) -> Self {
        self.default = decision;
        self
    }

    /// Number of authorize calls received.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Total requests received across all calls.
    pub fn request_count(&self) -> usize {
        self.batches.lock().unwrap().iter().map(Vec::len).sum()
    }

    /// Every batch received, in order.
    pub fn batches(&self) -> Vec<Vec<AccessRequest>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl Authorizer for MockAuthorizer {
    async fn authorize(
        &self,
        requests: &[AccessRequest],
        _ctx: &AuthContext,
    ) -> Result<Vec<AccessDecision>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().unwrap().push(requests.to_vec());

        if let Some(message) = &self.failure {
            return Err(GatewayError::authorization(message.clone()));
        }

        let mut decisions: Vec<AccessDecision> = requests
            .iter()
            .map(|request| self.decisions.get(request).copied().unwrap_or(self.default))
            .collect();
        if self.truncate {
            decisions.pop();
        }
        Ok(decisions)
    }
}
