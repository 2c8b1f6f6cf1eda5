//! Gateway configuration.

use crate::error::{GatewayError, Result};
use searchgate_protocol::{DEFAULT_BUDGET_MS, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use std::time::Duration;

/// Gateway configuration.
///
/// Validated once at gateway construction ([`validate`](Self::validate));
/// invalid configuration never surfaces at query time.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Authorized results per page.
    pub page_size: usize,

    /// Soft wall-clock ceiling on one query's pagination loop. When it
    /// elapses the gateway returns what it has accumulated instead of
    /// fetching further engine pages.
    pub latency_budget: Duration,

    /// If set, only these kinds are ever searched, regardless of what a
    /// query requests. Mutually exclusive with `exclude_kinds`.
    pub restrict_kinds: Option<Vec<String>>,

    /// If set, these kinds are never searched. Mutually exclusive with
    /// `restrict_kinds`.
    pub exclude_kinds: Option<Vec<String>>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            latency_budget: Duration::from_millis(DEFAULT_BUDGET_MS),
            restrict_kinds: None,
            exclude_kinds: None,
        }
    }
}

impl GatewayConfig {
    /// Set the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the latency budget.
    pub fn with_latency_budget(mut self, budget: Duration) -> Self {
        self.latency_budget = budget;
        self
    }

    /// Restrict searches to the given kinds.
    pub fn with_restrict_kinds(mut self, kinds: Vec<String>) -> Self {
        self.restrict_kinds = Some(kinds);
        self
    }

    /// Exclude the given kinds from every search.
    pub fn with_exclude_kinds(mut self, kinds: Vec<String>) -> Self {
        self.exclude_kinds = Some(kinds);
        self
    }

    /// Validate the configuration. Called by the gateway constructor.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(GatewayError::invalid_configuration("page_size must be > 0"));
        }
        if self.page_size > MAX_PAGE_SIZE {
            return Err(GatewayError::invalid_configuration(format!(
                "page_size {} exceeds maximum {MAX_PAGE_SIZE}",
                self.page_size
            )));
        }
        if self.restrict_kinds.is_some() && self.exclude_kinds.is_some() {
            return Err(GatewayError::invalid_configuration(
                "restrict_kinds and exclude_kinds are mutually exclusive",
            ));
        }
        Ok(())
    }

    /// Apply the restrict/exclude lists to a requested kind set,
    /// preserving order.
    pub(crate) fn apply_kind_restrictions(&self, mut kinds: Vec<String>) -> Vec<String> {
        if let Some(restrict) = &self.restrict_kinds {
            kinds.retain(|kind| restrict.contains(kind));
        }
        if let Some(exclude) = &self.exclude_kinds {
            kinds.retain(|kind| !exclude.contains(kind));
        }
        kinds
    }
}
