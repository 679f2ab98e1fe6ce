//! Scout public API façade (in-process).
//!
//! Frontends depend on [`SearchApi`]. [`InProcApi`] answers it from a local
//! [`StateStore`]: it resolves the caller's token, runs the pure search against
//! the current snapshot and, for blocking requests, re-runs it as the store
//! advances. A remote implementation can sit behind the same trait.

#![forbid(unsafe_code)]

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use scout_core::{
    FuzzySearchRequest, SearchConfig, SearchError, SearchRequest, SearchResponse, SearchResult,
};
use scout_search::{FuzzyOptions, SearchExtension, Searcher};
use scout_store::StateStore;
use tracing::{info, warn};

pub mod blocking;
pub mod tokens;

pub use blocking::{blocking_query, max_wait, DEFAULT_MAX_QUERY_TIME, MAX_QUERY_TIME};
pub use tokens::{AclResolver, TokenResolver};

/// Search endpoints.
#[async_trait::async_trait]
pub trait SearchApi: Send + Sync {
    /// Identifiers starting with `req.prefix` per context.
    async fn prefix_search(&self, req: SearchRequest) -> SearchResult<SearchResponse>;

    /// Names containing `req.text` per fuzzy-eligible context, best match
    /// first.
    async fn fuzzy_search(&self, req: FuzzySearchRequest) -> SearchResult<SearchResponse>;
}

// ----------------- In-process implementation -----------------

pub struct InProcApi {
    store: Arc<StateStore>,
    tokens: Arc<dyn TokenResolver>,
    searcher: Searcher,
    config: SearchConfig,
}

impl InProcApi {
    /// ACLs disabled, default search configuration.
    pub fn new(store: Arc<StateStore>) -> Self {
        let config = SearchConfig::default();
        Self {
            store,
            tokens: Arc::new(AclResolver::disabled()),
            searcher: Searcher::new().fuzzy_options(FuzzyOptions::from(&config)),
            config,
        }
    }

    pub fn with_tokens(mut self, tokens: Arc<dyn TokenResolver>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.searcher = self.searcher.fuzzy_options(FuzzyOptions::from(&config));
        self.config = config;
        self
    }

    pub fn with_extension(mut self, ext: Arc<dyn SearchExtension>) -> Self {
        self.searcher = Searcher::with_extension(ext).fuzzy_options(FuzzyOptions::from(&self.config));
        self
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

fn record(mode: &'static str, t0: Instant, res: &SearchResult<SearchResponse>) {
    let ms = t0.elapsed().as_secs_f64() * 1000.0;
    histogram!("scout_search_ms", ms, "mode" => mode);
    let outcome = if res.is_ok() { "ok" } else { "error" };
    counter!("scout_search_requests_total", 1u64, "mode" => mode, "outcome" => outcome);
    match res {
        Ok(resp) => info!(
            mode,
            contexts = resp.matches.len(),
            index = resp.meta.index,
            took_ms = %t0.elapsed().as_millis(),
            "api: search ok"
        ),
        Err(e) => warn!(mode, error = %e, took_ms = %t0.elapsed().as_millis(), "api: search failed"),
    }
}

#[async_trait::async_trait]
impl SearchApi for InProcApi {
    async fn prefix_search(&self, req: SearchRequest) -> SearchResult<SearchResponse> {
        let t0 = Instant::now();
        let ns = req.options.request_namespace().to_string();
        info!(
            prefix = %req.prefix,
            context = %req.context,
            ns = %ns,
            min_index = req.options.min_query_index,
            "api: prefix_search start"
        );

        let res = match self.tokens.resolve(&req.options.auth_token) {
            Ok(acl) => {
                blocking_query(&self.store, &req.options, |snap| {
                    self.searcher.prefix_search(snap, acl.as_deref(), &ns, &req.prefix, &req.context)
                })
                .await
            }
            Err(e) => Err(e),
        };
        record("prefix", t0, &res);
        res
    }

    async fn fuzzy_search(&self, req: FuzzySearchRequest) -> SearchResult<SearchResponse> {
        let t0 = Instant::now();
        if !self.config.fuzzy_enabled {
            let res = Err(SearchError::FuzzyDisabled);
            record("fuzzy", t0, &res);
            return res;
        }
        let ns = req.options.request_namespace().to_string();
        info!(
            text = %req.text,
            context = %req.context,
            ns = %ns,
            min_index = req.options.min_query_index,
            "api: fuzzy_search start"
        );

        let res = match self.tokens.resolve(&req.options.auth_token) {
            Ok(acl) => {
                blocking_query(&self.store, &req.options, |snap| {
                    self.searcher.fuzzy_search(snap, acl.as_deref(), &ns, &req.text, &req.context)
                })
                .await
            }
            Err(e) => Err(e),
        };
        record("fuzzy", t0, &res);
        res
    }
}

// ----------------- Mock implementation -----------------

/// Canned responses for frontend tests.
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    pub prefix: Option<SearchResponse>,
    pub fuzzy: Option<SearchResponse>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SearchApi for MockApi {
    async fn prefix_search(&self, _req: SearchRequest) -> SearchResult<SearchResponse> {
        self.prefix.clone().ok_or_else(|| SearchError::Internal("mock: no prefix response".into()))
    }

    async fn fuzzy_search(&self, _req: FuzzySearchRequest) -> SearchResult<SearchResponse> {
        self.fuzzy.clone().ok_or(SearchError::FuzzyDisabled)
    }
}
