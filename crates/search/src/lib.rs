//! Scout search: prefix and fuzzy lookup of resource identifiers across the
//! state store's collections.
//!
//! A query expands its context into concrete contexts, opens one iterator per
//! context, drains each iterator under a fixed cap and reports the highest
//! collection index it looked at. Every entry point is a pure function of its
//! arguments and the snapshot, so a blocking-query loop may call it again
//! whenever the store moves.

#![forbid(unsafe_code)]

use std::sync::Arc;

use scout_core::{
    AccessControl, Context, FuzzyMatcherKind, SearchConfig, SearchError, SearchResponse,
    SearchResult,
};
use scout_store::{ResourceIter, StateReader, StoreError, Table};
use tracing::debug;

pub mod catalog;
pub mod collect;
pub mod extension;
pub mod gate;
pub mod normalize;
pub mod rank;

pub use catalog::{Catalog, BUILTIN_CONTEXTS, FUZZY_CONTEXTS};
pub use collect::{collect, TRUNCATE_LIMIT};
pub use extension::{NoopExtension, SearchExtension};
pub use gate::sufficient_search_perms;
pub use normalize::normalize;
pub use rank::{rank, Matcher};

/// Limits applied to fuzzy queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyOptions {
    pub limit_query: usize,
    pub limit_results: usize,
    pub min_term_length: usize,
    pub matcher: FuzzyMatcherKind,
}

impl From<&SearchConfig> for FuzzyOptions {
    fn from(c: &SearchConfig) -> Self {
        Self {
            limit_query: c.limit_query,
            limit_results: c.limit_results,
            min_term_length: c.min_term_length,
            matcher: c.fuzzy_matcher,
        }
    }
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

/// Collection backing a built-in context. Sub-entity and extension contexts
/// have none.
pub fn table_for(context: &Context) -> Option<Table> {
    Some(match context {
        Context::Jobs => Table::Jobs,
        Context::Evals => Table::Evals,
        Context::Allocs => Table::Allocs,
        Context::Nodes => Table::Nodes,
        Context::Deployments => Table::Deployments,
        Context::Plugins => Table::CsiPlugins,
        Context::Volumes => Table::CsiVolumes,
        Context::ScalingPolicies => Table::ScalingPolicies,
        Context::Namespaces => Table::Namespaces,
        _ => return None,
    })
}

pub struct Searcher {
    catalog: Catalog,
    ext: Arc<dyn SearchExtension>,
    fuzzy: FuzzyOptions,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::with_extension(Arc::new(NoopExtension))
    }
}

impl Searcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extension(ext: Arc<dyn SearchExtension>) -> Self {
        Self { catalog: Catalog::new(Arc::clone(&ext)), ext, fuzzy: FuzzyOptions::default() }
    }

    pub fn fuzzy_options(mut self, fuzzy: FuzzyOptions) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Identifiers starting with `prefix` in each context covered by
    /// `context`.
    pub fn prefix_search(
        &self,
        state: &dyn StateReader,
        acl: Option<&dyn AccessControl>,
        namespace: &str,
        prefix: &str,
        context: &Context,
    ) -> SearchResult<SearchResponse> {
        if prefix.is_empty() {
            return Err(SearchError::Validation("prefix must not be empty".into()));
        }
        if !gate::sufficient_search_perms(acl, namespace, context) {
            return Err(SearchError::PermissionDenied);
        }
        let contexts = gate::admitted(acl, namespace, self.catalog.expand(context));

        let mut resp = SearchResponse::default();
        for ctx in &contexts {
            let key = normalize(prefix, ctx);
            let (ids, truncated) = match self.open(ctx, state, acl, namespace, key)? {
                Some(iter) => collect(iter, prefix, self.ext.as_ref()),
                None => (Vec::new(), false),
            };
            resp.insert(ctx.clone(), ids, truncated);
        }
        resp.meta.index = self.query_index(state, &contexts)?;
        debug!(
            context = %context,
            contexts = contexts.len(),
            index = resp.meta.index,
            "search: prefix done"
        );
        Ok(resp)
    }

    /// Names matching `text` in each fuzzy-eligible context covered by
    /// `context`, ranked by match quality. Registered extension contexts are
    /// fuzzy-eligible; their records are named through the extension.
    pub fn fuzzy_search(
        &self,
        state: &dyn StateReader,
        acl: Option<&dyn AccessControl>,
        namespace: &str,
        text: &str,
        context: &Context,
    ) -> SearchResult<SearchResponse> {
        let gate_ctx = if context.is_union() { Context::Fuzzy } else { context.clone() };
        if !gate::sufficient_search_perms(acl, namespace, &gate_ctx) {
            return Err(SearchError::PermissionDenied);
        }
        let requested = match context {
            Context::All | Context::Fuzzy => self.catalog.expand(&Context::Fuzzy),
            c if self.catalog.is_fuzzy(c) => vec![c.clone()],
            _ => Vec::new(),
        };
        let contexts = gate::admitted(acl, namespace, requested);

        let mut resp = SearchResponse::default();
        if text.chars().count() < self.fuzzy.min_term_length {
            debug!(min = self.fuzzy.min_term_length, "search: fuzzy text shorter than minimum term length");
            for ctx in &contexts {
                resp.insert(ctx.clone(), Vec::new(), false);
            }
        } else {
            let matcher = Matcher::compile(text, self.fuzzy.matcher);
            for ctx in &contexts {
                let (names, truncated) = match self.open(ctx, state, acl, namespace, "")? {
                    Some(iter) => rank(
                        iter,
                        &matcher,
                        self.fuzzy.limit_query,
                        self.fuzzy.limit_results,
                        self.ext.as_ref(),
                    ),
                    None => (Vec::new(), false),
                };
                resp.insert(ctx.clone(), names, truncated);
            }
        }
        resp.meta.index = self.query_index(state, &contexts)?;
        debug!(
            context = %context,
            contexts = contexts.len(),
            index = resp.meta.index,
            "search: fuzzy done"
        );
        Ok(resp)
    }

    /// Iterator for one context. `None` means the context yields nothing: no
    /// collection backs it, or the prefix cannot be encoded for its key.
    fn open<'a>(
        &'a self,
        context: &Context,
        state: &'a dyn StateReader,
        acl: Option<&'a dyn AccessControl>,
        namespace: &str,
        prefix: &str,
    ) -> SearchResult<Option<ResourceIter<'a>>> {
        let opened = match table_for(context) {
            Some(table) => state.by_prefix(table, namespace, prefix).map(|iter| match (table, acl) {
                (Table::Namespaces, Some(acl)) => Some(gate::filter_namespaces(iter, acl)),
                _ => Some(iter),
            }),
            None => self.ext.try_iterate(context, state, namespace, prefix).transpose(),
        };
        match opened {
            Ok(Some(iter)) => Ok(Some(iter)),
            Ok(None) => {
                debug!(context = %context, "search: no collection for context");
                Ok(None)
            }
            Err(e) if e.is_prefix_format() => {
                debug!(context = %context, prefix, error = %e, "search: prefix not applicable to context");
                Ok(None)
            }
            Err(e) => Err(store_error(e)),
        }
    }

    /// Highest collection index across `contexts`.
    fn query_index(&self, state: &dyn StateReader, contexts: &[Context]) -> SearchResult<u64> {
        let mut index = 0;
        for ctx in contexts {
            let i = match table_for(ctx) {
                Some(table) => state.index(table.name()),
                None => self.ext.try_index(ctx, state).unwrap_or_else(|| state.index(ctx.as_str())),
            }
            .map_err(store_error)?;
            index = index.max(i);
        }
        Ok(index)
    }
}

fn store_error(e: StoreError) -> SearchError {
    SearchError::Store(e.to_string())
}
