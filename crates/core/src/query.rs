//! Request and response shapes for prefix and fuzzy search.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::context::Context;

pub const DEFAULT_NAMESPACE: &str = "default";

/// Options common to every read request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    /// Target namespace; empty means [`DEFAULT_NAMESPACE`].
    pub namespace: String,
    /// Secret of the caller's ACL token; empty for anonymous.
    pub auth_token: String,
    /// Blocking query: wait until the response index exceeds this value.
    pub min_query_index: u64,
    /// Upper bound on how long a blocking query may wait.
    pub max_query_time: Option<Duration>,
}

impl QueryOptions {
    pub fn request_namespace(&self) -> &str {
        if self.namespace.is_empty() { DEFAULT_NAMESPACE } else { &self.namespace }
    }
}

/// Consistency metadata attached to a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMeta {
    /// Highest replicated-log index across the collections that were queried.
    pub index: u64,
    pub known_leader: bool,
}

/// Prefix search: identifiers starting with `prefix`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub prefix: String,
    #[serde(default)]
    pub context: Context,
    #[serde(flatten)]
    pub options: QueryOptions,
}

impl SearchRequest {
    pub fn new(prefix: impl Into<String>, context: Context) -> Self {
        Self { prefix: prefix.into(), context, options: QueryOptions::default() }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }
}

/// Fuzzy search: names matching the `text` pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzySearchRequest {
    pub text: String,
    #[serde(default)]
    pub context: Context,
    #[serde(flatten)]
    pub options: QueryOptions,
}

impl FuzzySearchRequest {
    pub fn new(text: impl Into<String>, context: Context) -> Self {
        Self { text: text.into(), context, options: QueryOptions::default() }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }
}

/// Matches per concrete context. `matches` and `truncations` always carry the
/// same keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub matches: BTreeMap<Context, Vec<String>>,
    pub truncations: BTreeMap<Context, bool>,
    #[serde(flatten)]
    pub meta: QueryMeta,
}

impl SearchResponse {
    pub fn insert(&mut self, context: Context, ids: Vec<String>, truncated: bool) {
        self.truncations.insert(context.clone(), truncated);
        self.matches.insert(context, ids);
    }

    pub fn get(&self, context: &Context) -> Option<&[String]> {
        self.matches.get(context).map(Vec::as_slice)
    }

    pub fn is_truncated(&self, context: &Context) -> bool {
        self.truncations.get(context).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_namespace_defaults() {
        let opts = QueryOptions::default();
        assert_eq!(opts.request_namespace(), "default");
        let opts = QueryOptions { namespace: "prod".into(), ..Default::default() };
        assert_eq!(opts.request_namespace(), "prod");
    }

    #[test]
    fn response_keeps_key_sets_aligned() {
        let mut resp = SearchResponse::default();
        resp.insert(Context::Jobs, vec!["web-1".into()], false);
        resp.insert(Context::Nodes, vec![], true);
        assert!(resp.matches.keys().eq(resp.truncations.keys()));
        assert!(resp.is_truncated(&Context::Nodes));
        assert_eq!(resp.get(&Context::Jobs), Some(&["web-1".to_string()][..]));
    }

    #[test]
    fn request_decodes_flattened_options() {
        let req: SearchRequest = serde_json::from_value(serde_json::json!({
            "prefix": "web",
            "context": "jobs",
            "namespace": "prod",
            "min_query_index": 7
        }))
        .unwrap();
        assert_eq!(req.context, Context::Jobs);
        assert_eq!(req.options.request_namespace(), "prod");
        assert_eq!(req.options.min_query_index, 7);
    }
}
