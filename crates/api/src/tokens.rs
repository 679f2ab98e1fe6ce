//! Token resolution: map a request's secret to the caller's ACL.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use scout_core::{AccessControl, Acl, SearchError, SearchResult};
use serde::{Deserialize, Serialize};

pub trait TokenResolver: Send + Sync {
    /// `Ok(None)` means unrestricted access. An empty secret is anonymous.
    fn resolve(&self, secret: &str) -> SearchResult<Option<Arc<dyn AccessControl>>>;
}

/// Token table with an optional anonymous policy. With `enabled == false`
/// every caller is unrestricted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AclResolver {
    pub enabled: bool,
    pub anonymous: Option<Acl>,
    pub tokens: FxHashMap<String, Acl>,
}

impl AclResolver {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn enabled() -> Self {
        Self { enabled: true, ..Default::default() }
    }

    pub fn with_token(mut self, secret: &str, acl: Acl) -> Self {
        self.tokens.insert(secret.to_string(), acl);
        self
    }

    pub fn with_anonymous(mut self, acl: Acl) -> Self {
        self.anonymous = Some(acl);
        self
    }
}

impl TokenResolver for AclResolver {
    fn resolve(&self, secret: &str) -> SearchResult<Option<Arc<dyn AccessControl>>> {
        if !self.enabled {
            return Ok(None);
        }
        let acl = if secret.is_empty() {
            // Anonymous callers without a policy get nothing.
            self.anonymous.clone().unwrap_or_default()
        } else {
            self.tokens.get(secret).cloned().ok_or(SearchError::TokenNotFound)?
        };
        Ok(Some(Arc::new(acl)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::Capability;

    #[test]
    fn disabled_is_unrestricted() {
        let r = AclResolver::disabled();
        assert!(r.resolve("anything").unwrap().is_none());
        assert!(r.resolve("").unwrap().is_none());
    }

    #[test]
    fn unknown_secret_is_rejected() {
        let r = AclResolver::enabled().with_token("s3cr3t", Acl::management());
        assert_eq!(r.resolve("nope").err(), Some(SearchError::TokenNotFound));
        let acl = r.resolve("s3cr3t").unwrap().unwrap();
        assert!(acl.allow_node_read());
    }

    #[test]
    fn anonymous_policy_applies_to_empty_secret() {
        let r = AclResolver::enabled();
        let acl = r.resolve("").unwrap().unwrap();
        assert!(!acl.allow_namespace("default"));

        let r = r.with_anonymous(Acl::default().with_namespace("default", &[Capability::ListJobs]));
        let acl = r.resolve("").unwrap().unwrap();
        assert!(acl.allow_namespace_op("default", Capability::ListJobs));
    }
}
