//! Access-control contract and a namespace-scoped policy object.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Namespace capability names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Overrides every other capability held in the namespace.
    Deny,
    ListJobs,
    ReadJob,
}

/// Questions search asks about the caller. A missing ACL (`None` at call
/// sites) means unrestricted.
pub trait AccessControl: Send + Sync {
    /// May the caller see the namespace at all?
    fn allow_namespace(&self, namespace: &str) -> bool;
    fn allow_namespace_op(&self, namespace: &str, cap: Capability) -> bool;
    fn allow_node_read(&self) -> bool;
}

/// Resolved policy for one token. Namespace rules are keyed by exact name; the
/// `*` key applies to namespaces without an exact rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Acl {
    pub management: bool,
    pub node_read: bool,
    pub namespaces: FxHashMap<String, SmallVec<[Capability; 4]>>,
}

impl Acl {
    pub fn management() -> Self {
        Self { management: true, ..Default::default() }
    }

    pub fn with_node_read(mut self) -> Self {
        self.node_read = true;
        self
    }

    pub fn with_namespace(mut self, namespace: &str, caps: &[Capability]) -> Self {
        self.namespaces.insert(namespace.to_string(), caps.iter().copied().collect());
        self
    }

    fn caps(&self, namespace: &str) -> Option<&[Capability]> {
        self.namespaces
            .get(namespace)
            .or_else(|| self.namespaces.get("*"))
            .map(|c| c.as_slice())
    }
}

impl AccessControl for Acl {
    fn allow_namespace(&self, namespace: &str) -> bool {
        if self.management {
            return true;
        }
        match self.caps(namespace) {
            Some(caps) => !caps.is_empty() && !caps.contains(&Capability::Deny),
            None => false,
        }
    }

    fn allow_namespace_op(&self, namespace: &str, cap: Capability) -> bool {
        if self.management {
            return true;
        }
        match self.caps(namespace) {
            Some(caps) => !caps.contains(&Capability::Deny) && caps.contains(&cap),
            None => false,
        }
    }

    fn allow_node_read(&self) -> bool {
        self.management || self.node_read
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn management_allows_everything() {
        let acl = Acl::management();
        assert!(acl.allow_node_read());
        assert!(acl.allow_namespace("anything"));
        assert!(acl.allow_namespace_op("anything", Capability::ReadJob));
    }

    #[test]
    fn exact_rule_wins_over_wildcard() {
        let acl = Acl::default()
            .with_namespace("*", &[Capability::ListJobs])
            .with_namespace("secret", &[Capability::Deny, Capability::ReadJob]);
        assert!(acl.allow_namespace("dev"));
        assert!(acl.allow_namespace_op("dev", Capability::ListJobs));
        assert!(!acl.allow_namespace_op("dev", Capability::ReadJob));
        assert!(!acl.allow_namespace("secret"));
        assert!(!acl.allow_namespace_op("secret", Capability::ReadJob));
        assert!(!acl.allow_node_read());
    }

    #[test]
    fn policy_decodes_from_json() {
        let acl: Acl = serde_json::from_value(serde_json::json!({
            "node_read": true,
            "namespaces": { "default": ["read-job", "list-jobs"] }
        }))
        .unwrap();
        assert!(acl.allow_node_read());
        assert!(acl.allow_namespace_op("default", Capability::ReadJob));
        assert!(!acl.allow_namespace("prod"));
    }
}
