//! State dump: the JSON file scoutctl loads into an in-RAM store.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use scout_api::AclResolver;
use scout_core::{Resource, SearchConfig};
use scout_store::StateStore;
use serde::{Deserialize, Serialize};

/// `{ "index": 42, "resources": [{"kind": "job", ...}], "acl": {...}, "search": {...} }`
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StateDump {
    /// Log index the resources were captured at.
    pub index: u64,
    pub resources: Vec<Resource>,
    pub acl: AclResolver,
    pub search: Option<SearchConfig>,
}

impl StateDump {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("parsing state dump")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// Store holding every resource at the dump's index (at least 1).
    pub fn restore(&self) -> Result<Arc<StateStore>> {
        let store = Arc::new(StateStore::new());
        let index = self.index.max(1);
        store.restore(index, self.resources.clone()).with_context(|| format!("restoring state at index {index}"))?;
        Ok(store)
    }
}
