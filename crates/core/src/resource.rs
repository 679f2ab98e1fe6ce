//! Resource records as held by the state store.
//!
//! Only the fields search needs (identity, namespace, display name) plus a few
//! descriptive ones are modelled; everything else lives with the scheduler.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::query::DEFAULT_NAMESPACE;

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Free-form identifier, unique within its namespace.
    pub id: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default)]
    pub job_id: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// `<job>.<group>[<index>]`
    pub name: String,
    #[serde(default)]
    pub job_id: String,
    #[serde(default)]
    pub node_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub datacenter: String,
    #[serde(default)]
    pub node_class: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default)]
    pub job_id: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsiPlugin {
    pub id: String,
    #[serde(default)]
    pub provider: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsiVolume {
    pub id: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub plugin_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingPolicy {
    pub id: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default)]
    pub target: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Record of a kind the open core does not know about. Identity and name are
/// resolved through the search extension hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionRecord {
    pub resource: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resource {
    Job(Job),
    Evaluation(Evaluation),
    Allocation(Allocation),
    Node(Node),
    Deployment(Deployment),
    CsiPlugin(CsiPlugin),
    CsiVolume(CsiVolume),
    ScalingPolicy(ScalingPolicy),
    Namespace(Namespace),
    Extension(ExtensionRecord),
}

impl Resource {
    /// Identifying string: the unique ID, or the name for namespaces.
    /// `None` for extension records.
    pub fn id(&self) -> Option<&str> {
        match self {
            Resource::Job(r) => Some(&r.id),
            Resource::Evaluation(r) => Some(&r.id),
            Resource::Allocation(r) => Some(&r.id),
            Resource::Node(r) => Some(&r.id),
            Resource::Deployment(r) => Some(&r.id),
            Resource::CsiPlugin(r) => Some(&r.id),
            Resource::CsiVolume(r) => Some(&r.id),
            Resource::ScalingPolicy(r) => Some(&r.id),
            Resource::Namespace(r) => Some(&r.name),
            Resource::Extension(_) => None,
        }
    }

    /// Human-readable name used as the fuzzy-match subject. Only nodes,
    /// namespaces, jobs and allocations carry one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Resource::Job(r) => Some(&r.name),
            Resource::Allocation(r) => Some(&r.name),
            Resource::Node(r) => Some(&r.name),
            Resource::Namespace(r) => Some(&r.name),
            _ => None,
        }
    }

    /// Owning namespace; `None` for cluster-scoped kinds.
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Resource::Job(r) => Some(&r.namespace),
            Resource::Evaluation(r) => Some(&r.namespace),
            Resource::Allocation(r) => Some(&r.namespace),
            Resource::Deployment(r) => Some(&r.namespace),
            Resource::CsiVolume(r) => Some(&r.namespace),
            Resource::ScalingPolicy(r) => Some(&r.namespace),
            Resource::Extension(r) => Some(&r.namespace),
            Resource::Node(_) | Resource::CsiPlugin(_) | Resource::Namespace(_) => None,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Resource::Job(_) => "job",
            Resource::Evaluation(_) => "evaluation",
            Resource::Allocation(_) => "allocation",
            Resource::Node(_) => "node",
            Resource::Deployment(_) => "deployment",
            Resource::CsiPlugin(_) => "csi_plugin",
            Resource::CsiVolume(_) => "csi_volume",
            Resource::ScalingPolicy(_) => "scaling_policy",
            Resource::Namespace(_) => "namespace",
            Resource::Extension(r) => &r.resource,
        }
    }
}
