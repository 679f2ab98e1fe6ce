//! Search contexts: the resource kinds a query can be scoped to.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Scope of a search. Top-level kinds are searchable on their own; sub-entity
/// kinds only annotate fuzzy results; `All` and `Fuzzy` are unions that are
/// expanded before any collection is queried.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Context {
    Allocs,
    Deployments,
    Evals,
    Jobs,
    Nodes,
    Namespaces,
    ScalingPolicies,
    Plugins,
    Volumes,

    Groups,
    Services,
    Tasks,
    Images,
    Commands,
    Classes,

    #[default]
    All,
    Fuzzy,

    /// Kind contributed by a search extension (e.g. `quotas`).
    Extension(String),
}

impl Context {
    pub fn as_str(&self) -> &str {
        match self {
            Context::Allocs => "allocs",
            Context::Deployments => "deployment",
            Context::Evals => "evals",
            Context::Jobs => "jobs",
            Context::Nodes => "nodes",
            Context::Namespaces => "namespaces",
            Context::ScalingPolicies => "scaling_policy",
            Context::Plugins => "plugins",
            Context::Volumes => "volumes",
            Context::Groups => "groups",
            Context::Services => "services",
            Context::Tasks => "tasks",
            Context::Images => "images",
            Context::Commands => "commands",
            Context::Classes => "classes",
            Context::All => "all",
            Context::Fuzzy => "fuzzy",
            Context::Extension(name) => name,
        }
    }

    /// `all` and `fuzzy` never reach a collection; they are expanded first.
    pub fn is_union(&self) -> bool {
        matches!(self, Context::All | Context::Fuzzy)
    }

    pub fn is_extension(&self) -> bool {
        matches!(self, Context::Extension(_))
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Context {
    type Err = Infallible;

    /// Unknown names become extension contexts; an empty string means `all`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" | "all" => Context::All,
            "allocs" => Context::Allocs,
            "deployment" => Context::Deployments,
            "evals" => Context::Evals,
            "jobs" => Context::Jobs,
            "nodes" => Context::Nodes,
            "namespaces" => Context::Namespaces,
            "scaling_policy" => Context::ScalingPolicies,
            "plugins" => Context::Plugins,
            "volumes" => Context::Volumes,
            "groups" => Context::Groups,
            "services" => Context::Services,
            "tasks" => Context::Tasks,
            "images" => Context::Images,
            "commands" => Context::Commands,
            "classes" => Context::Classes,
            "fuzzy" => Context::Fuzzy,
            other => Context::Extension(other.to_string()),
        })
    }
}

impl From<&str> for Context {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(ctx) => ctx,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Context {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Context {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Context::from(s.as_str()))
    }
}
