//! Scout core types: search contexts, resource records, request/response shapes,
//! access-control policy and errors shared by the store, search and API crates.

#![forbid(unsafe_code)]

pub mod acl;
pub mod config;
pub mod context;
pub mod error;
pub mod query;
pub mod resource;

pub use acl::{AccessControl, Acl, Capability};
pub use config::{FuzzyMatcherKind, SearchConfig};
pub use context::Context;
pub use error::{SearchError, SearchResult};
pub use query::{
    FuzzySearchRequest, QueryMeta, QueryOptions, SearchRequest, SearchResponse, DEFAULT_NAMESPACE,
};
pub use resource::{
    Allocation, CsiPlugin, CsiVolume, Deployment, Evaluation, ExtensionRecord, Job, Namespace, Node,
    Resource, ScalingPolicy,
};

pub mod prelude {
    pub use super::{
        AccessControl, Acl, Capability, Context, FuzzySearchRequest, QueryOptions, Resource,
        SearchError, SearchRequest, SearchResponse, SearchResult,
    };
}
