use serde::{Deserialize, Serialize};

/// Errors surfaced by the search API, suitable for transport over RPC.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum SearchError {
    #[error("Permission denied")]
    PermissionDenied,
    #[error("ACL token not found")]
    TokenNotFound,
    #[error("fuzzy search is not enabled")]
    FuzzyDisabled,
    #[error("validation: {0}")]
    Validation(String),
    #[error("store: {0}")]
    Store(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl SearchError {
    /// Errors the transport should report as "not found" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SearchError::FuzzyDisabled)
    }
}

pub type SearchResult<T> = Result<T, SearchError>;
