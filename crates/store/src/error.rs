/// Store failures. The first four variants describe a prefix that cannot be
/// encoded for a UUID-keyed table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid UUID: encoding/hex: invalid byte: {0:?}")]
    InvalidEncoding(char),
    #[error("Invalid UUID length. UUID have 36 characters; got {0}")]
    TooLong(usize),
    #[error("UUID should have maximum of 4 \"-\"; got {0}")]
    TooManyHyphens(usize),
    #[error("Input (without hyphens) must be even length")]
    OddLength,
    #[error("invalid {table} id {id:?}: not a canonical UUID")]
    InvalidId { table: &'static str, id: String },
    #[error("index {index} is not newer than current index {current}")]
    StaleIndex { index: u64, current: u64 },
    #[error("{0} records are not stored in the state store")]
    Unsupported(String),
}

impl StoreError {
    /// Prefix could not be encoded for the table's key. Searches treat the
    /// table as having no matches.
    pub fn is_prefix_format(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidEncoding(_)
                | StoreError::TooLong(_)
                | StoreError::TooManyHyphens(_)
                | StoreError::OddLength
        )
    }
}
