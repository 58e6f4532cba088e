//! Errors raised at the dataset load boundary.
//!
//! Queries never fail; only turning the two JSON documents into an
//! in-memory dataset can.

use thiserror::Error;

/// Result type for dataset loading
pub type DatasetResult<T> = Result<T, DatasetError>;

#[derive(Debug, Error)]
pub enum DatasetError {
    /// A year key in the ranking document is not an integer
    #[error("invalid year key {key:?} in {table}")]
    InvalidYear { key: String, table: &'static str },

    /// Two keys of one table name the same year (e.g. "2025" and " 2025")
    #[error("year {year} appears more than once in {table}")]
    DuplicateYear { year: i32, table: &'static str },

    /// The document is not valid JSON or does not match the expected shape
    #[error("malformed {document} document: {source}")]
    Json {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl DatasetError {
    pub fn invalid_year(key: impl Into<String>, table: &'static str) -> Self {
        DatasetError::InvalidYear {
            key: key.into(),
            table,
        }
    }

    pub fn json(document: &'static str, source: serde_json::Error) -> Self {
        DatasetError::Json { document, source }
    }
}
