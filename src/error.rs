//! Error taxonomy for the catalog core.
//!
//! Every fallible operation of the catalog surfaces one of these kinds. The
//! messages are stable per kind so callers can map them to transport codes;
//! raw upstream error text goes to the logs, never into the message.

use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed query parameters, detected before any I/O.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No record matches a name lookup or delete.
    #[error("country not found")]
    NotFound,

    /// Missing source configuration, fetch timeout/failure, or a malformed
    /// rate response. A refresh that hits this writes nothing.
    #[error("external data source unavailable: {0}")]
    SourceUnavailable(&'static str),

    /// Anything unanticipated, e.g. a storage failure mid-batch.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        CatalogError::Internal(format!("{err:#}"))
    }
}

impl From<fjall::Error> for CatalogError {
    fn from(err: fjall::Error) -> Self {
        CatalogError::Internal(format!("storage: {err}"))
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Internal(format!("record codec: {err}"))
    }
}
