//! Error types for the bundle catalog.

use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to open catalog: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),

    #[error("bundle not found: {0}")]
    NotFound(String),

    #[error("bundle {0} already exists")]
    Duplicate(String),

    /// New ids must sort above every stored id (and above NIL).
    #[error("bundle id {id} is not newer than latest id {latest}")]
    NotMonotonic { id: String, latest: String },
}
