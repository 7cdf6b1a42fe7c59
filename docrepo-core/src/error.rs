//! Error types and result types for repository operations.
//!
//! Reads surface these errors directly through [`DocumentStoreResult<T>`]. Writes
//! never do: the repository context folds them into a
//! [`Response`](crate::response::Response) at the operation boundary.

use bson::error::Error as BsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentStoreError {
    /// The store could not be reached or refused the supplied credentials.
    #[error("Connectivity error: {0}")]
    Connectivity(String),
    /// A value handed to the repository does not honour the document model contract.
    /// Raised before any store interaction takes place.
    #[error("Contract violation: {0}")]
    ContractViolation(String),
    /// A stored document could not be mapped into the requested record type.
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    /// Any other failure reported by the store while executing an operation.
    #[error("Store operation error: {0}")]
    StoreOperation(String),
    /// The connection configuration is incomplete or malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<BsonError> for DocumentStoreError {
    fn from(err: BsonError) -> Self {
        DocumentStoreError::Deserialization(err.to_string())
    }
}
