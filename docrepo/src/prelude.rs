//! Convenient re-exports of commonly used types from docrepo.
//!
//! ```ignore
//! use docrepo::prelude::*;
//! ```
//!
//! This provides access to the record contract, the repository context and its
//! responses, filters, backend traits and the error types.

pub use docrepo_core::{
    model::{DocumentModel, ID_FIELD},
    context::RepositoryContext,
    table::Table,
    response::{Response, BatchResponse},
    backend::{StoreBackend, StoreBackendBuilder},
    query::{QueryVisitor, Expr, FieldOp, Filter},
    config::ConnectionConfig,
    error::{DocumentStoreError, DocumentStoreResult},
};
