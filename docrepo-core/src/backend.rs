//! Storage backend abstraction for the repository layer.
//!
//! A backend owns the connection to a concrete store and executes the handful of
//! primitive operations the [`RepositoryContext`](crate::context::RepositoryContext)
//! is built from. It deals only in BSON documents and identities; typed records,
//! the upsert rule and response reporting live above it.
//!
//! # Store semantics
//!
//! Implementations must behave like a document database:
//!
//! - Collections are created lazily on first write. Reads and writes against a
//!   collection that does not exist yet are not errors.
//! - Inserting assigns a fresh identity to every document, stored under
//!   [`ID_FIELD`](crate::model::ID_FIELD).
//! - Replacing or deleting an identity that is not present matches nothing and
//!   reports a count of zero.
//!
//! # Example
//!
//! ```ignore
//! use docrepo::backend::StoreBackend;
//! use bson::doc;
//!
//! let ids = backend.insert_documents(vec![doc! { "name": "Alice" }], "users").await?;
//! let matched = backend.replace_document(ids[0], doc! { "name": "Alicia" }, "users").await?;
//! assert_eq!(matched, 1);
//! ```

use async_trait::async_trait;
use bson::{Document, oid::ObjectId};
use std::fmt::Debug;

use crate::{error::DocumentStoreResult, query::Expr};

/// Abstract interface for document storage backends.
///
/// All implementations must be thread-safe. The repository layer adds no
/// synchronisation of its own, so concurrent callers get whatever isolation the
/// backend provides.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts new documents in a single round trip.
    ///
    /// # Returns
    ///
    /// The store-assigned identities, in the order the documents were given.
    async fn insert_documents(
        &self,
        documents: Vec<Document>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<ObjectId>>;

    /// Replaces the document whose identity is `id`, keeping the identity.
    ///
    /// # Returns
    ///
    /// The number of documents matched (`0` or `1`). Zero is not an error.
    async fn replace_document(
        &self,
        id: ObjectId,
        document: Document,
        collection: &str,
    ) -> DocumentStoreResult<u64>;

    /// Deletes the document whose identity is `id`.
    ///
    /// # Returns
    ///
    /// The number of documents deleted (`0` or `1`). Zero is not an error.
    async fn delete_document(&self, id: ObjectId, collection: &str) -> DocumentStoreResult<u64>;

    /// Returns every document matching `filter`, fully materialised.
    ///
    /// `None` matches every document in the collection. Documents include their
    /// identity under [`ID_FIELD`](crate::model::ID_FIELD).
    async fn find_documents(
        &self,
        filter: Option<&Expr>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn insert_documents(
        &self,
        documents: Vec<Document>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<ObjectId>> {
        (*self)
            .insert_documents(documents, collection)
            .await
    }

    async fn replace_document(
        &self,
        id: ObjectId,
        document: Document,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        (*self)
            .replace_document(id, document, collection)
            .await
    }

    async fn delete_document(&self, id: ObjectId, collection: &str) -> DocumentStoreResult<u64> {
        (*self)
            .delete_document(id, collection)
            .await
    }

    async fn find_documents(
        &self,
        filter: Option<&Expr>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        (*self)
            .find_documents(filter, collection)
            .await
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
