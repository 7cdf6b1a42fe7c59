//! The repository context: typed CRUD over named collections.
//!
//! [`RepositoryContext`] wraps a [`StoreBackend`] and exposes single and batch
//! write operations plus full-collection reads for any [`DocumentModel`].
//!
//! Writes never return `Err`. Every failure, whether a contract violation caught
//! before touching the store or an error reported by it, is folded into a
//! [`Response`] or [`BatchResponse`]. Reads return a [`DocumentStoreResult`] and
//! propagate failures to the caller.
//!
//! # Example
//!
//! ```ignore
//! use docrepo::{prelude::*, memory::InMemoryStore};
//!
//! let context = RepositoryContext::new(InMemoryStore::new());
//! let students = context.use_table("students");
//!
//! let response = context.save(&students, &student).await;
//! assert!(response.succeeded());
//!
//! let found: Vec<Student> = context
//!     .get_all_with_filter(&students, &Filter::eq("firstname", "Josh"))
//!     .await?;
//! ```

use bson::oid::ObjectId;
use log::{debug, warn};

use crate::{
    backend::StoreBackend,
    convert::{to_document, to_documents, to_objects},
    error::{DocumentStoreError, DocumentStoreResult},
    model::DocumentModel,
    query::Expr,
    response::{BatchResponse, Response},
    table::Table,
};

/// Typed repository facade over a storage backend.
///
/// One context is meant to live for the whole process and be shared; it holds no
/// record data. It adds no locking: a read followed by a write is not atomic, and
/// the last of two concurrent updates wins.
#[derive(Debug)]
pub struct RepositoryContext<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> RepositoryContext<B> {
    /// Creates a new context over the given backend.
    ///
    /// Does not contact the store. Connectivity problems surface in the first
    /// operation's response.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns a handle to the collection called `name`.
    ///
    /// Idempotent, and never fails: the collection is created by the store on first write.
    pub fn use_table(&self, name: &str) -> Table {
        Table::new(name)
    }

    /// Inserts `record` as a new document. Its current identity, if any, is ignored
    /// and the store assigns a fresh one.
    pub async fn insert<T: DocumentModel>(&self, table: &Table, record: &T) -> Response {
        let result = self.try_insert(table, record).await;

        report("insert", table, result)
    }

    /// Inserts all `records` in a single store round trip.
    ///
    /// Because the store receives the batch as one call, every item shares the
    /// same outcome. An empty batch succeeds without contacting the store.
    pub async fn insert_many<T: DocumentModel>(&self, table: &Table, records: &[T]) -> BatchResponse {
        if records.is_empty() {
            return BatchResponse::new(Vec::new(), 0);
        }

        let result = match to_documents(records) {
            Ok(documents) => self
                .backend
                .insert_documents(documents, table.name())
                .await
                .map(|ids| ids.len()),
            Err(err) => Err(err),
        };

        if let Ok(count) = &result {
            debug!(
                "event=insert_many module=context status=ok collection={} count={}",
                table, count
            );
        }

        BatchResponse::uniform(report("insert_many", table, result), records.len())
    }

    /// Replaces the stored document that has `record`'s identity.
    ///
    /// The record must already carry an identity; otherwise the call fails with a
    /// contract violation before reaching the store. If no stored document has that
    /// identity the call succeeds and changes nothing.
    pub async fn update<T: DocumentModel>(&self, table: &Table, record: &T) -> Response {
        let result = self.try_update(table, record).await;

        report("update", table, result)
    }

    /// Applies [`update`](Self::update) to each record in order, stopping at the
    /// first failure.
    pub async fn update_many<T: DocumentModel>(&self, table: &Table, records: &[T]) -> BatchResponse {
        let mut results = Vec::with_capacity(records.len());

        for record in records {
            let response = self.update(table, record).await;
            let failed = !response.succeeded();

            results.push(response);

            if failed {
                break;
            }
        }

        BatchResponse::new(results, records.len())
    }

    /// Inserts `record` if it has no identity, otherwise updates it by identity.
    ///
    /// The decision is made on identity presence alone; the store is never asked
    /// whether a matching document exists.
    pub async fn save<T: DocumentModel>(&self, table: &Table, record: &T) -> Response {
        if record.is_persisted() {
            self.update(table, record).await
        } else {
            self.insert(table, record).await
        }
    }

    /// Applies [`save`](Self::save) to each record in order, stopping at the first failure.
    pub async fn save_many<T: DocumentModel>(&self, table: &Table, records: &[T]) -> BatchResponse {
        let mut results = Vec::with_capacity(records.len());

        for record in records {
            let response = self.save(table, record).await;
            let failed = !response.succeeded();

            results.push(response);

            if failed {
                break;
            }
        }

        BatchResponse::new(results, records.len())
    }

    /// Deletes the document with identity `id`. Deleting an absent identity succeeds.
    pub async fn delete(&self, table: &Table, id: ObjectId) -> Response {
        let result = self.backend.delete_document(id, table.name()).await;

        if let Ok(deleted) = &result {
            debug!(
                "event=delete module=context status=ok collection={} id={} deleted={}",
                table, id, deleted
            );
        }

        report("delete", table, result)
    }

    /// Deletes each identity in order, stopping at the first failure.
    pub async fn delete_many(&self, table: &Table, ids: &[ObjectId]) -> BatchResponse {
        let mut results = Vec::with_capacity(ids.len());

        for id in ids {
            let response = self.delete(table, *id).await;
            let failed = !response.succeeded();

            results.push(response);

            if failed {
                break;
            }
        }

        BatchResponse::new(results, ids.len())
    }

    /// Fetches every document in the collection as `T`.
    ///
    /// The whole collection is loaded into memory; there is no paging.
    ///
    /// # Errors
    ///
    /// Returns the store's error, or [`DocumentStoreError::Deserialization`] if any
    /// document does not fit `T`.
    pub async fn get_all<T: DocumentModel>(&self, table: &Table) -> DocumentStoreResult<Vec<T>> {
        self.find(table, None).await
    }

    /// Fetches every document matching `filter` as `T`.
    ///
    /// Like [`get_all`](Self::get_all), the full result set is materialised.
    pub async fn get_all_with_filter<T: DocumentModel>(
        &self,
        table: &Table,
        filter: &Expr,
    ) -> DocumentStoreResult<Vec<T>> {
        self.find(table, Some(filter)).await
    }

    /// Shuts down the context and releases backend resources.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown().await
    }

    async fn try_insert<T: DocumentModel>(&self, table: &Table, record: &T) -> DocumentStoreResult<()> {
        let ids = self
            .backend
            .insert_documents(vec![to_document(record)?], table.name())
            .await?;

        debug!(
            "event=insert module=context status=ok collection={} id={}",
            table,
            ids.first().map(|id| id.to_hex()).unwrap_or_default()
        );

        Ok(())
    }

    async fn try_update<T: DocumentModel>(&self, table: &Table, record: &T) -> DocumentStoreResult<()> {
        let id = record.id().ok_or_else(|| {
            DocumentStoreError::ContractViolation("cannot update a record without an identity".to_string())
        })?;

        let matched = self
            .backend
            .replace_document(id, to_document(record)?, table.name())
            .await?;

        debug!(
            "event=update module=context status=ok collection={} id={} matched={}",
            table, id, matched
        );

        Ok(())
    }

    async fn find<T: DocumentModel>(&self, table: &Table, filter: Option<&Expr>) -> DocumentStoreResult<Vec<T>> {
        let documents = self
            .backend
            .find_documents(filter, table.name())
            .await
            .inspect_err(|err| {
                warn!(
                    "event=find module=context status=error collection={} error={}",
                    table, err
                )
            })?;

        debug!(
            "event=find module=context status=ok collection={} filtered={} count={}",
            table,
            filter.is_some(),
            documents.len()
        );

        to_objects(documents)
    }
}

fn report<T>(event: &str, table: &Table, result: DocumentStoreResult<T>) -> Response {
    if let Err(err) = &result {
        warn!(
            "event={} module=context status=error collection={} error={}",
            event, table, err
        );
    }

    Response::from(result)
}
