//! In-memory storage implementation for the repository layer.
//!
//! Documents are kept per collection in insertion order behind an async-aware
//! read-write lock, and behave the way a document database treats them.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Bson, Document, oid::ObjectId};
use log::info;

use docrepo_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::DocumentStoreResult,
    model::ID_FIELD,
    query::Expr,
};

use crate::evaluator::DocumentEvaluator;

type CollectionVec = Vec<Document>;
type StoreMap = HashMap<String, CollectionVec>;


/// Thread-safe in-memory document storage backend.
///
/// Store semantics match a document database:
///
/// - every insert gets a fresh [`ObjectId`] stored under `_id`, placed first;
/// - replacing or deleting an unknown identity matches nothing and is not an error;
/// - collections appear on first insert, and reading a missing one yields nothing;
/// - scans return documents in insertion order.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data.
///
/// # Performance
///
/// Every lookup and query scans the whole collection. Intended for tests and
/// small datasets.
///
/// # Example
///
/// ```ignore
/// use docrepo_memory::InMemoryStore;
/// use docrepo::backend::StoreBackend;
/// use bson::doc;
///
/// let store = InMemoryStore::new();
/// let ids = store.insert_documents(vec![doc! { "name": "Alice" }], "users").await?;
/// let docs = store.find_documents(None, "users").await?;
/// assert_eq!(docs[0].get_object_id("_id")?, ids[0]);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> documents in insertion order
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    #[cfg(test)]
    async fn collection_names(&self) -> Vec<String> {
        self.store
            .read()
            .await
            .keys()
            .cloned()
            .collect()
    }
}

fn identity_of(document: &Document) -> Option<ObjectId> {
    document.get_object_id(ID_FIELD).ok()
}

fn with_identity(id: ObjectId, document: Document) -> Document {
    let mut stored = Document::new();
    stored.insert(ID_FIELD, Bson::ObjectId(id));

    for (key, value) in document {
        if key != ID_FIELD {
            stored.insert(key, value);
        }
    }

    stored
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_documents(&self, documents: Vec<Document>, collection: &str) -> DocumentStoreResult<Vec<ObjectId>> {
        let mut store = self.store.write().await;
        let collection_vec = store
            .entry(collection.to_string())
            .or_default();

        let mut ids = Vec::with_capacity(documents.len());

        for doc in documents {
            let id = ObjectId::new();

            collection_vec.push(with_identity(id, doc));
            ids.push(id);
        }

        Ok(ids)
    }

    async fn replace_document(&self, id: ObjectId, document: Document, collection: &str) -> DocumentStoreResult<u64> {
        let mut store = self.store.write().await;
        let collection_vec = match store.get_mut(collection) {
            Some(col) => col,
            None => return Ok(0),
        };

        match collection_vec
            .iter_mut()
            .find(|doc| identity_of(doc) == Some(id))
        {
            Some(slot) => {
                *slot = with_identity(id, document);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_document(&self, id: ObjectId, collection: &str) -> DocumentStoreResult<u64> {
        let mut store = self.store.write().await;
        let collection_vec = match store.get_mut(collection) {
            Some(col) => col,
            None => return Ok(0),
        };

        match collection_vec
            .iter()
            .position(|doc| identity_of(doc) == Some(id))
        {
            Some(index) => {
                collection_vec.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn find_documents(&self, filter: Option<&Expr>, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        let store = self.store.read().await;
        let collection_vec = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        match filter {
            Some(expr) => DocumentEvaluator::filter_documents(collection_vec.iter(), expr),
            None => Ok(collection_vec.clone()),
        }
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        info!("event=shutdown module=memory status=ok");

        Ok(())
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance. Always succeeds.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        info!("event=build module=memory status=ok");

        Ok(InMemoryStore::new())
    }
}
