use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Document, doc, oid::ObjectId};
use log::info;
use mongodb::{
    Client, Collection as MongoCollection,
    error::{Error as MongoError, ErrorKind},
    options::{ClientOptions, Credential, ServerAddress},
};
use docrepo_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    config::ConnectionConfig,
    error::{DocumentStoreError, DocumentStoreResult},
    model::ID_FIELD,
    query::{Expr, QueryVisitor},
};

use crate::query::MongoQueryTranslator;


/// Maps a driver error onto the repository error taxonomy.
///
/// Failures to reach or authenticate with the server are connectivity errors;
/// everything the server itself rejects is a store operation error.
pub(crate) fn classify(err: MongoError) -> DocumentStoreError {
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Authentication { .. }
        | ErrorKind::Io(..)
        | ErrorKind::ConnectionPoolCleared { .. } => DocumentStoreError::Connectivity(err.to_string()),
        _ => DocumentStoreError::StoreOperation(err.to_string()),
    }
}

#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(config: ConnectionConfig) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(config)
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    fn prepare_document(id: ObjectId, document: Document) -> Document {
        let mut prepared = doc! { ID_FIELD: id };

        for (key, value) in document {
            if key != ID_FIELD {
                prepared.insert(key, value);
            }
        }

        prepared
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_documents(&self, documents: Vec<Document>, collection: &str) -> DocumentStoreResult<Vec<ObjectId>> {
        // Identities are assigned client-side so they come back in input order.
        let ids: Vec<ObjectId> = documents
            .iter()
            .map(|_| ObjectId::new())
            .collect();

        self.get_collection(collection)
            .insert_many(
                ids.iter()
                    .zip(documents)
                    .map(|(id, doc)| Self::prepare_document(*id, doc)),
            )
            .await
            .map_err(classify)?;

        Ok(ids)
    }

    async fn replace_document(&self, id: ObjectId, document: Document, collection: &str) -> DocumentStoreResult<u64> {
        Ok(
            self.get_collection(collection)
                .replace_one(doc! { ID_FIELD: id }, Self::prepare_document(id, document))
                .await
                .map_err(classify)?
                .matched_count
        )
    }

    async fn delete_document(&self, id: ObjectId, collection: &str) -> DocumentStoreResult<u64> {
        Ok(
            self.get_collection(collection)
                .delete_one(doc! { ID_FIELD: id })
                .await
                .map_err(classify)?
                .deleted_count
        )
    }

    async fn find_documents(&self, filter: Option<&Expr>, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        self.get_collection(collection)
            .find(
                match filter {
                    Some(expr) => MongoQueryTranslator.visit_expr(expr)?,
                    None => doc! {},
                },
            )
            .await
            .map_err(classify)?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(classify)
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        info!("event=shutdown module=mongodb status=ok database={}", self.database);

        Ok(())
    }
}

/// Builds a [`MongoDbStore`] from a [`ConnectionConfig`].
///
/// Building validates the configuration and sets up the driver's connection pool,
/// but does not contact the server. Unreachable hosts and rejected credentials
/// surface as [`DocumentStoreError::Connectivity`] on the first operation.
pub struct MongoDbStoreBuilder {
    config: ConnectionConfig,
}

impl MongoDbStoreBuilder {
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    async fn client_options(&self) -> DocumentStoreResult<ClientOptions> {
        match &self.config {
            ConnectionConfig::ConnectionString { uri, .. } => ClientOptions::parse(uri)
                .await
                .map_err(|e| DocumentStoreError::Configuration(e.to_string())),
            ConnectionConfig::Credentials { host, port, database, username, password } => {
                let mut credential = Credential::default();
                credential.username = Some(username.clone());
                credential.password = Some(password.clone());
                credential.source = Some(database.clone());

                let mut options = ClientOptions::default();
                options.hosts = vec![ServerAddress::Tcp {
                    host: host.clone(),
                    port: Some(*port),
                }];
                options.credential = Some(credential);
                options.default_database = Some(database.clone());

                Ok(options)
            }
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        self.config.validate()?;

        let client = Client::with_options(self.client_options().await?)
            .map_err(|e| DocumentStoreError::Configuration(e.to_string()))?;
        let database = self.config.database().to_string();

        info!("event=build module=mongodb status=ok database={database}");

        Ok(MongoDbStore::new(client, database))
    }
}
