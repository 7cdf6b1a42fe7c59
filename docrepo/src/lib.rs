//! Main docrepo crate providing a typed repository layer over document databases.
//!
//! This crate is the primary entry point for users of docrepo. It re-exports the
//! core types from the sub-crates and gives access to the storage backends.
//!
//! # Features
//!
//! - **Typed records** - Implement [`DocumentModel`](model::DocumentModel) and deserialise with Serde
//! - **Upsert by identity** - `save` inserts new records and replaces persisted ones
//! - **Uniform write responses** - Writes never fail with an error, they report `(succeeded, message)`
//! - **Filtering** - Equality and containment filters evaluated natively by each backend
//! - **Multiple backends** - In-memory and MongoDB storage behind one trait
//!
//! # Quick Start
//!
//! ```ignore
//! use docrepo::{prelude::*, memory::InMemoryStore};
//! use bson::{doc, Document, oid::ObjectId};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Clone, Deserialize)]
//! pub struct Student {
//!     #[serde(rename = "_id", default)]
//!     pub id: Option<ObjectId>,
//!     pub firstname: String,
//!     pub age: i32,
//! }
//!
//! impl DocumentModel for Student {
//!     fn id(&self) -> Option<ObjectId> { self.id }
//!     fn to_document(&self) -> Document {
//!         doc! { "firstname": self.firstname.clone(), "age": self.age }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = RepositoryContext::new(InMemoryStore::builder().build().await?);
//!     let students = context.use_table("students");
//!
//!     // No identity yet, so this inserts.
//!     let josh = Student { id: None, firstname: "Josh".into(), age: 28 };
//!     context.save(&students, &josh).await.into_result()?;
//!
//!     // Read back, edit and save again: now it replaces.
//!     let mut stored = context
//!         .get_all_with_filter::<Student>(&students, &Filter::eq("firstname", "Josh"))
//!         .await?;
//!     stored[0].age = 29;
//!     context.save(&students, &stored[0]).await.into_result()?;
//!
//!     context.shutdown().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires `mongodb` feature)

pub mod prelude;

pub use docrepo_core::{backend, config, context, convert, error, model, query, response, table};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use docrepo_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use docrepo_mongodb::{MongoDbStore, MongoDbStoreBuilder, render_filter};
}
