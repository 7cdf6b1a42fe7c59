//! MongoDB backend implementation for docrepo.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait,
//! backing a `RepositoryContext` with a real MongoDB database.
//! 
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//! 
//! ```toml
//! [dependencies]
//! docrepo = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Features
//!
//! - **Persistent storage** - Data is persisted to MongoDB Atlas or self-hosted MongoDB
//! - **Native filtering** - Filters are rendered to MongoDB query documents ([`render_filter`])
//! - **Async/await** - Fully asynchronous API built on MongoDB's async driver
//!
//! # Connection
//!
//! The backend is built from a `ConnectionConfig`, either a connection string or
//! discrete host, port and credentials. Building never contacts the server.
//!
//! # Example
//!
//! ```ignore
//! use docrepo::{prelude::*, mongodb::MongoDbStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConnectionConfig::connection_string("mongodb://localhost:27017", "school");
//!     let context = RepositoryContext::new(MongoDbStore::builder(config).build().await?);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docrepo_mongodb;

pub mod store;
pub mod query;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
pub use query::render_filter;
