//! In-memory document storage backend for docrepo.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It mirrors a document database closely enough to run the same repository code
//! against it, which makes it the default backend for development and tests.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Store-assigned identities** - Fresh `ObjectId`s on insert, stable across replaces
//! - **Filter support** - Equality and containment with the same rules as MongoDB
//!
//! # Quick Start
//!
//! ```ignore
//! use docrepo::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = RepositoryContext::new(InMemoryStore::builder().build().await?);
//!     let students = context.use_table("students");
//!
//!     assert!(context.insert(&students, &student).await.succeeded());
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docrepo_memory;

pub mod store;
mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
