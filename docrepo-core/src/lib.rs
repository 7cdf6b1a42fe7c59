//! A thin typed repository layer over document databases.
//!
//! This crate is the core of the docrepo project and provides:
//!
//! - **Document model contract** ([`model`]) - The trait every persisted record implements
//! - **Conversions** ([`convert`]) - Mapping between typed records and BSON documents
//! - **Repository context** ([`context`]) - Single and batch CRUD against named collections
//! - **Responses** ([`response`]) - Uniform success/failure values returned by writes
//! - **Filters** ([`query`]) - Declarative equality and containment predicates
//! - **Store backend abstraction** ([`backend`]) - Traits for implementing storage backends
//! - **Configuration** ([`config`]) - Connection settings for remote stores
//! - **Error handling** ([`error`]) - Error taxonomy and result types
//!
//! # Example
//!
//! ```ignore
//! use docrepo::prelude::*;
//! use bson::{doc, Document, oid::ObjectId};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Clone, Deserialize)]
//! pub struct Student {
//!     #[serde(rename = "_id", default)]
//!     pub id: Option<ObjectId>,
//!     pub firstname: String,
//! }
//!
//! impl DocumentModel for Student {
//!     fn id(&self) -> Option<ObjectId> {
//!         self.id
//!     }
//!
//!     fn to_document(&self) -> Document {
//!         doc! { "firstname": self.firstname.clone() }
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docrepo_core;

pub mod backend;
pub mod config;
pub mod context;
pub mod convert;
pub mod error;
pub mod model;
pub mod query;
pub mod response;
pub mod table;
