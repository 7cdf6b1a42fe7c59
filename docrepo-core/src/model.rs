//! The contract every persisted record satisfies.
//!
//! A record carries an optional store-assigned identity and knows how to project
//! itself into a BSON [`Document`]. The projection is written by hand for each
//! record type: only the fields it lists are persisted.

use bson::{Document, oid::ObjectId};
use serde::de::DeserializeOwned;

/// Reserved field under which the store keeps a document's identity.
///
/// Projections produced by [`DocumentModel::to_document`] must not declare it.
pub const ID_FIELD: &str = "_id";

/// Core trait that all records stored through a
/// [`RepositoryContext`](crate::context::RepositoryContext) must implement.
///
/// The identity is `None` until the store assigns one on first insert. Reading a
/// record back (via `get_all` or `get_all_with_filter`) populates it, which is why
/// implementers map their identity field to [`ID_FIELD`] for deserialization.
///
/// # Example
///
/// ```ignore
/// use bson::{doc, Document, oid::ObjectId};
/// use docrepo::model::DocumentModel;
/// use serde::Deserialize;
///
/// #[derive(Debug, Clone, Default, Deserialize)]
/// pub struct Student {
///     #[serde(rename = "_id", default)]
///     pub id: Option<ObjectId>,
///     pub firstname: String,
///     pub age: i32,
/// }
///
/// impl DocumentModel for Student {
///     fn id(&self) -> Option<ObjectId> {
///         self.id
///     }
///
///     fn to_document(&self) -> Document {
///         doc! { "firstname": self.firstname.clone(), "age": self.age }
///     }
/// }
/// ```
pub trait DocumentModel: DeserializeOwned + Send + Sync {
    /// Returns the store-assigned identity, or `None` if the record was never persisted.
    fn id(&self) -> Option<ObjectId>;

    /// Projects the persisted fields of this record into a document.
    ///
    /// Must be pure and deterministic. Field order is kept as written.
    fn to_document(&self) -> Document;

    /// Returns `true` once the record carries a store-assigned identity.
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}
