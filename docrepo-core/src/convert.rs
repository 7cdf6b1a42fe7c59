//! Conversions between typed records and BSON documents.

use bson::{Bson, Document, de::deserialize_from_bson, oid::ObjectId};
use serde::de::DeserializeOwned;

use crate::{
    error::{DocumentStoreError, DocumentStoreResult},
    model::{DocumentModel, ID_FIELD},
};

/// Deserializes stored documents into records of type `T`, preserving order.
///
/// Fails on the first document that does not fit `T`; no partial result is returned.
pub fn to_objects<T>(documents: Vec<Document>) -> DocumentStoreResult<Vec<T>>
where
    T: DeserializeOwned,
{
    documents
        .into_iter()
        .enumerate()
        .map(|(index, document)| {
            deserialize_from_bson(Bson::Document(document)).map_err(|e| {
                DocumentStoreError::Deserialization(format!("document at position {index}: {e}"))
            })
        })
        .collect()
}

/// Projects each record through [`DocumentModel::to_document`], preserving order.
///
/// A persisted record's identity leads its document under [`ID_FIELD`], so
/// `to_objects(to_documents(records)?)` gives the records back unchanged.
///
/// # Errors
///
/// Returns [`DocumentStoreError::ContractViolation`] if a projection declares the
/// reserved [`ID_FIELD`].
pub fn to_documents<T>(objects: &[T]) -> DocumentStoreResult<Vec<Document>>
where
    T: DocumentModel,
{
    objects.iter().map(to_document).collect()
}

/// Maps each record to its identity, preserving order. Unpersisted records yield `None`.
pub fn extract_ids<T>(objects: &[T]) -> Vec<Option<ObjectId>>
where
    T: DocumentModel,
{
    objects.iter().map(|object| object.id()).collect()
}

/// Identities of the persisted records, in order. Unpersisted records are skipped.
///
/// The result feeds [`RepositoryContext::delete_many`](crate::context::RepositoryContext::delete_many) directly.
pub fn extract_persisted_ids<T>(objects: &[T]) -> Vec<ObjectId>
where
    T: DocumentModel,
{
    objects.iter().filter_map(|object| object.id()).collect()
}

pub(crate) fn to_document<T>(object: &T) -> DocumentStoreResult<Document>
where
    T: DocumentModel,
{
    let projection = object.to_document();

    if projection.contains_key(ID_FIELD) {
        return Err(DocumentStoreError::ContractViolation(format!(
            "projection must not declare the reserved field `{ID_FIELD}`"
        )));
    }

    let Some(id) = object.id() else {
        return Ok(projection);
    };

    let mut document = Document::new();
    document.insert(ID_FIELD, Bson::ObjectId(id));
    for (key, value) in projection {
        document.insert(key, value);
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Book {
        #[serde(rename = "_id", default)]
        id: Option<ObjectId>,
        title: String,
        tags: Vec<String>,
        pages: i32,
    }

    impl DocumentModel for Book {
        fn id(&self) -> Option<ObjectId> {
            self.id
        }

        fn to_document(&self) -> Document {
            doc! {
                "title": self.title.clone(),
                "tags": self.tags.clone(),
                "pages": self.pages,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    struct Rogue {
        #[serde(rename = "_id")]
        id: ObjectId,
    }

    impl DocumentModel for Rogue {
        fn id(&self) -> Option<ObjectId> {
            Some(self.id)
        }

        fn to_document(&self) -> Document {
            doc! { "_id": self.id }
        }
    }

    fn book(title: &str) -> Book {
        Book {
            id: None,
            title: title.to_string(),
            tags: vec!["fiction".to_string()],
            pages: 120,
        }
    }

    #[test]
    fn projection_keeps_declared_field_order() {
        let documents = to_documents(&[book("Dune")]).unwrap();
        let keys: Vec<&str> = documents[0].keys().map(String::as_str).collect();

        assert_eq!(keys, vec!["title", "tags", "pages"]);
    }

    #[test]
    fn persisted_identity_leads_the_document() {
        let id = ObjectId::new();
        let mut persisted = book("Dune");
        persisted.id = Some(id);

        let documents = to_documents(&[persisted]).unwrap();
        let keys: Vec<&str> = documents[0].keys().map(String::as_str).collect();

        assert_eq!(keys, vec!["_id", "title", "tags", "pages"]);
        assert_eq!(documents[0].get_object_id("_id").unwrap(), id);
    }

    #[test]
    fn records_round_trip_through_documents() {
        let mut persisted = book("Emma");
        persisted.id = Some(ObjectId::new());
        let records = vec![persisted, book("Persuasion")];

        let restored: Vec<Book> = to_objects(to_documents(&records).unwrap()).unwrap();

        assert_eq!(restored, records);
    }

    #[test]
    fn malformed_document_fails_the_whole_conversion() {
        let documents = vec![
            doc! { "title": "Ok", "tags": [], "pages": 1 },
            doc! { "title": "Broken", "tags": [], "pages": "many" },
            doc! { "title": "Never reached", "tags": [], "pages": 3 },
        ];

        let err = to_objects::<Book>(documents).unwrap_err();
        match err {
            DocumentStoreError::Deserialization(message) => assert!(message.contains("position 1")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn projection_declaring_identity_is_rejected() {
        let err = to_documents(&[Rogue { id: ObjectId::new() }]).unwrap_err();
        assert!(matches!(err, DocumentStoreError::ContractViolation(_)));
    }

    #[test]
    fn extract_ids_preserves_order_and_unset_entries() {
        let first = ObjectId::new();
        let mut persisted = book("A");
        persisted.id = Some(first);

        assert_eq!(extract_ids(&[persisted, book("B")]), vec![Some(first), None]);
    }

    #[test]
    fn persisted_ids_skip_unpersisted_records() {
        let first = ObjectId::new();
        let second = ObjectId::new();
        let mut a = book("A");
        a.id = Some(first);
        let mut c = book("C");
        c.id = Some(second);

        assert_eq!(extract_persisted_ids(&[a, book("B"), c]), vec![first, second]);
    }
}
