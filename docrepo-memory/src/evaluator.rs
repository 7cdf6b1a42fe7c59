//! Filter evaluation for in-memory document filtering.
//!
//! Matching follows the rules documented on [`docrepo_core::query`], which are
//! the document database's own semantics for the supported operators.

use bson::{Bson, DateTime, Document, oid::ObjectId};
use std::collections::HashMap;

use docrepo_core::{
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, FieldOp, QueryVisitor},
};

/// Comparable representation of BSON values.
///
/// Integers compare exactly with each other. A double compares numerically
/// against any number, so `Int32(28)` equals `Int64(28)` and `Double(28.0)`.
/// Types without a dedicated variant fall back to plain BSON equality.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    ObjectId(ObjectId),
    String(&'a str),
    DateTime(DateTime),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
    Other(&'a Bson),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Int(i64::from(*value)),
            Bson::Int64(value) => Comparable::Int(*value),
            Bson::Double(value) => Comparable::Double(*value),
            Bson::ObjectId(value) => Comparable::ObjectId(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            other => Comparable::Other(other),
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Int(a), Comparable::Int(b)) => a == b,
            (Comparable::Double(a), Comparable::Double(b)) => a == b,
            (Comparable::Int(a), Comparable::Double(b)) | (Comparable::Double(b), Comparable::Int(a)) => {
                *a as f64 == *b
            }
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            (Comparable::Other(a), Comparable::Other(b)) => a == b,
            _ => false,
        }
    }
}

pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> DocumentStoreResult<bool> {
        self.visit_expr(expr)
    }

    /// Keeps the documents matching `expr`. An ill-formed filter fails the whole call.
    pub fn filter_documents(
        documents: impl IntoIterator<Item = &'a Document>,
        expr: &Expr,
    ) -> DocumentStoreResult<Vec<Document>> {
        let mut matched = Vec::new();

        for doc in documents {
            if DocumentEvaluator::new(doc).evaluate(expr)? {
                matched.push(doc.clone());
            }
        }

        Ok(matched)
    }

    /// Resolves a dotted path such as `address.city` through nested documents.
    fn lookup(&self, field: &str) -> Option<&'a Bson> {
        let document: &'a Document = self.document;
        let mut segments = field.split('.');
        let mut current = document.get(segments.next()?)?;

        for segment in segments {
            current = current.as_document()?.get(segment)?;
        }

        Some(current)
    }
}

fn equals(field_value: &Bson, value: &Bson) -> bool {
    let expected = Comparable::from(value);

    match (Comparable::from(field_value), &expected) {
        (Comparable::Array(items), Comparable::Array(_)) => Comparable::Array(items) == expected,
        (Comparable::Array(items), _) => items.iter().any(|item| item == &expected),
        (actual, _) => actual == expected,
    }
}

fn contains(field_value: &Bson, value: &Bson) -> DocumentStoreResult<bool> {
    match value {
        Bson::String(needle) => Ok(match field_value {
            Bson::String(haystack) => haystack.contains(needle.as_str()),
            Bson::Array(items) => items.iter().any(|item| match item {
                Bson::String(haystack) => haystack.contains(needle.as_str()),
                _ => false,
            }),
            _ => false,
        }),
        // An empty list matches nothing, as with `$all: []`.
        Bson::Array(required) => Ok(
            !required.is_empty() && required.iter().all(|wanted| equals(field_value, wanted))
        ),
        _ => Err(DocumentStoreError::ContractViolation(
            "Contains operator requires a string or array value".to_string(),
        )),
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if self.visit_expr(expr)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        Ok(!self.visit_expr(expr)?)
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        match (op, self.lookup(field)) {
            (FieldOp::Contains, Some(field_value)) => contains(field_value, value),
            // Reject a bad operand even when the field is absent.
            (FieldOp::Contains, None) => contains(&Bson::Null, value),
            (FieldOp::Eq, Some(field_value)) => Ok(equals(field_value, value)),
            // A missing field compares as null.
            (FieldOp::Eq, None) => Ok(matches!(value, Bson::Null)),
            (FieldOp::Ne, Some(field_value)) => Ok(!equals(field_value, value)),
            (FieldOp::Ne, None) => Ok(!matches!(value, Bson::Null)),
        }
    }
}
