//! Query translation from docrepo filter expressions to MongoDB query syntax.
//!
//! This module translates docrepo's abstract filter expressions into
//! MongoDB BSON documents for execution by the MongoDB query engine.

use bson::{Document, Bson, doc};

use docrepo_core::{
    query::{QueryVisitor, Expr, FieldOp},
    error::{DocumentStoreError, DocumentStoreResult},
};


/// Renders a filter expression as the MongoDB query document the backend sends.
///
/// Useful for logging or for running a docrepo filter through the driver directly.
///
/// ```ignore
/// use docrepo::{query::Filter, mongodb::render_filter};
/// use bson::doc;
///
/// assert_eq!(
///     render_filter(&Filter::eq("age", 28))?,
///     doc! { "age": { "$eq": 28 } },
/// );
/// ```
///
/// # Errors
///
/// [`DocumentStoreError::ContractViolation`] when a `Contains` operand is neither a
/// string nor an array.
pub fn render_filter(expr: &Expr) -> DocumentStoreResult<Document> {
    MongoQueryTranslator.visit_expr(expr)
}

/// Translates docrepo filter expressions into MongoDB query documents.
///
/// `Contains` with a string becomes an escaped, case-sensitive `$regex`, so the
/// operand is always matched literally.
pub(crate) struct MongoQueryTranslator;

impl MongoQueryTranslator {
    fn visit_all(&mut self, exprs: &[Expr]) -> DocumentStoreResult<Vec<Document>> {
        exprs
            .iter()
            .map(|expr| self.visit_expr(expr))
            .collect()
    }
}

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$and": self.visit_all(exprs)?,
        })
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$or": self.visit_all(exprs)?,
        })
    }

    // `$not` only applies to operator expressions, `$nor` negates a whole clause.
    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$nor": [self.visit_expr(expr)?],
        })
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: match op {
                FieldOp::Eq => doc! { "$eq": value.clone() },
                FieldOp::Ne => doc! { "$ne": value.clone() },
                FieldOp::Contains => match value {
                    Bson::String(s) => doc! { "$regex": regex::escape(s) },
                    Bson::Array(arr) => doc! { "$all": arr.clone() },
                    _ => return Err(DocumentStoreError::ContractViolation(
                        "Contains operator requires a string or array value".to_string(),
                    )),
                },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use docrepo_core::query::Filter;

    #[test]
    fn renders_equality_and_inequality() {
        let id = ObjectId::new();

        assert_eq!(render_filter(&Filter::eq("age", 28)).unwrap(), doc! { "age": { "$eq": 28 } });
        assert_eq!(render_filter(&Filter::ne("class", "3B")).unwrap(), doc! { "class": { "$ne": "3B" } });
        assert_eq!(render_filter(&Filter::id(id)).unwrap(), doc! { "_id": { "$eq": id } });
    }

    #[test]
    fn contains_string_is_a_literal_case_sensitive_regex() {
        assert_eq!(
            render_filter(&Filter::contains("firstname", "Laura")).unwrap(),
            doc! { "firstname": { "$regex": "Laura" } },
        );
        assert_eq!(
            render_filter(&Filter::contains("email", "a.b+c")).unwrap(),
            doc! { "email": { "$regex": r"a\.b\+c" } },
        );
    }

    #[test]
    fn contains_array_requires_every_value() {
        assert_eq!(
            render_filter(&Filter::contains("subjects", vec!["Physics", "Chemistry"])).unwrap(),
            doc! { "subjects": { "$all": ["Physics", "Chemistry"] } },
        );
    }

    #[test]
    fn contains_rejects_other_operands() {
        assert!(matches!(
            render_filter(&Filter::contains("age", 28)),
            Err(DocumentStoreError::ContractViolation(_))
        ));
    }

    #[test]
    fn logical_combinators() {
        let rendered = render_filter(
            &Filter::eq("age", 28)
                .and(Filter::or([Filter::eq("class", "3A"), Filter::eq("class", "3B")]))
                .and(Filter::eq("lastname", "Pitt").not()),
        )
        .unwrap();

        assert_eq!(
            rendered,
            doc! {
                "$and": [
                    { "age": { "$eq": 28 } },
                    { "$or": [
                        { "class": { "$eq": "3A" } },
                        { "class": { "$eq": "3B" } },
                    ] },
                    { "$nor": [{ "lastname": { "$eq": "Pitt" } }] },
                ]
            },
        );
    }
}
