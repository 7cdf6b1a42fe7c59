//! Outcome values returned by mutating repository operations.
//!
//! Every write reports through a [`Response`] (single record) or a
//! [`BatchResponse`] (many records) instead of an `Err`. The message is empty on
//! success and carries the underlying error text on failure.

use serde::{Deserialize, Serialize};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Immutable `(succeeded, message)` pair describing one write.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Response {
    succeeded: bool,
    message: String,
}

impl Response {
    /// A successful outcome with an empty message.
    pub fn success() -> Self {
        Self {
            succeeded: true,
            message: String::new(),
        }
    }

    /// A failed outcome carrying a human-readable description.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            message: message.into(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// Empty on success.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Converts back into a `Result`. Failures surface as
    /// [`DocumentStoreError::StoreOperation`] since the original variant is not retained.
    pub fn into_result(self) -> DocumentStoreResult<()> {
        if self.succeeded {
            Ok(())
        } else {
            Err(DocumentStoreError::StoreOperation(self.message))
        }
    }
}

impl<T> From<DocumentStoreResult<T>> for Response {
    fn from(result: DocumentStoreResult<T>) -> Self {
        match result {
            Ok(_) => Response::success(),
            Err(err) => Response::failure(err.to_string()),
        }
    }
}

/// Outcome of a batch write.
///
/// Holds one [`Response`] per item that was attempted, in submission order, plus
/// the number of items submitted. A sequential batch stops at its first failure,
/// so `attempted() < total()` tells the caller which items were never applied.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BatchResponse {
    results: Vec<Response>,
    total: usize,
}

impl BatchResponse {
    pub fn new(results: Vec<Response>, total: usize) -> Self {
        Self { results, total }
    }

    /// A batch where every one of `total` items shares the same outcome.
    pub fn uniform(response: Response, total: usize) -> Self {
        Self {
            results: vec![response; total],
            total,
        }
    }

    /// `true` only if every submitted item was attempted and succeeded.
    pub fn succeeded(&self) -> bool {
        self.results.len() == self.total && self.results.iter().all(Response::succeeded)
    }

    /// The first failure's message, or an empty string.
    pub fn message(&self) -> &str {
        self.results
            .iter()
            .find(|r| !r.succeeded())
            .map(Response::message)
            .unwrap_or("")
    }

    pub fn results(&self) -> &[Response] {
        &self.results
    }

    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Collapses the batch into a single [`Response`].
    pub fn to_response(&self) -> Response {
        if self.succeeded() {
            Response::success()
        } else {
            Response::failure(self.message())
        }
    }
}
