//! Collection handles.

use std::fmt;

/// Handle to a named collection in the store.
///
/// Obtained from [`RepositoryContext::use_table`](crate::context::RepositoryContext::use_table).
/// It holds no data and performs no validation: the collection springs into
/// existence on first write. Names are case-sensitive and passed to the store verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Table {
    name: String,
}

impl Table {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
