//! Connection configuration for backends that talk to a remote store.
//!
//! A context is built from exactly one of two forms: a connection string plus a
//! database name, or discrete host, port, database and credentials. Nothing here
//! reads the environment; callers load the values however they like (the type is
//! `serde`-deserialisable) and hand them over explicitly.
//!
//! # Example
//!
//! ```ignore
//! use docrepo::config::ConnectionConfig;
//!
//! let by_uri = ConnectionConfig::connection_string("mongodb://localhost:27017", "school");
//! let by_parts = ConnectionConfig::credentials("db.internal", 27017, "school", "app", "s3cret");
//! by_parts.validate()?;
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DocumentStoreError, DocumentStoreResult};

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConnectionConfig {
    /// A store-native connection URI and the database to use.
    ConnectionString { uri: String, database: String },
    /// Discrete server address and credentials. The credentials authenticate
    /// against `database`.
    Credentials {
        host: String,
        port: u16,
        database: String,
        username: String,
        password: String,
    },
}

impl ConnectionConfig {
    pub fn connection_string(uri: impl Into<String>, database: impl Into<String>) -> Self {
        ConnectionConfig::ConnectionString {
            uri: uri.into(),
            database: database.into(),
        }
    }

    pub fn credentials(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        ConnectionConfig::Credentials {
            host: host.into(),
            port,
            database: database.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn database(&self) -> &str {
        match self {
            ConnectionConfig::ConnectionString { database, .. } => database,
            ConnectionConfig::Credentials { database, .. } => database,
        }
    }

    /// Checks that every required value is present.
    ///
    /// This does not contact the store; unreachable servers and bad passwords are
    /// only discovered by the first operation.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Configuration`] naming the first missing value.
    pub fn validate(&self) -> DocumentStoreResult<()> {
        let missing = |what: &str| DocumentStoreError::Configuration(format!("{what} must not be empty"));

        if self.database().trim().is_empty() {
            return Err(missing("database"));
        }

        match self {
            ConnectionConfig::ConnectionString { uri, .. } => {
                if uri.trim().is_empty() {
                    return Err(missing("connection string"));
                }
            }
            ConnectionConfig::Credentials { host, port, username, .. } => {
                if host.trim().is_empty() {
                    return Err(missing("host"));
                }
                if *port == 0 {
                    return Err(DocumentStoreError::Configuration("port must be non-zero".to_string()));
                }
                if username.is_empty() {
                    return Err(missing("username"));
                }
            }
        }

        Ok(())
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // URIs routinely embed credentials.
            ConnectionConfig::ConnectionString { database, .. } => f
                .debug_struct("ConnectionString")
                .field("uri", &"<redacted>")
                .field("database", database)
                .finish(),
            ConnectionConfig::Credentials { host, port, database, username, .. } => f
                .debug_struct("Credentials")
                .field("host", host)
                .field("port", port)
                .field("database", database)
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}
