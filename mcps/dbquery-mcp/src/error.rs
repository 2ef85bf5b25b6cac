//! Error types for schema extraction and query execution

use std::path::PathBuf;
use thiserror::Error;

/// Failures while extracting, writing or loading the schema document
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to open database {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Catalog query failed: {0}")]
    Catalog(#[from] rusqlite::Error),

    #[error("Failed to write schema document {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read schema document {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of a single `execute_sql_query` call
///
/// `Display` yields the bare message; the tool adapter adds the `Error: `
/// prefix.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Only SELECT queries are allowed for security reasons.")]
    Rejected,

    #[error("You can only execute one statement at a time.")]
    MultipleStatements,

    #[error("{0}")]
    Open(#[source] rusqlite::Error),

    #[error("{0}")]
    Execute(#[from] rusqlite::Error),

    #[error("query task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
