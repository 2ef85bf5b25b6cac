//! DB Query MCP Library
//!
//! Exposes a SQLite database to agents through two MCP tools:
//! `get_database_schema` returns a pre-extracted Markdown description of every
//! table, `execute_sql_query` runs a statement and renders the rows as a
//! Markdown table.
//!
//! The schema document is produced offline by the `extract-schema` binary
//! (see [`extract::extract_schema`]) and loaded once when the server starts.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use dbquery_mcp::DbQueryMcpServer;
//!
//! let server = DbQueryMcpServer::new()?;
//! // Serve via stdio, or call tools in-process through EmbeddableMcp
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod query;
pub mod schema;
pub mod server;

// Re-export main server type
pub use server::DbQueryMcpServer;

pub use config::DbQueryConfig;
pub use error::{QueryError, SchemaError};
pub use query::{QueryExecutor, QueryResult};
pub use schema::SchemaDocument;
pub use server::ExecuteSqlQueryParams;
