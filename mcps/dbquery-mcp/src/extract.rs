//! Offline schema extraction
//!
//! Reads the catalog of an existing database and writes the schema document
//! the server serves from `get_database_schema`.

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

use crate::catalog;
use crate::error::SchemaError;
use crate::schema::SchemaDocument;

/// What an extraction run produced
#[derive(Debug, Clone)]
pub struct ExtractSummary {
    pub tables: usize,
    pub output: PathBuf,
}

/// Describe every table of `database` and write the document to `output`
///
/// The database is opened read-only and is never created: a missing file is
/// an error rather than an empty schema.
pub fn extract_schema(database: &Path, output: &Path) -> Result<ExtractSummary, SchemaError> {
    let conn = Connection::open_with_flags(
        database,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|source| SchemaError::Open {
        path: database.to_path_buf(),
        source,
    })?;

    let tables = catalog::read_catalog(&conn)?;
    drop(conn);

    tracing::debug!(tables = tables.len(), "Catalog read from {}", database.display());

    let document = SchemaDocument::render(&tables);
    document.write_to(output)?;

    tracing::info!(
        tables = tables.len(),
        "Schema document written to {}",
        output.display()
    );

    Ok(ExtractSummary {
        tables: tables.len(),
        output: output.to_path_buf(),
    })
}
