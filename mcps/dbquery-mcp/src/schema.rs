//! The Markdown schema document
//!
//! Written by the extractor, read once by the server at startup:
//!
//! ```text
//! # Database Schema
//!
//! ## Album
//!
//! | Column | Type | Not Null | Default | Primary Key |
//! |--------|------|----------|---------|-------------|
//! | AlbumId | INTEGER | No | NULL | Yes |
//! | ArtistId | INTEGER | Yes | NULL | No |
//!
//! **Foreign Keys:**
//! - ArtistId -> Artist.ArtistId
//! ```

use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use crate::catalog::{ColumnDescriptor, ForeignKeyDescriptor, TableDescriptor};
use crate::error::SchemaError;

/// Rendered schema text, cheap to clone and immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDocument {
    text: Arc<str>,
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn column_row(column: &ColumnDescriptor) -> String {
    let default = match column.default_value.as_deref() {
        Some(value) if !value.is_empty() => value,
        _ => "NULL",
    };
    format!(
        "| {} | {} | {} | {} | {} |",
        column.name,
        column.data_type,
        yes_no(column.not_null),
        default,
        yes_no(column.primary_key)
    )
}

fn foreign_key_line(key: &ForeignKeyDescriptor) -> String {
    format!(
        "- {} -> {}.{}",
        key.from_column,
        key.table,
        key.to_column.as_deref().unwrap_or("NULL")
    )
}

impl SchemaDocument {
    /// Render table descriptors into the document format
    pub fn render(tables: &[TableDescriptor]) -> Self {
        let mut out = String::from("# Database Schema\n\n");

        for table in tables {
            out.push_str(&format!("## {}\n\n", table.name));
            out.push_str("| Column | Type | Not Null | Default | Primary Key |\n");
            out.push_str("|--------|------|----------|---------|-------------|\n");

            for column in &table.columns {
                out.push_str(&column_row(column));
                out.push('\n');
            }

            if !table.foreign_keys.is_empty() {
                out.push_str("\n**Foreign Keys:**\n");
                for key in &table.foreign_keys {
                    out.push_str(&foreign_key_line(key));
                    out.push('\n');
                }
            }

            out.push('\n');
        }

        Self::from(out)
    }

    /// Read a previously written document
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Schema document read from {}", path.display());
        Ok(Self::from(text))
    }

    /// Replace `path` with this document
    ///
    /// The text goes to a temporary file next to `path` first, so readers
    /// never see a half-written document.
    pub fn write_to(&self, path: &Path) -> Result<(), SchemaError> {
        let write_err = |source| SchemaError::Write {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(self.text.as_bytes()).map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<String> for SchemaDocument {
    fn from(text: String) -> Self {
        Self { text: text.into() }
    }
}

impl std::fmt::Display for SchemaDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
