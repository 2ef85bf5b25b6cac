//! Reading table structure from the SQLite catalog

use rusqlite::Connection;

/// One table with its columns and outgoing foreign keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
}

/// Column as reported by `PRAGMA table_info`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Declared type, verbatim. Empty when the column was declared untyped.
    pub data_type: String,
    pub not_null: bool,
    /// Default expression as written in the table definition
    pub default_value: Option<String>,
    pub primary_key: bool,
}

/// Reference from a column of this table to a column of another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDescriptor {
    pub from_column: String,
    pub table: String,
    /// `None` when the key targets the referenced table's primary key implicitly
    pub to_column: Option<String>,
}

/// Quote a name for use as an SQL identifier
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// All table names, in catalog order
pub fn list_tables(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table'")?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(names)
}

/// Columns of `table`, in declaration order
pub fn read_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<ColumnDescriptor>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_identifier(table)))?;
    let columns = stmt
        .query_map([], |row| {
            Ok(ColumnDescriptor {
                name: row.get(1)?,
                data_type: row.get(2)?,
                not_null: row.get::<_, i64>(3)? != 0,
                default_value: row.get(4)?,
                // pk is the 1-based position in the key, 0 for non-key columns
                primary_key: row.get::<_, i64>(5)? != 0,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Foreign keys declared on `table`
pub fn read_foreign_keys(
    conn: &Connection,
    table: &str,
) -> rusqlite::Result<Vec<ForeignKeyDescriptor>> {
    let mut stmt = conn.prepare(&format!(
        "PRAGMA foreign_key_list({})",
        quote_identifier(table)
    ))?;
    let keys = stmt
        .query_map([], |row| {
            Ok(ForeignKeyDescriptor {
                table: row.get(2)?,
                from_column: row.get(3)?,
                to_column: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(keys)
}

/// Describe every table in the database
pub fn read_catalog(conn: &Connection) -> rusqlite::Result<Vec<TableDescriptor>> {
    list_tables(conn)?
        .into_iter()
        .map(|name| {
            Ok(TableDescriptor {
                columns: read_columns(conn, &name)?,
                foreign_keys: read_foreign_keys(conn, &name)?,
                name,
            })
        })
        .collect()
}
