//! Query execution against the live database
//!
//! Every call opens its own connection and closes it before returning.
//! Nothing is pooled or shared between calls.

use rusqlite::{types::Value, Batch, Connection, OpenFlags};
use std::ops::Index;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::QueryError;

/// One result row
///
/// Cells keep result-set order. Lookup by name ignores ASCII case and
/// returns the first matching column, so repeated names all read the
/// leftmost value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.cells.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(column, _)| column.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }
}

impl Index<&str> for Row {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        self.get(name)
            .unwrap_or_else(|| panic!("no column named {:?}", name))
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

/// Columns and rows of a finished query
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    /// Column names in result-set order. Empty for statements without output.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Runs caller-supplied SQL on a fresh connection per call
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    db_path: PathBuf,
    allow_non_select: bool,
    busy_timeout: Duration,
}

/// Skip whitespace, opening parentheses and comments ahead of the first keyword
fn skip_leading_trivia(sql: &str) -> &str {
    let mut rest = sql;
    loop {
        let trimmed = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '(');
        if let Some(comment) = trimmed.strip_prefix("--") {
            rest = comment.split_once('\n').map_or("", |(_, after)| after);
        } else if let Some(comment) = trimmed.strip_prefix("/*") {
            rest = comment.split_once("*/").map_or("", |(_, after)| after);
        } else {
            return trimmed;
        }
    }
}

impl QueryExecutor {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            db_path: config.path.clone(),
            allow_non_select: config.allow_non_select,
            busy_timeout: Duration::from_secs(config.busy_timeout_secs),
        }
    }

    pub fn allow_non_select(&self) -> bool {
        self.allow_non_select
    }

    /// Whether `sql` is a retrieval statement (SELECT, or a WITH ... SELECT)
    pub fn is_select_query(sql: &str) -> bool {
        let keyword: String = skip_leading_trivia(sql)
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        keyword.eq_ignore_ascii_case("SELECT") || keyword.eq_ignore_ascii_case("WITH")
    }

    fn open(&self) -> Result<Connection, QueryError> {
        // Plain paths without create: a missing database file is an error,
        // not a new file
        let access = if self.allow_non_select {
            OpenFlags::SQLITE_OPEN_READ_WRITE
        } else {
            OpenFlags::SQLITE_OPEN_READ_ONLY
        };
        let conn =
            Connection::open_with_flags(&self.db_path, access | OpenFlags::SQLITE_OPEN_NO_MUTEX)
                .map_err(QueryError::Open)?;
        conn.busy_timeout(self.busy_timeout)
            .map_err(QueryError::Open)?;
        Ok(conn)
    }

    /// Execute one statement and collect its full result
    ///
    /// The statement is passed to SQLite unmodified. Input holding only
    /// whitespace or comments yields an empty result; anything after the
    /// first statement other than whitespace or comments is refused before
    /// the first statement runs. This blocks until the engine finishes; use
    /// [`QueryExecutor::execute_async`] from async code.
    pub fn execute(&self, sql: &str) -> Result<QueryResult, QueryError> {
        if !self.allow_non_select && !Self::is_select_query(sql) {
            return Err(QueryError::Rejected);
        }

        let conn = self.open()?;

        let mut batch = Batch::new(&conn, sql);
        let Some(mut stmt) = batch.next()? else {
            return Ok(QueryResult::default());
        };
        if !matches!(batch.next(), Ok(None)) {
            return Err(QueryError::MultipleStatements);
        }

        let columns: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
            let mut record = Row::with_capacity(columns.len());
            for (i, name) in columns.iter().enumerate() {
                record.push(name.as_str(), row.get::<_, Value>(i)?);
            }
            rows.push(record);
        }

        Ok(QueryResult { columns, rows })
    }

    /// [`QueryExecutor::execute`] on the blocking thread pool
    pub async fn execute_async(&self, sql: String) -> Result<QueryResult, QueryError> {
        let executor = self.clone();
        tokio::task::spawn_blocking(move || executor.execute(&sql)).await?
    }
}
