//! Markdown rendering of query results

use rusqlite::types::Value;

use crate::query::QueryResult;

/// Returned instead of a table when there are no columns or no rows
pub const NO_DATA: &str = "No data to display.";

/// Text for one cell. Missing cells and SQL NULL both render as `NULL`.
pub fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "NULL".to_string(),
        Some(Value::Integer(i)) => i.to_string(),
        // Debug keeps the fractional part: 1.0 rather than 1
        Some(Value::Real(f)) => format!("{:?}", f),
        Some(Value::Text(s)) => s.clone(),
        Some(Value::Blob(b)) => format!("<blob {} bytes>", b.len()),
    }
}

fn table_line(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

/// Render a result as a Markdown table with a row-count footer
pub fn markdown_table(result: &QueryResult) -> String {
    if result.columns.is_empty() || result.rows.is_empty() {
        return NO_DATA.to_string();
    }

    let mut lines = Vec::with_capacity(result.rows.len() + 2);
    lines.push(table_line(&result.columns));
    lines.push(table_line(&vec!["---".to_string(); result.columns.len()]));

    for row in &result.rows {
        let cells: Vec<String> = result
            .columns
            .iter()
            .map(|col| render_cell(row.get(col)))
            .collect();
        lines.push(table_line(&cells));
    }

    format!(
        "{}\n\n*{} row(s) returned*",
        lines.join("\n"),
        result.row_count()
    )
}
