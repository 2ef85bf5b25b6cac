//! Schema extractor
//!
//! Writes the Markdown schema document served by `dbquery-mcp`.
//!
//! Usage:
//!   extract-schema                          # configured database -> configured document
//!   extract-schema -d music.db -o MUSIC.md  # explicit paths

use anyhow::{Context, Result};
use clap::Parser;
use dbquery_mcp::{extract::extract_schema, DbQueryConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "extract-schema")]
#[command(about = "Describe every table of a SQLite database as Markdown")]
struct Cli {
    /// SQLite database to read (defaults to the configured database)
    #[arg(short, long, env = "DBQUERY_DATABASE")]
    database: Option<PathBuf>,

    /// Schema document to write (defaults to the configured path)
    #[arg(short, long, env = "DBQUERY_SCHEMA")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    mcp_common::init_tracing("dbquery_mcp")?;

    let cli = Cli::parse();
    let config = DbQueryConfig::load()?;

    let database = cli.database.unwrap_or(config.database.path);
    let output = cli.output.unwrap_or(config.schema.path);

    extract_schema(&database, &output)
        .with_context(|| format!("Schema extraction from {:?} failed", database))?;

    Ok(())
}
