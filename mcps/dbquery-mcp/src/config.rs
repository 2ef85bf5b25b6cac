//! Configuration for the DB Query MCP server and schema extractor

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "DBQUERY_CONFIG_PATH";

/// DB Query MCP configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DbQueryConfig {
    /// Database connection settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Schema document location
    #[serde(default)]
    pub schema: SchemaConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    /// Default: chinook.db
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    /// Whether statements other than SELECT/WITH may run.
    /// When false the connection is also opened read-only.
    /// Default: false
    #[serde(default)]
    pub allow_non_select: bool,

    /// How long to wait on a locked database, in seconds
    /// Default: 30
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_secs: u64,
}

/// Schema document configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaConfig {
    /// Path the extractor writes and the server reads
    /// Default: SCHEMA.md
    #[serde(default = "default_schema_path")]
    pub path: PathBuf,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("chinook.db")
}

fn default_schema_path() -> PathBuf {
    PathBuf::from("SCHEMA.md")
}

fn default_busy_timeout() -> u64 {
    30
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            allow_non_select: false,
            busy_timeout_secs: default_busy_timeout(),
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            path: default_schema_path(),
        }
    }
}

impl DbQueryConfig {
    /// Load configuration
    ///
    /// Looks for config in:
    /// 1. `DBQUERY_CONFIG_PATH` environment variable
    /// 2. `~/.binks/dbquery.toml`
    /// 3. `./dbquery-mcp.toml`
    ///
    /// Falls back to defaults when no file exists. A file that exists but
    /// does not parse is an error.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }

        let mut candidates = Vec::new();
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".binks").join("dbquery.toml"));
        }
        candidates.push(PathBuf::from("dbquery-mcp.toml"));

        match candidates.into_iter().find(|p| p.exists()) {
            Some(path) => Self::from_file(&path),
            None => {
                tracing::info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path))?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Config pointing at a specific database and schema document
    pub fn with_paths(database: impl Into<PathBuf>, schema: impl Into<PathBuf>) -> Self {
        Self {
            database: DatabaseConfig {
                path: database.into(),
                ..DatabaseConfig::default()
            },
            schema: SchemaConfig {
                path: schema.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DbQueryConfig::default();
        assert_eq!(config.database.path, PathBuf::from("chinook.db"));
        assert_eq!(config.schema.path, PathBuf::from("SCHEMA.md"));
        assert!(!config.database.allow_non_select);
        assert_eq!(config.database.busy_timeout_secs, 30);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: DbQueryConfig = toml::from_str(
            r#"
            [database]
            allow_non_select = true
            "#,
        )
        .unwrap();

        assert!(config.database.allow_non_select);
        assert_eq!(config.database.path, PathBuf::from("chinook.db"));
        assert_eq!(config.schema.path, PathBuf::from("SCHEMA.md"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dbquery.toml");
        std::fs::write(
            &path,
            r#"
            [database]
            path = "/data/music.db"
            busy_timeout_secs = 5

            [schema]
            path = "/data/MUSIC.md"
            "#,
        )
        .unwrap();

        let config = DbQueryConfig::from_file(&path).unwrap();
        assert_eq!(config.database.path, PathBuf::from("/data/music.db"));
        assert_eq!(config.database.busy_timeout_secs, 5);
        assert_eq!(config.schema.path, PathBuf::from("/data/MUSIC.md"));
    }

    #[test]
    fn test_from_file_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[database\npath = 3").unwrap();

        assert!(DbQueryConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DbQueryConfig::from_file(&dir.path().join("nope.toml")).is_err());
    }
}
