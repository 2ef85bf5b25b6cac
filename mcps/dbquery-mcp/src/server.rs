//! DB Query MCP Server implementation

use anyhow::Context;
use mcp_common::{
    async_trait, text_success, EmbeddableError, EmbeddableMcp, EmbeddableResult, McpError,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::config::DbQueryConfig;
use crate::error::QueryError;
use crate::format;
use crate::query::QueryExecutor;
use crate::schema::SchemaDocument;

// ============================================================================
// Parameter Types
// ============================================================================

/// Parameters for execute_sql_query tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExecuteSqlQueryParams {
    /// A single SQLite statement, sent to the database as written
    pub sql_query: String,
}

// ============================================================================
// Server Implementation
// ============================================================================

/// DB Query MCP Server
///
/// Holds the schema document loaded at startup and a [`QueryExecutor`] that
/// opens a fresh connection for every query.
#[derive(Clone)]
pub struct DbQueryMcpServer {
    schema: SchemaDocument,
    executor: QueryExecutor,
    tool_router: ToolRouter<Self>,
}

impl DbQueryMcpServer {
    /// Create the server from the standard config locations
    ///
    /// Fails when the config file is invalid or the schema document cannot
    /// be read. Nothing is served in that case.
    pub fn new() -> anyhow::Result<Self> {
        let config = DbQueryConfig::load()?;
        Self::from_config(&config)
    }

    /// Create the server from an explicit config
    pub fn from_config(config: &DbQueryConfig) -> anyhow::Result<Self> {
        let schema = SchemaDocument::load(&config.schema.path).with_context(|| {
            format!(
                "Schema document {:?} is required; run extract-schema first",
                config.schema.path
            )
        })?;

        tracing::info!(
            database = %config.database.path.display(),
            allow_non_select = config.database.allow_non_select,
            "Database configured"
        );

        Ok(Self::with_parts(schema, QueryExecutor::new(&config.database)))
    }

    /// Assemble the server from an already loaded schema and an executor
    pub fn with_parts(schema: SchemaDocument, executor: QueryExecutor) -> Self {
        Self {
            schema,
            executor,
            tool_router: Self::tool_router(),
        }
    }

    /// Run a query and render it, keeping failures typed
    pub async fn run_query(&self, sql: &str) -> Result<String, QueryError> {
        tracing::info!("Executing SQL Query: {}", sql);

        let result = self.executor.execute_async(sql.to_string()).await?;
        let table = format::markdown_table(&result);

        tracing::info!("Query returned {} rows", result.row_count());
        tracing::info!("{}", table);

        Ok(table)
    }
}

#[tool_router]
impl DbQueryMcpServer {
    /// Return the schema document loaded at startup
    #[tool(description = "Get complete database schema for the SQLite database.\n\n\
        Database System: SQLite 3.x\n\
        SQL Dialect: SQLite SQL (standard SQL with SQLite extensions)\n\n\
        Returns schema with tables, columns, types, constraints, and relationships. \
        Use this before generating SQL queries to ensure accuracy. Once you generate \
        SQL statements, execute them using the execute_sql_query tool.")]
    async fn get_database_schema(&self) -> Result<CallToolResult, McpError> {
        tracing::info!("Returning complete database schema");
        Ok(text_success(self.schema.as_str()))
    }

    /// Execute a statement and return a Markdown table or an `Error: ...` text
    #[tool(description = "Execute a SQL query against the SQLite database and return the \
        results as a markdown table. Unless the server enables non-SELECT statements, \
        only SELECT (and WITH ... SELECT) queries are allowed. Failures are returned \
        as text starting with 'Error:'.")]
    async fn execute_sql_query(
        &self,
        Parameters(params): Parameters<ExecuteSqlQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        let text = match self.run_query(&params.sql_query).await {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!("Query failed: {}", e);
                format!("Error: {}", e)
            }
        };
        Ok(text_success(text))
    }
}

#[tool_handler]
impl rmcp::ServerHandler for DbQueryMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mode = if self.executor.allow_non_select() {
            "read-write"
        } else {
            "read-only"
        };
        ServerInfo {
            instructions: Some(format!(
                "SQLite database query MCP server ({} mode). \
                Call get_database_schema to learn the tables, then execute_sql_query \
                to run statements.",
                mode
            )),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for DbQueryMcpServer {
    fn server_name(&self) -> &str {
        "dbquery"
    }

    fn server_description(&self) -> Option<&str> {
        Some("SQLite schema and query MCP server - returns the extracted schema document and runs SQL queries rendered as markdown tables.")
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            "get_database_schema" => self.get_database_schema().await.map_err(Into::into),

            "execute_sql_query" => {
                let params: ExecuteSqlQueryParams = serde_json::from_value(params)?;
                self.execute_sql_query(Parameters(params))
                    .await
                    .map_err(Into::into)
            }

            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }
}
