//! In-process execution of MCP servers
//!
//! [`EmbeddableMcp`] lets a host call a server's tools directly, without a
//! transport. The host passes the tool name and a JSON object of arguments,
//! exactly as a remote client would.
//!
//! ```rust,ignore
//! use mcp_common::{first_text, EmbeddableMcp};
//! use dbquery_mcp::DbQueryMcpServer;
//!
//! let server = DbQueryMcpServer::new()?;
//! let result = server
//!     .call_tool("execute_sql_query", serde_json::json!({ "sql_query": "SELECT 1" }))
//!     .await?;
//! println!("{}", first_text(&result).unwrap_or_default());
//! ```

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

/// Error type for embedded tool calls
#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    /// Tool was not found in the server
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Arguments did not match the tool's parameter type
    #[error("invalid parameters: {0}")]
    InvalidParams(#[from] serde_json::Error),

    /// The tool itself returned a protocol error
    #[error("mcp error: {0}")]
    McpError(String),
}

impl From<rmcp::ErrorData> for EmbeddableError {
    fn from(err: rmcp::ErrorData) -> Self {
        EmbeddableError::McpError(err.message.to_string())
    }
}

/// Result type for embedded tool calls
pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// An MCP server whose tools can be invoked in-process
///
/// Implementations are `Send + Sync` so concurrent tasks can share one
/// server. Servers built on `#[tool_router]` list their tools from the
/// router and dispatch `call_tool` by name.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Short server name, as used in MCP client configuration
    fn server_name(&self) -> &str;

    /// All tools with their descriptions and input schemas
    fn list_tools(&self) -> Vec<Tool>;

    /// Execute a tool by name
    ///
    /// `params` is the JSON object of tool arguments. Fails with
    /// [`EmbeddableError::ToolNotFound`] for unknown names and
    /// [`EmbeddableError::InvalidParams`] when the arguments don't fit.
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    fn server_description(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_success;

    struct EchoServer;

    #[async_trait]
    impl EmbeddableMcp for EchoServer {
        fn server_name(&self) -> &str {
            "echo"
        }

        fn list_tools(&self) -> Vec<Tool> {
            vec![]
        }

        async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
            match name {
                "echo" => {
                    let text: String = serde_json::from_value(params)?;
                    Ok(text_success(text))
                }
                _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
            }
        }
    }

    #[test]
    fn test_defaults() {
        let server = EchoServer;
        assert_eq!(server.server_name(), "echo");
        assert!(server.list_tools().is_empty());
        assert!(server.server_description().is_none());
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let result = EchoServer.call_tool("unknown", serde_json::json!({})).await;
        assert!(matches!(result, Err(EmbeddableError::ToolNotFound(_))));
    }

    #[tokio::test]
    async fn test_call_with_bad_params() {
        let result = EchoServer.call_tool("echo", serde_json::json!({ "x": 1 })).await;
        assert!(matches!(result, Err(EmbeddableError::InvalidParams(_))));
    }

    #[test]
    fn test_from_error_data() {
        let err: EmbeddableError = rmcp::ErrorData::internal_error("boom", None).into();
        assert_eq!(err.to_string(), "mcp error: boom");
    }
}
