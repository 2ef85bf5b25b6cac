//! DB Query MCP Server
//!
//! Serves the schema document and ad-hoc SQL queries over stdio.

use dbquery_mcp::DbQueryMcpServer;

mcp_common::serve_stdio!(DbQueryMcpServer, "dbquery_mcp");
