//! Text results for MCP tools
//!
//! Every tool in this workspace answers with a single text item, so these
//! helpers cover building one and reading it back.

use rmcp::model::{CallToolResult, Content, RawContent};

/// Create a successful plain text response
pub fn text_success(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Return the first text item of a tool result, if any
///
/// Useful for in-process callers and tests that want the rendered text
/// rather than the protocol envelope.
pub fn first_text(result: &CallToolResult) -> Option<&str> {
    result.content.iter().find_map(|c| match &c.raw {
        RawContent::Text(t) => Some(t.text.as_str()),
        _ => None,
    })
}
