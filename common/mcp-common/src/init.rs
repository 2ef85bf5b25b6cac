//! Server initialization
//!
//! Tracing setup shared by every binary in the workspace, and the
//! `serve_stdio!` macro that turns a server type into a stdio `main`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing for a binary
///
/// Logs go to stderr because stdout carries the MCP protocol. The crate named
/// by `crate_name` logs at `info` unless `RUST_LOG` says otherwise.
///
/// Set `LOG_FORMAT=json` for JSON lines instead of plain text.
pub fn init_tracing(crate_name: &str) -> anyhow::Result<()> {
    let directive = format!("{}=info", crate_name);
    let filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    let registry = tracing_subscriber::registry().with(filter);

    if json_requested(std::env::var("LOG_FORMAT").ok().as_deref()) {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    }

    Ok(())
}

fn json_requested(log_format: Option<&str>) -> bool {
    log_format
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Generate a `#[tokio::main]` entry point serving `$server_type` on stdio
///
/// The server is built with a fallible `new() -> anyhow::Result<Self>`.
/// Construction errors abort startup before any request is accepted.
///
/// ```rust,ignore
/// mod server;
/// use server::MyMcpServer;
///
/// mcp_common::serve_stdio!(MyMcpServer, "my_mcp");
/// ```
#[macro_export]
macro_rules! serve_stdio {
    ($server_type:ty, $crate_name:expr) => {
        #[tokio::main]
        async fn main() -> anyhow::Result<()> {
            use rmcp::ServiceExt;

            $crate::init_tracing($crate_name)?;

            tracing::info!(concat!("Starting ", $crate_name, " MCP Server"));

            let server = <$server_type>::new()?;
            let service = server.serve(rmcp::transport::stdio()).await?;

            tracing::info!("Server running, waiting for requests...");

            service.waiting().await?;

            tracing::info!("Server shutting down");
            Ok(())
        }
    };
}
