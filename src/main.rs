//! MCP server entry point.
//!
//! Initializes logging, loads configuration, and serves the MCP protocol
//! over stdio. Logs go to stderr so they never corrupt the protocol stream.

use anyhow::Result;
use rmcp::{ServiceExt, transport::stdio};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use rebillia_mcp_server::core::{Config, RebilliaServer};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let server = RebilliaServer::new(config);

    let service = server.serve(stdio()).await?;
    info!("Server connected over stdio");

    service.waiting().await?;

    info!("Server shutting down");

    Ok(())
}

/// Configure tracing with the requested level, writing to stderr.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
