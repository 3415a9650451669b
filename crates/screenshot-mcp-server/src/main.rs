//! webshot-mcp: webpage screenshot MCP server over stdio

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};
use screenshot_mcp_server::{config::ServerConfig, mcp::ScreenshotMcpServer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

fn init_tracing(json: bool) {
    // stdout carries the MCP protocol; logs go to stderr
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("webshot_mcp=info,screenshot_mcp_server=info,tools_core=info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();
    init_tracing(config.log_json);

    info!(version = env!("CARGO_PKG_VERSION"), "webshot-mcp starting");

    let backend = config.backend();
    let status = backend.status();
    if status.available {
        info!(backend = %status.backend, executable = ?status.executable, "capture backend ready");
    } else {
        tracing::warn!(
            backend = %status.backend,
            "no browser available; take_screenshot will fail until one is installed or CHROME_PATH is set"
        );
    }

    let temp_files = Arc::new(config.temp_files());
    info!(dir = %temp_files.dir().display(), keep_files = config.keep_files, "screenshot directory");

    let server = ScreenshotMcpServer::new(backend, temp_files, config.defaults());

    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP stdio transport")?;
    info!("waiting for MCP requests");

    service.waiting().await.context("MCP service terminated abnormally")?;

    info!("webshot-mcp shutting down");
    Ok(())
}
