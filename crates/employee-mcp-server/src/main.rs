//! employee-mcp: employee directory MCP server over stdio

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use employee_mcp_server::{config::ServerConfig, mcp::EmployeeMcpServer};
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

fn init_tracing(json: bool) {
    // stdout carries the MCP protocol; logs go to stderr
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("employee_mcp=info,employee_mcp_server=info,tools_core=info"));
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

    info!(version = env!("CARGO_PKG_VERSION"), "employee-mcp starting");

    let store = config
        .open_store()
        .with_context(|| format!("failed to open employee database '{}'", config.database))?;
    let rows = store.count().context("failed to count employees")?;
    info!(database = %config.database, employees = rows, "employee database ready");

    let server = EmployeeMcpServer::new(Arc::new(store));

    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP stdio transport")?;
    info!("waiting for MCP requests");

    service.waiting().await.context("MCP service terminated abnormally")?;

    info!("employee-mcp shutting down");
    Ok(())
}
