//! screenshot-mcp-server: MCP server for webpage screenshots
//!
//! Thin protocol layer that wraps the core capture pipeline with MCP tool
//! routing and response formatting.

pub mod config;
pub mod mcp;
pub mod mcp_content;
