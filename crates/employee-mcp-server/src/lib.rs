//! employee-mcp-server: MCP server for an employee directory
//!
//! Each tool maps onto one query against the SQLite store in `tools_core`;
//! this crate only handles routing, argument schemas and JSON formatting.

pub mod config;
pub mod mcp;
