//! mcp-tools-core: shared library behind the screenshot and employee MCP
//! servers
//!
//! This library holds everything the two servers do besides protocol
//! plumbing: headless browser capture, image processing, temporary file
//! tracking, and the SQLite-backed employee directory.

pub mod browser;
pub mod employees;
pub mod error;
#[cfg(feature = "mcp")]
pub mod mcp;
pub mod model;
pub mod util;
