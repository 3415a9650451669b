//! Shared test utilities for integration tests

// Not every test binary uses every helper
#[allow(dead_code)]
pub mod mcp_harness;
