//! Command-line and environment configuration for `employee-mcp`

use clap::Parser;
use tools_core::{
    employees::{EmployeeStore, store::IN_MEMORY},
    error::EmployeeResult,
};

/// MCP server exposing CRUD and reporting tools over an employee table
#[derive(Debug, Clone, Parser)]
#[command(name = "employee-mcp", version, about)]
pub struct ServerConfig {
    /// SQLite database file, or :memory: for a throwaway table
    #[arg(long, env = "EMPLOYEE_DB", default_value = IN_MEMORY)]
    pub database: String,

    /// Start with an empty table instead of the sample directory
    #[arg(long, env = "EMPLOYEE_NO_SEED")]
    pub no_seed: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, env = "EMPLOYEE_LOG_JSON")]
    pub log_json: bool,
}

impl ServerConfig {
    /// Opens the configured database, seeding it unless `--no-seed`
    ///
    /// Seeding only touches an empty table, so an existing file keeps its
    /// rows.
    pub fn open_store(&self) -> EmployeeResult<EmployeeStore> {
        let store = EmployeeStore::open(&self.database)?;

        if !self.no_seed {
            store.seed_sample_data()?;
        }
        Ok(store)
    }
}
