//! MCP Server Test Harness
//!
//! Fixtures that run the employee tools against a fresh SQLite database per
//! test, either in memory or in a scratch file.

use std::{path::PathBuf, sync::Arc};

use employee_mcp_server::mcp::{
    EmployeeIdParams, EmployeeMcpServer, ListEmployeesParams, SearchEmployeesParams,
    TopEarnersParams, UpdateEmployeeParams,
};
use rmcp::{ErrorData, handler::server::wrapper::Parameters, model::CallToolResult};
use tempfile::TempDir;
use tools_core::employees::{EmployeeStore, EmployeeUpdate, NewEmployee};

/// Test fixture wrapping an `EmployeeMcpServer`
pub struct McpTestContext {
    pub server: EmployeeMcpServer,
    pub store:  Arc<EmployeeStore>,
    _dir:       Option<TempDir>,
}

impl McpTestContext {
    /// In-memory database loaded with the sample directory
    pub fn new_seeded() -> Self {
        let store = EmployeeStore::in_memory().expect("open in-memory db");
        store.seed_sample_data().expect("seed sample data");
        Self::from_store(store, None)
    }

    /// Empty in-memory database
    pub fn new_empty() -> Self {
        Self::from_store(EmployeeStore::in_memory().expect("open in-memory db"), None)
    }

    /// Empty database in a scratch file; the path is returned for reopening
    pub fn new_with_file() -> (Self, PathBuf) {
        let dir = tempfile::tempdir().expect("create scratch dir");
        let path = dir.path().join("employees.db");
        let store = EmployeeStore::open(&path).expect("open file db");
        (Self::from_store(store, Some(dir)), path)
    }

    fn from_store(store: EmployeeStore, dir: Option<TempDir>) -> Self {
        let store = Arc::new(store);
        Self {
            server: EmployeeMcpServer::new(Arc::clone(&store)),
            store,
            _dir: dir,
        }
    }

    // --- Tool invocation helpers ---

    pub async fn add(&self, employee: NewEmployee) -> Result<CallToolResult, ErrorData> {
        self.server.add_employee(Parameters(employee)).await
    }

    pub async fn get(&self, id: i64) -> Result<CallToolResult, ErrorData> {
        self.server.get_employee(Parameters(EmployeeIdParams { id })).await
    }

    pub async fn list(&self, params: ListEmployeesParams) -> Result<CallToolResult, ErrorData> {
        self.server.list_employees(Parameters(params)).await
    }

    pub async fn search(&self, query: &str) -> Result<CallToolResult, ErrorData> {
        self.server
            .search_employees(Parameters(SearchEmployeesParams {
                query: query.to_string(),
                limit: None,
            }))
            .await
    }

    pub async fn update(&self, id: i64, update: EmployeeUpdate) -> Result<CallToolResult, ErrorData> {
        self.server.update_employee(Parameters(UpdateEmployeeParams { id, update })).await
    }

    pub async fn delete(&self, id: i64) -> Result<CallToolResult, ErrorData> {
        self.server.delete_employee(Parameters(EmployeeIdParams { id })).await
    }

    pub async fn top_earners(&self, params: TopEarnersParams) -> Result<CallToolResult, ErrorData> {
        self.server.top_earners(Parameters(params)).await
    }
}

/// A valid new employee; tests override fields as needed
pub fn new_employee(name: &str, email: &str) -> NewEmployee {
    NewEmployee {
        name:       name.to_string(),
        email:      email.to_string(),
        department: "Engineering".to_string(),
        position:   "Software Engineer".to_string(),
        salary:     90_000.0,
        hire_date:  Some("2024-01-15".to_string()),
    }
}

/// Parses the JSON text payload every employee tool returns
pub fn json(result: &CallToolResult) -> serde_json::Value {
    assert_eq!(result.content.len(), 1, "expected a single text item");
    let text = &result.content[0].as_text().expect("text content").text;
    serde_json::from_str(text).expect("valid JSON payload")
}
