//! MCP service implementation with tool routing
//!
//! Every tool is one call into [`EmployeeStore`]; results are returned as
//! pretty-printed JSON text.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tools_core::{
    employees::{EmployeeFilter, EmployeeStore, EmployeeUpdate, NewEmployee},
    error::EmployeeError,
    mcp::json_result,
    model::HealthCheckResponse,
};

/// Identifies a single employee
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct EmployeeIdParams {
    /// Employee id as returned by add_employee or list_employees
    pub id: i64,
}

/// Parameters for the list_employees tool
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListEmployeesParams {
    /// Only employees in this department (case-insensitive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    /// Page size, 1-1000 (default: 100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Rows to skip (default: 0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// Parameters for the search_employees tool
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct SearchEmployeesParams {
    /// Text matched against name, email, department and position
    pub query: String,

    /// Maximum results, 1-1000 (default: 100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Parameters for the update_employee tool
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct UpdateEmployeeParams {
    /// Employee to change
    pub id: i64,

    /// Fields to overwrite; omitted fields are kept
    #[serde(flatten)]
    pub update: EmployeeUpdate,
}

/// Parameters for the top_earners tool
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct TopEarnersParams {
    /// Number of employees, 1-100 (default: 5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Restrict to one department
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Converts an EmployeeError to an MCP ErrorData
pub fn convert_employee_error_to_mcp(error: EmployeeError) -> McpError {
    let data = Some(serde_json::json!({ "hint": error.remediation_hint() }));
    if error.is_client_error() {
        McpError::invalid_params(error.to_string(), data)
    } else {
        tracing::warn!(error = %error, "employee query failed");
        McpError::internal_error(error.to_string(), data)
    }
}

/// Employee directory MCP server
///
/// # Tools
///
/// - CRUD: `add_employee`, `get_employee`, `list_employees`,
///   `search_employees`, `update_employee`, `delete_employee`
/// - Reports: `department_summary`, `salary_statistics`, `top_earners`,
///   `hires_by_year`
/// - `health_check`
#[derive(Clone)]
pub struct EmployeeMcpServer {
    tool_router: ToolRouter<Self>,
    store:       Arc<EmployeeStore>,
}

#[tool_router]
impl EmployeeMcpServer {
    pub fn new(store: Arc<EmployeeStore>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            store,
        }
    }

    /// Server over a seeded in-memory database
    pub fn new_with_sample_data() -> Result<Self, EmployeeError> {
        let store = EmployeeStore::in_memory()?;
        store.seed_sample_data()?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Names of the registered tools, sorted
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> =
            self.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        names
    }

    /// Reports server version and whether the database answers
    ///
    /// Response:
    /// ```json
    /// {"server": "employee-mcp", "version": "0.1.0", "ok": true, "details": {"employees": 12}}
    /// ```
    #[tool(description = "Check server health and report how many employees are stored")]
    pub async fn health_check(&self) -> Result<CallToolResult, McpError> {
        let (ok, details) = match self.store.count() {
            Ok(count) => (true, serde_json::json!({ "employees": count })),
            Err(e) => (false, serde_json::json!({ "error": e.to_string() })),
        };
        json_result(&HealthCheckResponse::new(
            "employee-mcp",
            env!("CARGO_PKG_VERSION"),
            ok,
            details,
        ))
    }

    #[tool(description = "Add an employee. hireDate (YYYY-MM-DD) defaults to today; email must be unique.")]
    pub async fn add_employee(
        &self,
        Parameters(employee): Parameters<NewEmployee>,
    ) -> Result<CallToolResult, McpError> {
        let created = self.store.add(employee).map_err(convert_employee_error_to_mcp)?;
        tracing::info!(id = created.id, "added employee");
        json_result(&created)
    }

    #[tool(description = "Fetch one employee by id")]
    pub async fn get_employee(
        &self,
        Parameters(params): Parameters<EmployeeIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let employee = self.store.get(params.id).map_err(convert_employee_error_to_mcp)?;
        json_result(&employee)
    }

    #[tool(description = "List employees ordered by id, optionally filtered by department, with limit/offset paging")]
    pub async fn list_employees(
        &self,
        Parameters(params): Parameters<ListEmployeesParams>,
    ) -> Result<CallToolResult, McpError> {
        let filter = EmployeeFilter {
            department: params.department,
            limit:      params.limit,
            offset:     params.offset,
        };
        let employees = self.store.list(&filter).map_err(convert_employee_error_to_mcp)?;
        tracing::debug!(rows = employees.len(), "list_employees");
        json_result(&serde_json::json!({
            "count": employees.len(),
            "employees": employees,
        }))
    }

    #[tool(description = "Case-insensitive substring search over name, email, department and position")]
    pub async fn search_employees(
        &self,
        Parameters(params): Parameters<SearchEmployeesParams>,
    ) -> Result<CallToolResult, McpError> {
        let employees = self
            .store
            .search(&params.query, params.limit)
            .map_err(convert_employee_error_to_mcp)?;
        tracing::debug!(query = %params.query, rows = employees.len(), "search_employees");
        json_result(&serde_json::json!({
            "count": employees.len(),
            "employees": employees,
        }))
    }

    #[tool(description = "Change fields of an existing employee; fields that are omitted keep their value")]
    pub async fn update_employee(
        &self,
        Parameters(params): Parameters<UpdateEmployeeParams>,
    ) -> Result<CallToolResult, McpError> {
        let updated = self
            .store
            .update(params.id, params.update)
            .map_err(convert_employee_error_to_mcp)?;
        tracing::info!(id = updated.id, "updated employee");
        json_result(&updated)
    }

    #[tool(description = "Delete an employee by id and return the removed record")]
    pub async fn delete_employee(
        &self,
        Parameters(params): Parameters<EmployeeIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let deleted = self.store.delete(params.id).map_err(convert_employee_error_to_mcp)?;
        tracing::info!(id = deleted.id, "deleted employee");
        json_result(&serde_json::json!({ "deleted": deleted }))
    }

    #[tool(description = "Headcount and salary figures per department")]
    pub async fn department_summary(&self) -> Result<CallToolResult, McpError> {
        let rows = self.store.department_summary().map_err(convert_employee_error_to_mcp)?;
        json_result(&rows)
    }

    #[tool(description = "Company-wide headcount, average, minimum, maximum and total salary")]
    pub async fn salary_statistics(&self) -> Result<CallToolResult, McpError> {
        let stats = self.store.salary_statistics().map_err(convert_employee_error_to_mcp)?;
        json_result(&stats)
    }

    #[tool(description = "Highest-paid employees, optionally within one department")]
    pub async fn top_earners(
        &self,
        Parameters(params): Parameters<TopEarnersParams>,
    ) -> Result<CallToolResult, McpError> {
        let rows = self
            .store
            .top_earners(params.limit, params.department.as_deref())
            .map_err(convert_employee_error_to_mcp)?;
        json_result(&rows)
    }

    #[tool(description = "Number of hires per calendar year")]
    pub async fn hires_by_year(&self) -> Result<CallToolResult, McpError> {
        let rows = self.store.hires_by_year().map_err(convert_employee_error_to_mcp)?;
        json_result(&rows)
    }
}

#[tool_handler]
impl ServerHandler for EmployeeMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Employee directory. Use list_employees or search_employees to find ids, \
                 get/add/update/delete_employee to manage records, and department_summary, \
                 salary_statistics, top_earners or hires_by_year for reports."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}
