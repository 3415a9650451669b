//! Employee records, write payloads and report rows

use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{EmployeeError, EmployeeResult};

/// Default page size for `list`
pub const DEFAULT_LIST_LIMIT: u32 = 100;
/// Largest page `list` and `search` will return
pub const MAX_LIST_LIMIT: u32 = 1000;
/// Default number of rows for `top_earners`
pub const DEFAULT_TOP_EARNERS: u32 = 5;
/// Largest `top_earners` limit
pub const MAX_TOP_EARNERS: u32 = 100;

const DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

/// A stored employee row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id:         i64,
    pub name:       String,
    pub email:      String,
    pub department: String,
    pub position:   String,
    pub salary:     f64,
    /// ISO date, `YYYY-MM-DD`
    pub hire_date:  String,
}

/// Fields for a new employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    /// Full name
    pub name:       String,
    /// Unique e-mail address
    pub email:      String,
    /// Department, e.g. "Engineering"
    pub department: String,
    /// Job title
    pub position:   String,
    /// Annual salary, non-negative
    pub salary:     f64,
    /// Hire date as YYYY-MM-DD; defaults to today
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hire_date:  Option<String>,
}

impl NewEmployee {
    /// Checks every field and returns a normalized copy
    ///
    /// Text fields are trimmed, the e-mail is lowercased and a missing hire
    /// date becomes today's date.
    ///
    /// # Examples
    ///
    /// ```
    /// use tools_core::employees::NewEmployee;
    ///
    /// let valid = NewEmployee {
    ///     name: " Ada Lovelace ".into(),
    ///     email: "Ada@Example.com".into(),
    ///     department: "Engineering".into(),
    ///     position: "Analyst".into(),
    ///     salary: 120_000.0,
    ///     hire_date: Some("1843-07-01".into()),
    /// }
    /// .validate()
    /// .unwrap();
    ///
    /// assert_eq!(valid.name, "Ada Lovelace");
    /// assert_eq!(valid.email, "ada@example.com");
    /// ```
    pub fn validate(self) -> EmployeeResult<Self> {
        let hire_date = match self.hire_date {
            Some(date) => normalize_date(&date)?,
            None => Utc::now().date_naive().format(DATE_FORMAT).to_string(),
        };

        Ok(Self {
            name:       required_text("name", &self.name)?,
            email:      normalize_email(&self.email)?,
            department: required_text("department", &self.department)?,
            position:   required_text("position", &self.position)?,
            salary:     check_salary(self.salary)?,
            hire_date:  Some(hire_date),
        })
    }
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    /// New full name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name:       Option<String>,
    /// New unique e-mail address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email:      Option<String>,
    /// New department
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// New job title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position:   Option<String>,
    /// New salary, non-negative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary:     Option<f64>,
    /// New hire date, YYYY-MM-DD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hire_date:  Option<String>,
}

impl EmployeeUpdate {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.department.is_none()
            && self.position.is_none()
            && self.salary.is_none()
            && self.hire_date.is_none()
    }

    /// Validates present fields like [`NewEmployee::validate`]
    ///
    /// An update with no fields is rejected.
    pub fn validate(self) -> EmployeeResult<Self> {
        if self.is_empty() {
            return Err(EmployeeError::invalid("update", "at least one field must be provided"));
        }

        Ok(Self {
            name:       self.name.map(|v| required_text("name", &v)).transpose()?,
            email:      self.email.map(|v| normalize_email(&v)).transpose()?,
            department: self.department.map(|v| required_text("department", &v)).transpose()?,
            position:   self.position.map(|v| required_text("position", &v)).transpose()?,
            salary:     self.salary.map(check_salary).transpose()?,
            hire_date:  self.hire_date.map(|v| normalize_date(&v)).transpose()?,
        })
    }
}

/// Paging and department filter for `list`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub department: Option<String>,
    pub limit:      Option<u32>,
    pub offset:     Option<u32>,
}

impl EmployeeFilter {
    /// Effective page size, validated against [`MAX_LIST_LIMIT`]
    pub fn limit(&self) -> EmployeeResult<u32> {
        check_limit(self.limit.unwrap_or(DEFAULT_LIST_LIMIT), MAX_LIST_LIMIT)
    }
}

/// Per-department aggregate row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummary {
    pub department:     String,
    pub headcount:      i64,
    pub average_salary: f64,
    pub min_salary:     f64,
    pub max_salary:     f64,
    pub total_payroll:  f64,
}

/// Company-wide salary aggregates
///
/// Averages and extremes are `None` when the table is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalaryStatistics {
    pub headcount:      i64,
    pub average_salary: Option<f64>,
    pub min_salary:     Option<f64>,
    pub max_salary:     Option<f64>,
    pub total_payroll:  f64,
}

/// Number of hires in a calendar year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HiringYear {
    pub year:  i32,
    pub hires: i64,
}

/// Rounds a money amount to cents for report output
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Checks a caller-supplied row limit against `1..=max`
pub fn check_limit(limit: u32, max: u32) -> EmployeeResult<u32> {
    if (1..=max).contains(&limit) {
        Ok(limit)
    } else {
        Err(EmployeeError::invalid("limit", format!("{limit} is outside 1..={max}")))
    }
}

fn required_text(field: &str, value: &str) -> EmployeeResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EmployeeError::invalid(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn normalize_email(value: &str) -> EmployeeResult<String> {
    let email = value.trim().to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(EmployeeError::invalid("email", format!("'{value}' is not an e-mail address")));
    }
    Ok(email)
}

fn check_salary(salary: f64) -> EmployeeResult<f64> {
    if !salary.is_finite() || salary < 0.0 {
        return Err(EmployeeError::invalid("salary", format!("{salary} is not a non-negative amount")));
    }
    // -0.0 passes the check above; store it as 0
    Ok(salary + 0.0)
}

fn normalize_date(value: &str) -> EmployeeResult<String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .map_err(|e| EmployeeError::invalid("hireDate", format!("'{value}': {e}")))
}
