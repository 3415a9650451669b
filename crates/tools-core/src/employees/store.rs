//! SQLite-backed employee table

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};

use super::{
    model::{
        DEFAULT_LIST_LIMIT, DEFAULT_TOP_EARNERS, DepartmentSummary, Employee, EmployeeFilter,
        EmployeeUpdate, HiringYear, MAX_LIST_LIMIT, MAX_TOP_EARNERS, NewEmployee,
        SalaryStatistics, check_limit, round_money,
    },
    seed::SAMPLE_EMPLOYEES,
};
use crate::error::{EmployeeError, EmployeeResult};

/// Path that selects a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS employees (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        department TEXT NOT NULL,
        position TEXT NOT NULL,
        salary REAL NOT NULL CHECK (salary >= 0),
        hire_date TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_employees_department ON employees(department);
";

const COLUMNS: &str = "id, name, email, department, position, salary, hire_date";

/// The employee table behind one SQLite connection
pub struct EmployeeStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for EmployeeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmployeeStore").finish_non_exhaustive()
    }
}

impl EmployeeStore {
    /// Opens (or creates) a database file; `":memory:"` opens an in-memory one
    pub fn open(path: impl AsRef<Path>) -> EmployeeResult<Self> {
        let path = path.as_ref();
        let conn = if path == Path::new(IN_MEMORY) {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        conn.execute_batch(SCHEMA)?;
        tracing::debug!(path = %path.display(), "opened employee database");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an empty in-memory database
    pub fn in_memory() -> EmployeeResult<Self> {
        Self::open(IN_MEMORY)
    }

    /// Inserts a new employee and returns the stored row
    pub fn add(&self, employee: NewEmployee) -> EmployeeResult<Employee> {
        let e = employee.validate()?;
        let conn = self.conn.lock();
        conn.query_row(
            &format!(
                "INSERT INTO employees (name, email, department, position, salary, hire_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {COLUMNS}"
            ),
            params![e.name, e.email, e.department, e.position, e.salary, e.hire_date],
            employee_from_row,
        )
        .map_err(|err| unique_violation(err, &e.email))
    }

    /// Looks up one employee by id
    pub fn get(&self, id: i64) -> EmployeeResult<Employee> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM employees WHERE id = ?1"),
            [id],
            employee_from_row,
        )
        .optional()?
        .ok_or(EmployeeError::NotFound { id })
    }

    /// Lists employees by id, optionally restricted to one department
    ///
    /// Department matching ignores ASCII case.
    pub fn list(&self, filter: &EmployeeFilter) -> EmployeeResult<Vec<Employee>> {
        let limit = filter.limit()?;
        let offset = filter.offset.unwrap_or(0);
        let department = filter.department.as_deref().map(str::trim);

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM employees
             WHERE (?1 IS NULL OR department = ?1 COLLATE NOCASE)
             ORDER BY id LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
            .query_map(params![department, limit, offset], employee_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Case-insensitive substring search over name, e-mail, department and
    /// position
    pub fn search(&self, query: &str, limit: Option<u32>) -> EmployeeResult<Vec<Employee>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(EmployeeError::invalid("query", "must not be empty"));
        }
        let limit = check_limit(limit.unwrap_or(DEFAULT_LIST_LIMIT), MAX_LIST_LIMIT)?;
        let pattern = format!("%{}%", escape_like(query));

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM employees
             WHERE name LIKE ?1 ESCAPE '\\'
                OR email LIKE ?1 ESCAPE '\\'
                OR department LIKE ?1 ESCAPE '\\'
                OR position LIKE ?1 ESCAPE '\\'
             ORDER BY id LIMIT ?2"
        ))?;
        let rows = stmt
            .query_map(params![pattern, limit], employee_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Applies a partial update and returns the new row
    pub fn update(&self, id: i64, update: EmployeeUpdate) -> EmployeeResult<Employee> {
        let u = update.validate()?;
        let conn = self.conn.lock();
        conn.query_row(
            &format!(
                "UPDATE employees SET
                    name = COALESCE(?1, name),
                    email = COALESCE(?2, email),
                    department = COALESCE(?3, department),
                    position = COALESCE(?4, position),
                    salary = COALESCE(?5, salary),
                    hire_date = COALESCE(?6, hire_date)
                 WHERE id = ?7 RETURNING {COLUMNS}"
            ),
            params![u.name, u.email, u.department, u.position, u.salary, u.hire_date, id],
            employee_from_row,
        )
        .optional()
        .map_err(|err| unique_violation(err, u.email.as_deref().unwrap_or_default()))?
        .ok_or(EmployeeError::NotFound { id })
    }

    /// Removes an employee and returns the deleted row
    pub fn delete(&self, id: i64) -> EmployeeResult<Employee> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!("DELETE FROM employees WHERE id = ?1 RETURNING {COLUMNS}"),
            [id],
            employee_from_row,
        )
        .optional()?
        .ok_or(EmployeeError::NotFound { id })
    }

    /// Number of employees
    pub fn count(&self) -> EmployeeResult<i64> {
        let conn = self.conn.lock();
        Ok(conn.query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))?)
    }

    /// Headcount and salary figures per department, alphabetically
    ///
    /// Departments are grouped ignoring ASCII case, matching the `list` and
    /// `top_earners` filters; each row reports the first spelling in sort
    /// order.
    pub fn department_summary(&self) -> EmployeeResult<Vec<DepartmentSummary>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT MIN(department), COUNT(*), AVG(salary), MIN(salary), MAX(salary), SUM(salary)
             FROM employees GROUP BY department COLLATE NOCASE
             ORDER BY department COLLATE NOCASE",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(DepartmentSummary {
                    department:     row.get(0)?,
                    headcount:      row.get(1)?,
                    average_salary: round_money(row.get(2)?),
                    min_salary:     round_money(row.get(3)?),
                    max_salary:     round_money(row.get(4)?),
                    total_payroll:  round_money(row.get(5)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Salary aggregates across the whole table
    pub fn salary_statistics(&self) -> EmployeeResult<SalaryStatistics> {
        let conn = self.conn.lock();
        let stats = conn.query_row(
            "SELECT COUNT(*), AVG(salary), MIN(salary), MAX(salary), COALESCE(SUM(salary), 0)
             FROM employees",
            [],
            |row| {
                Ok(SalaryStatistics {
                    headcount:      row.get(0)?,
                    average_salary: row.get::<_, Option<f64>>(1)?.map(round_money),
                    min_salary:     row.get::<_, Option<f64>>(2)?.map(round_money),
                    max_salary:     row.get::<_, Option<f64>>(3)?.map(round_money),
                    total_payroll:  round_money(row.get(4)?),
                })
            },
        )?;
        Ok(stats)
    }

    /// Highest-paid employees, ties broken by id
    pub fn top_earners(
        &self,
        limit: Option<u32>,
        department: Option<&str>,
    ) -> EmployeeResult<Vec<Employee>> {
        let limit = check_limit(limit.unwrap_or(DEFAULT_TOP_EARNERS), MAX_TOP_EARNERS)?;
        let department = department.map(str::trim);

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM employees
             WHERE (?1 IS NULL OR department = ?1 COLLATE NOCASE)
             ORDER BY salary DESC, id ASC LIMIT ?2"
        ))?;
        let rows = stmt
            .query_map(params![department, limit], employee_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Hire counts per calendar year, oldest first
    pub fn hires_by_year(&self) -> EmployeeResult<Vec<HiringYear>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT CAST(substr(hire_date, 1, 4) AS INTEGER) AS year, COUNT(*)
             FROM employees GROUP BY year ORDER BY year",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(HiringYear {
                    year:  row.get(0)?,
                    hires: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Loads the sample directory into an empty table
    ///
    /// Returns the number of rows inserted; a table that already has rows is
    /// left untouched and 0 is returned.
    pub fn seed_sample_data(&self) -> EmployeeResult<usize> {
        let mut conn = self.conn.lock();
        let existing: i64 = conn.query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(0);
        }

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO employees (name, email, department, position, salary, hire_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for e in SAMPLE_EMPLOYEES {
                stmt.execute(params![e.name, e.email, e.department, e.position, e.salary, e.hire_date])?;
            }
        }
        tx.commit()?;

        tracing::info!(rows = SAMPLE_EMPLOYEES.len(), "seeded sample employees");
        Ok(SAMPLE_EMPLOYEES.len())
    }
}

fn employee_from_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id:         row.get(0)?,
        name:       row.get(1)?,
        email:      row.get(2)?,
        department: row.get(3)?,
        position:   row.get(4)?,
        salary:     row.get(5)?,
        hire_date:  row.get(6)?,
    })
}

/// Maps a UNIQUE violation (only `email` is unique) to `DuplicateEmail`
fn unique_violation(err: rusqlite::Error, email: &str) -> EmployeeError {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            EmployeeError::DuplicateEmail {
                email: email.to_string(),
            }
        }
        other => EmployeeError::Database(other),
    }
}

fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> EmployeeStore {
        EmployeeStore::in_memory().unwrap()
    }

    fn hire(name: &str, email: &str, department: &str, salary: f64, hire_date: &str) -> NewEmployee {
        NewEmployee {
            name:       name.to_string(),
            email:      email.to_string(),
            department: department.to_string(),
            position:   "Engineer".to_string(),
            salary,
            hire_date:  Some(hire_date.to_string()),
        }
    }

    fn populated() -> EmployeeStore {
        let store = store();
        store.add(hire("Ann", "ann@corp.io", "Engineering", 120_000.0, "2019-04-01")).unwrap();
        store.add(hire("Bob", "bob@corp.io", "Sales", 80_000.0, "2020-01-15")).unwrap();
        store.add(hire("Cid", "cid@corp.io", "Engineering", 100_000.5, "2020-06-30")).unwrap();
        store.add(hire("Dee", "dee@corp.io", "Sales", 80_000.0, "2022-11-11")).unwrap();
        store
    }

    #[test]
    fn test_add_and_get() {
        let store = store();
        let created = store
            .add(hire(" Ann ", "ANN@corp.io", "Engineering", 1.0, "2021-01-01"))
            .unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.name, "Ann");
        assert_eq!(created.email, "ann@corp.io");
        assert_eq!(store.get(1).unwrap(), created);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let err = store().get(42).unwrap_err();
        assert!(matches!(err, EmployeeError::NotFound { id: 42 }));
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let store = store();
        store.add(hire("Ann", "ann@corp.io", "Eng", 1.0, "2021-01-01")).unwrap();

        let err = store.add(hire("Ann Two", "Ann@Corp.io", "Eng", 1.0, "2021-01-01")).unwrap_err();
        assert!(matches!(err, EmployeeError::DuplicateEmail { ref email } if email == "ann@corp.io"));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_list_filters_and_pages() {
        let store = populated();

        let all = store.list(&EmployeeFilter::default()).unwrap();
        assert_eq!(all.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);

        let sales = store
            .list(&EmployeeFilter {
                department: Some("sales".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(sales.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(), vec!["Bob", "Dee"]);

        let page = store
            .list(&EmployeeFilter {
                limit: Some(2),
                offset: Some(1),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(page.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_list_rejects_bad_limit() {
        let err = store()
            .list(&EmployeeFilter {
                limit: Some(0),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, EmployeeError::InvalidParameter { .. }));
    }

    #[test]
    fn test_search_matches_any_text_column() {
        let store = populated();

        let by_name = store.search("ANN", None).unwrap();
        assert_eq!(by_name.len(), 1);

        let by_department = store.search("engineer", None).unwrap();
        assert_eq!(by_department.len(), 4, "position matches too");

        let by_email = store.search("bob@", Some(10)).unwrap();
        assert_eq!(by_email[0].name, "Bob");
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let store = populated();
        assert!(store.search("%", None).unwrap().is_empty());
        assert!(store.search("_", None).unwrap().is_empty());
        assert!(store.search("  ", None).is_err());
    }

    #[test]
    fn test_update_changes_only_given_fields() {
        let store = populated();
        let updated = store
            .update(
                2,
                EmployeeUpdate {
                    salary: Some(85_000.0),
                    position: Some("Account Lead".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.salary, 85_000.0);
        assert_eq!(updated.position, "Account Lead");
        assert_eq!(updated.email, "bob@corp.io");
        assert_eq!(store.get(2).unwrap(), updated);
    }

    #[test]
    fn test_update_missing_and_duplicate() {
        let store = populated();
        let rename = EmployeeUpdate {
            name: Some("Nobody".to_string()),
            ..Default::default()
        };
        assert!(matches!(store.update(99, rename).unwrap_err(), EmployeeError::NotFound { id: 99 }));

        let steal = EmployeeUpdate {
            email: Some("ann@corp.io".to_string()),
            ..Default::default()
        };
        assert!(matches!(store.update(2, steal).unwrap_err(), EmployeeError::DuplicateEmail { .. }));
    }

    #[test]
    fn test_delete_returns_row_once() {
        let store = populated();
        let removed = store.delete(3).unwrap();
        assert_eq!(removed.name, "Cid");
        assert_eq!(store.count().unwrap(), 3);
        assert!(matches!(store.delete(3).unwrap_err(), EmployeeError::NotFound { id: 3 }));
    }

    #[test]
    fn test_department_summary() {
        let summary = populated().department_summary().unwrap();

        assert_eq!(summary.len(), 2);
        let eng = &summary[0];
        assert_eq!(eng.department, "Engineering");
        assert_eq!(eng.headcount, 2);
        assert_eq!(eng.average_salary, 110_000.25);
        assert_eq!(eng.min_salary, 100_000.5);
        assert_eq!(eng.total_payroll, 220_000.5);
        assert_eq!(summary[1].department, "Sales");
    }

    #[test]
    fn test_department_summary_ignores_case() {
        let store = populated();
        store.add(hire("Eve", "eve@corp.io", "engineering", 90_000.0, "2023-02-01")).unwrap();
        store.add(hire("Fay", "fay@corp.io", "accounting", 70_000.0, "2023-03-01")).unwrap();

        let listed = store
            .list(&EmployeeFilter {
                department: Some("Engineering".into()),
                ..Default::default()
            })
            .unwrap();
        let summary = store.department_summary().unwrap();

        let names: Vec<_> = summary.iter().map(|s| s.department.as_str()).collect();
        assert_eq!(names, ["accounting", "Engineering", "Sales"]);
        assert_eq!(summary[1].headcount, listed.len() as i64);
        assert_eq!(summary[1].headcount, 3);
        assert_eq!(summary[1].min_salary, 90_000.0);
    }

    #[test]
    fn test_salary_statistics() {
        let stats = populated().salary_statistics().unwrap();
        assert_eq!(stats.headcount, 4);
        assert_eq!(stats.min_salary, Some(80_000.0));
        assert_eq!(stats.max_salary, Some(120_000.0));
        assert_eq!(stats.total_payroll, 380_000.5);
        assert_eq!(stats.average_salary, Some(95_000.13));

        let empty = store().salary_statistics().unwrap();
        assert_eq!(empty.headcount, 0);
        assert_eq!(empty.average_salary, None);
        assert_eq!(empty.total_payroll, 0.0);
    }

    #[test]
    fn test_top_earners_orders_and_breaks_ties_by_id() {
        let store = populated();

        let top = store.top_earners(Some(3), None).unwrap();
        assert_eq!(top.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(), vec!["Ann", "Cid", "Bob"]);

        let sales = store.top_earners(None, Some("Sales")).unwrap();
        assert_eq!(sales.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2, 4]);

        assert!(store.top_earners(Some(101), None).is_err());
    }

    #[test]
    fn test_hires_by_year() {
        let years = populated().hires_by_year().unwrap();
        assert_eq!(
            years,
            vec![
                HiringYear { year: 2019, hires: 1 },
                HiringYear { year: 2020, hires: 2 },
                HiringYear { year: 2022, hires: 1 },
            ]
        );
    }

    #[test]
    fn test_seed_only_fills_empty_table() {
        let store = store();
        let inserted = store.seed_sample_data().unwrap();
        assert_eq!(inserted, SAMPLE_EMPLOYEES.len());
        assert_eq!(store.count().unwrap(), inserted as i64);

        assert_eq!(store.seed_sample_data().unwrap(), 0);
        assert_eq!(store.count().unwrap(), inserted as i64);
    }

    #[test]
    fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("employees.db");

        {
            let store = EmployeeStore::open(&path).unwrap();
            store.add(hire("Ann", "ann@corp.io", "Eng", 1.0, "2021-01-01")).unwrap();
        }

        let reopened = EmployeeStore::open(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
        assert_eq!(reopened.get(1).unwrap().name, "Ann");
    }
}
