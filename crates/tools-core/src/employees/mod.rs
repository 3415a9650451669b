//! Employee directory backed by SQLite
//!
//! Every operation on [`EmployeeStore`] is one parameterized statement
//! against a single `employees` table. Input is validated in the model types
//! before it reaches SQL.
//!
//! # Examples
//!
//! ```
//! use tools_core::employees::{EmployeeFilter, EmployeeStore};
//!
//! let store = EmployeeStore::in_memory().unwrap();
//! store.seed_sample_data().unwrap();
//!
//! let engineers = store
//!     .list(&EmployeeFilter {
//!         department: Some("Engineering".into()),
//!         ..Default::default()
//!     })
//!     .unwrap();
//! assert!(!engineers.is_empty());
//! ```

pub mod model;
pub mod seed;
pub mod store;

pub use model::{
    DepartmentSummary, Employee, EmployeeFilter, EmployeeUpdate, HiringYear, NewEmployee,
    SalaryStatistics,
};
pub use store::EmployeeStore;
