//! Sample directory loaded into a fresh database

/// One row of sample data
#[derive(Debug, Clone, Copy)]
pub struct SampleEmployee {
    pub name:       &'static str,
    pub email:      &'static str,
    pub department: &'static str,
    pub position:   &'static str,
    pub salary:     f64,
    pub hire_date:  &'static str,
}

const fn sample(
    name: &'static str,
    email: &'static str,
    department: &'static str,
    position: &'static str,
    salary: f64,
    hire_date: &'static str,
) -> SampleEmployee {
    SampleEmployee {
        name,
        email,
        department,
        position,
        salary,
        hire_date,
    }
}

pub const SAMPLE_EMPLOYEES: &[SampleEmployee] = &[
    sample("Alice Johnson", "alice.johnson@example.com", "Engineering", "Senior Engineer", 125_000.0, "2018-03-12"),
    sample("Bob Smith", "bob.smith@example.com", "Engineering", "Software Engineer", 98_000.0, "2020-07-01"),
    sample("Carol Davis", "carol.davis@example.com", "Engineering", "Engineering Manager", 142_000.0, "2016-09-19"),
    sample("David Wilson", "david.wilson@example.com", "Sales", "Account Executive", 72_000.0, "2021-01-11"),
    sample("Eva Martinez", "eva.martinez@example.com", "Sales", "Sales Director", 118_000.0, "2017-05-08"),
    sample("Frank Brown", "frank.brown@example.com", "Marketing", "Content Strategist", 67_500.0, "2022-02-14"),
    sample("Grace Lee", "grace.lee@example.com", "Marketing", "Marketing Manager", 95_000.0, "2019-10-28"),
    sample("Henry Taylor", "henry.taylor@example.com", "Finance", "Financial Analyst", 78_000.0, "2020-11-02"),
    sample("Irene Clark", "irene.clark@example.com", "Finance", "Controller", 110_000.0, "2015-06-22"),
    sample("Jack White", "jack.white@example.com", "Human Resources", "HR Generalist", 61_000.0, "2023-04-03"),
    sample("Karen Hall", "karen.hall@example.com", "Human Resources", "HR Director", 104_000.0, "2018-08-15"),
    sample("Leo Young", "leo.young@example.com", "Engineering", "Junior Engineer", 74_000.0, "2023-09-05"),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::employees::NewEmployee;

    #[test]
    fn test_samples_pass_validation() {
        for s in SAMPLE_EMPLOYEES {
            NewEmployee {
                name:       s.name.to_string(),
                email:      s.email.to_string(),
                department: s.department.to_string(),
                position:   s.position.to_string(),
                salary:     s.salary,
                hire_date:  Some(s.hire_date.to_string()),
            }
            .validate()
            .unwrap_or_else(|e| panic!("{}: {e}", s.name));
        }
    }

    #[test]
    fn test_sample_emails_are_unique() {
        let emails: HashSet<_> = SAMPLE_EMPLOYEES.iter().map(|s| s.email).collect();
        assert_eq!(emails.len(), SAMPLE_EMPLOYEES.len());
    }
}
