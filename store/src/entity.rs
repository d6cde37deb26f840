//! Entity types searchable by the semantic path.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four entity types in the store, one similarity index each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Departments,
    Employees,
    Products,
    Orders,
}

impl EntityKind {
    /// All entity kinds, in seeding order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Departments,
        EntityKind::Employees,
        EntityKind::Products,
        EntityKind::Orders,
    ];

    /// Table name in the relational store.
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::Departments => "departments",
            EntityKind::Employees => "employees",
            EntityKind::Products => "products",
            EntityKind::Orders => "orders",
        }
    }

    /// Pick the entity type a question is about by keyword sniffing.
    ///
    /// First match wins; returns `None` when no keyword appears.
    pub fn detect(question: &str) -> Option<EntityKind> {
        let question = question.to_lowercase();

        if question.contains("employee") || question.contains("staff") {
            Some(EntityKind::Employees)
        } else if question.contains("department") {
            Some(EntityKind::Departments)
        } else if question.contains("product") {
            Some(EntityKind::Products)
        } else if question.contains("order") || question.contains("customer") {
            Some(EntityKind::Orders)
        } else {
            None
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect_employees() {
        assert_eq!(
            EntityKind::detect("Show all employees in Sales"),
            Some(EntityKind::Employees)
        );
        assert_eq!(
            EntityKind::detect("how many STAFF do we have"),
            Some(EntityKind::Employees)
        );
    }

    #[test]
    fn test_detect_departments() {
        assert_eq!(
            EntityKind::detect("average salary by department"),
            Some(EntityKind::Departments)
        );
    }

    #[test]
    fn test_detect_products_and_orders() {
        assert_eq!(
            EntityKind::detect("products under $100"),
            Some(EntityKind::Products)
        );
        assert_eq!(
            EntityKind::detect("recent orders"),
            Some(EntityKind::Orders)
        );
        assert_eq!(
            EntityKind::detect("top customers by revenue"),
            Some(EntityKind::Orders)
        );
    }

    #[test]
    fn test_detect_employee_wins_over_department() {
        // "employee" is checked first, matching the routing of the UI.
        assert_eq!(
            EntityKind::detect("employees per department"),
            Some(EntityKind::Employees)
        );
    }

    #[test]
    fn test_detect_none() {
        assert_eq!(EntityKind::detect("what is the meaning of life"), None);
    }
}
