//! Sample-data seeding.
//!
//! Inserts the demo departments, employees, products, and orders and hands
//! back `(id, text)` pairs per entity type so the caller can build the
//! similarity indexes from the same rows. Rows with unique keys upsert, so
//! re-seeding those tables is idempotent.

use chrono::{Duration, Utc};
use sqlx::SqliteConnection;
use tracing::info;

use crate::entity::EntityKind;
use crate::error::Result;

/// The `(row id, embedding text)` pairs seeded for one entity type.
#[derive(Debug, Clone)]
pub struct SeedBatch {
    /// Entity type the rows belong to.
    pub kind: EntityKind,

    /// Row id and the text to embed for it.
    pub rows: Vec<(i64, String)>,
}

const DEPARTMENTS: &[&str] = &[
    "Engineering",
    "Human Resources",
    "Sales",
    "Marketing",
    "Finance",
];

const EMPLOYEES: &[(&str, &str, &str, f64)] = &[
    ("John Smith", "Engineering", "john.smith@company.com", 85000.00),
    ("Sarah Johnson", "Engineering", "sarah.j@company.com", 92000.00),
    ("Mike Davis", "Sales", "mike.d@company.com", 75000.00),
    ("Emily Brown", "Sales", "emily.b@company.com", 78000.00),
    ("David Wilson", "Marketing", "david.w@company.com", 70000.00),
    ("Lisa Anderson", "Marketing", "lisa.a@company.com", 72000.00),
    ("Robert Taylor", "Human Resources", "robert.t@company.com", 65000.00),
    ("Jennifer Martinez", "Finance", "jennifer.m@company.com", 88000.00),
    ("James Thomas", "Engineering", "james.t@company.com", 95000.00),
    ("Maria Garcia", "Sales", "maria.g@company.com", 76000.00),
];

const PRODUCTS: &[(&str, f64)] = &[
    ("Laptop Pro 15", 1299.99),
    ("Wireless Mouse", 29.99),
    ("Mechanical Keyboard", 149.99),
    ("USB-C Hub", 49.99),
    ("Monitor 27 inch", 399.99),
    ("Webcam HD", 89.99),
    ("Desk Lamp LED", 39.99),
    ("Office Chair", 299.99),
    ("Standing Desk", 599.99),
    ("Noise Cancelling Headphones", 249.99),
];

const CUSTOMERS: &[&str] = &[
    "Acme Corporation",
    "TechStart Inc",
    "Global Solutions Ltd",
    "Innovation Hub",
    "Digital Dynamics",
    "Future Systems",
    "Smart Tech Co",
    "Precision Engineering",
    "Data Insights LLC",
    "Cloud Services Pro",
];

const ORDER_COUNT: usize = 20;

/// Insert the sample data set and return seeded `(id, text)` pairs for
/// every entity type, in seeding order.
pub async fn seed_sample_data(conn: &mut SqliteConnection) -> Result<Vec<SeedBatch>> {
    let mut department_rows = Vec::with_capacity(DEPARTMENTS.len());
    for name in DEPARTMENTS {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO departments (name) VALUES (?) \
             ON CONFLICT(name) DO UPDATE SET name = excluded.name \
             RETURNING id",
        )
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;
        department_rows.push((id, (*name).to_string()));
    }
    info!("Seeded {} departments", department_rows.len());

    let department_id = |name: &str| -> i64 {
        department_rows
            .iter()
            .find(|(_, n)| n == name)
            .map(|(id, _)| *id)
            .unwrap_or(department_rows[0].0)
    };

    let mut employee_rows = Vec::with_capacity(EMPLOYEES.len());
    for (name, dept, email, salary) in EMPLOYEES {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO employees (name, department_id, email, salary) VALUES (?, ?, ?, ?) \
             ON CONFLICT(email) DO UPDATE SET name = excluded.name \
             RETURNING id",
        )
        .bind(name)
        .bind(department_id(dept))
        .bind(email)
        .bind(salary)
        .fetch_one(&mut *conn)
        .await?;
        employee_rows.push((id, (*name).to_string()));
    }
    info!("Seeded {} employees", employee_rows.len());

    let mut product_rows = Vec::with_capacity(PRODUCTS.len());
    for (name, price) in PRODUCTS {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO products (name, price) VALUES (?, ?) RETURNING id")
                .bind(name)
                .bind(price)
                .fetch_one(&mut *conn)
                .await?;
        product_rows.push((id, (*name).to_string()));
    }
    info!("Seeded {} products", product_rows.len());

    let base_date = Utc::now().date_naive() - Duration::days(90);
    let mut order_rows = Vec::with_capacity(ORDER_COUNT);
    for i in 0..ORDER_COUNT {
        let customer = CUSTOMERS[i % CUSTOMERS.len()];
        let employee_id = employee_rows[i % employee_rows.len()].0;
        let order_total = 100.0 + (i as f64) * 50.5;
        let order_date = (base_date + Duration::days((i * 4) as i64)).to_string();

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO orders (customer_name, employee_id, order_total, order_date) \
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(customer)
        .bind(employee_id)
        .bind(order_total)
        .bind(&order_date)
        .fetch_one(&mut *conn)
        .await?;
        order_rows.push((id, customer.to_string()));
    }
    info!("Seeded {} orders", order_rows.len());

    Ok(vec![
        SeedBatch {
            kind: EntityKind::Departments,
            rows: department_rows,
        },
        SeedBatch {
            kind: EntityKind::Employees,
            rows: employee_rows,
        },
        SeedBatch {
            kind: EntityKind::Products,
            rows: product_rows,
        },
        SeedBatch {
            kind: EntityKind::Orders,
            rows: order_rows,
        },
    ])
}
