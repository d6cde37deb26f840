//! Schema setup for the four fixed tables.

use sqlx::SqliteConnection;
use tracing::info;

use crate::error::Result;

const DDL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS departments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS employees (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        department_id INTEGER REFERENCES departments(id),
        email TEXT UNIQUE,
        salary REAL
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        price REAL
    )",
    "CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        customer_name TEXT NOT NULL,
        employee_id INTEGER REFERENCES employees(id),
        order_total REAL,
        order_date TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_employees_dept ON employees(department_id)",
    "CREATE INDEX IF NOT EXISTS idx_orders_employee ON orders(employee_id)",
    "CREATE INDEX IF NOT EXISTS idx_orders_date ON orders(order_date)",
];

/// Create the tables and secondary indexes if they do not exist.
pub async fn init_schema(conn: &mut SqliteConnection) -> Result<()> {
    for statement in DDL {
        sqlx::query(statement).execute(&mut *conn).await?;
    }

    info!("Schema initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect;

    #[tokio::test]
    async fn test_init_schema_creates_tables() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = connect(dir.path().join("test.db")).await.unwrap();

        init_schema(&mut conn).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' \
             AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&mut conn)
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(names, vec!["departments", "employees", "orders", "products"]);
    }

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = connect(dir.path().join("test.db")).await.unwrap();

        init_schema(&mut conn).await.unwrap();
        init_schema(&mut conn).await.unwrap();
    }
}
