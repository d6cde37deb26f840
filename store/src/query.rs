//! Raw query execution with dynamically decoded rows.
//!
//! Generated SQL arrives as an opaque string, so rows are decoded column by
//! column into JSON values rather than into typed structs.

use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, SqliteConnection};
use tracing::debug;

use crate::entity::EntityKind;
use crate::error::Result;

/// Results of a raw query: ordered column names plus value rows.
#[derive(Debug, Clone, Default)]
pub struct QueryRows {
    /// Column names, in select order.
    pub columns: Vec<String>,

    /// One vector of values per row, aligned with `columns`.
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl QueryRows {
    /// Number of result rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the result set is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the result set as CSV with a header row.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();

        let header: Vec<String> = self.columns.iter().map(|c| csv_field(c)).collect();
        out.push_str(&header.join(","));
        out.push('\n');

        for row in &self.rows {
            let fields: Vec<String> = row
                .iter()
                .map(|v| match v {
                    serde_json::Value::Null => String::new(),
                    serde_json::Value::String(s) => csv_field(s),
                    other => csv_field(&other.to_string()),
                })
                .collect();
            out.push_str(&fields.join(","));
            out.push('\n');
        }

        out
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn decode_value(row: &SqliteRow, idx: usize) -> serde_json::Value {
    // SQLite affinity order: integer, real, text. The first decode that
    // succeeds wins; anything else (blobs) renders as null.
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map_or(serde_json::Value::Null, serde_json::Value::from);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map_or(serde_json::Value::Null, serde_json::Value::from);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map_or(serde_json::Value::Null, serde_json::Value::from);
    }
    serde_json::Value::Null
}

fn collect_rows(fetched: Vec<SqliteRow>) -> QueryRows {
    let columns: Vec<String> = fetched
        .first()
        .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
        .unwrap_or_default();

    let rows: Vec<Vec<serde_json::Value>> = fetched
        .iter()
        .map(|row| (0..row.columns().len()).map(|i| decode_value(row, i)).collect())
        .collect();

    QueryRows { columns, rows }
}

/// Execute a raw SELECT statement and return its rows.
///
/// Callers are expected to have run the statement through the read-only
/// guard first; nothing here re-checks it.
pub async fn run_query(conn: &mut SqliteConnection, sql: &str) -> Result<QueryRows> {
    debug!("Running query: {sql}");

    let fetched = sqlx::query(sql).fetch_all(&mut *conn).await?;
    let results = collect_rows(fetched);

    debug!("Query returned {} rows", results.len());
    Ok(results)
}

/// Fetch full rows for an entity type by primary key.
///
/// This is the join behind "similar items": the index returns ids, this
/// returns the rows to display for them.
pub async fn fetch_by_ids(
    conn: &mut SqliteConnection,
    kind: EntityKind,
    ids: &[i64],
) -> Result<QueryRows> {
    if ids.is_empty() {
        return Ok(QueryRows::default());
    }

    let columns = match kind {
        EntityKind::Departments => "id, name",
        EntityKind::Employees => "id, name, email, salary",
        EntityKind::Products => "id, name, price",
        EntityKind::Orders => "id, customer_name, order_total, order_date",
    };

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT {columns} FROM {} WHERE id IN ({placeholders})",
        kind.table_name()
    );

    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(id);
    }

    let fetched = query.fetch_all(&mut *conn).await?;
    Ok(collect_rows(fetched))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect;
    use crate::schema::init_schema;
    use pretty_assertions::assert_eq;

    async fn test_conn() -> (tempfile::TempDir, SqliteConnection) {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = connect(dir.path().join("test.db")).await.unwrap();
        init_schema(&mut conn).await.unwrap();
        (dir, conn)
    }

    #[tokio::test]
    async fn test_run_query_decodes_mixed_types() {
        let (_dir, mut conn) = test_conn().await;

        sqlx::query("INSERT INTO products (name, price) VALUES ('Laptop Pro 15', 1299.99)")
            .execute(&mut conn)
            .await
            .unwrap();

        let results = run_query(&mut conn, "SELECT id, name, price FROM products")
            .await
            .unwrap();

        assert_eq!(results.columns, vec!["id", "name", "price"]);
        assert_eq!(results.len(), 1);
        assert_eq!(results.rows[0][1], serde_json::json!("Laptop Pro 15"));
        assert_eq!(results.rows[0][2], serde_json::json!(1299.99));
    }

    #[tokio::test]
    async fn test_run_query_empty_result() {
        let (_dir, mut conn) = test_conn().await;

        let results = run_query(&mut conn, "SELECT * FROM employees")
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_by_ids() {
        let (_dir, mut conn) = test_conn().await;

        sqlx::query("INSERT INTO products (name, price) VALUES ('Mouse', 29.99), ('Hub', 49.99)")
            .execute(&mut conn)
            .await
            .unwrap();

        let results = fetch_by_ids(&mut conn, EntityKind::Products, &[1, 2])
            .await
            .unwrap();
        assert_eq!(results.len(), 2);

        let none = fetch_by_ids(&mut conn, EntityKind::Products, &[]).await.unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_to_csv_quotes_fields() {
        let results = QueryRows {
            columns: vec!["id".to_string(), "name".to_string()],
            rows: vec![vec![
                serde_json::json!(1),
                serde_json::json!("Acme, \"Corp\""),
            ]],
        };

        let csv = results.to_csv();
        assert_eq!(csv, "id,name\n1,\"Acme, \"\"Corp\"\"\"\n");
    }
}
