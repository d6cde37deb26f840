//! Terminal rendering for query results and similar items.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};

use nldb_engine::{EntityKind, QueryRows, SimilarItems};

/// Render a result set as a terminal table.
pub fn rows_table(rows: &QueryRows) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(&rows.columns);

    for row in &rows.rows {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        table.add_row(cells);
    }

    table
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One line per similar item: stored text, percent match, and the detail
/// fields from the item's full row.
pub fn similar_lines(similar: &SimilarItems) -> Vec<String> {
    similar
        .matches
        .iter()
        .map(|m| {
            let mut line = format!("{} ({:.0}% match)", m.text, m.score * 100.0);
            if let Some(detail) = record_detail(similar, m.id) {
                line.push_str(" | ");
                line.push_str(&detail);
            }
            line
        })
        .collect()
}

/// Per-kind detail text from the fetched row for one match.
fn record_detail(similar: &SimilarItems, id: i64) -> Option<String> {
    let columns = &similar.records.columns;
    let id_idx = columns.iter().position(|c| c == "id")?;
    let row = similar
        .records
        .rows
        .iter()
        .find(|r| r.get(id_idx) == Some(&serde_json::Value::from(id)))?;
    let field = |name: &str| -> Option<&serde_json::Value> {
        columns.iter().position(|c| c == name).and_then(|i| row.get(i))
    };

    match similar.kind {
        EntityKind::Employees => {
            let email = field("email")?.as_str()?;
            let salary = field("salary")?.as_f64()?;
            Some(format!("Email: {email} | Salary: ${salary:.2}"))
        }
        EntityKind::Products => {
            let price = field("price")?.as_f64()?;
            Some(format!("Price: ${price:.2}"))
        }
        EntityKind::Orders => {
            let total = field("order_total")?.as_f64()?;
            let date = field("order_date")?.as_str()?;
            Some(format!("Total: ${total:.2} | Date: {date}"))
        }
        EntityKind::Departments => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nldb_engine::SimilarityResult;

    #[test]
    fn test_rows_table_renders_values() {
        let rows = QueryRows {
            columns: vec!["id".to_string(), "name".to_string()],
            rows: vec![vec![serde_json::json!(1), serde_json::json!("Engineering")]],
        };

        let rendered = rows_table(&rows).to_string();
        assert!(rendered.contains("Engineering"));
        assert!(rendered.contains("id"));
    }

    #[test]
    fn test_similar_lines_percent() {
        let similar = SimilarItems {
            kind: EntityKind::Departments,
            matches: vec![SimilarityResult::new(1, "Engineering", 0.87)],
            records: QueryRows::default(),
        };

        let lines = similar_lines(&similar);
        assert_eq!(lines, vec!["Engineering (87% match)"]);
    }

    #[test]
    fn test_similar_lines_employee_detail_from_records() {
        let similar = SimilarItems {
            kind: EntityKind::Employees,
            matches: vec![SimilarityResult::new(1, "John Smith", 0.92)],
            records: QueryRows {
                columns: vec![
                    "id".to_string(),
                    "name".to_string(),
                    "email".to_string(),
                    "salary".to_string(),
                ],
                rows: vec![vec![
                    serde_json::json!(1),
                    serde_json::json!("John Smith"),
                    serde_json::json!("john.smith@company.com"),
                    serde_json::json!(85000.0),
                ]],
            },
        };

        let lines = similar_lines(&similar);
        assert_eq!(
            lines,
            vec![
                "John Smith (92% match) | Email: john.smith@company.com | Salary: $85000.00"
            ]
        );
    }

    #[test]
    fn test_similar_lines_product_price() {
        let similar = SimilarItems {
            kind: EntityKind::Products,
            matches: vec![SimilarityResult::new(2, "Wireless Mouse", 0.75)],
            records: QueryRows {
                columns: vec!["id".to_string(), "name".to_string(), "price".to_string()],
                rows: vec![vec![
                    serde_json::json!(2),
                    serde_json::json!("Wireless Mouse"),
                    serde_json::json!(29.99),
                ]],
            },
        };

        let lines = similar_lines(&similar);
        assert_eq!(lines, vec!["Wireless Mouse (75% match) | Price: $29.99"]);
    }

    #[test]
    fn test_similar_lines_missing_record_falls_back() {
        // A match without a corresponding fetched row still renders.
        let similar = SimilarItems {
            kind: EntityKind::Employees,
            matches: vec![SimilarityResult::new(99, "Ghost", 0.5)],
            records: QueryRows {
                columns: vec!["id".to_string(), "email".to_string()],
                rows: vec![],
            },
        };

        let lines = similar_lines(&similar);
        assert_eq!(lines, vec!["Ghost (50% match)"]);
    }
}
