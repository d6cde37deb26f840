//! Read-only SQL guard.
//!
//! A single-decision keyword check: the uppercased, comment-stripped
//! statement must start with SELECT and contain no mutating keyword.

use thiserror::Error;

/// Keywords that mark a statement as mutating.
const DENYLIST: &[&str] = &[
    "DROP", "DELETE", "INSERT", "UPDATE", "ALTER", "CREATE", "TRUNCATE", "EXEC",
];

/// Reasons the guard rejects a statement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// A denylisted keyword appeared in the statement.
    #[error("blocked keyword: {0}")]
    BlockedKeyword(String),

    /// The statement does not start with SELECT.
    #[error("only SELECT queries allowed")]
    NotSelect,
}

/// Check that a statement is read-only.
///
/// Case-insensitive; `--` line comments are stripped before matching so a
/// keyword appearing only in a comment does not reject the statement.
pub fn check_sql(sql: &str) -> Result<(), GuardError> {
    let upper = sql.trim().to_uppercase();
    let stripped: String = upper
        .lines()
        .map(|line| line.split("--").next().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n");

    for keyword in DENYLIST {
        if stripped.contains(keyword) {
            return Err(GuardError::BlockedKeyword((*keyword).to_string()));
        }
    }

    // No trim after comment stripping: a statement whose first line is a
    // comment leaves a leading newline and is rejected.
    if !stripped.starts_with("SELECT") {
        return Err(GuardError::NotSelect);
    }

    Ok(())
}
