//! Per-interaction SQLite connections.

use std::path::Path;

use sqlx::ConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};

use crate::error::Result;

/// Open a fresh connection to the database file.
///
/// One connection per interaction: callers run their statements and drop
/// the connection when done. The file is created if missing and foreign
/// keys are enforced.
pub async fn connect(path: impl AsRef<Path>) -> Result<SqliteConnection> {
    let options = SqliteConnectOptions::new()
        .filename(path.as_ref())
        .create_if_missing(true)
        .foreign_keys(true);

    let conn = options.connect().await?;
    Ok(conn)
}
