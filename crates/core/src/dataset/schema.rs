//! Dataset schema for fresh databases.
//!
//! Production datasets arrive with their schema already in place; this is
//! applied to in-memory databases so they can be seeded with dumps or
//! fixtures. Every statement is idempotent (`IF NOT EXISTS`).

use tokio_rusqlite::Connection;

use crate::error::DatasetError;

/// Schema scripts in application order: (name, SQL).
const SCHEMA: &[(&str, &str)] = &[("001_world", include_str!("../../schema/001_world.sql"))];

/// Apply every schema script to the connection.
///
/// # Errors
///
/// Returns `DatasetError::Schema` naming the script that failed.
pub async fn apply(conn: &Connection) -> Result<(), DatasetError> {
    conn.call(|conn| -> Result<(), DatasetError> {
        for (name, sql) in SCHEMA {
            conn.execute_batch(sql)
                .map_err(|e| DatasetError::Schema(format!("{name}: {e}")))?;
        }
        Ok(())
    })
    .await
    .map_err(DatasetError::from)
}
