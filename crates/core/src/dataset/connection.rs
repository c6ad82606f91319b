//! Dataset connection management.
//!
//! Opens the SQLite dataset read-only, applies pragmas, and wraps every
//! lookup in a deadline.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use tokio_rusqlite::Connection;
use tokio_rusqlite::rusqlite::OpenFlags;

use super::schema;
use crate::error::DatasetError;

/// Deadline applied when none is configured.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Dataset handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread. Clones share the same connection.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub(crate) conn: Connection,
    timeout: Duration,
}

impl Dataset {
    /// Open an existing dataset file read-only.
    ///
    /// Unlike a writable open, a missing file is an error rather than an
    /// empty database.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(DatasetError::Open(format!("{}: no such file", path.display())));
        }

        let shown = path.display().to_string();
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX)
            .await
            .map_err(|e| DatasetError::Open(format!("{shown}: {e}")))?;

        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA query_only=ON;
                 PRAGMA temp_store=MEMORY;",
            )?;
            Ok(())
        })
        .await
        .map_err(DatasetError::Database)?;

        tracing::info!(path = %shown, "opened dataset");

        Ok(Self { conn, timeout: DEFAULT_QUERY_TIMEOUT })
    }

    /// Open an empty in-memory dataset with the schema applied.
    ///
    /// Used for tests and for seeding from SQL dumps via `execute_script`.
    pub async fn open_in_memory() -> Result<Self, DatasetError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| DatasetError::Database(e.into()))?;

        conn.call(|conn| {
            conn.execute_batch("PRAGMA temp_store=MEMORY;")?;
            Ok(())
        })
        .await
        .map_err(DatasetError::Database)?;

        schema::apply(&conn).await?;

        Ok(Self { conn, timeout: DEFAULT_QUERY_TIMEOUT })
    }

    /// Replace the per-query deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run a SQL batch, e.g. a dataset dump, against the connection.
    ///
    /// Fails on a dataset opened with `open`, which is read-only.
    pub async fn execute_script(&self, sql: impl Into<String>) -> Result<(), DatasetError> {
        let sql = sql.into();
        self.conn
            .call(move |conn| conn.execute_batch(&sql))
            .await
            .map_err(DatasetError::from)
    }

    /// Round trip to the connection thread.
    pub async fn ping(&self) -> Result<(), DatasetError> {
        self.with_deadline(async {
            self.conn
                .call(|conn| conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)))
                .await
                .map_err(DatasetError::from)?;
            Ok(())
        })
        .await
    }

    /// Await `fut`, failing with `DatasetError::Timeout` once the deadline passes.
    pub(crate) async fn with_deadline<T>(
        &self, fut: impl Future<Output = Result<T, DatasetError>>,
    ) -> Result<T, DatasetError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                let millis = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(timeout_ms = millis, "dataset query timed out");
                Err(DatasetError::Timeout(millis))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Limit;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = Dataset::open_in_memory().await.unwrap();
        let version = db
            .conn
            .call(|conn| conn.query_row("SELECT sqlite_version()", [], |row| row.get::<_, String>(0)))
            .await
            .unwrap();
        assert!(!version.is_empty());
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let result = Dataset::open("./definitely-not-here.sqlite3").await;
        assert!(matches!(result, Err(DatasetError::Open(msg)) if msg.contains("definitely-not-here")));
    }

    #[tokio::test]
    async fn test_open_existing_file_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.sqlite3");

        let writer = Connection::open(&path).await.unwrap();
        schema::apply(&writer).await.unwrap();
        writer
            .call(|conn| {
                conn.execute_batch(
                    "INSERT INTO countries (id, name, iso2) VALUES (233, 'United States', 'US');
                     INSERT INTO states (id, name, country_id, iso2) VALUES (1425, 'Massachusetts', 233, 'MA');
                     INSERT INTO cities (id, name, state_id, country_id, country_code, latitude, longitude)
                        VALUES (1, 'Newton', 1425, 233, 'US', 42.33704, -71.20922);",
                )
            })
            .await
            .unwrap();
        writer.close().await.unwrap();

        let db = Dataset::open(&path).await.unwrap();
        let cities = db.find_cities_by_prefix("New", Limit::parse("10", 100).unwrap()).await.unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].name, "Newton");
        assert_eq!(cities[0].state.iso2, "MA");

        let write = db.execute_script("DELETE FROM cities").await;
        assert!(matches!(write, Err(DatasetError::Database(_))));
        db.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_ping() {
        let db = Dataset::open_in_memory().await.unwrap();
        db.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_execute_script_rejects_bad_sql() {
        let db = Dataset::open_in_memory().await.unwrap();
        let result = db.execute_script("INSERT INTO nowhere VALUES (1)").await;
        assert!(matches!(result, Err(DatasetError::Database(_))));
    }

    #[tokio::test]
    async fn test_deadline_expires() {
        let db = Dataset::open_in_memory().await.unwrap().with_timeout(Duration::from_millis(10));
        let result = db
            .with_deadline(async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(DatasetError::Timeout(10))));
    }
}
