//! SQLite database handle with WAL mode.
//!
//! The [`Database`] struct wraps a `rusqlite::Connection` behind an
//! `Arc<Mutex<>>` and exposes async methods that use
//! `tokio::task::spawn_blocking` so callers suspend until the durable
//! operation completes without blocking the async runtime.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::migration;

/// Thread-safe handle to a SQLite database.
///
/// Cloning is cheap; all clones share one connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Database {
    /// Open (or create) a database at `path` and apply pragmas.
    ///
    /// This call blocks briefly (file I/O); async callers should go
    /// through [`crate::StoreLifecycle`] instead.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "opening database");

        let conn = Connection::open(path)?;
        Self::apply_pragmas(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        debug!("opening in-memory database");

        let conn = Connection::open_in_memory()?;
        Self::apply_pragmas(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run all pending schema migrations.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::TaskJoin(format!("mutex poisoned: {e}")))?;
            migration::run_all(&conn)
        })
        .await?
    }

    /// Execute a closure against the connection on the blocking pool.
    ///
    /// ```ignore
    /// let count: i64 = db.execute(|conn| {
    ///     let count = conn.query_row("SELECT count(*) FROM prompts", [], |row| row.get(0))?;
    ///     Ok(count)
    /// }).await?;
    /// ```
    pub async fn execute<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::TaskJoin(format!("mutex poisoned: {e}")))?;
            f(&conn)
        })
        .await?
    }

    /// Execute a mutable closure (for transactions) on the blocking pool.
    pub async fn execute_mut<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::TaskJoin(format!("mutex poisoned: {e}")))?;
            f(&mut conn)
        })
        .await?
    }

    /// Whether `self` and `other` share the same underlying connection.
    pub fn same_handle(&self, other: &Database) -> bool {
        Arc::ptr_eq(&self.conn, &other.conn)
    }

    // ── pragmas ──────────────────────────────────────────────────────

    fn apply_pragmas(conn: &Connection) -> StoreResult<()> {
        debug!("applying SQLite pragmas");

        // WAL mode: readers never block the single writer.
        conn.pragma_update(None, "journal_mode", "WAL")?;

        // NORMAL sync is safe with WAL: a power failure may lose the last
        // transaction but never corrupts the file.
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        conn.pragma_update(None, "temp_store", "MEMORY")?;
        conn.pragma_update(None, "busy_timeout", 5_000_i32)?;

        Ok(())
    }
}

// ── tests ────────────────────────────────────────────────────────────
