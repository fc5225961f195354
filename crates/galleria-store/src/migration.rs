//! Schema migration system.
//!
//! Migrations are static SQL strings keyed by version number. The applied
//! version is tracked in a `_migrations` table; an empty table means
//! version 0 (no store yet). Every step is additive and runs only when the
//! stored version is below that step, so a database can be upgraded from
//! any older version without disturbing existing rows.

use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

/// A single migration definition.
struct Migration {
    /// Monotonically increasing version number (1, 2, 3, ...).
    version: u32,
    /// Human-readable description.
    description: &'static str,
    /// Raw SQL to execute. May contain multiple statements separated by `;`.
    sql: &'static str,
}

/// All migrations in order. Add new migrations to the end of this array.
static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "prompt records keyed by id, ordered by created_at",
        sql: r#"
            CREATE TABLE prompts (
                id          TEXT PRIMARY KEY,
                title       TEXT NOT NULL,
                prompt      TEXT NOT NULL,
                image_url   TEXT NOT NULL,
                category    TEXT,
                tags        TEXT,
                is_favorite BOOLEAN NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );
            CREATE INDEX idx_prompts_created_at ON prompts(created_at);
        "#,
    },
    Migration {
        version: 2,
        description: "settings key-value table",
        sql: r#"
            CREATE TABLE settings (
                name  TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
        "#,
    },
];

/// The schema version a fully migrated database reports.
pub const LATEST_VERSION: u32 = 2;

// ── public API ───────────────────────────────────────────────────────

/// Run all pending migrations against `conn`.
///
/// This is a **synchronous** function; call it from `spawn_blocking`.
pub fn run_all(conn: &Connection) -> StoreResult<()> {
    run_to(conn, LATEST_VERSION)
}

/// Apply pending migrations up to and including `target`.
pub fn run_to(conn: &Connection, target: u32) -> StoreResult<()> {
    ensure_migrations_table(conn)?;

    let current = current_version(conn)?;
    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|m| m.version > current && m.version <= target)
        .collect();

    if pending.is_empty() {
        debug!(current_version = current, "database schema is up to date");
        return Ok(());
    }

    info!(
        current_version = current,
        pending = pending.len(),
        "running pending migrations"
    );

    for migration in pending {
        apply(conn, migration)?;
    }

    Ok(())
}

/// Return the latest applied migration version, or 0 if none.
pub fn current_version(conn: &Connection) -> StoreResult<u32> {
    let version: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM _migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| StoreError::Migration {
            version: 0,
            message: format!("failed to read current version: {e}"),
        })?;
    Ok(version)
}

// ── internals ────────────────────────────────────────────────────────

/// Create the `_migrations` bookkeeping table if it does not exist.
fn ensure_migrations_table(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version     INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at  INTEGER NOT NULL
        );",
    )
    .map_err(|e| StoreError::Migration {
        version: 0,
        message: format!("failed to create _migrations table: {e}"),
    })?;
    Ok(())
}

/// Apply a single migration inside a transaction.
fn apply(conn: &Connection, migration: &Migration) -> StoreResult<()> {
    info!(
        version = migration.version,
        description = migration.description,
        "applying migration"
    );

    // `conn.transaction()` needs `&mut Connection`, so the transaction is
    // managed by hand.
    conn.execute_batch("BEGIN IMMEDIATE;")
        .map_err(|e| StoreError::Migration {
            version: migration.version,
            message: format!("failed to begin transaction: {e}"),
        })?;

    let result = (|| -> StoreResult<()> {
        conn.execute_batch(migration.sql)
            .map_err(|e| StoreError::Migration {
                version: migration.version,
                message: format!("SQL execution failed: {e}"),
            })?;

        let now = chrono::Utc::now().timestamp();
        conn.execute(
            "INSERT INTO _migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![migration.version, migration.description, now],
        )
        .map_err(|e| StoreError::Migration {
            version: migration.version,
            message: format!("failed to record migration: {e}"),
        })?;

        Ok(())
    })();

    match &result {
        Ok(()) => {
            conn.execute_batch("COMMIT;")
                .map_err(|e| StoreError::Migration {
                    version: migration.version,
                    message: format!("failed to commit: {e}"),
                })?;
            info!(version = migration.version, "migration applied");
        }
        Err(err) => {
            warn!(version = migration.version, %err, "migration failed, rolling back");
            let _ = conn.execute_batch("ROLLBACK;");
        }
    }

    result
}

// ── tests ────────────────────────────────────────────────────────────
