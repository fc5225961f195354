//! Key-value store for user settings.
//!
//! Holds the category list and the grid layout preference, one row per
//! [`SettingName`], with the value stored as JSON text. Writes overwrite
//! the whole value; there is no partial merge.

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, instrument};

use crate::db::Database;
use crate::error::StoreResult;
use crate::model::{Setting, SettingName};

/// Persistent store for the two named settings.
#[derive(Clone)]
pub struct SettingsStore {
    db: Database,
}

impl SettingsStore {
    /// Create a new settings store backed by `db`.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get a setting, returning `None` if it has never been written.
    #[instrument(skip(self))]
    pub async fn get(&self, name: SettingName) -> StoreResult<Option<Setting>> {
        self.db
            .execute(move |conn| {
                let raw: Option<String> = conn
                    .query_row(
                        "SELECT value FROM settings WHERE name = ?1",
                        rusqlite::params![name.as_str()],
                        |row| row.get(0),
                    )
                    .optional()?;
                raw.map(|raw| Setting::from_json(name, &raw)).transpose()
            })
            .await
    }

    /// Overwrite a setting.
    #[instrument(skip(self, setting), fields(name = %setting.name()))]
    pub async fn put(&self, setting: &Setting) -> StoreResult<()> {
        let setting = setting.clone();
        self.db.execute(move |conn| put_in(conn, &setting)).await
    }

    /// Remove every setting.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> StoreResult<()> {
        self.db.execute(clear_in).await
    }

    /// The stored category list, if any.
    pub async fn categories(&self) -> StoreResult<Option<Vec<String>>> {
        Ok(match self.get(SettingName::Categories).await? {
            Some(Setting::Categories(list)) => Some(list),
            _ => None,
        })
    }

    /// The stored grid density, if any.
    pub async fn grid_columns(&self) -> StoreResult<Option<crate::model::GridColumns>> {
        Ok(match self.get(SettingName::GridColumns).await? {
            Some(Setting::GridColumns(cols)) => Some(cols),
            _ => None,
        })
    }
}

// ── connection-level helpers (usable inside a transaction) ───────────

pub(crate) fn put_in(conn: &Connection, setting: &Setting) -> StoreResult<()> {
    let name = setting.name().as_str();
    let value = setting.to_json()?;
    conn.execute(
        "INSERT INTO settings (name, value) VALUES (?1, ?2) \
         ON CONFLICT(name) DO UPDATE SET value = excluded.value",
        rusqlite::params![name, value],
    )?;
    debug!(name, "setting updated");
    Ok(())
}

pub(crate) fn clear_in(conn: &Connection) -> StoreResult<()> {
    conn.execute("DELETE FROM settings", [])?;
    debug!("settings cleared");
    Ok(())
}

// ── tests ────────────────────────────────────────────────────────────
