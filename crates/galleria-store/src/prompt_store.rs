//! Durable storage for prompt records.
//!
//! Records are keyed by `id`; `get_all` returns them ascending by
//! `created_at` through the `idx_prompts_created_at` index. Every
//! operation is atomic per record, and `clear` is atomic for the whole
//! table.

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, instrument};

use crate::db::Database;
use crate::error::{StoreError, StoreResult};
use crate::model::{Prompt, format_timestamp, parse_timestamp};

const SELECT_COLUMNS: &str = "SELECT id, title, prompt, image_url, category, tags, is_favorite, created_at, updated_at FROM prompts";

// ═══════════════════════════════════════════════════════════════════════
//  PromptStore
// ═══════════════════════════════════════════════════════════════════════

/// CRUD operations on prompt records.
#[derive(Clone)]
pub struct PromptStore {
    db: Database,
}

impl PromptStore {
    /// Create a new prompt store backed by `db`.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All records, oldest first. Empty when the store has none.
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> StoreResult<Vec<Prompt>> {
        self.db
            .execute(|conn| {
                let mut stmt =
                    conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY created_at ASC, id ASC"))?;
                let rows = stmt
                    .query_map([], PromptRow::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows.into_iter().map(PromptRow::into_prompt).collect()
            })
            .await
    }

    /// Fetch a single record by id, returning `None` if not found.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> StoreResult<Option<Prompt>> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                let row = conn
                    .query_row(
                        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                        rusqlite::params![id],
                        PromptRow::from_row,
                    )
                    .optional()?;
                row.map(PromptRow::into_prompt).transpose()
            })
            .await
    }

    /// Insert or replace a record keyed by its id (last write wins).
    #[instrument(skip(self, prompt), fields(prompt_id = %prompt.id))]
    pub async fn put(&self, prompt: &Prompt) -> StoreResult<()> {
        let prompt = prompt.clone();
        self.db.execute(move |conn| put_in(conn, &prompt)).await
    }

    /// Remove a record. Absent ids are a no-op.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                let deleted =
                    conn.execute("DELETE FROM prompts WHERE id = ?1", rusqlite::params![id])?;
                debug!(prompt_id = %id, deleted, "prompt delete");
                Ok(())
            })
            .await
    }

    /// Remove every record.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> StoreResult<()> {
        self.db.execute(clear_in).await
    }

    /// Number of stored records.
    pub async fn count(&self) -> StoreResult<usize> {
        self.db
            .execute(|conn| {
                let count: i64 =
                    conn.query_row("SELECT count(*) FROM prompts", [], |row| row.get(0))?;
                Ok(count as usize)
            })
            .await
    }
}

// ── connection-level helpers (usable inside a transaction) ───────────

/// Upsert `prompt` on `conn`.
pub(crate) fn put_in(conn: &Connection, prompt: &Prompt) -> StoreResult<()> {
    let tags = prompt.tags.as_ref().map(serde_json::to_string).transpose()?;
    conn.execute(
        "INSERT INTO prompts (id, title, prompt, image_url, category, tags, is_favorite, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
         ON CONFLICT(id) DO UPDATE SET \
            title = excluded.title, prompt = excluded.prompt, image_url = excluded.image_url, \
            category = excluded.category, tags = excluded.tags, is_favorite = excluded.is_favorite, \
            created_at = excluded.created_at, updated_at = excluded.updated_at",
        rusqlite::params![
            prompt.id,
            prompt.title,
            prompt.prompt,
            prompt.image_url,
            prompt.category,
            tags,
            prompt.is_favorite,
            format_timestamp(&prompt.created_at),
            format_timestamp(&prompt.updated_at),
        ],
    )?;
    debug!(prompt_id = %prompt.id, "prompt stored");
    Ok(())
}

/// Delete every row of the prompts table on `conn`.
pub(crate) fn clear_in(conn: &Connection) -> StoreResult<()> {
    let removed = conn.execute("DELETE FROM prompts", [])?;
    debug!(removed, "prompts cleared");
    Ok(())
}

// ── row mapping ──────────────────────────────────────────────────────

/// Raw column values before JSON and timestamp decoding.
struct PromptRow {
    id: String,
    title: String,
    prompt: String,
    image_url: String,
    category: Option<String>,
    tags: Option<String>,
    is_favorite: bool,
    created_at: String,
    updated_at: String,
}

impl PromptRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            prompt: row.get(2)?,
            image_url: row.get(3)?,
            category: row.get(4)?,
            tags: row.get(5)?,
            is_favorite: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn into_prompt(self) -> StoreResult<Prompt> {
        let tags = self
            .tags
            .as_deref()
            .map(serde_json::from_str::<Vec<String>>)
            .transpose()?;
        let timestamp = |column: usize, raw: &str| {
            parse_timestamp(raw).map_err(|e| {
                StoreError::Sqlite(rusqlite::Error::FromSqlConversionFailure(
                    column,
                    Type::Text,
                    Box::new(e),
                ))
            })
        };

        Ok(Prompt {
            created_at: timestamp(7, &self.created_at)?,
            updated_at: timestamp(8, &self.updated_at)?,
            id: self.id,
            title: self.title,
            prompt: self.prompt,
            image_url: self.image_url,
            category: self.category,
            tags,
            is_favorite: self.is_favorite,
        })
    }
}

// ── tests ────────────────────────────────────────────────────────────
