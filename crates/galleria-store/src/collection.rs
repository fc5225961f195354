//! The collection service: the one entry point the presentation layer uses.
//!
//! [`CollectionService`] owns the in-memory view (records newest first,
//! the category list, and the grid density) and keeps it consistent with
//! the durable stores. Every mutation is confirmed by the store before the
//! view changes. The view's write lock is held across the durable call, so
//! mutations issued through one service apply one at a time.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Duration;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::backup;
use crate::clock::{Clock, SystemClock};
use crate::error::{StoreError, StoreResult};
use crate::filter::{PromptFilter, filter_prompts, partition_favorites};
use crate::lifecycle::StoreLifecycle;
use crate::model::{GridColumns, Prompt, PromptDraft, Setting, Snapshot};
use crate::prompt_store::{self, PromptStore};
use crate::samples::{default_categories, sample_prompts};
use crate::settings_store::{self, SettingsStore};

/// What the presentation layer renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewState {
    /// Records, newest `created_at` first.
    prompts: Vec<Prompt>,
    categories: Vec<String>,
    grid_columns: GridColumns,
    /// Set when `load` could not read the store and fell back to samples.
    degraded: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            prompts: Vec::new(),
            categories: default_categories(),
            grid_columns: GridColumns::default(),
            degraded: false,
        }
    }
}

impl ViewState {
    fn position(&self, id: &str) -> Option<usize> {
        self.prompts.iter().position(|p| p.id == id)
    }
}

/// Counts reported after a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub prompts: usize,
    pub categories: usize,
}

/// Mediates every read and write between the presentation layer and the
/// durable stores.
pub struct CollectionService {
    lifecycle: StoreLifecycle,
    clock: Arc<dyn Clock>,
    state: RwLock<ViewState>,
}

impl CollectionService {
    /// Create a service over `lifecycle` using the system clock.
    ///
    /// Nothing is read until [`load`](Self::load) is called.
    pub fn new(lifecycle: StoreLifecycle) -> Self {
        Self::with_clock(lifecycle, Arc::new(SystemClock))
    }

    pub fn with_clock(lifecycle: StoreLifecycle, clock: Arc<dyn Clock>) -> Self {
        Self {
            lifecycle,
            clock,
            state: RwLock::new(ViewState::default()),
        }
    }

    pub fn lifecycle(&self) -> &StoreLifecycle {
        &self.lifecycle
    }

    async fn stores(&self) -> StoreResult<(PromptStore, SettingsStore)> {
        let db = self.lifecycle.open().await?;
        Ok((PromptStore::new(db.clone()), SettingsStore::new(db)))
    }

    // ── reads ────────────────────────────────────────────────────────

    /// Current records, newest first.
    pub async fn prompts(&self) -> Vec<Prompt> {
        self.state.read().await.prompts.clone()
    }

    /// A record from the view by id.
    pub async fn get(&self, id: &str) -> Option<Prompt> {
        let state = self.state.read().await;
        state.position(id).map(|i| state.prompts[i].clone())
    }

    pub async fn categories(&self) -> Vec<String> {
        self.state.read().await.categories.clone()
    }

    pub async fn grid_columns(&self) -> GridColumns {
        self.state.read().await.grid_columns
    }

    /// Whether the view is an in-memory fallback rather than durable data.
    pub async fn is_degraded(&self) -> bool {
        self.state.read().await.degraded
    }

    /// Records in the view matching `filter`, newest first.
    pub async fn search(&self, filter: &PromptFilter) -> Vec<Prompt> {
        filter_prompts(&self.state.read().await.prompts, filter)
    }

    /// Records matching `filter`, split into `(favorites, others)`.
    pub async fn search_partitioned(&self, filter: &PromptFilter) -> (Vec<Prompt>, Vec<Prompt>) {
        partition_favorites(self.search(filter).await)
    }

    // ── load ─────────────────────────────────────────────────────────

    /// Populate the view from the store, seeding samples into an empty one.
    ///
    /// If the store cannot be read, the view falls back to the built-in
    /// samples held only in memory and [`is_degraded`](Self::is_degraded)
    /// turns true. Returns the records now in view.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Vec<Prompt> {
        let mut state = self.state.write().await;

        *state = match self.load_durable().await {
            Ok(loaded) => {
                info!(prompts = loaded.prompts.len(), "collection loaded");
                loaded
            }
            Err(err) => {
                warn!(%err, category = err.category(), "store unreadable, showing samples in memory");
                let mut prompts = sample_prompts();
                sort_newest_first(&mut prompts);
                ViewState {
                    prompts,
                    degraded: true,
                    ..ViewState::default()
                }
            }
        };

        state.prompts.clone()
    }

    async fn load_durable(&self) -> StoreResult<ViewState> {
        let (records, settings) = self.stores().await?;

        let mut prompts = records.get_all().await?;
        if prompts.is_empty() {
            info!("store is empty, seeding sample prompts");
            prompts = sample_prompts();
            for prompt in &prompts {
                records.put(prompt).await?;
            }
        }
        sort_newest_first(&mut prompts);

        let categories = match tolerate_corrupt(settings.categories().await)? {
            Some(list) => list,
            None => {
                let list = default_categories();
                settings.put(&Setting::Categories(list.clone())).await?;
                list
            }
        };
        let grid_columns = tolerate_corrupt(settings.grid_columns().await)?.unwrap_or_default();

        Ok(ViewState {
            prompts,
            categories,
            grid_columns,
            degraded: false,
        })
    }

    // ── record mutations ─────────────────────────────────────────────

    /// Create a record from `draft` and put it at the front of the view.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn add(&self, draft: PromptDraft) -> StoreResult<Prompt> {
        draft.validate()?;

        let mut state = self.state.write().await;
        ensure_durable(&state)?;
        let (records, _) = self.stores().await?;

        let id = loop {
            let candidate = Uuid::now_v7().to_string();
            if state.position(&candidate).is_none() && records.get(&candidate).await?.is_none() {
                break candidate;
            }
        };
        let prompt = draft.into_prompt(id, self.clock.now());

        records.put(&prompt).await?;
        state.prompts.insert(0, prompt.clone());

        info!(prompt_id = %prompt.id, "prompt added");
        Ok(prompt)
    }

    /// Save an edited copy of an existing record.
    ///
    /// `id` must already exist in the store. `created_at` is kept from the
    /// stored record and `updated_at` is refreshed; the record keeps its
    /// position in the view.
    #[instrument(skip(self, prompt), fields(prompt_id = %prompt.id))]
    pub async fn update(&self, prompt: Prompt) -> StoreResult<Prompt> {
        prompt.validate()?;
        let mut state = self.state.write().await;
        ensure_durable(&state)?;
        self.save_existing(&mut state, prompt).await
    }

    /// Flip a record's favorite flag.
    #[instrument(skip(self))]
    pub async fn toggle_favorite(&self, id: &str) -> StoreResult<Prompt> {
        let mut state = self.state.write().await;
        ensure_durable(&state)?;
        let (records, _) = self.stores().await?;

        let mut prompt = records.get(id).await?.ok_or_else(|| StoreError::NotFound {
            entity: "prompt",
            id: id.to_string(),
        })?;
        prompt.is_favorite = !prompt.is_favorite;

        self.save_existing(&mut state, prompt).await
    }

    async fn save_existing(&self, state: &mut ViewState, prompt: Prompt) -> StoreResult<Prompt> {
        let (records, _) = self.stores().await?;
        let stored = records
            .get(&prompt.id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                entity: "prompt",
                id: prompt.id.clone(),
            })?;

        let now = self.clock.now();
        let updated_at = if now > stored.updated_at {
            now
        } else {
            stored.updated_at + Duration::nanoseconds(1)
        };
        let saved = Prompt {
            created_at: stored.created_at,
            updated_at,
            ..prompt
        };

        records.put(&saved).await?;
        match state.position(&saved.id) {
            Some(index) => state.prompts[index] = saved.clone(),
            None => {
                state.prompts.push(saved.clone());
                sort_newest_first(&mut state.prompts);
            }
        }

        info!(prompt_id = %saved.id, "prompt updated");
        Ok(saved)
    }

    /// Delete a record. Deleting an unknown id is a no-op.
    ///
    /// Returns whether the record was in the view.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        ensure_durable(&state)?;
        let (records, _) = self.stores().await?;

        records.delete(id).await?;
        let removed = match state.position(id) {
            Some(index) => {
                state.prompts.remove(index);
                true
            }
            None => false,
        };

        info!(prompt_id = %id, removed, "prompt deleted");
        Ok(removed)
    }

    // ── settings ─────────────────────────────────────────────────────

    /// Replace the whole category list.
    ///
    /// Entries must be non-blank and distinct (exact comparison).
    #[instrument(skip(self))]
    pub async fn set_categories(&self, categories: Vec<String>) -> StoreResult<()> {
        validate_categories(&categories)?;

        let mut state = self.state.write().await;
        ensure_durable(&state)?;
        let (_, settings) = self.stores().await?;
        settings
            .put(&Setting::Categories(categories.clone()))
            .await?;
        state.categories = categories;
        Ok(())
    }

    /// Append a category after trimming it.
    pub async fn add_category(&self, name: &str) -> StoreResult<Vec<String>> {
        let name = name.trim();
        let mut categories = self.categories().await;
        if categories.iter().any(|c| c == name) {
            return Err(StoreError::Validation(format!(
                "category '{name}' already exists"
            )));
        }
        categories.push(name.to_string());
        self.set_categories(categories.clone()).await?;
        Ok(categories)
    }

    /// Remove a category by name. Records that use it are left unchanged.
    ///
    /// Returns whether the category was present.
    pub async fn remove_category(&self, name: &str) -> StoreResult<bool> {
        let mut categories = self.categories().await;
        let Some(index) = categories.iter().position(|c| c == name) else {
            return Ok(false);
        };
        categories.remove(index);
        self.set_categories(categories).await?;
        Ok(true)
    }

    #[instrument(skip(self))]
    pub async fn set_grid_columns(&self, grid_columns: GridColumns) -> StoreResult<()> {
        let mut state = self.state.write().await;
        ensure_durable(&state)?;
        let (_, settings) = self.stores().await?;
        settings.put(&Setting::GridColumns(grid_columns)).await?;
        state.grid_columns = grid_columns;
        Ok(())
    }

    // ── bulk operations ──────────────────────────────────────────────

    /// The current records (newest first) and categories.
    pub async fn export_snapshot(&self) -> Snapshot {
        let state = self.state.read().await;
        Snapshot {
            prompts: state.prompts.clone(),
            categories: state.categories.clone(),
        }
    }

    /// Write a backup file named for `app_name` and today's date into `dir`.
    ///
    /// Refused while the view is degraded, since the samples on screen are
    /// not the user's data.
    pub async fn export_to_dir(&self, dir: &Path, app_name: &str) -> StoreResult<PathBuf> {
        ensure_durable(&*self.state.read().await)?;
        let snapshot = self.export_snapshot().await;
        let file_name = backup::backup_file_name(app_name, self.clock.now().date_naive());
        backup::write_to_dir(dir, &file_name, &snapshot).await
    }

    /// Replace the whole collection with the contents of `blob`.
    ///
    /// The blob is validated first; a malformed one fails with
    /// [`StoreError::ImportFormat`] and changes nothing. On success both
    /// stores are cleared and rewritten in one transaction. Records absent
    /// from the snapshot are gone. Without a `categories` field the default
    /// list is used. The grid preference returns to its default because the
    /// settings table is cleared.
    #[instrument(skip(self, blob), fields(bytes = blob.len()))]
    pub async fn import_snapshot(&self, blob: &str) -> StoreResult<ImportSummary> {
        let parsed = backup::parse_snapshot(blob)?;
        self.replace_all(parsed).await
    }

    /// Read a backup file and import it.
    pub async fn import_from_file(&self, path: &Path) -> StoreResult<ImportSummary> {
        let parsed = backup::read_file(path).await?;
        self.replace_all(parsed).await
    }

    async fn replace_all(&self, parsed: backup::ParsedSnapshot) -> StoreResult<ImportSummary> {
        if let Some(list) = &parsed.categories {
            validate_categories(list)
                .map_err(|err| StoreError::ImportFormat(format!("'categories': {err}")))?;
        }
        let mut prompts = dedupe_last_wins(parsed.prompts);
        sort_newest_first(&mut prompts);
        let categories = parsed.categories.unwrap_or_else(default_categories);

        let mut state = self.state.write().await;
        let db = self.lifecycle.open().await?;

        let to_write = prompts.clone();
        let category_setting = Setting::Categories(categories.clone());
        db.execute_mut(move |conn| {
            let tx = conn.transaction()?;
            prompt_store::clear_in(&tx)?;
            settings_store::clear_in(&tx)?;
            for prompt in &to_write {
                prompt_store::put_in(&tx, prompt)?;
            }
            settings_store::put_in(&tx, &category_setting)?;
            tx.commit()?;
            Ok(())
        })
        .await?;

        let summary = ImportSummary {
            prompts: prompts.len(),
            categories: categories.len(),
        };
        *state = ViewState {
            prompts,
            categories,
            grid_columns: GridColumns::default(),
            degraded: false,
        };

        info!(prompts = summary.prompts, categories = summary.categories, "snapshot imported");
        Ok(summary)
    }

    /// Erase every record and setting, then restore the default categories.
    ///
    /// Confirmation is the caller's job.
    #[instrument(skip(self))]
    pub async fn reset_all(&self) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let db = self.lifecycle.open().await?;

        let categories = default_categories();
        let category_setting = Setting::Categories(categories.clone());
        db.execute_mut(move |conn| {
            let tx = conn.transaction()?;
            prompt_store::clear_in(&tx)?;
            settings_store::clear_in(&tx)?;
            settings_store::put_in(&tx, &category_setting)?;
            tx.commit()?;
            Ok(())
        })
        .await?;

        *state = ViewState {
            prompts: Vec::new(),
            categories,
            grid_columns: GridColumns::default(),
            degraded: false,
        };

        warn!("all prompts and settings erased");
        Ok(())
    }
}

// ── helpers ──────────────────────────────────────────────────────────

/// Newest `created_at` first; ties broken by id so the order is stable.
fn sort_newest_first(prompts: &mut [Prompt]) {
    prompts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Mutations are refused while the view shows fallback samples. A
/// successful `load`, import or `reset_all` clears the flag.
fn ensure_durable(state: &ViewState) -> StoreResult<()> {
    if state.degraded {
        return Err(StoreError::Unavailable(
            "collection is showing fallback samples; reload before making changes".into(),
        ));
    }
    Ok(())
}

/// A setting that fails to decode is read as absent.
fn tolerate_corrupt<T>(result: StoreResult<Option<T>>) -> StoreResult<Option<T>> {
    match result {
        Err(err @ StoreError::CorruptSetting { .. }) => {
            warn!(%err, "ignoring unreadable setting, using default");
            Ok(None)
        }
        other => other,
    }
}

/// Keep only the last record for each id, as repeated `put`s would.
fn dedupe_last_wins(prompts: Vec<Prompt>) -> Vec<Prompt> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Prompt> = prompts
        .into_iter()
        .rev()
        .filter(|p| seen.insert(p.id.clone()))
        .collect();
    unique.reverse();
    unique
}

fn validate_categories(categories: &[String]) -> StoreResult<()> {
    let mut seen = HashSet::new();
    for name in categories {
        if name.trim().is_empty() {
            return Err(StoreError::Validation("category names cannot be empty".into()));
        }
        if !seen.insert(name.as_str()) {
            return Err(StoreError::Validation(format!(
                "category '{name}' is listed twice"
            )));
        }
    }
    Ok(())
}

// ── tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::clock::SteppingClock;
    use crate::model::parse_timestamp;
    use crate::samples::DEFAULT_CATEGORIES;

    fn start() -> DateTime<Utc> {
        parse_timestamp("2025-06-01T12:00:00Z").unwrap()
    }

    fn service() -> CollectionService {
        CollectionService::with_clock(
            StoreLifecycle::in_memory(),
            Arc::new(SteppingClock::new(start(), Duration::seconds(1))),
        )
    }

    fn draft(title: &str) -> PromptDraft {
        PromptDraft {
            title: title.into(),
            prompt: format!("{title} prompt text"),
            image_url: "data:image/png;base64,AAAA".into(),
            category: Some("Otro".into()),
            tags: None,
            is_favorite: false,
        }
    }

    async fn durable_prompts(service: &CollectionService) -> Vec<Prompt> {
        let db = service.lifecycle().open().await.unwrap();
        PromptStore::new(db).get_all().await.unwrap()
    }

    #[tokio::test]
    async fn load_seeds_empty_store_with_samples() {
        let service = service();
        let loaded = service.load().await;

        let samples = sample_prompts();
        assert_eq!(loaded.len(), samples.len());
        assert!(!service.is_degraded().await);

        let durable = durable_prompts(&service).await;
        assert_eq!(durable, samples);
        assert_eq!(service.categories().await, default_categories());
    }

    #[tokio::test]
    async fn load_presents_newest_first() {
        let service = service();
        let loaded = service.load().await;
        assert!(
            loaded
                .windows(2)
                .all(|w| w[0].created_at >= w[1].created_at)
        );
    }

    #[tokio::test]
    async fn load_falls_back_when_store_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let lifecycle = StoreLifecycle::at_path(dir.path().join("missing").join("g.db"));
        let service = CollectionService::new(lifecycle);

        let loaded = service.load().await;
        assert_eq!(loaded.len(), sample_prompts().len());
        assert!(service.is_degraded().await);

        let err = service.add(draft("Offline")).await.unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(service.prompts().await.len(), sample_prompts().len());
    }

    #[tokio::test]
    async fn degraded_view_refuses_changes_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let lifecycle = StoreLifecycle::at_path(dir.path().join("missing").join("g.db"));
        let service = CollectionService::new(lifecycle);
        service.load().await;
        assert!(service.is_degraded().await);

        let shown = service.prompts().await[0].clone();
        assert!(service.toggle_favorite(&shown.id).await.unwrap_err().is_unavailable());
        assert!(service.update(shown.clone()).await.unwrap_err().is_unavailable());
        assert!(service.delete(&shown.id).await.unwrap_err().is_unavailable());
        assert!(service.add_category("Nuevo").await.unwrap_err().is_unavailable());
        assert!(
            service
                .set_grid_columns(GridColumns::Three)
                .await
                .unwrap_err()
                .is_unavailable()
        );
        assert!(
            service
                .export_to_dir(dir.path(), "galleria")
                .await
                .unwrap_err()
                .is_unavailable()
        );

        assert_eq!(service.prompts().await.len(), sample_prompts().len());
        assert_eq!(service.categories().await, default_categories());
        assert_eq!(service.grid_columns().await, GridColumns::default());
    }

    #[tokio::test]
    async fn load_reads_corrupt_settings_as_defaults_and_keeps_records() {
        let service = service();
        let db = service.lifecycle().open().await.unwrap();
        PromptStore::new(db.clone())
            .put(&draft("Mine").into_prompt("user-1".into(), start()))
            .await
            .unwrap();
        db.execute(|conn| {
            conn.execute(
                "INSERT INTO settings (name, value) VALUES ('gridColumns', '7'), ('categories', 'not json')",
                [],
            )?;
            Ok(())
        })
        .await
        .unwrap();

        let loaded = service.load().await;
        assert!(!service.is_degraded().await);
        assert_eq!(loaded.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), ["user-1"]);
        assert_eq!(service.grid_columns().await, GridColumns::default());
        assert_eq!(service.categories().await, default_categories());

        let toggled = service.toggle_favorite("user-1").await.unwrap();
        assert!(toggled.is_favorite);
        let added = service.add(draft("Second")).await.unwrap();

        let mut view = service.prompts().await;
        view.sort_by(|a, b| a.id.cmp(&b.id));
        let mut durable = durable_prompts(&service).await;
        durable.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(view, durable);
        assert!(durable.iter().any(|p| p.id == added.id));
    }

    #[tokio::test]
    async fn add_assigns_unique_id_and_equal_timestamps() {
        let service = service();
        service.load().await;

        let a = service.add(draft("First")).await.unwrap();
        let b = service.add(draft("Second")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
        assert!(sample_prompts().iter().all(|p| p.id != a.id && p.id != b.id));

        let view = service.prompts().await;
        assert_eq!(view[0].id, b.id);
        assert_eq!(view[1].id, a.id);
        assert_eq!(durable_prompts(&service).await.len(), sample_prompts().len() + 2);
    }

    #[tokio::test]
    async fn add_rejects_incomplete_draft_without_writing() {
        let service = service();
        service.load().await;
        let before = durable_prompts(&service).await;

        let mut incomplete = draft("No image");
        incomplete.image_url.clear();
        let err = service.add(incomplete).await.unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(durable_prompts(&service).await, before);
        assert_eq!(service.prompts().await.len(), before.len());
    }

    #[tokio::test]
    async fn update_preserves_identity_and_advances_updated_at() {
        let service = service();
        service.load().await;
        let original = service.prompts().await[2].clone();

        let mut edited = original.clone();
        edited.title = "Edited".into();
        edited.created_at = start();
        let saved = service.update(edited).await.unwrap();

        assert_eq!(saved.id, original.id);
        assert_eq!(saved.created_at, original.created_at);
        assert!(saved.updated_at > original.updated_at);

        let view = service.prompts().await;
        assert_eq!(view[2], saved);
        assert_eq!(
            PromptStore::new(service.lifecycle().open().await.unwrap())
                .get(&saved.id)
                .await
                .unwrap(),
            Some(saved)
        );
    }

    #[tokio::test]
    async fn update_strictly_advances_even_when_clock_lags() {
        let lagging = parse_timestamp("2000-01-01T00:00:00Z").unwrap();
        let service = CollectionService::with_clock(
            StoreLifecycle::in_memory(),
            Arc::new(SteppingClock::new(lagging, Duration::zero())),
        );
        service.load().await;
        let original = service.prompts().await[0].clone();

        let saved = service.update(original.clone()).await.unwrap();
        assert!(saved.updated_at > original.updated_at);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let service = service();
        service.load().await;

        let stranger = draft("Stranger").into_prompt("nope".into(), start());
        let err = service.update(stranger).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn toggle_favorite_flips_and_persists() {
        let service = service();
        service.load().await;
        let target = service.prompts().await[1].clone();

        let toggled = service.toggle_favorite(&target.id).await.unwrap();
        assert_eq!(toggled.is_favorite, !target.is_favorite);
        assert!(toggled.updated_at > target.updated_at);
        assert_eq!(service.get(&target.id).await, Some(toggled.clone()));

        let back = service.toggle_favorite(&target.id).await.unwrap();
        assert_eq!(back.is_favorite, target.is_favorite);
    }

    #[tokio::test]
    async fn delete_twice_is_idempotent() {
        let service = service();
        service.load().await;
        let id = service.prompts().await[0].id.clone();

        assert!(service.delete(&id).await.unwrap());
        let after_first = (service.prompts().await, durable_prompts(&service).await);

        assert!(!service.delete(&id).await.unwrap());
        let after_second = (service.prompts().await, durable_prompts(&service).await);

        assert_eq!(after_first, after_second);
        assert!(after_second.1.iter().all(|p| p.id != id));
    }

    #[tokio::test]
    async fn categories_replace_wholesale_and_persist() {
        let service = service();
        service.load().await;

        service
            .set_categories(vec!["B".into(), "A".into()])
            .await
            .unwrap();
        assert_eq!(service.categories().await, vec!["B", "A"]);

        let settings = SettingsStore::new(service.lifecycle().open().await.unwrap());
        assert_eq!(
            settings.categories().await.unwrap(),
            Some(vec!["B".to_string(), "A".to_string()])
        );
    }

    #[tokio::test]
    async fn set_categories_rejects_blank_and_duplicates() {
        let service = service();
        service.load().await;

        assert!(matches!(
            service.set_categories(vec!["A".into(), "  ".into()]).await,
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            service.set_categories(vec!["A".into(), "A".into()]).await,
            Err(StoreError::Validation(_))
        ));
        assert_eq!(service.categories().await, default_categories());
    }

    #[tokio::test]
    async fn add_and_remove_category() {
        let service = service();
        service.load().await;

        let list = service.add_category("  Abstracto ").await.unwrap();
        assert_eq!(list.last().map(String::as_str), Some("Abstracto"));
        assert!(matches!(
            service.add_category("Abstracto").await,
            Err(StoreError::Validation(_))
        ));

        assert!(service.remove_category("Paisajes").await.unwrap());
        assert!(!service.remove_category("Paisajes").await.unwrap());
        // Records keep their now-orphaned category.
        assert!(
            service
                .prompts()
                .await
                .iter()
                .any(|p| p.category.as_deref() == Some("Paisajes"))
        );
    }

    #[tokio::test]
    async fn grid_columns_persist_across_loads() {
        let service = service();
        service.load().await;
        assert_eq!(service.grid_columns().await, GridColumns::Two);

        service.set_grid_columns(GridColumns::Four).await.unwrap();

        let reloaded = CollectionService::new(service.lifecycle().clone());
        reloaded.load().await;
        assert_eq!(reloaded.grid_columns().await, GridColumns::Four);
    }

    #[tokio::test]
    async fn export_then_import_round_trips() {
        let service = service();
        service.load().await;
        service.add(draft("Extra")).await.unwrap();
        service.toggle_favorite("sample-3").await.unwrap();
        service
            .set_categories(vec!["Otro".into(), "Paisajes".into()])
            .await
            .unwrap();

        let exported = service.export_snapshot().await;
        let blob = backup::to_json(&exported).unwrap();

        service.reset_all().await.unwrap();
        let summary = service.import_snapshot(&blob).await.unwrap();

        assert_eq!(summary.prompts, exported.prompts.len());
        assert_eq!(service.export_snapshot().await, exported);

        let mut durable = durable_prompts(&service).await;
        sort_newest_first(&mut durable);
        assert_eq!(durable, exported.prompts);
    }

    #[tokio::test]
    async fn import_without_prompts_changes_nothing() {
        let service = service();
        service.load().await;
        let before_view = service.export_snapshot().await;
        let before_durable = durable_prompts(&service).await;

        let err = service
            .import_snapshot(r#"{"categories":["X"]}"#)
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::ImportFormat(_)));
        assert_eq!(service.export_snapshot().await, before_view);
        assert_eq!(durable_prompts(&service).await, before_durable);
    }

    #[tokio::test]
    async fn import_rejects_blank_or_repeated_categories() {
        let service = service();
        service.load().await;
        let before = service.export_snapshot().await;

        for categories in [r#"["A","A"]"#, r#"["A",""]"#, r#"["A","  "]"#] {
            let blob = format!(r#"{{"prompts": [], "categories": {categories}}}"#);
            let err = service.import_snapshot(&blob).await.unwrap_err();
            assert!(matches!(err, StoreError::ImportFormat(_)), "{categories}: {err}");
        }

        assert_eq!(service.export_snapshot().await, before);
        let db = service.lifecycle().open().await.unwrap();
        assert_eq!(
            SettingsStore::new(db).categories().await.unwrap(),
            Some(default_categories())
        );
    }

    #[tokio::test]
    async fn import_replaces_instead_of_merging() {
        let service = service();
        service.load().await;

        let blob = r#"{
            "prompts": [
                {"id": "x1", "title": "Old", "prompt": "p", "imageUrl": "i",
                 "createdAt": "2023-01-01T00:00:00Z", "updatedAt": "2023-01-01T00:00:00Z"},
                {"id": "x2", "title": "New", "prompt": "p", "imageUrl": "i",
                 "createdAt": "2023-06-01T00:00:00Z", "updatedAt": "2023-06-01T00:00:00Z"},
                {"id": "x1", "title": "Old, edited", "prompt": "p", "imageUrl": "i",
                 "createdAt": "2023-01-01T00:00:00Z", "updatedAt": "2023-02-01T00:00:00Z"}
            ]
        }"#;
        let summary = service.import_snapshot(blob).await.unwrap();

        assert_eq!(summary.prompts, 2);
        let view = service.prompts().await;
        assert_eq!(
            view.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            vec!["x2", "x1"]
        );
        assert_eq!(view[1].title, "Old, edited");
        assert_eq!(service.categories().await, default_categories());
        assert_eq!(durable_prompts(&service).await.len(), 2);
    }

    #[tokio::test]
    async fn reset_clears_records_and_restores_default_categories() {
        let service = service();
        service.load().await;
        service.set_categories(vec!["Only".into()]).await.unwrap();
        service.set_grid_columns(GridColumns::Three).await.unwrap();

        service.reset_all().await.unwrap();

        assert!(service.prompts().await.is_empty());
        assert!(durable_prompts(&service).await.is_empty());

        let settings = SettingsStore::new(service.lifecycle().open().await.unwrap());
        let expected: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
        assert_eq!(settings.categories().await.unwrap(), Some(expected.clone()));
        assert_eq!(settings.grid_columns().await.unwrap(), None);
        assert_eq!(service.categories().await, expected);
        assert_eq!(service.grid_columns().await, GridColumns::Two);
    }

    #[tokio::test]
    async fn search_filters_current_view() {
        let service = service();
        service.load().await;

        let found = service.search(&PromptFilter::text("CYBERPUNK")).await;
        assert_eq!(
            found.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            vec!["sample-3"]
        );

        let (favorites, others) = service
            .search_partitioned(&PromptFilter::default())
            .await;
        assert!(favorites.iter().all(|p| p.is_favorite));
        assert!(others.iter().all(|p| !p.is_favorite));
        assert_eq!(favorites.len() + others.len(), sample_prompts().len());
    }

    #[tokio::test]
    async fn export_to_dir_uses_dated_file_name() {
        let service = service();
        service.load().await;
        let dir = tempfile::tempdir().unwrap();

        let path = service.export_to_dir(dir.path(), "galleria").await.unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("galleria-backup-2025-06-01.json")
        );

        let fresh = CollectionService::new(StoreLifecycle::in_memory());
        fresh.import_from_file(&path).await.unwrap();
        assert_eq!(fresh.prompts().await, service.prompts().await);
    }

    #[test]
    fn dedupe_keeps_last_occurrence() {
        let ts = start();
        let mut first = draft("A").into_prompt("same".into(), ts);
        first.title = "first".into();
        let mut last = first.clone();
        last.title = "last".into();
        let other = draft("B").into_prompt("other".into(), ts);

        let unique = dedupe_last_wins(vec![first, other, last]);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[1].title, "last");
    }
}
