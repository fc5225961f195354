//! One-time store initialization.
//!
//! [`StoreLifecycle`] hands out a single shared [`Database`] handle. The
//! first caller opens the medium and runs migrations; concurrent callers
//! await that same initialization through a `tokio::sync::OnceCell`. A
//! failed open leaves the cell empty so a later call can retry.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::db::Database;
use crate::error::{StoreError, StoreResult};
use crate::migration;

/// Where the durable store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A SQLite file on disk.
    Path(PathBuf),
    /// A private in-memory database, gone when the process exits.
    InMemory,
}

/// Lazily opens and migrates the store exactly once.
///
/// Clones share the same initialization state.
#[derive(Debug, Clone)]
pub struct StoreLifecycle {
    location: StoreLocation,
    handle: Arc<OnceCell<Database>>,
}

impl StoreLifecycle {
    pub fn new(location: StoreLocation) -> Self {
        Self {
            location,
            handle: Arc::new(OnceCell::new()),
        }
    }

    /// Lifecycle for a SQLite file at `path`.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self::new(StoreLocation::Path(path.into()))
    }

    /// Lifecycle for an in-memory database.
    pub fn in_memory() -> Self {
        Self::new(StoreLocation::InMemory)
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Whether the store has been opened successfully.
    pub fn is_open(&self) -> bool {
        self.handle.initialized()
    }

    /// Return the ready handle, opening and migrating on first use.
    ///
    /// Fails with [`StoreError::Unavailable`] if the medium cannot be
    /// opened or brought to the current schema.
    pub async fn open(&self) -> StoreResult<Database> {
        let db = self
            .handle
            .get_or_try_init(|| Self::initialize(self.location.clone()))
            .await?;
        Ok(db.clone())
    }

    /// Applied schema version; 0 if the store has not been opened.
    pub async fn schema_version(&self) -> StoreResult<u32> {
        match self.handle.get() {
            Some(db) => db.execute(|conn| migration::current_version(conn)).await,
            None => Ok(0),
        }
    }

    async fn initialize(location: StoreLocation) -> StoreResult<Database> {
        info!(?location, "initializing store");

        let db = tokio::task::spawn_blocking(move || match &location {
            StoreLocation::Path(path) => Database::open(path),
            StoreLocation::InMemory => Database::open_in_memory(),
        })
        .await?
        .map_err(|err| {
            warn!(%err, "store could not be opened");
            StoreError::Unavailable(err.to_string())
        })?;

        db.run_migrations().await.map_err(|err| {
            warn!(%err, "store could not be migrated");
            StoreError::Unavailable(err.to_string())
        })?;

        info!(version = migration::LATEST_VERSION, "store ready");
        Ok(db)
    }
}

// ── tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn version_is_zero_before_open() {
        let lifecycle = StoreLifecycle::in_memory();
        assert!(!lifecycle.is_open());
        assert_eq!(lifecycle.schema_version().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn open_migrates_to_latest() {
        let lifecycle = StoreLifecycle::in_memory();
        lifecycle.open().await.unwrap();

        assert!(lifecycle.is_open());
        assert_eq!(
            lifecycle.schema_version().await.unwrap(),
            migration::LATEST_VERSION
        );
    }

    #[tokio::test]
    async fn repeated_open_returns_same_handle() {
        let lifecycle = StoreLifecycle::in_memory();
        let first = lifecycle.open().await.unwrap();
        let second = lifecycle.open().await.unwrap();
        assert!(first.same_handle(&second));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_open_initializes_once() {
        let lifecycle = StoreLifecycle::in_memory();

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let lifecycle = lifecycle.clone();
                tokio::spawn(async move { lifecycle.open().await })
            })
            .collect();

        let mut handles = Vec::new();
        for task in tasks {
            handles.push(task.await.unwrap().unwrap());
        }
        assert!(handles.windows(2).all(|w| w[0].same_handle(&w[1])));
    }

    #[tokio::test]
    async fn unopenable_path_is_unavailable_and_retryable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let lifecycle = StoreLifecycle::at_path(missing.join("galleria.db"));

        let err = lifecycle.open().await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(!lifecycle.is_open());

        std::fs::create_dir_all(&missing).unwrap();
        lifecycle.open().await.unwrap();
        assert!(lifecycle.is_open());
    }
}
