//! Error types for the galleria-store crate.
//!
//! All storage and collection operations return [`StoreError`] via
//! [`StoreResult`]. Infrastructure failures (SQLite, the blocking pool,
//! migrations) are reported as "store unavailable" by
//! [`StoreError::is_unavailable`], which is what the presentation layer
//! keys its degraded mode on.

use thiserror::Error;

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the storage engine or the collection service.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The persistence medium could not be opened.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// SQLite operation failed.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a backup file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A schema migration failed.
    #[error("migration v{version} failed: {message}")]
    Migration { version: u32, message: String },

    /// The requested record was not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A draft or edit is missing a required field.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An imported snapshot does not have the export shape.
    #[error("invalid import file: {0}")]
    ImportFormat(String),

    /// A stored setting value does not match its declared shape.
    #[error("setting '{name}' is corrupt: {message}")]
    CorruptSetting { name: &'static str, message: String },

    /// A blocking task was cancelled or panicked.
    #[error("background task failed: {0}")]
    TaskJoin(String),
}

impl StoreError {
    /// Whether this error means the durable store cannot be used right now.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::Sqlite(_) | Self::Migration { .. } | Self::TaskJoin(_)
        )
    }

    /// Short stable label for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Unavailable(_) | Self::Sqlite(_) | Self::Migration { .. } | Self::TaskJoin(_) => {
                "store_unavailable"
            }
            Self::Json(_) | Self::CorruptSetting { .. } => "corrupt_data",
            Self::Io(_) => "io",
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation",
            Self::ImportFormat(_) => "import_format",
        }
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskJoin(err.to_string())
    }
}
