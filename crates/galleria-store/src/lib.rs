//! # galleria-store
//!
//! Local persistence for the Galleria prompt gallery.
//!
//! Stores prompt records (text, image handle, metadata) and user settings
//! in SQLite, and keeps an in-memory view consistent with that durable
//! state across create, update, delete, import, export, and reset.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  CollectionService (in-memory view)     │
//! ├──────────────────┬──────────────────────┤
//! │  PromptStore     │  SettingsStore       │
//! ├──────────────────┴──────────────────────┤
//! │  StoreLifecycle (open + migrate once)   │
//! │  Database (rusqlite WAL)                │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Quick start
//!
//! ```ignore
//! use galleria_store::{CollectionService, PromptFilter, StoreLifecycle};
//!
//! let service = CollectionService::new(StoreLifecycle::at_path("data/galleria.db"));
//! service.load().await;
//! let cyberpunk = service.search(&PromptFilter::text("cyberpunk")).await;
//! ```

pub mod backup;
pub mod clock;
pub mod collection;
pub mod db;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod migration;
pub mod model;
pub mod prompt_store;
pub mod samples;
pub mod settings_store;

// ── re-exports ───────────────────────────────────────────────────────

pub use backup::{ParsedSnapshot, backup_file_name};
pub use clock::{Clock, SteppingClock, SystemClock};
pub use collection::{CollectionService, ImportSummary};
pub use db::Database;
pub use error::{StoreError, StoreResult};
pub use filter::{PromptFilter, filter_prompts, partition_favorites};
pub use lifecycle::{StoreLifecycle, StoreLocation};
pub use model::{GridColumns, Prompt, PromptDraft, Setting, SettingName, Snapshot};
pub use prompt_store::PromptStore;
pub use samples::{DEFAULT_CATEGORIES, default_categories, sample_prompts};
pub use settings_store::SettingsStore;
