//! CLI argument definitions for Galleria.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Galleria -- a personal gallery of image-generation prompts.
#[derive(Parser)]
#[command(
    name = "galleria",
    version,
    about = "Galleria -- your collection of AI image prompts",
    long_about = "Store, favorite, search, and back up the prompts you use for AI image \
                  generation. Everything lives in a local SQLite file."
)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Override the database path from the configuration file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List prompts, newest first.
    List {
        /// Case-insensitive text matched against title, prompt, and category.
        #[arg(long, short)]
        search: Option<String>,

        /// Only show prompts in this category (exact match).
        #[arg(long, short)]
        category: Option<String>,

        /// Only show favorites.
        #[arg(long, short)]
        favorites: bool,
    },

    /// Show one prompt in full.
    Show {
        /// The prompt id.
        id: String,
    },

    /// Add a new prompt.
    Add {
        #[arg(long, short)]
        title: String,

        /// The prompt text.
        #[arg(long, short)]
        prompt: String,

        #[arg(long, short)]
        category: String,

        /// Image URL or data URI.
        #[arg(long, short)]
        image: String,

        /// Optional tags (repeatable).
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Edit an existing prompt. Omitted fields keep their value.
    Edit {
        /// The prompt id.
        id: String,

        #[arg(long, short)]
        title: Option<String>,

        #[arg(long, short)]
        prompt: Option<String>,

        #[arg(long, short)]
        category: Option<String>,

        #[arg(long, short)]
        image: Option<String>,
    },

    /// Toggle the favorite flag of a prompt.
    Favorite {
        /// The prompt id.
        id: String,
    },

    /// Delete a prompt.
    Delete {
        /// The prompt id.
        id: String,
    },

    /// Manage the category list.
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Show or set the grid density (2, 3, or 4 columns).
    Grid {
        /// New column count; omit to show the current value.
        columns: Option<u8>,
    },

    /// Write a dated JSON backup.
    Export {
        /// Target directory; defaults to the configured backup directory.
        #[arg(long, short)]
        dir: Option<PathBuf>,
    },

    /// Replace the whole collection with a JSON backup.
    Import {
        /// Backup file to read.
        file: PathBuf,
    },

    /// Erase every prompt and setting.
    Reset {
        /// Confirm the destructive reset.
        #[arg(long)]
        yes: bool,
    },

    /// Show store location, schema version, and counts.
    Status,
}

/// Actions for managing categories.
#[derive(Subcommand)]
pub enum CategoryAction {
    /// List categories in display order.
    List,
    /// Append a category.
    Add {
        name: String,
    },
    /// Remove a category. Prompts using it keep the name.
    Remove {
        name: String,
    },
    /// Replace the whole list.
    Set {
        #[arg(required = true)]
        names: Vec<String>,
    },
}
