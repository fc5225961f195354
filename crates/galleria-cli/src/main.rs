//! CLI entry point for Galleria.
//!
//! This binary provides the `galleria` command: a terminal front end over
//! [`galleria_store::CollectionService`] for adding, editing, searching,
//! and backing up a prompt collection.

mod cli;
mod config;
mod helpers;

use anyhow::{Context, Result, bail};
use clap::Parser;
use galleria_store::{
    CollectionService, GridColumns, PromptDraft, PromptFilter, StoreLifecycle, StoreLocation,
};
use tracing::{info, warn};

use crate::cli::{CategoryAction, Cli, Commands};
use crate::config::GalleriaConfig;
use crate::helpers::{detail_block, init_tracing, summary_line};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing("warn");

    let mut config = config::load_config(&cli.config)?;
    if let Some(db) = cli.db {
        config.store.path = db;
        config.store.in_memory = false;
    }

    let service = open_service(&config).await?;
    service.load().await;
    if service.is_degraded().await {
        println!("  [!] Store unreadable; showing built-in samples only.");
    }

    match cli.command {
        Commands::List {
            search,
            category,
            favorites,
        } => cmd_list(&service, search, category, favorites).await,
        Commands::Show { id } => cmd_show(&service, &id).await,
        Commands::Add {
            title,
            prompt,
            category,
            image,
            tags,
        } => {
            let draft = PromptDraft {
                title,
                prompt,
                image_url: image,
                category: Some(category),
                tags: (!tags.is_empty()).then_some(tags),
                is_favorite: false,
            };
            let added = service.add(draft).await.context("failed to add prompt")?;
            println!("  [+] Added {}", added.id);
            Ok(())
        }
        Commands::Edit {
            id,
            title,
            prompt,
            category,
            image,
        } => cmd_edit(&service, &id, title, prompt, category, image).await,
        Commands::Favorite { id } => {
            let toggled = service
                .toggle_favorite(&id)
                .await
                .context("failed to toggle favorite")?;
            let state = if toggled.is_favorite { "favorite" } else { "not favorite" };
            println!("  [=] {} is now {state}", toggled.id);
            Ok(())
        }
        Commands::Delete { id } => {
            if service.delete(&id).await.context("failed to delete prompt")? {
                println!("  [-] Deleted {id}");
            } else {
                println!("  [=] No prompt with id {id}");
            }
            Ok(())
        }
        Commands::Categories { action } => cmd_categories(&service, action).await,
        Commands::Grid { columns } => cmd_grid(&service, columns).await,
        Commands::Export { dir } => {
            let dir = dir.unwrap_or_else(|| config.backup.dir.clone());
            let path = service
                .export_to_dir(&dir, &config.backup.app_name)
                .await
                .context("failed to export backup")?;
            println!("  [+] Backup written to {}", path.display());
            Ok(())
        }
        Commands::Import { file } => {
            let summary = service
                .import_from_file(&file)
                .await
                .with_context(|| format!("failed to import {}", file.display()))?;
            println!(
                "  [+] Imported {} prompts and {} categories",
                summary.prompts, summary.categories
            );
            Ok(())
        }
        Commands::Reset { yes } => {
            if !yes {
                bail!("reset erases every prompt and setting; re-run with --yes to confirm");
            }
            service.reset_all().await.context("failed to reset")?;
            println!("  [-] All data erased; default categories restored");
            Ok(())
        }
        Commands::Status => cmd_status(&service).await,
    }
}

/// Open the configured store, falling back to an ephemeral in-memory one.
async fn open_service(config: &GalleriaConfig) -> Result<CollectionService> {
    if config.store.in_memory {
        return Ok(CollectionService::new(StoreLifecycle::in_memory()));
    }

    if let Some(parent) = config.store.path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let lifecycle = StoreLifecycle::at_path(&config.store.path);
    match lifecycle.open().await {
        Ok(_) => {
            info!(path = %config.store.path.display(), "store opened");
            Ok(CollectionService::new(lifecycle))
        }
        Err(err) if err.is_unavailable() => {
            warn!(%err, "store unavailable, continuing in memory");
            println!("  [!] {err}");
            println!("  [!] Changes in this run will not be saved.");
            Ok(CollectionService::new(StoreLifecycle::in_memory()))
        }
        Err(err) => Err(err).context("failed to open store"),
    }
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

async fn cmd_list(
    service: &CollectionService,
    search: Option<String>,
    category: Option<String>,
    favorites_only: bool,
) -> Result<()> {
    let filter = PromptFilter {
        text: search.unwrap_or_default(),
        category,
    };
    let (favorites, others) = service.search_partitioned(&filter).await;

    if favorites.is_empty() && (favorites_only || others.is_empty()) {
        println!("  No prompts match.");
        return Ok(());
    }

    if !favorites.is_empty() {
        println!("  Favorites");
        for prompt in &favorites {
            println!("  {}", summary_line(prompt));
        }
    }
    if !favorites_only && !others.is_empty() {
        if !favorites.is_empty() {
            println!();
        }
        println!("  All prompts");
        for prompt in &others {
            println!("  {}", summary_line(prompt));
        }
    }
    Ok(())
}

async fn cmd_show(service: &CollectionService, id: &str) -> Result<()> {
    match service.get(id).await {
        Some(prompt) => {
            println!();
            println!("{}", detail_block(&prompt));
            Ok(())
        }
        None => bail!("no prompt with id {id}"),
    }
}

async fn cmd_edit(
    service: &CollectionService,
    id: &str,
    title: Option<String>,
    prompt: Option<String>,
    category: Option<String>,
    image: Option<String>,
) -> Result<()> {
    let Some(mut record) = service.get(id).await else {
        bail!("no prompt with id {id}");
    };
    if let Some(title) = title {
        record.title = title;
    }
    if let Some(text) = prompt {
        record.prompt = text;
    }
    if let Some(category) = category {
        record.category = Some(category);
    }
    if let Some(image) = image {
        record.image_url = image;
    }

    let saved = service.update(record).await.context("failed to save prompt")?;
    println!("  [=] Updated {} at {}", saved.id, saved.updated_at.to_rfc3339());
    Ok(())
}

async fn cmd_categories(service: &CollectionService, action: CategoryAction) -> Result<()> {
    match action {
        CategoryAction::List => {
            let categories = service.categories().await;
            if categories.is_empty() {
                println!("  No categories defined.");
            }
            for (index, name) in categories.iter().enumerate() {
                println!("  {:>2}. {name}", index + 1);
            }
        }
        CategoryAction::Add { name } => {
            service
                .add_category(&name)
                .await
                .context("failed to add category")?;
            println!("  [+] Added category {}", name.trim());
        }
        CategoryAction::Remove { name } => {
            if service
                .remove_category(&name)
                .await
                .context("failed to remove category")?
            {
                println!("  [-] Removed category {name}");
            } else {
                println!("  [=] No category named {name}");
            }
        }
        CategoryAction::Set { names } => {
            let names: Vec<String> = names.iter().map(|n| n.trim().to_string()).collect();
            service
                .set_categories(names)
                .await
                .context("failed to set categories")?;
            println!("  [=] Categories replaced");
        }
    }
    Ok(())
}

async fn cmd_grid(service: &CollectionService, columns: Option<u8>) -> Result<()> {
    match columns {
        None => println!("  Grid: {}", service.grid_columns().await),
        Some(count) => {
            let columns = GridColumns::try_from(count).map_err(anyhow::Error::msg)?;
            service
                .set_grid_columns(columns)
                .await
                .context("failed to save grid setting")?;
            println!("  [=] Grid set to {columns}");
        }
    }
    Ok(())
}

async fn cmd_status(service: &CollectionService) -> Result<()> {
    println!();
    println!("  Galleria Status");
    println!("  ===============");
    println!();

    match service.lifecycle().location() {
        StoreLocation::Path(path) => println!("  Store:       {}", path.display()),
        StoreLocation::InMemory => println!("  Store:       in memory (not saved)"),
    }
    println!(
        "  Schema:      v{}",
        service.lifecycle().schema_version().await?
    );
    println!("  Degraded:    {}", service.is_degraded().await);

    let prompts = service.prompts().await;
    let favorites = prompts.iter().filter(|p| p.is_favorite).count();
    println!("  Prompts:     {} ({favorites} favorites)", prompts.len());
    println!("  Categories:  {}", service.categories().await.len());
    println!("  Grid:        {}", service.grid_columns().await);
    println!();

    Ok(())
}
