//! Backup file format: naming, serialization, and import validation.
//!
//! A backup is UTF-8 JSON shaped `{ "prompts": [...], "categories": [...] }`
//! with prompts newest first. Import accepts any JSON object whose
//! `prompts` field is an array of records; `categories` is optional.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::Value;
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::model::{Prompt, Snapshot};

/// `<app-name>-backup-<YYYY-MM-DD>.json`
pub fn backup_file_name(app_name: &str, date: NaiveDate) -> String {
    format!("{app_name}-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Serialize a snapshot as pretty-printed JSON.
pub fn to_json(snapshot: &Snapshot) -> StoreResult<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Write `snapshot` to `dir/file_name`, creating `dir` if needed.
pub async fn write_to_dir(dir: &Path, file_name: &str, snapshot: &Snapshot) -> StoreResult<PathBuf> {
    let json = to_json(snapshot)?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, json).await?;
    info!(path = %path.display(), prompts = snapshot.prompts.len(), "backup written");
    Ok(path)
}

/// A snapshot that passed shape validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSnapshot {
    pub prompts: Vec<Prompt>,
    /// `None` when the file carried no category list.
    pub categories: Option<Vec<String>>,
}

/// Validate and decode an import blob without touching any state.
pub fn parse_snapshot(blob: &str) -> StoreResult<ParsedSnapshot> {
    let value: Value = serde_json::from_str(blob)
        .map_err(|e| StoreError::ImportFormat(format!("not valid JSON: {e}")))?;
    let object = value
        .as_object()
        .ok_or_else(|| StoreError::ImportFormat("top level must be a JSON object".into()))?;

    let items = match object.get("prompts") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(StoreError::ImportFormat("'prompts' must be an array".into())),
        None => return Err(StoreError::ImportFormat("missing 'prompts' array".into())),
    };

    let prompts = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let prompt: Prompt = serde_json::from_value(item.clone())
                .map_err(|e| StoreError::ImportFormat(format!("prompt #{index}: {e}")))?;
            if prompt.id.is_empty() {
                return Err(StoreError::ImportFormat(format!("prompt #{index}: empty id")));
            }
            Ok(prompt)
        })
        .collect::<StoreResult<Vec<_>>>()?;

    let categories = match object.get("categories") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(
            serde_json::from_value::<Vec<String>>(raw.clone()).map_err(|e| {
                StoreError::ImportFormat(format!("'categories' must be a list of strings: {e}"))
            })?,
        ),
    };

    Ok(ParsedSnapshot { prompts, categories })
}

/// Read a backup file and validate it.
pub async fn read_file(path: &Path) -> StoreResult<ParsedSnapshot> {
    let blob = tokio::fs::read_to_string(path).await?;
    parse_snapshot(&blob)
}
