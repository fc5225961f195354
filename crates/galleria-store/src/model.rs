//! Data model: prompt records, drafts, settings, and the backup snapshot.
//!
//! Field names serialize in camelCase so a snapshot file matches the
//! backup format exactly (`imageUrl`, `isFavorite`, `createdAt`, ...).

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

// ═══════════════════════════════════════════════════════════════════════
//  Prompt records
// ═══════════════════════════════════════════════════════════════════════

/// One saved image-generation prompt with its image and metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    /// Unique identifier, assigned at creation and never reused.
    pub id: String,
    /// Short display title.
    pub title: String,
    /// The prompt text itself.
    pub prompt: String,
    /// Opaque image handle: a remote URL or an inline data URI.
    pub image_url: String,
    /// Name of a category from the category list. Not a foreign key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The user-supplied fields of a new prompt, before an id and timestamps
/// are assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDraft {
    pub title: String,
    pub prompt: String,
    pub image_url: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl PromptDraft {
    /// Reject drafts missing a title, prompt text, category, or image.
    pub fn validate(&self) -> StoreResult<()> {
        validate_fields(
            &self.title,
            &self.prompt,
            self.category.as_deref(),
            &self.image_url,
        )
    }

    /// Turn the draft into a record with the given id and timestamp.
    pub fn into_prompt(self, id: String, now: DateTime<Utc>) -> Prompt {
        Prompt {
            id,
            title: self.title,
            prompt: self.prompt,
            image_url: self.image_url,
            category: self.category,
            tags: self.tags,
            is_favorite: self.is_favorite,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Prompt {
    /// Apply the same required-field rules as [`PromptDraft::validate`].
    pub fn validate(&self) -> StoreResult<()> {
        validate_fields(
            &self.title,
            &self.prompt,
            self.category.as_deref(),
            &self.image_url,
        )
    }
}

fn validate_fields(
    title: &str,
    prompt: &str,
    category: Option<&str>,
    image_url: &str,
) -> StoreResult<()> {
    if title.trim().is_empty() {
        return Err(StoreError::Validation("title is required".into()));
    }
    if prompt.trim().is_empty() {
        return Err(StoreError::Validation("prompt text is required".into()));
    }
    if category.is_none_or(|c| c.is_empty()) {
        return Err(StoreError::Validation("category is required".into()));
    }
    if image_url.is_empty() {
        return Err(StoreError::Validation("image is required".into()));
    }
    Ok(())
}

/// Format a timestamp for storage.
///
/// Fixed nanosecond precision with a `Z` suffix keeps every stored value
/// the same width, so text order in SQLite equals time order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|ts| ts.with_timezone(&Utc))
}

// ═══════════════════════════════════════════════════════════════════════
//  Settings
// ═══════════════════════════════════════════════════════════════════════

/// Grid layout density: how many cards per row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GridColumns {
    /// Large cards, two per row.
    #[default]
    Two,
    /// Medium cards, three per row.
    Three,
    /// Small cards, four per row.
    Four,
}

impl GridColumns {
    pub fn count(self) -> u8 {
        match self {
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Two => "large",
            Self::Three => "medium",
            Self::Four => "small",
        }
    }
}

impl TryFrom<u8> for GridColumns {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            other => Err(format!("unsupported grid column count: {other}")),
        }
    }
}

impl From<GridColumns> for u8 {
    fn from(value: GridColumns) -> Self {
        value.count()
    }
}

impl std::fmt::Display for GridColumns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.count(), self.label())
    }
}

/// The two setting keys the settings table understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingName {
    Categories,
    GridColumns,
}

impl SettingName {
    /// The key stored in the `settings` table.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::GridColumns => "gridColumns",
        }
    }
}

impl std::fmt::Display for SettingName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A setting value, tagged by which setting it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    /// Ordered list of category display names.
    Categories(Vec<String>),
    /// Grid layout density.
    GridColumns(GridColumns),
}

impl Setting {
    pub fn name(&self) -> SettingName {
        match self {
            Self::Categories(_) => SettingName::Categories,
            Self::GridColumns(_) => SettingName::GridColumns,
        }
    }

    /// Serialize the value (without its name) for storage.
    pub(crate) fn to_json(&self) -> StoreResult<String> {
        let json = match self {
            Self::Categories(list) => serde_json::to_string(list)?,
            Self::GridColumns(cols) => serde_json::to_string(cols)?,
        };
        Ok(json)
    }

    /// Decode a stored value for `name`.
    pub(crate) fn from_json(name: SettingName, raw: &str) -> StoreResult<Self> {
        let corrupt = |e: serde_json::Error| StoreError::CorruptSetting {
            name: name.as_str(),
            message: e.to_string(),
        };
        match name {
            SettingName::Categories => serde_json::from_str(raw)
                .map(Self::Categories)
                .map_err(corrupt),
            SettingName::GridColumns => serde_json::from_str(raw)
                .map(Self::GridColumns)
                .map_err(corrupt),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Snapshot
// ═══════════════════════════════════════════════════════════════════════

/// The export/import structure: every record plus the category list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Records, newest first.
    pub prompts: Vec<Prompt>,
    pub categories: Vec<String>,
}

// ── tests ────────────────────────────────────────────────────────────
