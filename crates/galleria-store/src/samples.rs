//! Built-in sample collection and default categories.
//!
//! A fresh store is seeded with these records on first load, and they are
//! shown in memory when the store cannot be read at all.

use chrono::{DateTime, Utc};

use crate::model::Prompt;

/// Category list used when none has been saved, and restored on reset.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Paisajes",
    "Retratos",
    "Personajes",
    "Surrealismo",
    "Cyberpunk",
    "Fantasía",
    "Otro",
];

/// Owned copy of [`DEFAULT_CATEGORIES`].
pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

struct Sample {
    id: &'static str,
    title: &'static str,
    prompt: &'static str,
    category: &'static str,
    created_at: &'static str,
    is_favorite: bool,
}

const SAMPLES: &[Sample] = &[
    Sample {
        id: "sample-1",
        title: "Amanecer en los Alpes",
        prompt: "Golden hour over snow-capped alpine peaks, mist in the valley, ultra detailed landscape photography, 35mm, soft volumetric light",
        category: "Paisajes",
        created_at: "2024-01-10T09:00:00Z",
        is_favorite: true,
    },
    Sample {
        id: "sample-2",
        title: "Retrato renacentista",
        prompt: "Oil painting portrait of an elderly scholar in Renaissance style, chiaroscuro lighting, cracked varnish texture, museum quality",
        category: "Retratos",
        created_at: "2024-01-11T09:00:00Z",
        is_favorite: false,
    },
    Sample {
        id: "sample-3",
        title: "Callejón de neón",
        prompt: "A cyberpunk alley at night, rain-soaked pavement reflecting neon signs, steam vents, lone figure with umbrella, cinematic wide shot",
        category: "Cyberpunk",
        created_at: "2024-01-12T09:00:00Z",
        is_favorite: false,
    },
    Sample {
        id: "sample-4",
        title: "Relojes derretidos",
        prompt: "Surreal desert with melting clocks draped over dead trees, long shadows, dreamlike pastel sky, in the spirit of classic surrealism",
        category: "Surrealismo",
        created_at: "2024-01-13T09:00:00Z",
        is_favorite: false,
    },
    Sample {
        id: "sample-5",
        title: "Guardiana del bosque",
        prompt: "Elven ranger standing in an ancient glowing forest, intricate leather armor, fireflies, fantasy concept art, highly detailed",
        category: "Fantasía",
        created_at: "2024-01-14T09:00:00Z",
        is_favorite: true,
    },
    Sample {
        id: "sample-6",
        title: "Capitana espacial",
        prompt: "Character sheet of a space pirate captain, front and side views, worn flight jacket, cybernetic eye, clean studio background",
        category: "Personajes",
        created_at: "2024-01-15T09:00:00Z",
        is_favorite: false,
    },
];

/// The sample records, oldest first.
pub fn sample_prompts() -> Vec<Prompt> {
    SAMPLES
        .iter()
        .map(|s| {
            let created_at = DateTime::parse_from_rfc3339(s.created_at)
                .map(|ts| ts.with_timezone(&Utc))
                .unwrap_or_default();
            Prompt {
                id: s.id.to_string(),
                title: s.title.to_string(),
                prompt: s.prompt.to_string(),
                image_url: format!("https://picsum.photos/seed/galleria-{}/768/1024", s.id),
                category: Some(s.category.to_string()),
                tags: None,
                is_favorite: s.is_favorite,
                created_at,
                updated_at: created_at,
            }
        })
        .collect()
}
