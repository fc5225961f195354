//! Shared helpers for CLI subcommands: tracing setup and terminal output.

use galleria_store::Prompt;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with the given default log level.
///
/// `RUST_LOG` overrides the default.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One-line summary of a prompt for list output.
pub fn summary_line(prompt: &Prompt) -> String {
    let star = if prompt.is_favorite { "*" } else { " " };
    let category = prompt.category.as_deref().unwrap_or("-");
    format!(
        "{star} {id}  {title}  [{category}]  {date}",
        id = prompt.id,
        title = prompt.title,
        date = prompt.created_at.format("%Y-%m-%d"),
    )
}

/// Multi-line detail view of a prompt.
pub fn detail_block(prompt: &Prompt) -> String {
    let tags = prompt
        .tags
        .as_ref()
        .filter(|t| !t.is_empty())
        .map(|t| t.join(", "))
        .unwrap_or_else(|| "-".into());
    format!(
        "  {title}{fav}\n  id:        {id}\n  category:  {category}\n  tags:      {tags}\n  image:     {image}\n  created:   {created}\n  updated:   {updated}\n\n  {text}\n",
        title = prompt.title,
        fav = if prompt.is_favorite { "  (favorite)" } else { "" },
        id = prompt.id,
        category = prompt.category.as_deref().unwrap_or("-"),
        image = truncate(&prompt.image_url, 72),
        created = prompt.created_at.to_rfc3339(),
        updated = prompt.updated_at.to_rfc3339(),
        text = prompt.prompt,
    )
}

/// Shorten long values such as inline data URIs for display.
pub fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let head: String = value.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use galleria_store::sample_prompts;

    use super::*;

    #[test]
    fn truncate_keeps_short_values() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn truncate_shortens_data_uris() {
        let uri = format!("data:image/png;base64,{}", "A".repeat(200));
        let shown = truncate(&uri, 20);
        assert_eq!(shown.chars().count(), 20);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn summary_marks_favorites() {
        let samples = sample_prompts();
        let favorite = samples.iter().find(|p| p.is_favorite).unwrap();
        let plain = samples.iter().find(|p| !p.is_favorite).unwrap();

        assert!(summary_line(favorite).starts_with('*'));
        assert!(summary_line(plain).starts_with(' '));
        assert!(detail_block(favorite).contains("(favorite)"));
    }
}
