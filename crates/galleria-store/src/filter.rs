//! Search and category filtering over a list of prompts.
//!
//! Pure and synchronous: works on whatever slice it is given and never
//! touches the store.

use crate::model::Prompt;

/// Search criteria for [`filter_prompts`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptFilter {
    /// Case-insensitive substring matched against title, prompt text,
    /// and category. Empty matches everything.
    pub text: String,
    /// Exact, case-sensitive category match. `None` matches everything.
    pub category: Option<String>,
}

impl PromptFilter {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: None,
        }
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            category: Some(category.into()),
        }
    }

    /// Whether `prompt` satisfies both the text and the category criteria.
    pub fn matches(&self, prompt: &Prompt) -> bool {
        self.matches_category(prompt) && self.matches_text(prompt)
    }

    fn matches_category(&self, prompt: &Prompt) -> bool {
        match &self.category {
            Some(wanted) => prompt.category.as_deref() == Some(wanted.as_str()),
            None => true,
        }
    }

    fn matches_text(&self, prompt: &Prompt) -> bool {
        let term = self.text.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        prompt.title.to_lowercase().contains(&term)
            || prompt.prompt.to_lowercase().contains(&term)
            || prompt
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&term))
    }
}

/// Every prompt matching `filter`, in input order.
pub fn filter_prompts(prompts: &[Prompt], filter: &PromptFilter) -> Vec<Prompt> {
    prompts
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect()
}

/// Split prompts into `(favorites, others)`, keeping input order.
pub fn partition_favorites(prompts: Vec<Prompt>) -> (Vec<Prompt>, Vec<Prompt>) {
    prompts.into_iter().partition(|p| p.is_favorite)
}
