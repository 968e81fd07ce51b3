use std::sync::Arc;

use tracing::debug;

use crate::{
    catalog::TemplateCatalog,
    models::template::{Category, MatchResult, Template},
};

pub const VAR_NAME: &str = "name";
pub const VAR_COMPANY_NAME: &str = "company_name";

const WELCOME_KEYWORDS: &[&str] = &["welcome", "onboard", "join"];
const THANK_YOU_KEYWORDS: &[&str] = &["thank", "appreciate", "grateful"];

/// Keyword groups in priority order. Festivals come before the courtesy
/// intents, and welcome comes before thank-you.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Diwali, &["diwali", "deepavali", "festival of lights"]),
    (Category::Christmas, &["christmas", "xmas", "festive season"]),
    (Category::Birthday, &["birthday", "birth day", "special day"]),
    (Category::NewYear, &["new year", "newyear"]),
    (Category::General, WELCOME_KEYWORDS),
    (Category::General, THANK_YOU_KEYWORDS),
];

const VARIABLE_HINTS: &[(&str, &[&str])] = &[
    (VAR_NAME, &["customer", "client", "name"]),
    (
        VAR_COMPANY_NAME,
        &["company", "business", "organization", "team"],
    ),
];

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}

fn normalize(prompt: &str) -> String {
    prompt.to_lowercase()
}

/// True when the template declares every hinted variable.
pub fn covers_hints(template: &Template, hints: &[&str]) -> bool {
    hints
        .iter()
        .all(|hint| template.variables.iter().any(|v| v == hint))
}

/// Maps free-text prompts onto catalog templates. Holds nothing but a
/// shared reference to the catalog, so one instance serves every request.
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    catalog: Arc<TemplateCatalog>,
}

impl TemplateMatcher {
    pub fn new(catalog: Arc<TemplateCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn detect_category(&self, prompt: &str) -> Category {
        detect_in(&normalize(prompt))
    }

    pub fn infer_variable_hints(&self, prompt: &str) -> Vec<&'static str> {
        hints_in(&normalize(prompt))
    }

    pub fn match_prompt(&self, prompt: &str) -> MatchResult {
        let normalized = normalize(prompt);
        let category = detect_in(&normalized);
        let hints = hints_in(&normalized);

        let template = self.select_template(category, &normalized, &hints);

        debug!(
            category = %category,
            template_id = %template.id,
            hints = ?hints,
            "Prompt matched"
        );

        MatchResult::from_template(template)
    }

    fn select_template(&self, category: Category, normalized: &str, hints: &[&str]) -> &Template {
        let templates = self.catalog.templates_for(category);

        if category == Category::General {
            let intent = if contains_any(normalized, WELCOME_KEYWORDS) {
                Some("Welcome")
            } else if contains_any(normalized, THANK_YOU_KEYWORDS) {
                Some("Thank You")
            } else {
                None
            };

            if let Some(template) =
                intent.and_then(|label| templates.iter().find(|t| t.name.contains(label)))
            {
                return template;
            }
        }

        templates
            .iter()
            .find(|t| covers_hints(t, hints))
            .unwrap_or(&templates[0])
    }
}

fn detect_in(normalized: &str) -> Category {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, words)| contains_any(normalized, words))
        .map(|(category, _)| *category)
        .unwrap_or(Category::General)
}

fn hints_in(normalized: &str) -> Vec<&'static str> {
    VARIABLE_HINTS
        .iter()
        .filter(|(_, words)| contains_any(normalized, words))
        .map(|(variable, _)| *variable)
        .collect()
}
