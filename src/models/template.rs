use std::fmt::{Display, Formatter, Result};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Diwali,
    Christmas,
    Birthday,
    NewYear,
    General,
}

impl Category {
    /// Every category, in catalog order.
    pub const ALL: [Category; 5] = [
        Category::Diwali,
        Category::Christmas,
        Category::Birthday,
        Category::NewYear,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Diwali => "diwali",
            Category::Christmas => "christmas",
            Category::Birthday => "birthday",
            Category::NewYear => "new_year",
            Category::General => "general",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Diwali => "Diwali",
            Category::Christmas => "Christmas",
            Category::Birthday => "Birthday",
            Category::NewYear => "New Year",
            Category::General => "General",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub name: Category,
    pub display_name: &'static str,
}

impl From<Category> for CategoryInfo {
    fn from(category: Category) -> Self {
        Self {
            name: category,
            display_name: category.display_name(),
        }
    }
}

/// A greeting template. `variables` always mirrors the `{placeholder}`
/// tokens of `content` in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub content: String,
    pub variables: Vec<String>,
}

/// Authoring form of a template, as written in a catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateDefinition {
    pub category: Category,
    pub name: String,
    pub content: String,
}

impl TemplateDefinition {
    pub fn new(category: Category, name: &str, content: &str) -> Self {
        Self {
            category,
            name: name.to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub category: Category,
    pub template_id: String,
    pub template_name: String,
    pub content: String,
    pub variables: Vec<String>,
}

impl MatchResult {
    pub fn from_template(template: &Template) -> Self {
        Self {
            category: template.category,
            template_id: template.id.clone(),
            template_name: template.name.clone(),
            content: template.content.clone(),
            variables: template.variables.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilledMessage {
    pub text: String,
    pub unfilled: Vec<String>,
}
