use std::{collections::HashMap, fs, path::Path};

use tracing::info;

use crate::{
    error::CatalogError,
    models::template::{Category, Template, TemplateDefinition},
    placeholders::extract_variables,
};

/// The immutable template library, grouped by category. Within a category
/// the first template is the default pick.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    by_category: HashMap<Category, Vec<Template>>,
}

impl TemplateCatalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_definitions(builtin_definitions())
    }

    pub fn from_definitions(definitions: Vec<TemplateDefinition>) -> Result<Self, CatalogError> {
        if definitions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut by_category: HashMap<Category, Vec<Template>> = HashMap::new();

        for definition in definitions {
            let templates = by_category.entry(definition.category).or_default();
            let id = format!("{}-{}", definition.category, templates.len() + 1);
            let variables = extract_variables(&definition.content);

            templates.push(Template {
                id,
                name: definition.name,
                category: definition.category,
                content: definition.content,
                variables,
            });
        }

        if let Some(missing) = Category::ALL
            .into_iter()
            .find(|c| !by_category.contains_key(c))
        {
            return Err(CatalogError::MissingCategory(missing));
        }

        Ok(Self { by_category })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let definitions: Vec<TemplateDefinition> = serde_json::from_str(&raw)?;
        let catalog = Self::from_definitions(definitions)?;

        info!(path = %path.display(), templates = catalog.len(), "Template catalog loaded from file");

        Ok(catalog)
    }

    /// Never empty for a constructed catalog.
    pub fn templates_for(&self, category: Category) -> &[Template] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn all(&self) -> impl Iterator<Item = &Template> {
        Category::ALL
            .into_iter()
            .flat_map(|category| self.templates_for(category).iter())
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.all().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn builtin_definitions() -> Vec<TemplateDefinition> {
    use Category::*;

    vec![
        TemplateDefinition::new(
            Diwali,
            "Diwali Business Greeting",
            "Hello {name}, Wishing you a very Happy Diwali! May this festival of lights bring prosperity and joy to you and your family. {company_name} wishes you the best!",
        ),
        TemplateDefinition::new(
            Diwali,
            "Diwali Customer Wishes",
            "Dear {name}, Diwali greetings from all of us at {company_name}! May your life be filled with happiness, wealth, and success. Happy Diwali!",
        ),
        TemplateDefinition::new(
            Diwali,
            "Simple Diwali Greeting",
            "Hello {name}, Diwali greetings! We wish you the best holiday. Namaste!",
        ),
        TemplateDefinition::new(
            Christmas,
            "Christmas Business Greeting",
            "Dear {name}, Merry Christmas and Happy New Year! May this festive season bring you joy, peace, and prosperity. Best regards from {company_name}.",
        ),
        TemplateDefinition::new(
            Christmas,
            "Christmas Customer Wishes",
            "Hello {name}, Wishing you a Merry Christmas filled with love, laughter, and wonderful memories. Thank you for being a valued customer!",
        ),
        TemplateDefinition::new(
            Birthday,
            "Birthday Business Greeting",
            "Happy Birthday, {name}! Hope your special day is filled with happiness, laughter, and wonderful surprises. Best wishes from all of us at {company_name}!",
        ),
        TemplateDefinition::new(
            Birthday,
            "Simple Birthday Wish",
            "Happy Birthday, {name}! Wishing you a fantastic year ahead filled with success and happiness!",
        ),
        TemplateDefinition::new(
            NewYear,
            "New Year Business Greeting",
            "Dear {name}, Happy New Year! May this year bring you new opportunities, success, and happiness. Thank you for your continued support. Best regards, {company_name}.",
        ),
        TemplateDefinition::new(
            General,
            "Thank You Message",
            "Dear {name}, Thank you for your business and support. We appreciate your trust in {company_name} and look forward to serving you better.",
        ),
        TemplateDefinition::new(
            General,
            "Welcome Message",
            "Hello {name}, Welcome to {company_name}! We're excited to have you on board. If you have any questions, please don't hesitate to reach out.",
        ),
    ]
}
