use std::collections::HashMap;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::template::{Category, MatchResult};

/// A generated greeting as persisted by the message store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedMessage {
    pub id: Uuid,
    pub user_prompt: String,
    pub generated_message: String,
    pub template_used: String,
    pub category: Category,
    pub variables_detected: Vec<String>,
    pub is_edited: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GeneratedMessage {
    /// Timestamps are cut to microseconds, the precision Postgres keeps.
    pub fn from_new(new: NewMessage) -> Self {
        let now = Utc::now().trunc_subsecs(6);
        Self {
            id: Uuid::new_v4(),
            user_prompt: new.user_prompt,
            generated_message: new.result.content,
            template_used: new.result.template_name,
            category: new.result.category,
            variables_detected: new.result.variables,
            is_edited: false,
            final_message: None,
            user_id: new.user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.user_prompt.to_lowercase().contains(&needle)
            || self.generated_message.to_lowercase().contains(&needle)
            || self.category.as_str().contains(&needle)
            || self.template_used.to_lowercase().contains(&needle)
    }
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub user_prompt: String,
    pub result: MatchResult,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    pub user_id: Option<String>,
    pub category: Option<Category>,
    pub search: Option<String>,
    /// Inclusive bounds on `created_at`.
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: usize,
}

impl HistoryQuery {
    pub fn accepts(&self, message: &GeneratedMessage) -> bool {
        if let Some(user_id) = &self.user_id
            && message.user_id.as_deref() != Some(user_id.as_str())
        {
            return false;
        }

        if let Some(category) = self.category
            && message.category != category
        {
            return false;
        }

        if self.from.is_some_and(|from| message.created_at < from)
            || self.to.is_some_and(|to| message.created_at > to)
        {
            return false;
        }

        match &self.search {
            Some(needle) if !needle.is_empty() => message.matches_search(needle),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,

    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateResponse {
    pub id: Uuid,
    pub generated_message: String,
    pub template_id: String,
    pub template_used: String,
    pub variables_detected: Vec<String>,
    pub category: Category,
    pub saved: bool,
}

impl GenerateResponse {
    pub fn from_saved(message: &GeneratedMessage, template_id: String) -> Self {
        Self {
            id: message.id,
            generated_message: message.generated_message.clone(),
            template_id,
            template_used: message.template_used.clone(),
            variables_detected: message.variables_detected.clone(),
            category: message.category,
            saved: true,
        }
    }

    pub fn unsaved(result: MatchResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_message: result.content,
            template_id: result.template_id,
            template_used: result.template_name,
            variables_detected: result.variables,
            category: result.category,
            saved: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    #[serde(default)]
    pub message_id: Option<String>,

    #[serde(default)]
    pub edited_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderRequest {
    pub content: String,

    #[serde(default)]
    pub values: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryParams {
    pub user_id: Option<String>,
    pub category: Option<String>,
    pub q: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateParams {
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExampleResult {
    pub prompt: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerateResponse>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
