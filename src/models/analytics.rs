use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::message::GeneratedMessage;

/// Usage counters over the stored message history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Analytics {
    pub total_messages_generated: u64,
    pub edited_messages: u64,
    pub category_counts: BTreeMap<String, u64>,
    pub most_used_templates: BTreeMap<String, u64>,
    /// Keyed by `YYYY-MM-DD` (UTC).
    pub daily_usage: BTreeMap<String, u64>,
    pub last_updated: DateTime<Utc>,
}

impl Analytics {
    pub fn from_messages<'a, I>(messages: I) -> Self
    where
        I: IntoIterator<Item = &'a GeneratedMessage>,
    {
        let mut analytics = Self {
            total_messages_generated: 0,
            edited_messages: 0,
            category_counts: BTreeMap::new(),
            most_used_templates: BTreeMap::new(),
            daily_usage: BTreeMap::new(),
            last_updated: Utc::now(),
        };

        for message in messages {
            analytics.record(message);
        }

        analytics
    }

    fn record(&mut self, message: &GeneratedMessage) {
        self.total_messages_generated += 1;

        if message.is_edited {
            self.edited_messages += 1;
        }

        *self
            .category_counts
            .entry(message.category.to_string())
            .or_insert(0) += 1;

        *self
            .most_used_templates
            .entry(message.template_used.clone())
            .or_insert(0) += 1;

        let day = message.created_at.format("%Y-%m-%d").to_string();
        *self.daily_usage.entry(day).or_insert(0) += 1;
    }
}

/// Matching history and the analytics over all stored messages, as one download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportBundle {
    pub messages: Vec<GeneratedMessage>,
    pub analytics: Analytics,
    pub export_date: DateTime<Utc>,
}
