use std::collections::HashMap;

use anyhow::{Error, Result, anyhow};
use tracing::debug;

use crate::models::template::FilledMessage;

struct Token<'a> {
    start: usize,
    end: usize,
    name: &'a str,
}

/// Finds `{name}` tokens. A name is any non-empty run without braces, so
/// `{}` is skipped and `{a {b}` only yields `b`.
fn tokens(content: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = content[cursor..].find('{') {
        let open = cursor + offset;
        let rest = &content[open + 1..];

        match rest.find(['{', '}']) {
            Some(len) if len > 0 && rest[len..].starts_with('}') => {
                let end = open + 1 + len + 1;
                tokens.push(Token {
                    start: open,
                    end,
                    name: &rest[..len],
                });
                cursor = end;
            }
            Some(len) => cursor = open + 1 + len,
            None => break,
        }
    }

    tokens
}

/// Placeholder names in first-seen order, without duplicates.
pub fn extract_variables(content: &str) -> Vec<String> {
    let mut variables: Vec<String> = Vec::new();

    for token in tokens(content) {
        if !variables.iter().any(|v| v == token.name) {
            variables.push(token.name.to_string());
        }
    }

    variables
}

/// Substitutes the placeholders that have a value. The rest are left as
/// written and listed in `unfilled`.
pub fn fill_placeholders(content: &str, values: &HashMap<String, String>) -> FilledMessage {
    let mut text = String::with_capacity(content.len());
    let mut unfilled: Vec<String> = Vec::new();
    let mut copied = 0;

    for token in tokens(content) {
        text.push_str(&content[copied..token.start]);

        match values.get(token.name) {
            Some(value) => text.push_str(value),
            None => {
                text.push_str(&content[token.start..token.end]);
                if !unfilled.iter().any(|v| v == token.name) {
                    unfilled.push(token.name.to_string());
                }
            }
        }

        copied = token.end;
    }
    text.push_str(&content[copied..]);

    debug!(
        filled = values.len(),
        unfilled = unfilled.len(),
        "Placeholders filled"
    );

    FilledMessage { text, unfilled }
}

/// Converts JSON scalars to their display text; arrays and objects are rejected.
pub fn stringify_values(
    values: &HashMap<String, serde_json::Value>,
) -> Result<HashMap<String, String>, Error> {
    values
        .iter()
        .map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Null => String::new(),
                _ => return Err(anyhow!("Unsupported variable type for key '{}'", key)),
            };
            Ok((key.clone(), text))
        })
        .collect()
}
