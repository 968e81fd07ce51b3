use anyhow::{Error, Result, anyhow};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::{
    clients::store::MessageStore,
    error::ApiError,
    matcher::TemplateMatcher,
    models::{
        message::{ExampleResult, GenerateResponse, GeneratedMessage, NewMessage},
        template::MatchResult,
        validation::validate_prompt,
    },
};

pub const EXAMPLE_PROMPTS: [&str; 5] = [
    "I want to send Diwali wishes to my customers",
    "Generate a Christmas greeting for my business clients",
    "Create a birthday message for our valued customer",
    "I need a thank you message for my customers",
    "Generate a welcome message for new customers",
];

pub fn init_tracing(log_format: &str) -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("greeting_service=info,tower_http=info"));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if log_format.eq_ignore_ascii_case("json") {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    };

    result.map_err(|e| anyhow!("Failed to initialise tracing: {}", e))
}

/// Validates the prompt, matches it, then saves the result. A failed save
/// is logged and the match is still returned, flagged as unsaved.
pub async fn generate_message(
    matcher: &TemplateMatcher,
    store: &MessageStore,
    prompt: Option<&str>,
    user_id: Option<String>,
    max_prompt_length: usize,
) -> Result<GenerateResponse, ApiError> {
    let prompt = validate_prompt(prompt, max_prompt_length)?;
    let result = matcher.match_prompt(prompt);

    let new = NewMessage {
        user_prompt: prompt.to_string(),
        result: result.clone(),
        user_id,
    };

    let response = save_outcome(result, store.save(new).await, store.backend());

    info!(
        id = %response.id,
        category = %response.category,
        template = %response.template_used,
        saved = response.saved,
        "Message generated"
    );

    Ok(response)
}

/// Turns the outcome of a store write into the response for a match.
pub fn save_outcome(
    result: MatchResult,
    saved: Result<GeneratedMessage, Error>,
    backend: &str,
) -> GenerateResponse {
    match saved {
        Ok(saved) => GenerateResponse::from_saved(&saved, result.template_id),
        Err(e) => {
            warn!(error = %e, backend, "Could not save generated message");
            GenerateResponse::unsaved(result)
        }
    }
}

pub async fn run_examples(
    matcher: &TemplateMatcher,
    store: &MessageStore,
    max_prompt_length: usize,
) -> Vec<ExampleResult> {
    let mut results = Vec::with_capacity(EXAMPLE_PROMPTS.len());

    for prompt in EXAMPLE_PROMPTS {
        let outcome = generate_message(matcher, store, Some(prompt), None, max_prompt_length).await;

        results.push(match outcome {
            Ok(result) => ExampleResult {
                prompt: prompt.to_string(),
                result: Some(result),
                error: None,
            },
            Err(e) => ExampleResult {
                prompt: prompt.to_string(),
                result: None,
                error: Some(e.to_string()),
            },
        });
    }

    results
}
