use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use uuid::Uuid;

use crate::{
    catalog::TemplateCatalog,
    clients::{health::HealthChecker, store::MessageStore},
    config::Config,
    error::ApiError,
    matcher::TemplateMatcher,
    models::{
        analytics::{Analytics, ExportBundle},
        health::HealthStatus,
        message::{
            EditRequest, ExampleResult, GenerateRequest, GenerateResponse, GeneratedMessage,
            HistoryParams, HistoryQuery, RenderRequest, TemplateParams,
        },
        response::ApiResponse,
        template::{Category, CategoryInfo, FilledMessage, Template},
        validation::{require_field, validate_date_range, validate_limit},
    },
    placeholders::{fill_placeholders, stringify_values},
    utils::{generate_message, run_examples},
};

const ENDPOINTS: [&str; 12] = [
    "GET /health",
    "GET /api/messages/categories",
    "GET /api/messages/templates",
    "POST /api/messages/generate",
    "POST /api/messages/edit",
    "POST /api/messages/render",
    "GET /api/messages/history",
    "GET /api/messages/analytics",
    "GET /api/messages/export",
    "GET /api/messages/{id}",
    "DELETE /api/messages/{id}",
    "POST /api/messages/test",
];

pub struct AppState {
    config: Config,
    matcher: TemplateMatcher,
    store: Arc<MessageStore>,
    health_checker: HealthChecker,
}

impl AppState {
    pub fn new(config: Config, catalog: Arc<TemplateCatalog>, store: MessageStore) -> Self {
        let store = Arc::new(store);
        let health_checker = HealthChecker::new(store.clone(), config.database_url.is_some());

        Self {
            config,
            matcher: TemplateMatcher::new(catalog),
            store,
            health_checker,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let messages = Router::new()
        .route("/categories", get(list_categories))
        .route("/templates", get(list_templates))
        .route("/generate", post(generate))
        .route("/edit", post(edit))
        .route("/render", post(render))
        .route("/history", get(history))
        .route("/analytics", get(analytics))
        .route("/export", get(export))
        .route("/test", post(test_examples))
        .route("/{id}", get(get_message).delete(delete_message));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .nest("/api/messages", messages)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_api_server(
    config: Config,
    catalog: Arc<TemplateCatalog>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = MessageStore::from_config(&config).await;
    let addr = config.bind_address();
    let state = Arc::new(AppState::new(config, catalog, store));

    let app = router(state);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "Greeting service started");

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_history_query(config: &Config, params: HistoryParams) -> Result<HistoryQuery, ApiError> {
    let category = match params.category.as_deref() {
        Some(raw) => Some(
            Category::from_string(raw)
                .ok_or_else(|| ApiError::Validation(format!("Unknown category '{}'", raw)))?,
        ),
        None => None,
    };

    validate_date_range(params.from, params.to)?;

    Ok(HistoryQuery {
        user_id: params.user_id,
        category,
        search: params.q,
        from: params.from,
        to: params.to,
        limit: validate_limit(params.limit, config.history_limit, config.max_history_limit)?,
    })
}

fn parse_message_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::NotFound("Message not found".to_string()))
}

async fn index() -> impl IntoResponse {
    Json(ApiResponse::success(
        json!({
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": ENDPOINTS,
        }),
        "Greeting service is running",
    ))
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state
        .health_checker
        .check_all(state.matcher.catalog().len())
        .await;

    let status_code = match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

async fn list_categories() -> Json<ApiResponse<Vec<CategoryInfo>>> {
    let categories = Category::ALL.into_iter().map(CategoryInfo::from).collect();
    Json(ApiResponse::success(categories, "Categories retrieved"))
}

async fn list_templates(
    State(state): State<Arc<AppState>>,
    params: Result<Query<TemplateParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Template>>>, ApiError> {
    let Query(params) = params?;
    let catalog = state.matcher.catalog();

    let templates: Vec<Template> = match params.category.as_deref() {
        Some(raw) => {
            let category = Category::from_string(raw)
                .ok_or_else(|| ApiError::Validation(format!("Unknown category '{}'", raw)))?;
            catalog.templates_for(category).to_vec()
        }
        None => catalog.all().cloned().collect(),
    };

    Ok(Json(ApiResponse::success(templates, "Templates retrieved")))
}

async fn generate(
    State(state): State<Arc<AppState>>,
    request: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<GenerateResponse>>, ApiError> {
    let Json(request) = request?;
    let result = generate_message(
        &state.matcher,
        &state.store,
        request.prompt.as_deref(),
        request.user_id,
        state.config.max_prompt_length,
    )
    .await?;

    Ok(Json(ApiResponse::success(result, "Message generated")))
}

async fn edit(
    State(state): State<Arc<AppState>>,
    request: Result<Json<EditRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<GeneratedMessage>>, ApiError> {
    let Json(request) = request?;
    let (message_id, edited_message) = match (
        require_field(request.message_id.as_deref(), "messageId"),
        require_field(request.edited_message.as_deref(), "editedMessage"),
    ) {
        (Ok(id), Ok(text)) => (id, text),
        _ => {
            return Err(ApiError::Validation(
                "Message ID and edited message are required".to_string(),
            ));
        }
    };

    let id = parse_message_id(message_id)?;

    if !state.store.edit(id, edited_message).await? {
        return Err(ApiError::NotFound("Message not found".to_string()));
    }

    let updated = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Message not found".to_string()))?;

    info!(id = %id, "Message edited");

    Ok(Json(ApiResponse::success(updated, "Message updated successfully")))
}

async fn render(
    request: Result<Json<RenderRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<FilledMessage>>, ApiError> {
    let Json(request) = request?;
    let values =
        stringify_values(&request.values).map_err(|e| ApiError::Validation(e.to_string()))?;

    let filled = fill_placeholders(&request.content, &values);

    Ok(Json(ApiResponse::success(filled, "Message rendered")))
}

async fn history(
    State(state): State<Arc<AppState>>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<GeneratedMessage>>>, ApiError> {
    let Query(params) = params?;
    let query = build_history_query(&state.config, params)?;

    let messages = state.store.history(&query).await?;

    Ok(Json(ApiResponse::success(messages, "History retrieved")))
}

async fn export(
    State(state): State<Arc<AppState>>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<ApiResponse<ExportBundle>>, ApiError> {
    let Query(params) = params?;
    let mut query = build_history_query(&state.config, params)?;
    query.limit = usize::MAX;

    let bundle = state.store.export(&query).await?;

    info!(messages = bundle.messages.len(), "History exported");

    Ok(Json(ApiResponse::success(bundle, "History exported")))
}

async fn analytics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Analytics>>, ApiError> {
    let analytics = state.store.analytics().await?;
    Ok(Json(ApiResponse::success(analytics, "Analytics computed")))
}

async fn get_message(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<GeneratedMessage>>, ApiError> {
    let id = parse_message_id(&raw_id)?;

    let message = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Message not found".to_string()))?;

    Ok(Json(ApiResponse::success(message, "Message retrieved")))
}

async fn delete_message(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<Uuid>>, ApiError> {
    let id = parse_message_id(&raw_id)?;

    if !state.store.delete(id).await? {
        return Err(ApiError::NotFound("Message not found".to_string()));
    }

    info!(id = %id, "Message deleted");

    Ok(Json(ApiResponse::success(id, "Message deleted")))
}

async fn test_examples(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<ExampleResult>>> {
    let results = run_examples(&state.matcher, &state.store, state.config.max_prompt_length).await;
    Json(ApiResponse::success(results, "Examples generated"))
}
