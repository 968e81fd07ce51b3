use std::path::PathBuf;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::error;

use crate::models::{response::ApiResponse, template::Category};

/// Template catalog problems. Any of these must stop the service from starting.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Template catalog is empty")]
    Empty,

    #[error("Template catalog has no templates for category '{0}'")]
    MissingCategory(Category),

    #[error("Failed to read template catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse template catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            ApiError::Validation(message) => {
                ApiResponse::error("validation_error".to_string(), message.clone())
            }
            ApiError::NotFound(message) => {
                ApiResponse::error("not_found".to_string(), message.clone())
            }
            ApiError::Internal(e) => {
                error!(error = %e, "Request failed");
                ApiResponse::error("internal_error".to_string(), e.to_string())
            }
        };

        (status, Json(body)).into_response()
    }
}
