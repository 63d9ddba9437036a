use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::domain::error::AllocatorError;
use crate::usecases::u501_extract_batch::page_fetcher::FetchError;

/// Ошибка HTTP-обработчика, отдаётся клиенту как `{"error": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Allocator(#[from] AllocatorError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Allocator(e) => match e {
                AllocatorError::DuplicateName
                | AllocatorError::DuplicateCode
                | AllocatorError::DuplicateBatchNumber => StatusCode::BAD_REQUEST,
                AllocatorError::ProductNotFound(_) | AllocatorError::BatchNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                AllocatorError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Fetch(e) => match e {
                FetchError::InvalidUrl | FetchError::Status { .. } => StatusCode::BAD_REQUEST,
                FetchError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
