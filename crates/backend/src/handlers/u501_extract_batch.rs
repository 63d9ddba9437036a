use axum::extract::{Path, Query, State};
use axum::Json;
use contracts::usecases::u501_extract_batch::request::UrlQuery;
use contracts::usecases::u501_extract_batch::response::{
    ExtractBatchResponse, FetchUrlResponse, ProductInfo,
};

use super::error::ApiError;
use super::validation;
use crate::routes::AppState;
use crate::usecases::u501_extract_batch::executor;

/// GET /api/search_product/:batch_number
pub async fn search_product(
    State(state): State<AppState>,
    Path(batch_number): Path<String>,
) -> Json<ProductInfo> {
    Json(executor::lookup_by_batch(&state.db, &batch_number).await)
}

/// GET /api/fetch_url?url=...
pub async fn fetch_url(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<FetchUrlResponse>, ApiError> {
    let url = required_url(&query)?;
    let response = executor::fetch_url(state.fetcher.as_ref(), url).await?;
    Ok(Json(response))
}

/// GET /api/extract_batch_from_url?url=...
pub async fn extract_batch_from_url(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<ExtractBatchResponse>, ApiError> {
    let url = required_url(&query)?;
    let response = executor::extract_from_url(
        &state.db,
        state.fetcher.as_ref(),
        url,
        state.fetch.preview_chars,
    )
    .await?;
    Ok(Json(response))
}

fn required_url(query: &UrlQuery) -> Result<&str, ApiError> {
    validation::required(query.url.as_deref())
        .ok_or_else(|| ApiError::validation("URL parameter is required"))
}
