use axum::extract::{Path, State};
use axum::Json;
use contracts::domain::a001_product::aggregate::ProductId;
use contracts::domain::a002_batch::aggregate::{Batch, BatchDto, BatchId, BatchUpdateDto};
use serde_json::{json, Value};

use super::error::ApiError;
use super::validation;
use crate::domain::a002_batch;
use crate::domain::error::AllocatorError;
use crate::routes::AppState;

/// POST /api/batches
pub async fn add(
    State(state): State<AppState>,
    Json(dto): Json<BatchDto>,
) -> Result<Json<Batch>, ApiError> {
    let (Some(product_id), Some(batch_number)) =
        (dto.product_id, validation::required(dto.batch_number.as_deref()))
    else {
        return Err(ApiError::validation(
            "Product ID and batch number are required",
        ));
    };
    let batch_number = validation::batch_number(batch_number)?;
    let quantity = validation::quantity(dto.quantity)?;

    let batch =
        a002_batch::service::add(&state.db, ProductId(product_id), batch_number, quantity).await?;
    Ok(Json(batch))
}

/// PUT /api/batches/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<BatchUpdateDto>,
) -> Result<Json<Value>, ApiError> {
    let batch_number = validation::required(dto.batch_number.as_deref())
        .ok_or_else(|| ApiError::validation("Batch number is required"))?;
    let batch_number = validation::batch_number(batch_number)?;

    let batch = a002_batch::service::update_number(&state.db, BatchId(id), batch_number).await?;
    Ok(Json(json!({
        "message": "Batch updated successfully",
        "unique_code": batch.unique_code,
    })))
}

/// DELETE /api/batches/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let id = BatchId(id);
    if !a002_batch::service::delete(&state.db, id).await? {
        return Err(AllocatorError::BatchNotFound(id).into());
    }
    Ok(Json(json!({"message": "Batch deleted successfully"})))
}
