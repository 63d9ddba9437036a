use axum::extract::{Path, State};
use axum::Json;
use contracts::domain::a001_product::aggregate::{
    Product, ProductBatchRow, ProductCreatedResponse, ProductDto, ProductId, ProductRenameDto,
};
use serde_json::{json, Value};

use super::error::ApiError;
use super::validation;
use crate::domain::a001_product;
use crate::domain::error::AllocatorError;
use crate::routes::AppState;

/// GET /api/products
pub async fn list_with_batches(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductBatchRow>>, ApiError> {
    let rows = a001_product::service::list_with_batches(&state.db).await?;
    Ok(Json(rows))
}

/// GET /api/products/list
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let items = a001_product::service::list_all(&state.db).await?;
    Ok(Json(items))
}

/// POST /api/products: продукт вместе с первой партией
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<ProductDto>,
) -> Result<Json<ProductCreatedResponse>, ApiError> {
    let (Some(name), Some(batch_number)) = (
        validation::required(dto.name.as_deref()),
        validation::required(dto.batch_number.as_deref()),
    ) else {
        return Err(ApiError::validation(
            "Product name and batch number are required",
        ));
    };
    let name = validation::product_name(name)?;
    let batch_number = validation::batch_number(batch_number)?;
    let quantity = validation::quantity(dto.quantity)?;

    let (product, batch) =
        a001_product::service::create_with_first_batch(&state.db, name, batch_number, quantity)
            .await?;

    Ok(Json(ProductCreatedResponse {
        id: product.id,
        name: product.name,
        code: product.code,
        batch_id: batch.id.value(),
        batch_number: batch.batch_number,
        quantity: batch.quantity,
        unique_code: batch.unique_code,
    }))
}

/// PUT /api/products/:id
pub async fn rename(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<ProductRenameDto>,
) -> Result<Json<Value>, ApiError> {
    let name = validation::required(dto.name.as_deref())
        .ok_or_else(|| ApiError::validation("Product name is required"))?;
    let name = validation::product_name(name)?;

    a001_product::service::rename(&state.db, ProductId(id), name).await?;
    Ok(Json(json!({"message": "Product updated successfully"})))
}

/// DELETE /api/products/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let id = ProductId(id);
    if !a001_product::service::delete(&state.db, id).await? {
        return Err(AllocatorError::ProductNotFound(id).into());
    }
    Ok(Json(
        json!({"message": "Product and all its batches deleted successfully"}),
    ))
}
