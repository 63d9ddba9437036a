use contracts::domain::a001_product::aggregate::Product;
use contracts::domain::a002_batch::aggregate::{Batch, DEFAULT_QUANTITY};

use super::error::ApiError;

/// Общее правило для всех эндпоинтов, принимающих номер партии
pub fn batch_number(raw: &str) -> Result<&str, ApiError> {
    Batch::validate_batch_number(raw).map_err(ApiError::Validation)?;
    Ok(raw)
}

/// Количество: по умолчанию 1, иначе положительное
pub fn quantity(raw: Option<i32>) -> Result<i32, ApiError> {
    let quantity = raw.unwrap_or(DEFAULT_QUANTITY);
    Batch::validate_quantity(quantity).map_err(ApiError::Validation)?;
    Ok(quantity)
}

/// Непустое значение обязательного поля
pub fn required(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Имя сохраняется как прислано, пробелы по краям не срезаются
pub fn product_name(raw: &str) -> Result<&str, ApiError> {
    Product::validate_name(raw).map_err(ApiError::Validation)?;
    Ok(raw)
}
