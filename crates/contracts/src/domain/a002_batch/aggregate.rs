use serde::{Deserialize, Serialize};

use crate::domain::a001_product::aggregate::ProductId;

/// Длина номера партии
pub const BATCH_NUMBER_LEN: usize = 10;

/// Обязательный первый символ номера партии
pub const BATCH_NUMBER_PREFIX: char = '5';

/// Количество по умолчанию
pub const DEFAULT_QUANTITY: i32 = 1;

// ============================================================================
// ID Type
// ============================================================================

/// Идентификатор партии (назначается хранилищем)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(pub i64);

impl BatchId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// Производственная партия продукта
///
/// `unique_code` = код продукта + порядковый номер партии среди партий продукта
/// (по возрастанию id) на момент вычисления. После удаления более ранних партий
/// значение не пересчитывается само и может повторяться.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    pub product_id: ProductId,
    pub batch_number: String,
    pub quantity: i32,
    pub unique_code: String,
}

impl Batch {
    /// Проверка формата номера партии: ровно 10 символов, первый `5`
    pub fn validate_batch_number(batch_number: &str) -> Result<(), String> {
        if batch_number.chars().count() != BATCH_NUMBER_LEN
            || !batch_number.starts_with(BATCH_NUMBER_PREFIX)
        {
            return Err("Batch number must be 10 characters starting with 5".into());
        }
        Ok(())
    }

    pub fn validate_quantity(quantity: i32) -> Result<(), String> {
        if quantity < 1 {
            return Err("Quantity must be a positive integer".into());
        }
        Ok(())
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для добавления партии к существующему продукту
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BatchDto {
    pub product_id: Option<i64>,
    pub batch_number: Option<String>,
    pub quantity: Option<i32>,
}

/// DTO для смены номера партии
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BatchUpdateDto {
    pub batch_number: Option<String>,
}
