use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================

/// Идентификатор продукта (назначается хранилищем)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl ProductId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Продукт (товарная линейка)
///
/// `code` назначается при создании (A, B, C, ...) и больше не меняется.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub code: String,
}

impl Product {
    /// Валидация наименования продукта
    pub fn validate_name(name: &str) -> Result<(), String> {
        if name.trim().is_empty() {
            return Err("Product name is required".into());
        }
        Ok(())
    }
}

/// Строка сводного списка: продукт и одна из его партий (или пустые поля партии)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductBatchRow {
    pub id: ProductId,
    pub name: String,
    pub code: String,
    pub batch_id: Option<i64>,
    pub batch_number: Option<String>,
    pub quantity: Option<i32>,
    pub unique_code: Option<String>,
}

/// Ответ на создание продукта вместе с первой партией
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCreatedResponse {
    pub id: ProductId,
    pub name: String,
    pub code: String,
    pub batch_id: i64,
    pub batch_number: String,
    pub quantity: i32,
    pub unique_code: String,
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания продукта с первой партией
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductDto {
    pub name: Option<String>,
    pub batch_number: Option<String>,
    pub quantity: Option<i32>,
}

/// DTO для переименования продукта
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductRenameDto {
    pub name: Option<String>,
}
