use serde::{Deserialize, Serialize};

/// Результат поиска продукта по номеру партии
///
/// При `found == false` заполнен только `batch_number` (и `error`, если поиск упал).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub found: bool,
    pub batch_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProductInfo {
    pub fn found(
        name: String,
        batch_number: String,
        product_code: String,
        unique_code: String,
    ) -> Self {
        Self {
            found: true,
            batch_number,
            name: Some(name),
            product_code: Some(product_code),
            unique_code: Some(unique_code),
            error: None,
        }
    }

    pub fn not_found(batch_number: impl Into<String>) -> Self {
        Self {
            found: false,
            batch_number: batch_number.into(),
            name: None,
            product_code: None,
            unique_code: None,
            error: None,
        }
    }

    pub fn failed(batch_number: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::not_found(batch_number)
        }
    }
}

/// Ответ `/api/fetch_url`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchUrlResponse {
    pub url: String,
    pub content: String,
    pub content_length: usize,
}

/// Ответ `/api/extract_batch_from_url`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractBatchResponse {
    pub url: String,
    pub batch_found: bool,
    pub batch_number: Option<String>,
    pub product_info: Option<ProductInfo>,
    pub content_preview: String,
    pub content_length: usize,
}
