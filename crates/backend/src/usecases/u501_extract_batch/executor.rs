use contracts::usecases::u501_extract_batch::response::{
    ExtractBatchResponse, FetchUrlResponse, ProductInfo,
};
use sea_orm::DatabaseConnection;

use super::page_fetcher::{parse_target_url, FetchError, PageFetcher};
use crate::domain::a002_batch;
use crate::shared::batch_extractor::extract_batch;
use crate::shared::format::preview;

/// Поиск продукта по номеру партии.
///
/// Ошибка хранилища не пробрасывается, а попадает в поле `error` ответа.
pub async fn lookup_by_batch(db: &DatabaseConnection, batch_number: &str) -> ProductInfo {
    match a002_batch::service::find_owner_by_number(db, batch_number).await {
        Ok(Some((product, batch))) => ProductInfo::found(
            product.name,
            batch.batch_number,
            product.code,
            batch.unique_code,
        ),
        Ok(None) => ProductInfo::not_found(batch_number),
        Err(e) => {
            tracing::warn!("Lookup for batch {} failed: {}", batch_number, e);
            ProductInfo::failed(batch_number, e.to_string())
        }
    }
}

/// Загрузить страницу целиком
pub async fn fetch_url(
    fetcher: &dyn PageFetcher,
    raw_url: &str,
) -> Result<FetchUrlResponse, FetchError> {
    let url = parse_target_url(raw_url)?;
    let content = fetcher.fetch(&url).await?;

    Ok(FetchUrlResponse {
        url: raw_url.to_string(),
        content_length: content.chars().count(),
        content,
    })
}

/// Загрузить страницу, найти номер партии и продукт.
///
/// В ответ уходит только превью содержимого, чтобы размер не зависел от страницы.
pub async fn extract_from_url(
    db: &DatabaseConnection,
    fetcher: &dyn PageFetcher,
    raw_url: &str,
    preview_chars: usize,
) -> Result<ExtractBatchResponse, FetchError> {
    let url = parse_target_url(raw_url)?;
    let content = fetcher.fetch(&url).await?;

    let batch_number = extract_batch(&content);
    let product_info = match &batch_number {
        Some(batch) => Some(lookup_by_batch(db, batch).await),
        None => None,
    };

    tracing::info!(
        url = %url,
        batch = batch_number.as_deref().unwrap_or("-"),
        "Batch extraction finished"
    );

    Ok(ExtractBatchResponse {
        url: raw_url.to_string(),
        batch_found: batch_number.is_some(),
        batch_number,
        product_info,
        content_preview: preview(&content, preview_chars),
        content_length: content.chars().count(),
    })
}
