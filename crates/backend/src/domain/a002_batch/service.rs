use contracts::domain::a001_product::aggregate::{Product, ProductId};
use contracts::domain::a002_batch::aggregate::{Batch, BatchId};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, TransactionTrait};

use super::repository;
use crate::domain::a001_product;
use crate::domain::error::{unique_violation, AllocatorError, AllocatorResult};
use crate::shared::data::db::write_guard;
use crate::shared::identifiers::compose_unique_code;

/// Добавление партии к продукту.
///
/// Формат `batch_number` здесь не проверяется, это делает HTTP-слой.
pub async fn add(
    db: &DatabaseConnection,
    product_id: ProductId,
    batch_number: &str,
    quantity: i32,
) -> AllocatorResult<Batch> {
    let _guard = write_guard().await;
    let txn = db.begin().await?;
    let batch = add_in(&txn, product_id, batch_number, quantity).await?;
    txn.commit().await?;
    Ok(batch)
}

pub(crate) async fn add_in<C: ConnectionTrait>(
    db: &C,
    product_id: ProductId,
    batch_number: &str,
    quantity: i32,
) -> AllocatorResult<Batch> {
    let product = a001_product::repository::get_by_id(db, product_id)
        .await?
        .ok_or(AllocatorError::ProductNotFound(product_id))?;

    let existing = repository::count_by_product(db, product_id).await?;
    let unique_code = compose_unique_code(&product.code, existing + 1);

    let batch = repository::insert(db, product_id, batch_number, quantity, &unique_code)
        .await
        .map_err(write_error)?;

    tracing::info!(
        batch_id = %batch.id,
        product_id = %product_id,
        unique_code = %batch.unique_code,
        "Batch added"
    );
    Ok(batch)
}

/// Смена номера партии с пересчётом `unique_code`.
///
/// Позиция = число партий того же продукта с id <= id этой партии. Если более
/// ранние партии были удалены, код получится меньше прежнего и может совпасть
/// с кодом другой партии. Правило сохранено ради совместимости с уже выданными кодами.
pub async fn update_number(
    db: &DatabaseConnection,
    batch_id: BatchId,
    batch_number: &str,
) -> AllocatorResult<Batch> {
    let _guard = write_guard().await;
    let txn = db.begin().await?;

    let batch = repository::get_by_id(&txn, batch_id)
        .await?
        .ok_or(AllocatorError::BatchNotFound(batch_id))?;
    // партия без продукта считается отсутствующей
    let product = a001_product::repository::get_by_id(&txn, batch.product_id)
        .await?
        .ok_or(AllocatorError::BatchNotFound(batch_id))?;

    let position = repository::count_by_product_up_to(&txn, product.id, batch_id).await?;
    let unique_code = compose_unique_code(&product.code, position);

    let updated = repository::update_number(&txn, batch_id, batch_number, &unique_code)
        .await
        .map_err(write_error)?;
    if !updated {
        return Err(AllocatorError::BatchNotFound(batch_id));
    }
    txn.commit().await?;

    tracing::info!(batch_id = %batch_id, unique_code = %unique_code, "Batch number updated");
    Ok(Batch {
        batch_number: batch_number.to_string(),
        unique_code,
        ..batch
    })
}

/// Удаление одной партии. Коды остальных партий не пересчитываются.
pub async fn delete(db: &DatabaseConnection, batch_id: BatchId) -> AllocatorResult<bool> {
    let _guard = write_guard().await;
    Ok(repository::delete(db, batch_id).await?)
}

/// Продукт и партия по номеру партии
pub async fn find_owner_by_number(
    db: &DatabaseConnection,
    batch_number: &str,
) -> AllocatorResult<Option<(Product, Batch)>> {
    let Some(batch) = repository::get_by_number(db, batch_number).await? else {
        return Ok(None);
    };
    let product = a001_product::repository::get_by_id(db, batch.product_id).await?;
    Ok(product.map(|product| (product, batch)))
}

fn write_error(err: DbErr) -> AllocatorError {
    match unique_violation(&err) {
        Some(message) if message.contains(".batch_number") => {
            AllocatorError::DuplicateBatchNumber
        }
        _ => AllocatorError::Store(err),
    }
}
