use contracts::domain::a001_product::aggregate::{Product, ProductBatchRow, ProductId};
use contracts::domain::a002_batch::aggregate::Batch;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, TransactionTrait};

use super::repository;
use crate::domain::a002_batch;
use crate::domain::error::{unique_violation, AllocatorError, AllocatorResult};
use crate::shared::data::db::write_guard;
use crate::shared::identifiers::allocate_product_code;

/// Создание продукта с автоматически выданным кодом
pub async fn create(db: &DatabaseConnection, name: &str) -> AllocatorResult<Product> {
    let _guard = write_guard().await;
    let txn = db.begin().await?;
    let product = create_in(&txn, name).await?;
    txn.commit().await?;
    Ok(product)
}

/// Создание продукта вместе с первой партией.
///
/// Всё в одной транзакции: если номер партии занят, продукт тоже не создаётся.
pub async fn create_with_first_batch(
    db: &DatabaseConnection,
    name: &str,
    batch_number: &str,
    quantity: i32,
) -> AllocatorResult<(Product, Batch)> {
    let _guard = write_guard().await;
    let txn = db.begin().await?;
    let product = create_in(&txn, name).await?;
    let batch = a002_batch::service::add_in(&txn, product.id, batch_number, quantity).await?;
    txn.commit().await?;
    Ok((product, batch))
}

pub(crate) async fn create_in<C: ConnectionTrait>(db: &C, name: &str) -> AllocatorResult<Product> {
    let existing_codes = repository::list_codes(db).await?;
    let code = allocate_product_code(&existing_codes);

    let product = repository::insert(db, name, &code)
        .await
        .map_err(insert_error)?;

    tracing::info!(product_id = %product.id, code = %product.code, "Product created");
    Ok(product)
}

/// Переименование продукта (код не меняется)
pub async fn rename(db: &DatabaseConnection, id: ProductId, name: &str) -> AllocatorResult<()> {
    let _guard = write_guard().await;
    let updated = repository::update_name(db, id, name)
        .await
        .map_err(insert_error)?;
    if !updated {
        return Err(AllocatorError::ProductNotFound(id));
    }
    Ok(())
}

/// Каскадное удаление: сначала партии, потом сам продукт.
/// Возвращает, существовал ли продукт.
pub async fn delete(db: &DatabaseConnection, id: ProductId) -> AllocatorResult<bool> {
    let _guard = write_guard().await;
    let txn = db.begin().await?;
    let removed_batches = a002_batch::repository::delete_by_product(&txn, id).await?;
    let existed = repository::delete(&txn, id).await?;
    txn.commit().await?;

    if existed {
        tracing::info!(product_id = %id, removed_batches, "Product deleted");
    }
    Ok(existed)
}

pub async fn list_all(db: &DatabaseConnection) -> AllocatorResult<Vec<Product>> {
    Ok(repository::list_all(db).await?)
}

/// Продукты с партиями для сводной таблицы
pub async fn list_with_batches(db: &DatabaseConnection) -> AllocatorResult<Vec<ProductBatchRow>> {
    Ok(repository::list_with_batches(db).await?)
}

pub async fn get_by_code(db: &DatabaseConnection, code: &str) -> AllocatorResult<Option<Product>> {
    Ok(repository::get_by_code(db, code).await?)
}

/// Нарушение UNIQUE по имени или коду даёт отдельные ошибки
fn insert_error(err: DbErr) -> AllocatorError {
    match unique_violation(&err) {
        Some(message) if message.contains(".name") => AllocatorError::DuplicateName,
        Some(message) if message.contains(".code") => AllocatorError::DuplicateCode,
        _ => AllocatorError::Store(err),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::shared::data::db::{connect_in_memory, initialize_database};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_on_file_db_get_distinct_codes() {
        let dir = tempfile::tempdir().unwrap();
        let db = initialize_database(&dir.path().join("products.db"))
            .await
            .unwrap();

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let db = db.clone();
                tokio::spawn(async move { create(&db, &format!("p{i}")).await })
            })
            .collect();

        let mut codes = HashSet::new();
        for task in tasks {
            let product = task.await.unwrap().unwrap();
            codes.insert(product.code);
        }
        assert_eq!(codes.len(), 16);
        assert!(codes.contains("A") && codes.contains("P"));
        assert_eq!(repository::count(&db).await.unwrap(), 16);
    }

    #[tokio::test]
    async fn codes_are_assigned_in_sequence() {
        let db = connect_in_memory().await;
        let a = create(&db, "iPhone 15 Pro").await.unwrap();
        let b = create(&db, "MacBook Air M3").await.unwrap();
        let c = create(&db, "iPad Pro 12.9").await.unwrap();
        assert_eq!((a.code.as_str(), b.code.as_str(), c.code.as_str()), ("A", "B", "C"));
    }

    #[tokio::test]
    async fn freed_code_is_reused() {
        let db = connect_in_memory().await;
        create(&db, "first").await.unwrap();
        let second = create(&db, "second").await.unwrap();
        create(&db, "third").await.unwrap();

        assert!(delete(&db, second.id).await.unwrap());
        let fourth = create(&db, "fourth").await.unwrap();
        assert_eq!(fourth.code, "B");
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let db = connect_in_memory().await;
        create(&db, "iPhone 15 Pro").await.unwrap();
        let err = create(&db, "iPhone 15 Pro").await.unwrap_err();
        assert!(matches!(err, AllocatorError::DuplicateName), "{err:?}");
        assert_eq!(repository::count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_code_is_reported_as_such() {
        let db = connect_in_memory().await;
        repository::insert(&db, "one", "A").await.unwrap();
        let err = repository::insert(&db, "two", "A").await.map_err(insert_error);
        assert!(matches!(err, Err(AllocatorError::DuplicateCode)), "{err:?}");
    }

    #[tokio::test]
    async fn rename_checks_existence_and_uniqueness() {
        let db = connect_in_memory().await;
        let first = create(&db, "first").await.unwrap();
        create(&db, "second").await.unwrap();

        rename(&db, first.id, "renamed").await.unwrap();
        let renamed = get_by_code(&db, "A").await.unwrap().unwrap();
        assert_eq!(renamed.id, first.id);
        assert_eq!(renamed.name, "renamed");

        let dup = rename(&db, first.id, "second").await.unwrap_err();
        assert!(matches!(dup, AllocatorError::DuplicateName));

        let missing = rename(&db, ProductId(999), "ghost").await.unwrap_err();
        assert!(matches!(missing, AllocatorError::ProductNotFound(ProductId(999))));
    }

    #[tokio::test]
    async fn delete_cascades_to_batches() {
        let db = connect_in_memory().await;
        let (product, first) = create_with_first_batch(&db, "iPhone 15 Pro", "5123456789", 1)
            .await
            .unwrap();
        a002_batch::service::add(&db, product.id, "5123456790", 3)
            .await
            .unwrap();

        assert!(delete(&db, product.id).await.unwrap());
        assert_eq!(
            a002_batch::repository::count_by_product(&db, product.id)
                .await
                .unwrap(),
            0
        );
        assert!(a002_batch::repository::get_by_id(&db, first.id)
            .await
            .unwrap()
            .is_none());
        assert!(!delete(&db, product.id).await.unwrap());
        assert!(!delete(&db, ProductId(42)).await.unwrap());
    }

    #[tokio::test]
    async fn first_batch_conflict_rolls_back_product() {
        let db = connect_in_memory().await;
        create_with_first_batch(&db, "iPhone 15 Pro", "5123456789", 1)
            .await
            .unwrap();

        let err = create_with_first_batch(&db, "MacBook Air M3", "5123456789", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AllocatorError::DuplicateBatchNumber));
        assert_eq!(repository::count(&db).await.unwrap(), 1);

        // код B остаётся свободным
        let next = create(&db, "MacBook Air M3").await.unwrap();
        assert_eq!(next.code, "B");
    }

    #[tokio::test]
    async fn list_with_batches_includes_products_without_batches() {
        let db = connect_in_memory().await;
        create_with_first_batch(&db, "Beta", "5000000002", 2).await.unwrap();
        create(&db, "Alpha").await.unwrap();

        let rows = list_with_batches(&db).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Alpha");
        assert!(rows[0].batch_id.is_none());
        assert_eq!(rows[1].batch_number.as_deref(), Some("5000000002"));
        assert_eq!(rows[1].quantity, Some(2));
        assert_eq!(rows[1].unique_code.as_deref(), Some("A1"));

        let products = list_all(&db).await.unwrap();
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }
}
