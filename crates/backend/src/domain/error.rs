use contracts::domain::a001_product::aggregate::ProductId;
use contracts::domain::a002_batch::aggregate::BatchId;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Ошибки выдачи кодов и операций записи над продуктами/партиями
#[derive(Debug, Error)]
pub enum AllocatorError {
    #[error("Product name already exists")]
    DuplicateName,

    #[error("Product code already exists")]
    DuplicateCode,

    #[error("Batch number already exists")]
    DuplicateBatchNumber,

    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    #[error("Batch {0} not found")]
    BatchNotFound(BatchId),

    #[error("Database error: {0}")]
    Store(#[from] DbErr),
}

pub type AllocatorResult<T> = Result<T, AllocatorError>;

/// Текст нарушения UNIQUE, если ошибка хранилища именно такая.
///
/// SQLite сообщает `UNIQUE constraint failed: <table>.<column>`.
pub(crate) fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => Some(message),
        _ => None,
    }
}
