use contracts::domain::a001_product::aggregate::ProductId;
use contracts::domain::a002_batch::aggregate::{Batch, BatchId};
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_batch")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub product_id: i64,
    #[sea_orm(unique)]
    pub batch_number: String,
    pub quantity: i32,
    pub unique_code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Batch {
    fn from(m: Model) -> Self {
        Batch {
            id: BatchId(m.id),
            product_id: ProductId(m.product_id),
            batch_number: m.batch_number,
            quantity: m.quantity,
            unique_code: m.unique_code,
        }
    }
}

pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: BatchId) -> Result<Option<Batch>, DbErr> {
    let result = Entity::find_by_id(id.value()).one(db).await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_number<C: ConnectionTrait>(
    db: &C,
    batch_number: &str,
) -> Result<Option<Batch>, DbErr> {
    let result = Entity::find()
        .filter(Column::BatchNumber.eq(batch_number))
        .one(db)
        .await?;
    Ok(result.map(Into::into))
}

/// Количество партий продукта
pub async fn count_by_product<C: ConnectionTrait>(
    db: &C,
    product_id: ProductId,
) -> Result<u64, DbErr> {
    Entity::find()
        .filter(Column::ProductId.eq(product_id.value()))
        .count(db)
        .await
}

/// Количество партий продукта с id <= `batch_id` (позиция партии по порядку вставки)
pub async fn count_by_product_up_to<C: ConnectionTrait>(
    db: &C,
    product_id: ProductId,
    batch_id: BatchId,
) -> Result<u64, DbErr> {
    Entity::find()
        .filter(Column::ProductId.eq(product_id.value()))
        .filter(Column::Id.lte(batch_id.value()))
        .count(db)
        .await
}

pub async fn insert<C: ConnectionTrait>(
    db: &C,
    product_id: ProductId,
    batch_number: &str,
    quantity: i32,
    unique_code: &str,
) -> Result<Batch, DbErr> {
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        product_id: Set(product_id.value()),
        batch_number: Set(batch_number.to_string()),
        quantity: Set(quantity),
        unique_code: Set(unique_code.to_string()),
    };
    let model = active.insert(db).await?;
    Ok(model.into())
}

pub async fn update_number<C: ConnectionTrait>(
    db: &C,
    id: BatchId,
    batch_number: &str,
    unique_code: &str,
) -> Result<bool, DbErr> {
    let result = Entity::update_many()
        .col_expr(Column::BatchNumber, Expr::value(batch_number))
        .col_expr(Column::UniqueCode, Expr::value(unique_code))
        .filter(Column::Id.eq(id.value()))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: BatchId) -> Result<bool, DbErr> {
    let result = Entity::delete_many()
        .filter(Column::Id.eq(id.value()))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn delete_by_product<C: ConnectionTrait>(
    db: &C,
    product_id: ProductId,
) -> Result<u64, DbErr> {
    let result = Entity::delete_many()
        .filter(Column::ProductId.eq(product_id.value()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
