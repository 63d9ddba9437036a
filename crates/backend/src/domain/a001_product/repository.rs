use std::collections::HashSet;

use contracts::domain::a001_product::aggregate::{Product, ProductBatchRow, ProductId};
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{DatabaseBackend, FromQueryResult, QueryOrder, Set, Statement};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(m: Model) -> Self {
        Product {
            id: ProductId(m.id),
            name: m.name,
            code: m.code,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct ProductBatchRowModel {
    id: i64,
    name: String,
    code: String,
    batch_id: Option<i64>,
    batch_number: Option<String>,
    quantity: Option<i32>,
    unique_code: Option<String>,
}

impl From<ProductBatchRowModel> for ProductBatchRow {
    fn from(m: ProductBatchRowModel) -> Self {
        ProductBatchRow {
            id: ProductId(m.id),
            name: m.name,
            code: m.code,
            batch_id: m.batch_id,
            batch_number: m.batch_number,
            quantity: m.quantity,
            unique_code: m.unique_code,
        }
    }
}

pub async fn list_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Product>, DbErr> {
    let items = Entity::find()
        .order_by_asc(Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Все продукты с партиями (LEFT JOIN): продукт без партий даёт одну строку с пустыми полями
pub async fn list_with_batches<C: ConnectionTrait>(db: &C) -> Result<Vec<ProductBatchRow>, DbErr> {
    let sql = r#"
        SELECT p.id, p.name, p.code,
               b.id AS batch_id, b.batch_number, b.quantity, b.unique_code
        FROM a001_product p
        LEFT JOIN a002_batch b ON p.id = b.product_id
        ORDER BY p.name, b.batch_number
    "#;
    let rows = ProductBatchRowModel::find_by_statement(Statement::from_string(
        DatabaseBackend::Sqlite,
        sql.to_string(),
    ))
    .all(db)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: ProductId) -> Result<Option<Product>, DbErr> {
    let result = Entity::find_by_id(id.value()).one(db).await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_code<C: ConnectionTrait>(db: &C, code: &str) -> Result<Option<Product>, DbErr> {
    let result = Entity::find()
        .filter(Column::Code.eq(code))
        .one(db)
        .await?;
    Ok(result.map(Into::into))
}

/// Все выданные коды продуктов
pub async fn list_codes<C: ConnectionTrait>(db: &C) -> Result<HashSet<String>, DbErr> {
    let codes = Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|m| m.code)
        .collect();
    Ok(codes)
}

pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    Entity::find().count(db).await
}

pub async fn insert<C: ConnectionTrait>(db: &C, name: &str, code: &str) -> Result<Product, DbErr> {
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        name: Set(name.to_string()),
        code: Set(code.to_string()),
    };
    let model = active.insert(db).await?;
    Ok(model.into())
}

pub async fn update_name<C: ConnectionTrait>(
    db: &C,
    id: ProductId,
    name: &str,
) -> Result<bool, DbErr> {
    let result = Entity::update_many()
        .col_expr(Column::Name, Expr::value(name))
        .filter(Column::Id.eq(id.value()))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: ProductId) -> Result<bool, DbErr> {
    let result = Entity::delete_many()
        .filter(Column::Id.eq(id.value()))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}
