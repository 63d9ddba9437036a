use std::collections::HashMap;

use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;

use crate::domain::{a001_product, a002_batch};

/// Демонстрационные данные: (продукт, номер партии)
const SAMPLE_DATA: &[(&str, &str)] = &[
    ("iPhone 15 Pro", "5123456789"),
    ("iPhone 15 Pro", "5123456790"),
    ("MacBook Air M3", "5234567890"),
    ("MacBook Air M3", "5234567891"),
    ("iPad Pro 12.9", "5345678901"),
];

/// Заполнить пустую базу демонстрационными данными (`--seed`)
pub async fn seed_sample_data(db: &DatabaseConnection) -> Result<()> {
    if a001_product::repository::count(db).await? > 0 {
        tracing::info!("Database already has products, skipping seed");
        return Ok(());
    }

    // имя продукта -> выданный код
    let mut codes: HashMap<&str, String> = HashMap::new();
    for &(name, batch_number) in SAMPLE_DATA {
        if !codes.contains_key(name) {
            let product = a001_product::service::create(db, name).await?;
            codes.insert(name, product.code);
        }
        let code = &codes[name];
        let product = a001_product::service::get_by_code(db, code)
            .await?
            .with_context(|| format!("seeded product {code} disappeared"))?;
        a002_batch::service::add(db, product.id, batch_number, 1).await?;
    }

    tracing::info!(
        "Seeded {} products and {} batches",
        codes.len(),
        SAMPLE_DATA.len()
    );
    Ok(())
}
