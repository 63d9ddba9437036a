use std::path::Path;

use once_cell::sync::Lazy;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use tokio::sync::{Mutex, MutexGuard};

/// Все пишущие операции процесса идут по одной. Отложенная транзакция SQLite
/// при переходе от чтения к записи не ждёт busy_timeout и сразу отдаёт
/// `database is locked`, поэтому очередь держим сами.
static WRITE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Захват очереди записи; держать до commit
pub async fn write_guard() -> MutexGuard<'static, ()> {
    WRITE_LOCK.lock().await
}

/// Схема хранилища. `unique_code` намеренно без UNIQUE: после удаления партий
/// пересчитанный по позиции код может совпасть с уже выданным.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS a001_product (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT UNIQUE NOT NULL,
        code TEXT UNIQUE NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS a002_batch (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        product_id INTEGER NOT NULL,
        batch_number TEXT UNIQUE NOT NULL,
        quantity INTEGER NOT NULL DEFAULT 1,
        unique_code TEXT NOT NULL,
        FOREIGN KEY (product_id) REFERENCES a001_product (id)
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_a002_batch_product_id ON a002_batch (product_id);",
];

/// Открывает (или создаёт) файл SQLite и применяет схему.
///
/// Возвращённый пул передаётся дальше явно через состояние роутера.
pub async fn initialize_database(db_file: &Path) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Opening database at {}", absolute_path.display());
    let conn = Database::connect(&db_url).await?;
    bootstrap_schema(&conn).await?;

    Ok(conn)
}

/// Создание таблиц, если их ещё нет
pub async fn bootstrap_schema<C: ConnectionTrait>(conn: &C) -> Result<(), sea_orm::DbErr> {
    for sql in SCHEMA {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }
    tracing::debug!("Schema bootstrap finished");
    Ok(())
}

/// In-memory база для тестов: один коннект, иначе каждый получит свою пустую БД
#[cfg(test)]
pub async fn connect_in_memory() -> DatabaseConnection {
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let conn = Database::connect(options)
        .await
        .expect("in-memory sqlite should open");
    bootstrap_schema(&conn).await.expect("schema should apply");
    conn
}
