use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::handlers;
use crate::shared::config::FetchConfig;
use crate::usecases::u501_extract_batch::page_fetcher::PageFetcher;

/// Состояние, общее для всех обработчиков.
///
/// `db`: пул соединений: каждый запрос берёт соединение на время запроса
/// и возвращает его при любом исходе.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub fetcher: Arc<dyn PageFetcher>,
    pub fetch: FetchConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, fetcher: Arc<dyn PageFetcher>, fetch: FetchConfig) -> Self {
        Self { db, fetcher, fetch }
    }
}

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(json!({"status": "ok"})) }))
        // ========================================
        // A001 Products
        // ========================================
        .route(
            "/api/products",
            get(handlers::a001_product::list_with_batches).post(handlers::a001_product::create),
        )
        .route(
            "/api/products/list",
            get(handlers::a001_product::list_all),
        )
        .route(
            "/api/products/:id",
            put(handlers::a001_product::rename).delete(handlers::a001_product::delete),
        )
        // ========================================
        // A002 Batches
        // ========================================
        .route("/api/batches", post(handlers::a002_batch::add))
        .route(
            "/api/batches/:id",
            put(handlers::a002_batch::update).delete(handlers::a002_batch::delete),
        )
        // ========================================
        // U501 Batch extraction
        // ========================================
        .route(
            "/api/search_product/:batch_number",
            get(handlers::u501_extract_batch::search_product),
        )
        .route(
            "/api/fetch_url",
            get(handlers::u501_extract_batch::fetch_url),
        )
        .route(
            "/api/extract_batch_from_url",
            get(handlers::u501_extract_batch::extract_batch_from_url),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;
    use crate::usecases::u501_extract_batch::page_fetcher::StaticPageFetcher;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn app_with_page(body: &str) -> Router {
        let db = connect_in_memory().await;
        let fetcher = StaticPageFetcher {
            response: Ok(body.to_string()),
        };
        configure_routes(AppState::new(db, Arc::new(fetcher), FetchConfig::default()))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = app_with_page("").await;
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn malformed_batch_numbers_are_rejected_before_allocation() {
        let app = app_with_page("").await;

        for bad in ["4123456789", "512345678", "51234567890"] {
            let (status, body) = call(
                &app,
                Method::POST,
                "/api/products",
                Some(json!({"name": "iPhone 15 Pro", "batch_number": bad})),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{bad}");
            assert_eq!(body["error"], "Batch number must be 10 characters starting with 5");
        }

        let (_, rows) = call(&app, Method::GET, "/api/products/list", None).await;
        assert_eq!(rows, json!([]));
    }

    #[tokio::test]
    async fn missing_fields_are_validation_errors() {
        let app = app_with_page("").await;
        let (status, body) = call(&app, Method::POST, "/api/batches", Some(json!({"batch_number": "5123456789"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Product ID and batch number are required");

        let (status, _) = call(&app, Method::GET, "/api/extract_batch_from_url", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn product_and_batch_lifecycle() {
        let app = app_with_page("").await;

        let (status, created) = call(
            &app,
            Method::POST,
            "/api/products",
            Some(json!({"name": "iPhone 15 Pro", "batch_number": "5123456789"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["code"], "A");
        assert_eq!(created["unique_code"], "A1");
        assert_eq!(created["quantity"], 1);
        let product_id = created["id"].as_i64().unwrap();

        let (status, batch) = call(
            &app,
            Method::POST,
            "/api/batches",
            Some(json!({"product_id": product_id, "batch_number": "5123456790", "quantity": 4})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(batch["unique_code"], "A2");
        assert_eq!(batch["quantity"], 4);

        let (status, dup) = call(
            &app,
            Method::POST,
            "/api/batches",
            Some(json!({"product_id": product_id, "batch_number": "5123456790"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(dup["error"], "Batch number already exists");

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/batches",
            Some(json!({"product_id": 999, "batch_number": "5000000000"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, rows) = call(&app, Method::GET, "/api/products", None).await;
        assert_eq!(rows.as_array().unwrap().len(), 2);

        let (status, found) = call(&app, Method::GET, "/api/search_product/5123456790", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found["found"], true);
        assert_eq!(found["product_code"], "A");

        let uri = format!("/api/products/{product_id}");
        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, missing) = call(&app, Method::GET, "/api/search_product/5123456790", None).await;
        assert_eq!(missing, json!({"found": false, "batch_number": "5123456790"}));
    }

    #[tokio::test]
    async fn batch_update_and_delete_routes() {
        let app = app_with_page("").await;
        let (_, created) = call(
            &app,
            Method::POST,
            "/api/products",
            Some(json!({"name": "MacBook Air M3", "batch_number": "5234567890"})),
        )
        .await;
        let batch_id = created["batch_id"].as_i64().unwrap();
        let uri = format!("/api/batches/{batch_id}");

        let (status, body) = call(&app, Method::PUT, &uri, Some(json!({"batch_number": "5234567891"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["unique_code"], "A1");

        let (status, _) = call(&app, Method::PUT, &uri, Some(json!({"batch_number": "bad"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&app, Method::PUT, "/api/batches/999", Some(json!({"batch_number": "5234567899"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn extraction_endpoint_reports_batch_and_product() {
        let app = app_with_page("SCAN RESULT\nNUMBER: 5-ABC-DEF-GHI STATUS: PASS").await;
        let (status, _) = call(
            &app,
            Method::POST,
            "/api/products",
            Some(json!({"name": "iPad Pro 12.9", "batch_number": "5ABCDEFGHI"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(
            &app,
            Method::GET,
            "/api/extract_batch_from_url?url=https%3A%2F%2Focr.example.com%2Fscan",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["batch_found"], true);
        assert_eq!(body["batch_number"], "5ABCDEFGHI");
        assert_eq!(body["product_info"]["name"], "iPad Pro 12.9");
        assert_eq!(body["url"], "https://ocr.example.com/scan");

        let (status, body) = call(&app, Method::GET, "/api/fetch_url?url=nope", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid URL format");
    }
}
