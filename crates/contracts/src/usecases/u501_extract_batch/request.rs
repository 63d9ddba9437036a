use serde::{Deserialize, Serialize};

/// Параметры запроса `?url=...`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UrlQuery {
    pub url: Option<String>,
}
