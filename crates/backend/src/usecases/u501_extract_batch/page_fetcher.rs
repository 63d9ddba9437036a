use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use thiserror::Error;

use crate::shared::config::FetchConfig;

/// Ошибки загрузки внешней страницы
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL format")]
    InvalidUrl,

    #[error("HTTP {code}: {reason}")]
    Status { code: u16, reason: String },

    #[error("Request failed: {0}")]
    Transport(String),
}

/// Источник текста по URL (HTTP-клиент или заглушка в тестах)
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Тело ответа как текст; всё, кроме 200, считается ошибкой
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// URL должен содержать схему и хост
pub fn parse_target_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw.trim()).map_err(|_| FetchError::InvalidUrl)?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(FetchError::InvalidUrl);
    }
    Ok(url)
}

/// Клиент на reqwest с таймаутом и фиксированным User-Agent
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("Upstream {} answered {}", url, status);
            return Err(FetchError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))
    }
}

/// Заглушка: отдаёт заранее заданный ответ на любой URL
#[cfg(test)]
pub struct StaticPageFetcher {
    pub response: Result<String, (u16, &'static str)>,
}

#[cfg(test)]
#[async_trait]
impl PageFetcher for StaticPageFetcher {
    async fn fetch(&self, _url: &Url) -> Result<String, FetchError> {
        match &self.response {
            Ok(body) => Ok(body.clone()),
            Err((code, reason)) => Err(FetchError::Status {
                code: *code,
                reason: reason.to_string(),
            }),
        }
    }
}
