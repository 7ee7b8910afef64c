//! Thin JSON-over-HTTP client used by the data-source tools.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::retry::{RetryPolicy, Retryable};

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url} -> {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("GET {url} returned invalid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Retryable for HttpError {
    fn is_retryable(&self) -> bool {
        match self {
            HttpError::Transport { .. } => true,
            HttpError::Status { status, .. } => {
                status.is_server_error()
                    || *status == StatusCode::TOO_MANY_REQUESTS
                    || *status == StatusCode::REQUEST_TIMEOUT
            }
            HttpError::Decode { .. } => false,
        }
    }
}

/// GET-only client bound to one base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pokedeep/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join `path` onto the base URL.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path` and parse the body as JSON, retrying transient failures.
    pub async fn get_json(&self, path: &str) -> Result<Value, HttpError> {
        let url = self.url_for(path);
        self.retry.run(|| self.get_once(&url)).await
    }

    async fn get_once(&self, url: &str) -> Result<Value, HttpError> {
        tracing::debug!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| HttpError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| HttpError::Transport {
            url: url.to_string(),
            source,
        })?;

        if status.is_client_error() || status.is_server_error() {
            return Err(HttpError::Status {
                url: url.to_string(),
                status,
                body: text.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&text).map_err(|source| HttpError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
