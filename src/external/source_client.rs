use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

use crate::errors::SourceError;

/// Upstreams have answered 403/426 to requests without it.
pub const USER_AGENT: &str = "News-Aggregator/1.0 (+rust; reqwest)";

pub const FEED_TIMEOUT: Duration = Duration::from_secs(10);
pub const REST_TIMEOUT: Duration = Duration::from_secs(15);

/// One outbound GET to an upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl SourceRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            timeout,
        }
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.push((key.to_string(), value.into()));
        self
    }
}

/// Fetches the raw body of one upstream resource.
#[async_trait]
pub trait SourceClient: Send + Sync {
    async fn fetch(&self, request: SourceRequest) -> Result<String, SourceError>;
}

/// reqwest-backed client used in production
pub struct HttpSourceClient {
    client: Client,
}

impl HttpSourceClient {
    pub fn new() -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SourceError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl SourceClient for HttpSourceClient {
    async fn fetch(&self, request: SourceRequest) -> Result<String, SourceError> {
        info!("🌐 Fetching {}", request.url);

        let mut builder = self
            .client
            .get(&request.url)
            .timeout(request.timeout)
            .query(&request.query);

        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(request.timeout)
            } else {
                SourceError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("❌ {} answered HTTP {}", request.url, status);
            return Err(SourceError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(request.timeout)
            } else {
                SourceError::Network(e.to_string())
            }
        })
    }
}
