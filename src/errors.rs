use std::time::Duration;

use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failure while talking to a single upstream over HTTP.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
}

/// Classified failures of the REST news API.
#[derive(Debug, Error)]
pub enum NewsApiError {
    #[error("news API key is invalid or expired")]
    InvalidKey,
    #[error("rate limited by news API")]
    RateLimited,
    #[error("news API plan needs upgrade for this feature")]
    PlanUpgradeRequired,
    #[error("news API error: {0}")]
    Api(String),
    #[error("failed to parse news API response: {0}")]
    Parse(String),
    #[error(transparent)]
    Source(SourceError),
}

impl From<SourceError> for NewsApiError {
    fn from(value: SourceError) -> Self {
        match value {
            SourceError::Upstream { status: 401, .. } => NewsApiError::InvalidKey,
            SourceError::Upstream { status: 429, .. } => NewsApiError::RateLimited,
            SourceError::Upstream { status: 426, .. } => NewsApiError::PlanUpgradeRequired,
            other => NewsApiError::Source(other),
        }
    }
}

impl NewsApiError {
    /// Only these two kinds are reported to HTTP callers; everything else is
    /// absorbed by the aggregator.
    pub fn is_surfaceable(&self) -> bool {
        matches!(self, NewsApiError::InvalidKey | NewsApiError::RateLimited)
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("malformed feed: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Error)]
pub enum LlmError {
    #[error("LLM provider rejected the API key")]
    InvalidKey,
    #[error("LLM request timed out")]
    Timeout,
    #[error("LLM network error: {0}")]
    NetworkError(String),
    #[error("rate limited by LLM provider")]
    RateLimited,
    #[error("LLM API error: {0}")]
    ApiError(String),
    #[error("invalid LLM response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Search query is required")]
    MissingQuery,
    #[error("Title, description, or content is required for summarization")]
    MissingContent,
    #[error("News API key is invalid or expired")]
    InvalidKey,
    #[error("Too many requests to News API. Please try again later.")]
    RateLimited,
    #[error("Unable to search articles at this time: {0}")]
    SearchFailed(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::MissingQuery | AppError::MissingContent => StatusCode::BAD_REQUEST,
            AppError::InvalidKey => StatusCode::UNAUTHORIZED,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::SearchFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AppError::MissingQuery => "Missing query",
            AppError::MissingContent => "Missing content",
            AppError::InvalidKey => "Invalid API key",
            AppError::RateLimited => "Rate limit exceeded",
            AppError::SearchFailed(_) => "Search failed",
            AppError::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.label(),
            "message": self.to_string(),
        }));

        match self {
            AppError::RateLimited => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                (status, headers, body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

impl From<NewsApiError> for AppError {
    fn from(value: NewsApiError) -> Self {
        match value {
            NewsApiError::InvalidKey => AppError::InvalidKey,
            NewsApiError::RateLimited => AppError::RateLimited,
            other => AppError::Internal(other.to_string()),
        }
    }
}
