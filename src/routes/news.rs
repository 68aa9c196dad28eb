use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::errors::{AppError, NewsApiError, SourceError};
use crate::models::{ArticleCollection, HeadlinesParams, HeadlinesQuery, NewsParams};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/headlines", get(get_headlines))
        .route("/news", get(get_news))
        .route("/search", get(search_news))
        .route("/test-api-key", get(test_api_key))
}

pub async fn get_headlines(
    Query(params): Query<HeadlinesParams>,
    State(state): State<AppState>,
) -> Result<Json<ArticleCollection>, AppError> {
    let query = params.resolve();
    info!(
        "GET /headlines - country={} category={:?} pageSize={}",
        query.country, query.category, query.page_size
    );

    let collection = state.aggregator.headlines(&query).await.map_err(|e| {
        error!("Failed to serve headlines: {}", e);
        e
    })?;
    Ok(Json(collection))
}

pub async fn get_news(
    Query(params): Query<NewsParams>,
    State(state): State<AppState>,
) -> Result<Json<ArticleCollection>, AppError> {
    let query = params.resolve_news();
    info!("GET /news - q=\"{}\" pageSize={}", query.q, query.page_size);

    let collection = state.aggregator.news(&query).await.map_err(|e| {
        error!("Failed to serve news: {}", e);
        e
    })?;
    Ok(Json(collection))
}

pub async fn search_news(
    Query(params): Query<NewsParams>,
    State(state): State<AppState>,
) -> Result<Json<ArticleCollection>, AppError> {
    let query = params.resolve_search().ok_or(AppError::MissingQuery)?;
    info!("GET /search - q=\"{}\"", query.q);

    let collection = state.aggregator.search(&query).await.map_err(|e| {
        error!("Search for \"{}\" failed: {}", query.q, e);
        e
    })?;
    Ok(Json(collection))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyCheck {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_results: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Always 200; the body says whether the configured key works.
pub async fn test_api_key(State(state): State<AppState>) -> Json<KeyCheck> {
    info!("GET /test-api-key - Checking news API key");

    let Some(provider) = &state.news_provider else {
        return Json(KeyCheck {
            valid: false,
            status: None,
            total_results: None,
            message: None,
            error: Some("API key not found in environment variables".to_string()),
        });
    };

    let check_query = HeadlinesQuery {
        country: "us".to_string(),
        category: None,
        page_size: "1".to_string(),
    };

    match provider.top_headlines(&check_query).await {
        Ok(page) => Json(KeyCheck {
            valid: true,
            status: Some("ok".into()),
            total_results: Some(page.total_results),
            message: Some("API key is working correctly".to_string()),
            error: None,
        }),
        Err(e) => {
            warn!("News API key check failed: {}", e);
            Json(KeyCheck {
                valid: false,
                status: http_status(&e).map(Into::into),
                total_results: None,
                message: None,
                error: Some(e.to_string()),
            })
        }
    }
}

fn http_status(err: &NewsApiError) -> Option<u16> {
    match err {
        NewsApiError::InvalidKey => Some(401),
        NewsApiError::RateLimited => Some(429),
        NewsApiError::PlanUpgradeRequired => Some(426),
        NewsApiError::Source(SourceError::Upstream { status, .. }) => Some(*status),
        _ => None,
    }
}
