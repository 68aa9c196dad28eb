use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::errors::NewsApiError;
use crate::external::source_client::{SourceClient, SourceRequest, REST_TIMEOUT};
use crate::models::{Article, ArticleOrigin, EverythingQuery, HeadlinesQuery};
use crate::services::normalizer::normalize_article;
use crate::services::rate_limiter::RateLimiter;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

/// One page of results from the REST news API.
#[derive(Debug, Clone)]
pub struct RestPage {
    pub articles: Vec<Article>,
    /// Upstream's pre-pagination total
    pub total_results: usize,
}

/// Trait for REST news providers
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn top_headlines(&self, query: &HeadlinesQuery) -> Result<RestPage, NewsApiError>;

    async fn everything(&self, query: &EverythingQuery) -> Result<RestPage, NewsApiError>;
}

/// newsapi.org client. Every call goes through the shared [`RateLimiter`].
pub struct NewsApiClient {
    source: Arc<dyn SourceClient>,
    limiter: Arc<RateLimiter>,
    api_key: String,
    base_url: String,
}

impl NewsApiClient {
    pub fn new(
        source: Arc<dyn SourceClient>,
        limiter: Arc<RateLimiter>,
        api_key: String,
        base_url: String,
    ) -> Self {
        Self {
            source,
            limiter,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn call(&self, request: SourceRequest) -> Result<RestPage, NewsApiError> {
        self.limiter.acquire().await;

        let request = request
            .header("X-Api-Key", self.api_key.clone())
            .header("Accept", "application/json");

        let body = self.source.fetch(request).await.map_err(|e| {
            warn!("News API request failed: {}", e);
            NewsApiError::from(e)
        })?;

        parse_response(&body, Utc::now())
    }
}

#[async_trait]
impl NewsProvider for NewsApiClient {
    async fn top_headlines(&self, query: &HeadlinesQuery) -> Result<RestPage, NewsApiError> {
        info!(
            "Fetching top headlines (country={}, category={:?}, pageSize={})",
            query.country, query.category, query.page_size
        );

        let mut request = SourceRequest::get(format!("{}/top-headlines", self.base_url), REST_TIMEOUT)
            .query("country", query.country.clone())
            .query("pageSize", query.page_size.clone());
        if let Some(category) = &query.category {
            request = request.query("category", category.clone());
        }

        self.call(request).await
    }

    async fn everything(&self, query: &EverythingQuery) -> Result<RestPage, NewsApiError> {
        info!("Fetching news for query \"{}\" (page {})", query.q, query.page);

        let request = SourceRequest::get(format!("{}/everything", self.base_url), REST_TIMEOUT)
            .query("q", query.q.clone())
            .query("language", query.language.clone())
            .query("sortBy", query.sort_by.clone())
            .query("pageSize", query.page_size.clone())
            .query("page", query.page.clone());

        self.call(request).await
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiResponse {
    status: String,
    total_results: Option<usize>,
    articles: Option<Vec<NewsApiArticle>>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    source: Option<NewsApiSource>,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    id: Option<String>,
    name: Option<String>,
}

fn parse_response(body: &str, fetched_at: DateTime<Utc>) -> Result<RestPage, NewsApiError> {
    let response: NewsApiResponse =
        serde_json::from_str(body).map_err(|e| NewsApiError::Parse(e.to_string()))?;

    if response.status != "ok" {
        let message = response.message.unwrap_or_else(|| "unknown error".to_string());
        return Err(match response.code.as_deref() {
            Some("apiKeyInvalid") | Some("apiKeyMissing") | Some("apiKeyDisabled") => {
                NewsApiError::InvalidKey
            }
            Some("rateLimited") => NewsApiError::RateLimited,
            _ => NewsApiError::Api(message),
        });
    }

    let articles: Vec<Article> = response
        .articles
        .unwrap_or_default()
        .into_iter()
        .filter_map(|raw| normalize_article(convert_article(raw, fetched_at)))
        .collect();

    info!("✅ News API returned {} articles", articles.len());

    Ok(RestPage {
        total_results: response.total_results.unwrap_or(articles.len()),
        articles,
    })
}

fn convert_article(raw: NewsApiArticle, fetched_at: DateTime<Utc>) -> Article {
    let source_name = raw
        .source
        .and_then(|s| s.name.or(s.id))
        .unwrap_or_default();

    let published_at = raw
        .published_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(fetched_at);

    Article {
        source_name,
        author: raw.author,
        title: raw.title.unwrap_or_default(),
        description: raw.description,
        content: raw.content,
        url: raw.url.unwrap_or_default(),
        image_url: raw.url_to_image,
        published_at,
        origin: ArticleOrigin::Rest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeResponse, FakeSourceClient};
    use crate::models::HeadlinesParams;

    const OK_BODY: &str = r#"{
        "status": "ok",
        "totalResults": 38,
        "articles": [
            {"source": {"id": "bbc-news", "name": "BBC News"}, "author": "Reporter",
             "title": "First", "description": "d1", "url": "https://bbc.co.uk/1",
             "urlToImage": "https://img/1.jpg", "publishedAt": "2025-06-10T04:00:00Z", "content": "c1"},
            {"source": {"id": null, "name": null}, "author": null,
             "title": "Second", "description": null, "url": null,
             "urlToImage": null, "publishedAt": null, "content": null},
            {"source": {"id": null, "name": "Gone"}, "title": "[Removed]", "url": "https://removed"}
        ]
    }"#;

    fn client(fake: FakeSourceClient) -> (NewsApiClient, Arc<FakeSourceClient>) {
        let fake = Arc::new(fake);
        let client = NewsApiClient::new(
            fake.clone(),
            Arc::new(RateLimiter::default()),
            "test-key".to_string(),
            "https://newsapi.test/v2/".to_string(),
        );
        (client, fake)
    }

    #[test]
    fn test_parse_ok_response() {
        let page = parse_response(OK_BODY, Utc::now()).unwrap();
        assert_eq!(page.total_results, 38);
        assert_eq!(page.articles.len(), 2);
        assert_eq!(page.articles[0].source_name, "BBC News");
        assert_eq!(page.articles[0].image_url.as_deref(), Some("https://img/1.jpg"));
        assert_eq!(page.articles[1].source_name, "Unknown Source");
        assert_eq!(page.articles[1].url, "#");
    }

    #[test]
    fn test_parse_error_body() {
        let body = r#"{"status":"error","code":"apiKeyInvalid","message":"bad key"}"#;
        assert!(matches!(parse_response(body, Utc::now()), Err(NewsApiError::InvalidKey)));

        let body = r#"{"status":"error","code":"parameterInvalid","message":"bad param"}"#;
        assert!(matches!(parse_response(body, Utc::now()), Err(NewsApiError::Api(m)) if m == "bad param"));

        assert!(matches!(parse_response("<html>", Utc::now()), Err(NewsApiError::Parse(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_headlines_request_shape() {
        let (client, fake) = client(
            FakeSourceClient::new()
                .with("https://newsapi.test/v2/top-headlines", FakeResponse::Body(OK_BODY.to_string())),
        );
        let query = HeadlinesParams {
            category: Some("science".into()),
            ..Default::default()
        }
        .resolve();

        let page = client.top_headlines(&query).await.unwrap();
        assert_eq!(page.articles.len(), 2);

        let calls = fake.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].query.contains(&("country".to_string(), "us".to_string())));
        assert!(calls[0].query.contains(&("category".to_string(), "science".to_string())));
        assert!(calls[0].headers.contains(&("X-Api-Key".to_string(), "test-key".to_string())));
        assert_eq!(calls[0].timeout, REST_TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_codes_are_classified() {
        let (client, _) = client(
            FakeSourceClient::new()
                .with("https://newsapi.test/v2/top-headlines", FakeResponse::Status(429))
                .with("https://newsapi.test/v2/everything", FakeResponse::Status(401)),
        );

        let headlines = client.top_headlines(&HeadlinesParams::default().resolve()).await;
        assert!(matches!(headlines, Err(NewsApiError::RateLimited)));

        let everything = client
            .everything(&crate::models::NewsParams::default().resolve_news())
            .await;
        assert!(matches!(everything, Err(NewsApiError::InvalidKey)));
    }
}
