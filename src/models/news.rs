use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where an article came from. Never serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArticleOrigin {
    Rest,
    Rss,
    #[default]
    Mock,
}

/// A single normalized news article
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub source_name: String,
    pub author: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    /// `"#"` when the upstream gave no link
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    #[serde(skip)]
    pub origin: ArticleOrigin,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CollectionStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleCollection {
    pub status: CollectionStatus,
    pub total_results: usize,
    pub articles: Vec<Article>,
}

impl ArticleCollection {
    pub fn ok(articles: Vec<Article>) -> Self {
        Self {
            status: CollectionStatus::Ok,
            total_results: articles.len(),
            articles,
        }
    }
}

pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_SORT_BY: &str = "publishedAt";
pub const DEFAULT_PAGE_SIZE: &str = "20";
pub const DEFAULT_SEARCH_PAGE_SIZE: &str = "50";
pub const DEFAULT_PAGE: &str = "1";
pub const DEFAULT_NEWS_QUERY: &str = "technology OR science OR business OR health";

/// Query parameters for `GET /headlines`.
///
/// Values are kept as strings and forwarded to the upstream as-is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlinesParams {
    pub country: Option<String>,
    pub category: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlinesQuery {
    pub country: String,
    pub category: Option<String>,
    pub page_size: String,
}

impl HeadlinesParams {
    pub fn resolve(self) -> HeadlinesQuery {
        HeadlinesQuery {
            country: non_empty(self.country).unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            category: non_empty(self.category),
            page_size: non_empty(self.page_size).unwrap_or_else(|| DEFAULT_PAGE_SIZE.to_string()),
        }
    }
}

/// Query parameters for `GET /news` and `GET /search`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsParams {
    pub q: Option<String>,
    pub language: Option<String>,
    pub sort_by: Option<String>,
    pub page_size: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EverythingQuery {
    pub q: String,
    pub language: String,
    pub sort_by: String,
    pub page_size: String,
    pub page: String,
}

impl NewsParams {
    pub fn resolve_news(self) -> EverythingQuery {
        let q = non_empty(self.q.clone()).unwrap_or_else(|| DEFAULT_NEWS_QUERY.to_string());
        self.resolve_with(q, DEFAULT_PAGE_SIZE)
    }

    /// `None` when the caller supplied no query.
    pub fn resolve_search(self) -> Option<EverythingQuery> {
        let q = non_empty(self.q.clone())?;
        Some(self.resolve_with(q, DEFAULT_SEARCH_PAGE_SIZE))
    }

    fn resolve_with(self, q: String, default_page_size: &str) -> EverythingQuery {
        EverythingQuery {
            q,
            language: non_empty(self.language).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            sort_by: non_empty(self.sort_by).unwrap_or_else(|| DEFAULT_SORT_BY.to_string()),
            page_size: non_empty(self.page_size).unwrap_or_else(|| default_page_size.to_string()),
            page: non_empty(self.page).unwrap_or_else(|| DEFAULT_PAGE.to_string()),
        }
    }
}

/// Local truncation limit derived from a forwarded `pageSize`.
pub fn page_size_limit(page_size: &str, default: usize) -> usize {
    page_size
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
