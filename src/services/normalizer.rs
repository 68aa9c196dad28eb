use tracing::debug;

use crate::models::{Article, ArticleCollection, CollectionStatus};

pub const UNKNOWN_SOURCE: &str = "Unknown Source";
pub const PLACEHOLDER_URL: &str = "#";

/// Titles the REST upstream uses for withdrawn articles.
const REMOVED_MARKERS: &[&str] = &["[Removed]"];

/// How `totalResults` is computed for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountPolicy {
    /// Number of articles in the response body.
    Returned,
    /// Pre-pagination count reported by the upstream. Never below the
    /// number of articles actually returned.
    Upstream(usize),
}

/// Enforce the article invariants. `None` for articles without a usable title.
pub fn normalize_article(mut article: Article) -> Option<Article> {
    article.title = article.title.trim().to_string();
    if article.title.is_empty() || REMOVED_MARKERS.contains(&article.title.as_str()) {
        debug!("Dropping article without usable title (url: {})", article.url);
        return None;
    }

    article.source_name = article.source_name.trim().to_string();
    if article.source_name.is_empty() {
        article.source_name = UNKNOWN_SOURCE.to_string();
    }

    if article.url.trim().is_empty() {
        article.url = PLACEHOLDER_URL.to_string();
    }

    article.author = blank_to_none(article.author);
    article.description = blank_to_none(article.description);
    article.content = blank_to_none(article.content);
    article.image_url = blank_to_none(article.image_url);

    Some(article)
}

/// Final pass before a collection is serialized.
pub fn normalize(collection: ArticleCollection, policy: CountPolicy) -> ArticleCollection {
    let articles: Vec<Article> = collection
        .articles
        .into_iter()
        .filter_map(normalize_article)
        .collect();

    let total_results = match policy {
        CountPolicy::Returned => articles.len(),
        CountPolicy::Upstream(n) => n.max(articles.len()),
    };

    ArticleCollection {
        status: CollectionStatus::Ok,
        total_results,
        articles,
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleOrigin;
    use chrono::Utc;

    fn article(title: &str, source: &str, url: &str) -> Article {
        Article {
            source_name: source.to_string(),
            author: Some("  ".to_string()),
            title: title.to_string(),
            description: Some("desc".to_string()),
            content: None,
            url: url.to_string(),
            image_url: Some(String::new()),
            published_at: Utc::now(),
            origin: ArticleOrigin::Rest,
        }
    }

    #[test]
    fn test_fills_placeholders() {
        let normalized = normalize_article(article(" Headline ", "", "")).unwrap();
        assert_eq!(normalized.title, "Headline");
        assert_eq!(normalized.source_name, UNKNOWN_SOURCE);
        assert_eq!(normalized.url, PLACEHOLDER_URL);
        assert!(normalized.author.is_none());
        assert!(normalized.image_url.is_none());
    }

    #[test]
    fn test_drops_untitled_and_removed() {
        assert!(normalize_article(article("", "CNN", "https://x")).is_none());
        assert!(normalize_article(article("[Removed]", "CNN", "https://x")).is_none());
    }

    #[test]
    fn test_total_matches_returned_after_drops() {
        let collection = ArticleCollection {
            status: CollectionStatus::Error,
            total_results: 99,
            articles: vec![
                article("One", "A", "https://a"),
                article("", "B", "https://b"),
                article("Three", "C", "https://c"),
            ],
        };
        let normalized = normalize(collection, CountPolicy::Returned);
        assert_eq!(normalized.status, CollectionStatus::Ok);
        assert_eq!(normalized.total_results, 2);
        assert_eq!(normalized.articles.len(), 2);
    }

    #[test]
    fn test_upstream_count_is_kept_for_paginated_results() {
        let collection = ArticleCollection::ok(vec![article("One", "A", "https://a")]);
        let normalized = normalize(collection.clone(), CountPolicy::Upstream(1234));
        assert_eq!(normalized.total_results, 1234);

        let normalized = normalize(collection, CountPolicy::Upstream(0));
        assert_eq!(normalized.total_results, 1);
    }
}
