use chrono::Utc;
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::errors::{AppError, FeedError, NewsApiError};
use crate::external::newsapi::NewsProvider;
use crate::external::source_client::{SourceClient, SourceRequest, FEED_TIMEOUT};
use crate::models::{
    page_size_limit, Article, ArticleCollection, EverythingQuery, HeadlinesQuery,
};
use crate::services::feed_parser::{self, MAX_ITEMS_PER_FEED};
use crate::services::mock_data::{mock_headlines, mock_news};
use crate::services::normalizer::{normalize, CountPolicy};

pub const DEFAULT_FEEDS: [&str; 2] = [
    "https://feeds.bbci.co.uk/news/rss.xml",
    "http://rss.cnn.com/rss/edition.rss",
];
pub const DEFAULT_PER_FEED_LIMIT: usize = 10;
pub const DEFAULT_TOTAL_LIMIT: usize = 20;
pub const SEARCH_RESULT_LIMIT: usize = 50;

/// Ordered list of upstream stages tried for read endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    RestFirst,
    RssFirst,
    MockOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Rest,
    Rss,
}

impl Strategy {
    pub fn stages(self) -> &'static [Stage] {
        match self {
            Strategy::RestFirst => &[Stage::Rest, Stage::Rss],
            Strategy::RssFirst => &[Stage::Rss, Stage::Rest],
            Strategy::MockOnly => &[],
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rest-first" | "rest" => Ok(Strategy::RestFirst),
            "rss-first" | "rss" => Ok(Strategy::RssFirst),
            "mock-only" | "mock" => Ok(Strategy::MockOnly),
            other => Err(format!(
                "Invalid NEWS_STRATEGY: {}. Must be 'rest-first', 'rss-first' or 'mock-only'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub strategy: Strategy,
    pub feed_urls: Vec<String>,
    pub per_feed_limit: usize,
    /// Concurrent feed fetches; 1 means strictly sequential.
    pub feed_concurrency: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::RssFirst,
            feed_urls: DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect(),
            per_feed_limit: DEFAULT_PER_FEED_LIMIT,
            feed_concurrency: 1,
        }
    }
}

/// Result of one stage of a fallback chain
enum StageOutcome {
    Served(ArticleCollection),
    /// Upstream answered but had nothing matching.
    Empty,
    Failed(Option<NewsApiError>),
    Skipped,
}

enum RestCall<'a> {
    Headlines(&'a HeadlinesQuery),
    Everything(&'a EverythingQuery),
}

struct RssPlan<'a> {
    per_feed_limit: usize,
    total_limit: usize,
    filter: Option<&'a str>,
    shuffle: bool,
}

/// Remembers what happened across the stages of one request.
#[derive(Default)]
struct ChainState {
    surfaced: Option<NewsApiError>,
    answered_empty: bool,
}

impl ChainState {
    fn absorb(&mut self, outcome: StageOutcome) -> Option<ArticleCollection> {
        match outcome {
            StageOutcome::Served(collection) => return Some(collection),
            StageOutcome::Empty => self.answered_empty = true,
            StageOutcome::Failed(Some(err)) if err.is_surfaceable() && self.surfaced.is_none() => {
                self.surfaced = Some(err)
            }
            StageOutcome::Failed(_) | StageOutcome::Skipped => {}
        }
        None
    }
}

/// Queries the configured upstreams in order and degrades to mock data.
pub struct Aggregator {
    source: Arc<dyn SourceClient>,
    news_provider: Option<Arc<dyn NewsProvider>>,
    config: AggregatorConfig,
    rng: Mutex<StdRng>,
}

impl Aggregator {
    pub fn new(
        source: Arc<dyn SourceClient>,
        news_provider: Option<Arc<dyn NewsProvider>>,
        config: AggregatorConfig,
        rng: StdRng,
    ) -> Self {
        info!(
            "Aggregator using {:?} with {} feed(s), REST provider {}",
            config.strategy,
            config.feed_urls.len(),
            if news_provider.is_some() { "configured" } else { "absent" }
        );
        Self {
            source,
            news_provider,
            config,
            rng: Mutex::new(rng),
        }
    }

    /// Fetch, merge, shuffle and truncate the given feeds.
    ///
    /// Never fails: when no feed yields an article the headline mock set is
    /// returned. `totalResults` equals the returned article count.
    pub async fn aggregate(
        &self,
        feed_urls: &[String],
        per_feed_limit: usize,
        total_limit: usize,
    ) -> ArticleCollection {
        let plan = RssPlan {
            per_feed_limit,
            total_limit,
            filter: None,
            shuffle: true,
        };
        match self.rss_stage(feed_urls, &plan).await {
            StageOutcome::Served(collection) => collection,
            _ => {
                warn!("🔄 No feed produced articles, falling back to mock headlines");
                normalize(mock_headlines(Utc::now()), CountPolicy::Returned)
            }
        }
    }

    /// `GET /headlines`. Errors only with `InvalidKey`/`RateLimited`.
    pub async fn headlines(&self, query: &HeadlinesQuery) -> Result<ArticleCollection, AppError> {
        let plan = RssPlan {
            per_feed_limit: self.config.per_feed_limit,
            total_limit: page_size_limit(&query.page_size, DEFAULT_TOTAL_LIMIT),
            filter: None,
            shuffle: true,
        };

        let mut chain = ChainState::default();
        for stage in self.config.strategy.stages() {
            let outcome = match stage {
                Stage::Rest => self.rest_stage(RestCall::Headlines(query)).await,
                Stage::Rss => self.rss_stage(&self.config.feed_urls, &plan).await,
            };
            if let Some(collection) = chain.absorb(outcome) {
                return Ok(collection);
            }
        }

        if let Some(err) = chain.surfaced {
            return Err(err.into());
        }
        info!("🔄 Falling back to mock headlines");
        Ok(normalize(mock_headlines(Utc::now()), CountPolicy::Returned))
    }

    /// `GET /news`. Same propagation rules as [`Aggregator::headlines`].
    pub async fn news(&self, query: &EverythingQuery) -> Result<ArticleCollection, AppError> {
        let plan = RssPlan {
            per_feed_limit: self.config.per_feed_limit,
            total_limit: page_size_limit(&query.page_size, DEFAULT_TOTAL_LIMIT),
            filter: None,
            shuffle: true,
        };

        let mut chain = ChainState::default();
        for stage in self.config.strategy.stages() {
            let outcome = match stage {
                Stage::Rest => self.rest_stage(RestCall::Everything(query)).await,
                Stage::Rss => self.rss_stage(&self.config.feed_urls, &plan).await,
            };
            if let Some(collection) = chain.absorb(outcome) {
                return Ok(collection);
            }
        }

        if let Some(err) = chain.surfaced {
            return Err(err.into());
        }
        info!("🔄 Falling back to mock news");
        Ok(normalize(mock_news(Utc::now()), CountPolicy::Returned))
    }

    /// `GET /search`: REST query, then a local filter over feed articles.
    ///
    /// Zero hits is a valid answer; only a chain where every stage failed
    /// is an error.
    pub async fn search(&self, query: &EverythingQuery) -> Result<ArticleCollection, AppError> {
        let plan = RssPlan {
            per_feed_limit: MAX_ITEMS_PER_FEED,
            total_limit: SEARCH_RESULT_LIMIT,
            filter: Some(query.q.as_str()),
            shuffle: false,
        };

        if self.config.strategy == Strategy::MockOnly {
            let articles = filter_articles(mock_news(Utc::now()).articles, &query.q);
            return Ok(normalize(ArticleCollection::ok(articles), CountPolicy::Returned));
        }

        let mut chain = ChainState::default();
        for stage in self.config.strategy.stages() {
            let outcome = match stage {
                Stage::Rest => self.rest_stage(RestCall::Everything(query)).await,
                Stage::Rss => self.rss_stage(&self.config.feed_urls, &plan).await,
            };
            if let Some(collection) = chain.absorb(outcome) {
                return Ok(collection);
            }
        }

        if chain.answered_empty {
            info!("No articles matched \"{}\"", query.q);
            return Ok(ArticleCollection::ok(Vec::new()));
        }
        if let Some(err) = chain.surfaced {
            return Err(err.into());
        }
        Err(AppError::SearchFailed(format!(
            "no upstream could be searched for \"{}\"",
            query.q
        )))
    }

    async fn rest_stage(&self, call: RestCall<'_>) -> StageOutcome {
        let Some(provider) = &self.news_provider else {
            debug!("REST stage skipped: no news API key configured");
            return StageOutcome::Skipped;
        };

        let result = match call {
            RestCall::Headlines(query) => provider.top_headlines(query).await,
            RestCall::Everything(query) => provider.everything(query).await,
        };

        match result {
            Ok(page) if page.articles.is_empty() => {
                info!("⚠️ News API returned no articles");
                StageOutcome::Empty
            }
            // The REST upstream paginates; totalResults is its pre-pagination count.
            Ok(page) => StageOutcome::Served(normalize(
                ArticleCollection::ok(page.articles),
                CountPolicy::Upstream(page.total_results),
            )),
            Err(e) => {
                warn!("❌ News API stage failed: {}", e);
                StageOutcome::Failed(Some(e))
            }
        }
    }

    async fn rss_stage(&self, feed_urls: &[String], plan: &RssPlan<'_>) -> StageOutcome {
        if feed_urls.is_empty() {
            return StageOutcome::Skipped;
        }

        let (mut articles, succeeded) = self.fetch_feeds(feed_urls, plan.per_feed_limit).await;
        if succeeded == 0 {
            return StageOutcome::Failed(None);
        }

        if let Some(q) = plan.filter {
            articles = filter_articles(articles, q);
        }
        if articles.is_empty() {
            return StageOutcome::Empty;
        }

        if plan.shuffle {
            articles.shuffle(&mut *self.rng.lock());
        }
        articles.truncate(plan.total_limit);

        StageOutcome::Served(normalize(ArticleCollection::ok(articles), CountPolicy::Returned))
    }

    /// Returns the concatenated articles (in feed order) and how many feeds
    /// answered. A failing feed never aborts the batch.
    async fn fetch_feeds(&self, feed_urls: &[String], per_feed_limit: usize) -> (Vec<Article>, usize) {
        let results: Vec<Result<Vec<Article>, FeedError>> = stream::iter(feed_urls.iter().cloned())
            .map(|url| async move { self.fetch_feed(&url).await })
            .buffered(self.config.feed_concurrency.max(1))
            .collect()
            .await;

        let mut articles = Vec::new();
        let mut succeeded = 0;
        for (url, result) in feed_urls.iter().zip(results) {
            match result {
                Ok(mut feed_articles) => {
                    feed_articles.truncate(per_feed_limit);
                    info!("✅ Got {} articles from {}", feed_articles.len(), url);
                    succeeded += 1;
                    articles.extend(feed_articles);
                }
                Err(e) => warn!("⚠️ Failed to fetch from {}: {}", url, e),
            }
        }

        (articles, succeeded)
    }

    async fn fetch_feed(&self, url: &str) -> Result<Vec<Article>, FeedError> {
        let request = SourceRequest::get(url, FEED_TIMEOUT)
            .header("Accept", "application/rss+xml, application/xml, text/xml");
        let body = self.source.fetch(request).await?;

        let mut rng = self.rng.lock();
        feed_parser::parse(&body, url, &mut *rng)
    }
}

/// Case-insensitive substring match over title, description, source and content.
pub fn filter_articles(articles: Vec<Article>, query: &str) -> Vec<Article> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return articles;
    }

    let matches = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(&needle));

    articles
        .into_iter()
        .filter(|a| {
            matches(Some(a.title.as_str()))
                || matches(a.description.as_deref())
                || matches(Some(a.source_name.as_str()))
                || matches(a.content.as_deref())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SourceError;
    use crate::external::newsapi::RestPage;
    use crate::models::{ArticleOrigin, CollectionStatus};
    use crate::test_support::{rss_fixture, FakeResponse, FakeSourceClient};
    use async_trait::async_trait;
    use rand::SeedableRng;
    use std::time::Duration;

    const FEED_A: &str = "https://a.example.com/rss";
    const FEED_B: &str = "https://b.example.com/rss";

    enum FakeRest {
        Articles(usize),
        Status(u16),
        Timeout,
    }

    struct FakeNewsProvider {
        answer: FakeRest,
    }

    impl FakeNewsProvider {
        fn answer(&self) -> Result<RestPage, NewsApiError> {
            match self.answer {
                FakeRest::Articles(n) => Ok(RestPage {
                    articles: (1..=n).map(rest_article).collect(),
                    total_results: 340,
                }),
                FakeRest::Status(status) => Err(SourceError::Upstream {
                    status,
                    body: String::new(),
                }
                .into()),
                FakeRest::Timeout => Err(SourceError::Timeout(Duration::from_secs(15)).into()),
            }
        }
    }

    #[async_trait]
    impl NewsProvider for FakeNewsProvider {
        async fn top_headlines(&self, _query: &HeadlinesQuery) -> Result<RestPage, NewsApiError> {
            self.answer()
        }

        async fn everything(&self, _query: &EverythingQuery) -> Result<RestPage, NewsApiError> {
            self.answer()
        }
    }

    fn rest_article(i: usize) -> Article {
        Article {
            source_name: "Wire".to_string(),
            author: None,
            title: format!("Wire story {}", i),
            description: Some("From the REST upstream".to_string()),
            content: None,
            url: format!("https://wire.example.com/{}", i),
            image_url: None,
            published_at: Utc::now(),
            origin: ArticleOrigin::Rest,
        }
    }

    fn aggregator(
        source: FakeSourceClient,
        rest: Option<FakeRest>,
        strategy: Strategy,
    ) -> Aggregator {
        let news_provider =
            rest.map(|answer| Arc::new(FakeNewsProvider { answer }) as Arc<dyn NewsProvider>);
        let config = AggregatorConfig {
            strategy,
            feed_urls: vec![FEED_A.to_string(), FEED_B.to_string()],
            per_feed_limit: DEFAULT_PER_FEED_LIMIT,
            feed_concurrency: 1,
        };
        Aggregator::new(Arc::new(source), news_provider, config, StdRng::seed_from_u64(7))
    }

    fn headlines_query(page_size: &str) -> HeadlinesQuery {
        HeadlinesQuery {
            country: "us".to_string(),
            category: None,
            page_size: page_size.to_string(),
        }
    }

    fn everything_query(q: &str) -> EverythingQuery {
        EverythingQuery {
            q: q.to_string(),
            language: "en".to_string(),
            sort_by: "publishedAt".to_string(),
            page_size: "50".to_string(),
            page: "1".to_string(),
        }
    }

    fn titles(collection: &ArticleCollection) -> Vec<String> {
        collection.articles.iter().map(|a| a.title.clone()).collect()
    }

    #[tokio::test]
    async fn test_one_feed_down_keeps_the_other() {
        let source = FakeSourceClient::new()
            .with(FEED_A, FakeResponse::Body(rss_fixture("Alpha News", "A", 5)));
        let agg = aggregator(source, None, Strategy::RssFirst);

        let result = agg
            .aggregate(&[FEED_A.to_string(), FEED_B.to_string()], 10, 20)
            .await;

        assert_eq!(result.status, CollectionStatus::Ok);
        assert_eq!(result.articles.len(), 5);
        assert_eq!(result.total_results, 5);
        assert!(result.articles.iter().all(|a| a.source_name == "Alpha News"));
        assert!(result.articles.iter().all(|a| a.origin == ArticleOrigin::Rss));
    }

    #[tokio::test]
    async fn test_all_feeds_down_serves_mock() {
        let agg = aggregator(FakeSourceClient::new(), None, Strategy::RssFirst);

        let result = agg
            .aggregate(&[FEED_A.to_string(), FEED_B.to_string()], 10, 20)
            .await;

        let expected = mock_headlines(Utc::now());
        assert_eq!(result.status, CollectionStatus::Ok);
        assert_eq!(result.total_results, result.articles.len());
        assert_eq!(titles(&result), titles(&expected));
    }

    #[tokio::test]
    async fn test_aggregate_limits_per_feed_and_total() {
        let source = FakeSourceClient::new()
            .with(FEED_A, FakeResponse::Body(rss_fixture("Alpha", "A", 8)))
            .with(FEED_B, FakeResponse::Body(rss_fixture("Beta", "B", 8)));
        let agg = aggregator(source, None, Strategy::RssFirst);

        let result = agg
            .aggregate(&[FEED_A.to_string(), FEED_B.to_string()], 3, 4)
            .await;

        assert_eq!(result.articles.len(), 4);
        assert_eq!(result.total_results, 4);
        // Only the first three items of each feed are eligible.
        for title in titles(&result) {
            let n: usize = title.rsplit(' ').next().unwrap().parse().unwrap();
            assert!(n <= 3, "unexpected item {}", title);
        }
    }

    #[tokio::test]
    async fn test_malformed_feed_counts_as_failure() {
        let source = FakeSourceClient::new()
            .with(FEED_A, FakeResponse::Body("<html>not a feed</html>".to_string()))
            .with(FEED_B, FakeResponse::Body(rss_fixture("Beta", "B", 2)));
        let agg = aggregator(source, None, Strategy::RssFirst);

        let result = agg.headlines(&headlines_query("20")).await.unwrap();
        assert_eq!(result.articles.len(), 2);
        assert!(result.articles.iter().all(|a| a.source_name == "Beta"));
    }

    #[tokio::test]
    async fn test_same_seed_same_order() {
        let make = || {
            let source = FakeSourceClient::new()
                .with(FEED_A, FakeResponse::Body(rss_fixture("Alpha", "A", 6)))
                .with(FEED_B, FakeResponse::Body(rss_fixture("Beta", "B", 6)));
            aggregator(source, None, Strategy::RssFirst)
        };

        let first = make().headlines(&headlines_query("20")).await.unwrap();
        let second = make().headlines(&headlines_query("20")).await.unwrap();
        assert_eq!(titles(&first), titles(&second));
    }

    #[tokio::test]
    async fn test_concurrent_fetch_keeps_feed_order() {
        let source = FakeSourceClient::new()
            .with(FEED_A, FakeResponse::Body(rss_fixture("Alpha", "A", 2)))
            .with(FEED_B, FakeResponse::Body(rss_fixture("Beta", "B", 2)));
        let agg = Aggregator::new(
            Arc::new(source),
            None,
            AggregatorConfig {
                feed_urls: vec![FEED_A.to_string(), FEED_B.to_string()],
                feed_concurrency: 2,
                ..AggregatorConfig::default()
            },
            StdRng::seed_from_u64(1),
        );

        // Search does not shuffle, so the merge order is observable.
        let result = agg.search(&everything_query("story")).await.unwrap();
        assert_eq!(
            titles(&result),
            vec!["A story 1", "A story 2", "B story 1", "B story 2"]
        );
    }

    #[tokio::test]
    async fn test_rest_first_serves_rest_with_upstream_total() {
        let source = FakeSourceClient::new()
            .with(FEED_A, FakeResponse::Body(rss_fixture("Alpha", "A", 5)));
        let agg = aggregator(source, Some(FakeRest::Articles(3)), Strategy::RestFirst);

        let result = agg.headlines(&headlines_query("3")).await.unwrap();
        assert_eq!(result.articles.len(), 3);
        assert_eq!(result.total_results, 340);
        assert!(result.articles.iter().all(|a| a.origin == ArticleOrigin::Rest));
    }

    #[tokio::test]
    async fn test_rate_limit_absorbed_when_rss_succeeds() {
        let source = FakeSourceClient::new()
            .with(FEED_A, FakeResponse::Body(rss_fixture("Alpha", "A", 5)));
        let agg = aggregator(source, Some(FakeRest::Status(429)), Strategy::RestFirst);

        let result = agg.headlines(&headlines_query("20")).await.unwrap();
        assert_eq!(result.articles.len(), 5);
    }

    #[tokio::test]
    async fn test_rate_limit_surfaces_when_nothing_else_answers() {
        let agg = aggregator(
            FakeSourceClient::new(),
            Some(FakeRest::Status(429)),
            Strategy::RestFirst,
        );

        let err = agg.headlines(&headlines_query("20")).await.unwrap_err();
        assert!(matches!(err, AppError::RateLimited));
    }

    #[tokio::test]
    async fn test_invalid_key_surfaces_from_news_endpoint() {
        let agg = aggregator(
            FakeSourceClient::new(),
            Some(FakeRest::Status(401)),
            Strategy::RssFirst,
        );

        let err = agg.news(&everything_query("tech")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidKey));
    }

    #[tokio::test]
    async fn test_plan_upgrade_falls_back_to_mock() {
        let agg = aggregator(
            FakeSourceClient::new(),
            Some(FakeRest::Status(426)),
            Strategy::RestFirst,
        );

        let result = agg.news(&everything_query("tech")).await.unwrap();
        assert_eq!(titles(&result), titles(&mock_news(Utc::now())));
        assert_eq!(result.total_results, 5);
    }

    #[tokio::test]
    async fn test_rest_skipped_without_key() {
        let source = FakeSourceClient::new()
            .with(FEED_B, FakeResponse::Body(rss_fixture("Beta", "B", 2)));
        let agg = aggregator(source, None, Strategy::RestFirst);

        let result = agg.headlines(&headlines_query("20")).await.unwrap();
        assert_eq!(result.articles.len(), 2);
    }

    #[tokio::test]
    async fn test_mock_only_never_touches_network() {
        let source = Arc::new(FakeSourceClient::new());
        let agg = Aggregator::new(
            source.clone(),
            None,
            AggregatorConfig {
                strategy: Strategy::MockOnly,
                ..AggregatorConfig::default()
            },
            StdRng::seed_from_u64(3),
        );

        let result = agg.headlines(&headlines_query("20")).await.unwrap();
        assert_eq!(result.articles.len(), 3);
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_filters_feed_articles() {
        let source = FakeSourceClient::new()
            .with(FEED_A, FakeResponse::Body(rss_fixture("Alpha", "Rocket", 3)))
            .with(FEED_B, FakeResponse::Body(rss_fixture("Beta", "Garden", 3)));
        let agg = aggregator(source, None, Strategy::RssFirst);

        let result = agg.search(&everything_query("ROCKET")).await.unwrap();
        assert_eq!(
            titles(&result),
            vec!["Rocket story 1", "Rocket story 2", "Rocket story 3"]
        );
        assert_eq!(result.total_results, 3);
    }

    #[tokio::test]
    async fn test_search_without_matches_is_empty_not_error() {
        let source = FakeSourceClient::new()
            .with(FEED_A, FakeResponse::Body(rss_fixture("Alpha", "A", 3)));
        let agg = aggregator(source, None, Strategy::RssFirst);

        let result = agg.search(&everything_query("zebra")).await.unwrap();
        assert!(result.articles.is_empty());
        assert_eq!(result.total_results, 0);
    }

    #[tokio::test]
    async fn test_search_fails_when_every_stage_fails() {
        let agg = aggregator(
            FakeSourceClient::new(),
            Some(FakeRest::Status(500)),
            Strategy::RestFirst,
        );

        let err = agg.search(&everything_query("tech")).await.unwrap_err();
        assert!(matches!(err, AppError::SearchFailed(_)));
    }

    #[tokio::test]
    async fn test_feed_timeout_is_absorbed() {
        let source = FakeSourceClient::new()
            .with(FEED_A, FakeResponse::Timeout)
            .with(FEED_B, FakeResponse::Body(rss_fixture("Beta", "B", 4)));
        let agg = aggregator(source, None, Strategy::RssFirst);

        let result = agg.headlines(&headlines_query("20")).await.unwrap();
        assert_eq!(result.articles.len(), 4);
        assert!(result.articles.iter().all(|a| a.source_name == "Beta"));
    }

    #[tokio::test]
    async fn test_rest_timeout_degrades_to_mock() {
        let agg = aggregator(FakeSourceClient::new(), Some(FakeRest::Timeout), Strategy::RestFirst);

        let headlines = agg.headlines(&headlines_query("20")).await.unwrap();
        assert_eq!(titles(&headlines), titles(&mock_headlines(Utc::now())));

        let news = agg.news(&everything_query("tech")).await.unwrap();
        assert_eq!(titles(&news), titles(&mock_news(Utc::now())));
        assert_eq!(news.total_results, news.articles.len());
    }

    #[tokio::test]
    async fn test_chain_futures_can_be_spawned() {
        let source = FakeSourceClient::new()
            .with(FEED_A, FakeResponse::Body(rss_fixture("Alpha", "A", 2)));
        let agg = Arc::new(aggregator(source, Some(FakeRest::Status(500)), Strategy::RestFirst));

        let headlines = {
            let agg = agg.clone();
            tokio::spawn(async move { agg.headlines(&headlines_query("20")).await })
        };
        let news = {
            let agg = agg.clone();
            tokio::spawn(async move { agg.news(&everything_query("tech")).await })
        };
        let search = {
            let agg = agg.clone();
            tokio::spawn(async move { agg.search(&everything_query("story")).await })
        };

        assert_eq!(headlines.await.unwrap().unwrap().articles.len(), 2);
        assert_eq!(news.await.unwrap().unwrap().articles.len(), 2);
        assert_eq!(search.await.unwrap().unwrap().articles.len(), 2);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("rest-first".parse::<Strategy>().unwrap(), Strategy::RestFirst);
        assert_eq!(" RSS-First ".parse::<Strategy>().unwrap(), Strategy::RssFirst);
        assert_eq!("mock-only".parse::<Strategy>().unwrap(), Strategy::MockOnly);
        assert!("sideways".parse::<Strategy>().is_err());
        assert!(Strategy::MockOnly.stages().is_empty());
    }

    #[test]
    fn test_filter_matches_any_text_field() {
        let mut article = rest_article(1);
        article.content = Some("Deep dive into Quantum networking".to_string());
        let kept = filter_articles(vec![article.clone(), rest_article(2)], "quantum");
        assert_eq!(kept, vec![article]);

        assert_eq!(filter_articles(vec![rest_article(3)], "wire").len(), 1);
    }
}
