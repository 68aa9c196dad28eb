use std::str::FromStr;

use crate::external::newsapi;
use crate::external::openai::LlmConfig;
use crate::services::aggregator::{
    AggregatorConfig, Strategy, DEFAULT_FEEDS, DEFAULT_PER_FEED_LIMIT,
};

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Debug, Clone)]
pub struct NewsApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

/// `None` means every origin is allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Option<Vec<String>>,
}

impl CorsConfig {
    pub fn parse(raw: &str) -> Self {
        let origins = split_list(raw);
        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            return Self::default();
        }
        Self {
            allowed_origins: Some(origins),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub news_api: NewsApiConfig,
    pub aggregator: AggregatorConfig,
    pub llm: LlmConfig,
    pub cors: CorsConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let news_api = NewsApiConfig {
            api_key: env_opt("NEWS_API_KEY"),
            base_url: env_opt("NEWS_API_BASE_URL")
                .unwrap_or_else(|| newsapi::DEFAULT_BASE_URL.to_string()),
        };

        let strategy = match env_opt("NEWS_STRATEGY") {
            Some(raw) => Strategy::from_str(&raw)?,
            None if news_api.api_key.is_some() => Strategy::RestFirst,
            None => Strategy::RssFirst,
        };

        let feed_urls = env_opt("RSS_FEEDS")
            .map(|raw| split_list(&raw))
            .filter(|feeds| !feeds.is_empty())
            .unwrap_or_else(|| DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect());

        let aggregator = AggregatorConfig {
            strategy,
            feed_urls,
            per_feed_limit: env_parse("RSS_PER_FEED_LIMIT", DEFAULT_PER_FEED_LIMIT),
            feed_concurrency: env_parse("FEED_CONCURRENCY", 1usize).max(1),
        };

        Ok(Self {
            host: env_opt("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: env_parse("PORT", DEFAULT_PORT),
            news_api,
            aggregator,
            llm: LlmConfig::from_env(),
            cors: CorsConfig::parse(&std::env::var("CORS_ORIGINS").unwrap_or_default()),
        })
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
