use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::net::TcpListener;

use news_aggregator_backend::app;
use news_aggregator_backend::config::AppConfig;
use news_aggregator_backend::external::newsapi::{NewsApiClient, NewsProvider};
use news_aggregator_backend::external::openai::{LlmProvider, OpenAiProvider};
use news_aggregator_backend::external::source_client::{HttpSourceClient, SourceClient};
use news_aggregator_backend::logging::{init_logging, LoggingConfig};
use news_aggregator_backend::services::aggregator::Aggregator;
use news_aggregator_backend::services::rate_limiter::RateLimiter;
use news_aggregator_backend::services::summary_engine::SummaryEngine;
use news_aggregator_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(&LoggingConfig::from_env()?)?;

    let config = AppConfig::from_env().map_err(anyhow::Error::msg)?;

    let source: Arc<dyn SourceClient> =
        Arc::new(HttpSourceClient::new().context("Failed to build HTTP client")?);

    let news_provider: Option<Arc<dyn NewsProvider>> = match &config.news_api.api_key {
        Some(key) => {
            tracing::info!("📰 News API configured at {}", config.news_api.base_url);
            Some(Arc::new(NewsApiClient::new(
                source.clone(),
                Arc::new(RateLimiter::default()),
                key.clone(),
                config.news_api.base_url.clone(),
            )))
        }
        None => {
            tracing::warn!("⚠️ NEWS_API_KEY not set, REST stage disabled");
            None
        }
    };

    let llm: Option<Arc<dyn LlmProvider>> = match OpenAiProvider::from_config(&config.llm)
        .context("Failed to build LLM provider")?
    {
        Some(provider) => {
            tracing::info!("🤖 LLM summaries enabled ({})", provider.name());
            Some(Arc::new(provider))
        }
        None => {
            tracing::info!("🤖 No valid OPENAI_API_KEY, using content analysis only");
            None
        }
    };

    let aggregator = Aggregator::new(
        source,
        news_provider.clone(),
        config.aggregator.clone(),
        StdRng::from_os_rng(),
    );

    let state = AppState {
        aggregator: Arc::new(aggregator),
        summary_engine: Arc::new(SummaryEngine::new(llm)),
        news_provider,
    };
    let app = app::create_app(state, &config.cors);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("🚀 News aggregator backend running at http://{}/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
