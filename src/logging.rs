use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset: our own events at info, the noisy
/// HTTP stack at warn.
pub const DEFAULT_DIRECTIVES: &str = "news_aggregator_backend=info,reqwest=warn,hyper=warn,info";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub directives: String,
    /// Loki push endpoint; events are only shipped when this is set.
    pub loki_url: Option<url::Url>,
    pub service_name: String,
    pub environment: String,
}

impl LoggingConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let loki_enabled = std::env::var("LOKI_ENABLED")
            .ok()
            .and_then(|v| v.trim().parse::<bool>().ok())
            .unwrap_or(false);
        let loki_url = std::env::var("LOKI_URL").ok().filter(|v| !v.trim().is_empty());

        Self::build(
            std::env::var("RUST_LOG").ok(),
            loki_enabled,
            loki_url.as_deref(),
            std::env::var("SERVICE_NAME").ok(),
            std::env::var("ENVIRONMENT").ok(),
        )
    }

    fn build(
        directives: Option<String>,
        loki_enabled: bool,
        loki_url: Option<&str>,
        service_name: Option<String>,
        environment: Option<String>,
    ) -> anyhow::Result<Self> {
        let loki_url = match (loki_enabled, loki_url) {
            (false, _) => None,
            (true, None) => anyhow::bail!("LOKI_ENABLED is true but LOKI_URL is not set"),
            (true, Some(raw)) => Some(url::Url::parse(raw.trim())?),
        };

        Ok(Self {
            directives: directives
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DIRECTIVES.to_string()),
            loki_url,
            service_name: service_name.unwrap_or_else(|| "news-aggregator".to_string()),
            environment: environment.unwrap_or_else(|| "development".to_string()),
        })
    }
}

/// Install the global subscriber: fmt output always, plus a Loki layer when
/// configured and the `loki` feature is built in. Must run inside the tokio
/// runtime when Loki is enabled.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&config.directives)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(loki_layer(config)?)
        .try_init()?;

    tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        loki = config.loki_url.is_some(),
        "📊 Logging initialized"
    );
    Ok(())
}

#[cfg(feature = "loki")]
fn loki_layer(config: &LoggingConfig) -> anyhow::Result<Option<tracing_loki::Layer>> {
    let Some(url) = config.loki_url.clone() else {
        return Ok(None);
    };

    let (layer, task) = tracing_loki::builder()
        .label("service", &config.service_name)?
        .label("environment", &config.environment)?
        .build_url(url)?;
    tokio::spawn(task);

    Ok(Some(layer))
}

#[cfg(not(feature = "loki"))]
fn loki_layer(config: &LoggingConfig) -> anyhow::Result<Option<tracing_subscriber::layer::Identity>> {
    if config.loki_url.is_some() {
        eprintln!("LOKI_URL is set but the binary was built without the `loki` feature");
    }
    Ok(None)
}
