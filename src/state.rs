use std::sync::Arc;

use crate::external::newsapi::NewsProvider;
use crate::services::aggregator::Aggregator;
use crate::services::summary_engine::SummaryEngine;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub summary_engine: Arc<SummaryEngine>,
    /// Absent when no news API key is configured.
    pub news_provider: Option<Arc<dyn NewsProvider>>,
}
