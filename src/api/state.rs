use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::services::{AiColorClient, AnalysisCache, ColorAnalyzer, RecommendationPipeline};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<dyn ColorAnalyzer>,
    pub pipeline: Arc<RecommendationPipeline>,
    /// Candidate cap applied at the API boundary
    pub max_candidates: usize,
}

impl AppState {
    /// Wires the production analyzer, cache, and pipeline from configuration
    pub fn from_config(config: &Config) -> Self {
        let analyzer: Arc<dyn ColorAnalyzer> =
            Arc::new(AiColorClient::new(config.ai_server_url.clone()));
        let cache = Arc::new(AnalysisCache::with_limits(
            Duration::from_secs(config.cache_ttl_secs),
            config.cache_max_entries,
        ));
        let pipeline = Arc::new(
            RecommendationPipeline::new(analyzer.clone(), cache)
                .with_pacing(Duration::from_millis(config.pacing_ms)),
        );

        Self {
            analyzer,
            pipeline,
            max_candidates: config.max_candidates,
        }
    }

    /// Assembles state from pre-built parts; used by tests to inject doubles
    pub fn new(
        analyzer: Arc<dyn ColorAnalyzer>,
        pipeline: Arc<RecommendationPipeline>,
        max_candidates: usize,
    ) -> Self {
        Self {
            analyzer,
            pipeline,
            max_candidates,
        }
    }
}
