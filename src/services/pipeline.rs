//! Recommendation pipeline
//!
//! Runs a caller-supplied list of candidate products through the analysis
//! cache, the classifier, and the compatibility policy, producing the
//! accepted outcomes plus run statistics. One sequential worker per run;
//! the cache is the only state shared across runs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::sleep;

use crate::models::{Product, Recommendation, RunStats};
use crate::services::analyzer::ColorAnalyzer;
use crate::services::cache::AnalysisCache;
use crate::services::compatibility::MatchPolicy;

/// Default minimum interval between outbound classification calls
const DEFAULT_PACING: Duration = Duration::from_millis(500);

/// Rate limit applied to outbound classifier calls
///
/// Cache hits never pace; only actual external calls count against the
/// interval. `Duration::ZERO` disables pacing.
struct Pacer {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl Pacer {
    fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    /// Waits out the remainder of the interval since the previous call
    async fn wait(&mut self) {
        if let Some(last) = self.last_call {
            let since = last.elapsed();
            if since < self.min_interval {
                sleep(self.min_interval - since).await;
            }
        }
        self.last_call = Some(Instant::now());
    }
}

/// Orchestrates candidate products into a filtered recommendation list
pub struct RecommendationPipeline {
    analyzer: Arc<dyn ColorAnalyzer>,
    cache: Arc<AnalysisCache>,
    policy: MatchPolicy,
    pacing: Duration,
}

impl RecommendationPipeline {
    pub fn new(analyzer: Arc<dyn ColorAnalyzer>, cache: Arc<AnalysisCache>) -> Self {
        Self {
            analyzer,
            cache,
            policy: MatchPolicy::default(),
            pacing: DEFAULT_PACING,
        }
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Evaluates candidates in input order and returns the accepted outcomes
    /// plus run statistics
    ///
    /// A failed health probe short-circuits to an empty, well-formed result.
    /// A per-candidate analyzer error skips that candidate and the run
    /// continues.
    pub async fn recommend(
        &self,
        candidates: &[Product],
        user_color: &str,
    ) -> (Vec<Recommendation>, RunStats) {
        let mut stats = RunStats {
            total_candidates: candidates.len(),
            ..Default::default()
        };

        if candidates.is_empty() {
            return (Vec::new(), stats);
        }

        let start = Instant::now();

        if !self.analyzer.health_check().await {
            tracing::warn!("AI service unhealthy, returning empty recommendation set");
            stats.elapsed_ms = start.elapsed().as_millis() as u64;
            return (Vec::new(), stats);
        }

        tracing::info!(
            candidates = candidates.len(),
            user_color = %user_color,
            "Recommendation run started"
        );

        let mut accepted = Vec::new();
        let mut pacer = Pacer::new(self.pacing);

        for product in candidates {
            let analysis = match self.cache.lookup(&product.image_url).await {
                Some(analysis) => analysis,
                None => {
                    pacer.wait().await;
                    match self.analyzer.analyze(&product.image_url).await {
                        Ok(analysis) => {
                            self.cache.store(&product.image_url, analysis.clone()).await;
                            analysis
                        }
                        Err(e) => {
                            tracing::error!(
                                product = %product.name,
                                error = %e,
                                "Candidate analysis failed, skipping"
                            );
                            continue;
                        }
                    }
                }
            };

            stats.analyzed += 1;

            let compatible =
                self.policy
                    .is_compatible(user_color, &analysis.personal_color, analysis.confidence);

            tracing::debug!(
                product = %product.name,
                personal_color = %analysis.personal_color,
                confidence = analysis.confidence,
                accepted = compatible,
                "Candidate evaluated"
            );

            if compatible {
                stats.matched += 1;
                accepted.push(Recommendation {
                    product: product.clone(),
                    analysis,
                    accepted: true,
                });
            }
        }

        stats.elapsed_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            total = stats.total_candidates,
            analyzed = stats.analyzed,
            matched = stats.matched,
            elapsed_ms = stats.elapsed_ms,
            match_rate = stats.match_rate(),
            "Recommendation run finished"
        );

        (accepted, stats)
    }
}
