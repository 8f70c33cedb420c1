pub mod analyzer;
pub mod cache;
pub mod compatibility;
pub mod pipeline;

pub use analyzer::{AiColorClient, ColorAnalyzer};
pub use cache::AnalysisCache;
pub use compatibility::{is_unknown_season_candidate, MatchPolicy, Season, Tone};
pub use pipeline::RecommendationPipeline;
