use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the color-analysis AI service
    #[serde(default = "default_ai_server_url")]
    pub ai_server_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Minimum interval between outbound classification calls, in milliseconds
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// Freshness window for cached analysis results, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Upper bound on live cache entries
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// Maximum number of candidate products analyzed per request
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

fn default_ai_server_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_pacing_ms() -> u64 {
    500
}

fn default_cache_ttl_secs() -> u64 {
    600
}

fn default_cache_max_entries() -> usize {
    1024
}

fn default_max_candidates() -> usize {
    6
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
