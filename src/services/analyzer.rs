//! Client for the external color-classification service
//!
//! The service exposes `POST /analyze-color` and `GET /health`. Every
//! failure path of `analyze` resolves to [`ColorAnalysis::fallback`]; the
//! pipeline never has to care whether the network, the service, or the
//! response body misbehaved.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    models::{ColorAnalysis, UNKNOWN_LABEL},
};

/// Classification provider abstraction
///
/// The production implementation talks HTTP; tests substitute mocks. The
/// `Err` arm exists for implementations that cannot recover locally — the
/// HTTP client itself always resolves failures to the fallback value.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ColorAnalyzer: Send + Sync {
    /// Classify the dominant palette of one product image
    async fn analyze(&self, image_url: &str) -> AppResult<ColorAnalysis>;

    /// Probe the service's health endpoint; false on any failure
    async fn health_check(&self) -> bool;
}

/// Wire format of the analysis endpoint; every field optional
#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default = "default_personal_color")]
    personal_color: String,
    #[serde(default)]
    confidence: i64,
    #[serde(default = "default_reason")]
    reason: String,
    #[serde(default)]
    dominant_colors: Vec<serde_json::Value>,
}

fn default_personal_color() -> String {
    UNKNOWN_LABEL.to_string()
}

fn default_reason() -> String {
    "no result".to_string()
}

impl From<AnalyzeResponse> for ColorAnalysis {
    fn from(wire: AnalyzeResponse) -> Self {
        let dominant_colors = wire
            .dominant_colors
            .into_iter()
            .map(|color| match color.as_str() {
                Some(text) => text.to_string(),
                None => color.to_string(),
            })
            .collect();

        ColorAnalysis {
            personal_color: wire.personal_color,
            confidence: wire.confidence.clamp(0, 100) as u8,
            reason: wire.reason,
            dominant_colors,
        }
    }
}

/// HTTP client for the AI color-analysis service
#[derive(Clone)]
pub struct AiColorClient {
    http_client: HttpClient,
    base_url: String,
}

impl AiColorClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url,
        }
    }

    async fn request_analysis(&self, image_url: &str) -> AppResult<ColorAnalysis> {
        let url = format!("{}/analyze-color", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(&json!({ "image_url": image_url }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "AI service returned status {}: {}",
                status, body
            )));
        }

        let wire: AnalyzeResponse = response.json().await?;
        Ok(ColorAnalysis::from(wire))
    }
}

#[async_trait]
impl ColorAnalyzer for AiColorClient {
    async fn analyze(&self, image_url: &str) -> AppResult<ColorAnalysis> {
        match self.request_analysis(image_url).await {
            Ok(analysis) => {
                tracing::info!(
                    personal_color = %analysis.personal_color,
                    confidence = analysis.confidence,
                    "AI analysis completed"
                );
                Ok(analysis)
            }
            Err(e) => {
                tracing::warn!(error = %e, image_url = %image_url, "AI analysis failed, using fallback");
                Ok(ColorAnalysis::fallback())
            }
        }
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.base_url);

        match self.http_client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, "AI service health check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_wire_response_full_body() {
        let json = r##"{
            "personal_color": "spring light",
            "confidence": 85,
            "reason": "warm pastel tones",
            "dominant_colors": ["#ffd1dc", "#ffe4b5"]
        }"##;

        let wire: AnalyzeResponse = serde_json::from_str(json).unwrap();
        let analysis = ColorAnalysis::from(wire);
        assert_eq!(analysis.personal_color, "spring light");
        assert_eq!(analysis.confidence, 85);
        assert_eq!(analysis.reason, "warm pastel tones");
        assert_eq!(
            analysis.dominant_colors,
            vec!["#ffd1dc".to_string(), "#ffe4b5".to_string()]
        );
    }

    #[test]
    fn test_wire_response_defaults() {
        let wire: AnalyzeResponse = serde_json::from_str("{}").unwrap();
        let analysis = ColorAnalysis::from(wire);
        assert_eq!(analysis.personal_color, "unknown");
        assert_eq!(analysis.confidence, 0);
        assert_eq!(analysis.reason, "no result");
        assert!(analysis.dominant_colors.is_empty());
    }

    #[test]
    fn test_wire_response_ignores_extra_fields_and_coerces_colors() {
        let json = r##"{
            "personal_color": "winter deep",
            "confidence": 250,
            "dominant_colors": ["#000080", 42],
            "model": "vision-large"
        }"##;

        let wire: AnalyzeResponse = serde_json::from_str(json).unwrap();
        let analysis = ColorAnalysis::from(wire);
        assert_eq!(analysis.confidence, 100);
        assert_eq!(
            analysis.dominant_colors,
            vec!["#000080".to_string(), "42".to_string()]
        );
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze-color"))
            .and(body_json(json!({ "image_url": "http://img/1.jpg" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "personal_color": "summer muted",
                "confidence": 72,
                "reason": "cool desaturated palette",
                "dominant_colors": ["#b0c4de"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AiColorClient::new(server.uri());
        let analysis = client.analyze("http://img/1.jpg").await.unwrap();
        assert_eq!(analysis.personal_color, "summer muted");
        assert_eq!(analysis.confidence, 72);
    }

    #[tokio::test]
    async fn test_analyze_server_error_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze-color"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = AiColorClient::new(server.uri());
        let analysis = client.analyze("http://img/1.jpg").await.unwrap();
        assert_eq!(analysis, ColorAnalysis::fallback());
    }

    #[tokio::test]
    async fn test_analyze_malformed_body_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze-color"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = AiColorClient::new(server.uri());
        let analysis = client.analyze("http://img/1.jpg").await.unwrap();
        assert_eq!(analysis, ColorAnalysis::fallback());
    }

    #[tokio::test]
    async fn test_analyze_unreachable_service_falls_back() {
        // Port 1 refuses connections
        let client = AiColorClient::new("http://127.0.0.1:1".to_string());
        let analysis = client.analyze("http://img/1.jpg").await.unwrap();
        assert_eq!(analysis, ColorAnalysis::fallback());
    }

    #[tokio::test]
    async fn test_health_check_healthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = AiColorClient::new(server.uri());
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_unhealthy_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = AiColorClient::new(server.uri());
        assert!(!client.health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let client = AiColorClient::new("http://127.0.0.1:1".to_string());
        assert!(!client.health_check().await);
    }
}
