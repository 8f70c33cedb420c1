use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{label_for_choice, Product, Recommendation, RunStats, PALETTE};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    /// Personal color label, e.g. "spring light"
    #[serde(default)]
    pub user_color: Option<String>,
    /// 1-based palette choice, used when `user_color` is absent
    #[serde(default)]
    pub choice: Option<usize>,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub user_color: String,
    pub recommendations: Vec<Recommendation>,
    pub stats: RunStats,
    pub match_rate: f64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PaletteEntry {
    pub choice: usize,
    pub label: &'static str,
}

// Handlers

/// Health check endpoint; reports the AI service probe alongside
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let ai_service = state.analyzer.health_check().await;
    Json(json!({
        "status": "healthy",
        "ai_service": ai_service,
    }))
}

/// Lists the selectable personal-color categories
pub async fn get_palette() -> Json<Vec<PaletteEntry>> {
    let entries = PALETTE
        .iter()
        .enumerate()
        .map(|(idx, label)| PaletteEntry {
            choice: idx + 1,
            label,
        })
        .collect();
    Json(entries)
}

/// Runs the recommendation pipeline over the supplied candidate products
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<RecommendResponse>> {
    let user_color = resolve_user_color(&request)?;

    let limit = request.products.len().min(state.max_candidates);
    if limit < request.products.len() {
        tracing::info!(
            supplied = request.products.len(),
            limit,
            "Candidate list truncated"
        );
    }
    let candidates = &request.products[..limit];

    let (recommendations, stats) = state.pipeline.recommend(candidates, &user_color).await;
    let match_rate = stats.match_rate();

    Ok(Json(RecommendResponse {
        user_color,
        recommendations,
        stats,
        match_rate,
        generated_at: Utc::now(),
    }))
}

/// Resolves the user's category from an explicit label or a palette choice
fn resolve_user_color(request: &RecommendRequest) -> AppResult<String> {
    if let Some(color) = &request.user_color {
        if !color.trim().is_empty() {
            return Ok(color.clone());
        }
    }

    if let Some(choice) = request.choice {
        return label_for_choice(choice)
            .map(str::to_string)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown palette choice {}", choice)));
    }

    Err(AppError::InvalidInput(
        "Either user_color or choice is required".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user_color: Option<&str>, choice: Option<usize>) -> RecommendRequest {
        RecommendRequest {
            user_color: user_color.map(str::to_string),
            choice,
            products: vec![],
        }
    }

    #[test]
    fn test_resolve_user_color_prefers_explicit_label() {
        let resolved = resolve_user_color(&request(Some("winter deep"), Some(1))).unwrap();
        assert_eq!(resolved, "winter deep");
    }

    #[test]
    fn test_resolve_user_color_from_choice() {
        let resolved = resolve_user_color(&request(None, Some(2))).unwrap();
        assert_eq!(resolved, "spring bright");
    }

    #[test]
    fn test_resolve_user_color_blank_label_falls_through() {
        let resolved = resolve_user_color(&request(Some("  "), Some(10))).unwrap();
        assert_eq!(resolved, "winter deep");
    }

    #[test]
    fn test_resolve_user_color_invalid_choice() {
        assert!(resolve_user_color(&request(None, Some(0))).is_err());
        assert!(resolve_user_color(&request(None, Some(11))).is_err());
    }

    #[test]
    fn test_resolve_user_color_missing_both() {
        assert!(resolve_user_color(&request(None, None)).is_err());
    }
}
