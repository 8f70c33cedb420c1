use serde::{Deserialize, Serialize};

/// Sentinel label used when the classifier cannot assign a palette category
pub const UNKNOWN_LABEL: &str = "unknown";

/// A candidate clothing product supplied by the catalog collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Display name of the product
    pub name: String,
    /// Product image used for color classification
    pub image_url: String,
    /// Link to the product detail page
    pub product_link: String,
}

/// Result of classifying one product image against the personal-color palette
///
/// Immutable once produced. `personal_color` is a "season + tone" label
/// (e.g. "spring light") or [`UNKNOWN_LABEL`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorAnalysis {
    pub personal_color: String,
    /// Classifier certainty as an integer percentage (0-100)
    pub confidence: u8,
    pub reason: String,
    pub dominant_colors: Vec<String>,
}

impl ColorAnalysis {
    pub fn new(
        personal_color: String,
        confidence: u8,
        reason: String,
        dominant_colors: Vec<String>,
    ) -> Self {
        Self {
            personal_color,
            confidence,
            reason,
            dominant_colors,
        }
    }

    /// The value every failed classification resolves to
    pub fn fallback() -> Self {
        Self {
            personal_color: UNKNOWN_LABEL.to_string(),
            confidence: 0,
            reason: "analysis failed".to_string(),
            dominant_colors: vec!["#000000".to_string()],
        }
    }
}

/// Outcome of evaluating one candidate product
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub product: Product,
    pub analysis: ColorAnalysis,
    pub accepted: bool,
}

/// Counters for one recommendation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub total_candidates: usize,
    pub analyzed: usize,
    pub matched: usize,
    pub elapsed_ms: u64,
}

impl RunStats {
    /// Percentage of analyzed candidates that matched, 0.0 when nothing was analyzed
    pub fn match_rate(&self) -> f64 {
        if self.analyzed == 0 {
            return 0.0;
        }
        self.matched as f64 / self.analyzed as f64 * 100.0
    }
}

// ============================================================================
// Personal color palette
// ============================================================================

/// The selectable personal-color categories, in menu order
///
/// "autumn strong" is part of the palette even though "strong" is not a
/// recognized tone; it still matches by season.
pub const PALETTE: [&str; 10] = [
    "spring light",
    "spring bright",
    "summer light",
    "summer bright",
    "summer muted",
    "autumn muted",
    "autumn strong",
    "autumn deep",
    "winter bright",
    "winter deep",
];

/// Resolves a 1-based palette choice to its label
pub fn label_for_choice(choice: usize) -> Option<&'static str> {
    if choice == 0 {
        return None;
    }
    PALETTE.get(choice - 1).copied()
}
