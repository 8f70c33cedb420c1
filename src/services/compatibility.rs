//! Personal-color compatibility rules
//!
//! Pure decision logic: season/tone extraction from palette labels and the
//! match policies that decide whether a classified product suits a user.
//! Labels arrive either in English ("spring light") or as the classifier's
//! Korean output ("봄 라이트"); both are recognized.

use crate::models::UNKNOWN_LABEL;

/// Floor below which a classification is too uncertain to act on
const MIN_CONFIDENCE: u8 = 30;
/// Extra certainty required to match across tones within the same season
const CROSS_TONE_CONFIDENCE: u8 = 40;

/// Seasonal component of a personal-color label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
    Unknown,
}

/// Recognized season markers, checked in order against the label prefix
const SEASON_MARKERS: [(&str, Season); 8] = [
    ("봄", Season::Spring),
    ("여름", Season::Summer),
    ("가을", Season::Autumn),
    ("겨울", Season::Winter),
    ("spring", Season::Spring),
    ("summer", Season::Summer),
    ("autumn", Season::Autumn),
    ("winter", Season::Winter),
];

impl Season {
    /// Extracts the season from a label by fixed prefix match
    pub fn from_label(label: &str) -> Self {
        season_marker(label)
            .map(|(_, season)| season)
            .unwrap_or(Season::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
            Season::Unknown => UNKNOWN_LABEL,
        }
    }
}

/// Finds the season marker the label starts with, if any
///
/// Marker lengths differ (the Korean spring marker is a single character),
/// so the matched marker is returned for prefix stripping.
fn season_marker(label: &str) -> Option<(&'static str, Season)> {
    SEASON_MARKERS.iter().copied().find(|(marker, _)| {
        label
            .get(..marker.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(marker))
    })
}

/// Returns the label with its recognized season prefix removed
fn strip_season_prefix(label: &str) -> &str {
    match season_marker(label) {
        Some((marker, _)) => &label[marker.len()..],
        None => label,
    }
}

/// Tone component of a personal-color label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Bright,
    Light,
    Muted,
    Deep,
    Warm,
    Cool,
    Unknown,
}

/// Tone synonym buckets in priority order
///
/// Bright must precede Light: "브라이트" contains "라이트" as a substring.
const TONE_SYNONYMS: [(Tone, &[&str]); 6] = [
    (Tone::Bright, &["bright", "브라이트"]),
    (Tone::Light, &["light", "라이트"]),
    (Tone::Muted, &["muted", "soft", "뮤트", "소프트"]),
    (Tone::Deep, &["deep", "dark", "딥", "다크"]),
    (Tone::Warm, &["warm", "웜"]),
    (Tone::Cool, &["cool", "쿨"]),
];

impl Tone {
    /// Extracts the tone from a label
    ///
    /// The season prefix is stripped first, then the remainder is classified
    /// by case-insensitive substring containment. The first matching bucket
    /// wins.
    pub fn from_label(label: &str) -> Self {
        let remainder = strip_season_prefix(label).to_lowercase();
        for (tone, synonyms) in TONE_SYNONYMS {
            if synonyms.iter().any(|synonym| remainder.contains(synonym)) {
                return tone;
            }
        }
        Tone::Unknown
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Bright => "bright",
            Tone::Light => "light",
            Tone::Muted => "muted",
            Tone::Deep => "deep",
            Tone::Warm => "warm",
            Tone::Cool => "cool",
            Tone::Unknown => UNKNOWN_LABEL,
        }
    }
}

/// Named compatibility strategy
///
/// Two rule variants exist; [`MatchPolicy::SeasonTyped`] is the default.
/// [`MatchPolicy::SeasonOnly`] is the looser alternative kept selectable for
/// comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Tiered rule: exact label, then same season + same tone, then same
    /// season + different tone above a higher confidence bar
    #[default]
    SeasonTyped,
    /// Season equality alone, behind a single confidence gate
    SeasonOnly,
}

impl MatchPolicy {
    /// Decides whether a product with the given classification suits the user
    pub fn is_compatible(&self, user_label: &str, product_label: &str, confidence: u8) -> bool {
        let compatible = match self {
            MatchPolicy::SeasonTyped => season_typed(user_label, product_label, confidence),
            MatchPolicy::SeasonOnly => season_only(user_label, product_label, confidence),
        };

        tracing::debug!(
            user = %user_label,
            product = %product_label,
            product_season = Season::from_label(product_label).as_str(),
            product_tone = Tone::from_label(product_label).as_str(),
            confidence,
            policy = ?self,
            compatible,
            "Compatibility decision"
        );

        compatible
    }
}

fn season_typed(user_label: &str, product_label: &str, confidence: u8) -> bool {
    if confidence < MIN_CONFIDENCE {
        return false;
    }

    if user_label == product_label {
        return true;
    }

    let user_season = Season::from_label(user_label);
    let product_season = Season::from_label(product_label);

    if user_season == product_season && user_season != Season::Unknown {
        if Tone::from_label(user_label) == Tone::from_label(product_label) {
            return true;
        }
        // Cross-tone within a season needs the higher bar
        return confidence >= CROSS_TONE_CONFIDENCE;
    }

    // Different known seasons, or an unknown season without an exact match
    false
}

fn season_only(user_label: &str, product_label: &str, confidence: u8) -> bool {
    if confidence < CROSS_TONE_CONFIDENCE {
        return false;
    }

    if user_label == product_label {
        return true;
    }

    // Unknown == Unknown counts as equal here, unlike the typed rule
    if Season::from_label(user_label) == Season::from_label(product_label) {
        return true;
    }

    // The gate at the top already established confidence >= 40, so this arm
    // accepts everything that reaches it and the reject below is unreachable.
    if confidence >= CROSS_TONE_CONFIDENCE {
        return true;
    }

    false
}

/// Whether an unclassifiable product still qualifies as a "suggest anyway"
/// candidate outside the strict match set
pub fn is_unknown_season_candidate(product_label: &str, confidence: u8) -> bool {
    confidence >= MIN_CONFIDENCE && Season::from_label(product_label) == Season::Unknown
}
