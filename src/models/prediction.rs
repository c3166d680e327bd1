use serde::{Deserialize, Serialize};

/// Raw response from `POST /predict/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_price_range: i64,
    /// One probability per price range bucket, in bucket order.
    #[serde(default)]
    pub confidence: Vec<f64>,
}

/// Static descriptor for one of the four price range buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub label: &'static str,
    pub range: &'static str,
    pub color: &'static str,
}

/// Price range interpretation, keyed 0..=3.
pub const PRICE_RANGES: [PriceRange; 4] = [
    PriceRange { label: "Budget", range: "$0 - $200", color: "#10b981" },
    PriceRange { label: "Mid-Range", range: "$200 - $500", color: "#3b82f6" },
    PriceRange { label: "Premium", range: "$500 - $1000", color: "#f59e0b" },
    PriceRange { label: "Flagship", range: "$1000+", color: "#ef4444" },
];

/// Fallback policy for out-of-range bucket lookups: anything outside 0..=3
/// renders as the Budget bucket. Kept as a named function so the policy is
/// visible at call sites and testable on its own.
pub fn descriptor_or_budget(range: i64) -> PriceRange {
    usize::try_from(range)
        .ok()
        .and_then(|i| PRICE_RANGES.get(i).copied())
        .unwrap_or(PRICE_RANGES[0])
}

/// Bucket label for a rounded average, or "Unknown" when the value falls
/// outside the four buckets.
pub fn label_or_unknown(range: i64) -> &'static str {
    usize::try_from(range)
        .ok()
        .and_then(|i| PRICE_RANGES.get(i))
        .map(|r| r.label)
        .unwrap_or("Unknown")
}

/// One slice of the per-bucket confidence breakdown shown next to a result.
#[derive(Debug, Clone, Serialize)]
pub struct ConfidenceSlice {
    pub range: &'static str,
    /// Probability as a percentage, rounded to one decimal.
    pub probability: f64,
    pub color: &'static str,
}

/// Display-ready form of a prediction response.
#[derive(Debug, Clone, Serialize)]
pub struct FormattedPrediction {
    pub price_range: PriceRange,
    /// Highest bucket probability as a percentage, rounded to one decimal.
    pub confidence: f64,
    pub confidence_distribution: Vec<ConfidenceSlice>,
}

/// Response from `POST /predict/explain`: feature importances in descending
/// order, each importance in [0, 1].
#[derive(Debug, Clone, Deserialize)]
pub struct ExplainResponse {
    #[serde(default)]
    pub top_features: Vec<(String, f64)>,
}

/// One row of a batch prediction response. The backend echoes whichever
/// feature values it read for the row; those land in `features`.
#[derive(Debug, Clone, Deserialize)]
pub struct RowPrediction {
    pub row: i64,
    pub predicted_price_range: i64,
    #[serde(flatten)]
    pub features: std::collections::BTreeMap<String, serde_json::Value>,
}

/// Response from `POST /predict/batch`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchOutcome {
    #[serde(default)]
    pub total_processed: i64,
    #[serde(default)]
    pub successful_predictions: i64,
    #[serde(default)]
    pub errors_count: i64,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub predictions: Vec<RowPrediction>,
}
