use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the prediction history. The service records two distinct
/// shapes discriminated by a `type` tag: a single-device prediction and a
/// batch CSV job. Each variant carries only the fields that exist for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PredictionRecord {
    #[serde(rename_all = "camelCase")]
    Single {
        #[serde(default)]
        id: Option<i64>,
        #[serde(default)]
        brand: String,
        #[serde(default)]
        model: String,
        #[serde(default)]
        predicted_price_range: Option<i64>,
        /// Confidence as a percentage (0-100), not a probability.
        #[serde(default)]
        confidence: Option<f64>,
        #[serde(default)]
        features: BTreeMap<String, serde_json::Value>,
        #[serde(default)]
        explanation: Option<Explanation>,
        created_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Batch {
        #[serde(default)]
        id: Option<i64>,
        #[serde(default)]
        file_name: String,
        #[serde(default)]
        total_devices: i64,
        #[serde(default)]
        predicted_price_range: Option<i64>,
        #[serde(default)]
        confidence: Option<f64>,
        #[serde(default)]
        summary: Option<BatchSummary>,
        created_at: DateTime<Utc>,
    },
}

impl PredictionRecord {
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            PredictionRecord::Single { created_at, .. } => *created_at,
            PredictionRecord::Batch { created_at, .. } => *created_at,
        }
    }

    pub fn predicted_price_range(&self) -> Option<i64> {
        match self {
            PredictionRecord::Single { predicted_price_range, .. } => *predicted_price_range,
            PredictionRecord::Batch { predicted_price_range, .. } => *predicted_price_range,
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        match self {
            PredictionRecord::Single { confidence, .. } => *confidence,
            PredictionRecord::Batch { confidence, .. } => *confidence,
        }
    }

    /// Brand for analytics grouping: single records only, empty brands skipped.
    pub fn brand(&self) -> Option<&str> {
        match self {
            PredictionRecord::Single { brand, .. } if !brand.trim().is_empty() => Some(brand),
            _ => None,
        }
    }
}

/// Per-feature importance attached to a single prediction record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    #[serde(default)]
    pub top_features: Vec<FeatureContribution>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: String,
    pub impact: f64,
}

/// Roll-up the backend stores for a batch job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    #[serde(default)]
    pub successful_predictions: i64,
    #[serde(default)]
    pub failed_predictions: i64,
    #[serde(default)]
    pub average_confidence: f64,
    /// Counts keyed by bucket ("0".."3"); JSON object keys are strings.
    #[serde(default)]
    pub price_distribution: BTreeMap<String, i64>,
}
