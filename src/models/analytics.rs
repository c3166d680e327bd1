use serde::Serialize;

/// Derived analytics, recomputed from the latest fetched history on every
/// load. Serialized field names match the dashboard's export schema.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_predictions: i64,
    /// Equal to `avg_confidence`: the service has no ground truth to score
    /// against, so confidence stands in as the success metric.
    pub success_rate: f64,
    pub avg_confidence: f64,
    /// Estimation heuristic, not a measurement: max(50, total / 10).
    pub active_users: i64,
    pub top_features: Vec<FeatureImpact>,
    pub price_distribution: Vec<PriceBucket>,
    pub trend_data: Vec<TrendPoint>,
    pub brand_analytics: Vec<BrandStat>,
}

/// Relative impact of one device feature on the predicted price.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureImpact {
    pub name: &'static str,
    pub impact: f64,
}

/// One bar of the price range histogram.
#[derive(Debug, Clone, Serialize)]
pub struct PriceBucket {
    pub name: &'static str,
    pub value: i64,
    pub color: &'static str,
    pub range: i64,
}

/// One day of prediction activity.
#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    /// UTC calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub predictions: i64,
    /// Mean confidence (percentage) of that day's predictions.
    pub accuracy: f64,
}

/// Per-brand prediction counts with the brand's typical price bucket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandStat {
    pub brand: String,
    pub predictions: i64,
    pub avg_price_range: i64,
    pub avg_price: &'static str,
}
