//! Analytics Aggregator: derives chart-ready aggregates from the prediction
//! history and falls back to a fixed sample dataset whenever there is nothing
//! real to show, so the dashboard is never blank.

use std::collections::HashMap;

use crate::error::ApiError;
use crate::models::{
    label_or_unknown, AnalyticsSummary, BrandStat, FeatureImpact, PredictionRecord, PriceBucket,
    TrendPoint, PRICE_RANGES,
};
use crate::services::api_client::ApiClient;

/// Where the numbers on the dashboard came from. Everything except `Live`
/// means the fixed sample dataset is being shown.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Live,
    EmptyData,
    NoAuth,
    AuthFailed,
    BackendError(String),
    NetworkError(String),
}

impl DataSource {
    pub fn status_text(&self) -> &'static str {
        match self {
            DataSource::Live => "Connected - Real data",
            DataSource::EmptyData => "Connected but no data - Showing sample data",
            DataSource::NoAuth => "No authentication - Using sample data",
            DataSource::AuthFailed => "Authentication failed - Using sample data",
            DataSource::BackendError(_) => "Backend error - Using sample data",
            DataSource::NetworkError(_) => "Network error - Using sample data",
        }
    }
}

/// The feature-impact table is static: importances come from the model's
/// internals, which the history endpoint does not expose.
fn sample_top_features() -> Vec<FeatureImpact> {
    vec![
        FeatureImpact { name: "Battery Power", impact: 28.5 },
        FeatureImpact { name: "RAM", impact: 22.3 },
        FeatureImpact { name: "Storage", impact: 18.7 },
        FeatureImpact { name: "Camera", impact: 15.2 },
        FeatureImpact { name: "Screen Size", impact: 15.3 },
    ]
}

/// Fixed demonstration dataset shown when no history is available.
pub fn sample_analytics() -> AnalyticsSummary {
    let distribution = [312, 456, 289, 190];
    let trend = [
        ("2024-01-01", 45, 92.0),
        ("2024-01-02", 52, 89.0),
        ("2024-01-03", 38, 94.0),
        ("2024-01-04", 67, 87.0),
        ("2024-01-05", 73, 91.0),
        ("2024-01-06", 59, 95.0),
        ("2024-01-07", 81, 93.0),
    ];
    let brands = [
        ("Apple", 287, 3),
        ("Samsung", 234, 1),
        ("Xiaomi", 189, 0),
        ("OnePlus", 156, 2),
        ("Google", 98, 2),
    ];

    AnalyticsSummary {
        total_predictions: 1247,
        success_rate: 94.2,
        avg_confidence: 87.5,
        active_users: 156,
        top_features: sample_top_features(),
        price_distribution: distribution
            .iter()
            .enumerate()
            .map(|(range, value)| PriceBucket {
                name: PRICE_RANGES[range].label,
                value: *value,
                color: PRICE_RANGES[range].color,
                range: range as i64,
            })
            .collect(),
        trend_data: trend
            .iter()
            .map(|(date, predictions, accuracy)| TrendPoint {
                date: (*date).to_string(),
                predictions: *predictions,
                accuracy: *accuracy,
            })
            .collect(),
        brand_analytics: brands
            .iter()
            .map(|(brand, predictions, avg_range)| BrandStat {
                brand: (*brand).to_string(),
                predictions: *predictions,
                avg_price_range: *avg_range,
                avg_price: label_or_unknown(*avg_range),
            })
            .collect(),
    }
}

/// Aggregate a prediction history into dashboard numbers. An empty history
/// returns `sample_analytics()` unchanged.
///
/// Lenient by design: a record without a confidence contributes 0 to the
/// averages, and a record without a price range is simply left out of the
/// histogram. A batch record counts once, as one prediction event; its
/// per-device totals are not expanded.
pub fn aggregate(records: &[PredictionRecord]) -> AnalyticsSummary {
    if records.is_empty() {
        return sample_analytics();
    }

    let total_predictions = records.len() as i64;
    let avg_confidence = records
        .iter()
        .map(|r| r.confidence().unwrap_or(0.0))
        .sum::<f64>()
        / total_predictions as f64;

    let mut bucket_counts = [0_i64; 4];
    for record in records {
        if let Some(range) = record.predicted_price_range() {
            if let Ok(index) = usize::try_from(range) {
                if index < bucket_counts.len() {
                    bucket_counts[index] += 1;
                }
            }
        }
    }
    let price_distribution = bucket_counts
        .iter()
        .enumerate()
        .map(|(range, value)| PriceBucket {
            name: PRICE_RANGES[range].label,
            value: *value,
            color: PRICE_RANGES[range].color,
            range: range as i64,
        })
        .collect();

    let brand_analytics = brand_analytics(records);
    let trend_data = trend_data(records);

    AnalyticsSummary {
        total_predictions,
        // Confidence stands in for the success rate: there is no ground
        // truth on the client to score predictions against.
        success_rate: avg_confidence,
        avg_confidence,
        active_users: 50.max(total_predictions / 10),
        top_features: sample_top_features(),
        price_distribution,
        trend_data,
        brand_analytics,
    }
}

/// Top five brands among single predictions, ranked by prediction count,
/// each with the rounded mean of its predicted buckets.
fn brand_analytics(records: &[PredictionRecord]) -> Vec<BrandStat> {
    let mut by_brand: HashMap<&str, Vec<i64>> = HashMap::new();
    for record in records {
        if let Some(brand) = record.brand() {
            by_brand
                .entry(brand)
                .or_default()
                .push(record.predicted_price_range().unwrap_or(0));
        }
    }

    let mut stats: Vec<BrandStat> = by_brand
        .into_iter()
        .map(|(brand, ranges)| {
            let avg = ranges.iter().sum::<i64>() as f64 / ranges.len() as f64;
            let rounded = avg.round() as i64;
            BrandStat {
                brand: brand.to_string(),
                predictions: ranges.len() as i64,
                avg_price_range: rounded,
                avg_price: label_or_unknown(rounded),
            }
        })
        .collect();

    stats.sort_by(|a, b| b.predictions.cmp(&a.predictions).then(a.brand.cmp(&b.brand)));
    stats.truncate(5);
    stats
}

/// Per-UTC-date activity, oldest first, trimmed to the most recent 7 dates.
fn trend_data(records: &[PredictionRecord]) -> Vec<TrendPoint> {
    let mut by_date: std::collections::BTreeMap<String, (i64, f64)> =
        std::collections::BTreeMap::new();
    for record in records {
        let date = record.created_at().format("%Y-%m-%d").to_string();
        let entry = by_date.entry(date).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += record.confidence().unwrap_or(0.0);
    }

    let points: Vec<TrendPoint> = by_date
        .into_iter()
        .map(|(date, (count, confidence_sum))| TrendPoint {
            date,
            predictions: count,
            accuracy: confidence_sum / count as f64,
        })
        .collect();

    let skip = points.len().saturating_sub(7);
    points.into_iter().skip(skip).collect()
}

/// Dashboard load policy: fetch the history and aggregate it, degrading to
/// the sample dataset on every failure mode so the page stays usable.
pub async fn load_analytics(client: &ApiClient) -> (AnalyticsSummary, DataSource) {
    if !client.is_authenticated() {
        log::warn!("no session token, using sample analytics data");
        return (sample_analytics(), DataSource::NoAuth);
    }

    match client.history().await {
        Ok(records) if records.is_empty() => {
            log::info!("history is empty, using sample analytics data");
            (sample_analytics(), DataSource::EmptyData)
        }
        Ok(records) => {
            log::info!("aggregating {} history records", records.len());
            (aggregate(&records), DataSource::Live)
        }
        Err(ApiError::Auth) => {
            log::warn!("authentication failed while loading analytics");
            (sample_analytics(), DataSource::AuthFailed)
        }
        Err(err @ ApiError::Server { .. }) => {
            log::error!("history request failed: {}", err);
            (sample_analytics(), DataSource::BackendError(err.user_message()))
        }
        Err(err) => {
            log::error!("history request failed: {}", err);
            (sample_analytics(), DataSource::NetworkError(err.user_message()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn single(
        brand: &str,
        range: Option<i64>,
        confidence: Option<f64>,
        day: u32,
    ) -> PredictionRecord {
        PredictionRecord::Single {
            id: None,
            brand: brand.to_string(),
            model: "Test".to_string(),
            predicted_price_range: range,
            confidence,
            features: Default::default(),
            explanation: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, day, 10, 0, 0).unwrap(),
        }
    }

    fn batch(range: Option<i64>, confidence: Option<f64>, day: u32) -> PredictionRecord {
        PredictionRecord::Batch {
            id: None,
            file_name: "devices.csv".to_string(),
            total_devices: 25,
            predicted_price_range: range,
            confidence,
            summary: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_history_returns_the_sample_dataset() {
        let summary = aggregate(&[]);
        assert_eq!(summary.total_predictions, 1247);
        assert_eq!(summary.success_rate, 94.2);
        assert_eq!(summary.active_users, 156);
        assert_eq!(summary.brand_analytics[0].brand, "Apple");
    }

    #[test]
    fn totals_and_confidence_proxy() {
        let records = vec![
            single("Acme", Some(0), Some(90.0), 1),
            single("Acme", Some(0), Some(80.0), 2),
            single("Other", Some(1), Some(70.0), 3),
        ];
        let summary = aggregate(&records);
        assert_eq!(summary.total_predictions, 3);
        assert_eq!(summary.avg_confidence, 80.0);
        assert_eq!(summary.success_rate, summary.avg_confidence);
        assert_eq!(summary.active_users, 50);
    }

    #[test]
    fn brand_grouping_counts_and_rounds() {
        let records = vec![
            single("Acme", Some(0), Some(90.0), 1),
            single("Acme", Some(0), Some(85.0), 2),
            single("Other", Some(1), Some(70.0), 3),
        ];
        let summary = aggregate(&records);
        let acme = summary
            .brand_analytics
            .iter()
            .find(|b| b.brand == "Acme")
            .unwrap();
        assert_eq!(acme.predictions, 2);
        assert_eq!(acme.avg_price_range, 0);
        assert_eq!(acme.avg_price, "Budget");
    }

    #[test]
    fn brand_average_rounds_half_up() {
        let records = vec![
            single("Acme", Some(1), Some(90.0), 1),
            single("Acme", Some(2), Some(90.0), 2),
        ];
        let summary = aggregate(&records);
        assert_eq!(summary.brand_analytics[0].avg_price_range, 2);
        assert_eq!(summary.brand_analytics[0].avg_price, "Premium");
    }

    #[test]
    fn batch_records_count_once_and_skip_brand_table() {
        let records = vec![
            batch(Some(1), Some(87.5), 1),
            single("Acme", Some(1), Some(90.0), 1),
        ];
        let summary = aggregate(&records);
        assert_eq!(summary.total_predictions, 2);
        // The batch job's 25 devices are not expanded into the histogram.
        assert_eq!(summary.price_distribution[1].value, 2);
        assert_eq!(summary.brand_analytics.len(), 1);
    }

    #[test]
    fn same_day_records_share_a_trend_bucket() {
        let records = vec![
            single("Acme", Some(0), Some(90.0), 5),
            single("Acme", Some(1), Some(70.0), 5),
        ];
        let summary = aggregate(&records);
        assert_eq!(summary.trend_data.len(), 1);
        assert_eq!(summary.trend_data[0].date, "2024-03-05");
        assert_eq!(summary.trend_data[0].predictions, 2);
        assert_eq!(summary.trend_data[0].accuracy, 80.0);
    }

    #[test]
    fn trend_keeps_only_the_last_seven_dates() {
        let records: Vec<PredictionRecord> = (1..=10)
            .map(|day| single("Acme", Some(0), Some(90.0), day))
            .collect();
        let summary = aggregate(&records);
        assert_eq!(summary.trend_data.len(), 7);
        assert_eq!(summary.trend_data[0].date, "2024-03-04");
        assert_eq!(summary.trend_data[6].date, "2024-03-10");
    }

    #[test]
    fn missing_confidence_counts_as_zero_without_failing() {
        let records = vec![
            single("Acme", Some(0), Some(90.0), 1),
            single("Acme", Some(0), None, 1),
        ];
        let summary = aggregate(&records);
        assert_eq!(summary.avg_confidence, 45.0);
    }

    #[test]
    fn missing_price_range_is_left_out_of_the_histogram() {
        let records = vec![
            single("Acme", None, Some(90.0), 1),
            single("Acme", Some(2), Some(90.0), 1),
        ];
        let summary = aggregate(&records);
        let counted: i64 = summary.price_distribution.iter().map(|b| b.value).sum();
        assert_eq!(counted, 1);
        assert_eq!(summary.price_distribution[2].value, 1);
    }

    #[test]
    fn more_than_five_brands_keeps_the_top_five() {
        let mut records = Vec::new();
        for (i, brand) in ["A", "B", "C", "D", "E", "F"].iter().enumerate() {
            for _ in 0..=i {
                records.push(single(brand, Some(0), Some(90.0), 1));
            }
        }
        let summary = aggregate(&records);
        assert_eq!(summary.brand_analytics.len(), 5);
        assert_eq!(summary.brand_analytics[0].brand, "F");
        assert!(summary.brand_analytics.iter().all(|b| b.brand != "A"));
    }
}
