//! Local export generation: analytics CSV, the printable HTML report, the
//! full JSON report with templated insights, the batch upload template, and
//! the batch results CSV. Nothing here talks to the network.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::models::{
    label_or_unknown, AnalyticsSummary, BatchOutcome, BACKEND_FEATURES,
};
use crate::utils::format::{format_number, format_percent};

/// Flat sectioned CSV of the analytics dashboard, matching the downloadable
/// `analytics_data_<date>.csv`.
pub fn analytics_csv(summary: &AnalyticsSummary) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("Metric,Value".to_string());
    lines.push(format!("Total Predictions,{}", summary.total_predictions));
    lines.push(format!("Success Rate,{}", format_percent(summary.success_rate, 1)));
    lines.push(format!(
        "Average Confidence,{}",
        format_percent(summary.avg_confidence, 1)
    ));
    lines.push(format!("Active Users,{}", summary.active_users));

    lines.push(String::new());
    lines.push("Price Distribution".to_string());
    lines.push("Price Range,Count".to_string());
    for bucket in &summary.price_distribution {
        lines.push(format!("{},{}", bucket.name, bucket.value));
    }

    lines.push(String::new());
    lines.push("Top Brands".to_string());
    lines.push("Brand,Predictions,Average Price Range".to_string());
    for brand in &summary.brand_analytics {
        lines.push(format!("{},{},{}", brand.brand, brand.predictions, brand.avg_price));
    }

    lines.push(String::new());
    lines.push("Feature Impact".to_string());
    lines.push("Feature,Impact %".to_string());
    for feature in &summary.top_features {
        lines.push(format!("{},{}", feature.name, feature.impact));
    }

    lines.push(String::new());
    lines.push("Daily Trends".to_string());
    lines.push("Date,Predictions,Accuracy %".to_string());
    for point in &summary.trend_data {
        lines.push(format!("{},{},{:.1}", point.date, point.predictions, point.accuracy));
    }

    lines.join("\n")
}

/// Static HTML document embedding the analytics data, styled for print/PDF.
pub fn printable_report(summary: &AnalyticsSummary, generated_on: &str) -> String {
    let metric = |value: String, label: &str| {
        format!(
            "<div class=\"metric\"><div class=\"metric-value\">{}</div><div>{}</div></div>",
            value, label
        )
    };

    let distribution_rows: String = summary
        .price_distribution
        .iter()
        .map(|bucket| {
            let share = if summary.total_predictions > 0 {
                bucket.value as f64 / summary.total_predictions as f64 * 100.0
            } else {
                0.0
            };
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                bucket.name,
                bucket.value,
                format_percent(share, 1)
            )
        })
        .collect();

    let brand_rows: String = summary
        .brand_analytics
        .iter()
        .map(|brand| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                brand.brand, brand.predictions, brand.avg_price
            )
        })
        .collect();

    let feature_rows: String = summary
        .top_features
        .iter()
        .map(|feature| {
            format!(
                "<tr><td>{}</td><td>{}%</td></tr>",
                feature.name, feature.impact
            )
        })
        .collect();

    format!(
        "<html>\n<head>\n<title>Device Price Analytics Report</title>\n<style>\n\
body {{ font-family: Arial, sans-serif; margin: 20px; }}\n\
.header {{ text-align: center; margin-bottom: 30px; }}\n\
.metric {{ display: inline-block; margin: 10px 20px; padding: 15px; border: 1px solid #ddd; text-align: center; }}\n\
.metric-value {{ font-size: 24px; font-weight: bold; color: #2563eb; }}\n\
.section {{ margin: 20px 0; page-break-inside: avoid; }}\n\
table {{ width: 100%; border-collapse: collapse; margin: 10px 0; }}\n\
th, td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}\n\
th {{ background-color: #f5f5f5; }}\n\
@media print {{ body {{ margin: 0; }} }}\n\
</style>\n</head>\n<body>\n\
<div class=\"header\"><h1>Device Price Analytics Report</h1><p>Generated on {generated_on}</p></div>\n\
<div class=\"section\"><h2>Summary Statistics</h2>{metrics}</div>\n\
<div class=\"section\"><h2>Price Range Distribution</h2>\
<table><tr><th>Price Range</th><th>Number of Devices</th><th>Percentage</th></tr>{distribution_rows}</table></div>\n\
<div class=\"section\"><h2>Most Popular Brands</h2>\
<table><tr><th>Brand</th><th>Predictions</th><th>Average Price Category</th></tr>{brand_rows}</table></div>\n\
<div class=\"section\"><h2>Most Important Features</h2>\
<table><tr><th>Feature</th><th>Impact on Price (%)</th></tr>{feature_rows}</table></div>\n\
</body>\n</html>\n",
        generated_on = generated_on,
        metrics = [
            metric(format_number(summary.total_predictions), "Total Predictions Made"),
            metric(format_percent(summary.success_rate, 1), "Average Success Rate"),
            metric(format_percent(summary.avg_confidence, 1), "Model Confidence"),
            metric(summary.active_users.to_string(), "Estimated Active Users"),
        ]
        .join(""),
        distribution_rows = distribution_rows,
        brand_rows = brand_rows,
        feature_rows = feature_rows,
    )
}

/// Templated natural-language takeaways embedded in the full report.
fn insights(summary: &AnalyticsSummary) -> Vec<String> {
    let top_brand = summary.brand_analytics.first();
    let dominant_bucket = summary
        .price_distribution
        .iter()
        .reduce(|max, bucket| if bucket.value > max.value { bucket } else { max });
    let top_impact = summary.top_features.first().map(|f| f.impact).unwrap_or(0.0);

    vec![
        format!(
            "Your system has processed {} device price predictions.",
            format_number(summary.total_predictions)
        ),
        format!(
            "The model shows an average confidence of {:.1}%, indicating reliable predictions.",
            summary.avg_confidence
        ),
        format!(
            "{} is the most frequently predicted brand with {} predictions.",
            top_brand.map(|b| b.brand.as_str()).unwrap_or("Unknown"),
            top_brand.map(|b| b.predictions).unwrap_or(0)
        ),
        format!(
            "{} devices are the most common price category.",
            dominant_bucket.map(|b| b.name).unwrap_or("Unknown")
        ),
        format!(
            "Battery Power has the highest impact on price predictions at {}%.",
            top_impact
        ),
    ]
}

/// Complete JSON report: headline summary, every aggregate table, and the
/// templated insights.
pub fn full_report_json(summary: &AnalyticsSummary, generated_at: DateTime<Utc>) -> serde_json::Value {
    json!({
        "generatedAt": generated_at.to_rfc3339(),
        "summary": {
            "totalPredictions": summary.total_predictions,
            "successRate": summary.success_rate,
            "avgConfidence": summary.avg_confidence,
            "activeUsers": summary.active_users,
        },
        "priceDistribution": summary.price_distribution,
        "brandAnalytics": summary.brand_analytics,
        "topFeatures": summary.top_features,
        "trendData": summary.trend_data,
        "insights": insights(summary),
    })
}

/// Batch upload template: the 20 backend headers plus two sample rows.
pub fn csv_template() -> String {
    let headers = BACKEND_FEATURES.join(",");
    let sample_row_1 = "1000,1,2.5,0,5,1,32,0.8,150,4,12,1920,1080,4000,14.2,7.1,15,1,1,1";
    let sample_row_2 = "2000,1,3.0,1,8,1,64,0.9,180,8,16,2560,1440,6000,15.5,7.8,20,1,1,1";
    format!("{}\n{}\n{}", headers, sample_row_1, sample_row_2)
}

fn cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Downloadable CSV of a batch job's per-row predictions, with the echoed
/// feature values in backend column order. Missing echoes render empty.
pub fn batch_results_csv(outcome: &BatchOutcome) -> String {
    let mut header = vec![
        "Row".to_string(),
        "Predicted Price Range".to_string(),
        "Price Range Label".to_string(),
    ];
    header.extend(BACKEND_FEATURES.iter().map(|f| f.to_string()));

    let mut lines = vec![header.join(",")];
    for prediction in &outcome.predictions {
        let mut row = vec![
            prediction.row.to_string(),
            prediction.predicted_price_range.to_string(),
            format!("\"{}\"", label_or_unknown(prediction.predicted_price_range)),
        ];
        for feature in BACKEND_FEATURES {
            row.push(
                prediction
                    .features
                    .get(feature)
                    .map(cell)
                    .unwrap_or_default(),
            );
        }
        lines.push(row.join(","));
    }
    lines.join("\n")
}
