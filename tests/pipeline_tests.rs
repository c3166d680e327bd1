//! End-to-end tests over the data pipeline: form -> feature vector on the
//! request path, and history JSON -> aggregates -> exports on the read path.

use devicepricepro::models::{DeviceSpec, PredictionRecord, PredictionResult};
use devicepricepro::services::{analytics_engine, export, features, validation};

fn history_json() -> serde_json::Value {
    serde_json::json!([
        {
            "id": 1,
            "type": "single",
            "brand": "Apple",
            "model": "iPhone 14 Pro",
            "predictedPriceRange": 3,
            "confidence": 94.2,
            "features": { "battery_power": 3200, "ram": 6000 },
            "explanation": {
                "top_features": [
                    { "feature": "Brand (Apple)", "impact": 0.35 },
                    { "feature": "RAM (6GB)", "impact": 0.28 }
                ]
            },
            "createdAt": "2024-01-15T10:30:00Z"
        },
        {
            "id": 2,
            "type": "batch",
            "fileName": "samsung_devices.csv",
            "totalDevices": 25,
            "predictedPriceRange": 1,
            "confidence": 87.5,
            "summary": {
                "successful_predictions": 23,
                "failed_predictions": 2,
                "average_confidence": 87.5,
                "price_distribution": { "0": 12, "1": 8, "2": 3, "3": 0 }
            },
            "createdAt": "2024-01-14T15:45:00Z"
        },
        {
            "id": 3,
            "type": "single",
            "brand": "Apple",
            "model": "iPhone SE",
            "predictedPriceRange": 1,
            "createdAt": "2024-01-15T18:00:00Z"
        }
    ])
}

#[test]
fn history_records_deserialize_into_both_variants() {
    let records: Vec<PredictionRecord> = serde_json::from_value(history_json()).unwrap();
    assert_eq!(records.len(), 3);

    match &records[0] {
        PredictionRecord::Single {
            brand,
            predicted_price_range,
            explanation,
            ..
        } => {
            assert_eq!(brand, "Apple");
            assert_eq!(*predicted_price_range, Some(3));
            let explanation = explanation.as_ref().unwrap();
            assert_eq!(explanation.top_features[0].feature, "Brand (Apple)");
        }
        other => panic!("expected a single record, got {:?}", other),
    }

    match &records[1] {
        PredictionRecord::Batch {
            file_name,
            total_devices,
            summary,
            ..
        } => {
            assert_eq!(file_name, "samsung_devices.csv");
            assert_eq!(*total_devices, 25);
            assert_eq!(summary.as_ref().unwrap().failed_predictions, 2);
        }
        other => panic!("expected a batch record, got {:?}", other),
    }

    // The third record has no confidence; the lenient model reads it as None.
    assert_eq!(records[2].confidence(), None);
}

#[test]
fn unknown_record_type_is_a_deserialization_error() {
    let value = serde_json::json!({
        "type": "bulk",
        "createdAt": "2024-01-15T10:30:00Z"
    });
    assert!(serde_json::from_value::<PredictionRecord>(value).is_err());
}

#[test]
fn aggregation_over_parsed_history() {
    let records: Vec<PredictionRecord> = serde_json::from_value(history_json()).unwrap();
    let summary = analytics_engine::aggregate(&records);

    assert_eq!(summary.total_predictions, 3);
    // (94.2 + 87.5 + 0) / 3, the missing confidence counting as zero.
    assert!((summary.avg_confidence - 60.566666).abs() < 1e-4);
    assert_eq!(summary.price_distribution[1].value, 2);
    assert_eq!(summary.price_distribution[3].value, 1);

    // Only single records feed the brand table; rounded mean of [3, 1] is 2.
    assert_eq!(summary.brand_analytics.len(), 1);
    assert_eq!(summary.brand_analytics[0].brand, "Apple");
    assert_eq!(summary.brand_analytics[0].predictions, 2);
    assert_eq!(summary.brand_analytics[0].avg_price, "Premium");

    // Two UTC dates, oldest first.
    assert_eq!(summary.trend_data.len(), 2);
    assert_eq!(summary.trend_data[0].date, "2024-01-14");
    assert_eq!(summary.trend_data[1].date, "2024-01-15");
    assert_eq!(summary.trend_data[1].predictions, 2);
}

#[test]
fn csv_export_round_trips_the_aggregates() {
    let records: Vec<PredictionRecord> = serde_json::from_value(history_json()).unwrap();
    let summary = analytics_engine::aggregate(&records);
    let csv = export::analytics_csv(&summary);

    let total: i64 = csv
        .lines()
        .find_map(|l| l.strip_prefix("Total Predictions,"))
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(total, summary.total_predictions);

    let mut lines = csv.lines().skip_while(|l| *l != "Price Range,Count");
    lines.next();
    for bucket in &summary.price_distribution {
        let (name, count) = lines.next().unwrap().split_once(',').unwrap();
        assert_eq!(name, bucket.name);
        assert_eq!(count.parse::<i64>().unwrap(), bucket.value);
    }
}

#[test]
fn request_path_from_form_to_wire_payload() {
    let spec = DeviceSpec {
        brand: "Samsung".to_string(),
        model_name: "Galaxy S23".to_string(),
        battery_mah: 3900.0,
        clock_speed: 3.0,
        front_camera: 12.0,
        rear_camera: 50.0,
        storage_gb: 128,
        depth_cm: 0.8,
        weight_g: 168.0,
        cores: 8,
        screen_height_px: 2340,
        screen_width_px: 1080,
        ram_mb: 8000,
        screen_height_cm: 14.6,
        screen_width_cm: 7.1,
        talk_time: 22.0,
        bluetooth: true,
        dual_sim: true,
        has_3g: true,
        has_4g: true,
        touchscreen: true,
        wifi: false,
    };

    assert!(validation::validate_device_form(&spec).is_empty());

    let payload = serde_json::to_value(features::to_predict_request(&spec)).unwrap();
    let object = payload.as_object().unwrap();
    assert_eq!(object.len(), 22);
    assert_eq!(object["battery_power"], 3900.0);
    assert_eq!(object["four_g"], 1);
    assert_eq!(object["wifi"], 0);
    assert_eq!(object["ram"], 8000);
    assert_eq!(object["brand"], "Samsung");
}

#[test]
fn display_path_formats_the_documented_example() {
    let raw = PredictionResult {
        predicted_price_range: 1,
        confidence: vec![0.1, 0.7, 0.15, 0.05],
    };
    let formatted = features::format_prediction(&raw);
    assert_eq!(formatted.price_range.label, "Mid-Range");
    assert_eq!(format!("{:.1}", formatted.confidence), "70.0");
}
