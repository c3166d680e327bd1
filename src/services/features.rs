//! Feature Transformer: maps the user-facing device vocabulary onto the
//! backend's 20 training-column names, and prediction responses back into
//! display-ready structures.

use crate::models::{
    descriptor_or_budget, ConfidenceSlice, DeviceSpec, FeatureVector, FormattedPrediction,
    PredictRequest, PredictionResult, PRICE_RANGES,
};

fn flag(value: bool) -> u8 {
    if value {
        1
    } else {
        0
    }
}

/// Build the model's feature vector from a validated form. Total for any
/// spec that passed validation; the name mapping is the single source of
/// truth for UI-field -> backend-column correspondence.
pub fn to_feature_vector(spec: &DeviceSpec) -> FeatureVector {
    FeatureVector {
        battery_power: spec.battery_mah,
        blue: flag(spec.bluetooth),
        clock_speed: spec.clock_speed,
        dual_sim: flag(spec.dual_sim),
        fc: spec.front_camera,
        four_g: flag(spec.has_4g),
        int_memory: spec.storage_gb as f64,
        m_dep: spec.depth_cm,
        mobile_wt: spec.weight_g,
        n_cores: spec.cores,
        pc: spec.rear_camera,
        px_height: spec.screen_height_px,
        px_width: spec.screen_width_px,
        ram: spec.ram_mb,
        sc_h: spec.screen_height_cm,
        sc_w: spec.screen_width_cm,
        talk_time: spec.talk_time,
        three_g: flag(spec.has_3g),
        touch_screen: flag(spec.touchscreen),
        wifi: flag(spec.wifi),
    }
}

/// Full predict payload: the feature vector plus brand/model, which the
/// service reads from the same body for its history log.
pub fn to_predict_request(spec: &DeviceSpec) -> PredictRequest {
    PredictRequest {
        brand: spec.brand.clone(),
        model_name: spec.model_name.clone(),
        features: to_feature_vector(spec),
    }
}

fn percent_1dp(probability: f64) -> f64 {
    (probability * 1000.0).round() / 10.0
}

/// Turn a raw prediction response into its display form: descriptor lookup
/// (out-of-range buckets fall back to Budget), headline confidence as the
/// highest bucket probability, and the per-bucket breakdown.
pub fn format_prediction(raw: &PredictionResult) -> FormattedPrediction {
    let price_range = descriptor_or_budget(raw.predicted_price_range);
    let max_probability = raw.confidence.iter().cloned().fold(0.0_f64, f64::max);

    let confidence_distribution = raw
        .confidence
        .iter()
        .zip(PRICE_RANGES.iter())
        .map(|(probability, descriptor)| ConfidenceSlice {
            range: descriptor.label,
            probability: percent_1dp(*probability),
            color: descriptor.color,
        })
        .collect();

    FormattedPrediction {
        price_range,
        confidence: percent_1dp(max_probability),
        confidence_distribution,
    }
}
