use serde::{Deserialize, Serialize};

/// Device specification as entered in the prediction form. Field names and
/// units are the user-facing vocabulary; `services::features` maps them onto
/// the backend feature names before anything is sent over the wire.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeviceSpec {
    pub brand: String,
    pub model_name: String,
    pub battery_mah: f64,
    pub clock_speed: f64,
    pub front_camera: f64,
    pub rear_camera: f64,
    pub storage_gb: i64,
    pub depth_cm: f64,
    pub weight_g: f64,
    pub cores: i64,
    pub screen_height_px: i64,
    pub screen_width_px: i64,
    pub ram_mb: i64,
    pub screen_height_cm: f64,
    pub screen_width_cm: f64,
    pub talk_time: f64,
    #[serde(default)]
    pub bluetooth: bool,
    #[serde(default)]
    pub dual_sim: bool,
    #[serde(default)]
    pub has_3g: bool,
    #[serde(default)]
    pub has_4g: bool,
    #[serde(default)]
    pub touchscreen: bool,
    #[serde(default)]
    pub wifi: bool,
}

/// The exact 20-field numeric representation the prediction model consumes.
/// Boolean flags are encoded as 1/0. Key names must match the model's training
/// columns, so they are fixed here and nowhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub battery_power: f64,
    pub blue: u8,
    pub clock_speed: f64,
    pub dual_sim: u8,
    pub fc: f64,
    pub four_g: u8,
    pub int_memory: f64,
    pub m_dep: f64,
    pub mobile_wt: f64,
    pub n_cores: i64,
    pub pc: f64,
    pub px_height: i64,
    pub px_width: i64,
    pub ram: i64,
    pub sc_h: f64,
    pub sc_w: f64,
    pub talk_time: f64,
    pub three_g: u8,
    pub touch_screen: u8,
    pub wifi: u8,
}

/// Backend feature names in the column order the batch CSV expects.
pub const BACKEND_FEATURES: [&str; 20] = [
    "battery_power",
    "blue",
    "clock_speed",
    "dual_sim",
    "fc",
    "four_g",
    "int_memory",
    "m_dep",
    "mobile_wt",
    "n_cores",
    "pc",
    "px_height",
    "px_width",
    "ram",
    "sc_h",
    "sc_w",
    "talk_time",
    "three_g",
    "touch_screen",
    "wifi",
];

/// Body of `POST /predict/`. The backend prepares its model input from the 20
/// flattened feature fields only, but reads `brand` and `model_name` from the
/// same body for its history log, so both ride along at the top level.
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    pub brand: String,
    pub model_name: String,
    #[serde(flatten)]
    pub features: FeatureVector,
}
