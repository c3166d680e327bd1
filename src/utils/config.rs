use std::path::PathBuf;

const ENV_API_URL: &str = "DEVICEPRICEPRO_API_URL";
const ENV_DATA_DIR: &str = "DEVICEPRICEPRO_DATA_DIR";
const DEFAULT_API_URL: &str = "http://localhost:5000";

pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Base URL of the prediction service, from the environment or the default
/// local instance. Trailing slashes are trimmed so paths can be joined.
pub fn api_base_url() -> String {
    std::env::var(ENV_API_URL)
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Directory for client-side state (the session file).
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    match std::env::var("HOME") {
        Ok(home) if !home.is_empty() => PathBuf::from(home).join(".devicepricepro"),
        _ => PathBuf::from(".devicepricepro"),
    }
}
