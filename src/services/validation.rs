use std::collections::BTreeMap;

use crate::models::DeviceSpec;

/// Field name -> error message for every failing field. An empty map means
/// the form is valid. `BTreeMap` keeps reporting order deterministic.
pub type FieldErrors = BTreeMap<&'static str, String>;

fn check_number(label: &str, value: f64, min: f64, max: f64) -> Option<String> {
    if !value.is_finite() {
        return Some(format!("{} must be a valid number", label));
    }
    if value < min {
        return Some(format!("{} must be at least {}", label, min));
    }
    if value > max {
        return Some(format!("{} must be no more than {}", label, max));
    }
    None
}

fn check_integer(label: &str, value: i64, min: i64, max: i64) -> Option<String> {
    if value < min {
        return Some(format!("{} must be at least {}", label, min));
    }
    if value > max {
        return Some(format!("{} must be no more than {}", label, max));
    }
    None
}

fn check_required(label: &str, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{} is required", label));
    }
    None
}

/// Validate a whole device form against the documented field ranges. Boolean
/// flags have no constraint and always pass.
pub fn validate_device_form(spec: &DeviceSpec) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let numeric_checks: [(&'static str, Option<String>); 16] = [
        ("brand", check_required("brand", &spec.brand)),
        ("model_name", check_required("model name", &spec.model_name)),
        ("battery_mah", check_number("Battery (mAh)", spec.battery_mah, 500.0, 10000.0)),
        ("clock_speed", check_number("Clock Speed (GHz)", spec.clock_speed, 0.5, 5.0)),
        ("front_camera", check_number("Front Camera (MP)", spec.front_camera, 0.1, 200.0)),
        ("storage_gb", check_integer("Storage (GB)", spec.storage_gb, 1, 2000)),
        ("depth_cm", check_number("Depth (cm)", spec.depth_cm, 0.3, 5.0)),
        ("weight_g", check_number("Weight (g)", spec.weight_g, 50.0, 1000.0)),
        ("cores", check_integer("CPU Cores", spec.cores, 1, 16)),
        ("rear_camera", check_number("Rear Camera (MP)", spec.rear_camera, 0.1, 200.0)),
        ("screen_height_px", check_integer("Screen Height (px)", spec.screen_height_px, 480, 4000)),
        ("screen_width_px", check_integer("Screen Width (px)", spec.screen_width_px, 320, 3000)),
        ("ram_mb", check_integer("RAM (MB)", spec.ram_mb, 256, 32000)),
        ("screen_height_cm", check_number("Screen Height (cm)", spec.screen_height_cm, 5.0, 25.0)),
        ("screen_width_cm", check_number("Screen Width (cm)", spec.screen_width_cm, 3.0, 15.0)),
        ("talk_time", check_number("Talk Time (hours)", spec.talk_time, 1.0, 50.0)),
    ];

    for (field, result) in numeric_checks {
        if let Some(message) = result {
            errors.insert(field, message);
        }
    }

    errors
}

pub fn validate_email(email: &str) -> Option<String> {
    if email.is_empty() {
        return Some("Email is required".to_string());
    }
    let mut parts = email.split('@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    let well_formed = parts.next().is_none()
        && !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace);
    if !well_formed {
        return Some("Please enter a valid email address".to_string());
    }
    None
}

pub fn validate_password(password: &str) -> Option<String> {
    if password.is_empty() {
        return Some("Password is required".to_string());
    }
    if password.len() < 6 {
        return Some("Password must be at least 6 characters long".to_string());
    }
    None
}

pub fn validate_login_form(email: &str, password: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let Some(e) = validate_email(email) {
        errors.insert("email", e);
    }
    if let Some(e) = validate_password(password) {
        errors.insert("password", e);
    }
    errors
}

pub fn validate_register_form(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let Some(e) = check_required("Name", name) {
        errors.insert("name", e);
    }
    if let Some(e) = validate_email(email) {
        errors.insert("email", e);
    }
    if let Some(e) = validate_password(password) {
        errors.insert("password", e);
    }
    if password != confirm_password {
        errors.insert("confirm_password", "Passwords do not match".to_string());
    }
    errors
}

pub fn validate_password_change(current: &str, new: &str, confirm_new: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let Some(e) = check_required("Current Password", current) {
        errors.insert("current_password", e);
    }
    if let Some(e) = validate_password(new) {
        errors.insert("new_password", e);
    }
    if new != confirm_new {
        errors.insert("confirm_new_password", "Passwords do not match".to_string());
    }
    if !current.is_empty() && current == new {
        errors.insert(
            "new_password",
            "New password must be different from current password".to_string(),
        );
    }
    errors
}

const MAX_CSV_BYTES: u64 = 5 * 1024 * 1024;

/// Pre-upload checks for a batch CSV: extension and the 5 MB size cap.
pub fn validate_csv_upload(file_name: &str, size_bytes: u64) -> Option<String> {
    if !file_name.to_lowercase().ends_with(".csv") {
        return Some("Please select a valid CSV file".to_string());
    }
    if size_bytes > MAX_CSV_BYTES {
        return Some("File size must be less than 5MB".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn valid_spec() -> DeviceSpec {
        DeviceSpec {
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
            wifi: true,
        }
    }

    #[test]
    fn valid_form_produces_no_errors() {
        assert!(validate_device_form(&valid_spec()).is_empty());
    }

    #[test]
    fn each_numeric_field_rejects_values_outside_its_range() {
        let mut spec = valid_spec();
        spec.battery_mah = 499.0;
        let errors = validate_device_form(&spec);
        assert_eq!(
            errors.get("battery_mah").map(String::as_str),
            Some("Battery (mAh) must be at least 500")
        );

        let mut spec = valid_spec();
        spec.clock_speed = 5.1;
        let errors = validate_device_form(&spec);
        assert_eq!(
            errors.get("clock_speed").map(String::as_str),
            Some("Clock Speed (GHz) must be no more than 5")
        );

        let mut spec = valid_spec();
        spec.cores = 17;
        assert!(validate_device_form(&spec).contains_key("cores"));

        let mut spec = valid_spec();
        spec.ram_mb = 255;
        assert!(validate_device_form(&spec).contains_key("ram_mb"));
    }

    #[test]
    fn boundary_values_pass() {
        let mut spec = valid_spec();
        spec.battery_mah = 500.0;
        spec.clock_speed = 5.0;
        spec.storage_gb = 2000;
        spec.talk_time = 1.0;
        assert!(validate_device_form(&spec).is_empty());
    }

    #[test]
    fn blank_brand_and_model_are_required() {
        let mut spec = valid_spec();
        spec.brand = "   ".to_string();
        spec.model_name = String::new();
        let errors = validate_device_form(&spec);
        assert_eq!(errors.get("brand").map(String::as_str), Some("brand is required"));
        assert_eq!(
            errors.get("model_name").map(String::as_str),
            Some("model name is required")
        );
    }

    #[test]
    fn nan_is_not_a_valid_number() {
        let mut spec = valid_spec();
        spec.weight_g = f64::NAN;
        let errors = validate_device_form(&spec);
        assert_eq!(
            errors.get("weight_g").map(String::as_str),
            Some("Weight (g) must be a valid number")
        );
    }

    #[test]
    fn email_and_password_rules() {
        assert!(validate_email("user@example.com").is_none());
        assert!(validate_email("not-an-email").is_some());
        assert!(validate_email("a b@example.com").is_some());
        assert!(validate_password("secret1").is_none());
        assert!(validate_password("short").is_some());
    }

    #[test]
    fn password_change_requires_a_different_password() {
        let errors = validate_password_change("hunter22", "hunter22", "hunter22");
        assert_eq!(
            errors.get("new_password").map(String::as_str),
            Some("New password must be different from current password")
        );
    }

    #[test]
    fn csv_upload_checks() {
        assert!(validate_csv_upload("devices.csv", 1024).is_none());
        assert!(validate_csv_upload("devices.xlsx", 1024).is_some());
        assert!(validate_csv_upload("devices.csv", 6 * 1024 * 1024).is_some());
    }
}
