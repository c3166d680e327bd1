/// Thousands separators for display ("1247" -> "1,247").
pub fn format_number(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Percentage with a fixed number of decimals, e.g. `94.2%`.
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            first.to_uppercase().collect::<String>() + chars.as_str().to_lowercase().as_str()
        }
        None => String::new(),
    }
}

/// `snake_case` to `Title Case`, for feature names in reports.
pub fn snake_to_title(name: &str) -> String {
    name.split('_')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}
