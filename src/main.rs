use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;

use devicepricepro::models::{DeviceSpec, PredictionRecord};
use devicepricepro::services::analytics_engine::{self, DataSource};
use devicepricepro::services::api_client::ApiClient;
use devicepricepro::services::session::SessionStore;
use devicepricepro::services::{export, features, validation};
use devicepricepro::utils::config;
use devicepricepro::utils::format::snake_to_title;

const USAGE: &str = "usage: devicepricepro <command>

commands:
  analytics [--json|--html]   fetch history, aggregate, print the export
  template                    print the batch upload CSV template
  predict <spec.json>         validate a device spec file and predict its price range
  batch <devices.csv>         upload a CSV for batch prediction, print results CSV
  history                     list prediction history records
  login <email> <password>    authenticate and store the session
  logout                      clear the stored session";

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let store = SessionStore::new(&config::data_dir());
    let mut client = ApiClient::new(config::api_base_url(), store)?;

    match args.first().map(String::as_str) {
        Some("analytics") => run_analytics(&client, args.get(1).map(String::as_str)).await,
        Some("template") => {
            println!("{}", export::csv_template());
            Ok(())
        }
        Some("predict") => {
            let path = args.get(1).context("predict needs a spec file path")?;
            run_predict(&client, Path::new(path)).await
        }
        Some("batch") => {
            let path = args.get(1).context("batch needs a CSV file path")?;
            run_batch(&client, Path::new(path)).await
        }
        Some("history") => run_history(&client).await,
        Some("login") => {
            let email = args.get(1).context("login needs an email")?;
            let password = args.get(2).context("login needs a password")?;
            run_login(&mut client, email, password).await
        }
        Some("logout") => {
            client.logout().await?;
            println!("Logged out.");
            Ok(())
        }
        _ => {
            eprintln!("{}", USAGE);
            Ok(())
        }
    }
}

async fn run_analytics(client: &ApiClient, output: Option<&str>) -> Result<()> {
    let (summary, source) = analytics_engine::load_analytics(client).await;
    eprintln!("Data Status: {}", source.status_text());
    if source != DataSource::Live {
        eprintln!("The output below is sample data for demonstration.");
    }

    match output {
        Some("--json") => {
            let report = export::full_report_json(&summary, Utc::now());
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Some("--html") => {
            let today = Utc::now().format("%Y-%m-%d").to_string();
            println!("{}", export::printable_report(&summary, &today));
        }
        _ => println!("{}", export::analytics_csv(&summary)),
    }
    Ok(())
}

async fn run_predict(client: &ApiClient, path: &Path) -> Result<()> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let spec: DeviceSpec = serde_json::from_str(&data).context("invalid device spec")?;

    let errors = validation::validate_device_form(&spec);
    if !errors.is_empty() {
        for (field, message) in &errors {
            eprintln!("{}: {}", field, message);
        }
        bail!("device spec failed validation");
    }

    let request = features::to_predict_request(&spec);
    let result = client
        .predict(&request)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let formatted = features::format_prediction(&result);

    println!(
        "{} {} -> {} ({}), confidence {:.1}%",
        spec.brand, spec.model_name, formatted.price_range.label, formatted.price_range.range,
        formatted.confidence
    );
    for slice in &formatted.confidence_distribution {
        println!("  {:<10} {:.1}%", slice.range, slice.probability);
    }

    match client.explain(&request).await {
        Ok(explanation) => {
            for (feature, importance) in explanation.top_features.iter().take(5) {
                println!("  {} impact: {:.1}%", snake_to_title(feature), importance * 100.0);
            }
        }
        Err(e) => log::warn!("explanation unavailable: {}", e),
    }
    Ok(())
}

async fn run_batch(client: &ApiClient, path: &Path) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("invalid file name")?;
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if let Some(message) = validation::validate_csv_upload(file_name, metadata.len()) {
        bail!(message);
    }

    let csv = std::fs::read(path)?;
    let outcome = client
        .predict_batch(file_name, csv)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    eprintln!(
        "Processed {}: {} successful, {} errors",
        outcome.total_processed, outcome.successful_predictions, outcome.errors_count
    );
    for error in &outcome.errors {
        eprintln!("  {}", error);
    }
    println!("{}", export::batch_results_csv(&outcome));
    Ok(())
}

async fn run_history(client: &ApiClient) -> Result<()> {
    let records = client
        .history()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    if records.is_empty() {
        println!("No prediction history yet.");
        return Ok(());
    }

    for record in &records {
        let date = record.created_at().format("%Y-%m-%d %H:%M");
        let label = record
            .predicted_price_range()
            .map(devicepricepro::models::label_or_unknown)
            .unwrap_or("Unknown");
        let confidence = record
            .confidence()
            .map(|c| format!("{:.1}%", c))
            .unwrap_or_else(|| "-".to_string());
        match record {
            PredictionRecord::Single { brand, model, .. } => {
                println!("{}  single  {} {}  {}  {}", date, brand, model, label, confidence);
            }
            PredictionRecord::Batch {
                file_name,
                total_devices,
                ..
            } => {
                println!(
                    "{}  batch   {} ({} devices)  {}  {}",
                    date, file_name, total_devices, label, confidence
                );
            }
        }
    }
    Ok(())
}

async fn run_login(client: &mut ApiClient, email: &str, password: &str) -> Result<()> {
    let errors = validation::validate_login_form(email, password);
    if !errors.is_empty() {
        for (field, message) in &errors {
            eprintln!("{}: {}", field, message);
        }
        bail!("login form failed validation");
    }

    let session = client
        .login(email, password)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    println!("Logged in as {}.", session.user.email);
    Ok(())
}
