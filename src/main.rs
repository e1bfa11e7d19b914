use anyhow::{bail, Context};
use chrono::Local;
use omen::config::Config;
use omen::services::{
    build_report, classify_alerts, compute_indicators, Digest, DigestMessage, HistoryStore,
    Report,
};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "omen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    if let Err(e) = run(&config).await {
        error!("Run failed: {:#}", e);
        deliver(&Digest::failure(format!("{:#}", e), Local::now().naive_local()));
        return Err(e);
    }

    Ok(())
}

async fn run(config: &Config) -> anyhow::Result<()> {
    let settings = config.load_settings().context("failed to load settings")?;
    info!(
        "Starting run: {} enabled instruments, data in {}",
        settings.instruments.enabled().count(),
        config.data_dir.display()
    );

    // Step 1: price histories
    let store = HistoryStore::new(&config.data_dir);
    let histories = store.load_all(&settings.instruments).await;
    if histories.is_empty() {
        bail!("no price history in {}", store.dir().display());
    }
    info!("Loaded {} price histories", histories.len());

    // Step 2: indicators
    let output = compute_indicators(&histories, &config.engine)?;
    for (code, analysis) in &output.records {
        if analysis.is_error() {
            warn!("{}: not enough history, excluded from alerts", code);
        }
    }

    // Step 3: alerts
    let alerts = classify_alerts(
        &output.records,
        &output.correlations,
        &settings.instruments,
        &settings.thresholds,
        &settings.correlation_patterns,
    );
    info!(
        "Alerts - level 1: {}, level 2: {}, level 3: {}",
        alerts.level1.len(),
        alerts.level2.len(),
        alerts.level3.len()
    );

    // Step 4: report
    let now = Local::now().naive_local();
    let report = build_report(&output, &settings.instruments, now.date());
    let report_path = write_report(&config.report_dir, &report).await?;
    info!("Report written to {}", report_path.display());

    // Step 5: digest
    for message in &Digest::compose(&alerts, now).messages {
        deliver(message);
    }

    Ok(())
}

/// Hand a message to the notification sink (stdout).
fn deliver(message: &DigestMessage) {
    debug!(
        "Delivering {} message (silent: {})",
        message.level.as_str(),
        message.silent
    );
    println!("{}\n", message.text);
}

/// Write the report as `report_{date}.json` under `dir`.
async fn write_report(dir: &Path, report: &Report) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(format!("report_{}.json", report.generated_on.format("%Y-%m-%d")));
    let content = serde_json::to_string_pretty(report)?;
    tokio::fs::write(&path, content)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
