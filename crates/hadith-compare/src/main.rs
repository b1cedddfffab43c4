//! Entry point for the regression comparison harness

use anyhow::Result;
use hadith_compare::config::HarnessConfig;
use hadith_compare::run::run_regression;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Env file first so it can feed both config and the log filter.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = HarnessConfig::from_env()?;
    info!(
        baseline = %config.baseline_url,
        candidate = %config.candidate_url,
        "starting regression comparison"
    );

    let summary = run_regression(&config).await?;

    if summary.mismatched > 0 {
        std::process::exit(1);
    }
    Ok(())
}
