use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use set_revenue_drivers::{run_analysis, AnalysisConfig, InputTables};

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the report
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Set Revenue Drivers v{}", set_revenue_drivers::VERSION);

    let config = AnalysisConfig::default();

    // 1. Load the four input tables
    let tables = InputTables::load(&config.paths)?;

    // 2. Merge, fit, score
    let report = run_analysis(&tables, &config)?;

    // 3. Print
    print!("{}", report);

    Ok(())
}
