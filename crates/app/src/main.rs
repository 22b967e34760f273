//! Petstore E2E - Main Entry Point
//!
//! Loads configuration, runs the petstore suite once and prints the report.
//! Exit status: 0 when every scenario passed, 1 when any failed, 2 when
//! configuration or setup failed.

use std::process::ExitCode;

use anyhow::Context;
use petstore_e2e::{petstore_suite, suite_runner};
use petstore_infrastructure::{ConfigLoader, ReportFormat, SuiteReport};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const EXIT_FAILED: u8 = 1;
const EXIT_ABORTED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(report) if report.all_passed() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(EXIT_FAILED),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_ABORTED)
        }
    }
}

async fn run() -> anyhow::Result<SuiteReport> {
    let config = ConfigLoader::from_env()
        .load()
        .context("loading configuration")?;

    tracing::info!(
        "Starting Petstore E2E v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.base_url
    );

    let runner = suite_runner(&config).context("creating HTTP client")?;
    let report = runner.run(&petstore_suite(&config.api_key)).await?;

    let rendered = match config.report_format {
        ReportFormat::Text => report.render_text(),
        ReportFormat::Json => report.render_json().context("rendering report")?,
    };
    print!("{rendered}");

    Ok(report)
}
