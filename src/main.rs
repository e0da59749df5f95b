// Synthesizes a labeled transaction dataset across three consumption groups and exports it to a workbook.
use std::error::Error;
use std::io;
use std::path::Path;
use chrono::Local;
use tracing_subscriber::EnvFilter;
use dataset::{combine_groups, generate_all};
use export::export_and_report;
use summary::{calculate_metrics, log_summary, summarize};

//imports other modules in the crate
mod dataset;
mod export;
mod generator;
mod summary;

const OUTPUT_FILE_PATH: &str = "Combined_consumption_group_data.xlsx";
const PREVIEW_ROWS: usize = 10;
const DEFAULT_LOG_FILTER: &str = "info";

// Logs go to stderr so stdout carries only the status line and preview
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

// Main entry point for the dataset generator
// Inputs: None
// Outputs: Result indicating success or error
// Key steps:
// 1. Generate every consumption group
// 2. Merge, sort by date and number the rows
// 3. Export the workbook, report whether it exists, and print the first and last rows
fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let mut rng = rand::thread_rng();
    let now = Local::now().naive_local();

    let groups = generate_all(&mut rng, now)?;
    for (group, samples) in &groups {
        log_summary(&summarize(*group, samples));
    }

    let combined = combine_groups(groups.into_iter().map(|(_, samples)| samples).collect());
    let metrics = calculate_metrics(&combined);
    tracing::info!(
        total = metrics.total_transactions,
        fraud = metrics.total_fraud,
        fraud_rate = %format!("{:.2}%", metrics.fraud_rate * 100.0),
        "dataset assembled"
    );

    let stdout = io::stdout();
    export_and_report(Path::new(OUTPUT_FILE_PATH), &combined, PREVIEW_ROWS, &mut stdout.lock())?;
    Ok(())
}
