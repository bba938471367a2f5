//! `freightdesk summarize` — Print a file's digest without calling the model.

use std::path::Path;

use freightdesk_config::AppConfig;
use freightdesk_summary::{summarize_with, SummaryOptions};

pub fn run(file: &Path, seed: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let table = freightdesk_loader::load(file, config.max_file_size_mb)?;
    table.validate()?;

    let options = SummaryOptions {
        sample_size: config.sample_size,
        seed,
    };
    let digest = summarize_with(&table, &options)?;
    println!("{digest}");

    Ok(())
}
