//! Command-line front end for the finlens analytics core
//!
//! Loads a financial document from disk, layers YAML settings and flags,
//! and renders core results as JSON or a plain-text report.

pub mod config;
pub mod logging;
pub mod report;
pub mod util;

pub use config::{ConfigError, Overrides, PolicyPreset, Settings};
pub use logging::init_logging;
pub use report::{OutputFormat, Report};

use std::path::Path;

use color_eyre::eyre::WrapErr;
use finlens_core::FinancialDocument;

/// Read and decode a financial document from a JSON file
pub fn load_document(path: &Path) -> color_eyre::Result<FinancialDocument> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read document {}", path.display()))?;
    let document = FinancialDocument::from_json(&json)
        .map_err(finlens_core::AnalyticsError::from)
        .wrap_err_with(|| format!("invalid document {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        banks = document.banks.len(),
        transactions = document.raw_transaction_count(),
        "document loaded"
    );
    Ok(document)
}
