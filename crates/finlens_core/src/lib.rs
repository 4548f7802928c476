//! Personal finance analytics library
//!
//! This crate analyzes an aggregated financial document (bank accounts with
//! transactions, mutual funds, stocks, loans, insurance and credit scores).
//! It supports:
//! - Transaction normalization that skips malformed records one at a time
//! - Debit anomaly detection combining a z-score test with an isolation forest
//! - Net-worth, cash-flow and holdings aggregation
//! - Monte Carlo and fixed-assumption net-worth projections
//!
//! # Quick start
//!
//! ```ignore
//! use finlens_core::{FinancialDocument, ProjectionParams, detect_anomalies, project_wealth};
//!
//! let document = FinancialDocument::from_json(&json)?;
//! let report = detect_anomalies(&document)?;
//! let projection = project_wealth(&document, &ProjectionParams::default())?;
//! println!("{} anomalies, median in 10y: {:?}", report.count, projection.monte_carlo.band(0.5));
//! ```
//!
//! Every entry point is a pure function of its arguments. Randomness comes
//! only from the seeds carried in [`DetectionPolicy`] and [`MonteCarloConfig`].

#![warn(clippy::all)]

use std::num::NonZeroU32;

// ============================================================================
// Core modules
// ============================================================================

pub mod aggregate;
pub mod anomaly;
pub mod error;
pub mod normalize;
pub mod projection;
pub mod stats;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use aggregate::{cash_flow_summary, holdings_breakdown, net_worth, total_monthly_emi};
pub use anomaly::{AnomalyDetector, CombinationRule, DetectionPolicy, IsolationForest, OutlierModel};
pub use error::{AnalyticsError, DetectionError, DocumentError, ParameterError, Result};
pub use model::{
    Anomaly, AnomalyReason, AnomalyReport, FinancialDocument, FinancialSummary, MonteCarloResult,
    NetWorthSnapshot, ProjectionPath, Transaction, TransactionType, WealthProjection,
};
pub use normalize::{NormalizedTransactions, normalize};
pub use projection::{
    MonteCarloConfig, PortfolioStart, ProjectionParams, ScenarioAssumptions, project_scenario,
};

// ============================================================================
// Entry points
// ============================================================================

/// Flag anomalous debits using the default conjunctive policy.
pub fn detect_anomalies(document: &FinancialDocument) -> Result<AnomalyReport> {
    detect_anomalies_with(document, &DetectionPolicy::default())
}

/// Flag anomalous debits under an explicit policy.
pub fn detect_anomalies_with(
    document: &FinancialDocument,
    policy: &DetectionPolicy,
) -> Result<AnomalyReport> {
    let detector = AnomalyDetector::new(*policy)?;
    let normalized = normalize(document);
    if normalized.is_empty() {
        return Ok(AnomalyReport::default());
    }
    Ok(detector.detect(&normalized.transactions)?)
}

/// Net worth, holdings breakdown and cash flow over `observation_months`.
///
/// Fails with [`AnalyticsError::DivisionByZero`] when the document has no
/// credit income.
pub fn summarize(
    document: &FinancialDocument,
    observation_months: NonZeroU32,
) -> Result<FinancialSummary> {
    let normalized = normalize(document);
    let cash_flow = cash_flow_summary(
        &normalized.transactions,
        &document.loans,
        observation_months,
    )?;

    Ok(FinancialSummary {
        net_worth_snapshot: net_worth(document),
        holdings: holdings_breakdown(document, &normalized.transactions),
        cash_flow,
        skipped_transactions: normalized.skipped,
    })
}

/// Snapshot plus Monte Carlo and deterministic projections from today's holdings.
pub fn project_wealth(
    document: &FinancialDocument,
    params: &ProjectionParams,
) -> Result<WealthProjection> {
    let snapshot = net_worth(document);
    let start = PortfolioStart::from_snapshot(&snapshot, total_monthly_emi(&document.loans));

    let monte_carlo = projection::monte_carlo::run(&start, &params.monte_carlo)?;
    let deterministic_path = project_scenario(&start, &params.scenario)?;

    Ok(WealthProjection {
        net_worth_snapshot: snapshot,
        monte_carlo,
        deterministic_path,
    })
}
