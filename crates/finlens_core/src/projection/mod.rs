//! Net-worth projection
//!
//! Two projectors answer different questions about the same starting
//! portfolio:
//! - [`monte_carlo`]: what is likely to happen, as a distribution of paths
//!   under random annual returns
//! - [`deterministic`]: what happens under one fixed set of assumptions

pub mod deterministic;
pub mod monte_carlo;

pub use deterministic::{ScenarioAssumptions, project_scenario};
pub use monte_carlo::{MonteCarloConfig, ReturnAssumption, percentile_bands, simulate_paths};

use serde::{Deserialize, Serialize};

use crate::aggregate::{net_worth, total_monthly_emi};
use crate::error::ParameterError;
use crate::model::{FinancialDocument, NetWorthSnapshot};

/// Starting balances shared by both projectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStart {
    pub bank_balance: f64,
    pub mutual_funds: f64,
    pub stocks: f64,
    pub loan_outstanding: f64,
    /// Sum of monthly EMIs across all loans
    pub monthly_emi: f64,
}

impl PortfolioStart {
    pub fn from_snapshot(snapshot: &NetWorthSnapshot, monthly_emi: f64) -> Self {
        Self {
            bank_balance: snapshot.bank_balance,
            mutual_funds: snapshot.mutual_funds_value,
            stocks: snapshot.stocks_value,
            loan_outstanding: snapshot.loan_outstanding,
            monthly_emi,
        }
    }

    pub fn from_document(document: &FinancialDocument) -> Self {
        Self::from_snapshot(&net_worth(document), total_monthly_emi(&document.loans))
    }

    /// Mutual funds plus stocks minus loans; cash is not included
    pub fn net_asset_value(&self) -> f64 {
        self.mutual_funds + self.stocks - self.loan_outstanding
    }

    pub fn net_worth(&self) -> f64 {
        self.bank_balance + self.net_asset_value()
    }

    pub fn annual_emi(&self) -> f64 {
        self.monthly_emi * 12.0
    }
}

/// Parameters for both projectors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionParams {
    pub monte_carlo: MonteCarloConfig,
    pub scenario: ScenarioAssumptions,
}

/// Longest horizon either projector accepts
pub const MAX_YEARS: usize = 200;

/// Most Monte Carlo paths per run
pub const MAX_SIMULATIONS: usize = 100_000;

/// Cap on stored yearly values across all Monte Carlo paths
pub const MAX_PATH_POINTS: usize = 10_000_000;

pub(crate) fn require_years(years: usize) -> Result<(), ParameterError> {
    if !(1..=MAX_YEARS).contains(&years) {
        return Err(ParameterError::new("years", years as f64, "must be between 1 and 200"));
    }
    Ok(())
}

pub(crate) fn require_finite(parameter: &'static str, value: f64) -> Result<(), ParameterError> {
    if !value.is_finite() {
        return Err(ParameterError::new(parameter, value, "must be finite"));
    }
    Ok(())
}

pub(crate) fn require_non_negative(
    parameter: &'static str,
    value: f64,
) -> Result<(), ParameterError> {
    require_finite(parameter, value)?;
    if value < 0.0 {
        return Err(ParameterError::new(parameter, value, "must not be negative"));
    }
    Ok(())
}

pub(crate) fn require_fraction(parameter: &'static str, value: f64) -> Result<(), ParameterError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ParameterError::new(parameter, value, "must be within [0, 1]"));
    }
    Ok(())
}
