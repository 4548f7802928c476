//! Analysis results
//!
//! Plain serializable records returned by the core entry points. None of
//! these are persisted by the core; they are created fresh per run.

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// Anomaly detection
// ============================================================================

/// Which detection method flagged a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnomalyReason {
    #[serde(rename = "Unusual transaction amount (Z-score)")]
    ZScore,
    #[serde(rename = "Unusual pattern detected (Isolation Forest)")]
    IsolationForest,
}

impl AnomalyReason {
    pub fn label(&self) -> &'static str {
        match self {
            AnomalyReason::ZScore => "Unusual transaction amount (Z-score)",
            AnomalyReason::IsolationForest => "Unusual pattern detected (Isolation Forest)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub date: Timestamp,
    pub amount: f64,
    pub description: String,
    pub bank: String,
    /// Methods that fired, z-score first
    pub reason: Vec<AnomalyReason>,
    /// `None` when the debit distribution has zero variance
    pub zscore: Option<f64>,
}

impl Anomaly {
    /// Reasons joined into a single human-readable line
    pub fn reason_text(&self) -> String {
        self.reason
            .iter()
            .map(AnomalyReason::label)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Sorted by amount, largest first
    pub anomalies: Vec<Anomaly>,
    pub count: usize,
}

impl AnomalyReport {
    pub fn new(anomalies: Vec<Anomaly>) -> Self {
        let count = anomalies.len();
        Self { anomalies, count }
    }

    pub fn is_empty(&self) -> bool {
        self.anomalies.is_empty()
    }
}

// ============================================================================
// Aggregation
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthSnapshot {
    pub bank_balance: f64,
    pub mutual_funds_value: f64,
    pub stocks_value: f64,
    pub loan_outstanding: f64,
    pub net_worth: f64,
}

impl NetWorthSnapshot {
    /// Net asset value used as year 0 of the Monte Carlo paths (excludes cash)
    pub fn net_asset_value(&self) -> f64 {
        self.mutual_funds_value + self.stocks_value - self.loan_outstanding
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowSummary {
    pub debit_total: f64,
    pub credit_total: f64,
    pub observation_months: u32,
    pub monthly_income: f64,
    pub monthly_expense: f64,
    #[serde(rename = "totalMonthlyEMI")]
    pub total_monthly_emi: f64,
    /// Percent of monthly income left after expenses
    pub savings_rate: f64,
    /// Monthly debt-to-income ratio, in percent
    #[serde(rename = "monthlyDTI")]
    pub monthly_dti: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAllocation {
    pub mutual_funds: f64,
    pub stocks: f64,
    pub cash: f64,
}

impl AssetAllocation {
    pub fn total(&self) -> f64 {
        self.mutual_funds + self.stocks + self.cash
    }

    /// Share of each bucket in percent; all zero when nothing is held
    pub fn percentages(&self) -> AssetAllocation {
        let total = self.total();
        if total <= 0.0 {
            return AssetAllocation::default();
        }
        AssetAllocation {
            mutual_funds: self.mutual_funds / total * 100.0,
            stocks: self.stocks / total * 100.0,
            cash: self.cash / total * 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceSummary {
    pub life_cover: f64,
    pub health_cover: f64,
    pub other_cover: f64,
    pub annual_premium: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockGain {
    pub symbol: String,
    pub market_value: f64,
    /// `None` when the purchase price is unknown
    pub unrealized_gain: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditScoreSummary {
    pub latest: f64,
    pub earliest: f64,
    pub change: f64,
    pub observations: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsBreakdown {
    pub allocation: AssetAllocation,
    pub insurance: InsuranceSummary,
    pub stock_gains: Vec<StockGain>,
    #[serde(rename = "totalMonthlyEMI")]
    pub total_monthly_emi: f64,
    /// Debit totals keyed by transaction description
    pub spending_by_category: FxHashMap<String, f64>,
    pub credit_score: Option<CreditScoreSummary>,
}

// ============================================================================
// Projection
// ============================================================================

/// One simulated or scenario trajectory, indexed by year (0 = today)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPath {
    pub net_worth: Vec<f64>,
    pub mutual_funds: Vec<f64>,
    pub stocks: Vec<f64>,
    pub loan_balance: Vec<f64>,
}

impl ProjectionPath {
    pub fn with_capacity(years: usize) -> Self {
        Self {
            net_worth: Vec::with_capacity(years + 1),
            mutual_funds: Vec::with_capacity(years + 1),
            stocks: Vec::with_capacity(years + 1),
            loan_balance: Vec::with_capacity(years + 1),
        }
    }

    pub fn push(&mut self, net_worth: f64, mutual_funds: f64, stocks: f64, loan: f64) {
        self.net_worth.push(net_worth);
        self.mutual_funds.push(mutual_funds);
        self.stocks.push(stocks);
        self.loan_balance.push(loan);
    }

    /// Number of points, i.e. years + 1
    pub fn len(&self) -> usize {
        self.net_worth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.net_worth.is_empty()
    }

    /// Percent change of final net worth relative to year 0.
    ///
    /// `None` when year 0 is zero or the path is empty.
    pub fn growth_percent(&self) -> Option<f64> {
        let start = *self.net_worth.first()?;
        let end = *self.net_worth.last()?;
        (start != 0.0).then(|| (end - start) / start.abs() * 100.0)
    }
}

/// Per-year values of one percentile across all simulated paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileBand {
    /// In [0, 1]
    pub percentile: f64,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonteCarloResult {
    /// One row per simulation, each of length years + 1
    pub paths: Vec<ProjectionPath>,
    pub bands: Vec<PercentileBand>,
    pub seed: u64,
}

impl MonteCarloResult {
    /// (simulations, years + 1)
    pub fn shape(&self) -> (usize, usize) {
        (
            self.paths.len(),
            self.paths.first().map(ProjectionPath::len).unwrap_or(0),
        )
    }

    /// Net-worth matrix, one row per simulation
    pub fn net_worth_matrix(&self) -> Vec<&[f64]> {
        self.paths.iter().map(|p| p.net_worth.as_slice()).collect()
    }

    pub fn band(&self, percentile: f64) -> Option<&PercentileBand> {
        self.bands
            .iter()
            .find(|b| (b.percentile - percentile).abs() < 1e-9)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WealthProjection {
    pub net_worth_snapshot: NetWorthSnapshot,
    pub monte_carlo: MonteCarloResult,
    pub deterministic_path: ProjectionPath,
}

/// Point-in-time view of a document: balances, breakdowns and cash flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub net_worth_snapshot: NetWorthSnapshot,
    pub holdings: HoldingsBreakdown,
    pub cash_flow: CashFlowSummary,
    /// Raw transactions dropped during normalization
    pub skipped_transactions: usize,
}
