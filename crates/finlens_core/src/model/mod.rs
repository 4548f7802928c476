mod document;
pub mod lenient;
mod results;
mod transaction;

pub use document::{
    BankAccount, CreditScoreEntry, FinancialDocument, Holding, InsurancePolicy, Loan, MutualFund,
    PolicyKind, RawTransaction, Stock,
};
pub use results::{
    Anomaly, AnomalyReason, AnomalyReport, AssetAllocation, CashFlowSummary, CreditScoreSummary,
    FinancialSummary, HoldingsBreakdown, InsuranceSummary, MonteCarloResult, NetWorthSnapshot,
    PercentileBand, ProjectionPath, StockGain, WealthProjection,
};
pub use transaction::{Transaction, TransactionType};
