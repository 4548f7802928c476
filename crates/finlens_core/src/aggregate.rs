//! Point-in-time aggregation of a financial document
//!
//! Everything here is a pure function of its inputs: net worth from stated
//! balances and holdings, cash-flow ratios from normalized transactions, and
//! category breakdowns for reporting.

use std::num::NonZeroU32;

use rustc_hash::FxHashMap;

use crate::error::{AnalyticsError, Result};
use crate::model::{
    AssetAllocation, CashFlowSummary, CreditScoreSummary, FinancialDocument, Holding,
    HoldingsBreakdown, InsuranceSummary, Loan, NetWorthSnapshot, PolicyKind, StockGain,
    Transaction, TransactionType,
};

/// Net worth from the stated bank balances and current holdings.
///
/// Bank balances are taken as stated, never recomputed from transactions.
pub fn net_worth(document: &FinancialDocument) -> NetWorthSnapshot {
    let bank_balance: f64 = document.banks.iter().map(|b| b.balance).sum();

    let mut snapshot = NetWorthSnapshot {
        bank_balance,
        ..Default::default()
    };
    for holding in document.holdings() {
        match holding {
            Holding::MutualFund(fund) => snapshot.mutual_funds_value += fund.value(),
            Holding::Stock(stock) => snapshot.stocks_value += stock.value(),
            Holding::Loan(loan) => snapshot.loan_outstanding += loan.outstanding_amount,
            Holding::Insurance(_) => {}
        }
    }

    snapshot.net_worth = snapshot.bank_balance + snapshot.mutual_funds_value + snapshot.stocks_value
        - snapshot.loan_outstanding;
    snapshot
}

pub fn total_monthly_emi(loans: &[Loan]) -> f64 {
    loans.iter().map(|l| l.monthly_emi).sum()
}

/// Income, expense and ratio summary over an observation window.
///
/// `observation_months` must be supplied by the caller; it is not inferred
/// from transaction dates. Fails with `DivisionByZero` when there is no
/// credit income in the window.
pub fn cash_flow_summary(
    transactions: &[Transaction],
    loans: &[Loan],
    observation_months: NonZeroU32,
) -> Result<CashFlowSummary> {
    let (debit_total, credit_total) =
        transactions
            .iter()
            .fold((0.0, 0.0), |(debit, credit), txn| match txn.kind {
                TransactionType::Debit => (debit + txn.amount, credit),
                TransactionType::Credit => (debit, credit + txn.amount),
            });

    let months = f64::from(observation_months.get());
    let monthly_income = credit_total / months;
    let monthly_expense = debit_total / months;
    let total_monthly_emi = total_monthly_emi(loans);

    if monthly_income == 0.0 {
        return Err(AnalyticsError::DivisionByZero {
            ratio: "savings rate",
        });
    }

    Ok(CashFlowSummary {
        debit_total,
        credit_total,
        observation_months: observation_months.get(),
        monthly_income,
        monthly_expense,
        total_monthly_emi,
        savings_rate: (monthly_income - monthly_expense) / monthly_income * 100.0,
        monthly_dti: total_monthly_emi / monthly_income * 100.0,
    })
}

/// Category breakdowns used alongside the net-worth snapshot
pub fn holdings_breakdown(
    document: &FinancialDocument,
    transactions: &[Transaction],
) -> HoldingsBreakdown {
    let snapshot = net_worth(document);

    let mut insurance = InsuranceSummary::default();
    for policy in &document.insurance {
        match policy.kind {
            PolicyKind::Life => insurance.life_cover += policy.coverage_amount,
            PolicyKind::Health => insurance.health_cover += policy.coverage_amount,
            PolicyKind::Other => insurance.other_cover += policy.coverage_amount,
        }
        insurance.annual_premium += policy.premium.unwrap_or(0.0);
    }

    let stock_gains = document
        .stocks
        .iter()
        .map(|stock| StockGain {
            symbol: stock.symbol.clone(),
            market_value: stock.value(),
            unrealized_gain: stock.unrealized_gain(),
        })
        .collect();

    let mut spending_by_category: FxHashMap<String, f64> = FxHashMap::default();
    for txn in transactions.iter().filter(|t| t.is_debit()) {
        *spending_by_category
            .entry(txn.description.clone())
            .or_insert(0.0) += txn.amount;
    }

    HoldingsBreakdown {
        allocation: AssetAllocation {
            mutual_funds: snapshot.mutual_funds_value,
            stocks: snapshot.stocks_value,
            cash: snapshot.bank_balance,
        },
        insurance,
        stock_gains,
        total_monthly_emi: total_monthly_emi(&document.loans),
        spending_by_category,
        credit_score: credit_score_summary(document),
    }
}

/// Earliest and latest score by date; undated entries sort first
fn credit_score_summary(document: &FinancialDocument) -> Option<CreditScoreSummary> {
    let mut entries: Vec<_> = document.credit_score.iter().collect();
    if entries.is_empty() {
        return None;
    }
    entries.sort_by_key(|e| e.date);

    let earliest = entries.first()?.score;
    let latest = entries.last()?.score;
    Some(CreditScoreSummary {
        latest,
        earliest,
        change: latest - earliest,
        observations: entries.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_net_worth_example() {
        let doc = FinancialDocument::from_value(json!({
            "banks": [{"bankName": "A", "balance": 1000}],
            "mutualFunds": [{"units": 10, "nav": 5}],
            "stocks": [{"quantity": 2, "currentPrice": 100}],
            "loans": [{"monthlyEMI": 10, "outstandingAmount": 300}]
        }))
        .unwrap();

        let snapshot = net_worth(&doc);

        assert_eq!(snapshot.bank_balance, 1000.0);
        assert_eq!(snapshot.mutual_funds_value, 50.0);
        assert_eq!(snapshot.stocks_value, 200.0);
        assert_eq!(snapshot.loan_outstanding, 300.0);
        assert_eq!(snapshot.net_worth, 950.0);
        assert_eq!(snapshot.net_asset_value(), -50.0);
    }

    #[test]
    fn test_net_worth_of_empty_document_is_zero() {
        let snapshot = net_worth(&FinancialDocument::default());
        assert_eq!(snapshot, NetWorthSnapshot::default());
        assert_eq!(snapshot.net_worth, 0.0);
    }

    #[test]
    fn test_credit_score_summary_orders_by_date() {
        let doc = FinancialDocument::from_value(json!({
            "banks": [],
            "creditScore": [
                {"date": "2024-12-05T01:27:56.709Z", "score": 693},
                {"date": "2024-11-07T13:42:25.376Z", "score": 708},
                {"date": "2025-01-02T00:00:00Z", "score": 715}
            ]
        }))
        .unwrap();

        let summary = credit_score_summary(&doc).unwrap();
        assert_eq!(summary.earliest, 708.0);
        assert_eq!(summary.latest, 715.0);
        assert_eq!(summary.change, 7.0);
        assert_eq!(summary.observations, 3);
        assert!(credit_score_summary(&FinancialDocument::default()).is_none());
    }
}
