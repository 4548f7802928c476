//! Integration tests for the finlens analytics core
//!
//! Tests are organized by topic:
//! - `anomalies` - Debit anomaly detection through the public entry points
//! - `net_worth` - Net-worth snapshot and cash-flow summary
//! - `projection` - Monte Carlo and deterministic projections
//! - `pipeline` - A full document run end to end


use serde_json::{Value, json};

use crate::model::FinancialDocument;

/// One bank holding a debit per amount, dated a day apart
pub(crate) fn document_with_debits(amounts: &[f64]) -> FinancialDocument {
    let transactions: Vec<Value> = amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| {
            json!({
                "date": format!("2024-01-{:02}", i + 1),
                "type": "debit",
                "amount": amount,
                "description": format!("Purchase {}", i + 1),
            })
        })
        .collect();

    FinancialDocument::from_value(json!({
        "banks": [{
            "bankName": "Test Bank",
            "accountNumber": "XXXX1234",
            "balance": 10000,
            "transactions": transactions,
        }]
    }))
    .unwrap()
}
