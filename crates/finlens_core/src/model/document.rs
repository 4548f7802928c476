//! The decoded financial document
//!
//! A `FinancialDocument` is the read-only aggregate root every analysis starts
//! from: bank accounts with their raw transactions, plus investment, loan and
//! insurance holdings. Raw transactions are kept loosely typed so that one bad
//! record can be skipped by the normalizer instead of rejecting the document.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

use super::lenient;

/// Key under which some upstream payloads nest the actual document
const ENVELOPE_KEY: &str = "financial_data";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialDocument {
    pub banks: Vec<BankAccount>,
    #[serde(default)]
    pub credit_score: Vec<CreditScoreEntry>,
    #[serde(default)]
    pub loans: Vec<Loan>,
    #[serde(default)]
    pub mutual_funds: Vec<MutualFund>,
    #[serde(default)]
    pub stocks: Vec<Stock>,
    #[serde(default)]
    pub insurance: Vec<InsurancePolicy>,
}

impl FinancialDocument {
    /// Decode a document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Decode a document from an already-parsed JSON value.
    ///
    /// Accepts either the document itself or an envelope of the form
    /// `{"financial_data": {...}}`.
    pub fn from_value(value: serde_json::Value) -> Result<Self, DocumentError> {
        let serde_json::Value::Object(mut map) = value else {
            return Err(DocumentError::NotAnObject);
        };

        if !map.contains_key("banks")
            && let Some(inner) = map.remove(ENVELOPE_KEY)
        {
            return Self::from_value(inner);
        }

        Ok(serde_json::from_value(serde_json::Value::Object(map))?)
    }

    /// Iterate every holding in the document as a single tagged view.
    pub fn holdings(&self) -> impl Iterator<Item = Holding<'_>> {
        self.mutual_funds
            .iter()
            .map(Holding::MutualFund)
            .chain(self.stocks.iter().map(Holding::Stock))
            .chain(self.loans.iter().map(Holding::Loan))
            .chain(self.insurance.iter().map(Holding::Insurance))
    }

    /// Number of raw transaction records across all banks
    pub fn raw_transaction_count(&self) -> usize {
        self.banks.iter().map(|b| b.transactions.len()).sum()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub bank_name: String,
    #[serde(default)]
    pub account_number: String,
    /// Stated balance; authoritative for net worth
    #[serde(deserialize_with = "lenient::deserialize")]
    pub balance: f64,
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
}

/// A transaction exactly as supplied upstream.
///
/// Every field is an untyped JSON value; conversion happens in
/// [`crate::normalize`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(default)]
    pub date: serde_json::Value,
    #[serde(default, rename = "type")]
    pub kind: serde_json::Value,
    #[serde(default)]
    pub amount: serde_json::Value,
    #[serde(default)]
    pub description: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditScoreEntry {
    #[serde(default, deserialize_with = "lenient::timestamp::deserialize")]
    pub date: Option<Timestamp>,
    #[serde(deserialize_with = "lenient::deserialize")]
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutualFund {
    #[serde(default)]
    pub fund_name: String,
    #[serde(deserialize_with = "lenient::non_negative::deserialize")]
    pub units: f64,
    #[serde(deserialize_with = "lenient::non_negative::deserialize")]
    pub nav: f64,
    #[serde(default, deserialize_with = "lenient::timestamp::deserialize")]
    pub date: Option<Timestamp>,
}

impl MutualFund {
    pub fn value(&self) -> f64 {
        self.units * self.nav
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    #[serde(default)]
    pub symbol: String,
    #[serde(deserialize_with = "lenient::non_negative::deserialize")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "lenient::non_negative::option::deserialize")]
    pub avg_buy_price: Option<f64>,
    #[serde(deserialize_with = "lenient::non_negative::deserialize")]
    pub current_price: f64,
    #[serde(default, deserialize_with = "lenient::timestamp::deserialize")]
    pub date: Option<Timestamp>,
}

impl Stock {
    pub fn value(&self) -> f64 {
        self.quantity * self.current_price
    }

    /// Unrealized gain, if the purchase price is known
    pub fn unrealized_gain(&self) -> Option<f64> {
        self.avg_buy_price
            .map(|buy| self.quantity * (self.current_price - buy))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    #[serde(default)]
    pub loan_type: String,
    #[serde(default, deserialize_with = "lenient::non_negative::option::deserialize")]
    pub principal: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option::deserialize")]
    pub interest_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::timestamp::deserialize")]
    pub start_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient::timestamp::deserialize")]
    pub end_date: Option<Timestamp>,
    #[serde(
        rename = "monthlyEMI",
        deserialize_with = "lenient::non_negative::deserialize"
    )]
    pub monthly_emi: f64,
    #[serde(deserialize_with = "lenient::non_negative::deserialize")]
    pub outstanding_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Life,
    Health,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsurancePolicy {
    #[serde(default)]
    pub policy_name: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default, deserialize_with = "lenient::non_negative::option::deserialize")]
    pub premium: Option<f64>,
    #[serde(deserialize_with = "lenient::non_negative::deserialize")]
    pub coverage_amount: f64,
    #[serde(default, deserialize_with = "lenient::timestamp::deserialize")]
    pub start_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient::timestamp::deserialize")]
    pub end_date: Option<Timestamp>,
    #[serde(rename = "type")]
    pub kind: PolicyKind,
}

/// Borrowed view over any holding kind
#[derive(Debug, Clone, Copy)]
pub enum Holding<'a> {
    MutualFund(&'a MutualFund),
    Stock(&'a Stock),
    Loan(&'a Loan),
    Insurance(&'a InsurancePolicy),
}

impl Holding<'_> {
    /// Signed contribution of this holding to net worth.
    ///
    /// Loans subtract their outstanding amount; insurance cover is not an asset.
    pub fn net_worth_contribution(&self) -> f64 {
        match self {
            Holding::MutualFund(fund) => fund.value(),
            Holding::Stock(stock) => stock.value(),
            Holding::Loan(loan) => -loan.outstanding_amount,
            Holding::Insurance(_) => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_mixed_numeric_representations() {
        let doc = FinancialDocument::from_value(json!({
            "banks": [{
                "bankName": "HDFC",
                "accountNumber": "5058270585",
                "balance": "383353.02",
                "transactions": [
                    {"date": "2024-10-07T05:15:55.217Z", "type": "debit", "amount": "9988.48", "description": "Online Shopping"}
                ]
            }],
            "stocks": [{"symbol": "TCS", "quantity": 83, "avgBuyPrice": "1259.81", "currentPrice": "1738.17"}],
            "loans": [{"loanType": "Home Loan", "monthlyEMI": 14088, "outstandingAmount": 1091522}],
            "insurance": [{"policyName": "Life Shield", "coverageAmount": 1000000, "type": "life"}]
        }))
        .unwrap();

        assert_eq!(doc.banks[0].balance, 383353.02);
        assert_eq!(doc.raw_transaction_count(), 1);
        assert_eq!(doc.stocks[0].avg_buy_price, Some(1259.81));
        assert_eq!(doc.loans[0].monthly_emi, 14088.0);
        assert_eq!(doc.insurance[0].kind, PolicyKind::Life);
        assert!(doc.mutual_funds.is_empty());
    }

    #[test]
    fn test_envelope_is_unwrapped() {
        let doc = FinancialDocument::from_value(json!({
            "financial_data": {"banks": [{"bankName": "SBI", "balance": 10}]}
        }))
        .unwrap();

        assert_eq!(doc.banks.len(), 1);
        assert_eq!(doc.banks[0].bank_name, "SBI");
        assert!(doc.banks[0].transactions.is_empty());
    }

    #[test]
    fn test_missing_banks_is_invalid() {
        let err = FinancialDocument::from_value(json!({"stocks": []})).unwrap_err();
        assert!(matches!(err, DocumentError::Decode(_)));
    }

    #[test]
    fn test_non_object_root_is_invalid() {
        let err = FinancialDocument::from_json("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, DocumentError::NotAnObject));
    }

    #[test]
    fn test_missing_required_holding_field_is_invalid() {
        let err = FinancialDocument::from_value(json!({
            "banks": [],
            "mutualFunds": [{"fundName": "Growth", "units": 10}]
        }));
        assert!(err.is_err());
    }

    #[test]
    fn test_negative_amounts_are_invalid() {
        for holding in [
            json!({"loans": [{"monthlyEMI": 100, "outstandingAmount": -500}]}),
            json!({"loans": [{"monthlyEMI": -100, "outstandingAmount": 500}]}),
            json!({"mutualFunds": [{"units": "-3", "nav": 10}]}),
            json!({"stocks": [{"quantity": 2, "currentPrice": -1}]}),
        ] {
            let mut doc = holding;
            doc["banks"] = json!([]);
            let err = FinancialDocument::from_value(doc).unwrap_err();
            assert!(matches!(err, DocumentError::Decode(ref msg) if msg.contains("non-negative")));
        }
    }

    #[test]
    fn test_unknown_policy_kind_decodes_as_other() {
        let doc = FinancialDocument::from_value(json!({
            "banks": [],
            "insurance": [{"coverageAmount": 5, "type": "vehicle"}]
        }))
        .unwrap();
        assert_eq!(doc.insurance[0].kind, PolicyKind::Other);
    }

    #[test]
    fn test_holding_contributions() {
        let doc = FinancialDocument::from_value(json!({
            "banks": [],
            "mutualFunds": [{"units": 10, "nav": 5}],
            "stocks": [{"quantity": 2, "currentPrice": 100}],
            "loans": [{"monthlyEMI": 0, "outstandingAmount": 300}],
            "insurance": [{"coverageAmount": 1000, "type": "health"}]
        }))
        .unwrap();

        let total: f64 = doc.holdings().map(|h| h.net_worth_contribution()).sum();
        assert_eq!(doc.holdings().count(), 4);
        assert_eq!(total, 50.0 + 200.0 - 300.0);
    }
}
