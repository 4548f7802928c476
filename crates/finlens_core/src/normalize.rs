//! Transaction normalization
//!
//! Flattens every bank's raw transactions into a uniform list of
//! [`Transaction`] records tagged with the owning bank. A record whose amount,
//! date or type cannot be converted is dropped on its own; the rest of the
//! bank and the rest of the document are unaffected.

use serde_json::Value;

use crate::model::{FinancialDocument, RawTransaction, Transaction, TransactionType, lenient};

#[derive(Debug, Clone, Default)]
pub struct NormalizedTransactions {
    pub transactions: Vec<Transaction>,
    /// Raw records dropped because they could not be converted
    pub skipped: usize,
}

impl NormalizedTransactions {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn debits(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| t.is_debit())
    }
}

pub fn normalize(document: &FinancialDocument) -> NormalizedTransactions {
    let mut out = NormalizedTransactions {
        transactions: Vec::with_capacity(document.raw_transaction_count()),
        skipped: 0,
    };

    for bank in &document.banks {
        for raw in &bank.transactions {
            match normalize_record(raw, &bank.bank_name) {
                Some(txn) => out.transactions.push(txn),
                None => out.skipped += 1,
            }
        }
    }

    if out.skipped > 0 {
        tracing::warn!(
            skipped = out.skipped,
            kept = out.transactions.len(),
            "dropped malformed transaction records"
        );
    }
    tracing::debug!(count = out.transactions.len(), "normalized transactions");

    out
}

fn normalize_record(raw: &RawTransaction, bank: &str) -> Option<Transaction> {
    let amount = lenient::value_to_f64(&raw.amount).filter(|a| *a >= 0.0)?;
    let date = lenient::parse_timestamp(raw.date.as_str()?)?;
    let kind = raw.kind.as_str()?.parse::<TransactionType>().ok()?;

    let description = match &raw.description {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };

    Some(Transaction {
        date,
        kind,
        amount,
        description,
        bank: bank.to_string(),
    })
}
