//! Anomaly detection over debit transactions
//!
//! Two independent signals are computed over the amounts of every debit in
//! the document:
//! - a population z-score test (`|z| > zscore_threshold`)
//! - a model-based outlier test ([`OutlierModel`], an isolation forest by default)
//!
//! The [`DetectionPolicy`] decides whether both must agree (`AND`, the
//! default) or either is enough (`OR`).

mod isolation_forest;
mod zscore;

pub use isolation_forest::{IsolationForest, OutlierModel};
pub use zscore::zscores;

use serde::{Deserialize, Serialize};

use crate::error::DetectionError;
use crate::model::{Anomaly, AnomalyReason, AnomalyReport, Transaction};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CombinationRule {
    /// Flag only when both tests agree
    #[default]
    And,
    /// Flag when either test fires
    Or,
}

impl CombinationRule {
    pub fn combine(&self, zscore: bool, model: bool) -> bool {
        match self {
            CombinationRule::And => zscore && model,
            CombinationRule::Or => zscore || model,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionPolicy {
    pub combination: CombinationRule,
    pub zscore_threshold: f64,
    pub contamination: f64,
    /// Seed for the isolation forest
    pub random_state: u64,
}

impl Default for DetectionPolicy {
    fn default() -> Self {
        Self::conjunctive()
    }
}

impl DetectionPolicy {
    /// Both tests must agree: |z| > 1.5 and 10% contamination
    pub const fn conjunctive() -> Self {
        Self {
            combination: CombinationRule::And,
            zscore_threshold: 1.5,
            contamination: 0.10,
            random_state: IsolationForest::DEFAULT_RANDOM_STATE,
        }
    }

    /// Either test suffices: |z| > 25 and 5% contamination
    pub const fn disjunctive() -> Self {
        Self {
            combination: CombinationRule::Or,
            zscore_threshold: 25.0,
            contamination: 0.05,
            random_state: IsolationForest::DEFAULT_RANDOM_STATE,
        }
    }

    pub fn validate(&self) -> Result<(), DetectionError> {
        if !self.zscore_threshold.is_finite() || self.zscore_threshold <= 0.0 {
            return Err(DetectionError::InvalidPolicy {
                field: "zscore_threshold",
                value: self.zscore_threshold,
                reason: "must be finite and positive",
            });
        }
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(DetectionError::InvalidPolicy {
                field: "contamination",
                value: self.contamination,
                reason: "must be in (0, 0.5]",
            });
        }
        Ok(())
    }

    /// The default model configured from this policy
    pub fn isolation_forest(&self) -> IsolationForest {
        IsolationForest::new(self.contamination).with_random_state(self.random_state)
    }
}

pub struct AnomalyDetector<M = IsolationForest> {
    policy: DetectionPolicy,
    model: M,
}

impl AnomalyDetector<IsolationForest> {
    pub fn new(policy: DetectionPolicy) -> Result<Self, DetectionError> {
        let model = policy.isolation_forest();
        Self::with_model(policy, model)
    }
}

impl<M: OutlierModel> AnomalyDetector<M> {
    /// Use a custom outlier model; the policy's contamination is not passed to it.
    pub fn with_model(policy: DetectionPolicy, model: M) -> Result<Self, DetectionError> {
        policy.validate()?;
        Ok(Self { policy, model })
    }

    /// Flag anomalous debits among `transactions`.
    ///
    /// Credits are ignored. An empty or all-credit input yields an empty
    /// report, as does a debit set with zero variance under `AND`.
    pub fn detect(&self, transactions: &[Transaction]) -> Result<AnomalyReport, DetectionError> {
        let debits: Vec<&Transaction> = transactions.iter().filter(|t| t.is_debit()).collect();
        if debits.is_empty() {
            tracing::debug!("no debit transactions, skipping detection");
            return Ok(AnomalyReport::default());
        }

        let amounts: Vec<f64> = debits.iter().map(|t| t.amount).collect();
        let scores = zscores(&amounts);
        let zscore_flags = zscore::flag(
            scores.as_deref(),
            amounts.len(),
            self.policy.zscore_threshold,
        );

        let model_flags = self.model.fit_predict(&amounts)?;
        if model_flags.len() != amounts.len() {
            return Err(DetectionError::ModelOutputMismatch {
                expected: amounts.len(),
                actual: model_flags.len(),
            });
        }

        let mut anomalies: Vec<Anomaly> = debits
            .iter()
            .enumerate()
            .filter(|&(i, _)| {
                self.policy
                    .combination
                    .combine(zscore_flags[i], model_flags[i])
            })
            .map(|(i, txn)| {
                let mut reason = Vec::with_capacity(2);
                if zscore_flags[i] {
                    reason.push(AnomalyReason::ZScore);
                }
                if model_flags[i] {
                    reason.push(AnomalyReason::IsolationForest);
                }
                Anomaly {
                    date: txn.date,
                    amount: txn.amount,
                    description: txn.description.clone(),
                    bank: txn.bank.clone(),
                    reason,
                    zscore: scores.as_ref().map(|s| s[i]),
                }
            })
            .collect();

        anomalies.sort_by(|a, b| b.amount.total_cmp(&a.amount));

        tracing::debug!(
            debits = amounts.len(),
            zscore_hits = zscore_flags.iter().filter(|f| **f).count(),
            model_hits = model_flags.iter().filter(|f| **f).count(),
            anomalies = anomalies.len(),
            combination = ?self.policy.combination,
            "anomaly detection complete"
        );

        Ok(AnomalyReport::new(anomalies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let and = DetectionPolicy::default();
        assert_eq!(and.combination, CombinationRule::And);
        assert_eq!(and.zscore_threshold, 1.5);
        assert_eq!(and.contamination, 0.10);

        let or = DetectionPolicy::disjunctive();
        assert_eq!(or.combination, CombinationRule::Or);
        assert_eq!(or.zscore_threshold, 25.0);
        assert_eq!(or.contamination, 0.05);
    }

    #[test]
    fn test_combination_rules() {
        assert!(CombinationRule::And.combine(true, true));
        assert!(!CombinationRule::And.combine(true, false));
        assert!(CombinationRule::Or.combine(false, true));
        assert!(!CombinationRule::Or.combine(false, false));
    }

    #[test]
    fn test_policy_validation() {
        let mut policy = DetectionPolicy::default();
        policy.zscore_threshold = -1.0;
        assert!(AnomalyDetector::new(policy).is_err());

        let mut policy = DetectionPolicy::default();
        policy.contamination = 0.75;
        assert!(matches!(
            policy.validate(),
            Err(DetectionError::InvalidPolicy {
                field: "contamination",
                ..
            })
        ));
    }

    #[test]
    fn test_policy_deserializes_with_defaults() {
        let policy: DetectionPolicy =
            serde_json::from_str(r#"{"combination": "OR", "zscore_threshold": 3.0}"#).unwrap();
        assert_eq!(policy.combination, CombinationRule::Or);
        assert_eq!(policy.zscore_threshold, 3.0);
        assert_eq!(policy.contamination, 0.10);
    }
}
