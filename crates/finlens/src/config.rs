//! CLI configuration
//!
//! Settings live in a YAML file (`<data dir>/config.yaml` unless `--config`
//! points elsewhere). Every field has a default, so a missing file or a
//! partial file is fine. Command-line flags are applied on top through
//! [`Overrides`].

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use finlens_core::{DetectionPolicy, MonteCarloConfig, ProjectionParams, ScenarioAssumptions};
use serde::{Deserialize, Serialize};

use crate::util::io::atomic_write;

pub const CONFIG_FILE: &str = "config.yaml";

const DEFAULT_OBSERVATION_MONTHS: NonZeroU32 = NonZeroU32::new(6).unwrap();

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Serialize(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::Serialize(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CashFlowSettings {
    pub observation_months: NonZeroU32,
}

impl Default for CashFlowSettings {
    fn default() -> Self {
        Self {
            observation_months: DEFAULT_OBSERVATION_MONTHS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub detection: DetectionPolicy,
    pub monte_carlo: MonteCarloConfig,
    pub scenario: ScenarioAssumptions,
    pub cash_flow: CashFlowSettings,
}

impl Settings {
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    /// Load settings from `path`, or defaults if the file does not exist.
    ///
    /// Unlike a missing file, an unreadable or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read config: {e}")))?;

        serde_saphyr::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {e}")))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let yaml = serde_saphyr::to_string(self)
            .map_err(|e| ConfigError::Serialize(format!("Failed to serialize config: {e}")))?;

        atomic_write(path, &yaml)
            .map_err(|e| ConfigError::Io(format!("Failed to write config: {e}")))
    }

    pub fn projection_params(&self) -> ProjectionParams {
        ProjectionParams {
            monte_carlo: self.monte_carlo.clone(),
            scenario: self.scenario,
        }
    }

    /// Apply command-line overrides; unset flags keep the configured value
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(preset) = overrides.policy {
            let random_state = self.detection.random_state;
            self.detection = preset.policy();
            self.detection.random_state = random_state;
        }
        if let Some(threshold) = overrides.threshold {
            self.detection.zscore_threshold = threshold;
        }
        if let Some(contamination) = overrides.contamination {
            self.detection.contamination = contamination;
        }
        if let Some(months) = overrides.months {
            self.cash_flow.observation_months = months;
        }
        if let Some(years) = overrides.years {
            self.monte_carlo.years = years;
            self.scenario.years = years;
        }
        if let Some(simulations) = overrides.simulations {
            self.monte_carlo.simulations = simulations;
        }
        if let Some(seed) = overrides.seed {
            self.monte_carlo.seed = seed;
        }
    }
}

/// Detection preset selected with `--policy`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyPreset {
    /// Both tests must agree (|z| > 1.5, 10% contamination)
    And,
    /// Either test suffices (|z| > 25, 5% contamination)
    Or,
}

impl PolicyPreset {
    pub fn policy(self) -> DetectionPolicy {
        match self {
            PolicyPreset::And => DetectionPolicy::conjunctive(),
            PolicyPreset::Or => DetectionPolicy::disjunctive(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub policy: Option<PolicyPreset>,
    pub threshold: Option<f64>,
    pub contamination: Option<f64>,
    pub months: Option<NonZeroU32>,
    pub years: Option<usize>,
    pub simulations: Option<usize>,
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use finlens_core::CombinationRule;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load(&Settings::path(dir.path())).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.cash_flow.observation_months.get(), 6);
        assert_eq!(settings.detection.combination, CombinationRule::And);
        assert_eq!(settings.monte_carlo.simulations, 1000);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = Settings::path(dir.path());
        std::fs::write(
            &path,
            "detection:\n  combination: OR\n  zscore_threshold: 3.0\nmonte_carlo:\n  years: 20\n",
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings.detection.combination, CombinationRule::Or);
        assert_eq!(settings.detection.zscore_threshold, 3.0);
        assert_eq!(settings.detection.contamination, 0.10);
        assert_eq!(settings.monte_carlo.years, 20);
        assert_eq!(settings.monte_carlo.simulations, 1000);
        assert_eq!(settings.scenario, ScenarioAssumptions::default());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = Settings::path(dir.path());
        std::fs::write(&path, "cash_flow:\n  observation_months: 0\n").unwrap();

        assert!(matches!(Settings::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = Settings::path(dir.path());

        let mut settings = Settings::default();
        settings.monte_carlo.annual_loan_payment = Some(150_000.0);
        settings.scenario.loan_prepayment = 25_000.0;
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_overrides() {
        let mut settings = Settings::default();
        settings.detection.random_state = 7;

        settings.apply(&Overrides {
            policy: Some(PolicyPreset::Or),
            contamination: Some(0.2),
            years: Some(15),
            seed: Some(99),
            ..Default::default()
        });

        assert_eq!(settings.detection.combination, CombinationRule::Or);
        assert_eq!(settings.detection.zscore_threshold, 25.0);
        assert_eq!(settings.detection.contamination, 0.2);
        assert_eq!(settings.detection.random_state, 7);
        assert_eq!(settings.monte_carlo.years, 15);
        assert_eq!(settings.scenario.years, 15);
        assert_eq!(settings.monte_carlo.seed, 99);
        assert_eq!(settings.monte_carlo.simulations, 1000);
    }
}
