//! Monte Carlo wealth projection
//!
//! Each path draws independent annual returns for mutual funds and stocks
//! from normal distributions. New investment is split between the two
//! before that year's growth is applied, and the loan amortizes by a fixed
//! annual payment, floored at zero.
//!
//! Paths share no mutable state: per-path seeds are drawn up front from the
//! caller's RNG, so the result is identical whether paths run in parallel or
//! not.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng, distr::Distribution};
use rand_distr::Normal;
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::error::ParameterError;
use crate::model::{MonteCarloResult, PercentileBand, ProjectionPath};
use crate::stats::percentile_sorted;

use super::{
    MAX_PATH_POINTS, MAX_SIMULATIONS, PortfolioStart, require_finite, require_fraction,
    require_non_negative, require_years,
};

/// Normally distributed annual return
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnAssumption {
    pub mean: f64,
    pub std_dev: f64,
}

impl ReturnAssumption {
    pub const MUTUAL_FUNDS: ReturnAssumption = ReturnAssumption {
        mean: 0.10,
        std_dev: 0.05,
    };
    pub const STOCKS: ReturnAssumption = ReturnAssumption {
        mean: 0.12,
        std_dev: 0.08,
    };

    fn distribution(&self, parameter: &'static str) -> Result<Normal<f64>, ParameterError> {
        require_finite(parameter, self.mean)?;
        Normal::new(self.mean, self.std_dev).map_err(|_| {
            ParameterError::new(parameter, self.std_dev, "std_dev must be finite and non-negative")
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    pub years: usize,
    pub simulations: usize,
    pub annual_investment: f64,
    /// Fraction of new investment going to mutual funds; the rest buys stocks
    pub mutual_fund_share: f64,
    /// Fixed yearly loan reduction. `None` uses 12 x the document's total EMI.
    pub annual_loan_payment: Option<f64>,
    pub mutual_fund_return: ReturnAssumption,
    pub stock_return: ReturnAssumption,
    /// Percentile bands to extract, as fractions in [0, 1]
    pub percentiles: Vec<f64>,
    pub seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            years: 10,
            simulations: 1000,
            annual_investment: 60_000.0,
            mutual_fund_share: 0.6,
            annual_loan_payment: None,
            mutual_fund_return: ReturnAssumption::MUTUAL_FUNDS,
            stock_return: ReturnAssumption::STOCKS,
            percentiles: vec![0.10, 0.25, 0.50, 0.75, 0.90],
            seed: 42,
        }
    }
}

impl MonteCarloConfig {
    pub fn validate(&self) -> Result<(), ParameterError> {
        require_years(self.years)?;
        if !(1..=MAX_SIMULATIONS).contains(&self.simulations) {
            return Err(ParameterError::new(
                "simulations",
                self.simulations as f64,
                "must be between 1 and 100000",
            ));
        }
        if (self.years + 1).saturating_mul(self.simulations) > MAX_PATH_POINTS {
            return Err(ParameterError::new(
                "simulations",
                self.simulations as f64,
                "too many paths for this many years",
            ));
        }
        require_finite("annual_investment", self.annual_investment)?;
        require_fraction("mutual_fund_share", self.mutual_fund_share)?;
        if let Some(payment) = self.annual_loan_payment {
            require_non_negative("annual_loan_payment", payment)?;
        }
        for p in &self.percentiles {
            require_fraction("percentiles", *p)?;
        }
        self.mutual_fund_return.distribution("mutual_fund_return")?;
        self.stock_return.distribution("stock_return")?;
        Ok(())
    }

    fn loan_payment(&self, start: &PortfolioStart) -> f64 {
        self.annual_loan_payment.unwrap_or_else(|| start.annual_emi())
    }
}

/// Simulate `config.simulations` independent paths.
///
/// `rng` only seeds the paths; each path owns its own generator.
pub fn simulate_paths<R: Rng + ?Sized>(
    start: &PortfolioStart,
    config: &MonteCarloConfig,
    rng: &mut R,
) -> Result<Vec<ProjectionPath>, ParameterError> {
    config.validate()?;
    let mf_dist = config.mutual_fund_return.distribution("mutual_fund_return")?;
    let stock_dist = config.stock_return.distribution("stock_return")?;
    let loan_payment = config.loan_payment(start);
    require_non_negative("annual_loan_payment", loan_payment)?;

    let seeds: Vec<u64> = (0..config.simulations).map(|_| rng.next_u64()).collect();
    let simulate =
        |seed: u64| simulate_path(start, config, &mf_dist, &stock_dist, loan_payment, seed);

    #[cfg(feature = "parallel")]
    let paths = seeds.into_par_iter().map(simulate).collect();
    #[cfg(not(feature = "parallel"))]
    let paths = seeds.into_iter().map(simulate).collect();

    Ok(paths)
}

fn simulate_path(
    start: &PortfolioStart,
    config: &MonteCarloConfig,
    mf_dist: &Normal<f64>,
    stock_dist: &Normal<f64>,
    loan_payment: f64,
    seed: u64,
) -> ProjectionPath {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mf_contribution = config.annual_investment * config.mutual_fund_share;
    let stock_contribution = config.annual_investment * (1.0 - config.mutual_fund_share);

    let mut mf = start.mutual_funds;
    let mut stock = start.stocks;
    let mut loan = start.loan_outstanding;

    let mut path = ProjectionPath::with_capacity(config.years);
    path.push(mf + stock - loan, mf, stock, loan);

    for _ in 0..config.years {
        let mf_return = mf_dist.sample(&mut rng);
        let stock_return = stock_dist.sample(&mut rng);

        mf = (mf + mf_contribution) * (1.0 + mf_return);
        stock = (stock + stock_contribution) * (1.0 + stock_return);
        loan = (loan - loan_payment).max(0.0);

        path.push(mf + stock - loan, mf, stock, loan);
    }

    path
}

/// Per-year percentile of net worth across all paths.
///
/// Uses linear interpolation between the closest ranks.
pub fn percentile_bands(paths: &[ProjectionPath], percentiles: &[f64]) -> Vec<PercentileBand> {
    let points = paths.first().map(ProjectionPath::len).unwrap_or(0);
    let mut bands: Vec<PercentileBand> = percentiles
        .iter()
        .map(|&percentile| PercentileBand {
            percentile,
            values: Vec::with_capacity(points),
        })
        .collect();

    let mut column = Vec::with_capacity(paths.len());
    for year in 0..points {
        column.clear();
        column.extend(paths.iter().filter_map(|p| p.net_worth.get(year).copied()));
        column.sort_by(f64::total_cmp);

        for band in &mut bands {
            band.values
                .push(percentile_sorted(&column, band.percentile).unwrap_or(0.0));
        }
    }

    bands
}

/// Seed from `config.seed`, simulate, and extract percentile bands.
pub fn run(
    start: &PortfolioStart,
    config: &MonteCarloConfig,
) -> Result<MonteCarloResult, ParameterError> {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let paths = simulate_paths(start, config, &mut rng)?;
    let bands = percentile_bands(&paths, &config.percentiles);

    tracing::debug!(
        simulations = paths.len(),
        years = config.years,
        seed = config.seed,
        "monte carlo projection complete"
    );

    Ok(MonteCarloResult {
        paths,
        bands,
        seed: config.seed,
    })
}
