//! Single-scenario projection under fixed growth assumptions

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;
use crate::model::ProjectionPath;

use super::{PortfolioStart, require_finite, require_fraction, require_non_negative, require_years};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioAssumptions {
    pub years: usize,
    pub mutual_fund_growth_rate: f64,
    pub stock_growth_rate: f64,
    /// Extra investment per month, split by `mutual_fund_share`
    pub monthly_investment: f64,
    /// One-time payment taken off the loan before year 1
    pub loan_prepayment: f64,
    pub mutual_fund_share: f64,
}

impl Default for ScenarioAssumptions {
    fn default() -> Self {
        Self {
            years: 10,
            mutual_fund_growth_rate: 0.10,
            stock_growth_rate: 0.177,
            monthly_investment: 5_000.0,
            loan_prepayment: 0.0,
            mutual_fund_share: 0.6,
        }
    }
}

impl ScenarioAssumptions {
    pub fn validate(&self) -> Result<(), ParameterError> {
        require_years(self.years)?;
        for (name, rate) in [
            ("mutual_fund_growth_rate", self.mutual_fund_growth_rate),
            ("stock_growth_rate", self.stock_growth_rate),
        ] {
            require_finite(name, rate)?;
            if rate < -1.0 {
                return Err(ParameterError::new(name, rate, "cannot lose more than 100%"));
            }
        }
        require_finite("monthly_investment", self.monthly_investment)?;
        require_non_negative("loan_prepayment", self.loan_prepayment)?;
        require_fraction("mutual_fund_share", self.mutual_fund_share)?;
        Ok(())
    }
}

/// Project one path under `assumptions`.
///
/// Year 0 is today's net worth. Each following year both holdings grow by
/// their own rate and receive their share of twelve months of investment;
/// the loan shrinks by twelve EMIs, floored at zero. Bank balance stays
/// constant.
pub fn project_scenario(
    start: &PortfolioStart,
    assumptions: &ScenarioAssumptions,
) -> Result<ProjectionPath, ParameterError> {
    assumptions.validate()?;
    require_non_negative("monthly_emi", start.monthly_emi)?;

    let annual_investment = assumptions.monthly_investment * 12.0;
    let mf_contribution = annual_investment * assumptions.mutual_fund_share;
    let stock_contribution = annual_investment * (1.0 - assumptions.mutual_fund_share);
    let annual_emi = start.annual_emi();

    let mut mf = start.mutual_funds;
    let mut stock = start.stocks;
    let mut loan = start.loan_outstanding;

    let mut path = ProjectionPath::with_capacity(assumptions.years);
    path.push(start.net_worth(), mf, stock, loan);

    loan = (loan - assumptions.loan_prepayment).max(0.0);
    for _ in 0..assumptions.years {
        mf += mf * assumptions.mutual_fund_growth_rate + mf_contribution;
        stock += stock * assumptions.stock_growth_rate + stock_contribution;
        loan = (loan - annual_emi).max(0.0);

        path.push(start.bank_balance + mf + stock - loan, mf, stock, loan);
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> PortfolioStart {
        PortfolioStart {
            bank_balance: 1_000.0,
            mutual_funds: 50.0,
            stocks: 200.0,
            loan_outstanding: 300.0,
            monthly_emi: 10.0,
        }
    }

    #[test]
    fn test_year_zero_is_current_net_worth() {
        let path = project_scenario(&start(), &ScenarioAssumptions::default()).unwrap();
        assert_eq!(path.len(), 11);
        assert_eq!(path.net_worth[0], 950.0);
    }

    #[test]
    fn test_reinvestment_split() {
        let assumptions = ScenarioAssumptions {
            years: 1,
            mutual_fund_growth_rate: 0.10,
            stock_growth_rate: 0.20,
            monthly_investment: 100.0,
            ..Default::default()
        };
        let path = project_scenario(&start(), &assumptions).unwrap();

        // mf: 50 + 5 + 720; stock: 200 + 40 + 480; loan: 300 - 120
        assert!((path.mutual_funds[1] - 775.0).abs() < 1e-9);
        assert!((path.stocks[1] - 720.0).abs() < 1e-9);
        assert_eq!(path.loan_balance[1], 180.0);
        assert!((path.net_worth[1] - (1_000.0 + 775.0 + 720.0 - 180.0)).abs() < 1e-9);
    }

    #[test]
    fn test_prepayment_reduces_loan_before_year_one() {
        let assumptions = ScenarioAssumptions {
            years: 1,
            loan_prepayment: 250.0,
            ..Default::default()
        };
        let path = project_scenario(&start(), &assumptions).unwrap();
        assert_eq!(path.loan_balance[0], 300.0);
        assert_eq!(path.loan_balance[1], 0.0);
    }

    #[test]
    fn test_rejects_invalid_assumptions() {
        let zero_years = ScenarioAssumptions {
            years: 0,
            ..Default::default()
        };
        assert_eq!(
            project_scenario(&start(), &zero_years).unwrap_err().parameter,
            "years"
        );

        let too_long = ScenarioAssumptions {
            years: usize::MAX,
            ..Default::default()
        };
        let err = project_scenario(&start(), &too_long).unwrap_err();
        assert_eq!(err.parameter, "years");
        assert_eq!(err.reason, "must be between 1 and 200");

        let negative_prepay = ScenarioAssumptions {
            loan_prepayment: -5.0,
            ..Default::default()
        };
        assert!(project_scenario(&start(), &negative_prepay).is_err());

        let wipeout = ScenarioAssumptions {
            stock_growth_rate: -1.5,
            ..Default::default()
        };
        assert!(wipeout.validate().is_err());
    }
}
