//! Output rendering
//!
//! JSON output is the core's records serialized as-is. The text format is a
//! compact human-readable view of the same data.

use std::fmt;

use clap::ValueEnum;
use finlens_core::model::{FinancialSummary, ProjectionPath};
use finlens_core::{AnomalyReport, WealthProjection};

use crate::util::format::{format_amount, format_amount_short, format_compact, format_percent};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone)]
pub enum Report {
    Anomalies(AnomalyReport),
    Summary(FinancialSummary),
    Projection(WealthProjection),
}

impl Report {
    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Json => {
                let mut json = match self {
                    Report::Anomalies(r) => serde_json::to_string_pretty(r)?,
                    Report::Summary(s) => serde_json::to_string_pretty(s)?,
                    Report::Projection(p) => serde_json::to_string_pretty(p)?,
                };
                json.push('\n');
                Ok(json)
            }
            OutputFormat::Text => Ok(self.to_string()),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Anomalies(report) => write_anomalies(f, report),
            Report::Summary(summary) => write_summary(f, summary),
            Report::Projection(projection) => write_projection(f, projection),
        }
    }
}

fn write_anomalies(f: &mut fmt::Formatter<'_>, report: &AnomalyReport) -> fmt::Result {
    writeln!(f, "Anomalies: {}", report.count)?;
    for anomaly in &report.anomalies {
        writeln!(
            f,
            "  {}  {:<12} {:>14}  {}",
            anomaly.date.strftime("%Y-%m-%d"),
            anomaly.bank,
            format_amount(anomaly.amount),
            anomaly.description
        )?;
        match anomaly.zscore {
            Some(z) => writeln!(f, "      {} (z = {z:.2})", anomaly.reason_text())?,
            None => writeln!(f, "      {}", anomaly.reason_text())?,
        }
    }
    Ok(())
}

fn write_summary(f: &mut fmt::Formatter<'_>, summary: &FinancialSummary) -> fmt::Result {
    let nw = &summary.net_worth_snapshot;
    writeln!(f, "Net worth")?;
    writeln!(f, "  {:<22}{:>16}", "Bank balance", format_amount(nw.bank_balance))?;
    writeln!(f, "  {:<22}{:>16}", "Mutual funds", format_amount(nw.mutual_funds_value))?;
    writeln!(f, "  {:<22}{:>16}", "Stocks", format_amount(nw.stocks_value))?;
    writeln!(f, "  {:<22}{:>16}", "Loans outstanding", format_amount(-nw.loan_outstanding))?;
    writeln!(f, "  {:<22}{:>16}", "Net worth", format_amount(nw.net_worth))?;

    let cf = &summary.cash_flow;
    writeln!(f)?;
    writeln!(f, "Cash flow ({} months)", cf.observation_months)?;
    writeln!(f, "  {:<22}{:>16}", "Monthly income", format_amount(cf.monthly_income))?;
    writeln!(f, "  {:<22}{:>16}", "Monthly expense", format_amount(cf.monthly_expense))?;
    writeln!(f, "  {:<22}{:>16}", "Monthly EMI", format_amount(cf.total_monthly_emi))?;
    writeln!(f, "  {:<22}{:>16}", "Savings rate", format_percent(cf.savings_rate))?;
    writeln!(f, "  {:<22}{:>16}", "Debt-to-income", format_percent(cf.monthly_dti))?;

    let holdings = &summary.holdings;
    let shares = holdings.allocation.percentages();
    writeln!(f)?;
    writeln!(f, "Allocation")?;
    writeln!(f, "  {:<22}{:>16}", "Mutual funds", format_percent(shares.mutual_funds))?;
    writeln!(f, "  {:<22}{:>16}", "Stocks", format_percent(shares.stocks))?;
    writeln!(f, "  {:<22}{:>16}", "Cash", format_percent(shares.cash))?;

    let cover = &holdings.insurance;
    writeln!(f)?;
    writeln!(f, "Insurance")?;
    writeln!(f, "  {:<22}{:>16}", "Life cover", format_compact(cover.life_cover))?;
    writeln!(f, "  {:<22}{:>16}", "Health cover", format_compact(cover.health_cover))?;
    if cover.other_cover > 0.0 {
        writeln!(f, "  {:<22}{:>16}", "Other cover", format_compact(cover.other_cover))?;
    }
    writeln!(f, "  {:<22}{:>16}", "Annual premium", format_amount(cover.annual_premium))?;

    if !holdings.stock_gains.is_empty() {
        writeln!(f)?;
        writeln!(f, "Stocks")?;
        for stock in &holdings.stock_gains {
            let gain = stock
                .unrealized_gain
                .map(format_amount)
                .unwrap_or_else(|| "n/a".to_string());
            writeln!(
                f,
                "  {:<22}{:>16}  gain {gain}",
                stock.symbol,
                format_amount(stock.market_value)
            )?;
        }
    }

    if let Some(score) = holdings.credit_score {
        writeln!(f)?;
        writeln!(
            f,
            "Credit score: {:.0} ({:+.0} over {} reports)",
            score.latest, score.change, score.observations
        )?;
    }

    if !holdings.spending_by_category.is_empty() {
        let mut categories: Vec<_> = holdings.spending_by_category.iter().collect();
        categories.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));

        writeln!(f)?;
        writeln!(f, "Spending by category")?;
        for (category, total) in categories {
            writeln!(f, "  {:<22}{:>16}", category, format_amount(*total))?;
        }
    }

    if summary.skipped_transactions > 0 {
        writeln!(f)?;
        writeln!(
            f,
            "Skipped {} malformed transactions",
            summary.skipped_transactions
        )?;
    }
    Ok(())
}

fn write_projection(f: &mut fmt::Formatter<'_>, projection: &WealthProjection) -> fmt::Result {
    let nw = &projection.net_worth_snapshot;
    writeln!(f, "Net worth today: {}", format_amount(nw.net_worth))?;

    let mc = &projection.monte_carlo;
    let (simulations, points) = mc.shape();
    writeln!(f)?;
    writeln!(
        f,
        "Monte Carlo net asset value ({simulations} paths, seed {})",
        mc.seed
    )?;
    write!(f, "  {:>4}", "Year")?;
    for band in &mc.bands {
        write!(f, "{:>14}", format!("P{:.0}", band.percentile * 100.0))?;
    }
    writeln!(f)?;
    for year in 0..points {
        write!(f, "  {year:>4}")?;
        for band in &mc.bands {
            let value = band.values.get(year).copied().unwrap_or(0.0);
            write!(f, "{:>14}", format_amount_short(value))?;
        }
        writeln!(f)?;
    }

    writeln!(f)?;
    writeln!(f, "Scenario")?;
    write_path(f, &projection.deterministic_path)
}

fn write_path(f: &mut fmt::Formatter<'_>, path: &ProjectionPath) -> fmt::Result {
    writeln!(
        f,
        "  {:>4}{:>14}{:>14}{:>14}{:>14}",
        "Year", "Net worth", "Mutual funds", "Stocks", "Loan"
    )?;
    for year in 0..path.len() {
        writeln!(
            f,
            "  {year:>4}{:>14}{:>14}{:>14}{:>14}",
            format_amount_short(path.net_worth[year]),
            format_amount_short(path.mutual_funds[year]),
            format_amount_short(path.stocks[year]),
            format_amount_short(path.loan_balance[year]),
        )?;
    }
    if let Some(growth) = path.growth_percent() {
        writeln!(f, "  Growth over period: {}", format_percent(growth))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use finlens_core::{FinancialDocument, ProjectionParams, detect_anomalies, project_wealth};
    use serde_json::json;

    fn document() -> FinancialDocument {
        let mut transactions: Vec<_> = (1..=4)
            .map(|day| {
                json!({"date": format!("2024-03-0{day}"), "type": "debit", "amount": 100, "description": "Coffee"})
            })
            .collect();
        transactions.push(json!({"date": "2024-03-09", "type": "debit", "amount": 9000, "description": "Laptop"}));

        FinancialDocument::from_value(json!({
            "banks": [{"bankName": "HDFC", "balance": 1000, "transactions": transactions}],
            "mutualFunds": [{"units": 10, "nav": 5}],
            "stocks": [{"symbol": "INFY", "quantity": 2, "currentPrice": 100}],
            "loans": [{"monthlyEMI": 10, "outstandingAmount": 300}]
        }))
        .unwrap()
    }

    #[test]
    fn test_anomaly_text() {
        let report = Report::Anomalies(detect_anomalies(&document()).unwrap());
        let text = report.render(OutputFormat::Text).unwrap();

        assert!(text.starts_with("Anomalies: 1\n"));
        assert!(text.contains("2024-03-09"));
        assert!(text.contains("9,000.00"));
        assert!(text.contains("Laptop"));
        assert!(text.contains("(z = 2.00)"));
    }

    #[test]
    fn test_json_is_core_record() {
        let report = Report::Anomalies(detect_anomalies(&document()).unwrap());
        let json = report.render(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["count"], 1);
        assert_eq!(value["anomalies"][0]["amount"], 9000.0);
    }

    #[test]
    fn test_projection_text_has_every_year() {
        let mut params = ProjectionParams::default();
        params.monte_carlo.years = 3;
        params.monte_carlo.simulations = 20;
        params.scenario.years = 3;

        let report = Report::Projection(project_wealth(&document(), &params).unwrap());
        let text = report.render(OutputFormat::Text).unwrap();

        assert!(text.contains("Net worth today: 950.00"));
        assert!(text.contains("20 paths, seed 42"));
        assert!(text.contains("P10"));
        assert!(text.contains("P90"));
        assert!(text.contains("Growth over period"));
    }
}
