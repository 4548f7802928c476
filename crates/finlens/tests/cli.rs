//! End-to-end runs of the `finlens` binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

const DOCUMENT: &str = r#"{
  "financial_data": {
    "banks": [{
      "bankName": "HDFC",
      "balance": "1000",
      "transactions": [
        {"date": "2024-03-01", "type": "DEBIT", "amount": "100", "description": "Coffee"},
        {"date": "2024-03-02", "type": "DEBIT", "amount": "100", "description": "Coffee"},
        {"date": "2024-03-03", "type": "DEBIT", "amount": "100", "description": "Coffee"},
        {"date": "2024-03-04", "type": "DEBIT", "amount": "100", "description": "Coffee"},
        {"date": "2024-03-05", "type": "DEBIT", "amount": "9000", "description": "Laptop"},
        {"date": "2024-03-06", "type": "CREDIT", "amount": "60000", "description": "Salary"}
      ]
    }],
    "mutualFunds": [{"units": 10, "nav": 5}],
    "stocks": [{"symbol": "INFY", "quantity": 2, "currentPrice": 100}],
    "loans": [{"monthlyEMI": 10, "outstandingAmount": 300}]
  }
}"#;

fn finlens(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_finlens"))
        .args(args)
        .arg("--data-dir")
        .arg(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_anomalies_to_file() {
    let dir = tempdir().unwrap();
    let doc = dir.path().join("doc.json");
    let out = dir.path().join("reports").join("anomalies.json");
    fs::write(&doc, DOCUMENT).unwrap();

    let result = finlens(
        dir.path(),
        &["anomalies", doc.to_str().unwrap(), "--output", out.to_str().unwrap()],
    );
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["count"], 1);
    assert_eq!(value["anomalies"][0]["description"], "Laptop");
}

#[test]
fn test_summary_uses_config_file() {
    let dir = tempdir().unwrap();
    let doc = dir.path().join("doc.json");
    fs::write(&doc, DOCUMENT).unwrap();
    fs::write(
        dir.path().join("config.yaml"),
        "cash_flow:\n  observation_months: 3\n",
    )
    .unwrap();

    let result = finlens(dir.path(), &["summary", doc.to_str().unwrap()]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let value: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(value["cashFlow"]["observationMonths"], 3);
    assert_eq!(value["cashFlow"]["monthlyIncome"], 20000.0);
    assert_eq!(value["netWorthSnapshot"]["netWorth"], 950.0);
}

#[test]
fn test_invalid_parameters_fail() {
    let dir = tempdir().unwrap();
    let doc = dir.path().join("doc.json");
    fs::write(&doc, DOCUMENT).unwrap();

    let result = finlens(dir.path(), &["project", doc.to_str().unwrap(), "--years", "0"]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("years"));
}

#[test]
fn test_missing_banks_fails() {
    let dir = tempdir().unwrap();
    let doc = dir.path().join("doc.json");
    fs::write(&doc, r#"{"stocks": []}"#).unwrap();

    let result = finlens(dir.path(), &["anomalies", doc.to_str().unwrap()]);
    assert!(!result.status.success());
}
