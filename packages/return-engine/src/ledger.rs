//! Transaction and holding snapshots loaded from JSON.

use crate::portfolio::PortfolioMetrics;
use crate::returns::XirrSolver;
use crate::types::{Holding, Transaction};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A point-in-time snapshot of a portfolio's transactions and holdings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Ledger {
    /// Transaction history, any order
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Current holdings
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

impl Ledger {
    /// Create a ledger from transactions and holdings.
    pub fn new(transactions: Vec<Transaction>, holdings: Vec<Holding>) -> Self {
        Self {
            transactions,
            holdings,
        }
    }

    /// Load and validate a ledger from a JSON file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let ledger = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            transactions = ledger.transactions.len(),
            holdings = ledger.holdings.len(),
            "loaded ledger"
        );
        Ok(ledger)
    }

    /// Parse and validate a ledger from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        let data: serde_json::Value = serde_json::from_str(content)?;

        // Handle legacy format (list of transactions)
        let ledger = if data.is_array() {
            Self {
                transactions: serde_json::from_value(data)?,
                holdings: Vec::new(),
            }
        } else {
            serde_json::from_value(data)?
        };

        ledger.validate()?;
        Ok(ledger)
    }

    /// Reject records whose numbers cannot take part in a calculation.
    pub fn validate(&self) -> Result<()> {
        for (idx, tx) in self.transactions.iter().enumerate() {
            if !tx.amount.is_finite() {
                return Err(Error::InvalidRecord(format!(
                    "transaction {} on {} has non-finite amount",
                    idx, tx.date
                )));
            }
        }

        for holding in &self.holdings {
            let fields = [
                ("quantity", holding.quantity),
                ("institution_price", holding.institution_price),
                ("cost_basis", holding.cost_basis_or_zero()),
            ];
            if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
                return Err(Error::InvalidRecord(format!(
                    "holding {} has non-finite {}",
                    holding.label(),
                    name
                )));
            }
        }

        Ok(())
    }

    /// Buy and sell transactions only.
    pub fn trades(&self) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|tx| tx.kind.is_trade())
            .copied()
            .collect()
    }

    /// Date of the earliest transaction of any kind.
    pub fn first_transaction_date(&self) -> Option<NaiveDate> {
        self.transactions.iter().map(|tx| tx.date).min()
    }

    /// Calculate portfolio metrics for this snapshot.
    pub fn metrics(&self, solver: &XirrSolver, as_of: NaiveDate) -> PortfolioMetrics {
        PortfolioMetrics::calculate_with(solver, &self.transactions, &self.holdings, as_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const SAMPLE: &str = r#"{
        "transactions": [
            {"date": "2024-02-01", "amount": 1500.0, "type": "buy"},
            {"date": "2023-11-20", "amount": 12.5, "type": "fee"},
            {"date": "2024-09-15", "amount": -400.0, "type": "sell"}
        ],
        "holdings": [
            {"ticker": "VTI", "quantity": 5.0, "institution_price": 280.0, "cost_basis": 1100.0}
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let ledger = Ledger::from_json(SAMPLE).unwrap();
        assert_eq!(ledger.transactions.len(), 3);
        assert_eq!(ledger.holdings.len(), 1);
        assert_eq!(ledger.trades().len(), 2);
        assert_eq!(ledger.first_transaction_date(), Some(date(2023, 11, 20)));
    }

    #[test]
    fn test_legacy_array_format() {
        let json = r#"[{"date": "2024-02-01", "amount": 1500.0, "type": "buy"}]"#;
        let ledger = Ledger::from_json(json).unwrap();
        assert_eq!(ledger.transactions.len(), 1);
        assert_eq!(ledger.transactions[0].kind, TransactionKind::Buy);
        assert!(ledger.holdings.is_empty());
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let ledger = Ledger::new(
            vec![Transaction::buy(date(2024, 1, 1), f64::NAN)],
            Vec::new(),
        );
        assert!(matches!(ledger.validate(), Err(Error::InvalidRecord(_))));

        let ledger = Ledger::new(
            Vec::new(),
            vec![Holding::new("VTI", 1.0, f64::INFINITY, 100.0)],
        );
        let err = ledger.validate().unwrap_err();
        assert!(err.to_string().contains("institution_price"));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(Ledger::from_json("{not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, SAMPLE).unwrap();

        let ledger = Ledger::load_from_path(&path).unwrap();
        assert_eq!(ledger, Ledger::from_json(SAMPLE).unwrap());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = Ledger::load_from_path(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_ledger_metrics() {
        let ledger = Ledger::from_json(SAMPLE).unwrap();
        let metrics = ledger.metrics(&XirrSolver::default(), date(2025, 2, 1));

        assert_eq!(metrics.current_value, 1400.0);
        assert_eq!(metrics.total_cost_basis, 1100.0);
        assert!(metrics.xirr_percent.is_some());
        assert_eq!(metrics.first_transaction_date, Some(date(2023, 11, 20)));
    }
}
