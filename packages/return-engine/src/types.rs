//! Core data types for the return engine.

use crate::Error;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A dated, signed movement of capital.
///
/// Negative amounts are outflows (purchases, contributions); positive amounts
/// are inflows (sales, withdrawals, or a closing valuation treated as a
/// hypothetical liquidation).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Cashflow {
    /// Calendar date of the movement
    pub date: NaiveDate,
    /// Signed amount (negative = invested, positive = returned)
    pub amount: f64,
}

impl Cashflow {
    /// Create a new cashflow.
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }
}

/// Parses `YYYY-MM-DD:AMOUNT`, e.g. `2024-01-15:-1000`.
impl FromStr for Cashflow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (date, amount) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidInput(format!("expected DATE:AMOUNT, got '{}'", s)))?;

        let date = date
            .trim()
            .parse::<NaiveDate>()
            .map_err(|e| Error::InvalidInput(format!("bad date '{}': {}", date, e)))?;
        let amount = amount
            .trim()
            .parse::<f64>()
            .map_err(|e| Error::InvalidInput(format!("bad amount '{}': {}", amount, e)))?;

        if !amount.is_finite() {
            return Err(Error::InvalidInput(format!("amount must be finite, got {}", amount)));
        }

        Ok(Self::new(date, amount))
    }
}

/// Kind of a brokerage transaction as reported by the aggregation API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Buy,
    Sell,
    Cash,
    Fee,
    Transfer,
    Cancel,
    #[serde(other)]
    Other,
}

impl TransactionKind {
    /// Whether this kind moves capital into or out of a position.
    pub fn is_trade(self) -> bool {
        matches!(self, TransactionKind::Buy | TransactionKind::Sell)
    }
}

/// A single brokerage transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Trade date
    pub date: NaiveDate,
    /// Amount in the aggregation API convention: positive = cash invested,
    /// negative = cash returned
    pub amount: f64,
    /// Transaction kind
    #[serde(rename = "type", alias = "kind")]
    pub kind: TransactionKind,
}

impl Transaction {
    /// Create a new transaction.
    pub fn new(date: NaiveDate, amount: f64, kind: TransactionKind) -> Self {
        Self { date, amount, kind }
    }

    /// Shorthand for a purchase of `amount`.
    pub fn buy(date: NaiveDate, amount: f64) -> Self {
        Self::new(date, amount, TransactionKind::Buy)
    }

    /// Shorthand for a sale returning `proceeds` (stored negated).
    pub fn sell(date: NaiveDate, proceeds: f64) -> Self {
        Self::new(date, -proceeds, TransactionKind::Sell)
    }

    /// Convert into the engine's sign convention.
    pub fn to_cashflow(&self) -> Cashflow {
        Cashflow::new(self.date, -self.amount)
    }
}

/// A security held in the portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Holding {
    /// Ticker symbol
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    /// ISIN, used when no ticker is available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isin: Option<String>,
    /// Security name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Number of units held
    pub quantity: f64,
    /// Latest price reported by the institution
    pub institution_price: f64,
    /// Recorded cost basis for the whole holding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_basis: Option<f64>,
}

impl Holding {
    /// Create a holding with quantity, price and cost basis.
    pub fn new(ticker: &str, quantity: f64, institution_price: f64, cost_basis: f64) -> Self {
        Self {
            ticker: Some(ticker.to_uppercase()),
            quantity,
            institution_price,
            cost_basis: Some(cost_basis),
            ..Default::default()
        }
    }

    /// Current market value (quantity * price).
    pub fn market_value(&self) -> f64 {
        self.quantity * self.institution_price
    }

    /// Cost basis, treating a missing value as zero.
    pub fn cost_basis_or_zero(&self) -> f64 {
        self.cost_basis.unwrap_or(0.0)
    }

    /// Display label: ticker, then ISIN, then `N/A`.
    pub fn label(&self) -> &str {
        self.ticker
            .as_deref()
            .or(self.isin.as_deref())
            .unwrap_or("N/A")
    }

    /// Display name, `Unknown` when absent.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }
}

/// API response wrapper used by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
