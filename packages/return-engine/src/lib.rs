//! Return Engine - Money-weighted portfolio returns.
//!
//! This crate computes the headline return figures for a brokerage portfolio:
//!
//! - **XIRR**: annualized internal rate of return for irregular, dated cashflows
//! - **Year-to-date**: XIRR over the current calendar year's activity
//! - **Total return**: current value over cost basis
//! - **Portfolio metrics**: all of the above assembled from transactions and holdings
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use return_engine::{xirr, Cashflow};
//!
//! let flows = [
//!     Cashflow::new(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), -1000.0),
//!     Cashflow::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 1100.0),
//! ];
//!
//! let rate = xirr(&flows).unwrap();
//! assert!((rate - 10.0).abs() < 0.01);
//! ```

pub mod config;
pub mod ledger;
pub mod portfolio;
pub mod returns;
pub mod types;

// Re-export commonly used types
pub use types::{ApiResponse, Cashflow, Holding, Transaction, TransactionKind};

// Re-export main functionality
pub use config::{Config, SolverConfig};
pub use ledger::Ledger;
pub use portfolio::{
    holding_allocations, holding_period_months, HoldingAllocation, MetricsSummary,
    PortfolioMetrics,
};
pub use returns::{
    calculate_total_return, calculate_ytd, calculate_ytd_with, xirr, XirrError, XirrSolver,
    YtdReturn,
};

/// Error types for return-engine operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Xirr(#[from] XirrError),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for return-engine operations.
pub type Result<T> = std::result::Result<T, Error>;
