//! Year-to-date money-weighted return.

use super::solver::{XirrError, XirrSolver};
use crate::types::{Cashflow, Transaction};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Outcome of a year-to-date calculation.
///
/// Every variant collapses to a percentage through [`YtdReturn::percent`], but
/// callers can still tell a computed zero from a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum YtdReturn {
    /// The solver produced a rate (percent)
    Computed { percent: f64 },
    /// No transactions fall in the current calendar year
    NoActivity,
    /// The solver failed; the figure defaults to zero
    Failed { error: XirrError },
}

impl YtdReturn {
    /// Best-effort percentage: the computed rate, or zero.
    pub fn percent(&self) -> f64 {
        match self {
            YtdReturn::Computed { percent } => *percent,
            YtdReturn::NoActivity | YtdReturn::Failed { .. } => 0.0,
        }
    }

    /// Whether the figure came out of the solver.
    pub fn is_computed(&self) -> bool {
        matches!(self, YtdReturn::Computed { .. })
    }
}

/// First calendar day of the year containing `as_of`.
pub fn year_start(as_of: NaiveDate) -> NaiveDate {
    as_of.with_ordinal(1).unwrap_or(as_of)
}

/// Calculate the year-to-date return with the default solver settings.
///
/// See [`calculate_ytd_with`].
pub fn calculate_ytd(
    transactions: &[Transaction],
    current_value: f64,
    as_of: NaiveDate,
) -> YtdReturn {
    calculate_ytd_with(&XirrSolver::default(), transactions, current_value, as_of)
}

/// Calculate the year-to-date return.
///
/// Transactions dated on or after January 1st of `as_of`'s year are converted
/// to cashflows (amounts negated into the engine convention) and closed out
/// with `current_value` on `as_of`. Never fails: an empty year yields
/// [`YtdReturn::NoActivity`] and solver errors yield [`YtdReturn::Failed`].
pub fn calculate_ytd_with(
    solver: &XirrSolver,
    transactions: &[Transaction],
    current_value: f64,
    as_of: NaiveDate,
) -> YtdReturn {
    let start = year_start(as_of);

    let mut cashflows: Vec<Cashflow> = transactions
        .iter()
        .filter(|tx| tx.date >= start)
        .map(Transaction::to_cashflow)
        .collect();

    if cashflows.is_empty() {
        return YtdReturn::NoActivity;
    }

    cashflows.push(Cashflow::new(as_of, current_value));

    match solver.solve(&cashflows) {
        Ok(percent) => YtdReturn::Computed { percent },
        Err(error) => {
            tracing::warn!(%error, %as_of, "YTD calculation failed, defaulting to 0");
            YtdReturn::Failed { error }
        }
    }
}
