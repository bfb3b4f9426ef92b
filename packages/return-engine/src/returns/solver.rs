//! Extended internal rate of return (XIRR) via Newton-Raphson.
//!
//! The solver finds the annualized rate `r` at which the net present value
//!
//! ```text
//! NPV(r) = Σ amount_i / (1 + r)^years_i
//! ```
//!
//! of a dated cashflow series is zero, where `years_i` is measured from the
//! earliest cashflow using a 365.25-day year.

use crate::types::Cashflow;
use serde::{Deserialize, Serialize};

/// Convergence threshold on `|NPV|`.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Iteration cap before giving up.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Starting rate for the iteration (10%).
pub const INITIAL_GUESS: f64 = 0.10;

/// Rates at or below this value are treated as a runaway search.
pub const DIVERGENCE_FLOOR: f64 = -0.99;

const DAYS_PER_YEAR: f64 = 365.25;

/// Failure modes of the XIRR search.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum XirrError {
    #[error("need at least 2 cashflows to calculate XIRR, got {count}")]
    InsufficientData { count: usize },

    #[error("NPV derivative is zero at iteration {iteration} (rate {rate})")]
    DegenerateDerivative { iteration: usize, rate: f64 },

    #[error("XIRR diverged at iteration {iteration} (rate {rate} <= -99%)")]
    Diverged { iteration: usize, rate: f64 },

    #[error("XIRR did not converge after {iterations} iterations")]
    NotConverged { iterations: usize },
}

/// Newton-Raphson XIRR solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XirrSolver {
    /// Convergence threshold on the absolute NPV
    pub tolerance: f64,
    /// Maximum number of Newton steps
    pub max_iterations: usize,
}

impl Default for XirrSolver {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl XirrSolver {
    /// Create a solver with explicit tolerance and iteration cap.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Solve for the annualized rate, returned as a percentage (`12.34` for 12.34%).
    ///
    /// Input order does not matter. Negative results are valid and represent an
    /// annualized loss.
    ///
    /// # Errors
    ///
    /// * [`XirrError::InsufficientData`] for fewer than two cashflows
    /// * [`XirrError::DegenerateDerivative`] when `NPV'(r)` is exactly zero, which
    ///   is always the case when every cashflow falls on the same date
    /// * [`XirrError::Diverged`] when a Newton step lands at or below -99%
    /// * [`XirrError::NotConverged`] when the iteration cap is reached
    pub fn solve(&self, cashflows: &[Cashflow]) -> Result<f64, XirrError> {
        if cashflows.len() < 2 {
            return Err(XirrError::InsufficientData {
                count: cashflows.len(),
            });
        }

        let flows = year_fractions(cashflows);
        let mut rate = INITIAL_GUESS;

        for iteration in 1..=self.max_iterations {
            let (npv, derivative) = npv_and_derivative(&flows, rate);

            // Checked first: a zero derivative everywhere also means NPV is
            // identically zero, which must not read as convergence.
            if derivative == 0.0 {
                return Err(XirrError::DegenerateDerivative { iteration, rate });
            }

            if npv.abs() < self.tolerance {
                tracing::trace!(iteration, rate, "XIRR converged");
                return Ok(rate * 100.0);
            }

            rate -= npv / derivative;

            if rate <= DIVERGENCE_FLOOR {
                return Err(XirrError::Diverged { iteration, rate });
            }
        }

        Err(XirrError::NotConverged {
            iterations: self.max_iterations,
        })
    }
}

/// Solve XIRR with the default tolerance and iteration cap.
pub fn xirr(cashflows: &[Cashflow]) -> Result<f64, XirrError> {
    XirrSolver::default().solve(cashflows)
}

/// Net present value of `cashflows` at `rate` (a fraction, not a percentage),
/// discounted to the earliest cashflow date.
pub fn net_present_value(cashflows: &[Cashflow], rate: f64) -> f64 {
    npv_and_derivative(&year_fractions(cashflows), rate).0
}

/// Sort chronologically and convert to `(years since first, amount)` pairs.
///
/// Ties on date are broken by amount so every permutation of the input yields
/// the same summation order.
fn year_fractions(cashflows: &[Cashflow]) -> Vec<(f64, f64)> {
    let mut sorted = cashflows.to_vec();
    sorted.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.amount.total_cmp(&b.amount))
    });

    let Some(start) = sorted.first().map(|cf| cf.date) else {
        return Vec::new();
    };

    sorted
        .iter()
        .map(|cf| {
            let days = (cf.date - start).num_days() as f64;
            (days / DAYS_PER_YEAR, cf.amount)
        })
        .collect()
}

fn npv_and_derivative(flows: &[(f64, f64)], rate: f64) -> (f64, f64) {
    let base = 1.0 + rate;
    flows
        .iter()
        .fold((0.0, 0.0), |(npv, derivative), &(years, amount)| {
            let factor = base.powf(years);
            (
                npv + amount / factor,
                derivative - years * amount / (factor * base),
            )
        })
}
