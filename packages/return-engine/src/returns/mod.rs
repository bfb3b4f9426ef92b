//! Money-weighted return calculations.
//!
//! Provides the XIRR root finder and the year-to-date and total-return figures
//! built on top of it.

mod solver;
mod total;
mod ytd;

pub use solver::{
    net_present_value, xirr, XirrError, XirrSolver, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE,
    DIVERGENCE_FLOOR, INITIAL_GUESS,
};
pub use total::calculate_total_return;
pub use ytd::{calculate_ytd, calculate_ytd_with, year_start, YtdReturn};
