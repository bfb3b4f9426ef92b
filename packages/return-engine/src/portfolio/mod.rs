//! Portfolio-level metrics.
//!
//! Turns a transaction and holding snapshot into the figures a portfolio
//! record stores: XIRR, YTD, total return, holding period and allocations.

mod holdings;
mod metrics;

pub use holdings::{current_value, holding_allocations, total_cost_basis, HoldingAllocation};
pub use metrics::{holding_period_months, MetricsSummary, PortfolioMetrics};
