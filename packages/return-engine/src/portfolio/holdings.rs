//! Holding valuation and allocation.

use crate::types::Holding;
use serde::{Deserialize, Serialize};

/// Sum of `quantity * institution_price` across holdings.
pub fn current_value(holdings: &[Holding]) -> f64 {
    holdings.iter().map(Holding::market_value).sum()
}

/// Sum of recorded cost bases; missing values count as zero.
pub fn total_cost_basis(holdings: &[Holding]) -> f64 {
    holdings.iter().map(Holding::cost_basis_or_zero).sum()
}

/// A holding together with its share of the portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HoldingAllocation {
    /// Ticker, ISIN, or `N/A`
    pub ticker: String,
    /// Security name, or `Unknown`
    pub security_name: String,
    /// Units held
    pub quantity: f64,
    /// Recorded cost basis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_basis: Option<f64>,
    /// Latest institution price
    pub current_price: f64,
    /// Market value of the holding
    pub current_value: f64,
    /// Market value as a percentage of the whole portfolio
    pub percent_of_portfolio: f64,
}

/// Calculate the allocation of each holding.
///
/// Returns an empty list when the portfolio has no positive value.
pub fn holding_allocations(holdings: &[Holding]) -> Vec<HoldingAllocation> {
    let total_value = current_value(holdings);
    if total_value <= 0.0 {
        return Vec::new();
    }

    holdings
        .iter()
        .map(|h| {
            let value = h.market_value();
            HoldingAllocation {
                ticker: h.label().to_string(),
                security_name: h.display_name().to_string(),
                quantity: h.quantity,
                cost_basis: h.cost_basis,
                current_price: h.institution_price,
                current_value: value,
                percent_of_portfolio: value / total_value * 100.0,
            }
        })
        .collect()
}
