//! Simple total return.

/// Total return of `current_value` over `cost_basis`, as a percentage.
///
/// Returns 0 for a zero cost basis.
pub fn calculate_total_return(cost_basis: f64, current_value: f64) -> f64 {
    if cost_basis == 0.0 {
        return 0.0;
    }
    (current_value / cost_basis - 1.0) * 100.0
}
