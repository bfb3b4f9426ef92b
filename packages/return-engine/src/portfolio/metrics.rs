//! Portfolio return metrics assembled from a transaction/holding snapshot.

use super::holdings::{current_value, total_cost_basis};
use crate::returns::{
    calculate_total_return, calculate_ytd_with, XirrError, XirrSolver, YtdReturn,
};
use crate::types::{Cashflow, Holding, Transaction};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days per month used for the holding period.
const DAYS_PER_MONTH: i64 = 30;

/// Return metrics for one portfolio at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioMetrics {
    /// All-time XIRR in percent; `None` when it could not be computed
    pub xirr_percent: Option<f64>,
    /// Why the all-time XIRR is missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xirr_error: Option<XirrError>,
    /// Whole months since the first transaction
    pub xirr_period_months: u32,
    /// Total return over cost basis, in percent
    pub total_return_percent: f64,
    /// Year-to-date return outcome
    pub ytd: YtdReturn,
    /// Year-to-date return in percent (zero when not computed)
    pub ytd_return_percent: f64,
    /// Current market value of all holdings
    pub current_value: f64,
    /// Sum of recorded cost bases
    pub total_cost_basis: f64,
    /// Date of the earliest transaction of any kind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_transaction_date: Option<NaiveDate>,
    /// Valuation date
    pub as_of: NaiveDate,
}

/// Display-ready figures rounded to one decimal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsSummary {
    pub xirr: Option<String>,
    pub total_return: String,
    pub ytd: String,
    pub period: u32,
    pub current_value: f64,
}

impl PortfolioMetrics {
    /// Calculate metrics with the default solver settings.
    pub fn calculate(transactions: &[Transaction], holdings: &[Holding], as_of: NaiveDate) -> Self {
        Self::calculate_with(&XirrSolver::default(), transactions, holdings, as_of)
    }

    /// Calculate metrics from a snapshot.
    ///
    /// Only buy and sell transactions enter the cashflow series; the current
    /// value of all holdings closes it on `as_of`. The holding period, however,
    /// runs from the earliest transaction of any kind.
    pub fn calculate_with(
        solver: &XirrSolver,
        transactions: &[Transaction],
        holdings: &[Holding],
        as_of: NaiveDate,
    ) -> Self {
        let current_value = current_value(holdings);
        let total_cost_basis = total_cost_basis(holdings);

        let trades: Vec<Transaction> = transactions
            .iter()
            .filter(|tx| tx.kind.is_trade())
            .copied()
            .collect();

        let mut cashflows: Vec<Cashflow> = trades.iter().map(Transaction::to_cashflow).collect();
        cashflows.push(Cashflow::new(as_of, current_value));

        let (xirr_percent, xirr_error) = match solver.solve(&cashflows) {
            Ok(rate) => (Some(rate), None),
            Err(error) => {
                tracing::debug!(%error, "all-time XIRR unavailable");
                (None, Some(error))
            }
        };

        let ytd = calculate_ytd_with(solver, &trades, current_value, as_of);

        let first_transaction_date = transactions.iter().map(|tx| tx.date).min();
        let xirr_period_months = first_transaction_date
            .map(|first| holding_period_months(first, as_of))
            .unwrap_or(0);

        Self {
            xirr_percent,
            xirr_error,
            xirr_period_months,
            total_return_percent: calculate_total_return(total_cost_basis, current_value),
            ytd,
            ytd_return_percent: ytd.percent(),
            current_value,
            total_cost_basis,
            first_transaction_date,
            as_of,
        }
    }

    /// Round the figures to one decimal for display.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            xirr: self.xirr_percent.map(|x| format!("{:.1}", x)),
            total_return: format!("{:.1}", self.total_return_percent),
            ytd: format!("{:.1}", self.ytd_return_percent),
            period: self.xirr_period_months,
            current_value: self.current_value,
        }
    }
}

/// Whole 30-day months elapsed from `first` to `as_of`, floored.
///
/// A `first` date after `as_of` yields zero.
pub fn holding_period_months(first: NaiveDate, as_of: NaiveDate) -> u32 {
    let days = (as_of - first).num_days();
    if days <= 0 {
        return 0;
    }
    u32::try_from(days / DAYS_PER_MONTH).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;
    use approx::assert_abs_diff_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            Transaction::new(date(2023, 1, 10), 25.0, TransactionKind::Fee),
            Transaction::buy(date(2023, 1, 15), 10000.0),
            Transaction::sell(date(2024, 3, 1), 2000.0),
            Transaction::buy(date(2025, 2, 1), 1000.0),
        ]
    }

    fn sample_holdings() -> Vec<Holding> {
        vec![
            Holding::new("VTI", 40.0, 300.0, 8500.0),
            Holding {
                ticker: Some("BND".to_string()),
                quantity: 10.0,
                institution_price: 70.0,
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_holding_period_months() {
        assert_eq!(holding_period_months(date(2025, 1, 1), date(2025, 1, 30)), 0);
        assert_eq!(holding_period_months(date(2025, 1, 1), date(2025, 1, 31)), 1);
        assert_eq!(holding_period_months(date(2023, 1, 10), date(2025, 6, 30)), 30);
        assert_eq!(holding_period_months(date(2025, 6, 30), date(2025, 1, 1)), 0);
    }

    #[test]
    fn test_calculate_metrics() {
        let as_of = date(2025, 6, 30);
        let metrics =
            PortfolioMetrics::calculate(&sample_transactions(), &sample_holdings(), as_of);

        assert_eq!(metrics.current_value, 12700.0);
        assert_eq!(metrics.total_cost_basis, 8500.0);
        assert_abs_diff_eq!(metrics.total_return_percent, 49.411764705882355, epsilon = 1e-9);
        assert_eq!(metrics.first_transaction_date, Some(date(2023, 1, 10)));
        assert_eq!(metrics.xirr_period_months, 30);
        assert_eq!(metrics.as_of, as_of);

        let xirr = metrics.xirr_percent.unwrap();
        assert!(xirr > 0.0);
        assert!(metrics.xirr_error.is_none());

        assert!(metrics.ytd.is_computed());
        assert_eq!(metrics.ytd_return_percent, metrics.ytd.percent());
    }

    #[test]
    fn test_sells_count_as_inflows() {
        let as_of = date(2025, 6, 30);
        let holdings = sample_holdings();
        let with_sell = PortfolioMetrics::calculate(&sample_transactions(), &holdings, as_of);

        let without_sell: Vec<Transaction> = sample_transactions()
            .into_iter()
            .filter(|tx| tx.kind != TransactionKind::Sell)
            .collect();
        let without_sell = PortfolioMetrics::calculate(&without_sell, &holdings, as_of);

        assert!(with_sell.xirr_percent.unwrap() > without_sell.xirr_percent.unwrap());
    }

    #[test]
    fn test_non_trades_excluded_from_cashflows() {
        let as_of = date(2025, 6, 30);
        let holdings = sample_holdings();
        let trades_only: Vec<Transaction> = sample_transactions()
            .into_iter()
            .filter(|tx| tx.kind.is_trade())
            .collect();

        let all = PortfolioMetrics::calculate(&sample_transactions(), &holdings, as_of);
        let trades = PortfolioMetrics::calculate(&trades_only, &holdings, as_of);

        assert_eq!(all.xirr_percent, trades.xirr_percent);
        assert_eq!(all.ytd, trades.ytd);
        // The fee still moves the start of the holding period
        assert_eq!(all.first_transaction_date, Some(date(2023, 1, 10)));
        assert_eq!(trades.first_transaction_date, Some(date(2023, 1, 15)));
    }

    #[test]
    fn test_empty_snapshot() {
        let metrics = PortfolioMetrics::calculate(&[], &[], date(2025, 6, 30));

        assert_eq!(metrics.xirr_percent, None);
        assert_eq!(
            metrics.xirr_error,
            Some(XirrError::InsufficientData { count: 1 })
        );
        assert_eq!(metrics.ytd, YtdReturn::NoActivity);
        assert_eq!(metrics.total_return_percent, 0.0);
        assert_eq!(metrics.xirr_period_months, 0);
        assert_eq!(metrics.first_transaction_date, None);
    }

    #[test]
    fn test_summary_rounding() {
        let metrics = PortfolioMetrics {
            xirr_percent: Some(12.345),
            xirr_error: None,
            xirr_period_months: 14,
            total_return_percent: -3.26,
            ytd: YtdReturn::NoActivity,
            ytd_return_percent: 0.0,
            current_value: 5000.0,
            total_cost_basis: 5168.5,
            first_transaction_date: Some(date(2024, 4, 1)),
            as_of: date(2025, 6, 1),
        };

        let summary = metrics.summary();
        assert_eq!(summary.xirr.as_deref(), Some("12.3"));
        assert_eq!(summary.total_return, "-3.3");
        assert_eq!(summary.ytd, "0.0");
        assert_eq!(summary.period, 14);

        let unavailable = PortfolioMetrics {
            xirr_percent: None,
            ..metrics
        };
        assert_eq!(unavailable.summary().xirr, None);
    }
}
