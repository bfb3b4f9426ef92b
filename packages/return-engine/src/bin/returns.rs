//! Returns CLI - Command line interface for the return engine.
//!
//! All output is JSON on stdout so the binary can sit behind a portfolio
//! update job; diagnostics go to stderr via `RUST_LOG`.

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use return_engine::{
    calculate_total_return, calculate_ytd_with, holding_allocations,
    portfolio::current_value, ApiResponse, Cashflow, Config, Ledger, SolverConfig,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "returns")]
#[command(about = "Portfolio return engine - XIRR, year-to-date and total return")]
#[command(version)]
struct Cli {
    /// Config file (defaults to RETURN_ENGINE_CONFIG or the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve XIRR for explicit cashflows
    Xirr {
        /// Cashflow as DATE:AMOUNT (negative = invested), repeatable
        #[arg(short, long = "flow", required = true, allow_hyphen_values = true)]
        flows: Vec<Cashflow>,
        /// Convergence tolerance on NPV
        #[arg(long)]
        tolerance: Option<f64>,
        /// Maximum Newton iterations
        #[arg(long)]
        max_iterations: Option<usize>,
    },
    /// Calculate all portfolio metrics from a ledger file
    Metrics {
        /// Ledger JSON file
        #[arg(short, long)]
        ledger: PathBuf,
        /// Valuation date (defaults to today, UTC)
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Include per-holding allocation
        #[arg(long)]
        allocations: bool,
    },
    /// Calculate the year-to-date return from a ledger file
    Ytd {
        /// Ledger JSON file
        #[arg(short, long)]
        ledger: PathBuf,
        /// Valuation date (defaults to today, UTC)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Calculate total return from cost basis and current value
    #[command(allow_negative_numbers = true)]
    TotalReturn {
        /// Total amount invested
        #[arg(long)]
        cost_basis: f64,
        /// Current portfolio value
        #[arg(long)]
        current_value: f64,
    },
    /// Show the effective configuration
    Config,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(Config::default_path);

    let result = Config::load_from_path(&config_path).and_then(|config| match cli.command {
        Commands::Xirr {
            flows,
            tolerance,
            max_iterations,
        } => handle_xirr(&config, flows, tolerance, max_iterations),
        Commands::Metrics {
            ledger,
            as_of,
            allocations,
        } => handle_metrics(&config, &ledger, as_of, allocations),
        Commands::Ytd { ledger, as_of } => handle_ytd(&config, &ledger, as_of),
        Commands::TotalReturn {
            cost_basis,
            current_value,
        } => Ok(json!({
            "total_return_percent": calculate_total_return(cost_basis, current_value),
        })),
        Commands::Config => Ok(json!({
            "path": config_path,
            "config": config,
        })),
    });

    match result {
        Ok(data) => {
            println!("{}", render(&ApiResponse::ok(data)));
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            println!("{}", render(&ApiResponse::<()>::err(e.to_string())));
            ExitCode::FAILURE
        }
    }
}

fn render<T: Serialize>(response: &ApiResponse<T>) -> String {
    serde_json::to_string_pretty(response).unwrap_or_else(|e| {
        format!(
            "{{\"ok\": false, \"error\": \"failed to serialize response: {}\"}}",
            e
        )
    })
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn handle_xirr(
    config: &Config,
    flows: Vec<Cashflow>,
    tolerance: Option<f64>,
    max_iterations: Option<usize>,
) -> return_engine::Result<Value> {
    let overridden = Config {
        solver: SolverConfig {
            tolerance: tolerance.unwrap_or(config.solver.tolerance),
            max_iterations: max_iterations.unwrap_or(config.solver.max_iterations),
        },
    };
    overridden.validate()?;

    let rate = overridden.solver.solver().solve(&flows)?;
    Ok(json!({
        "xirr_percent": rate,
        "xirr": format!("{:.1}", rate),
        "cashflows": flows.len(),
    }))
}

fn handle_metrics(
    config: &Config,
    path: &Path,
    as_of: Option<NaiveDate>,
    allocations: bool,
) -> return_engine::Result<Value> {
    let ledger = Ledger::load_from_path(path)?;
    let metrics = ledger.metrics(&config.solver.solver(), as_of.unwrap_or_else(today));

    let mut data = json!({
        "metrics": metrics,
        "summary": metrics.summary(),
    });
    if allocations {
        data["holdings"] = json!(holding_allocations(&ledger.holdings));
    }
    Ok(data)
}

fn handle_ytd(
    config: &Config,
    path: &Path,
    as_of: Option<NaiveDate>,
) -> return_engine::Result<Value> {
    let ledger = Ledger::load_from_path(path)?;
    let as_of = as_of.unwrap_or_else(today);
    let value = current_value(&ledger.holdings);
    let ytd = calculate_ytd_with(&config.solver.solver(), &ledger.trades(), value, as_of);

    Ok(json!({
        "ytd": ytd,
        "ytd_return_percent": ytd.percent(),
        "current_value": value,
        "as_of": as_of,
    }))
}
