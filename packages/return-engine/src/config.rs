//! Solver configuration loaded from TOML.
//!
//! ```toml
//! [solver]
//! tolerance = 1e-6
//! max_iterations = 1000
//! ```

use crate::returns::{XirrSolver, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// XIRR solver settings
    pub solver: SolverConfig,
}

/// XIRR solver settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverConfig {
    /// Convergence threshold on the absolute NPV
    pub tolerance: f64,
    /// Maximum number of Newton steps
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Build a solver from these settings.
    pub fn solver(&self) -> XirrSolver {
        XirrSolver::new(self.tolerance, self.max_iterations)
    }
}

impl Config {
    /// Get the default config file path.
    ///
    /// Default path: `<config dir>/return-engine/config.toml`
    /// Can be overridden with `RETURN_ENGINE_CONFIG` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("RETURN_ENGINE_CONFIG") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("return-engine/config.toml"))
            .unwrap_or_else(|| PathBuf::from("return-engine.toml"))
    }

    /// Load config from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path())
    }

    /// Load config from a specific path; a missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the solver settings can terminate with a meaningful answer.
    pub fn validate(&self) -> Result<()> {
        let solver = &self.solver;
        if !(solver.tolerance.is_finite() && solver.tolerance > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "solver.tolerance must be a positive number, got {}",
                solver.tolerance
            )));
        }
        if solver.max_iterations == 0 {
            return Err(Error::InvalidConfig(
                "solver.max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
