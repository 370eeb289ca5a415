use anyhow::{Context, Result};
use serde::Deserialize;

/// Solver configuration for the Levenberg-Marquardt fit.
///
/// The defaults reproduce the engine's historical constants; production
/// callers normally run with `FitConfig::default()`. Every field can also be
/// supplied from a TOML snippet, with omitted fields falling back to the
/// defaults:
///
/// ```rust
/// use smile_lib::FitConfig;
///
/// let config = FitConfig::from_toml_str("max_iterations = 10").unwrap();
/// assert_eq!(config.max_iterations, 10);
/// assert_eq!(config.tolerance, 1e-8);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct FitConfig {
    /// Fixed iteration budget; the solver has no other bound.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Early-stop tolerance on the change of the residual norm between
    /// successive iterations.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Initial damping factor `nu`; each diagonal entry of the approximate
    /// Hessian is scaled by `(1 + 1/nu)` before the step solve.
    #[serde(default = "default_initial_nu")]
    pub initial_nu: f64,

    /// Sentinel residual norm the first iteration is compared against.
    #[serde(default = "default_initial_residual")]
    pub initial_residual: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            initial_nu: default_initial_nu(),
            initial_residual: default_initial_residual(),
        }
    }
}

impl FitConfig {
    /// Strict configuration for validation runs: a larger iteration budget
    /// and a tighter convergence tolerance than the production defaults.
    pub fn strict() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-12,
            ..Self::default()
        }
    }

    /// Parses a configuration from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("invalid fit configuration")
    }
}

fn default_max_iterations() -> usize {
    25
}

fn default_tolerance() -> f64 {
    1e-8
}

fn default_initial_nu() -> f64 {
    1000.0
}

fn default_initial_residual() -> f64 {
    1e9
}
