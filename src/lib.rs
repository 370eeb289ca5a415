//! # Smile-Lib: SVI Volatility Smile Calibration
//!
//! `smile-lib` is a Rust library for fitting the five-parameter SVI
//! (Stochastic Volatility Inspired) curve to a single expiry's market
//! observations. It combines a closed-form asymptotic initializer with a
//! damped Gauss-Newton refinement stage and exposes the fitted curve as an
//! implied-volatility evaluator with optional boundary extrapolation.
//!
//! ## Core Features
//!
//! - **SVI Model**: single-slice total-variance parametrization
//!   `w(k) = a + b * (rho * (k - eta) + sqrt((k - eta)^2 + c^2))`
//! - **Asymptotic Seeding**: wing-slope initial guess from the extreme
//!   observations, no optimizer required
//! - **Damped Refinement**: analytic-Jacobian Levenberg-Marquardt loop with
//!   a fixed iteration budget and NaN containment
//! - **Two Entry Points**: calibrate from `(log-moneyness, total variance)`
//!   observations or directly from `(strike, implied vol)` quotes
//!
//! ## Quick Start
//!
//! ```rust
//! use smile_lib::{fit_strike_smile, FitConfig, MarketQuote};
//!
//! let quotes = vec![
//!     MarketQuote { strike_price: 3500.0, implied_vol: 0.31203 },
//!     MarketQuote { strike_price: 4000.0, implied_vol: 0.25041 },
//!     MarketQuote { strike_price: 4500.0, implied_vol: 0.19897 },
//!     MarketQuote { strike_price: 5000.0, implied_vol: 0.15795 },
//!     MarketQuote { strike_price: 5500.0, implied_vol: 0.13803 },
//!     MarketQuote { strike_price: 6000.0, implied_vol: 0.14575 },
//!     MarketQuote { strike_price: 6400.0, implied_vol: 0.17007 },
//! ];
//!
//! let config = FitConfig::default();
//! let (params, report) = fit_strike_smile(&quotes, 5066.5, 0.00194, &config)?;
//! println!("fitted {params:?} after {} iterations", report.iterations);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Configuration
//!
//! [`FitConfig`] carries the solver knobs (iteration budget, convergence
//! tolerance, initial damping) and deserializes from TOML with per-field
//! defaults, so a partial config file is enough:
//!
//! ```toml
//! max_iterations = 40
//! tolerance = 1e-10
//! ```

pub mod calibration;
pub mod models;

use anyhow::Result;

// Core calibration types
pub use calibration::{
    config::FitConfig,
    types::{FitReport, FitStatus, MarketQuote, SmilePoint},
};

// SVI model types and the two calibration contexts
pub use models::svi::{
    params::SviParams,
    smile::{linear_variance_extrapolation, Boundary, BoundaryFn, SviSmile},
    strike::SviStrikeSmile,
};

/// One-shot calibration from `(strike, implied vol)` quotes.
///
/// Builds a [`SviStrikeSmile`] for the given forward price and expiry,
/// seeds it from the wing asymptotics, runs the refinement stage, and
/// returns the fitted parameters with the fit report.
///
/// # Errors
///
/// Fails if the forward price or expiry is non-positive, or if `quotes`
/// is empty.
pub fn fit_strike_smile(
    quotes: &[MarketQuote],
    forward_price: f64,
    t: f64,
    config: &FitConfig,
) -> Result<(SviParams, FitReport)> {
    let mut smile = SviStrikeSmile::new(forward_price, t)?;
    smile.init_params(quotes)?;
    let fitted = smile.fit(config);
    let report = smile.last_report().copied().unwrap_or_else(FitReport::skipped);
    Ok((fitted, report))
}
