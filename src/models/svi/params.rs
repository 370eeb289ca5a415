// src/models/svi/params.rs

//! Raw SVI parameter vector and the total-variance function.
//!
//! The curve models total implied variance as a function of log-moneyness k:
//!
//! w(k) = a + b * (rho*(k - eta) + sqrt((k - eta)^2 + c^2))
//!
//! where the parameters are:
//! - a: overall variance level (additive offset)
//! - b: asymptotic slope magnitude (>= 0 for a well-formed curve)
//! - c: smoothing of the vertex (curvature)
//! - rho: rotation / skew, kept inside [-0.99, 0.99] by the initializer
//! - eta: horizontal shift of the vertex in log-moneyness space

use serde::{Deserialize, Serialize};

/// Total variance at the shifted log-moneyness `k_m = k - eta`.
///
/// Pure and total: the square-root argument is a sum of squares, so the
/// result is defined for any finite input. `c` is expected to be
/// non-negative but is not validated here.
pub fn variance(k_m: f64, a: f64, b: f64, c: f64, rho: f64) -> f64 {
    a + b * (rho * k_m + (k_m * k_m + c * c).sqrt())
}

/// Parameters of the raw SVI total-variance curve for a single expiry.
///
/// The zero vector doubles as the engine's degraded state: a failed
/// initialization leaves it in place and the solver then has nothing to fit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SviParams {
    /// Overall variance level (additive offset)
    pub a: f64,
    /// Asymptotic slope magnitude
    pub b: f64,
    /// Smoothing of the vertex
    pub c: f64,
    /// Rotation / skew
    pub rho: f64,
    /// Horizontal shift of the vertex
    pub eta: f64,
}

impl SviParams {
    pub fn new(a: f64, b: f64, c: f64, rho: f64, eta: f64) -> Self {
        Self { a, b, c, rho, eta }
    }

    /// Total variance at log-moneyness `k`.
    pub fn total_variance(&self, k: f64) -> f64 {
        variance(k - self.eta, self.a, self.b, self.c, self.rho)
    }

    /// Implied volatility at log-moneyness `k` for time-to-expiry `t`.
    pub fn implied_vol(&self, k: f64, t: f64) -> f64 {
        (self.total_variance(k).abs() / t).sqrt()
    }

    /// Replaces each NaN component with zero and returns how many were
    /// zeroed. Numeric degeneracy is absorbed this way after every
    /// computation step, never surfaced as an error.
    pub fn sanitize(&mut self) -> usize {
        let mut zeroed = 0;
        for v in [
            &mut self.a,
            &mut self.b,
            &mut self.c,
            &mut self.rho,
            &mut self.eta,
        ] {
            if v.is_nan() {
                *v = 0.0;
                zeroed += 1;
            }
        }
        zeroed
    }

    /// A seed with `a`, `b`, `c` and `eta` all exactly zero marks a failed
    /// initialization; the solver skips such a start entirely. `rho` is
    /// deliberately not inspected.
    pub fn is_degenerate_seed(&self) -> bool {
        self.a == 0.0 && self.b == 0.0 && self.c == 0.0 && self.eta == 0.0
    }
}
