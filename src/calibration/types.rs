use serde::Serialize;

/// Strike-based market observation for a single expiry: a quoted strike and
/// its implied volatility (decimal, e.g. 0.25 for 25%).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketQuote {
    pub strike_price: f64,
    pub implied_vol: f64,
}

/// Log-moneyness observation: `k = ln(strike / forward)` and the total
/// implied variance `v = vol^2 * T` observed there. The caller is
/// responsible for supplying points in ascending `k` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmilePoint {
    pub k: f64,
    pub v: f64,
}

impl SmilePoint {
    pub fn new(k: f64, v: f64) -> Self {
        Self { k, v }
    }
}

/// How a solver run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FitStatus {
    /// The residual-norm change dropped below the tolerance before the
    /// iteration budget ran out.
    Converged,
    /// The iteration budget was exhausted without meeting the tolerance.
    BudgetExhausted,
    /// The seed had `a`, `b`, `c` and `eta` all zero; the solver was skipped
    /// and the parameters returned unchanged.
    SkippedDegenerateSeed,
}

/// Summary of one solver run.
///
/// The engine never raises an error for numeric degradation; callers judge
/// calibration quality through this report (and by checking for an all-zero
/// parameter vector).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FitReport {
    pub status: FitStatus,
    /// Iterations actually executed (0 when the solver was skipped).
    pub iterations: usize,
    /// Euclidean norm of the residual vector at the returned parameters
    /// (infinite when the solver was skipped).
    pub residual_norm: f64,
    /// Damped normal-equation solves that failed and were absorbed.
    pub solver_failures: usize,
    /// Parameter components zeroed by the NaN fallback on exit.
    pub nan_fallbacks: usize,
}

impl FitReport {
    pub(crate) fn skipped() -> Self {
        Self {
            status: FitStatus::SkippedDegenerateSeed,
            iterations: 0,
            residual_norm: f64::INFINITY,
            solver_failures: 0,
            nan_fallbacks: 0,
        }
    }
}
