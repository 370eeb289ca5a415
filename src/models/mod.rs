pub mod bs;
pub mod svi;

/// Shared helpers for moneyness conversions.
pub mod utils {
    /// Log-moneyness: ln(K/F).
    pub fn log_moneyness(strike: f64, forward: f64) -> f64 {
        (strike / forward).ln()
    }
}
