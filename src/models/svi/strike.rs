// src/models/svi/strike.rs

//! Strike-based calibration context.
//!
//! Wraps the same initializer and solver as the log-moneyness variant, but
//! accepts `(strike, implied vol)` quotes directly: log-moneyness is derived
//! from the forward price, and the solver targets are the raw implied vols
//! rather than total variances.

use anyhow::{ensure, Result};
use nalgebra::DVector;

use crate::calibration::config::FitConfig;
use crate::calibration::init::asymptotic_seed;
use crate::calibration::lm::lm_fit;
use crate::calibration::types::{FitReport, MarketQuote};
use crate::models::svi::params::SviParams;
use crate::models::utils::log_moneyness;

/// Calibration context for a single expiry, keyed by strike price.
#[derive(Debug)]
pub struct SviStrikeSmile {
    forward_price: f64,
    t: f64,
    params: Option<SviParams>,
    quotes: Vec<MarketQuote>,
    k_design: DVector<f64>,
    vol_design: DVector<f64>,
    last_report: Option<FitReport>,
}

impl SviStrikeSmile {
    /// Creates an empty context for the given forward price and
    /// time-to-expiry (years).
    pub fn new(forward_price: f64, t: f64) -> Result<Self> {
        ensure!(
            forward_price > 0.0 && forward_price.is_finite(),
            "forward price must be positive and finite, got {forward_price}"
        );
        ensure!(
            t > 0.0 && t.is_finite(),
            "time to expiry must be positive and finite, got {t}"
        );
        Ok(Self {
            forward_price,
            t,
            params: None,
            quotes: Vec::new(),
            k_design: DVector::zeros(0),
            vol_design: DVector::zeros(0),
            last_report: None,
        })
    }

    pub fn forward_price(&self) -> f64 {
        self.forward_price
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn params(&self) -> Option<&SviParams> {
        self.params.as_ref()
    }

    /// Quotes attached by the last [`init_params`](Self::init_params) call.
    pub fn quotes(&self) -> &[MarketQuote] {
        &self.quotes
    }

    pub fn set_params(&mut self, p: SviParams) {
        self.params = Some(p);
    }

    /// Report of the most recent [`fit`](Self::fit) call.
    pub fn last_report(&self) -> Option<&FitReport> {
        self.last_report.as_ref()
    }

    /// Attaches the quote sequence (ascending strike), derives log-moneyness
    /// and total variance per quote, and seeds the parameter vector from the
    /// wing asymptotics.
    pub fn init_params(&mut self, quotes: &[MarketQuote]) -> Result<()> {
        ensure!(!quotes.is_empty(), "at least one market quote is required");

        self.quotes = quotes.to_vec();
        let moneyness: Vec<f64> = quotes
            .iter()
            .map(|q| log_moneyness(q.strike_price, self.forward_price))
            .collect();
        let variance: Vec<f64> = quotes
            .iter()
            .map(|q| q.implied_vol * q.implied_vol * self.t)
            .collect();

        self.k_design = DVector::from_vec(moneyness.clone());
        self.vol_design =
            DVector::from_iterator(quotes.len(), quotes.iter().map(|q| q.implied_vol));

        self.params = Some(asymptotic_seed(&moneyness, &variance).unwrap_or_default());
        Ok(())
    }

    /// Refines the seeded parameters against the quoted vols and returns
    /// the result. A degenerate zero seed skips the solver.
    pub fn fit(&mut self, config: &FitConfig) -> SviParams {
        let start = self.params.unwrap_or_default();
        let (fitted, report) = lm_fit(&self.k_design, &self.vol_design, &start, self.t, config);
        self.params = Some(fitted);
        self.last_report = Some(report);
        fitted
    }

    /// Implied volatility of the curve at the given strike.
    pub fn implied_vol(&self, strike_price: f64, p: &SviParams) -> f64 {
        let k = log_moneyness(strike_price, self.forward_price);
        p.implied_vol(k, self.t)
    }

    /// Total variance of the curve at the given strike.
    pub fn total_variance(&self, strike_price: f64, p: &SviParams) -> f64 {
        let k = log_moneyness(strike_price, self.forward_price);
        p.total_variance(k)
    }
}
