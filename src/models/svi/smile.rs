// src/models/svi/smile.rs

//! Log-moneyness calibration context with boundary extrapolation.
//!
//! An [`SviSmile`] owns the time-to-expiry, the current parameter vector,
//! the observation sequence and the dense design vectors built from it, and
//! the optional left/right boundary records that govern off-grid queries.
//! The context is a single-threaded sequential value: initialization and
//! fitting mutate it in place, queries are read-only.

use std::fmt;

use anyhow::{ensure, Result};
use nalgebra::DVector;

use crate::calibration::config::FitConfig;
use crate::calibration::init::asymptotic_seed;
use crate::calibration::lm::lm_fit;
use crate::calibration::types::{FitReport, SmilePoint};
use crate::models::svi::params::SviParams;

/// One side of the fitted domain: queries beyond `k_value` are answered by
/// the extrapolation function using the configured `slope`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub k_value: f64,
    pub slope: f64,
}

/// Pluggable extrapolation strategy invoked for queries outside a boundary.
/// Receives the smile, the query log-moneyness, the violated boundary and
/// the parameter vector the caller supplied.
pub type BoundaryFn = dyn Fn(&SviSmile, f64, &Boundary, &SviParams) -> f64 + Send + Sync;

/// Default extrapolation: extend total variance linearly beyond the
/// boundary point using the boundary's slope, then convert back to a
/// volatility. Returns zero until the smile has been seeded with
/// parameters.
pub fn linear_variance_extrapolation(
    smile: &SviSmile,
    k: f64,
    boundary: &Boundary,
    p: &SviParams,
) -> f64 {
    if smile.params.is_none() {
        return 0.0;
    }
    (p.total_variance(boundary.k_value) / smile.t + (k - boundary.k_value) * boundary.slope)
        .abs()
        .sqrt()
}

/// Calibration context for a single expiry, keyed by log-moneyness.
pub struct SviSmile {
    t: f64,
    params: Option<SviParams>,
    points: Vec<SmilePoint>,
    k_design: DVector<f64>,
    v_design: DVector<f64>,
    left_boundary: Option<Boundary>,
    right_boundary: Option<Boundary>,
    boundary_fn: Box<BoundaryFn>,
    last_report: Option<FitReport>,
}

impl SviSmile {
    /// Creates an empty context for the given time-to-expiry (years).
    pub fn new(t: f64) -> Result<Self> {
        ensure!(
            t > 0.0 && t.is_finite(),
            "time to expiry must be positive and finite, got {t}"
        );
        Ok(Self {
            t,
            params: None,
            points: Vec::new(),
            k_design: DVector::zeros(0),
            v_design: DVector::zeros(0),
            left_boundary: None,
            right_boundary: None,
            boundary_fn: Box::new(linear_variance_extrapolation),
            last_report: None,
        })
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    /// The current parameter vector, if the context has been initialized.
    pub fn params(&self) -> Option<&SviParams> {
        self.params.as_ref()
    }

    /// Restores a previously calibrated parameter vector, e.g. a snapshot
    /// taken for read-only query threads.
    pub fn set_params(&mut self, p: SviParams) {
        self.params = Some(p);
    }

    /// Report of the most recent [`fit`](Self::fit) call.
    pub fn last_report(&self) -> Option<&FitReport> {
        self.last_report.as_ref()
    }

    /// Attaches the observation sequence (ascending `k`), builds the design
    /// vectors and seeds the parameter vector from the wing asymptotics.
    /// A degenerate wing shape leaves the all-zero seed in place, which a
    /// later [`fit`](Self::fit) treats as nothing to fit.
    pub fn init_params(&mut self, points: &[SmilePoint]) -> Result<()> {
        ensure!(!points.is_empty(), "at least one market observation is required");

        self.points = points.to_vec();
        self.k_design = DVector::from_iterator(points.len(), points.iter().map(|p| p.k));
        self.v_design = DVector::from_iterator(points.len(), points.iter().map(|p| p.v));

        let moneyness: Vec<f64> = points.iter().map(|p| p.k).collect();
        let variance: Vec<f64> = points.iter().map(|p| p.v).collect();
        self.params = Some(asymptotic_seed(&moneyness, &variance).unwrap_or_default());
        Ok(())
    }

    /// Refines the seeded parameters in place and returns the result. A
    /// degenerate zero seed skips the solver and comes back unchanged.
    pub fn fit(&mut self, config: &FitConfig) -> SviParams {
        let start = self.params.unwrap_or_default();
        let (fitted, report) = lm_fit(&self.k_design, &self.v_design, &start, self.t, config);
        self.params = Some(fitted);
        self.last_report = Some(report);
        fitted
    }

    /// Total variance of the curve at log-moneyness `k`.
    pub fn total_variance(&self, k: f64, p: &SviParams) -> f64 {
        p.total_variance(k)
    }

    /// Implied volatility at log-moneyness `k`, honouring configured
    /// boundaries. Pure with respect to the context state.
    pub fn implied_vol(&self, k: f64, p: &SviParams) -> f64 {
        if let Some(b) = self.left_boundary {
            if k < b.k_value {
                return (self.boundary_fn)(self, k, &b, p);
            }
        }
        if let Some(b) = self.right_boundary {
            if k > b.k_value {
                return (self.boundary_fn)(self, k, &b, p);
            }
        }
        p.implied_vol(k, self.t)
    }

    pub fn set_left_boundary(&mut self, k_value: f64, slope: f64) {
        self.left_boundary = Some(Boundary { k_value, slope });
    }

    pub fn remove_left_boundary(&mut self) {
        self.left_boundary = None;
    }

    pub fn set_right_boundary(&mut self, k_value: f64, slope: f64) {
        self.right_boundary = Some(Boundary { k_value, slope });
    }

    pub fn remove_right_boundary(&mut self) {
        self.right_boundary = None;
    }

    /// Replaces the extrapolation strategy used for out-of-boundary queries.
    pub fn set_boundary_fn<F>(&mut self, f: F)
    where
        F: Fn(&SviSmile, f64, &Boundary, &SviParams) -> f64 + Send + Sync + 'static,
    {
        self.boundary_fn = Box::new(f);
    }
}

impl fmt::Debug for SviSmile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SviSmile")
            .field("t", &self.t)
            .field("params", &self.params)
            .field("points", &self.points.len())
            .field("left_boundary", &self.left_boundary)
            .field("right_boundary", &self.right_boundary)
            .field("last_report", &self.last_report)
            .finish_non_exhaustive()
    }
}
