// src/calibration/lm.rs

//! Analytic-Jacobian Levenberg-Marquardt refinement of the SVI parameters.
//!
//! The solver minimizes the Euclidean norm of `target[j] - model(k[j])`
//! where `model(k) = sqrt(|w(k - eta)| / T)` and `w` is the SVI total
//! variance. The damping update runs in the opposite direction of textbook
//! LM (nu shrinks on a rejected step and grows on an accepted one); it is
//! kept exactly as the production engine behaves, since downstream numeric
//! expectations are calibrated against it.

use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

use crate::calibration::config::FitConfig;
use crate::calibration::types::{FitReport, FitStatus};
use crate::models::svi::params::{variance, SviParams};

pub(crate) const PARAMS_LEN: usize = 5;

/// Model value at log-moneyness `k`: the implied volatility the candidate
/// parameters produce there.
fn model_vol(k: f64, p: &SviParams, t: f64) -> f64 {
    let k_m = k - p.eta;
    ((p.a + p.b * (p.rho * k_m + (k_m * k_m + p.c * p.c).sqrt())).abs() / t).sqrt()
}

fn model_vector(ks: &DVector<f64>, p: &SviParams, t: f64) -> DVector<f64> {
    DVector::from_iterator(ks.len(), ks.iter().map(|&k| model_vol(k, p, t)))
}

/// Analytic gradient of the model value with respect to
/// `(a, b, c, rho, eta)` at a single observation.
///
/// `v1` and `v2` are shape terms, not full variances: the variance function
/// evaluated with `a = 0, b = 1` (and `rho = 0` for `v2`). Their placement
/// across the five slots reproduces the production engine's gradient
/// bit-for-bit, including for non-zero `rho`.
fn grad_row(k: f64, p: &SviParams, t: f64) -> [f64; PARAMS_LEN] {
    let k_m = k - p.eta;
    let f = model_vol(k, p, t);
    let tmp = 1.0 / (2.0 * f * t);
    let tmp_b = tmp * p.b;
    let v1 = variance(k_m, 0.0, 1.0, p.c, p.rho);
    let v2 = variance(k_m, 0.0, 1.0, p.c, 0.0);

    [
        tmp,
        tmp * v2,
        tmp_b * p.c / v1,
        tmp_b * k_m,
        -tmp_b * (p.rho + k_m / v1),
    ]
}

/// One gradient row per observation, columns in parameter order.
fn jacobian(ks: &DVector<f64>, p: &SviParams, t: f64) -> DMatrix<f64> {
    let mut jac = DMatrix::zeros(ks.len(), PARAMS_LEN);
    for (i, &k) in ks.iter().enumerate() {
        let row = grad_row(k, p, t);
        for (j, g) in row.into_iter().enumerate() {
            jac[(i, j)] = g;
        }
    }
    jac
}

/// Runs the damped iteration from `start` and returns the refined
/// parameters together with a report on how the run ended.
///
/// A degenerate start (`a`, `b`, `c`, `eta` all zero) skips the solver
/// entirely and returns the start unchanged. A singular damped system is
/// logged and absorbed as a zero step; the iteration keeps going. NaN
/// components of the result are zeroed on exit.
pub fn lm_fit(
    ks: &DVector<f64>,
    targets: &DVector<f64>,
    start: &SviParams,
    t: f64,
    config: &FitConfig,
) -> (SviParams, FitReport) {
    if start.is_degenerate_seed() {
        return (*start, FitReport::skipped());
    }

    let mut res_prev = config.initial_residual;
    let mut nu = config.initial_nu;
    let mut p = *start;
    let mut status = FitStatus::BudgetExhausted;
    let mut iterations = 0;
    let mut solver_failures = 0;

    for iter in 0..config.max_iterations {
        iterations = iter + 1;

        let fv = model_vector(ks, &p, t);
        let r = targets - &fv;
        let res_before = r.norm();

        let jac = jacobian(ks, &p, t);
        let beta = jac.transpose() * &r;
        let mut alpha = jac.transpose() * &jac;
        for d in 0..PARAMS_LEN {
            alpha[(d, d)] *= 1.0 + 1.0 / nu;
        }

        let delta = match alpha.lu().solve(&beta) {
            Some(step) => step,
            None => {
                // Absorbed: keep iterating with a zero step.
                warn!("damped normal equations singular at iteration {iter}; keeping zero step");
                solver_failures += 1;
                DVector::zeros(PARAMS_LEN)
            }
        };

        let p_new = SviParams::new(
            p.a + delta[0],
            p.b + delta[1],
            p.c + delta[2],
            p.rho + delta[3],
            p.eta + delta[4],
        );

        let r_new = targets - &model_vector(ks, &p_new, t);
        let res_after = r_new.norm();

        if res_before <= res_after {
            nu /= 10.0;
        } else {
            nu *= 10.0;
            p = p_new;
        }

        debug!("lm iteration {iter}: residual {res_before:.3e} -> {res_after:.3e}, nu {nu:.1e}");

        if (res_after - res_prev).abs() < config.tolerance {
            status = FitStatus::Converged;
            break;
        }
        res_prev = res_after;
    }

    let nan_fallbacks = p.sanitize();
    let residual_norm = (targets - &model_vector(ks, &p, t)).norm();

    (
        p,
        FitReport {
            status,
            iterations,
            residual_norm,
            solver_failures,
            nan_fallbacks,
        },
    )
}
