// src/calibration/init.rs

//! Asymptotic initializer for the SVI parameter vector.
//!
//! The seed is derived directly from the two leftmost and two rightmost
//! observations: a straight line through each extreme pair approximates the
//! wing asymptotes of the variance curve, and the five parameters follow in
//! closed form from the two intercept/slope pairs. No optimization is
//! involved; the output is only a starting point for the solver.

use crate::models::svi::params::SviParams;

/// Derives a parameter seed from the wing shape of the observation set.
///
/// `moneyness` and `variance` are the per-observation log-moneyness and
/// total-variance arrays, in ascending moneyness order. Returns `None` when
/// the heuristic cannot represent the data: a run of exactly-equal variances
/// that reaches across the at-the-money boundary (positive moneyness on the
/// left wing, negative on the right), or too few distinct points to fit a
/// wing line. Callers treat `None` as the all-zero seed.
pub fn asymptotic_seed(moneyness: &[f64], variance: &[f64]) -> Option<SviParams> {
    let n = variance.len();
    if n < 2 {
        return None;
    }

    // Skip exactly-equal leading variances; a flat left wing crossing into
    // positive moneyness is not representable by this heuristic.
    let mut i = 0;
    while i + 1 < n && variance[i] == variance[i + 1] {
        if moneyness[i + 1] > 0.0 {
            return None;
        }
        i += 1;
    }
    if i + 1 >= n {
        return None;
    }

    // Same scan from the right wing.
    let mut j = n - 1;
    while j > 0 && variance[j] == variance[j - 1] {
        if moneyness[j - 1] < 0.0 {
            return None;
        }
        j -= 1;
    }
    if j == 0 {
        return None;
    }

    // Left asymptote through the two leftmost usable points. The left slope
    // is forced non-positive.
    let (lx1, lx2, ly1, ly2) = (moneyness[i], moneyness[i + 1], variance[i], variance[i + 1]);
    let al = (lx1 * ly2 - ly1 * lx2) / (lx1 - lx2);
    let bl = -((ly2 - ly1) / (lx2 - lx1)).abs();

    // Right asymptote, slope forced non-negative.
    let (rx1, rx2, ry1, ry2) = (moneyness[j - 1], moneyness[j], variance[j - 1], variance[j]);
    let ar = (rx1 * ry2 - ry1 * rx2) / (rx1 - rx2);
    let br = ((ry2 - ry1) / (rx2 - rx1)).abs();

    let b = (br - bl) / 2.0;
    let mut rho = (bl + br) / (br - bl);
    if rho > 0.99 {
        rho = 0.99;
    } else if rho < -0.99 {
        rho = -0.99;
    }

    let a = al + bl * (-al + ar) / (bl - br);
    let eta = bl * (-al + ar) / (bl - br) / b / (rho - 1.0);

    // c smooths the vertex at the observed minimum variance.
    let mut mini_variance = ry1;
    for &v in variance {
        if mini_variance > v {
            mini_variance = v;
        }
    }
    let mut c = -(-mini_variance + al + bl * (-al + ar) / (bl - br));
    c = c / b / (1.0 - rho * rho).abs().sqrt();

    let mut p = SviParams::new(a, b, c, rho, eta);
    p.sanitize();
    Some(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Symmetric V-shaped variance profile around k = 0.
    fn v_shape() -> (Vec<f64>, Vec<f64>) {
        let moneyness = vec![-0.4, -0.2, 0.0, 0.2, 0.4];
        let variance = vec![0.05, 0.03, 0.01, 0.03, 0.05];
        (moneyness, variance)
    }

    #[test]
    fn seeds_symmetric_smile_with_zero_rho() {
        let (k, v) = v_shape();
        let p = asymptotic_seed(&k, &v).unwrap();
        // bl = -0.1, br = 0.1 -> b = 0.1, rho = 0.
        approx::assert_relative_eq!(p.b, 0.1, epsilon = 1e-12);
        assert_eq!(p.rho, 0.0);
        assert!(p.c.is_finite());
        assert!(p.eta.is_finite());
    }

    #[test]
    fn rho_is_clamped_for_lopsided_wings() {
        // Near-flat right wing pushes the raw rho towards -1.
        let moneyness = vec![-0.2, -0.1, 0.1, 0.2];
        let variance = vec![0.05, 0.03, 0.02, 0.020001];
        let p = asymptotic_seed(&moneyness, &variance).unwrap();
        assert_eq!(p.rho, -0.99);
    }

    #[test]
    fn flat_left_wing_across_atm_aborts() {
        let moneyness = vec![-0.1, 0.1, 0.2, 0.3];
        let variance = vec![0.02, 0.02, 0.03, 0.05];
        assert!(asymptotic_seed(&moneyness, &variance).is_none());
    }

    #[test]
    fn flat_right_wing_across_atm_aborts() {
        let moneyness = vec![-0.3, -0.2, -0.1, 0.1];
        let variance = vec![0.05, 0.03, 0.02, 0.02];
        assert!(asymptotic_seed(&moneyness, &variance).is_none());
    }

    #[test]
    fn fully_flat_profile_aborts() {
        let moneyness = vec![-0.3, -0.2, -0.1];
        let variance = vec![0.02, 0.02, 0.02];
        assert!(asymptotic_seed(&moneyness, &variance).is_none());
    }

    #[test]
    fn single_observation_aborts() {
        assert!(asymptotic_seed(&[0.0], &[0.02]).is_none());
    }

    #[test]
    fn duplicate_moneyness_degenerates_to_zeroed_components() {
        // Identical k values make both line fits divide by zero; the NaN
        // components must come back as exact zeros, not NaN.
        let moneyness = vec![0.0, 0.0];
        let variance = vec![0.02, 0.03];
        let p = asymptotic_seed(&moneyness, &variance).unwrap();
        assert_eq!(p.a, 0.0);
        assert_eq!(p.c, 0.0);
        assert_eq!(p.rho, 0.0);
        assert_eq!(p.eta, 0.0);
        assert!(!p.b.is_nan());
    }
}
