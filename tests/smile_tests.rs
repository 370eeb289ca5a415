//! End-to-end calibration tests: quote ingestion, wing seeding, refinement
//! and curve evaluation exercised together through the public API.

use smile_lib::{
    fit_strike_smile, FitConfig, FitStatus, MarketQuote, SmilePoint, SviParams, SviSmile,
    SviStrikeSmile,
};

/// Index-option chain for a single short-dated expiry, quoted as
/// (strike, implied vol) around a forward of 5066.5.
fn benchmark_quotes() -> Vec<MarketQuote> {
    vec![
        MarketQuote { strike_price: 3500.0, implied_vol: 0.31203 },
        MarketQuote { strike_price: 4000.0, implied_vol: 0.25041 },
        MarketQuote { strike_price: 4500.0, implied_vol: 0.19897 },
        MarketQuote { strike_price: 5000.0, implied_vol: 0.15795 },
        MarketQuote { strike_price: 5500.0, implied_vol: 0.13803 },
        MarketQuote { strike_price: 6000.0, implied_vol: 0.14575 },
        MarketQuote { strike_price: 6400.0, implied_vol: 0.17007 },
    ]
}

const BENCHMARK_FORWARD: f64 = 5066.5;
const BENCHMARK_T: f64 = 0.00194;

#[test]
fn benchmark_chain_reprices_near_the_quotes() {
    let mut smile = SviStrikeSmile::new(BENCHMARK_FORWARD, BENCHMARK_T).unwrap();
    smile.init_params(&benchmark_quotes()).unwrap();
    let fitted = smile.fit(&FitConfig::default());

    let report = smile.last_report().unwrap();
    assert_ne!(report.status, FitStatus::SkippedDegenerateSeed);
    assert!(report.iterations <= 25);

    for v in [fitted.a, fitted.b, fitted.c, fitted.rho, fitted.eta] {
        assert!(v.is_finite(), "non-finite fitted parameter: {fitted:?}");
    }

    let atm = smile.implied_vol(5000.0, &fitted);
    assert!(
        (atm - 0.15795).abs() < 0.01,
        "fitted vol at 5000 drifted to {atm}"
    );
}

#[test]
fn zero_noise_chain_converges_from_the_wing_seed() {
    let truth = SviParams::new(0.02, 0.5, 0.1, -0.4, 0.1);
    let (forward, t) = (100.0, 0.5);

    let mut quotes = Vec::new();
    let mut k: f64 = -1.6;
    while k <= 1.6 + 1e-12 {
        quotes.push(MarketQuote {
            strike_price: forward * k.exp(),
            implied_vol: truth.implied_vol(k, t),
        });
        k += 0.2;
    }

    let mut smile = SviStrikeSmile::new(forward, t).unwrap();
    smile.init_params(&quotes).unwrap();
    smile.fit(&FitConfig::default());

    let report = smile.last_report().unwrap();
    assert!(
        report.residual_norm < 1e-6,
        "residual norm {} after {} iterations",
        report.residual_norm,
        report.iterations
    );
}

#[test]
fn flat_chain_skips_the_solver_with_zero_params() {
    let quotes: Vec<MarketQuote> = [4500.0, 5000.0, 5500.0, 6000.0]
        .iter()
        .map(|&strike_price| MarketQuote { strike_price, implied_vol: 0.2 })
        .collect();

    let mut smile = SviStrikeSmile::new(BENCHMARK_FORWARD, BENCHMARK_T).unwrap();
    smile.init_params(&quotes).unwrap();
    let fitted = smile.fit(&FitConfig::default());

    let report = smile.last_report().unwrap();
    assert_eq!(report.status, FitStatus::SkippedDegenerateSeed);
    assert_eq!(report.iterations, 0);
    assert_eq!(
        (fitted.a, fitted.b, fitted.c, fitted.eta),
        (0.0, 0.0, 0.0, 0.0)
    );
}

#[test]
fn log_moneyness_chain_fits_to_finite_params() {
    let points: Vec<SmilePoint> = benchmark_quotes()
        .iter()
        .map(|q| {
            SmilePoint::new(
                (q.strike_price / BENCHMARK_FORWARD).ln(),
                q.implied_vol * q.implied_vol * BENCHMARK_T,
            )
        })
        .collect();

    let mut smile = SviSmile::new(BENCHMARK_T).unwrap();
    smile.init_params(&points).unwrap();
    let fitted = smile.fit(&FitConfig::default());

    assert!(smile.last_report().is_some());
    for v in [fitted.a, fitted.b, fitted.c, fitted.rho, fitted.eta] {
        assert!(v.is_finite(), "non-finite fitted parameter: {fitted:?}");
    }

    let w = smile.total_variance(0.0, &fitted);
    assert!(w.is_finite());
}

#[test]
fn boundary_extrapolation_takes_over_outside_the_fitted_domain() {
    let points: Vec<SmilePoint> = benchmark_quotes()
        .iter()
        .map(|q| {
            SmilePoint::new(
                (q.strike_price / BENCHMARK_FORWARD).ln(),
                q.implied_vol * q.implied_vol * BENCHMARK_T,
            )
        })
        .collect();

    let mut smile = SviSmile::new(BENCHMARK_T).unwrap();
    smile.init_params(&points).unwrap();
    let fitted = smile.fit(&FitConfig::default());

    let k_right = points.last().unwrap().k;
    smile.set_right_boundary(k_right, 0.05);

    let expected = (fitted.total_variance(k_right) / BENCHMARK_T
        + (k_right + 0.3 - k_right) * 0.05)
        .abs()
        .sqrt();
    let outside = smile.implied_vol(k_right + 0.3, &fitted);
    assert!((outside - expected).abs() < 1e-12);

    // Queries at or inside the boundary still come from the curve.
    let at = smile.implied_vol(k_right, &fitted);
    assert_eq!(at, fitted.implied_vol(k_right, BENCHMARK_T));

    smile.remove_right_boundary();
    let after = smile.implied_vol(k_right + 0.3, &fitted);
    assert_eq!(after, fitted.implied_vol(k_right + 0.3, BENCHMARK_T));
}

#[test]
fn partial_toml_config_drives_a_fit() {
    let config = FitConfig::from_toml_str("max_iterations = 40\ntolerance = 1e-10\n").unwrap();
    assert_eq!(config.max_iterations, 40);
    assert_eq!(config.tolerance, 1e-10);
    assert_eq!(config.initial_nu, 1000.0);

    let (fitted, report) =
        fit_strike_smile(&benchmark_quotes(), BENCHMARK_FORWARD, BENCHMARK_T, &config).unwrap();
    assert!(report.iterations <= 40);
    assert!(fitted.a.is_finite());
}

#[test]
fn convenience_entry_point_matches_the_context_api() {
    let config = FitConfig::default();
    let (via_fn, _) =
        fit_strike_smile(&benchmark_quotes(), BENCHMARK_FORWARD, BENCHMARK_T, &config).unwrap();

    let mut smile = SviStrikeSmile::new(BENCHMARK_FORWARD, BENCHMARK_T).unwrap();
    smile.init_params(&benchmark_quotes()).unwrap();
    let via_ctx = smile.fit(&config);

    assert_eq!(via_fn, via_ctx);
}

#[test]
fn empty_inputs_are_rejected() {
    let mut smile = SviStrikeSmile::new(100.0, 0.5).unwrap();
    assert!(smile.init_params(&[]).is_err());

    let mut k_smile = SviSmile::new(0.5).unwrap();
    assert!(k_smile.init_params(&[]).is_err());

    assert!(SviStrikeSmile::new(-100.0, 0.5).is_err());
    assert!(SviStrikeSmile::new(100.0, 0.0).is_err());
}
