// demos/fit_smile.rs

//! Demonstration of SVI smile calibration from strike quotes
//!
//! This example shows how to:
//! 1. Load a quote chain for a single expiry
//! 2. Seed and fit the SVI parameter vector
//! 3. Inspect the fit report
//! 4. Compare fitted implied volatilities with the market quotes

use anyhow::Result;
use smile_lib::{FitConfig, MarketQuote, SviStrikeSmile};

fn main() -> Result<()> {
    println!("SVI Smile Calibration Demo");
    println!("==========================");

    let quotes = demo_quotes();
    let forward_price = 5066.5;
    let t = 0.00194;

    println!("Quotes loaded: {}", quotes.len());
    println!("Forward price: {forward_price:.1}");
    println!("Time to expiry: {t:.5} years");

    println!("\nStep 1: Seeding and fitting...");

    let mut smile = SviStrikeSmile::new(forward_price, t)?;
    smile.init_params(&quotes)?;
    let fitted = smile.fit(&FitConfig::default());

    if let Some(report) = smile.last_report() {
        println!("Fit finished: {:?}", report.status);
        println!("  Iterations:      {}", report.iterations);
        println!("  Residual norm:   {:.6e}", report.residual_norm);
        println!("  Solver failures: {}", report.solver_failures);
    }

    println!("  SVI parameters:");
    println!("    a   (level):      {:.6}", fitted.a);
    println!("    b   (slope):      {:.6}", fitted.b);
    println!("    c   (curvature):  {:.6}", fitted.c);
    println!("    rho (asymmetry):  {:.6}", fitted.rho);
    println!("    eta (shift):      {:.6}", fitted.eta);

    println!("\nStep 2: Repricing the chain with the fitted curve...");
    println!("{:<10} {:<12} {:<12} {:<10}", "Strike", "Market IV", "Model IV", "Diff");
    println!("{}", "-".repeat(46));

    for q in &quotes {
        let model_iv = smile.implied_vol(q.strike_price, &fitted);
        println!(
            "{:<10.0} {:<12.5} {:<12.5} {:<+10.5}",
            q.strike_price,
            q.implied_vol,
            model_iv,
            model_iv - q.implied_vol
        );
    }

    Ok(())
}

fn demo_quotes() -> Vec<MarketQuote> {
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
