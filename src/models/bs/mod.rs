// A Black-Scholes helper used as an external collaborator of the smile
// engine: callers typically derive log-moneyness and total variance from
// strike/forward/implied-vol triples computed here. It shares no state with
// the calibration context.

/// European option direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Call,
    Put,
}

#[allow(non_snake_case)]
fn norm_cdf(x: f64) -> f64 {
    // 0.5 * [1 + erf(x / sqrt(2))]
    0.5 * (1.0 + libm::erf(x / (2.0_f64).sqrt()))
}

fn norm_pdf(x: f64) -> f64 {
    (-(x * x) / 2.0).exp() / (2.0 * std::f64::consts::PI).sqrt()
}

#[allow(non_snake_case)]
fn d1_d2(S: f64, K: f64, r: f64, q: f64, T: f64, sigma: f64) -> (f64, f64) {
    let d1 = ((S / K).ln() + (r - q + 0.5 * sigma.powi(2)) * T) / (sigma * T.sqrt());
    (d1, d1 - sigma * T.sqrt())
}

/// Price of a European call option under Black-Scholes assumptions.
#[allow(non_snake_case)]
pub fn bs_call_price(S: f64, K: f64, r: f64, q: f64, T: f64, sigma: f64) -> f64 {
    if T <= 0.0 || sigma <= 0.0 {
        return (S * (-q * T).exp() - K * (-r * T).exp()).max(0.0);
    }
    let (d1, d2) = d1_d2(S, K, r, q, T, sigma);
    S * (-q * T).exp() * norm_cdf(d1) - K * (-r * T).exp() * norm_cdf(d2)
}

/// Price of a European put option under Black-Scholes assumptions.
#[allow(non_snake_case)]
pub fn bs_put_price(S: f64, K: f64, r: f64, q: f64, T: f64, sigma: f64) -> f64 {
    if T <= 0.0 || sigma <= 0.0 {
        return (K * (-r * T).exp() - S * (-q * T).exp()).max(0.0);
    }
    let (d1, d2) = d1_d2(S, K, r, q, T, sigma);
    let nd1m = 1.0 - norm_cdf(d1);
    let nd2m = 1.0 - norm_cdf(d2);
    K * (-r * T).exp() * nd2m - S * (-q * T).exp() * nd1m
}

#[allow(non_snake_case)]
pub fn bs_price(kind: OptionKind, S: f64, K: f64, r: f64, q: f64, T: f64, sigma: f64) -> f64 {
    match kind {
        OptionKind::Call => bs_call_price(S, K, r, q, T, sigma),
        OptionKind::Put => bs_put_price(S, K, r, q, T, sigma),
    }
}

const IV_MAX_STEPS: usize = 100;
const IV_PRICE_EPSILON: f64 = 1e-6;

/// Implied volatility by bracketed bisection on `[iv_min, iv_max]`.
///
/// The first five refinements interpolate linearly between the bracket
/// prices; after that the bracket is halved. Quotes below the price
/// tolerance return zero, and quotes outside the bracket prices return the
/// corresponding bracket edge.
#[allow(non_snake_case)]
pub fn implied_vol_bisection(
    kind: OptionKind,
    S: f64,
    K: f64,
    r: f64,
    q: f64,
    T: f64,
    option_price: f64,
    iv_min: f64,
    iv_max: f64,
) -> f64 {
    let (mut iv_min, mut iv_max) = (iv_min, iv_max);

    if option_price < IV_PRICE_EPSILON {
        return 0.0;
    }

    let mut op_max = bs_price(kind, S, K, r, q, T, iv_max);
    if option_price > op_max - IV_PRICE_EPSILON {
        return iv_max;
    }
    let mut op_min = bs_price(kind, S, K, r, q, T, iv_min);
    if option_price < op_min + IV_PRICE_EPSILON {
        return iv_min;
    }

    let mut steps = 0;
    let mut iv = (iv_max + iv_min) / 2.0;
    let mut op = bs_price(kind, S, K, r, q, T, iv);
    while (option_price - op).abs() > IV_PRICE_EPSILON && steps < IV_MAX_STEPS {
        steps += 1;

        if op < option_price {
            iv_min = iv;
            op_min = bs_price(kind, S, K, r, q, T, iv_min);
        } else {
            iv_max = iv;
            op_max = bs_price(kind, S, K, r, q, T, iv_max);
        }

        if steps > 5 {
            iv = (iv_max + iv_min) / 2.0;
        } else {
            iv = iv_min + (option_price - op_min) * (iv_max - iv_min) / (op_max - op_min);
        }
        op = bs_price(kind, S, K, r, q, T, iv);
    }
    iv
}

/// Delta: option price sensitivity to the underlying.
#[allow(non_snake_case)]
pub fn delta(kind: OptionKind, S: f64, K: f64, r: f64, q: f64, T: f64, sigma: f64) -> f64 {
    let (d1, _) = d1_d2(S, K, r, q, T, sigma);
    match kind {
        OptionKind::Call => (-q * T).exp() * norm_cdf(d1),
        OptionKind::Put => (-q * T).exp() * (norm_cdf(d1) - 1.0),
    }
}

/// Gamma: delta sensitivity to the underlying.
#[allow(non_snake_case)]
pub fn gamma(S: f64, K: f64, r: f64, q: f64, T: f64, sigma: f64) -> f64 {
    let (d1, _) = d1_d2(S, K, r, q, T, sigma);
    (-q * T).exp() * norm_pdf(d1) / (S * sigma * T.sqrt())
}

/// Vega per 1% volatility move.
#[allow(non_snake_case)]
pub fn vega(S: f64, K: f64, r: f64, q: f64, T: f64, sigma: f64) -> f64 {
    let (d1, _) = d1_d2(S, K, r, q, T, sigma);
    S * (-q * T).exp() * T.sqrt() * norm_pdf(d1) / 100.0
}

/// Theta per calendar day.
#[allow(non_snake_case)]
pub fn theta(kind: OptionKind, S: f64, K: f64, r: f64, q: f64, T: f64, sigma: f64) -> f64 {
    let (d1, d2) = d1_d2(S, K, r, q, T, sigma);
    let decay = -S * (-q * T).exp() * sigma / (2.0 * T.sqrt()) * norm_pdf(d1);
    match kind {
        OptionKind::Call => {
            (decay - r * K * (-r * T).exp() * norm_cdf(d2) + q * S * (-q * T).exp() * norm_cdf(d1))
                / 365.0
        }
        OptionKind::Put => {
            (decay + r * K * (-r * T).exp() * norm_cdf(-d2)
                - q * S * (-q * T).exp() * norm_cdf(-d1))
                / 365.0
        }
    }
}

/// Rho per 1% rate move.
#[allow(non_snake_case)]
pub fn rho(kind: OptionKind, S: f64, K: f64, r: f64, q: f64, T: f64, sigma: f64) -> f64 {
    let (_, d2) = d1_d2(S, K, r, q, T, sigma);
    match kind {
        OptionKind::Call => T * K * (-r * T).exp() * norm_cdf(d2) / 100.0,
        OptionKind::Put => -T * K * (-r * T).exp() * norm_cdf(-d2) / 100.0,
    }
}
