//! Expiry payoff formulas.
//!
//! Each function maps an ordered slice of underlying prices to the payoff of
//! one position at those prices. `S` is the underlying price, `K` the strike,
//! `p` the premium and `D` the delivery price.
//!
//! Option formulas round only their linear branch to 2 decimals; the flat
//! branch returns the premium exactly as given. At `S == K` both calls and
//! puts take the flat branch.

use crate::types::{InstrumentSpec, OptionType, PositionSide};

/// Round to 2 decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `-p` for `S <= K`, `(S - K) - p` for `S > K`.
pub fn long_call(prices: &[f64], premium: f64, strike: f64) -> Vec<f64> {
    prices
        .iter()
        .map(|&s| {
            if s <= strike {
                -premium
            } else {
                round2((s - strike) - premium)
            }
        })
        .collect()
}

/// `p` for `S <= K`, `p - (S - K)` for `S > K`.
pub fn short_call(prices: &[f64], premium: f64, strike: f64) -> Vec<f64> {
    prices
        .iter()
        .map(|&s| {
            if s <= strike {
                premium
            } else {
                round2(premium - (s - strike))
            }
        })
        .collect()
}

/// `(K - S) - p` for `S < K`, `-p` for `S >= K`.
pub fn long_put(prices: &[f64], premium: f64, strike: f64) -> Vec<f64> {
    prices
        .iter()
        .map(|&s| {
            if s < strike {
                round2((strike - s) - premium)
            } else {
                -premium
            }
        })
        .collect()
}

/// `p - (K - S)` for `S < K`, `p` for `S >= K`.
pub fn short_put(prices: &[f64], premium: f64, strike: f64) -> Vec<f64> {
    prices
        .iter()
        .map(|&s| {
            if s < strike {
                round2(premium - (strike - s))
            } else {
                premium
            }
        })
        .collect()
}

/// `S - spot`.
pub fn long_stock(prices: &[f64], spot_price: f64) -> Vec<f64> {
    prices.iter().map(|&s| round2(s - spot_price)).collect()
}

/// `spot - S`.
pub fn short_stock(prices: &[f64], spot_price: f64) -> Vec<f64> {
    prices.iter().map(|&s| round2(spot_price - s)).collect()
}

/// `S - D`.
pub fn long_futures(prices: &[f64], delivery_price: f64) -> Vec<f64> {
    prices.iter().map(|&s| round2(s - delivery_price)).collect()
}

/// `D - S`.
pub fn short_futures(prices: &[f64], delivery_price: f64) -> Vec<f64> {
    prices.iter().map(|&s| round2(delivery_price - s)).collect()
}

/// Evaluate the formula matching `spec` at every price in `prices`.
pub fn evaluate(spec: &InstrumentSpec, prices: &[f64]) -> Vec<f64> {
    match *spec {
        InstrumentSpec::Option {
            option_type,
            side,
            premium,
            strike,
        } => match (option_type, side) {
            (OptionType::Call, PositionSide::Long) => long_call(prices, premium, strike),
            (OptionType::Call, PositionSide::Short) => short_call(prices, premium, strike),
            (OptionType::Put, PositionSide::Long) => long_put(prices, premium, strike),
            (OptionType::Put, PositionSide::Short) => short_put(prices, premium, strike),
        },
        InstrumentSpec::Stock { side, spot_price } => match side {
            PositionSide::Long => long_stock(prices, spot_price),
            PositionSide::Short => short_stock(prices, spot_price),
        },
        InstrumentSpec::Futures {
            side,
            delivery_price,
        } => match side {
            PositionSide::Long => long_futures(prices, delivery_price),
            PositionSide::Short => short_futures(prices, delivery_price),
        },
    }
}

/// Closed-form payoff of `spec` at a single price.
pub fn evaluate_at(spec: &InstrumentSpec, price: f64) -> f64 {
    evaluate(spec, &[price])[0]
}
