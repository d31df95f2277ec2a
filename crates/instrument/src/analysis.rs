//! Curve analysis: breakeven prices and payoff extremes.

use crate::model::Curve;
use crate::payoff::round2;
use crate::types::{InstrumentSpec, OptionType};
use serde::{Deserialize, Serialize};

/// Underlying price at which a single position neither gains nor loses.
///
/// Call: strike + premium. Put: strike - premium. Stock and futures break
/// even at their own reference price.
pub fn instrument_breakeven(spec: &InstrumentSpec) -> f64 {
    match *spec {
        InstrumentSpec::Option {
            option_type: OptionType::Call,
            premium,
            strike,
            ..
        } => strike + premium,
        InstrumentSpec::Option {
            option_type: OptionType::Put,
            premium,
            strike,
            ..
        } => strike - premium,
        InstrumentSpec::Stock { spot_price, .. } => spot_price,
        InstrumentSpec::Futures { delivery_price, .. } => delivery_price,
    }
}

/// Prices where a sampled curve reaches zero.
///
/// Zero samples are reported as-is, a run of consecutive zeros once at its
/// first price. A sign change between two non-zero samples is located by
/// linear interpolation and rounded to 2 decimals.
pub fn breakeven_points(curve: &Curve) -> Vec<f64> {
    let mut points = Vec::new();
    let mut previous: Option<(f64, f64)> = None;

    for (price, payoff) in curve.points() {
        if payoff == 0.0 {
            if !matches!(previous, Some((_, p)) if p == 0.0) {
                points.push(price);
            }
        } else if let Some((prev_price, prev_payoff)) = previous {
            if prev_payoff != 0.0 && prev_payoff.signum() != payoff.signum() {
                let crossing =
                    prev_price + (0.0 - prev_payoff) * (price - prev_price) / (payoff - prev_payoff);
                points.push(round2(crossing));
            }
        }
        previous = Some((price, payoff));
    }

    points
}

/// Extremes and breakevens of a curve over its sampled domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffSummary {
    /// Highest sampled payoff.
    pub max_profit: f64,
    /// Lowest sampled payoff (negative when the position can lose).
    pub max_loss: f64,
    pub breakevens: Vec<f64>,
}

impl PayoffSummary {
    /// Summarize `curve`, `None` when it has no samples.
    pub fn from_curve(curve: &Curve) -> Option<Self> {
        if curve.is_empty() {
            return None;
        }

        let y = curve.y();
        let max_profit = y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let max_loss = y.iter().copied().fold(f64::INFINITY, f64::min);

        Some(Self {
            max_profit,
            max_loss,
            breakevens: breakeven_points(curve),
        })
    }
}
