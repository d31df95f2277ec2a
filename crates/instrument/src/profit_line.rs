//! Aggregate profit line.
//!
//! Sums the curves of an aligned working set into one payoff line and
//! answers point queries on it by nearest-ahead sample lookup.

use crate::error::{InstrumentError, InstrumentResult};
use crate::model::{Curve, Instrument};
use crate::payoff::round2;
use crate::types::PriceDomain;
use serde::Serialize;
use tracing::debug;

/// Sum of two or more aligned instrument curves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitLine {
    domain: PriceDomain,
    curve: Curve,
    target_price: Option<f64>,
    target_payoff: Option<f64>,
}

impl ProfitLine {
    /// Build the line from instruments that already share one domain.
    ///
    /// When `target_price` is given, the payoff at the first sample at or
    /// above it is recorded, rounded to 2 decimals; it stays `None` if the
    /// target lies beyond the domain.
    pub fn build(instruments: &[Instrument], target_price: Option<f64>) -> InstrumentResult<Self> {
        let y = Self::sum(instruments)?;
        let first = &instruments[0];
        let curve = Curve::new(first.curve().x().to_vec(), y);

        let mut line = Self {
            domain: first.domain(),
            curve,
            target_price,
            target_payoff: None,
        };
        line.target_payoff = target_price
            .and_then(|target| line.point_query(target))
            .map(round2);

        debug!(
            instruments = instruments.len(),
            samples = line.curve.len(),
            target_payoff = ?line.target_payoff,
            "Built profit line"
        );

        Ok(line)
    }

    /// Element-wise sum of every instrument's payoffs.
    pub fn sum(instruments: &[Instrument]) -> InstrumentResult<Vec<f64>> {
        if instruments.len() < 2 {
            return Err(InstrumentError::InsufficientInstruments(instruments.len()));
        }

        let reference = instruments[0].curve();
        for (index, instrument) in instruments.iter().enumerate().skip(1) {
            if !instrument.curve().shares_grid_with(reference) {
                return Err(InstrumentError::MisalignedCurves {
                    index,
                    expected: reference.len(),
                    found: instrument.curve().len(),
                });
            }
        }

        let mut total = vec![0.0; reference.len()];
        for instrument in instruments {
            for (acc, payoff) in total.iter_mut().zip(instrument.curve().y()) {
                *acc += payoff;
            }
        }

        Ok(total)
    }

    /// Payoff at the first sample whose price is `>= target`.
    ///
    /// No interpolation: a target between two samples reads the upper one.
    /// Returns `None` when the target is above the whole domain.
    pub fn point_query(&self, target: f64) -> Option<f64> {
        self.curve
            .points()
            .find(|&(price, _)| price >= target)
            .map(|(_, payoff)| payoff)
    }

    pub fn domain(&self) -> PriceDomain {
        self.domain
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn target_price(&self) -> Option<f64> {
        self.target_price
    }

    pub fn target_payoff(&self) -> Option<f64> {
        self.target_payoff
    }
}
