//! Instrument model: one position, its domain and its payoff curve.

use crate::grid::PriceGridGenerator;
use crate::payoff;
use crate::types::{InstrumentSpec, PriceDomain};
use config::{EngineConfig, SamplingConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sampled payoff curve: `y[i]` is the payoff at price `x[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Curve {
    /// Pair up prices and payoffs.
    ///
    /// Callers uphold `x.len() == y.len()`; every constructor in this crate
    /// derives `y` from `x` element by element.
    pub(crate) fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        debug_assert_eq!(x.len(), y.len());
        Self { x, y }
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// `(price, payoff)` pairs in increasing price order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// True when both curves were sampled on the same prices.
    pub fn shares_grid_with(&self, other: &Curve) -> bool {
        self.x == other.x
    }
}

/// A single position with its current domain and curve.
///
/// Built fresh from an [`InstrumentSpec`]; only [`Instrument::recompute`]
/// mutates it, to move the curve onto a shared domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instrument {
    spec: InstrumentSpec,
    natural_domain: PriceDomain,
    domain: PriceDomain,
    curve: Curve,
    target_price: Option<f64>,
    target_payoff: Option<f64>,
}

impl Instrument {
    /// Build an instrument over its natural domain.
    pub fn new(spec: InstrumentSpec, target_price: Option<f64>, config: &EngineConfig) -> Self {
        let natural_domain = Self::compute_domain(&spec, config);
        let mut instrument = Self {
            spec,
            natural_domain,
            domain: natural_domain,
            curve: Curve::default(),
            target_price,
            target_payoff: None,
        };
        instrument.recompute(natural_domain, &config.sampling);
        instrument
    }

    /// Natural domain of `spec`: the reference price scaled by the configured
    /// multipliers and truncated toward zero.
    pub fn compute_domain(spec: &InstrumentSpec, config: &EngineConfig) -> PriceDomain {
        PriceDomain::from_reference(spec.reference_price(), &config.domain)
    }

    /// Resample over `domain` and re-evaluate the curve and the target payoff.
    ///
    /// Idempotent for the same inputs.
    pub fn recompute(&mut self, domain: PriceDomain, sampling: &SamplingConfig) {
        let x = PriceGridGenerator::sample(domain, sampling);
        let y = payoff::evaluate(&self.spec, &x);

        self.domain = domain;
        self.curve = Curve::new(x, y);
        self.target_payoff = self
            .target_price
            .map(|price| payoff::evaluate_at(&self.spec, price));
    }

    /// Exact closed-form payoff at `price`, independent of the sample grid.
    pub fn payoff_at(&self, price: f64) -> f64 {
        payoff::evaluate_at(&self.spec, price)
    }

    pub fn spec(&self) -> &InstrumentSpec {
        &self.spec
    }

    /// Domain derived from the reference price, before any alignment.
    pub fn natural_domain(&self) -> PriceDomain {
        self.natural_domain
    }

    /// Domain the current curve is sampled over.
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

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} over {}", self.spec, self.domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OptionType, PositionSide};

    fn long_call_40() -> InstrumentSpec {
        InstrumentSpec::option(PositionSide::Long, OptionType::Call, 7.0, 40.0)
    }

    #[test]
    fn test_new_uses_natural_domain() {
        let instrument = Instrument::new(long_call_40(), None, &EngineConfig::default());

        assert_eq!(instrument.natural_domain(), PriceDomain::new(24, 52));
        assert_eq!(instrument.domain(), instrument.natural_domain());
        assert_eq!(instrument.curve().len(), 281);
        assert_eq!(instrument.curve().x().len(), instrument.curve().y().len());
        assert_eq!(instrument.curve().y()[0], -7.0);
        assert_eq!(instrument.curve().y()[280], 5.0);
        assert_eq!(instrument.target_payoff(), None);
    }

    #[test]
    fn test_target_payoff_is_exact() {
        let instrument = Instrument::new(long_call_40(), Some(45.05), &EngineConfig::default());

        // Closed form, not the 45.1 grid sample
        assert_eq!(instrument.target_payoff(), Some(-1.95));
        assert_eq!(instrument.payoff_at(45.05), -1.95);
    }

    #[test]
    fn test_target_outside_domain_still_resolves() {
        let stock = InstrumentSpec::stock(PositionSide::Long, 50.0);
        let instrument = Instrument::new(stock, Some(500.0), &EngineConfig::default());
        assert_eq!(instrument.target_payoff(), Some(450.0));
    }

    #[test]
    fn test_recompute_moves_to_new_domain() {
        let config = EngineConfig::default();
        let mut instrument = Instrument::new(long_call_40(), Some(30.0), &config);

        instrument.recompute(PriceDomain::new(18, 78), &config.sampling);

        assert_eq!(instrument.domain(), PriceDomain::new(18, 78));
        assert_eq!(instrument.natural_domain(), PriceDomain::new(24, 52));
        assert_eq!(instrument.curve().len(), 601);
        assert_eq!(instrument.curve().x()[0], 18.0);
        assert_eq!(*instrument.curve().x().last().unwrap(), 78.0);
        assert_eq!(instrument.target_payoff(), Some(-7.0));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let config = EngineConfig::default();
        let mut instrument = Instrument::new(long_call_40(), Some(41.0), &config);
        let original = instrument.clone();

        instrument.recompute(original.domain(), &config.sampling);
        assert_eq!(instrument, original);

        instrument.recompute(PriceDomain::new(10, 90), &config.sampling);
        instrument.recompute(PriceDomain::new(10, 90), &config.sampling);
        let once = instrument.clone();
        instrument.recompute(PriceDomain::new(10, 90), &config.sampling);
        assert_eq!(instrument, once);
    }

    #[test]
    fn test_curve_points_and_grid_equality() {
        let config = EngineConfig::default();
        let a = Instrument::new(long_call_40(), None, &config);
        let b = Instrument::new(
            InstrumentSpec::option(PositionSide::Long, OptionType::Put, 3.0, 40.0),
            None,
            &config,
        );
        let c = Instrument::new(InstrumentSpec::stock(PositionSide::Long, 60.0), None, &config);

        assert!(a.curve().shares_grid_with(b.curve()));
        assert!(!a.curve().shares_grid_with(c.curve()));

        let (x0, y0) = a.curve().points().next().unwrap();
        assert_eq!((x0, y0), (24.0, -7.0));
        assert_eq!(a.curve().points().count(), a.curve().len());
    }

    #[test]
    fn test_huge_reference_is_capped() {
        let config = EngineConfig::default();
        let instrument = Instrument::new(
            InstrumentSpec::stock(PositionSide::Long, 1e12),
            Some(1e12),
            &config,
        );

        let domain = instrument.domain();
        assert_eq!(instrument.curve().len(), config.sampling.max_segments + 1);
        assert_eq!(instrument.curve().x()[0], domain.min() as f64);
        assert_eq!(*instrument.curve().x().last().unwrap(), domain.max() as f64);
        assert_eq!(instrument.target_payoff(), Some(0.0));
    }

    #[test]
    fn test_negative_reference_keeps_invariant() {
        let spec = InstrumentSpec::futures(PositionSide::Long, -10.0);
        let instrument = Instrument::new(spec, None, &EngineConfig::default());

        assert!(instrument.domain().min() <= instrument.domain().max());
        assert!(instrument.curve().x().windows(2).all(|w| w[0] < w[1]));
    }
}
