//! Price grid generation.
//!
//! Produces the evenly spaced underlying prices a curve is evaluated on. The
//! spacing comes from the configured sampling tiers, chosen by the domain's
//! upper bound. The segment count is capped by `max_segments`, so even huge
//! reference prices yield a bounded curve.

use crate::types::PriceDomain;
use config::SamplingConfig;
use tracing::debug;

/// Evenly spaced price sampler.
///
/// # Example
///
/// ```
/// use config::SamplingConfig;
/// use instrument::{PriceDomain, PriceGridGenerator};
///
/// // Domain [40, 50] with the default tiers uses a 0.1 step: 40.0, 40.1, ..., 50.0
/// let prices = PriceGridGenerator::sample(PriceDomain::new(40, 50), &SamplingConfig::default());
/// assert_eq!(prices.len(), 101);
/// assert_eq!(prices[51], 45.1);
/// ```
pub struct PriceGridGenerator;

impl PriceGridGenerator {
    /// Sample `domain` with the step selected from `sampling`.
    pub fn sample(domain: PriceDomain, sampling: &SamplingConfig) -> Vec<f64> {
        let step = sampling.step_for(domain.max());
        Self::sample_with_step(domain, step, sampling.max_segments)
    }

    /// Sample `domain` at (approximately) `step` spacing, always including
    /// both endpoints.
    ///
    /// The segment count is `round(width / step)`, at most `max_segments`.
    /// When the width is not a multiple of the step, or the cap applies, the
    /// spacing is stretched so the grid still ends exactly on `max`.
    pub fn sample_with_step(domain: PriceDomain, step: f64, max_segments: usize) -> Vec<f64> {
        if domain.min() == domain.max() {
            return vec![domain.min() as f64];
        }

        let width = Self::width(domain);
        let segments = Self::segment_count(width, step, max_segments);

        // Integer numerator keeps 0.1 grids on the nearest representable decimal
        let min = domain.min() as f64;
        let max = domain.max() as f64;
        let n = segments as f64;
        let prices: Vec<f64> = (0..=segments)
            .map(|i| match i {
                0 => min,
                i if i == segments => max,
                i => (min * n + i as f64 * width) / n,
            })
            .collect();

        debug!(
            "Sampled {} prices over {} (step={})",
            prices.len(),
            domain,
            step
        );

        prices
    }

    /// Number of samples `sample` would produce for `domain`.
    pub fn sample_count(domain: PriceDomain, sampling: &SamplingConfig) -> usize {
        if domain.min() == domain.max() {
            1
        } else {
            Self::segment_count(
                Self::width(domain),
                sampling.step_for(domain.max()),
                sampling.max_segments,
            ) + 1
        }
    }

    /// Width in floating point; exact for any domain narrower than 2^53.
    fn width(domain: PriceDomain) -> f64 {
        domain.max() as f64 - domain.min() as f64
    }

    fn segment_count(width: f64, step: f64, max_segments: usize) -> usize {
        let cap = max_segments.max(1);
        if !step.is_finite() || step <= 0.0 {
            return 1;
        }
        // Float-to-int casts saturate, so a huge ratio lands on the cap
        ((width / step).round() as usize).clamp(1, cap)
    }
}
