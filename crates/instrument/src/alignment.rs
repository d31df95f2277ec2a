//! Domain alignment.
//!
//! Instruments with different reference prices have different natural
//! domains. Curves can only be summed index by index once every instrument
//! is resampled onto one shared grid, so the working set is moved onto a
//! common `[smallest_min, largest_max]` domain first.

use crate::model::Instrument;
use crate::types::PriceDomain;
use config::SamplingConfig;
use tracing::debug;

/// Largest natural `max` over all instruments, `None` for an empty set.
pub fn largest_max(instruments: &[Instrument]) -> Option<i64> {
    largest_max_of(instruments.iter().map(Instrument::natural_domain))
}

/// Smallest natural `min` among instruments whose own `min` is strictly below
/// `largest_max`; 0 when none qualifies.
///
/// An instrument whose `min` equals `largest_max` does not take part, so a
/// lone degenerate domain `[k, k]` yields 0 rather than `k`.
pub fn smallest_min(instruments: &[Instrument], largest_max: i64) -> i64 {
    smallest_min_of(instruments.iter().map(Instrument::natural_domain), largest_max)
}

pub fn largest_max_of<I>(domains: I) -> Option<i64>
where
    I: IntoIterator<Item = PriceDomain>,
{
    domains.into_iter().map(|domain| domain.max()).max()
}

pub fn smallest_min_of<I>(domains: I, largest_max: i64) -> i64
where
    I: IntoIterator<Item = PriceDomain>,
{
    domains
        .into_iter()
        .map(|domain| domain.min())
        .filter(|&min| min < largest_max)
        .min()
        .unwrap_or(0)
}

/// Shared domain for a working set, `None` when it is empty.
pub fn shared_domain(instruments: &[Instrument]) -> Option<PriceDomain> {
    let max = largest_max(instruments)?;
    let min = smallest_min(instruments, max);
    Some(PriceDomain::new(min, max))
}

/// Move every instrument onto `domain` and recompute its curve.
pub fn align_all(instruments: &mut [Instrument], domain: PriceDomain, sampling: &SamplingConfig) {
    for instrument in instruments.iter_mut() {
        instrument.recompute(domain, sampling);
    }
    debug!("Aligned {} instruments onto {}", instruments.len(), domain);
}

/// Compute the shared domain and align every instrument onto it.
///
/// Returns the domain used, or `None` for an empty working set.
pub fn align(instruments: &mut [Instrument], sampling: &SamplingConfig) -> Option<PriceDomain> {
    let domain = shared_domain(instruments)?;
    align_all(instruments, domain, sampling);
    Some(domain)
}
