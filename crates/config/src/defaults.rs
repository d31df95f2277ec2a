pub fn default_min_multiplier() -> f64 {
    0.6
}

pub fn default_max_multiplier() -> f64 {
    1.3
}

pub fn default_sampling_tiers() -> Vec<super::SamplingTier> {
    vec![
        super::SamplingTier::bounded(100, 0.1),
        super::SamplingTier::bounded(500, 1.0),
        super::SamplingTier::bounded(1000, 10.0),
        super::SamplingTier::open(20.0),
    ]
}

/// Upper bound on segments per curve; wider domains get a coarser step.
pub fn default_max_segments() -> usize {
    10_000
}

/// Used only when a configuration declares no tiers at all.
pub fn default_fallback_step() -> f64 {
    0.1
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}
