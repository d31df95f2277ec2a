use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Root of the YAML configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MasterConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings consumed by the payoff engine.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub domain: DomainConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
}

/// Multipliers applied to an instrument's reference price (strike, spot or
/// delivery price) to derive its natural price domain.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct DomainConfig {
    #[serde(default = "default_min_multiplier")]
    pub min_multiplier: f64,
    #[serde(default = "default_max_multiplier")]
    pub max_multiplier: f64,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            min_multiplier: default_min_multiplier(),
            max_multiplier: default_max_multiplier(),
        }
    }
}

/// Sample spacing tiers, selected by the upper bound of the domain being sampled.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SamplingConfig {
    #[serde(default = "default_sampling_tiers")]
    pub tiers: Vec<SamplingTier>,
    /// Cap on the number of segments in one sampled curve.
    #[serde(default = "default_max_segments")]
    pub max_segments: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            tiers: default_sampling_tiers(),
            max_segments: default_max_segments(),
        }
    }
}

impl SamplingConfig {
    /// Step to use for a domain whose upper bound is `domain_max`.
    ///
    /// Tiers are scanned in order; the first tier whose `up_to` is at least
    /// `domain_max` (or which is open-ended) wins. Domains beyond the last
    /// bounded tier reuse the last tier's step.
    pub fn step_for(&self, domain_max: i64) -> f64 {
        self.tiers
            .iter()
            .find(|tier| tier.up_to.map_or(true, |bound| domain_max <= bound))
            .or_else(|| self.tiers.last())
            .map(|tier| tier.step)
            .unwrap_or_else(default_fallback_step)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SamplingTier {
    /// Inclusive upper bound for the domain maximum; `None` means unbounded.
    #[serde(default)]
    pub up_to: Option<i64>,
    pub step: f64,
}

impl SamplingTier {
    pub fn bounded(up_to: i64, step: f64) -> Self {
        Self {
            up_to: Some(up_to),
            step,
        }
    }

    pub fn open(step: f64) -> Self {
        Self { up_to: None, step }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default)]
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            filter: None,
        }
    }
}
