use crate::*;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be a positive finite number, got: {value}")]
    InvalidMultiplier { field: String, value: f64 },

    #[error("min_multiplier ({min}) must not exceed max_multiplier ({max})")]
    InvertedMultipliers { min: f64, max: f64 },

    #[error("At least one sampling tier must be defined")]
    NoSamplingTiers,

    #[error("Sampling tier {index}: step must be a positive finite number, got: {step}")]
    InvalidStep { index: usize, step: f64 },

    #[error("Sampling tier {index}: up_to {up_to} must be greater than the previous tier's {previous}")]
    UnorderedTiers { index: usize, up_to: i64, previous: i64 },

    #[error("Sampling tier {index}: only the last tier may be open-ended")]
    OpenTierNotLast { index: usize },

    #[error("engine.sampling.max_segments must be at least 1")]
    NoSegmentsAllowed,

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &MasterConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_domain(&config.engine.domain, &mut report);
    validate_sampling(&config.engine.sampling, &mut report);
    validate_logging(&config.logging, &mut report);

    report
}

fn validate_domain(domain: &DomainConfig, report: &mut ValidationReport) {
    let mut multipliers_ok = true;

    for (field, value) in [
        ("engine.domain.min_multiplier", domain.min_multiplier),
        ("engine.domain.max_multiplier", domain.max_multiplier),
    ] {
        if !value.is_finite() || value <= 0.0 {
            multipliers_ok = false;
            report.add_error(ValidationError::InvalidMultiplier {
                field: field.to_string(),
                value,
            });
        }
    }

    if multipliers_ok && domain.min_multiplier > domain.max_multiplier {
        report.add_error(ValidationError::InvertedMultipliers {
            min: domain.min_multiplier,
            max: domain.max_multiplier,
        });
    }

    if domain.min_multiplier == default_min_multiplier() {
        report.add_default(
            "engine.domain.min_multiplier",
            &default_min_multiplier().to_string(),
        );
    }
    if domain.max_multiplier == default_max_multiplier() {
        report.add_default(
            "engine.domain.max_multiplier",
            &default_max_multiplier().to_string(),
        );
    }
}

fn validate_sampling(sampling: &SamplingConfig, report: &mut ValidationReport) {
    if sampling.max_segments == 0 {
        report.add_error(ValidationError::NoSegmentsAllowed);
    } else if sampling.max_segments == default_max_segments() {
        report.add_default(
            "engine.sampling.max_segments",
            &default_max_segments().to_string(),
        );
    }

    if sampling.tiers.is_empty() {
        report.add_error(ValidationError::NoSamplingTiers);
        return;
    }

    let last = sampling.tiers.len() - 1;
    let mut previous: Option<i64> = None;

    for (index, tier) in sampling.tiers.iter().enumerate() {
        if !tier.step.is_finite() || tier.step <= 0.0 {
            report.add_error(ValidationError::InvalidStep {
                index,
                step: tier.step,
            });
        }

        match tier.up_to {
            Some(up_to) => {
                if let Some(previous) = previous {
                    if up_to <= previous {
                        report.add_error(ValidationError::UnorderedTiers {
                            index,
                            up_to,
                            previous,
                        });
                    }
                }
                previous = Some(up_to);
            }
            None if index != last => {
                report.add_error(ValidationError::OpenTierNotLast { index });
            }
            None => {}
        }
    }

    if sampling.tiers[last].up_to.is_some() {
        report.add_warning(
            "engine.sampling.tiers",
            "Last tier is bounded; larger domains reuse its step",
        );
    }

    if sampling.tiers == default_sampling_tiers() {
        report.add_default("engine.sampling.tiers", "0.1 / 1 / 10 / 20");
    }
}

fn validate_logging(logging: &LoggingConfig, report: &mut ValidationReport) {
    let valid_formats = ["pretty", "json", "compact"];
    if !valid_formats.contains(&logging.format.to_lowercase().as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(logging.format.clone()));
    }

    if let Some(filter) = &logging.filter {
        if has_unresolved_env_vars(filter) {
            report.add_warning(
                "logging.filter",
                "Contains an unresolved environment variable placeholder",
            );
        }
    }
}
