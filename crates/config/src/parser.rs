use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MasterConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    parse_config(&content)
}

/// Parse configuration text after environment variable substitution.
pub fn parse_config(content: &str) -> Result<MasterConfig> {
    let substituted = substitution::substitute_env_vars(content)?;
    debug!("Environment variable substitution completed");

    // An empty file is a valid "all defaults" configuration
    if substituted.trim().is_empty() {
        return Ok(MasterConfig::default());
    }

    let config: MasterConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    info!("Configuration loaded successfully");
    Ok(config)
}

/// Load the file at `path` if one was given, otherwise fall back to defaults.
pub fn load_config_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<MasterConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            debug!("No configuration file given, using defaults");
            Ok(generate_default_config())
        }
    }
}

#[instrument]
pub fn generate_default_config() -> MasterConfig {
    MasterConfig {
        engine: EngineConfig {
            domain: DomainConfig::default(),
            sampling: SamplingConfig::default(),
        },
        logging: LoggingConfig::default(),
    }
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &MasterConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payline.yaml");

        let mut config = generate_default_config();
        config.engine.domain.max_multiplier = 1.5;
        config.logging.format = "compact".to_string();

        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(dir.path().join("missing.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_content_is_default() {
        let config = parse_config("   \n").unwrap();
        assert_eq!(config, generate_default_config());
    }

    #[test]
    fn test_malformed_yaml_fails() {
        assert!(parse_config("engine: [unclosed").is_err());
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = load_config_or_default(None::<&Path>).unwrap();
        assert_eq!(config, generate_default_config());
    }
}
