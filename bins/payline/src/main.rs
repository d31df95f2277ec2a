//! Payline CLI Binary
//!
//! Entry point for the payline tool. Loads positions from a record file or a
//! built-in preset, evaluates them and prints the resulting payoff summary.

use anyhow::{Context, Result};
use cli::{Cli, Commands, EvalArgs, OutputFormat};
use config::{
    generate_default_config, load_config, load_config_or_default, save_config, validate_config,
    MasterConfig,
};
use instrument::{
    parse_records, InstrumentSpec, PayoffService, PayoffSnapshot, RowId, StrategyPreset,
    TargetResolution,
};
use observability::{init_logging_with_filter, LogFormat};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Evaluate { positions, eval } => {
            let config = load_config_or_default(eval.config.as_ref())?;
            init_logging_for(cli.log_format, Some(&config))?;
            info!("Executing 'evaluate' command");

            let json = fs::read_to_string(&positions)
                .with_context(|| format!("Failed to read positions file: {:?}", positions))?;
            let rows = parse_records(&json)
                .with_context(|| format!("Failed to parse positions file: {:?}", positions))?;
            evaluate_command(&config, &rows, &eval)
        }
        Commands::Preset { strategy, eval } => {
            let config = load_config_or_default(eval.config.as_ref())?;
            init_logging_for(cli.log_format, Some(&config))?;
            info!("Executing 'preset' command");

            let preset = StrategyPreset::from(strategy);
            let rows: Vec<(RowId, InstrumentSpec)> = preset
                .specs()
                .into_iter()
                .enumerate()
                .map(|(index, spec)| (RowId::new(index.to_string()), spec))
                .collect();

            if eval.output == OutputFormat::Summary {
                println!("Strategy: {}", preset);
            }
            evaluate_command(&config, &rows, &eval)
        }
        Commands::Validate { config } => {
            init_logging_for(cli.log_format, None)?;
            info!("Executing 'validate' command");
            validate_command(config)
        }
        Commands::Init { output } => {
            init_logging_for(cli.log_format, None)?;
            info!("Executing 'init' command");
            init_command(output)
        }
    }
}

/// Command-line format wins over the configured one.
fn init_logging_for(
    format_override: Option<cli::LogFormatArg>,
    config: Option<&MasterConfig>,
) -> Result<()> {
    let configured = config.map(|config| config.logging.format.as_str());
    let format = format_override
        .map(|arg| arg.as_str())
        .or(configured)
        .and_then(LogFormat::parse)
        .unwrap_or(LogFormat::Pretty);
    let filter = config.and_then(|config| config.logging.filter.as_deref());

    init_logging_with_filter("payline", format, filter)
}

fn evaluate_command(
    config: &MasterConfig,
    rows: &[(RowId, InstrumentSpec)],
    eval: &EvalArgs,
) -> Result<()> {
    let report = validate_config(config);
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message);
    }
    if !report.is_valid() {
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot evaluate due to configuration errors");
    }

    debug!(rows = rows.len(), target = ?eval.target, "Evaluating working set");
    let service = PayoffService::new(config.engine.clone());
    let snapshot = service.evaluate(rows, eval.target)?;

    match eval.output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&snapshot)
                .context("Failed to serialize payoff snapshot")?;
            println!("{}", json);
        }
        OutputFormat::Summary => print_summary(&snapshot),
    }

    Ok(())
}

fn print_summary(snapshot: &PayoffSnapshot) {
    println!("\n=== Payoff Summary ===\n");

    if snapshot.is_empty() {
        println!("No positions to evaluate.");
        return;
    }

    if let Some(domain) = snapshot.domain {
        println!("Shared domain: {}", domain);
    }
    println!();

    println!("Positions ({}):", snapshot.rows.len());
    for evaluated in &snapshot.rows {
        let instrument = &evaluated.instrument;
        println!(
            "  [{}] {} (natural {}, {} samples)",
            evaluated.row,
            instrument.spec(),
            instrument.natural_domain(),
            instrument.curve().len()
        );
    }
    println!();

    if let Some(summary) = &snapshot.summary {
        let label = if snapshot.profit_line.is_some() {
            "Profit line"
        } else {
            "Payoff"
        };
        println!("{}:", label);
        println!("  Max profit: {:.2}", summary.max_profit);
        println!("  Max loss:   {:.2}", summary.max_loss);
        if summary.breakevens.is_empty() {
            println!("  Breakevens: none in domain");
        } else {
            let breakevens: Vec<String> = summary
                .breakevens
                .iter()
                .map(|price| format!("{:.2}", price))
                .collect();
            println!("  Breakevens: {}", breakevens.join(", "));
        }
        println!();
    }

    match (snapshot.target_price, snapshot.target) {
        (Some(price), TargetResolution::Resolved(payoff)) => {
            println!("Payoff at {}: {:.2}", price, payoff)
        }
        (Some(price), _) => println!("Payoff at {}: outside the evaluated domain", price),
        (None, _) => {}
    }
}

fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!(
        "Domain multipliers: {} .. {}",
        config.engine.domain.min_multiplier, config.engine.domain.max_multiplier
    );
    println!("Sampling tiers: {}", config.engine.sampling.tiers.len());
    println!("Log format: {}", config.logging.format);

    Ok(())
}

fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Adjust the domain multipliers and sampling tiers");
    println!(
        "  2. Run 'payline validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  3. Run 'payline preset collar --config {:?}' to try it out",
        output_path
    );

    Ok(())
}
