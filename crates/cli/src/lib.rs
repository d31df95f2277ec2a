use clap::{Args, Parser, Subcommand, ValueEnum};
use instrument::StrategyPreset;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "payline")]
#[command(about = "Payline - payoff-at-expiry curves for options, stock and futures")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Log output format (overrides the configuration file)
    #[arg(long, value_enum, global = true, env = "PAYLINE_LOG_FORMAT")]
    pub log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate positions from a JSON record file
    Evaluate {
        /// Path to the JSON record set
        #[arg(short, long)]
        positions: PathBuf,

        #[command(flatten)]
        eval: EvalArgs,
    },

    /// Evaluate a built-in strategy preset
    Preset {
        /// Strategy to evaluate
        #[arg(value_enum)]
        strategy: StrategyArg,

        #[command(flatten)]
        eval: EvalArgs,
    },

    /// Validate configuration without evaluating anything
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "payline.yaml")]
        config: PathBuf,
    },

    /// Initialize a new configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "payline.yaml")]
        output: PathBuf,
    },
}

/// Options shared by every evaluating subcommand.
#[derive(Args, Debug, Clone)]
pub struct EvalArgs {
    /// Path to the configuration file (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Underlying price to read the payoff at
    #[arg(short, long, allow_negative_numbers = true)]
    pub target: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    pub output: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary
    Summary,

    /// Full snapshot as JSON
    Json,
}

/// Command-line handle for a [`StrategyPreset`].
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyArg {
    BearPutSpread,
    LongStraddle,
    ShortStrangle,
    Collar,
    ProtectivePut,
}

impl From<StrategyArg> for StrategyPreset {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::BearPutSpread => StrategyPreset::BearPutSpread,
            StrategyArg::LongStraddle => StrategyPreset::LongStraddle,
            StrategyArg::ShortStrangle => StrategyPreset::ShortStrangle,
            StrategyArg::Collar => StrategyPreset::Collar,
            StrategyArg::ProtectivePut => StrategyPreset::ProtectivePut,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
    Compact,
}

impl LogFormatArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormatArg::Pretty => "pretty",
            LogFormatArg::Json => "json",
            LogFormatArg::Compact => "compact",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_evaluate() {
        let cli = Cli::try_parse_from([
            "payline",
            "evaluate",
            "--positions",
            "rows.json",
            "--target",
            "45.5",
            "--output",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Evaluate { positions, eval } => {
                assert_eq!(positions, PathBuf::from("rows.json"));
                assert_eq!(eval.target, Some(45.5));
                assert_eq!(eval.output, OutputFormat::Json);
                assert_eq!(eval.config, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_preset_with_global_log_format() {
        let cli = Cli::try_parse_from(["payline", "preset", "collar", "--log-format", "compact"])
            .unwrap();

        assert_eq!(cli.log_format, Some(LogFormatArg::Compact));
        match cli.command {
            Commands::Preset { strategy, eval } => {
                assert_eq!(strategy, StrategyArg::Collar);
                assert_eq!(StrategyPreset::from(strategy), StrategyPreset::Collar);
                assert_eq!(eval.output, OutputFormat::Summary);
                assert_eq!(eval.target, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_strategy_values_match_presets() {
        for arg in StrategyArg::value_variants() {
            let value = arg.to_possible_value().unwrap();
            assert_eq!(value.get_name(), StrategyPreset::from(*arg).name());
        }
    }

    #[test]
    fn test_rejects_unknown_strategy() {
        assert!(Cli::try_parse_from(["payline", "preset", "iron-condor"]).is_err());
    }

    #[test]
    fn test_defaults_for_config_paths() {
        let cli = Cli::try_parse_from(["payline", "init"]).unwrap();
        match cli.command {
            Commands::Init { output } => assert_eq!(output, PathBuf::from("payline.yaml")),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
