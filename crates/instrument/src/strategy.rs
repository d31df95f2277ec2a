//! Built-in strategy presets.

use crate::types::{InstrumentSpec, OptionType, PositionSide};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named multi-leg strategies with fixed example legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyPreset {
    BearPutSpread,
    LongStraddle,
    ShortStrangle,
    Collar,
    ProtectivePut,
}

impl StrategyPreset {
    /// Every preset, in menu order.
    pub fn all() -> [StrategyPreset; 5] {
        [
            StrategyPreset::BearPutSpread,
            StrategyPreset::LongStraddle,
            StrategyPreset::ShortStrangle,
            StrategyPreset::Collar,
            StrategyPreset::ProtectivePut,
        ]
    }

    /// Kebab-case identifier used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            StrategyPreset::BearPutSpread => "bear-put-spread",
            StrategyPreset::LongStraddle => "long-straddle",
            StrategyPreset::ShortStrangle => "short-strangle",
            StrategyPreset::Collar => "collar",
            StrategyPreset::ProtectivePut => "protective-put",
        }
    }

    /// The legs of the preset.
    pub fn specs(&self) -> Vec<InstrumentSpec> {
        use OptionType::{Call, Put};
        use PositionSide::{Long, Short};

        match self {
            StrategyPreset::BearPutSpread => vec![
                InstrumentSpec::option(Short, Put, 2.5, 30.0),
                InstrumentSpec::option(Long, Put, 7.0, 40.0),
            ],
            StrategyPreset::LongStraddle => vec![
                InstrumentSpec::option(Long, Call, 4.0, 55.0),
                InstrumentSpec::option(Long, Put, 5.5, 55.0),
            ],
            StrategyPreset::ShortStrangle => vec![
                InstrumentSpec::option(Short, Call, 2.75, 45.0),
                InstrumentSpec::option(Short, Put, 2.75, 35.0),
            ],
            StrategyPreset::Collar => vec![
                InstrumentSpec::option(Long, Put, 5.0, 50.0),
                InstrumentSpec::option(Short, Call, 5.0, 60.0),
                InstrumentSpec::stock(Long, 55.0),
            ],
            StrategyPreset::ProtectivePut => vec![
                InstrumentSpec::option(Long, Put, 10.0, 62.0),
                InstrumentSpec::stock(Long, 68.0),
            ],
        }
    }
}

impl fmt::Display for StrategyPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for StrategyPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        StrategyPreset::all()
            .into_iter()
            .find(|preset| preset.name() == normalized)
            .ok_or_else(|| {
                format!(
                    "Unknown strategy '{}'. Valid: bear-put-spread, long-straddle, short-strangle, collar, protective-put",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{PayoffService, TargetResolution};
    use crate::types::RowId;
    use config::EngineConfig;

    #[test]
    fn test_names_round_trip() {
        for preset in StrategyPreset::all() {
            assert_eq!(preset.name().parse::<StrategyPreset>(), Ok(preset));
        }
        assert_eq!(
            "Protective Put".parse::<StrategyPreset>(),
            Ok(StrategyPreset::ProtectivePut)
        );
        assert_eq!(
            "bear_put_spread".parse::<StrategyPreset>(),
            Ok(StrategyPreset::BearPutSpread)
        );
        assert!("iron-condor".parse::<StrategyPreset>().is_err());
    }

    #[test]
    fn test_collar_legs() {
        let legs = StrategyPreset::Collar.specs();
        assert_eq!(legs.len(), 3);
        assert_eq!(legs[2], InstrumentSpec::stock(PositionSide::Long, 55.0));
        assert_eq!(
            legs[1],
            InstrumentSpec::option(PositionSide::Short, OptionType::Call, 5.0, 60.0)
        );
    }

    #[test]
    fn test_every_preset_evaluates() {
        let service = PayoffService::new(EngineConfig::default());
        for preset in StrategyPreset::all() {
            let rows: Vec<(RowId, InstrumentSpec)> = preset
                .specs()
                .into_iter()
                .enumerate()
                .map(|(i, spec)| (RowId::new(i.to_string()), spec))
                .collect();

            let snapshot = service.evaluate(&rows, Some(50.0)).unwrap();
            assert!(snapshot.profit_line.is_some(), "{}", preset);
            assert!(matches!(snapshot.target, TargetResolution::Resolved(_)), "{}", preset);
        }
    }
}
