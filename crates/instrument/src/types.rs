//! Core domain types for instruments.
//!
//! - `RowId`: identifies a position row in the caller's working set
//! - `PositionSide`: Long or Short
//! - `OptionType`: Call or Put
//! - `InstrumentKind` / `InstrumentSpec`: what a position is and its parameters
//! - `PriceDomain`: integer price range a curve is sampled over

use config::DomainConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a row in the working set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowId(String);

impl RowId {
    /// Create a new row ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new unique row ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Direction of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    /// Bought: pays the premium / benefits from a rising price.
    Long,
    /// Sold: receives the premium / benefits from a falling price.
    Short,
}

impl PositionSide {
    /// Record code: 1 = long, 2 = short.
    pub fn code(&self) -> u8 {
        match self {
            PositionSide::Long => 1,
            PositionSide::Short => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PositionSide::Long),
            2 => Some(PositionSide::Short),
            _ => None,
        }
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionSide::Long => write!(f, "Long"),
            PositionSide::Short => write!(f, "Short"),
        }
    }
}

/// Type of option: Call or Put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Call option - right to buy at strike price.
    Call,
    /// Put option - right to sell at strike price.
    Put,
}

impl OptionType {
    /// Record code: 1 = call, 2 = put.
    pub fn code(&self) -> u8 {
        match self {
            OptionType::Call => 1,
            OptionType::Put => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(OptionType::Call),
            2 => Some(OptionType::Put),
            _ => None,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

/// Instrument variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKind {
    Option,
    Stock,
    Futures,
}

impl InstrumentKind {
    /// Record code: 1 = option, 2 = stock, 3 = futures.
    pub fn code(&self) -> u8 {
        match self {
            InstrumentKind::Option => 1,
            InstrumentKind::Stock => 2,
            InstrumentKind::Futures => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(InstrumentKind::Option),
            2 => Some(InstrumentKind::Stock),
            3 => Some(InstrumentKind::Futures),
            _ => None,
        }
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentKind::Option => write!(f, "Option"),
            InstrumentKind::Stock => write!(f, "Stock"),
            InstrumentKind::Futures => write!(f, "Futures"),
        }
    }
}

/// Fully specified position definition.
///
/// Prices are not validated: negative or otherwise nonsensical values still
/// produce a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InstrumentSpec {
    Option {
        option_type: OptionType,
        side: PositionSide,
        premium: f64,
        strike: f64,
    },
    Stock {
        side: PositionSide,
        spot_price: f64,
    },
    Futures {
        side: PositionSide,
        delivery_price: f64,
    },
}

impl InstrumentSpec {
    pub fn option(side: PositionSide, option_type: OptionType, premium: f64, strike: f64) -> Self {
        InstrumentSpec::Option {
            option_type,
            side,
            premium,
            strike,
        }
    }

    pub fn stock(side: PositionSide, spot_price: f64) -> Self {
        InstrumentSpec::Stock { side, spot_price }
    }

    pub fn futures(side: PositionSide, delivery_price: f64) -> Self {
        InstrumentSpec::Futures {
            side,
            delivery_price,
        }
    }

    pub fn kind(&self) -> InstrumentKind {
        match self {
            InstrumentSpec::Option { .. } => InstrumentKind::Option,
            InstrumentSpec::Stock { .. } => InstrumentKind::Stock,
            InstrumentSpec::Futures { .. } => InstrumentKind::Futures,
        }
    }

    pub fn side(&self) -> PositionSide {
        match *self {
            InstrumentSpec::Option { side, .. }
            | InstrumentSpec::Stock { side, .. }
            | InstrumentSpec::Futures { side, .. } => side,
        }
    }

    /// Price the natural domain is derived from: strike for options, spot for
    /// stock, delivery price for futures.
    pub fn reference_price(&self) -> f64 {
        match *self {
            InstrumentSpec::Option { strike, .. } => strike,
            InstrumentSpec::Stock { spot_price, .. } => spot_price,
            InstrumentSpec::Futures { delivery_price, .. } => delivery_price,
        }
    }
}

impl fmt::Display for InstrumentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentSpec::Option {
                option_type,
                side,
                premium,
                strike,
            } => write!(f, "{} {} {} @ {}", side, option_type, premium, strike),
            InstrumentSpec::Stock { side, spot_price } => {
                write!(f, "{} Stock @ {}", side, spot_price)
            }
            InstrumentSpec::Futures {
                side,
                delivery_price,
            } => write!(f, "{} Futures @ {}", side, delivery_price),
        }
    }
}

/// Integer price range `[min, max]` a curve is sampled over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceDomain {
    min: i64,
    max: i64,
}

impl PriceDomain {
    /// Create a domain; bounds are ordered so that `min <= max` always holds.
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Natural domain of a reference price: both multiplied bounds are
    /// truncated toward zero, not rounded.
    pub fn from_reference(reference_price: f64, config: &DomainConfig) -> Self {
        let min = (reference_price * config.min_multiplier) as i64;
        let max = (reference_price * config.max_multiplier) as i64;
        Self::new(min, max)
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// `max - min`, saturating at `i64::MAX` for domains wider than that.
    pub fn width(&self) -> i64 {
        self.max.saturating_sub(self.min)
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min as f64 && price <= self.max as f64
    }
}

impl fmt::Display for PriceDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
