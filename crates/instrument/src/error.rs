//! Error types for the instrument crate.

use thiserror::Error;

/// Result type alias for instrument operations.
pub type InstrumentResult<T> = Result<T, InstrumentError>;

/// Errors that can occur in instrument operations.
///
/// Payoff formulas never fail; these cover record decoding and the
/// preconditions of profit-line construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// Record carries an instrument type code we do not know.
    #[error("Unknown instrument type code: {0}. Expected 1 (option), 2 (stock) or 3 (futures)")]
    UnknownInstrumentType(u8),

    /// Record carries an option type code we do not know.
    #[error("Unknown option type code: {0}. Expected 1 (call) or 2 (put)")]
    UnknownOptionType(u8),

    /// Record carries a position code we do not know.
    #[error("Unknown position code: {0}. Expected 1 (long) or 2 (short)")]
    UnknownPosition(u8),

    /// A field required by the record's instrument type is absent.
    #[error("Record {row}: missing required field '{field}'")]
    MissingField { row: String, field: &'static str },

    /// A profit line needs at least two instruments.
    #[error("A profit line requires at least 2 instruments, got {0}")]
    InsufficientInstruments(usize),

    /// Instruments must share one sample grid before their curves are summed.
    #[error("Instrument {index} is not aligned: expected {expected} samples over the shared domain, found {found}")]
    MisalignedCurves {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for InstrumentError {
    fn from(err: serde_json::Error) -> Self {
        InstrumentError::Serialization(err.to_string())
    }
}
