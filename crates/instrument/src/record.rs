//! Instrument records: the structured form positions are saved and restored in.
//!
//! A record set is a JSON object keyed by row id:
//!
//! ```json
//! {
//!   "0": { "instrument_type": 1, "option_type": 2, "position": 2, "price": 2.5, "strike": 30 },
//!   "1": { "instrument_type": 2, "position": 1, "price": 55 },
//!   "2": { "instrument_type": 3, "position": 2, "delivery_price": 80 }
//! }
//! ```
//!
//! Rows keep the order they appear in the document.
//!
//! Codes: `instrument_type` 1 = option, 2 = stock, 3 = futures;
//! `option_type` 1 = call, 2 = put; `position` 1 = long, 2 = short.
//! `price` is the premium for options and the spot price for stock.

use crate::error::{InstrumentError, InstrumentResult};
use crate::types::{InstrumentKind, InstrumentSpec, OptionType, PositionSide, RowId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Serialized form of one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentRecord {
    pub instrument_type: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_type: Option<u8>,
    pub position: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_price: Option<f64>,
}

impl InstrumentRecord {
    /// Decode into a spec; `row` only labels errors.
    pub fn to_spec(&self, row: &RowId) -> InstrumentResult<InstrumentSpec> {
        let kind = InstrumentKind::from_code(self.instrument_type)
            .ok_or(InstrumentError::UnknownInstrumentType(self.instrument_type))?;
        let side = PositionSide::from_code(self.position)
            .ok_or(InstrumentError::UnknownPosition(self.position))?;

        let require = |value: Option<f64>, field: &'static str| {
            value.ok_or_else(|| InstrumentError::MissingField {
                row: row.to_string(),
                field,
            })
        };

        let spec = match kind {
            InstrumentKind::Option => {
                let code = self.option_type.ok_or_else(|| InstrumentError::MissingField {
                    row: row.to_string(),
                    field: "option_type",
                })?;
                let option_type =
                    OptionType::from_code(code).ok_or(InstrumentError::UnknownOptionType(code))?;
                InstrumentSpec::option(
                    side,
                    option_type,
                    require(self.price, "price")?,
                    require(self.strike, "strike")?,
                )
            }
            InstrumentKind::Stock => InstrumentSpec::stock(side, require(self.price, "price")?),
            InstrumentKind::Futures => {
                InstrumentSpec::futures(side, require(self.delivery_price, "delivery_price")?)
            }
        };

        Ok(spec)
    }
}

impl From<&InstrumentSpec> for InstrumentRecord {
    fn from(spec: &InstrumentSpec) -> Self {
        let mut record = Self {
            instrument_type: spec.kind().code(),
            option_type: None,
            position: spec.side().code(),
            price: None,
            strike: None,
            delivery_price: None,
        };

        match *spec {
            InstrumentSpec::Option {
                option_type,
                premium,
                strike,
                ..
            } => {
                record.option_type = Some(option_type.code());
                record.price = Some(premium);
                record.strike = Some(strike);
            }
            InstrumentSpec::Stock { spot_price, .. } => record.price = Some(spot_price),
            InstrumentSpec::Futures { delivery_price, .. } => {
                record.delivery_price = Some(delivery_price)
            }
        }

        record
    }
}

impl TryFrom<&InstrumentRecord> for InstrumentSpec {
    type Error = InstrumentError;

    fn try_from(record: &InstrumentRecord) -> Result<Self, Self::Error> {
        record.to_spec(&RowId::new("?"))
    }
}

/// Parse a JSON record set, in document order.
pub fn parse_records(json: &str) -> InstrumentResult<Vec<(RowId, InstrumentSpec)>> {
    let records: Map<String, Value> = serde_json::from_str(json)?;
    debug!("Parsed {} instrument records", records.len());

    records
        .into_iter()
        .map(|(key, value)| {
            let row = RowId::new(key);
            let record: InstrumentRecord = serde_json::from_value(value)?;
            let spec = record.to_spec(&row)?;
            Ok((row, spec))
        })
        .collect()
}

/// Encode specs as a pretty-printed JSON record set, in iteration order.
pub fn to_records_json<'a, I>(specs: I) -> InstrumentResult<String>
where
    I: IntoIterator<Item = (&'a RowId, &'a InstrumentSpec)>,
{
    let mut records = Map::new();
    for (row, spec) in specs {
        records.insert(
            row.to_string(),
            serde_json::to_value(InstrumentRecord::from(spec))?,
        );
    }
    Ok(serde_json::to_string_pretty(&Value::Object(records))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Instrument;
    use assert_matches::assert_matches;
    use config::EngineConfig;

    const SAMPLE: &str = r#"{
        "0": { "instrument_type": 1, "option_type": 2, "position": 2, "price": 2.5, "strike": 30 },
        "1": { "instrument_type": 2, "position": 1, "price": 55 },
        "2": { "instrument_type": 3, "position": 2, "delivery_price": 80 }
    }"#;

    #[test]
    fn test_parse_records() {
        let specs = parse_records(SAMPLE).unwrap();
        assert_eq!(specs.len(), 3);

        assert_eq!(specs[0].0, RowId::new("0"));
        assert_eq!(
            specs[0].1,
            InstrumentSpec::option(PositionSide::Short, OptionType::Put, 2.5, 30.0)
        );
        assert_eq!(specs[1].1, InstrumentSpec::stock(PositionSide::Long, 55.0));
        assert_eq!(specs[2].1, InstrumentSpec::futures(PositionSide::Short, 80.0));
    }

    #[test]
    fn test_rows_keep_document_order() {
        let json = r#"{
            "2": { "instrument_type": 2, "position": 1, "price": 20 },
            "10": { "instrument_type": 2, "position": 1, "price": 100 },
            "1": { "instrument_type": 2, "position": 2, "price": 10 }
        }"#;
        let rows: Vec<String> = parse_records(json)
            .unwrap()
            .into_iter()
            .map(|(row, _)| row.to_string())
            .collect();
        assert_eq!(rows, vec!["2", "10", "1"]);

        let stock = InstrumentSpec::stock(PositionSide::Long, 5.0);
        let (ten, two) = (RowId::new("10"), RowId::new("2"));
        let json = to_records_json([(&ten, &stock), (&two, &stock)]).unwrap();
        let restored = parse_records(&json).unwrap();
        assert_eq!(restored[0].0, ten);
        assert_eq!(restored[1].0, two);
    }

    #[test]
    fn test_record_encoding() {
        let spec = InstrumentSpec::option(PositionSide::Long, OptionType::Call, 4.0, 55.0);
        let record = InstrumentRecord::from(&spec);
        assert_eq!(record.instrument_type, 1);
        assert_eq!(record.option_type, Some(1));
        assert_eq!(record.position, 1);
        assert_eq!(record.price, Some(4.0));
        assert_eq!(record.strike, Some(55.0));
        assert_eq!(record.delivery_price, None);

        let json = serde_json::to_string(&InstrumentRecord::from(&InstrumentSpec::stock(
            PositionSide::Short,
            68.0,
        )))
        .unwrap();
        assert_eq!(json, r#"{"instrument_type":2,"position":2,"price":68.0}"#);
    }

    #[test]
    fn test_restored_instrument_reproduces_curve() {
        let config = EngineConfig::default();
        let original_spec = InstrumentSpec::option(PositionSide::Long, OptionType::Put, 7.0, 40.0);
        let original = Instrument::new(original_spec, Some(33.3), &config);

        let row = RowId::new("a");
        let json = to_records_json([(&row, original.spec())]).unwrap();
        let restored_specs = parse_records(&json).unwrap();
        assert_eq!(restored_specs.len(), 1);

        let mut restored = Instrument::new(restored_specs[0].1, Some(33.3), &config);
        restored.recompute(original.domain(), &config.sampling);

        assert_eq!(restored.curve().y(), original.curve().y());
        assert_eq!(restored.curve().x(), original.curve().x());
        assert_eq!(restored.target_payoff(), original.target_payoff());
    }

    #[test]
    fn test_unknown_codes() {
        let record = InstrumentRecord {
            instrument_type: 9,
            option_type: None,
            position: 1,
            price: Some(1.0),
            strike: None,
            delivery_price: None,
        };
        assert_matches!(
            InstrumentSpec::try_from(&record),
            Err(InstrumentError::UnknownInstrumentType(9))
        );

        let record = InstrumentRecord {
            instrument_type: 2,
            position: 0,
            ..record
        };
        assert_matches!(
            InstrumentSpec::try_from(&record),
            Err(InstrumentError::UnknownPosition(0))
        );

        let record = InstrumentRecord {
            instrument_type: 1,
            option_type: Some(5),
            position: 1,
            strike: Some(10.0),
            ..record
        };
        assert_matches!(
            InstrumentSpec::try_from(&record),
            Err(InstrumentError::UnknownOptionType(5))
        );
    }

    #[test]
    fn test_missing_fields() {
        let json = r#"{ "row-7": { "instrument_type": 1, "option_type": 1, "position": 1, "price": 3 } }"#;
        assert_matches!(
            parse_records(json),
            Err(InstrumentError::MissingField { row, field: "strike" }) if row == "row-7"
        );

        let json = r#"{ "f": { "instrument_type": 3, "position": 1, "price": 3 } }"#;
        assert_matches!(
            parse_records(json),
            Err(InstrumentError::MissingField { field: "delivery_price", .. })
        );
    }

    #[test]
    fn test_malformed_json() {
        assert_matches!(
            parse_records("{ not json"),
            Err(InstrumentError::Serialization(_))
        );
    }
}
