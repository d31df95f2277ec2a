//! Payoff service - evaluates a working set end to end.
//!
//! Every evaluation builds fresh instruments from their specs, aligns them
//! onto one shared domain, sums them into a profit line when there are at
//! least two, and resolves the target price if one was requested.

use crate::alignment;
use crate::analysis::PayoffSummary;
use crate::error::InstrumentResult;
use crate::model::Instrument;
use crate::profit_line::ProfitLine;
use crate::types::{InstrumentSpec, PriceDomain, RowId};
use config::EngineConfig;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Payoff of the working set at the requested target price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "payoff", rename_all = "snake_case")]
pub enum TargetResolution {
    /// No target price was given.
    NotRequested,
    /// Payoff at the target.
    Resolved(f64),
    /// The target lies beyond the shared domain, or there is nothing to evaluate.
    Unresolved,
}

impl TargetResolution {
    pub fn payoff(&self) -> Option<f64> {
        match self {
            TargetResolution::Resolved(payoff) => Some(*payoff),
            _ => None,
        }
    }
}

/// One row of the working set after evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedRow {
    pub row: RowId,
    pub instrument: Instrument,
}

/// Result of evaluating a working set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoffSnapshot {
    /// Shared domain every row was sampled over, `None` for an empty set.
    pub domain: Option<PriceDomain>,
    pub rows: Vec<EvaluatedRow>,
    /// Present when there are at least two rows.
    pub profit_line: Option<ProfitLine>,
    /// Summary of the profit line, or of the single row's curve.
    pub summary: Option<PayoffSummary>,
    pub target_price: Option<f64>,
    pub target: TargetResolution,
}

impl PayoffSnapshot {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn instruments(&self) -> impl Iterator<Item = &Instrument> + '_ {
        self.rows.iter().map(|evaluated| &evaluated.instrument)
    }
}

/// Stateless evaluator over an [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct PayoffService {
    config: EngineConfig,
}

impl PayoffService {
    /// Create a new payoff service.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate `rows` and resolve `target`.
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub fn evaluate(
        &self,
        rows: &[(RowId, InstrumentSpec)],
        target: Option<f64>,
    ) -> InstrumentResult<PayoffSnapshot> {
        let mut instruments: Vec<Instrument> = rows
            .iter()
            .map(|(_, spec)| Instrument::new(*spec, target, &self.config))
            .collect();

        let domain = alignment::align(&mut instruments, &self.config.sampling);

        let profit_line = if instruments.len() >= 2 {
            Some(ProfitLine::build(&instruments, target)?)
        } else {
            None
        };

        let summary = match (&profit_line, instruments.first()) {
            (Some(line), _) => PayoffSummary::from_curve(line.curve()),
            (None, Some(single)) => PayoffSummary::from_curve(single.curve()),
            (None, None) => None,
        };

        let resolution = match target {
            None => TargetResolution::NotRequested,
            Some(_) => {
                let payoff = match (&profit_line, instruments.as_slice()) {
                    (Some(line), _) => line.target_payoff(),
                    (None, [single]) => single.target_payoff(),
                    _ => None,
                };
                payoff.map_or(TargetResolution::Unresolved, TargetResolution::Resolved)
            }
        };

        match domain {
            Some(domain) => info!(
                "Evaluated {} instruments over {} (target: {:?})",
                instruments.len(),
                domain,
                resolution
            ),
            None => debug!("Evaluated an empty working set"),
        }

        let rows = rows
            .iter()
            .zip(instruments)
            .map(|((row, _), instrument)| EvaluatedRow {
                row: row.clone(),
                instrument,
            })
            .collect();

        Ok(PayoffSnapshot {
            domain,
            rows,
            profit_line,
            summary,
            target_price: target,
            target: resolution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OptionType, PositionSide};
    use approx::assert_abs_diff_eq;

    fn rows(specs: &[InstrumentSpec]) -> Vec<(RowId, InstrumentSpec)> {
        specs
            .iter()
            .enumerate()
            .map(|(i, spec)| (RowId::new(i.to_string()), *spec))
            .collect()
    }

    fn bear_put() -> Vec<(RowId, InstrumentSpec)> {
        rows(&[
            InstrumentSpec::option(PositionSide::Short, OptionType::Put, 2.5, 30.0),
            InstrumentSpec::option(PositionSide::Long, OptionType::Put, 7.0, 40.0),
        ])
    }

    #[test]
    fn test_empty_working_set() {
        let service = PayoffService::default();

        let snapshot = service.evaluate(&[], None).unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.domain, None);
        assert_eq!(snapshot.profit_line, None);
        assert_eq!(snapshot.summary, None);
        assert_eq!(snapshot.target, TargetResolution::NotRequested);

        let snapshot = service.evaluate(&[], Some(10.0)).unwrap();
        assert_eq!(snapshot.target, TargetResolution::Unresolved);
    }

    #[test]
    fn test_single_instrument_uses_closed_form() {
        let service = PayoffService::default();
        let rows = rows(&[InstrumentSpec::option(
            PositionSide::Long,
            OptionType::Call,
            7.0,
            40.0,
        )]);

        let snapshot = service.evaluate(&rows, Some(45.05)).unwrap();
        assert_eq!(snapshot.profit_line, None);
        assert_eq!(snapshot.domain, Some(PriceDomain::new(24, 52)));
        assert_eq!(snapshot.target, TargetResolution::Resolved(-1.95));

        // Far outside the domain the closed form still answers
        let snapshot = service.evaluate(&rows, Some(500.0)).unwrap();
        assert_eq!(snapshot.target, TargetResolution::Resolved(453.0));
    }

    #[test]
    fn test_profit_line_target() {
        let service = PayoffService::default();

        let snapshot = service.evaluate(&bear_put(), Some(25.0)).unwrap();
        assert_eq!(snapshot.domain, Some(PriceDomain::new(18, 52)));
        assert_eq!(snapshot.rows.len(), 2);
        assert_eq!(snapshot.rows[1].row, RowId::new("1"));
        assert!(snapshot.instruments().all(|i| i.domain() == PriceDomain::new(18, 52)));

        let payoff = snapshot.target.payoff().unwrap();
        assert_abs_diff_eq!(payoff, 5.5, epsilon = 1e-9);

        let summary = snapshot.summary.unwrap();
        assert_abs_diff_eq!(summary.max_profit, 5.5, epsilon = 1e-9);
        assert_abs_diff_eq!(summary.max_loss, -4.5, epsilon = 1e-9);
    }

    #[test]
    fn test_profit_line_target_is_rounded() {
        let service = PayoffService::default();
        let mut legs = bear_put();
        legs.push((
            RowId::new("2"),
            InstrumentSpec::stock(PositionSide::Long, 33.3),
        ));

        let snapshot = service.evaluate(&legs, Some(36.7)).unwrap();
        assert_eq!(snapshot.target, TargetResolution::Resolved(2.2));
    }

    #[test]
    fn test_extreme_references_degrade_gracefully() {
        let service = PayoffService::default();
        let legs = rows(&[
            InstrumentSpec::futures(PositionSide::Long, -1e19),
            InstrumentSpec::futures(PositionSide::Long, 1e19),
        ]);

        let snapshot = service.evaluate(&legs, None).unwrap();
        assert_eq!(snapshot.domain, Some(PriceDomain::new(i64::MIN, i64::MAX)));

        let cap = service.config().sampling.max_segments + 1;
        assert!(snapshot.instruments().all(|i| i.curve().len() == cap));
        let line = snapshot.profit_line.unwrap();
        assert_eq!(line.curve().len(), cap);
        assert!(line.curve().y().iter().all(|y| y.is_finite()));
    }

    #[test]
    fn test_target_beyond_domain_is_unresolved() {
        let service = PayoffService::default();
        let snapshot = service.evaluate(&bear_put(), Some(80.0)).unwrap();
        assert_eq!(snapshot.target, TargetResolution::Unresolved);
        assert_eq!(snapshot.target.payoff(), None);
    }

    #[test]
    fn test_evaluation_is_fresh_each_time() {
        let service = PayoffService::default();
        let wide = rows(&[
            InstrumentSpec::option(PositionSide::Long, OptionType::Call, 2.0, 40.0),
            InstrumentSpec::option(PositionSide::Long, OptionType::Call, 2.0, 60.0),
        ]);
        let narrow = rows(&[InstrumentSpec::option(
            PositionSide::Long,
            OptionType::Call,
            2.0,
            40.0,
        )]);

        assert_eq!(
            service.evaluate(&wide, None).unwrap().domain,
            Some(PriceDomain::new(24, 78))
        );
        // Removing the wider leg shrinks the domain back
        assert_eq!(
            service.evaluate(&narrow, None).unwrap().domain,
            Some(PriceDomain::new(24, 52))
        );
    }

    #[test]
    fn test_snapshot_serializes() {
        let service = PayoffService::default();
        let snapshot = service.evaluate(&bear_put(), Some(25.0)).unwrap();
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["target"]["status"], "resolved");
        assert_eq!(json["rows"][0]["row"], "0");
        assert!(json["profit_line"]["curve"]["y"].is_array());
    }
}
