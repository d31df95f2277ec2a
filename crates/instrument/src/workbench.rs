//! Working set of editable position rows.
//!
//! The workbench owns the caller-side state an interactive front end needs:
//! rows as typed (possibly incomplete), which row is selected, and the global
//! target price. Every change re-evaluates the complete rows through
//! [`PayoffService`] and hands the fresh snapshot to registered listeners.

use crate::analysis::instrument_breakeven;
use crate::error::InstrumentResult;
use crate::record::{parse_records, to_records_json};
use crate::service::{PayoffService, PayoffSnapshot};
use crate::types::{InstrumentKind, InstrumentSpec, OptionType, PositionSide, RowId};
use config::EngineConfig;
use tracing::{debug, info};

/// A row as entered, before validation.
///
/// Numeric fields hold raw text; `price` is the premium for options and the
/// spot price for stock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowDraft {
    pub kind: Option<InstrumentKind>,
    pub side: Option<PositionSide>,
    pub option_type: Option<OptionType>,
    pub price: String,
    pub strike: String,
    pub delivery_price: String,
}

impl RowDraft {
    pub fn option(
        side: PositionSide,
        option_type: OptionType,
        premium: impl Into<String>,
        strike: impl Into<String>,
    ) -> Self {
        Self {
            kind: Some(InstrumentKind::Option),
            side: Some(side),
            option_type: Some(option_type),
            price: premium.into(),
            strike: strike.into(),
            ..Self::default()
        }
    }

    pub fn stock(side: PositionSide, spot_price: impl Into<String>) -> Self {
        Self {
            kind: Some(InstrumentKind::Stock),
            side: Some(side),
            price: spot_price.into(),
            ..Self::default()
        }
    }

    pub fn futures(side: PositionSide, delivery_price: impl Into<String>) -> Self {
        Self {
            kind: Some(InstrumentKind::Futures),
            side: Some(side),
            delivery_price: delivery_price.into(),
            ..Self::default()
        }
    }

    /// The position this row describes, if it is complete.
    ///
    /// `None` when a selector is unset, a required field does not parse as a
    /// finite number, or an option's premium is not below its strike.
    pub fn to_spec(&self) -> Option<InstrumentSpec> {
        let side = self.side?;
        match self.kind? {
            InstrumentKind::Option => {
                let option_type = self.option_type?;
                let premium = parse_price(&self.price)?;
                let strike = parse_price(&self.strike)?;
                if premium >= strike {
                    return None;
                }
                Some(InstrumentSpec::option(side, option_type, premium, strike))
            }
            InstrumentKind::Stock => Some(InstrumentSpec::stock(side, parse_price(&self.price)?)),
            InstrumentKind::Futures => Some(InstrumentSpec::futures(
                side,
                parse_price(&self.delivery_price)?,
            )),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.to_spec().is_some()
    }
}

impl From<&InstrumentSpec> for RowDraft {
    fn from(spec: &InstrumentSpec) -> Self {
        match *spec {
            InstrumentSpec::Option {
                option_type,
                side,
                premium,
                strike,
            } => RowDraft::option(side, option_type, premium.to_string(), strike.to_string()),
            InstrumentSpec::Stock { side, spot_price } => {
                RowDraft::stock(side, spot_price.to_string())
            }
            InstrumentSpec::Futures {
                side,
                delivery_price,
            } => RowDraft::futures(side, delivery_price.to_string()),
        }
    }
}

fn parse_price(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Which row the detail panel shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelState {
    pub selected_row: Option<RowId>,
}

/// Receives a fresh snapshot after every change to the working set.
pub trait CurvesListener {
    fn curves_changed(&mut self, snapshot: &PayoffSnapshot);
}

impl<F> CurvesListener for F
where
    F: FnMut(&PayoffSnapshot),
{
    fn curves_changed(&mut self, snapshot: &PayoffSnapshot) {
        self(snapshot)
    }
}

/// Editable working set driving the payoff engine.
pub struct Workbench {
    service: PayoffService,
    rows: Vec<(RowId, RowDraft)>,
    panel: PanelState,
    target_price: Option<f64>,
    snapshot: PayoffSnapshot,
    listeners: Vec<Box<dyn CurvesListener>>,
}

impl Workbench {
    /// Create an empty workbench.
    pub fn new(config: EngineConfig) -> InstrumentResult<Self> {
        let service = PayoffService::new(config);
        let snapshot = service.evaluate(&[], None)?;
        Ok(Self {
            service,
            rows: Vec::new(),
            panel: PanelState::default(),
            target_price: None,
            snapshot,
            listeners: Vec::new(),
        })
    }

    /// Register a listener. It is not called until the next change.
    pub fn subscribe(&mut self, listener: impl CurvesListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Append a row under a fresh id and select it.
    pub fn add_row(&mut self, draft: RowDraft) -> InstrumentResult<RowId> {
        let id = RowId::generate();
        self.insert_row(id.clone(), draft)?;
        Ok(id)
    }

    /// Insert or replace the row `id` and select it.
    pub fn insert_row(&mut self, id: RowId, draft: RowDraft) -> InstrumentResult<()> {
        match self.position(&id) {
            Some(index) => self.rows[index].1 = draft,
            None => self.rows.push((id.clone(), draft)),
        }
        debug!("Row {} added", id);
        self.panel.selected_row = Some(id);
        self.refresh()
    }

    /// Replace the draft of an existing row. Returns `false` for an unknown id.
    pub fn update_row(&mut self, id: &RowId, draft: RowDraft) -> InstrumentResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        self.rows[index].1 = draft;
        self.refresh()?;
        Ok(true)
    }

    /// Clear every field of a row, keeping it in the set.
    pub fn reset_row(&mut self, id: &RowId) -> InstrumentResult<bool> {
        self.update_row(id, RowDraft::default())
    }

    /// Drop a row. The selection is cleared if it pointed at it.
    pub fn remove_row(&mut self, id: &RowId) -> InstrumentResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        self.rows.remove(index);
        if self.panel.selected_row.as_ref() == Some(id) {
            self.panel.selected_row = None;
        }
        debug!("Row {} removed", id);
        self.refresh()?;
        Ok(true)
    }

    /// Point the detail panel at `id`. Returns `false` for an unknown id.
    pub fn select_row(&mut self, id: &RowId) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        self.panel.selected_row = Some(id.clone());
        true
    }

    /// Set or clear the global target price.
    pub fn set_target(&mut self, target_price: Option<f64>) -> InstrumentResult<()> {
        self.target_price = target_price;
        self.refresh()
    }

    /// Replace every row with the contents of a JSON record set.
    pub fn load_records(&mut self, json: &str) -> InstrumentResult<usize> {
        let specs = parse_records(json)?;
        self.rows = specs
            .iter()
            .map(|(row, spec)| (row.clone(), RowDraft::from(spec)))
            .collect();
        self.panel.selected_row = None;
        info!("Loaded {} rows from records", self.rows.len());
        self.refresh()?;
        Ok(self.rows.len())
    }

    /// Encode every complete row as a JSON record set.
    pub fn export_records(&self) -> InstrumentResult<String> {
        let complete = self.complete_rows();
        to_records_json(complete.iter().map(|(row, spec)| (row, spec)))
    }

    /// Breakeven price of the selected row, if it is complete.
    pub fn selected_breakeven(&self) -> Option<f64> {
        let id = self.panel.selected_row.as_ref()?;
        let draft = self.draft(id)?;
        draft.to_spec().as_ref().map(instrument_breakeven)
    }

    pub fn draft(&self, id: &RowId) -> Option<&RowDraft> {
        self.rows
            .iter()
            .find(|(row, _)| row == id)
            .map(|(_, draft)| draft)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&RowId, &RowDraft)> + '_ {
        self.rows.iter().map(|(row, draft)| (row, draft))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    pub fn target_price(&self) -> Option<f64> {
        self.target_price
    }

    /// Snapshot from the most recent change.
    pub fn snapshot(&self) -> &PayoffSnapshot {
        &self.snapshot
    }

    fn position(&self, id: &RowId) -> Option<usize> {
        self.rows.iter().position(|(row, _)| row == id)
    }

    fn complete_rows(&self) -> Vec<(RowId, InstrumentSpec)> {
        self.rows
            .iter()
            .filter_map(|(row, draft)| draft.to_spec().map(|spec| (row.clone(), spec)))
            .collect()
    }

    fn refresh(&mut self) -> InstrumentResult<()> {
        let complete = self.complete_rows();
        debug!(
            "Refreshing {} of {} rows",
            complete.len(),
            self.rows.len()
        );

        self.snapshot = self.service.evaluate(&complete, self.target_price)?;
        for listener in self.listeners.iter_mut() {
            listener.curves_changed(&self.snapshot);
        }
        Ok(())
    }
}
