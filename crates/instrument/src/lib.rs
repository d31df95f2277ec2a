//! # Instrument Crate
//!
//! Payoff engine for Payline. Turns option, stock and futures positions into
//! payoff-at-expiry curves and combines them into a single profit line.
//!
//! ## Key Components
//!
//! - **Domain Types**: `InstrumentSpec`, `PositionSide`, `OptionType`, `PriceDomain`, `RowId`
//! - **Payoff Formulas**: closed-form expiry payoff per position kind
//! - **Price Grid**: tiered, evenly spaced price sampling
//! - **Alignment**: moves a working set onto one shared domain
//! - **Profit Line**: element-wise sum with nearest-ahead point queries
//! - **Records**: JSON save/restore of positions
//! - **Workbench**: editable rows, selection and change notifications
//!
//! ## Data Flow
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ InstrumentSpec│──▶│  Instrument  │──▶│  alignment   │──▶│  ProfitLine  │
//! │ (per row)    │   │ natural domain│   │ shared domain│   │ sum + target │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//!                                                                 │
//!                                                                 ▼
//!                                                         ┌──────────────┐
//!                                                         │PayoffSnapshot│
//!                                                         └──────────────┘
//! ```
//!
//! Evaluation is stateless: [`PayoffService::evaluate`] rebuilds every
//! instrument from its spec on each call.

pub mod alignment;
pub mod analysis;
pub mod error;
pub mod grid;
pub mod model;
pub mod payoff;
pub mod profit_line;
pub mod record;
pub mod service;
pub mod strategy;
pub mod types;
pub mod workbench;

// Re-export main types for convenience
pub use analysis::{breakeven_points, instrument_breakeven, PayoffSummary};
pub use error::{InstrumentError, InstrumentResult};
pub use grid::PriceGridGenerator;
pub use model::{Curve, Instrument};
pub use profit_line::ProfitLine;
pub use record::{parse_records, to_records_json, InstrumentRecord};
pub use service::{EvaluatedRow, PayoffService, PayoffSnapshot, TargetResolution};
pub use strategy::StrategyPreset;
pub use types::{InstrumentKind, InstrumentSpec, OptionType, PositionSide, PriceDomain, RowId};
pub use workbench::{CurvesListener, PanelState, RowDraft, Workbench};
