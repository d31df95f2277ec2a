//! Observability infrastructure for Payline
//!
//! This crate provides structured logging via tracing.
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("payline", LogFormat::Pretty)?;
//! ```

pub mod logging;

pub use logging::{init_logging, init_logging_with_filter, LogFormat};
