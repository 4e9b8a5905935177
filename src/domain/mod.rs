//! Domain types used throughout the application.
//!
//! This module defines:
//!
//! - selection enums (`SignalType`, `TimeRange`, `Segment`)
//! - observation records (`Co2Row`, `Observation`)
//! - control state (`TrendParams`, `ViewSnapshot`) and session config (`ViewConfig`)

pub mod types;

pub use types::*;
