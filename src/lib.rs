//! `co2-trends` library crate.
//!
//! The binary (`co2`) is a thin wrapper around this library so that:
//!
//! - the controller and the trend math are testable without a terminal
//! - the same view drives the TUI, the text summary, and the ASCII plot

pub mod app;
pub mod cli;
pub mod controls;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod tui;
pub mod view;
