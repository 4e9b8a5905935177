//! Trend-line model.
//!
//! The model is a small, pure function so the controller, the reporting code
//! and the least-squares helper can share it.

pub mod linear;

pub use linear::*;
