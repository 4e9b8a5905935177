//! Numerical helpers: least-squares line fitting.

pub mod ols;

pub use ols::*;
