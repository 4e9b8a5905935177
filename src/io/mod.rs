//! Input helpers.
//!
//! - CSV ingest + cleaning of the monthly CO2 record (`ingest`)

pub mod ingest;

pub use ingest::*;
