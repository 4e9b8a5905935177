//! Reporting utilities: formatted terminal output and JSON summaries.

pub mod format;

pub use format::*;
