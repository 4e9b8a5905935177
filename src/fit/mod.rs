//! Least-squares reference fits for the two trend segments.

pub mod segment;

pub use segment::*;
