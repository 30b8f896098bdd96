//! Console output helpers

pub mod display;

pub use display::{binomial, Color, ColorOutput, SearchFormatter, SearchProgress};
