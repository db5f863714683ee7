//! Typography Layout Engine: greedy wrapping, balanced headline splitting and text measurement.

/// Font roles and advance-width measurement.
pub mod measure;
/// Greedy wrapping and balanced headline splits.
pub mod wrap;

pub use measure::{ApproxMeasure, FontRole, TextMeasure};
pub use wrap::{balanced_headline_split, wrap_text};
