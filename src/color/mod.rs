//! Color Engine: conversions, palette extraction and swatch derivation.

/// RGB, HSL and hex conversions.
pub mod convert;
/// Dominant-color extraction.
pub mod palette;
/// Swatches derived from palettes.
pub mod scheme;
