//! magcover turns a photograph into a magazine-cover composite.
//!
//! The pipeline is a one-way flow:
//!
//! - a saliency mask cuts the subject out of the photo ([`segment`])
//! - the cutout's palette yields a legible text color and background tints ([`color`])
//! - the cover is laid out proportionally and rasterized at any resolution ([`render`])
//!
//! [`workflow::Orchestrator`] sequences those stages for one session.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Color Engine: palettes, the unified text color and background tints.
pub mod color;
/// Serde-backed configuration.
pub mod config;
/// Cover layout, CPU rasterization and PNG export.
pub mod render;
/// Saliency model seam and mask compositing.
pub mod segment;
/// Line wrapping, headline splitting and text measurement.
pub mod typography;
/// Acquisition, pipeline sequencing and session state.
pub mod workflow;

pub use crate::foundation::core::{
    Affine, ImageBuffer, Phrase, Point, Rect, RenderTarget, Rgb8,
};
pub use crate::foundation::error::{CoverError, CoverResult};
pub use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

pub use crate::color::convert::Hsl;
pub use crate::color::palette::{MedianCut, Palette, PaletteExtractor};
pub use crate::color::scheme::{
    ColorOption, ColorRole, ColorScheme, ColorSelection, SwatchKind, complementary_unified_color,
    inverted_variant, pastel_tint, unified_color_from_hex,
};
pub use crate::config::{ColorConfig, CoverConfig};
pub use crate::render::{
    CoverLayout, CoverPlan, CpuRenderer, DrawOp, FontBook, FontMeasure, FontPaths, FrameRGBA,
    compose_cover, encode_png, write_png,
};
pub use crate::segment::model::{ModelInput, PrecomputedSaliency, SaliencyModel};
pub use crate::segment::saliency::{MASK_SIZE, Resample, SaliencyMap, apply_mask, apply_mask_with};
pub use crate::typography::{
    ApproxMeasure, FontRole, TextMeasure, balanced_headline_split, wrap_text,
};
pub use crate::workflow::{
    CameraSource, CancelHandle, CaptureDevice, CaptureSession, FileSource, ImageSource,
    MemorySource, Orchestrator, PhrasePicker, SessionState, Status, WorkflowState, load_phrases,
    parse_phrases,
};
