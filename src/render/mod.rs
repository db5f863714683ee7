//! Render Engine: cover layout, CPU rasterization and PNG export.

/// `vello_cpu` raster backend.
pub mod cpu;
/// PNG output.
pub mod encode;
/// Font loading and shaped text measurement.
pub mod fonts;
/// Resolution-independent cover layout.
pub mod plan;

use crate::foundation::math::unpremultiply_rgba8_in_place;

pub use cpu::CpuRenderer;
pub use encode::{encode_png, write_png};
pub use fonts::{FontBook, FontMeasure, FontPaths};
pub use plan::{CoverLayout, CoverPlan, DrawOp, compose_cover, cover_transform};

/// A rendered cover as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Copy with straight alpha.
    pub fn to_straight(&self) -> FrameRGBA {
        let mut data = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut data);
        }
        FrameRGBA {
            width: self.width,
            height: self.height,
            data,
            premultiplied: false,
        }
    }
}
