use crate::foundation::error::{CoverError, CoverResult};

pub use kurbo::{Affine, Point, Rect};

/// Opaque 8-bit sRGB color. Defaults to black.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Construct from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as an `[r, g, b]` array.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// Working photograph: straight (non-premultiplied) RGBA8, row-major, tightly packed.
///
/// The Mask Compositor rewrites the alpha channel in place; every other stage only reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Wrap raw RGBA8 bytes. The byte length must be `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> CoverResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if data.len() != expected {
            return Err(CoverError::validation(format!(
                "rgba buffer for {width}x{height} must hold {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer filled with one straight RGBA color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let n = width as usize * height as usize;
        let mut data = Vec::with_capacity(n * 4);
        for _ in 0..n {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `true` when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Straight RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable straight RGBA8 bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Alpha at `(x, y)`, or `None` outside the buffer.
    pub fn alpha(&self, x: u32, y: u32) -> Option<u8> {
        self.pixel(x, y).map(|px| px[3])
    }

    /// Convert into an `image` crate buffer.
    pub fn into_rgba_image(self) -> CoverResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data)
            .ok_or_else(|| CoverError::validation("invalid rgba buffer size"))
    }
}

impl From<image::RgbaImage> for ImageBuffer {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

impl From<image::DynamicImage> for ImageBuffer {
    fn from(img: image::DynamicImage) -> Self {
        Self::from(img.to_rgba8())
    }
}

/// Pixel surface the Render Engine paints, independent of the source image resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RenderTarget {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl RenderTarget {
    /// A4 at 150 DPI.
    pub const PREVIEW: Self = Self {
        width: 1240,
        height: 1754,
    };

    /// A4 at 300 DPI.
    pub const EXPORT: Self = Self {
        width: 2480,
        height: 3508,
    };

    /// Create a validated, non-zero-area target.
    pub fn new(width: u32, height: u32) -> CoverResult<Self> {
        let t = Self { width, height };
        t.validate()?;
        Ok(t)
    }

    /// Fail with `InvalidRenderTarget` when the target has zero area.
    pub fn validate(self) -> CoverResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CoverError::invalid_render_target(format!(
                "target must have non-zero area, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Width as `f64`.
    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64`.
    pub fn h(self) -> f64 {
        f64::from(self.height)
    }
}

/// Headline and subtitle pair drawn on the cover.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Phrase {
    /// Large cover line.
    pub headline: String,
    /// Deck under the headline.
    pub subtitle: String,
}

impl Phrase {
    /// Pair a headline with its subtitle.
    pub fn new(headline: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            subtitle: subtitle.into(),
        }
    }
}

impl Default for Phrase {
    /// Placeholder shown before any image has been processed.
    fn default() -> Self {
        Self::new("WAITING", "Open an image to begin")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
