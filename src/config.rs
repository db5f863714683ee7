use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::color::palette::MedianCut;
use crate::color::scheme::{SWATCH_TINT_SCALE, TINT_LIGHTNESS};
use crate::foundation::core::RenderTarget;
use crate::foundation::error::{CoverError, CoverResult};
use crate::render::fonts::FontPaths;
use crate::render::plan::CoverLayout;
use crate::segment::saliency::Resample;

/// Palette and tint settings for the Color Engine.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Colors extracted for the unified color and inverted font swatches.
    pub font_palette_size: usize,
    /// Colors extracted for background tints.
    pub background_palette_size: usize,
    /// Saturation multiplier applied to background tints.
    pub tint_saturation_scale: f64,
    /// Lightness of background tints, in percent.
    pub tint_lightness: f64,
    /// Palette quantizer settings.
    pub median_cut: MedianCut,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            font_palette_size: 5,
            background_palette_size: 6,
            tint_saturation_scale: SWATCH_TINT_SCALE,
            tint_lightness: TINT_LIGHTNESS,
            median_cut: MedianCut::default(),
        }
    }
}

/// Top-level configuration. Every field has a default, so `{}` is a valid document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// On-screen preview resolution.
    pub preview: RenderTarget,
    /// Print export resolution.
    pub export: RenderTarget,
    /// Color Engine settings.
    pub color: ColorConfig,
    /// Cover geometry.
    pub layout: CoverLayout,
    /// Font files per text role.
    pub fonts: FontPaths,
    /// Mask resampling used by the Mask Compositor.
    pub resample: Resample,
    /// Seed for reproducible phrase picks.
    pub seed: u64,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            preview: RenderTarget::PREVIEW,
            export: RenderTarget::EXPORT,
            color: ColorConfig::default(),
            layout: CoverLayout::default(),
            fonts: FontPaths::default(),
            resample: Resample::default(),
            seed: 0x5EED_C0DE,
        }
    }
}

impl CoverConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CoverResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| CoverError::validation(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CoverResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CoverError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject out-of-range values with `Validation`.
    pub fn validate(&self) -> CoverResult<()> {
        self.preview
            .validate()
            .map_err(|e| CoverError::validation(format!("preview: {e}")))?;
        self.export
            .validate()
            .map_err(|e| CoverError::validation(format!("export: {e}")))?;

        let c = &self.color;
        if c.font_palette_size == 0 || c.background_palette_size == 0 {
            return Err(CoverError::validation("palette sizes must be >= 1"));
        }
        if c.median_cut.quality == 0 {
            return Err(CoverError::validation("median_cut.quality must be >= 1"));
        }
        if !(c.tint_saturation_scale.is_finite() && (0.0..=1.0).contains(&c.tint_saturation_scale))
        {
            return Err(CoverError::validation(
                "tint_saturation_scale must be in [0, 1]",
            ));
        }
        if !(c.tint_lightness.is_finite() && (0.0..=100.0).contains(&c.tint_lightness)) {
            return Err(CoverError::validation("tint_lightness must be in [0, 100]"));
        }

        self.layout.validate()
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
