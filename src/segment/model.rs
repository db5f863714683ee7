use std::path::Path;

use image::imageops::FilterType;

use crate::foundation::core::ImageBuffer;
use crate::foundation::error::{CoverError, CoverResult};
use crate::segment::saliency::{MASK_SIZE, SaliencyMap};

/// ImageNet channel means, R/G/B.
pub const CHANNEL_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// ImageNet channel standard deviations, R/G/B.
pub const CHANNEL_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Normalized planar `[1, 3, 320, 320]` float tensor fed to the segmentation model.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelInput {
    data: Vec<f32>,
}

impl ModelInput {
    /// Tensor shape in NCHW order.
    pub const SHAPE: [usize; 4] = [1, 3, MASK_SIZE, MASK_SIZE];

    /// Resize `image` to the model grid and apply per-channel `(p/255 - mean) / std`.
    ///
    /// Alpha is ignored; the model only sees color.
    pub fn from_image(image: &ImageBuffer) -> CoverResult<Self> {
        if image.is_empty() {
            return Err(CoverError::inference("cannot build model input from an empty image"));
        }
        let view = image::ImageBuffer::<image::Rgba<u8>, &[u8]>::from_raw(
            image.width(),
            image.height(),
            image.data(),
        )
        .ok_or_else(|| CoverError::validation("rgba buffer does not match its dimensions"))?;
        let side = MASK_SIZE as u32;
        let small = image::imageops::resize(&view, side, side, FilterType::Triangle);

        let plane = MASK_SIZE * MASK_SIZE;
        let mut data = vec![0.0f32; 3 * plane];
        for (i, px) in small.pixels().enumerate() {
            for c in 0..3 {
                let v = f32::from(px.0[c]) / 255.0;
                data[c * plane + i] = (v - CHANNEL_MEAN[c]) / CHANNEL_STD[c];
            }
        }
        Ok(Self { data })
    }

    /// Planar tensor data (R plane, then G, then B).
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// One channel plane.
    pub fn plane(&self, channel: usize) -> &[f32] {
        let plane = MASK_SIZE * MASK_SIZE;
        &self.data[channel * plane..(channel + 1) * plane]
    }
}

/// Black-box saliency segmentation: normalized tensor in, 320x320 confidence grid out.
pub trait SaliencyModel {
    /// Run inference. Failures should be reported as `Inference` (or `ModelLoad` for lazy loads).
    fn infer(&mut self, input: &ModelInput) -> CoverResult<SaliencyMap>;
}

impl<F> SaliencyModel for F
where
    F: FnMut(&ModelInput) -> CoverResult<SaliencyMap>,
{
    fn infer(&mut self, input: &ModelInput) -> CoverResult<SaliencyMap> {
        self(input)
    }
}

/// A saliency map computed ahead of time and stored as a grayscale image.
///
/// Any image size is accepted; it is resampled to the model grid on load, so masks exported by
/// external segmentation tools can be fed straight into the pipeline.
#[derive(Clone, Debug)]
pub struct PrecomputedSaliency {
    map: SaliencyMap,
}

impl PrecomputedSaliency {
    /// Load a mask image from disk. Any read or decode failure is a `ModelLoad` error.
    pub fn open(path: impl AsRef<Path>) -> CoverResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| {
            CoverError::model_load(format!("failed to load mask '{}': {e}", path.display()))
        })?;
        Ok(Self::from_luma(&img.to_luma8()))
    }

    /// Build from an in-memory grayscale image.
    pub fn from_luma(img: &image::GrayImage) -> Self {
        let side = MASK_SIZE as u32;
        let resized = if img.dimensions() == (side, side) {
            img.clone()
        } else {
            image::imageops::resize(img, side, side, FilterType::Triangle)
        };
        let values = resized.pixels().map(|p| f32::from(p.0[0]) / 255.0).collect();
        Self {
            map: SaliencyMap { values },
        }
    }

    /// Wrap an existing map.
    pub fn from_map(map: SaliencyMap) -> Self {
        Self { map }
    }

    /// The stored map.
    pub fn map(&self) -> &SaliencyMap {
        &self.map
    }
}

impl SaliencyModel for PrecomputedSaliency {
    fn infer(&mut self, _input: &ModelInput) -> CoverResult<SaliencyMap> {
        Ok(self.map.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/segment/model.rs"]
mod tests;
