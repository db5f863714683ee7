use rayon::prelude::*;

use crate::foundation::core::ImageBuffer;
use crate::foundation::error::{CoverError, CoverResult};

/// Side length of the square saliency grid produced by the segmentation model.
pub const MASK_SIZE: usize = 320;

const SHARPEN_STEEPNESS: f32 = 12.0;
const SHARPEN_MIDPOINT: f32 = 0.5;

/// Per-pixel foreground confidence on a fixed `MASK_SIZE x MASK_SIZE` grid, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct SaliencyMap {
    pub(crate) values: Vec<f32>,
}

impl SaliencyMap {
    /// Wrap model output. Fails with `InvalidMaskDimensions` unless the grid is exactly 320x320.
    pub fn new(width: usize, height: usize, values: Vec<f32>) -> CoverResult<Self> {
        if width != MASK_SIZE || height != MASK_SIZE {
            return Err(CoverError::InvalidMaskDimensions {
                expected: MASK_SIZE,
                width,
                height,
            });
        }
        if values.len() != MASK_SIZE * MASK_SIZE {
            // Declared 320x320 but the buffer disagrees; report the rows actually present.
            return Err(CoverError::InvalidMaskDimensions {
                expected: MASK_SIZE,
                width,
                height: values.len() / MASK_SIZE,
            });
        }
        Ok(Self { values })
    }

    /// Wrap a flat `[1,1,320,320]` model output.
    pub fn from_flat(values: Vec<f32>) -> CoverResult<Self> {
        Self::new(MASK_SIZE, MASK_SIZE, values)
    }

    /// A grid holding the same confidence everywhere.
    pub fn filled(value: f32) -> Self {
        Self {
            values: vec![value; MASK_SIZE * MASK_SIZE],
        }
    }

    /// Build a grid from a function of `(x, y)` cell coordinates.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut values = Vec::with_capacity(MASK_SIZE * MASK_SIZE);
        for y in 0..MASK_SIZE {
            for x in 0..MASK_SIZE {
                values.push(f(x, y));
            }
        }
        Self { values }
    }

    /// Raw row-major values.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Value of cell `(x, y)`; coordinates clamp to the grid.
    pub fn get(&self, x: usize, y: usize) -> f32 {
        let x = x.min(MASK_SIZE - 1);
        let y = y.min(MASK_SIZE - 1);
        self.values[y * MASK_SIZE + x]
    }

    /// Bilinear sample at continuous grid coordinates, clamped to the last row/column.
    pub fn sample_bilinear(&self, mx: f64, my: f64) -> f32 {
        let last = (MASK_SIZE - 1) as f64;
        let mx = mx.clamp(0.0, last);
        let my = my.clamp(0.0, last);

        let x0 = mx.floor() as usize;
        let y0 = my.floor() as usize;
        let x1 = (x0 + 1).min(MASK_SIZE - 1);
        let y1 = (y0 + 1).min(MASK_SIZE - 1);
        let fx = (mx - x0 as f64) as f32;
        let fy = (my - y0 as f64) as f32;

        let top = self.get(x0, y0) * (1.0 - fx) + self.get(x1, y0) * fx;
        let bottom = self.get(x0, y1) * (1.0 - fx) + self.get(x1, y1) * fx;
        top * (1.0 - fy) + bottom * fy
    }

    /// Nearest-cell (floor) sample at continuous grid coordinates.
    pub fn sample_nearest(&self, mx: f64, my: f64) -> f32 {
        let last = (MASK_SIZE - 1) as f64;
        self.get(
            mx.clamp(0.0, last).floor() as usize,
            my.clamp(0.0, last).floor() as usize,
        )
    }
}

/// Mask resampling filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resample {
    /// Four-cell bilinear interpolation.
    #[default]
    Bilinear,
    /// Floor sampling; lower fidelity, blocky edges.
    Nearest,
}

/// Logistic confidence curve centred on 0.5 with steepness 12.
pub fn sharpen(value: f32) -> f32 {
    1.0 / (1.0 + (-SHARPEN_STEEPNESS * (value - SHARPEN_MIDPOINT)).exp())
}

/// Sharpened confidence quantized to an 8-bit alpha, rounding up.
pub fn alpha_from_confidence(value: f32) -> u8 {
    (sharpen(value) * 255.0).ceil().clamp(0.0, 255.0) as u8
}

/// Rewrite `image`'s alpha channel from `mask` using bilinear resampling.
pub fn apply_mask<'a>(
    image: &'a mut ImageBuffer,
    mask: &SaliencyMap,
) -> CoverResult<&'a mut ImageBuffer> {
    apply_mask_with(image, mask, Resample::Bilinear)
}

/// Rewrite `image`'s alpha channel from `mask`. RGB channels are left untouched.
#[tracing::instrument(skip(image, mask), fields(width = image.width(), height = image.height()))]
pub fn apply_mask_with<'a>(
    image: &'a mut ImageBuffer,
    mask: &SaliencyMap,
    resample: Resample,
) -> CoverResult<&'a mut ImageBuffer> {
    if image.is_empty() {
        return Ok(image);
    }

    let w = image.width() as usize;
    let h = image.height() as usize;
    let span = (MASK_SIZE - 1) as f64;
    let cols: Vec<f64> = (0..w).map(|x| x as f64 * span / w as f64).collect();

    image
        .data_mut()
        .par_chunks_exact_mut(w * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let my = y as f64 * span / h as f64;
            for (px, &mx) in row.chunks_exact_mut(4).zip(cols.iter()) {
                let v = match resample {
                    Resample::Bilinear => mask.sample_bilinear(mx, my),
                    Resample::Nearest => mask.sample_nearest(mx, my),
                };
                px[3] = alpha_from_confidence(v);
            }
        });

    Ok(image)
}

#[cfg(test)]
#[path = "../../tests/unit/segment/saliency.rs"]
mod tests;
