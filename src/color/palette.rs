use crate::foundation::core::{ImageBuffer, Rgb8};
use crate::foundation::error::{CoverError, CoverResult};

/// Ordered dominant colors, most dominant first. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Palette(Vec<Rgb8>);

impl Palette {
    /// Wrap extracted colors. Fails with `EmptyPalette` on an empty list.
    pub fn new(colors: Vec<Rgb8>) -> CoverResult<Self> {
        if colors.is_empty() {
            return Err(CoverError::EmptyPalette);
        }
        Ok(Self(colors))
    }

    /// Colors in dominance order.
    pub fn colors(&self) -> &[Rgb8] {
        &self.0
    }

    /// Most dominant color.
    pub fn dominant(&self) -> Rgb8 {
        self.0[0]
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: palettes are never empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Colors as `#RRGGBB` strings.
    pub fn to_hex(&self) -> Vec<String> {
        self.0.iter().map(|c| c.to_hex()).collect()
    }
}

/// Palette-extraction primitive: `k` dominant colors of an image, ordered by dominance.
pub trait PaletteExtractor {
    /// Extract exactly `k` colors.
    fn extract(&self, image: &ImageBuffer, k: usize) -> CoverResult<Palette>;
}

const SIGBITS: u32 = 5;
const RSHIFT: u32 = 8 - SIGBITS;
const SIDE: usize = 1 << SIGBITS;
const POPULATION_PHASE: f64 = 0.75;

/// Modified median-cut quantization over a 5-bit-per-channel histogram.
///
/// Boxes are split by population until three quarters of the requested count exist, then by
/// population times volume so large sparse regions of color space also get a representative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MedianCut {
    /// Sample every `quality`-th pixel (1 = every pixel).
    pub quality: usize,
    /// Pixels with alpha below this are ignored, so cutout background never votes.
    pub alpha_threshold: u8,
    /// Ignore near-white pixels (all channels above 250).
    pub skip_white: bool,
}

impl Default for MedianCut {
    fn default() -> Self {
        Self {
            quality: 10,
            alpha_threshold: 125,
            skip_white: true,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct VBox {
    lo: [usize; 3],
    hi: [usize; 3],
    count: u64,
}

impl VBox {
    fn volume(&self) -> u64 {
        (0..3).map(|c| (self.hi[c] - self.lo[c] + 1) as u64).product()
    }

    fn cells(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        (self.lo[0]..=self.hi[0]).flat_map(move |r| {
            (self.lo[1]..=self.hi[1])
                .flat_map(move |g| (self.lo[2]..=self.hi[2]).map(move |b| [r, g, b]))
        })
    }

    fn splittable(&self) -> bool {
        self.count > 1 && self.volume() > 1
    }
}

fn cell_index([r, g, b]: [usize; 3]) -> usize {
    (r << (2 * SIGBITS)) | (g << SIGBITS) | b
}

struct Histogram {
    bins: Vec<u64>,
}

impl Histogram {
    fn count(&self, bx: &VBox) -> u64 {
        bx.cells().map(|c| self.bins[cell_index(c)]).sum()
    }

    fn shrink(&self, lo: [usize; 3], hi: [usize; 3]) -> Option<VBox> {
        let mut min = [SIDE; 3];
        let mut max = [0usize; 3];
        let mut count = 0u64;
        let probe = VBox { lo, hi, count: 0 };
        for cell in probe.cells() {
            let n = self.bins[cell_index(cell)];
            if n == 0 {
                continue;
            }
            count += n;
            for c in 0..3 {
                min[c] = min[c].min(cell[c]);
                max[c] = max[c].max(cell[c]);
            }
        }
        (count > 0).then_some(VBox {
            lo: min,
            hi: max,
            count,
        })
    }

    fn average(&self, bx: &VBox) -> Rgb8 {
        let mult = f64::from(1u32 << RSHIFT);
        let mut total = 0.0;
        let mut sum = [0.0f64; 3];
        for cell in bx.cells() {
            let n = self.bins[cell_index(cell)] as f64;
            if n == 0.0 {
                continue;
            }
            total += n;
            for c in 0..3 {
                sum[c] += n * (cell[c] as f64 + 0.5) * mult;
            }
        }
        let ch = |c: usize| -> u8 {
            let v = if total > 0.0 {
                sum[c] / total
            } else {
                mult * (bx.lo[c] + bx.hi[c] + 1) as f64 / 2.0
            };
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb8::new(ch(0), ch(1), ch(2))
    }

    /// Split at the population median of the longest axis. Both halves are non-empty.
    fn split(&self, bx: &VBox) -> Option<(VBox, VBox)> {
        let axis = (0..3)
            .max_by_key(|&c| bx.hi[c] - bx.lo[c])
            .unwrap_or(0);
        if bx.hi[axis] == bx.lo[axis] {
            return None;
        }

        let half = bx.count.div_ceil(2);
        let mut acc = 0u64;
        let mut cut = bx.lo[axis];
        for i in bx.lo[axis]..=bx.hi[axis] {
            let mut lo = bx.lo;
            let mut hi = bx.hi;
            lo[axis] = i;
            hi[axis] = i;
            acc += self.count(&VBox { lo, hi, count: 0 });
            cut = i;
            if acc >= half {
                break;
            }
        }
        if cut == bx.hi[axis] {
            cut -= 1;
        }

        let mut left_hi = bx.hi;
        left_hi[axis] = cut;
        let mut right_lo = bx.lo;
        right_lo[axis] = cut + 1;

        let left = self.shrink(bx.lo, left_hi)?;
        let right = self.shrink(right_lo, bx.hi)?;
        Some((left, right))
    }
}

impl MedianCut {
    fn histogram(&self, image: &ImageBuffer) -> Histogram {
        let mut bins = vec![0u64; SIDE * SIDE * SIDE];
        let step = self.quality.max(1);
        for px in image.data().chunks_exact(4).step_by(step) {
            let [r, g, b, a] = [px[0], px[1], px[2], px[3]];
            if a < self.alpha_threshold {
                continue;
            }
            if self.skip_white && r > 250 && g > 250 && b > 250 {
                continue;
            }
            let cell = [
                usize::from(r >> RSHIFT),
                usize::from(g >> RSHIFT),
                usize::from(b >> RSHIFT),
            ];
            bins[cell_index(cell)] += 1;
        }
        Histogram { bins }
    }

    fn quantize(&self, hist: &Histogram, k: usize) -> Vec<VBox> {
        let Some(root) = hist.shrink([0; 3], [SIDE - 1; 3]) else {
            return Vec::new();
        };
        let mut boxes = vec![root];

        let population_target = ((k as f64) * POPULATION_PHASE).ceil() as usize;
        split_until(hist, &mut boxes, population_target, |b| b.count as f64);
        split_until(hist, &mut boxes, k, |b| (b.count as f64) * (b.volume() as f64));

        boxes.sort_by(|a, b| b.count.cmp(&a.count));
        boxes
    }
}

fn split_until(
    hist: &Histogram,
    boxes: &mut Vec<VBox>,
    target: usize,
    priority: impl Fn(&VBox) -> f64,
) {
    while boxes.len() < target {
        let pick = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.splittable())
            .max_by(|(_, a), (_, b)| priority(a).total_cmp(&priority(b)))
            .map(|(i, _)| i);
        let Some(i) = pick else {
            return;
        };
        let Some((left, right)) = hist.split(&boxes[i]) else {
            return;
        };
        boxes[i] = left;
        boxes.push(right);
    }
}

impl PaletteExtractor for MedianCut {
    #[tracing::instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    fn extract(&self, image: &ImageBuffer, k: usize) -> CoverResult<Palette> {
        if k == 0 {
            return Err(CoverError::EmptyPalette);
        }
        let hist = self.histogram(image);
        let boxes = self.quantize(&hist, k);
        if boxes.is_empty() {
            return Err(CoverError::EmptyPalette);
        }

        let distinct: Vec<Rgb8> = boxes.iter().map(|b| hist.average(b)).collect();
        if distinct.len() < k {
            tracing::debug!(
                found = distinct.len(),
                requested = k,
                "fewer color boxes than requested; repeating dominant entries"
            );
        }
        let colors = distinct.iter().copied().cycle().take(k).collect();
        Palette::new(colors)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/palette.rs"]
mod tests;
