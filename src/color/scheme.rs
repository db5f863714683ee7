use crate::color::convert::{Hsl, rgb_to_hsl};
use crate::color::palette::{Palette, PaletteExtractor};
use crate::config::ColorConfig;
use crate::foundation::core::{ImageBuffer, Rgb8};
use crate::foundation::error::{CoverError, CoverResult};

/// Saturation scale for tint swatches shown in the picker.
pub const SWATCH_TINT_SCALE: f64 = 0.5;
/// Saturation scale for the softer tint variant.
pub const SOFT_TINT_SCALE: f64 = 0.7;
/// Lightness shared by every pastel tint.
pub const TINT_LIGHTNESS: f64 = 94.0;

const UNIFIED_MIN_SATURATION: f64 = 75.0;
const UNIFIED_DARK: f64 = 25.0;
const UNIFIED_LIGHT: f64 = 85.0;

/// One text color meant to stay legible against the whole subject.
///
/// Averages the palette, rotates the hue to the complement, forces strong saturation and flips
/// lightness to the opposite end of the scale from the average.
pub fn complementary_unified_color(colors: &[Rgb8]) -> CoverResult<Rgb8> {
    if colors.is_empty() {
        return Err(CoverError::EmptyPalette);
    }
    let n = colors.len() as f64;
    let mean = |f: fn(&Rgb8) -> u8| colors.iter().map(|c| f64::from(f(c))).sum::<f64>() / n;
    let avg = rgb_to_hsl(mean(|c| c.r), mean(|c| c.g), mean(|c| c.b));

    let unified = Hsl::new(
        (avg.h + 180.0) % 360.0,
        avg.s.max(UNIFIED_MIN_SATURATION),
        if avg.l > 50.0 { UNIFIED_DARK } else { UNIFIED_LIGHT },
    );
    Ok(unified.to_rgb())
}

/// Hex-string form of [`complementary_unified_color`].
pub fn unified_color_from_hex<S: AsRef<str>>(hexes: &[S]) -> CoverResult<String> {
    let colors = hexes
        .iter()
        .map(|h| Rgb8::from_hex(h.as_ref()))
        .collect::<CoverResult<Vec<_>>>()?;
    Ok(complementary_unified_color(&colors)?.to_hex())
}

/// Per-channel photographic negative.
pub fn inverted_variant(c: Rgb8) -> Rgb8 {
    Rgb8::new(255 - c.r, 255 - c.g, 255 - c.b)
}

/// Near-white background keeping the hue of `c` with its saturation scaled down.
pub fn pastel_tint(c: Rgb8, saturation_scale: f64) -> Hsl {
    pastel_tint_with(c, saturation_scale, TINT_LIGHTNESS)
}

pub(crate) fn pastel_tint_with(c: Rgb8, saturation_scale: f64, lightness: f64) -> Hsl {
    let hsl = c.to_hsl();
    Hsl::new(
        hsl.h.round(),
        (hsl.s * saturation_scale).round(),
        lightness,
    )
}

/// Which composite layer a swatch paints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorRole {
    /// Text color.
    Font,
    /// Background fill.
    Background,
}

/// How a swatch was derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum SwatchKind {
    /// Complementary color of the whole font palette.
    Unified,
    /// Negative of font-palette entry `n`.
    Inverted(usize),
    /// Pastel tint of background-palette entry `n`.
    Tint(usize),
}

/// A selectable swatch.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorOption {
    /// Layer this swatch paints.
    pub role: ColorRole,
    /// Derivation of the swatch.
    pub kind: SwatchKind,
    /// Swatch color.
    pub color: Rgb8,
    /// CSS form as shown to the user (`#RRGGBB` or `hsl(..)`).
    pub css: String,
}

impl ColorOption {
    fn font(kind: SwatchKind, color: Rgb8) -> Self {
        Self {
            role: ColorRole::Font,
            kind,
            color,
            css: color.to_hex(),
        }
    }

    fn background(kind: SwatchKind, tint: Hsl) -> Self {
        Self {
            role: ColorRole::Background,
            kind,
            color: tint.to_rgb(),
            css: tint.to_string(),
        }
    }
}

/// Everything the Color Engine derives from one cutout.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorScheme {
    /// Palette behind the unified color and inverted swatches.
    pub font_palette: Palette,
    /// Palette behind the background tints.
    pub background_palette: Palette,
    /// Complementary text color for the whole subject.
    pub unified: Rgb8,
    /// Unified color, then inverted font-palette entries.
    pub font_options: Vec<ColorOption>,
    /// One pastel tint per background-palette entry.
    pub background_options: Vec<ColorOption>,
}

impl ColorScheme {
    /// Extract both palettes from the cutout and build the swatch set.
    #[tracing::instrument(skip(image, extractor, cfg))]
    pub fn derive<P: PaletteExtractor + ?Sized>(
        image: &ImageBuffer,
        extractor: &P,
        cfg: &ColorConfig,
    ) -> CoverResult<Self> {
        let font_palette = extractor.extract(image, cfg.font_palette_size)?;
        let background_palette = extractor.extract(image, cfg.background_palette_size)?;
        Self::from_palettes(font_palette, background_palette, cfg)
    }

    /// [`ColorScheme::derive`] on `cutout`, retried on the unmasked `photo` when the mask left no
    /// pixel opaque enough to vote.
    pub fn derive_for_cutout<P: PaletteExtractor + ?Sized>(
        cutout: &ImageBuffer,
        photo: &ImageBuffer,
        extractor: &P,
        cfg: &ColorConfig,
    ) -> CoverResult<Self> {
        match Self::derive(cutout, extractor, cfg) {
            Err(CoverError::EmptyPalette) => {
                tracing::warn!("mask kept no subject pixels; deriving colors from the whole photo");
                Self::derive(photo, extractor, cfg)
            }
            other => other,
        }
    }

    /// Build the swatch set from already extracted palettes.
    pub fn from_palettes(
        font_palette: Palette,
        background_palette: Palette,
        cfg: &ColorConfig,
    ) -> CoverResult<Self> {
        let unified = complementary_unified_color(font_palette.colors())?;

        let mut font_options = Vec::with_capacity(font_palette.len() + 1);
        font_options.push(ColorOption::font(SwatchKind::Unified, unified));
        font_options.extend(
            font_palette
                .colors()
                .iter()
                .enumerate()
                .map(|(i, &c)| ColorOption::font(SwatchKind::Inverted(i), inverted_variant(c))),
        );

        let background_options = background_palette
            .colors()
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let tint = pastel_tint_with(c, cfg.tint_saturation_scale, cfg.tint_lightness);
                ColorOption::background(SwatchKind::Tint(i), tint)
            })
            .collect();

        tracing::debug!(unified = %unified.to_hex(), "derived color scheme");
        Ok(Self {
            font_palette,
            background_palette,
            unified,
            font_options,
            background_options,
        })
    }

    /// Defaults: unified font color over the first tint.
    pub fn default_selection(&self) -> ColorSelection {
        ColorSelection {
            font: self.unified,
            background: self.background_options[0].color,
        }
    }
}

/// Colors the next render will use. Each role is overridden independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ColorSelection {
    /// Background fill.
    pub background: Rgb8,
    /// Text color.
    pub font: Rgb8,
}

impl Default for ColorSelection {
    /// Black on white, used before any image has been processed.
    fn default() -> Self {
        Self {
            background: Rgb8::new(255, 255, 255),
            font: Rgb8::new(0, 0, 0),
        }
    }
}

impl ColorSelection {
    /// Replace the color of `option.role`, leaving the other role untouched.
    pub fn apply(&mut self, option: &ColorOption) {
        match option.role {
            ColorRole::Font => self.font = option.color,
            ColorRole::Background => self.background = option.color,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/scheme.rs"]
mod tests;
