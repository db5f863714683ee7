use std::fmt;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{CoverError, CoverResult};

/// HSL color: hue in degrees `[0, 360)`, saturation and lightness in percent `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Hsl {
    /// Hue in degrees.
    pub h: f64,
    /// Saturation in percent.
    pub s: f64,
    /// Lightness in percent.
    pub l: f64,
}

impl Hsl {
    /// Construct from components.
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Convert to 8-bit RGB.
    pub fn to_rgb(self) -> Rgb8 {
        hsl_to_rgb(self)
    }
}

impl fmt::Display for Hsl {
    /// CSS `hsl()` notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

impl Rgb8 {
    /// `#RRGGBB`, uppercase, zero-padded.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parse `#RRGGBB` or `RRGGBB` (case-insensitive).
    pub fn from_hex(s: &str) -> CoverResult<Self> {
        parse_hex(s)
    }

    /// Convert to HSL.
    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(f64::from(self.r), f64::from(self.g), f64::from(self.b))
    }
}

fn parse_hex(s: &str) -> CoverResult<Rgb8> {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CoverError::invalid_color(format!(
            "hex color must be #RRGGBB, got \"{s}\""
        )));
    }

    let byte = |i: usize| -> CoverResult<u8> {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| CoverError::invalid_color(format!("invalid hex byte in \"{s}\"")))
    };
    Ok(Rgb8::new(byte(0)?, byte(2)?, byte(4)?))
}

/// RGB (channels on the 0..=255 scale, fractional allowed) to HSL.
///
/// Fractional inputs let channel means feed in without pre-rounding.
pub fn rgb_to_hsl(r: f64, g: f64, b: f64) -> Hsl {
    let (r, g, b) = (r / 255.0, g / 255.0, b / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl::new(0.0, 0.0, l * 100.0);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl::new(h / 6.0 * 360.0, s * 100.0, l * 100.0)
}

/// HSL to RGB via chroma and hue-sector reconstruction, rounding each channel.
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb8 {
    let h = hsl.h.rem_euclid(360.0);
    let s = hsl.s.clamp(0.0, 100.0);
    let l = hsl.l.clamp(0.0, 100.0) / 100.0;
    let a = s * l.min(1.0 - l) / 100.0;

    let channel = |n: f64| -> u8 {
        let k = (n + h / 30.0) % 12.0;
        let c = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        (255.0 * c).round().clamp(0.0, 255.0) as u8
    };

    Rgb8::new(channel(0.0), channel(8.0), channel(4.0))
}

#[cfg(test)]
#[path = "../../tests/unit/color/convert.rs"]
mod tests;
