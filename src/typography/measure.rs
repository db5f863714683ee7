/// Text roles on the cover, each with its own typeface and weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    /// Title logo, heavy serif.
    Masthead,
    /// Cover line, heavy serif.
    Headline,
    /// Deck under the headline, semibold sans.
    Subtitle,
}

impl FontRole {
    /// Every role, in drawing order.
    pub const ALL: [FontRole; 3] = [FontRole::Masthead, FontRole::Headline, FontRole::Subtitle];

    /// CSS-style weight the role is drawn at.
    pub fn weight(self) -> u16 {
        match self {
            FontRole::Masthead | FontRole::Headline => 900,
            FontRole::Subtitle => 600,
        }
    }
}

/// Measures the advance width of a single line of text, in pixels.
pub trait TextMeasure {
    /// Width of `text` drawn in `role`'s font at `size_px`.
    fn advance(&mut self, text: &str, role: FontRole, size_px: f64) -> f64;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &mut T {
    fn advance(&mut self, text: &str, role: FontRole, size_px: f64) -> f64 {
        (**self).advance(text, role, size_px)
    }
}

/// Fixed-pitch estimate: every character advances `em_ratio * size_px`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApproxMeasure {
    /// Advance per character as a fraction of the font size.
    pub em_ratio: f64,
}

impl Default for ApproxMeasure {
    fn default() -> Self {
        Self { em_ratio: 0.6 }
    }
}

impl TextMeasure for ApproxMeasure {
    fn advance(&mut self, text: &str, _role: FontRole, size_px: f64) -> f64 {
        text.chars().count() as f64 * self.em_ratio * size_px
    }
}

#[cfg(test)]
#[path = "../../tests/unit/typography/measure.rs"]
mod tests;
