use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{CoverError, CoverResult};
use crate::typography::{ApproxMeasure, FontRole, TextMeasure};

/// Font file per text role. Unset roles are measured approximately and not drawn.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontPaths {
    /// Masthead typeface.
    pub masthead: Option<PathBuf>,
    /// Headline typeface.
    pub headline: Option<PathBuf>,
    /// Subtitle typeface.
    pub subtitle: Option<PathBuf>,
}

impl FontPaths {
    /// Path configured for `role`.
    pub fn get(&self, role: FontRole) -> Option<&PathBuf> {
        match role {
            FontRole::Masthead => self.masthead.as_ref(),
            FontRole::Headline => self.headline.as_ref(),
            FontRole::Subtitle => self.subtitle.as_ref(),
        }
    }
}

/// Raw font bytes keyed by role.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    fonts: HashMap<FontRole, Arc<Vec<u8>>>,
}

impl FontBook {
    /// Read every configured font file.
    pub fn load(paths: &FontPaths) -> CoverResult<Self> {
        let mut book = Self::default();
        for role in FontRole::ALL {
            let Some(path) = paths.get(role) else {
                continue;
            };
            let bytes = std::fs::read(path)
                .with_context(|| format!("read {role:?} font '{}'", path.display()))?;
            tracing::debug!(?role, path = %path.display(), bytes = bytes.len(), "loaded font");
            book.insert(role, bytes);
        }
        Ok(book)
    }

    /// Use `bytes` as the font for `role`.
    pub fn insert(&mut self, role: FontRole, bytes: Vec<u8>) {
        self.fonts.insert(role, Arc::new(bytes));
    }

    /// Font bytes for `role`.
    pub fn get(&self, role: FontRole) -> Option<&Arc<Vec<u8>>> {
        self.fonts.get(&role)
    }

    /// `true` when no role has a font.
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

/// Builds Parley layouts for single lines of cover text.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgb8>,
    families: HashMap<FontRole, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, role: FontRole, font_bytes: &[u8]) -> CoverResult<String> {
        if let Some(name) = self.families.get(&role) {
            return Ok(name.clone());
        }
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            CoverError::validation(format!("no font families registered for {role:?}"))
        })?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CoverError::validation("registered font family has no name"))?
            .to_string();
        self.families.insert(role, name.clone());
        Ok(name)
    }

    /// Shape `text` on one line (no wrapping) with the role's font.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        role: FontRole,
        font_bytes: &[u8],
        size_px: f32,
        brush: Rgb8,
    ) -> CoverResult<parley::Layout<Rgb8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CoverError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let family_name = self.family_for(role, font_bytes)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(role.weight())),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgb8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }
}

/// Measures with real fonts where the book has one, falling back to [`ApproxMeasure`].
pub struct FontMeasure<'a> {
    book: &'a FontBook,
    engine: TextLayoutEngine,
    fallback: ApproxMeasure,
}

impl<'a> FontMeasure<'a> {
    /// Measure with the fonts in `book`.
    pub fn new(book: &'a FontBook) -> Self {
        Self {
            book,
            engine: TextLayoutEngine::new(),
            fallback: ApproxMeasure::default(),
        }
    }
}

impl TextMeasure for FontMeasure<'_> {
    fn advance(&mut self, text: &str, role: FontRole, size_px: f64) -> f64 {
        let Some(bytes) = self.book.get(role) else {
            return self.fallback.advance(text, role, size_px);
        };
        match self
            .engine
            .layout_line(text, role, bytes, size_px as f32, Rgb8::default())
        {
            Ok(layout) => f64::from(layout.width()),
            Err(e) => {
                tracing::warn!(?role, error = %e, "font measure failed; using approximation");
                self.fallback.advance(text, role, size_px)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fonts.rs"]
mod tests;
