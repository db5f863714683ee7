use crate::color::scheme::ColorSelection;
use crate::foundation::core::{Affine, Phrase, RenderTarget, Rgb8};
use crate::foundation::error::{CoverError, CoverResult};
use crate::typography::{FontRole, TextMeasure, balanced_headline_split, wrap_text};

/// Proportional cover geometry. Every length is a fraction of the target width or height, so the
/// same layout produces identical composition at any resolution.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CoverLayout {
    /// Masthead text, drawn as-is.
    pub masthead_text: String,
    /// Masthead top, fraction of height.
    pub masthead_top: f64,
    /// Masthead size, fraction of width.
    pub masthead_size: f64,
    /// Headline top, fraction of height.
    pub headline_top: f64,
    /// Headline size, fraction of width.
    pub headline_size: f64,
    /// Headline line height, multiple of its size.
    pub headline_line_height: f64,
    /// Subtitle size, fraction of width.
    pub subtitle_size: f64,
    /// Subtitle line height, multiple of its size.
    pub subtitle_line_height: f64,
    /// Space between headline block and subtitle, fraction of height.
    pub subtitle_gap: f64,
    /// Horizontal margin on each side, fraction of width.
    pub side_margin: f64,
}

impl Default for CoverLayout {
    fn default() -> Self {
        Self {
            masthead_text: "Magazine".to_string(),
            masthead_top: 0.04,
            masthead_size: 0.19,
            headline_top: 0.84,
            headline_size: 0.05,
            headline_line_height: 1.2,
            subtitle_size: 0.024,
            subtitle_line_height: 1.4,
            subtitle_gap: 15.0 / 1754.0,
            side_margin: 0.1,
        }
    }
}

impl CoverLayout {
    /// Reject non-positive sizes and fractions outside their range.
    pub fn validate(&self) -> CoverResult<()> {
        let positive = [
            ("masthead_size", self.masthead_size),
            ("headline_size", self.headline_size),
            ("headline_line_height", self.headline_line_height),
            ("subtitle_size", self.subtitle_size),
            ("subtitle_line_height", self.subtitle_line_height),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(CoverError::validation(format!(
                    "layout.{name} must be finite and > 0"
                )));
            }
        }
        let fractions = [
            ("masthead_top", self.masthead_top),
            ("headline_top", self.headline_top),
            ("subtitle_gap", self.subtitle_gap),
        ];
        for (name, v) in fractions {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(CoverError::validation(format!(
                    "layout.{name} must be in [0, 1]"
                )));
            }
        }
        if !self.side_margin.is_finite() || !(0.0..0.5).contains(&self.side_margin) {
            return Err(CoverError::validation(
                "layout.side_margin must be in [0, 0.5)",
            ));
        }
        Ok(())
    }

    /// Widest a text line may be before the headline splits.
    pub fn max_text_width(&self, target: RenderTarget) -> f64 {
        target.w() - 2.0 * self.side_margin * target.w()
    }
}

/// One backend-agnostic drawing step. Coordinates are target pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill the whole target.
    Fill {
        /// Fill color.
        color: Rgb8,
    },
    /// Draw the subject image.
    Image {
        /// Subject pixels to target pixels.
        transform: Affine,
        /// Subject width the plan was composed for.
        width: u32,
        /// Subject height the plan was composed for.
        height: u32,
    },
    /// One line of text, horizontally centred on `center_x` with its top edge at `top_y`.
    Text {
        /// Line content, already cased.
        text: String,
        /// Typeface role.
        role: FontRole,
        /// Font size in pixels.
        size_px: f64,
        /// Horizontal centre of the line.
        center_x: f64,
        /// Top edge of the line box.
        top_y: f64,
        /// Text color.
        color: Rgb8,
    },
}

/// Ordered display list for one cover at one resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverPlan {
    /// Surface the ops are laid out for.
    pub target: RenderTarget,
    /// Ops in painting order.
    pub ops: Vec<DrawOp>,
}

impl CoverPlan {
    /// Text ops with the given role, in drawing order.
    pub fn text_lines(&self, role: FontRole) -> impl Iterator<Item = &DrawOp> + '_ {
        self.ops
            .iter()
            .filter(move |op| matches!(op, DrawOp::Text { role: r, .. } if *r == role))
    }
}

/// Transform scaling a `sw x sh` subject to cover `target` and centring it.
///
/// The scale is `max(tw / sw, th / sh)`, so the subject fills the target and overflow is cropped
/// equally on both sides of the overflowing axis.
pub fn cover_transform(target: RenderTarget, subject_w: u32, subject_h: u32) -> CoverResult<Affine> {
    target.validate()?;
    if subject_w == 0 || subject_h == 0 {
        return Err(CoverError::invalid_render_target(format!(
            "subject must have non-zero size, got {subject_w}x{subject_h}"
        )));
    }
    let (sw, sh) = (f64::from(subject_w), f64::from(subject_h));
    let scale = (target.w() / sw).max(target.h() / sh);
    let dx = (target.w() - sw * scale) / 2.0;
    let dy = (target.h() - sh * scale) / 2.0;
    Ok(Affine::translate((dx, dy)) * Affine::scale(scale))
}

/// Lay out the full cover: background, subject, masthead, headline and subtitle.
#[tracing::instrument(skip(selection, phrase, layout, measure))]
pub fn compose_cover(
    target: RenderTarget,
    subject_size: (u32, u32),
    selection: &ColorSelection,
    phrase: &Phrase,
    layout: &CoverLayout,
    measure: &mut dyn TextMeasure,
) -> CoverResult<CoverPlan> {
    let transform = cover_transform(target, subject_size.0, subject_size.1)?;

    let (w, h) = (target.w(), target.h());
    let center_x = w / 2.0;
    let max_width = layout.max_text_width(target);
    let color = selection.font;

    let mut ops = vec![
        DrawOp::Fill {
            color: selection.background,
        },
        DrawOp::Image {
            transform,
            width: subject_size.0,
            height: subject_size.1,
        },
    ];

    let mut push_text = |text: String, role: FontRole, size_px: f64, top_y: f64| {
        if !text.is_empty() {
            ops.push(DrawOp::Text {
                text,
                role,
                size_px,
                center_x,
                top_y,
                color,
            });
        }
    };

    push_text(
        layout.masthead_text.clone(),
        FontRole::Masthead,
        w * layout.masthead_size,
        h * layout.masthead_top,
    );

    let head_size = w * layout.headline_size;
    let head_lh = head_size * layout.headline_line_height;
    let headline = phrase.headline.to_uppercase();
    let mut cur_y = h * layout.headline_top;
    if measure.advance(&headline, FontRole::Headline, head_size) > max_width {
        let (first, second) = balanced_headline_split(&headline);
        push_text(first, FontRole::Headline, head_size, cur_y);
        cur_y += head_lh;
        if !second.is_empty() {
            push_text(second, FontRole::Headline, head_size, cur_y);
            cur_y += head_lh;
        }
    } else {
        push_text(headline, FontRole::Headline, head_size, cur_y);
        cur_y += head_lh;
    }

    let sub_size = w * layout.subtitle_size;
    let sub_lh = sub_size * layout.subtitle_line_height;
    let lines = wrap_text(&phrase.subtitle, max_width, |s| {
        measure.advance(s, FontRole::Subtitle, sub_size)
    });
    let top = cur_y + h * layout.subtitle_gap;
    for (i, line) in lines.into_iter().enumerate() {
        push_text(line, FontRole::Subtitle, sub_size, top + i as f64 * sub_lh);
    }

    tracing::debug!(ops = ops.len(), "composed cover plan");
    Ok(CoverPlan { target, ops })
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
