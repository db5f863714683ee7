use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::core::{Affine, ImageBuffer, Rgb8};
use crate::foundation::error::{CoverError, CoverResult};
use crate::foundation::math::premultiply_rgba8_in_place;
use crate::render::FrameRGBA;
use crate::render::fonts::{FontBook, TextLayoutEngine};
use crate::render::plan::{CoverPlan, DrawOp};
use crate::typography::FontRole;

/// Rasterizes a [`CoverPlan`] with `vello_cpu`, shaping text with Parley.
pub struct CpuRenderer {
    fonts: FontBook,
    engine: TextLayoutEngine,
    font_cache: HashMap<FontRole, vello_cpu::peniko::FontData>,
}

impl CpuRenderer {
    /// Renderer drawing text with `fonts`.
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts,
            engine: TextLayoutEngine::new(),
            font_cache: HashMap::new(),
        }
    }

    /// Fonts used for drawing and measuring.
    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Draw `plan` with `subject` as the cutout image. Output is premultiplied RGBA8.
    #[tracing::instrument(skip(self, plan, subject), fields(width = plan.target.width, height = plan.target.height))]
    pub fn render(&mut self, plan: &CoverPlan, subject: &ImageBuffer) -> CoverResult<FrameRGBA> {
        plan.target.validate()?;
        let width: u16 = plan.target.width.try_into().map_err(|_| {
            CoverError::invalid_render_target(format!(
                "target width {} exceeds {}",
                plan.target.width,
                u16::MAX
            ))
        })?;
        let height: u16 = plan.target.height.try_into().map_err(|_| {
            CoverError::invalid_render_target(format!(
                "target height {} exceeds {}",
                plan.target.height,
                u16::MAX
            ))
        })?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        for op in &plan.ops {
            self.draw_op(&mut ctx, op, subject, plan)?;
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: plan.target.width,
            height: plan.target.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &DrawOp,
        subject: &ImageBuffer,
        plan: &CoverPlan,
    ) -> CoverResult<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::Fill { color } => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(solid(*color));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    plan.target.w(),
                    plan.target.h(),
                ));
                Ok(())
            }
            DrawOp::Image {
                transform,
                width,
                height,
            } => {
                if (subject.width(), subject.height()) != (*width, *height) {
                    return Err(CoverError::validation(format!(
                        "subject is {}x{} but the plan was composed for {width}x{height}",
                        subject.width(),
                        subject.height()
                    )));
                }
                let pixmap = subject_to_pixmap(subject)?;
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(vello_cpu::Image {
                    image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                    sampler: vello_cpu::peniko::ImageSampler::default(),
                });
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(*width),
                    f64::from(*height),
                ));
                Ok(())
            }
            DrawOp::Text {
                text,
                role,
                size_px,
                center_x,
                top_y,
                color,
            } => {
                let Some(bytes) = self.fonts.get(*role).cloned() else {
                    tracing::warn!(role = ?role, text = %text, "no font configured for role; skipping text");
                    return Ok(());
                };
                let font = self
                    .font_cache
                    .entry(*role)
                    .or_insert_with(|| {
                        vello_cpu::peniko::FontData::new(
                            vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
                            0,
                        )
                    })
                    .clone();

                let layout =
                    self.engine
                        .layout_line(text, *role, &bytes, *size_px as f32, *color)?;
                let left = center_x - f64::from(layout.width()) / 2.0;
                ctx.set_transform(vello_cpu::kurbo::Affine::translate((left, *top_y)));

                for line in layout.lines() {
                    for item in line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };
                        ctx.set_paint(solid(run.style().brush));
                        let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        });
                        ctx.glyph_run(&font)
                            .font_size(run.run().font_size())
                            .fill_glyphs(glyphs);
                    }
                }
                Ok(())
            }
        }
    }
}

fn solid(c: Rgb8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

/// Straight-alpha cutout to a premultiplied `vello_cpu` pixmap.
fn subject_to_pixmap(subject: &ImageBuffer) -> CoverResult<vello_cpu::Pixmap> {
    let w: u16 = subject
        .width()
        .try_into()
        .map_err(|_| CoverError::validation("subject width exceeds u16"))?;
    let h: u16 = subject
        .height()
        .try_into()
        .map_err(|_| CoverError::validation("subject height exceeds u16"))?;

    let mut premul = subject.data().to_vec();
    premultiply_rgba8_in_place(&mut premul);

    let mut may_have_opacities = false;
    let pixels = premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
