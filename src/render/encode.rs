use std::io::Cursor;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{CoverError, CoverResult};
use crate::render::FrameRGBA;

/// Encode a frame as lossless PNG with straight alpha.
pub fn encode_png(frame: &FrameRGBA) -> CoverResult<Vec<u8>> {
    let img = straight_rgba_image(frame)?;
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

/// Write a frame to `path` as PNG, creating parent directories.
#[tracing::instrument(skip(frame), fields(path = %path.as_ref().display()))]
pub fn write_png(frame: &FrameRGBA, path: impl AsRef<Path>) -> CoverResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let img = straight_rgba_image(frame)?;
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    tracing::info!(width = frame.width, height = frame.height, "wrote png");
    Ok(())
}

fn straight_rgba_image(frame: &FrameRGBA) -> CoverResult<image::RgbaImage> {
    let straight = frame.to_straight();
    image::RgbaImage::from_raw(straight.width, straight.height, straight.data).ok_or_else(|| {
        CoverError::validation(format!(
            "frame data does not match {}x{}",
            frame.width, frame.height
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
