use std::path::{Path, PathBuf};

use crate::foundation::core::ImageBuffer;
use crate::foundation::error::{CoverError, CoverResult};

/// Anything that can hand the pipeline a photograph.
pub trait ImageSource {
    /// Produce one straight-alpha RGBA image. Permission or availability problems are
    /// `AcquisitionDenied`.
    fn acquire(&mut self) -> CoverResult<ImageBuffer>;
}

/// Decodes an image file from disk.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File this source decodes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for FileSource {
    fn acquire(&mut self) -> CoverResult<ImageBuffer> {
        let img = image::open(&self.path).map_err(|e| match e {
            image::ImageError::IoError(io) => CoverError::acquisition_denied(format!(
                "cannot read '{}': {io}",
                self.path.display()
            )),
            other => CoverError::Other(
                anyhow::Error::new(other)
                    .context(format!("decode image '{}'", self.path.display())),
            ),
        })?;
        tracing::debug!(path = %self.path.display(), width = img.width(), height = img.height(), "decoded image");
        Ok(ImageBuffer::from(img))
    }
}

/// Hands out an in-memory image once; later calls are denied.
#[derive(Clone, Debug)]
pub struct MemorySource {
    image: Option<ImageBuffer>,
}

impl MemorySource {
    /// Source handing out `image`.
    pub fn new(image: ImageBuffer) -> Self {
        Self { image: Some(image) }
    }
}

impl ImageSource for MemorySource {
    fn acquire(&mut self) -> CoverResult<ImageBuffer> {
        self.image
            .take()
            .ok_or_else(|| CoverError::acquisition_denied("image already taken"))
    }
}

/// Platform camera. Implementations wrap whatever capture API the host offers.
pub trait CaptureDevice {
    /// Start streaming. Refused permission or a missing device is `AcquisitionDenied`.
    fn open(&mut self) -> CoverResult<()>;
    /// Grab the current frame.
    fn snapshot(&mut self) -> CoverResult<ImageBuffer>;
    /// Stop streaming and release the hardware. Must be safe to call after a failed `open`.
    fn release(&mut self);
}

/// An open camera stream. Dropping the session releases the device.
pub struct CaptureSession<'a, D: CaptureDevice + ?Sized> {
    device: &'a mut D,
}

impl<'a, D: CaptureDevice + ?Sized> CaptureSession<'a, D> {
    /// Open `device`. If opening fails the device is released before returning.
    pub fn open(device: &'a mut D) -> CoverResult<Self> {
        let mut session = Self { device };
        session.device.open()?;
        tracing::debug!("capture session opened");
        Ok(session)
    }

    /// Grab the current frame.
    pub fn snapshot(&mut self) -> CoverResult<ImageBuffer> {
        self.device.snapshot()
    }
}

impl<D: CaptureDevice + ?Sized> Drop for CaptureSession<'_, D> {
    fn drop(&mut self) {
        self.device.release();
        tracing::debug!("capture session released");
    }
}

/// Captures one frame from a camera, holding the device only for the snapshot.
pub struct CameraSource<D: CaptureDevice> {
    device: D,
}

impl<D: CaptureDevice> CameraSource<D> {
    /// Source capturing from `device`.
    pub fn new(device: D) -> Self {
        Self { device }
    }

    /// The wrapped device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Give the device back.
    pub fn into_device(self) -> D {
        self.device
    }
}

impl<D: CaptureDevice> ImageSource for CameraSource<D> {
    fn acquire(&mut self) -> CoverResult<ImageBuffer> {
        let mut session = CaptureSession::open(&mut self.device)?;
        session.snapshot()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/workflow/acquire.rs"]
mod tests;
