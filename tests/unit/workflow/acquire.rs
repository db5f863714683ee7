use super::*;

#[derive(Default)]
struct FakeCamera {
    deny: bool,
    fail_snapshot: bool,
    opened: u32,
    released: u32,
}

impl CaptureDevice for FakeCamera {
    fn open(&mut self) -> CoverResult<()> {
        self.opened += 1;
        if self.deny {
            return Err(CoverError::acquisition_denied("permission refused"));
        }
        Ok(())
    }

    fn snapshot(&mut self) -> CoverResult<ImageBuffer> {
        if self.fail_snapshot {
            return Err(CoverError::acquisition_denied("stream ended"));
        }
        Ok(ImageBuffer::filled(8, 6, [1, 2, 3, 255]))
    }

    fn release(&mut self) {
        self.released += 1;
    }
}

#[test]
fn camera_is_released_after_a_successful_capture() {
    let mut source = CameraSource::new(FakeCamera::default());
    let img = source.acquire().unwrap();
    assert_eq!((img.width(), img.height()), (8, 6));
    assert_eq!(source.device().released, 1);
}

#[test]
fn camera_is_released_when_permission_is_refused() {
    let mut source = CameraSource::new(FakeCamera {
        deny: true,
        ..FakeCamera::default()
    });
    let err = source.acquire().unwrap_err();
    assert!(matches!(err, CoverError::AcquisitionDenied(_)));
    let cam = source.into_device();
    assert_eq!((cam.opened, cam.released), (1, 1));
}

#[test]
fn camera_is_released_when_snapshot_fails() {
    let mut source = CameraSource::new(FakeCamera {
        fail_snapshot: true,
        ..FakeCamera::default()
    });
    assert!(source.acquire().is_err());
    assert_eq!(source.device().released, 1);
}

#[test]
fn session_drop_releases_without_snapshot() {
    let mut cam = FakeCamera::default();
    {
        let _session = CaptureSession::open(&mut cam).unwrap();
    }
    assert_eq!(cam.released, 1);
}

#[test]
fn memory_source_yields_once() {
    let mut source = MemorySource::new(ImageBuffer::filled(2, 2, [0, 0, 0, 255]));
    assert!(source.acquire().is_ok());
    assert!(matches!(
        source.acquire().unwrap_err(),
        CoverError::AcquisitionDenied(_)
    ));
}

#[test]
fn missing_file_is_denied() {
    let mut source = FileSource::new("no/such/photo.jpg");
    let err = source.acquire().unwrap_err();
    assert!(err.is_user_facing(), "{err}");
}

#[test]
fn file_source_decodes_png() {
    let path = std::env::temp_dir().join(format!("magcover-acquire-{}.png", std::process::id()));
    image::RgbaImage::from_pixel(3, 2, image::Rgba([9, 8, 7, 255]))
        .save(&path)
        .unwrap();
    let img = FileSource::new(&path).acquire().unwrap();
    assert_eq!(img.pixel(2, 1), Some([9, 8, 7, 255]));
    let _ = std::fs::remove_file(&path);
}
