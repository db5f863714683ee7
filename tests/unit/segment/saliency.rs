use super::*;

fn opaque(width: u32, height: u32) -> ImageBuffer {
    ImageBuffer::filled(width, height, [90, 120, 150, 255])
}

#[test]
fn rejects_non_320_grids() {
    let err = SaliencyMap::new(160, 160, vec![0.0; 160 * 160]).unwrap_err();
    assert!(matches!(
        err,
        CoverError::InvalidMaskDimensions {
            expected: 320,
            width: 160,
            height: 160
        }
    ));

    let err = SaliencyMap::from_flat(vec![0.0; 320 * 10]).unwrap_err();
    assert!(matches!(
        err,
        CoverError::InvalidMaskDimensions { height: 10, .. }
    ));

    assert!(SaliencyMap::from_flat(vec![0.5; 320 * 320]).is_ok());
}

#[test]
fn full_confidence_gives_full_alpha() {
    let mut img = opaque(37, 23);
    apply_mask(&mut img, &SaliencyMap::filled(1.0)).unwrap();
    assert!(img.data().chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn zero_confidence_gives_near_zero_alpha() {
    let mut img = opaque(41, 17);
    apply_mask(&mut img, &SaliencyMap::filled(0.0)).unwrap();
    assert!(img.data().chunks_exact(4).all(|px| px[3] < 2));
}

#[test]
fn rgb_channels_are_untouched() {
    let mut img = opaque(8, 8);
    apply_mask(&mut img, &SaliencyMap::filled(0.0)).unwrap();
    assert!(
        img.data()
            .chunks_exact(4)
            .all(|px| px[0] == 90 && px[1] == 120 && px[2] == 150)
    );
}

#[test]
fn sharpen_is_symmetric_around_midpoint() {
    assert!((sharpen(0.5) - 0.5).abs() < 1e-6);
    assert!((sharpen(0.6) + sharpen(0.4) - 1.0).abs() < 1e-5);
    assert!(sharpen(0.8) > 0.97);
    assert!(sharpen(0.2) < 0.03);
}

#[test]
fn bilinear_interpolates_between_cells() {
    let mask = SaliencyMap::from_fn(|x, _| if x < 160 { 0.0 } else { 1.0 });
    assert_eq!(mask.sample_bilinear(159.0, 10.0), 0.0);
    assert_eq!(mask.sample_bilinear(160.0, 10.0), 1.0);
    assert!((mask.sample_bilinear(159.5, 10.0) - 0.5).abs() < 1e-6);
    // Nearest floors to the left cell.
    assert_eq!(mask.sample_nearest(159.9, 10.0), 0.0);
}

#[test]
fn sampling_clamps_at_last_row_and_column() {
    let mask = SaliencyMap::from_fn(|x, y| if x == 319 && y == 319 { 1.0 } else { 0.0 });
    assert_eq!(mask.sample_bilinear(319.0, 319.0), 1.0);
    assert_eq!(mask.sample_bilinear(400.0, 400.0), 1.0);
    assert_eq!(mask.sample_nearest(-3.0, 500.0), 0.0);
}

#[test]
fn last_pixel_maps_inside_the_grid() {
    // A 1-px-wide right column of confidence must be reachable from the image's last column
    // without indexing past the grid.
    let mask = SaliencyMap::from_fn(|x, _| if x >= 318 { 1.0 } else { 0.0 });
    let mut img = opaque(320, 4);
    apply_mask(&mut img, &mask).unwrap();
    assert_eq!(img.alpha(319, 0), Some(255));
    assert!(img.alpha(0, 0).unwrap() < 2);
}

#[test]
fn nearest_fallback_produces_hard_steps() {
    let mask = SaliencyMap::from_fn(|x, _| if x < 160 { 0.0 } else { 1.0 });
    let mut img = opaque(640, 2);
    apply_mask_with(&mut img, &mask, Resample::Nearest).unwrap();
    let alphas: Vec<u8> = (0..640).map(|x| img.alpha(x, 0).unwrap()).collect();
    assert!(alphas.iter().all(|&a| a < 2 || a == 255));
}

#[test]
fn empty_image_is_a_noop() {
    let mut img = ImageBuffer::filled(0, 0, [0, 0, 0, 0]);
    assert!(apply_mask(&mut img, &SaliencyMap::filled(1.0)).is_ok());
}
