use super::*;

use crate::color::palette::MedianCut;

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

#[test]
fn unified_color_of_dark_palette_is_light_and_saturated() {
    let unified = complementary_unified_color(&[Rgb8::new(255, 0, 0)]).unwrap();
    let hsl = unified.to_hsl();
    assert!(close(hsl.h, 180.0, 1.0), "{hsl:?}");
    assert!(hsl.s >= 75.0 - 1.0, "{hsl:?}");
    assert!(close(hsl.l, 85.0, 0.5), "{hsl:?}");
    assert_eq!((unified.g, unified.b), (255, 255));
}

#[test]
fn unified_color_of_light_palette_is_dark() {
    let unified = complementary_unified_color(&[
        Rgb8::new(200, 200, 200),
        Rgb8::new(220, 210, 200),
        Rgb8::new(240, 230, 250),
    ])
    .unwrap();
    let hsl = unified.to_hsl();
    assert!(close(hsl.l, 25.0, 0.5), "{hsl:?}");
    assert!(hsl.s >= 74.0, "{hsl:?}");
}

#[test]
fn unified_color_uses_channel_means() {
    // Black and white average to mid grey (l = 50, not above 50) so lightness goes to 85.
    let unified = complementary_unified_color(&[Rgb8::new(0, 0, 0), Rgb8::new(255, 255, 255)])
        .unwrap();
    assert!(close(unified.to_hsl().l, 85.0, 0.5));
}

#[test]
fn unified_color_from_hex_validates_input() {
    let hex = unified_color_from_hex(&["#FF0000"]).unwrap();
    assert_eq!(hex, complementary_unified_color(&[Rgb8::new(255, 0, 0)]).unwrap().to_hex());

    let err = unified_color_from_hex(&["#FF0000", "nope"]).unwrap_err();
    assert!(matches!(err, CoverError::InvalidColor(_)));

    let empty: [&str; 0] = [];
    assert!(matches!(
        unified_color_from_hex(&empty).unwrap_err(),
        CoverError::EmptyPalette
    ));
}

#[test]
fn inversion_is_an_involution() {
    for c in [Rgb8::new(0, 0, 0), Rgb8::new(12, 200, 99), Rgb8::new(255, 128, 1)] {
        assert_eq!(inverted_variant(inverted_variant(c)), c);
    }
    assert_eq!(inverted_variant(Rgb8::new(255, 0, 10)), Rgb8::new(0, 255, 245));
}

#[test]
fn pastel_tints_render_as_css() {
    assert_eq!(
        pastel_tint(Rgb8::new(255, 0, 0), SWATCH_TINT_SCALE).to_string(),
        "hsl(0, 50%, 94%)"
    );
    assert_eq!(
        pastel_tint(Rgb8::new(0, 0, 255), SOFT_TINT_SCALE).to_string(),
        "hsl(240, 70%, 94%)"
    );
    let t = pastel_tint(Rgb8::new(255, 0, 0), SWATCH_TINT_SCALE).to_rgb();
    assert!(t.r > 235 && t.g > 220 && t.b > 220, "{t:?}");
}

#[test]
fn scheme_lists_unified_inverted_and_tints() {
    let font = Palette::new(vec![Rgb8::new(255, 0, 0), Rgb8::new(0, 0, 255)]).unwrap();
    let background = Palette::new(vec![
        Rgb8::new(255, 0, 0),
        Rgb8::new(0, 255, 0),
        Rgb8::new(0, 0, 255),
    ])
    .unwrap();
    let scheme = ColorScheme::from_palettes(font, background, &ColorConfig::default()).unwrap();

    assert_eq!(scheme.font_options.len(), 3);
    assert_eq!(scheme.font_options[0].kind, SwatchKind::Unified);
    assert_eq!(scheme.font_options[0].color, scheme.unified);
    assert_eq!(scheme.font_options[1].kind, SwatchKind::Inverted(0));
    assert_eq!(scheme.font_options[1].color, Rgb8::new(0, 255, 255));
    assert_eq!(scheme.font_options[2].css, "#FFFF00");

    assert_eq!(scheme.background_options.len(), 3);
    assert!(scheme.background_options.iter().all(|o| o.role == ColorRole::Background));
    assert_eq!(scheme.background_options[1].css, "hsl(120, 50%, 94%)");

    let sel = scheme.default_selection();
    assert_eq!(sel.font, scheme.unified);
    assert_eq!(sel.background, scheme.background_options[0].color);
}

#[test]
fn derive_extracts_configured_palette_sizes() {
    let img = ImageBuffer::filled(16, 16, [30, 90, 160, 255]);
    let cfg = ColorConfig::default();
    let scheme = ColorScheme::derive(&img, &MedianCut::default(), &cfg).unwrap();
    assert_eq!(scheme.font_palette.len(), cfg.font_palette_size);
    assert_eq!(scheme.background_palette.len(), cfg.background_palette_size);
}

#[test]
fn derive_on_transparent_cutout_fails() {
    let img = ImageBuffer::filled(16, 16, [30, 90, 160, 0]);
    let err = ColorScheme::derive(&img, &MedianCut::default(), &ColorConfig::default()).unwrap_err();
    assert!(matches!(err, CoverError::EmptyPalette));
}

#[test]
fn overriding_one_role_keeps_the_other() {
    let mut sel = ColorSelection::default();
    let before = sel;
    sel.apply(&ColorOption {
        role: ColorRole::Font,
        kind: SwatchKind::Inverted(0),
        color: Rgb8::new(1, 2, 3),
        css: "#010203".to_string(),
    });
    assert_eq!(sel.font, Rgb8::new(1, 2, 3));
    assert_eq!(sel.background, before.background);
}

/// SplitMix64 stream for reproducible palettes.
fn palettes(seed: u64, count: usize) -> Vec<Vec<Rgb8>> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    };
    (0..count)
        .map(|_| {
            let len = 1 + (next() % 8) as usize;
            (0..len)
                .map(|_| {
                    let v = next();
                    Rgb8::new(v as u8, (v >> 8) as u8, (v >> 16) as u8)
                })
                .collect()
        })
        .collect()
}

#[test]
fn unified_color_is_saturated_and_at_a_lightness_extreme_for_any_palette() {
    for colors in palettes(0xC0FFEE, 500) {
        let n = colors.len() as f64;
        let mean = |f: fn(&Rgb8) -> u8| colors.iter().map(|c| f64::from(f(c))).sum::<f64>() / n;
        let avg = rgb_to_hsl(mean(|c| c.r), mean(|c| c.g), mean(|c| c.b));

        let hsl = complementary_unified_color(&colors).unwrap().to_hsl();
        // Tolerances cover 8-bit quantization of the HSL result.
        assert!(hsl.s >= 74.0, "{colors:?} -> {hsl:?}");
        let expected_l = if avg.l > 50.0 { 25.0 } else { 85.0 };
        assert!(close(hsl.l, expected_l, 0.5), "{colors:?} -> {hsl:?}");
    }
}

#[test]
fn cutout_without_opaque_pixels_falls_back_to_the_photo() {
    let photo = ImageBuffer::filled(16, 16, [30, 90, 160, 255]);
    let cutout = ImageBuffer::filled(16, 16, [30, 90, 160, 1]);
    let cfg = ColorConfig::default();
    let scheme =
        ColorScheme::derive_for_cutout(&cutout, &photo, &MedianCut::default(), &cfg).unwrap();
    assert_eq!(
        scheme.font_palette,
        ColorScheme::derive(&photo, &MedianCut::default(), &cfg)
            .unwrap()
            .font_palette
    );

    let invisible = ImageBuffer::filled(16, 16, [30, 90, 160, 0]);
    let err = ColorScheme::derive_for_cutout(&cutout, &invisible, &MedianCut::default(), &cfg)
        .unwrap_err();
    assert!(matches!(err, CoverError::EmptyPalette));
}

#[test]
fn opaque_cutout_ignores_the_photo() {
    let photo = ImageBuffer::filled(16, 16, [200, 20, 20, 255]);
    let cutout = ImageBuffer::filled(16, 16, [30, 90, 160, 255]);
    let cfg = ColorConfig::default();
    let scheme =
        ColorScheme::derive_for_cutout(&cutout, &photo, &MedianCut::default(), &cfg).unwrap();
    assert!(scheme.font_palette.colors().iter().all(|c| c.b > c.r));
}
