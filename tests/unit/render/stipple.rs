use rand::{SeedableRng, rngs::StdRng};

use super::*;

fn settings(mode: RenderMode, precision: f64) -> StippleSettings {
    StippleSettings {
        mode,
        precision: Precision::new(precision).unwrap(),
    }
}

fn checker(width: u32, height: u32) -> PixelBuffer {
    let mut pixels = Vec::new();
    for y in 0..height {
        for x in 0..width {
            if (x / 4 + y / 4) % 2 == 0 {
                pixels.push(Rgba8::opaque(200, 40, 40));
            } else {
                pixels.push(Rgba8::opaque(240, 240, 240));
            }
        }
    }
    PixelBuffer::from_pixels(width, height, &pixels).unwrap()
}

#[test]
fn dot_count_grows_with_precision() {
    let mut prev = 0;
    for p in [1.0, 5.0, 20.0, 50.0, 100.0, 400.0] {
        let n = dot_count(1000.0, RenderMode::Monochrome, Precision::new(p).unwrap());
        assert!(n >= prev, "precision {p} produced fewer dots");
        prev = n;
    }
}

#[test]
fn color_mode_doubles_dot_count() {
    let p = Precision::new(20.0).unwrap();
    for total in [10_000.0, 12_345.6, 777.7] {
        let mono = dot_count(total, RenderMode::Monochrome, p) as i64;
        let color = dot_count(total, RenderMode::Color, p) as i64;
        // Both counts are rounded up, so doubling holds to within one dot.
        assert!((color - 2 * mono).abs() <= 1, "{total}: {mono} vs {color}");
    }
}

#[test]
fn dot_count_rounds_up_and_clamps_negative_totals() {
    let p = Precision::new(20.0).unwrap();
    assert_eq!(dot_count(0.5, RenderMode::Monochrome, p), 1);
    assert_eq!(dot_count(0.0, RenderMode::Monochrome, p), 0);
    assert_eq!(dot_count(-3.0, RenderMode::Color, p), 0);
}

#[test]
fn output_keeps_source_dimensions() {
    let mut rng = StdRng::seed_from_u64(3);
    for (w, h) in [(1, 1), (3, 17), (40, 25)] {
        let src = checker(w, h);
        let out = render_stipple(&src, &settings(RenderMode::Color, 80.0), &mut rng).unwrap();
        assert_eq!((out.width(), out.height()), (w, h));
        assert_eq!(out.as_bytes().len(), src.as_bytes().len());
    }
}

#[test]
fn every_output_pixel_is_opaque() {
    let mut rng = StdRng::seed_from_u64(11);
    let src = checker(32, 32);
    let out = render_stipple(&src, &settings(RenderMode::Monochrome, 200.0), &mut rng).unwrap();
    assert!(out.dot_count() > 0);
    assert!(out.pixels().pixels().all(|px| px.a == 255));
}

#[test]
fn monochrome_dots_are_gray_and_darken_the_canvas() {
    let mut rng = StdRng::seed_from_u64(5);
    let src = PixelBuffer::filled(24, 24, Rgba8::BLACK).unwrap();
    let out = render_stipple(&src, &settings(RenderMode::Monochrome, 400.0), &mut rng).unwrap();
    assert!(out.pixels().pixels().all(|px| px.r == px.g && px.g == px.b));
    assert!(out.pixels().pixels().any(|px| px.r < 128));
}

#[test]
fn color_dots_take_source_color() {
    let mut rng = StdRng::seed_from_u64(9);
    let src = PixelBuffer::filled(24, 24, Rgba8::opaque(0, 0, 255)).unwrap();
    let out = render_stipple(&src, &settings(RenderMode::Color, 400.0), &mut rng).unwrap();
    // Only white paper and blue ink (plus anti-aliased blends of the two).
    assert!(out.pixels().pixels().all(|px| px.r == px.g && px.b >= 250));
    assert!(out.pixels().pixels().any(|px| px.r < 64));
}

#[test]
fn blank_color_image_stays_white() {
    let mut rng = StdRng::seed_from_u64(1);
    let src = PixelBuffer::filled(10, 10, Rgba8::WHITE).unwrap();
    let out = render_stipple(&src, &settings(RenderMode::Color, 50.0), &mut rng).unwrap();
    assert_eq!(out.dot_count(), 0);
    assert!(out.pixels().pixels().all(|px| px == Rgba8::WHITE));
}

#[test]
fn seeded_renderer_is_reproducible() {
    let src = checker(16, 16);
    let s = settings(RenderMode::Color, 60.0);
    let a = StippleRenderer::new(s, Some(42)).render(&src).unwrap();
    let b = StippleRenderer::new(s, Some(42)).render(&src).unwrap();
    assert_eq!(a, b);
}

#[test]
fn oversized_sources_are_rejected_with_the_limit() {
    let mut rng = StdRng::seed_from_u64(1);
    let wide = PixelBuffer::filled(MAX_DIMENSION + 1, 1, Rgba8::BLACK).unwrap();
    let err =
        render_stipple(&wide, &settings(RenderMode::Monochrome, 50.0), &mut rng).unwrap_err();
    assert!(matches!(err, StippleError::Validation(_)));
    assert!(err.to_string().contains("65535"));

    let edge = PixelBuffer::filled(MAX_DIMENSION, 1, Rgba8::WHITE).unwrap();
    let out = render_stipple(&edge, &settings(RenderMode::Color, 50.0), &mut rng).unwrap();
    assert_eq!(out.width(), MAX_DIMENSION);
}
