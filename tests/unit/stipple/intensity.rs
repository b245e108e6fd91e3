use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn luminance_uses_rec601_weights() {
    assert_eq!(luminance(0, 0, 0), 0.0);
    assert!(close(luminance(255, 255, 255), 255.0));
    assert!(close(luminance(255, 0, 0), 76.245));
    assert!(close(luminance(0, 255, 0), 149.685));
    assert!(close(luminance(0, 0, 255), 29.07));
}

#[test]
fn monochrome_curve_endpoints() {
    // 0.95 - 0.9 / (1 + e^6) and 0.95 - 0.9 / (1 + e^-6)
    assert!(close(weight(0, 0, 0, RenderMode::Monochrome), 0.94777));
    assert!(close(weight(255, 255, 255, RenderMode::Monochrome), 0.05223));
    assert!(close(weight(128, 128, 128, RenderMode::Monochrome), 0.4950));
}

#[test]
fn color_curve_endpoints_allow_negative_weight() {
    assert!(close(weight(0, 0, 0, RenderMode::Color), 1.00748));
    let white = weight(255, 255, 255, RenderMode::Color);
    assert!(white < 0.0);
    assert!(close(white, -0.00748));
}

#[test]
fn weight_is_non_increasing_in_luminance() {
    for mode in [RenderMode::Monochrome, RenderMode::Color] {
        let mut prev = f64::INFINITY;
        for v in 0..=255u8 {
            let w = weight(v, v, v, mode);
            assert!(w <= prev, "{mode:?} not monotone at {v}");
            prev = w;
        }
    }
}

#[test]
fn pixel_weight_ignores_alpha() {
    let a = pixel_weight(Rgba8::opaque(10, 20, 30), RenderMode::Color);
    let b = pixel_weight(
        Rgba8 {
            r: 10,
            g: 20,
            b: 30,
            a: 0,
        },
        RenderMode::Color,
    );
    assert_eq!(a, b);
}
