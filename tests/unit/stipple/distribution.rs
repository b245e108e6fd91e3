use super::*;
use crate::foundation::core::Rgba8;

fn gradient(width: u32, height: u32) -> PixelBuffer {
    let mut pixels = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let v = ((x * 37 + y * 11) % 200) as u8;
            pixels.push(Rgba8::opaque(v, v / 2, 255 - v));
        }
    }
    PixelBuffer::from_pixels(width, height, &pixels).unwrap()
}

#[test]
fn length_matches_pixel_count_and_coords_are_row_major() {
    let buf = gradient(7, 5);
    let dist = CumulativeDistribution::build(&buf, RenderMode::Monochrome);
    assert_eq!(dist.len(), 35);
    assert!(!dist.is_empty());
    let e = dist.entries()[9];
    assert_eq!((e.x, e.y), (2, 1));
    let last = dist.entries()[34];
    assert_eq!((last.x, last.y), (6, 4));
}

#[test]
fn cumulative_weights_are_non_decreasing_for_non_white_images() {
    let buf = gradient(16, 9);
    for mode in [RenderMode::Monochrome, RenderMode::Color] {
        let dist = CumulativeDistribution::build(&buf, mode);
        for pair in dist.entries().windows(2) {
            assert!(pair[1].cumulative >= pair[0].cumulative);
        }
    }
}

#[test]
fn increments_equal_pixel_weights_and_last_is_total() {
    let buf = gradient(4, 3);
    let dist = CumulativeDistribution::build(&buf, RenderMode::Color);
    for (i, px) in buf.pixels().enumerate() {
        let w = pixel_weight(px, RenderMode::Color);
        assert!((dist.weight_at(i) - w).abs() < 1e-9);
    }
    let last = dist.entries().last().unwrap().cumulative;
    assert_eq!(last, dist.total_weight());
}

#[test]
fn black_white_pair_matches_monochrome_curve() {
    let buf = PixelBuffer::from_pixels(2, 1, &[Rgba8::BLACK, Rgba8::WHITE]).unwrap();
    let dist = CumulativeDistribution::build(&buf, RenderMode::Monochrome);
    let e = dist.entries();
    assert!((e[0].cumulative - 0.94777).abs() < 1e-4);
    assert!((e[1].cumulative - 1.0).abs() < 1e-4);
    assert_eq!((e[1].x, e[1].y), (1, 0));
}

#[test]
fn solid_white_color_total_is_slightly_negative() {
    let buf = PixelBuffer::filled(3, 3, Rgba8::WHITE).unwrap();
    let dist = CumulativeDistribution::build(&buf, RenderMode::Color);
    assert!(dist.total_weight() < 0.0);
    assert!(dist.total_weight() > -0.1);
}

#[test]
fn from_weights_and_entries_reject_empty_input() {
    assert!(CumulativeDistribution::from_weights(&[], 3).is_none());
    assert!(CumulativeDistribution::from_weights(&[1.0], 0).is_none());
    assert!(CumulativeDistribution::from_entries(Vec::new()).is_none());

    let dist = CumulativeDistribution::from_weights(&[0.5, 0.0, 1.5], 3).unwrap();
    assert_eq!(dist.total_weight(), 2.0);
    assert_eq!(dist.weight_at(1), 0.0);
}
