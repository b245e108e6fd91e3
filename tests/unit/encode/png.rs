use rand::{SeedableRng, rngs::StdRng};

use super::*;
use crate::{
    encode::sink::Viewport,
    foundation::core::{Fps, Precision, RenderMode, Rgba8},
    render::stipple::{StippleSettings, render_stipple},
};

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "stippler_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn frame(width: u32, height: u32) -> RenderedFrame {
    let src = PixelBuffer::filled(width, height, Rgba8::opaque(40, 40, 40)).unwrap();
    let settings = StippleSettings {
        mode: RenderMode::Monochrome,
        precision: Precision::new(50.0).unwrap(),
    };
    render_stipple(&src, &settings, &mut StdRng::seed_from_u64(2)).unwrap()
}

fn cfg(width: u32, height: u32, viewport: Viewport) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(5.0).unwrap(),
        display: viewport.fit(width, height),
    }
}

#[test]
fn writes_numbered_pngs_at_source_size() {
    let dir = temp_dir("png_sink_plain");
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(cfg(12, 8, Viewport::default())).unwrap();
    sink.push_frame(0, &frame(12, 8)).unwrap();
    sink.push_frame(1, &frame(12, 8)).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.written().len(), 2);
    assert!(dir.join("frame_00000.png").exists());
    let img = image::open(dir.join("frame_00001.png")).unwrap();
    assert_eq!((img.width(), img.height()), (12, 8));
}

#[test]
fn scales_to_viewport_fit_when_enabled() {
    let dir = temp_dir("png_sink_scaled");
    let viewport = Viewport {
        width: 74,
        height: 170,
        margin_x: 50,
        margin_y: 150,
    };
    let mut sink = PngSequenceSink::new(&dir).scale_to_display(true);
    sink.begin(cfg(12, 8, viewport)).unwrap();
    sink.push_frame(0, &frame(12, 8)).unwrap();
    sink.end().unwrap();

    // min(24 / 12, 20 / 8) = 2
    let img = image::open(dir.join("frame_00000.png")).unwrap();
    assert_eq!((img.width(), img.height()), (24, 16));
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = PngSequenceSink::new(temp_dir("png_sink_unstarted"));
    assert!(sink.push_frame(0, &frame(4, 4)).is_err());
}
