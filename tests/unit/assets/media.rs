use super::*;
use crate::foundation::core::Rgba8;

fn solid(v: u8) -> PixelBuffer {
    PixelBuffer::filled(2, 2, Rgba8::opaque(v, v, v)).unwrap()
}

#[test]
fn probe_usability_requires_finite_duration_and_readiness() {
    let ok = MediaProbe {
        duration_secs: 1.0,
        width: 4,
        height: 4,
        ready: true,
    };
    assert!(ok.is_usable());
    assert!(
        !MediaProbe {
            duration_secs: f64::NAN,
            ..ok
        }
        .is_usable()
    );
    assert!(
        !MediaProbe {
            duration_secs: f64::INFINITY,
            ..ok
        }
        .is_usable()
    );
    assert!(!MediaProbe { ready: false, ..ok }.is_usable());
    assert!(!MediaProbe { width: 0, ..ok }.is_usable());
}

#[test]
fn memory_decoder_serves_frame_active_at_seek_time() {
    let mut dec = MemoryDecoder::new(2.0, vec![(1.0, solid(20)), (0.0, solid(10))]).unwrap();
    assert!(dec.capture().is_err());

    dec.seek(0.5).unwrap();
    assert_eq!(dec.capture().unwrap().pixel(0, 0).r, 10);
    dec.seek(1.0).unwrap();
    assert_eq!(dec.capture().unwrap().pixel(0, 0).r, 20);
    dec.seek(1.9).unwrap();
    assert_eq!(dec.capture().unwrap().pixel(0, 0).r, 20);

    let probe = dec.probe().unwrap();
    assert!(probe.is_usable());
    assert_eq!((probe.width, probe.height), (2, 2));
}

#[test]
fn memory_decoder_rejects_mixed_dimensions() {
    let small = solid(0);
    let big = PixelBuffer::filled(3, 3, Rgba8::BLACK).unwrap();
    assert!(MemoryDecoder::new(1.0, vec![(0.0, small), (0.5, big)]).is_err());
    assert!(MemoryDecoder::new(1.0, Vec::new()).is_err());
}

#[test]
fn ffmpeg_decoder_requires_existing_source() {
    assert!(FfmpegDecoder::open("definitely/not/here.mp4").is_err());
}

#[test]
fn held_frame_survives_seeks_past_the_last_decodable_frame() {
    // Outcomes of successive single-frame decodes on a clip whose container outlasts its video.
    let script = [Some(solid(10)), Some(solid(20)), None, None];
    let mut held = HeldFrame::default();
    assert!(held.current().is_err());

    for (i, decoded) in script.into_iter().enumerate() {
        held.update(decoded, i as f64 * 0.5, 2.043).unwrap();
    }
    assert_eq!(held.current().unwrap().pixel(0, 0).r, 20);
}

#[test]
fn held_frame_errors_without_anything_to_hold() {
    let mut held = HeldFrame::default();
    assert!(held.update(None, 0.0, 1.0).is_err());

    held.update(Some(solid(5)), 0.0, 1.0).unwrap();
    assert!(held.update(None, 1.5, 1.0).is_err());
}

#[test]
fn stream_duration_beats_container_duration() {
    let json = br#"{
        "streams": [
            { "codec_type": "audio", "duration": "2.043000" },
            { "codec_type": "video", "width": 640, "height": 480, "duration": "2.000000" }
        ],
        "format": { "duration": "2.043000" }
    }"#;
    let probe = parse_probe_json(json).unwrap();
    assert_eq!(probe.duration_secs, 2.0);
    assert_eq!((probe.width, probe.height), (640, 480));
    assert!(probe.is_usable());
}

#[test]
fn container_duration_used_when_stream_has_none() {
    let json = br#"{
        "streams": [{ "codec_type": "video", "width": 64, "height": 48 }],
        "format": { "duration": "1.500000" }
    }"#;
    assert_eq!(parse_probe_json(json).unwrap().duration_secs, 1.5);

    let no_duration = br#"{ "streams": [{ "codec_type": "video", "width": 64, "height": 48 }] }"#;
    let probe = parse_probe_json(no_duration).unwrap();
    assert!(probe.duration_secs.is_nan());
    assert!(!probe.is_usable());

    assert!(parse_probe_json(br#"{ "streams": [] }"#).is_err());
}
