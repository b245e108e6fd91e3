//! Frame sinks: where rendered stipple frames go.
//!
//! Sinks consume frames in sequence order; playback drives them at the frame rate.

/// `ffmpeg`-based MP4 sink.
pub mod ffmpeg;
/// PNG file output.
pub mod png;
/// Sink trait, viewport fitting, and the in-memory sink.
pub mod sink;
