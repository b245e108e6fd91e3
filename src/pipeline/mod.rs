//! Video extension: sequential extract-and-stipple, then fixed-rate playback.

/// Waits used by polling and playback.
pub mod clock;
/// Metadata polling and per-timestamp frame extraction.
pub mod frames;
/// Fixed-rate presentation of a rendered sequence.
pub mod playback;
