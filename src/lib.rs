//! Stippler turns images and videos into stipple drawings: fields of small dots whose density
//! follows the darkness (or color contrast) of the source.
//!
//! - Weight every pixel with a contrast curve and build a prefix-sum distribution
//! - Draw dot positions with an inverse-CDF sampler and rasterize them on the CPU
//! - For video, sample frames at a fixed rate, stipple each, then play them back through a
//!   [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Image decoding and video decoders.
pub mod assets;
/// JSON configuration.
pub mod config;
/// Frame sinks: PNG, MP4, in-memory.
pub mod encode;
/// Shared value types and errors.
pub mod foundation;
/// Video extraction and playback.
pub mod pipeline;
/// Stipple rasterization.
pub mod render;
/// Pixel weighting and sampling.
pub mod stipple;

pub use crate::foundation::core::{Fps, PixelBuffer, Precision, RenderMode, Rgba8};
pub use crate::foundation::error::{StippleError, StippleResult};

pub use crate::assets::decode::{MediaKind, decode_image, load_image};
pub use crate::assets::media::{
    FfmpegDecoder, MediaDecoder, MediaProbe, MemoryDecoder, decode_video_frame_rgba8, probe_video,
};
pub use crate::config::StippleConfig;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::png::{PngSequenceSink, write_png};
pub use crate::encode::sink::{DisplayFit, FrameSink, InMemorySink, SinkConfig, Viewport};
pub use crate::pipeline::clock::{Clock, RecordingClock, SystemClock};
pub use crate::pipeline::frames::{
    ExtractProgress, FramePipeline, FrameSequence, PipelineState, RetryPolicy, TimedFrame,
    sample_times,
};
pub use crate::pipeline::playback::{export, play};
pub use crate::render::stipple::{
    DOT_RADIUS, MAX_DIMENSION, RenderedFrame, StippleRenderer, StippleSettings, dot_count,
    render_stipple,
};
pub use crate::stipple::distribution::{CumulativeDistribution, CumulativeEntry};
pub use crate::stipple::intensity::{luminance, pixel_weight, weight};
pub use crate::stipple::sampler::{SampledPixel, WeightedSampler};
