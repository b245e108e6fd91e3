use std::path::{Path, PathBuf};

use crate::foundation::{
    core::PixelBuffer,
    error::{StippleError, StippleResult},
};

/// What a decoder currently knows about its source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MediaProbe {
    /// Source duration in seconds; may be NaN or infinite while the decoder is warming up.
    pub duration_secs: f64,
    /// Decoded frame width.
    pub width: u32,
    /// Decoded frame height.
    pub height: u32,
    /// Whether the decoder has enough data to serve frames.
    pub ready: bool,
}

impl MediaProbe {
    /// Duration is finite and non-negative, dimensions are non-zero, and the decoder is ready.
    pub fn is_usable(&self) -> bool {
        self.ready
            && self.duration_secs.is_finite()
            && self.duration_secs >= 0.0
            && self.width > 0
            && self.height > 0
    }
}

/// Boundary contract for video sources.
pub trait MediaDecoder {
    /// Report current duration, dimensions, and readiness. Cheap enough to poll.
    fn probe(&mut self) -> StippleResult<MediaProbe>;

    /// Move to `time_secs`. Returns only once the seek has completed and a frame is available.
    fn seek(&mut self, time_secs: f64) -> StippleResult<()>;

    /// Copy out the frame at the current position.
    fn capture(&mut self) -> StippleResult<PixelBuffer>;
}

impl<D: MediaDecoder + ?Sized> MediaDecoder for &mut D {
    fn probe(&mut self) -> StippleResult<MediaProbe> {
        (**self).probe()
    }

    fn seek(&mut self, time_secs: f64) -> StippleResult<()> {
        (**self).seek(time_secs)
    }

    fn capture(&mut self) -> StippleResult<PixelBuffer> {
        (**self).capture()
    }
}

/// Decoder over frames already held in memory, each shown from its start time onward.
#[derive(Clone, Debug)]
pub struct MemoryDecoder {
    duration_secs: f64,
    frames: Vec<(f64, PixelBuffer)>,
    position: Option<usize>,
}

impl MemoryDecoder {
    /// `frames` are `(start_time_secs, pixels)` pairs; they are sorted by start time.
    ///
    /// All frames must share dimensions and there must be at least one.
    pub fn new(duration_secs: f64, mut frames: Vec<(f64, PixelBuffer)>) -> StippleResult<Self> {
        let Some((_, first)) = frames.first() else {
            return Err(StippleError::validation("memory decoder needs at least one frame"));
        };
        let (w, h) = (first.width(), first.height());
        if frames.iter().any(|(_, f)| f.width() != w || f.height() != h) {
            return Err(StippleError::validation(
                "memory decoder frames must share dimensions",
            ));
        }
        frames.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(Self {
            duration_secs,
            frames,
            position: None,
        })
    }
}

impl MediaDecoder for MemoryDecoder {
    fn probe(&mut self) -> StippleResult<MediaProbe> {
        let first = &self.frames[0].1;
        Ok(MediaProbe {
            duration_secs: self.duration_secs,
            width: first.width(),
            height: first.height(),
            ready: true,
        })
    }

    fn seek(&mut self, time_secs: f64) -> StippleResult<()> {
        let after = self.frames.partition_point(|(start, _)| *start <= time_secs);
        self.position = Some(after.saturating_sub(1));
        Ok(())
    }

    fn capture(&mut self) -> StippleResult<PixelBuffer> {
        let idx = self
            .position
            .ok_or_else(|| StippleError::media("capture requested before any seek"))?;
        Ok(self.frames[idx].1.clone())
    }
}

/// Video decoder backed by the system `ffprobe`/`ffmpeg` binaries.
///
/// Each [`MediaDecoder::seek`] decodes exactly one RGBA frame at the target time; the seek is
/// complete when that frame has been read back. A seek inside the probed duration that lands
/// past the last decodable frame keeps showing the previous frame.
#[derive(Debug)]
pub struct FfmpegDecoder {
    source_path: PathBuf,
    probed: Option<MediaProbe>,
    held: HeldFrame,
}

impl FfmpegDecoder {
    /// Create a decoder for `source_path`. No process is started until the first probe.
    pub fn open(source_path: impl Into<PathBuf>) -> StippleResult<Self> {
        let source_path = source_path.into();
        if !source_path.exists() {
            return Err(StippleError::media(format!(
                "video source '{}' does not exist",
                source_path.display()
            )));
        }
        Ok(Self {
            source_path,
            probed: None,
            held: HeldFrame::default(),
        })
    }

    /// Path of the underlying media file.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}

impl MediaDecoder for FfmpegDecoder {
    fn probe(&mut self) -> StippleResult<MediaProbe> {
        let probe = probe_video(&self.source_path)?;
        if probe.width > 0 && probe.height > 0 {
            self.probed = Some(probe);
        }
        Ok(probe)
    }

    fn seek(&mut self, time_secs: f64) -> StippleResult<()> {
        let probe = self
            .probed
            .ok_or_else(|| StippleError::media("seek before dimensions were probed"))?;
        let decoded =
            decode_video_frame_rgba8(&self.source_path, probe.width, probe.height, time_secs)?
                .map(|rgba| PixelBuffer::new(probe.width, probe.height, rgba))
                .transpose()?;
        self.held.update(decoded, time_secs, probe.duration_secs)
    }

    fn capture(&mut self) -> StippleResult<PixelBuffer> {
        self.held.current()
    }
}

/// The most recently decoded frame, kept for seeks that decode nothing.
#[derive(Clone, Debug, Default)]
pub(crate) struct HeldFrame {
    frame: Option<PixelBuffer>,
}

impl HeldFrame {
    /// Replace the held frame, or keep it when `decoded` is empty and `time_secs` is in range.
    pub(crate) fn update(
        &mut self,
        decoded: Option<PixelBuffer>,
        time_secs: f64,
        duration_secs: f64,
    ) -> StippleResult<()> {
        match decoded {
            Some(frame) => {
                self.frame = Some(frame);
                Ok(())
            }
            None if self.frame.is_some() && time_secs < duration_secs => {
                tracing::debug!(time_secs, "no frame decoded past stream end, holding last");
                Ok(())
            }
            None => Err(StippleError::media(format!(
                "no video frame decoded at {time_secs:.3}s"
            ))),
        }
    }

    pub(crate) fn current(&self) -> StippleResult<PixelBuffer> {
        self.frame
            .clone()
            .ok_or_else(|| StippleError::media("capture requested before any seek"))
    }
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

/// Turn `ffprobe -show_streams -show_format` JSON into a [`MediaProbe`].
///
/// The video stream's own duration wins over the container's, which can run past the last
/// frame when other streams are longer.
#[cfg_attr(not(feature = "media-ffmpeg"), allow(dead_code))]
pub(crate) fn parse_probe_json(json: &[u8]) -> StippleResult<MediaProbe> {
    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| StippleError::media(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| StippleError::media("no video stream found"))?;

    let parse_secs = |s: &String| s.parse::<f64>().ok().filter(|d| d.is_finite());
    let duration_secs = video_stream
        .duration
        .as_ref()
        .and_then(parse_secs)
        .or_else(|| {
            parsed
                .format
                .as_ref()
                .and_then(|f| f.duration.as_ref())
                .and_then(parse_secs)
        })
        .unwrap_or(f64::NAN);

    let width = video_stream.width.unwrap_or(0);
    let height = video_stream.height.unwrap_or(0);
    Ok(MediaProbe {
        duration_secs,
        width,
        height,
        ready: duration_secs.is_finite() && width > 0 && height > 0,
    })
}

/// Query duration and first video stream dimensions with `ffprobe`.
///
/// A source without a usable duration is reported with `duration_secs = NaN` and
/// `ready = false` instead of failing, so callers can keep polling.
#[cfg(feature = "media-ffmpeg")]
pub fn probe_video(source_path: &Path) -> StippleResult<MediaProbe> {
    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| StippleError::media(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(StippleError::media(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_probe_json(&out.stdout)
}

/// Query duration and dimensions; always fails without the `media-ffmpeg` feature.
#[cfg(not(feature = "media-ffmpeg"))]
pub fn probe_video(_source_path: &Path) -> StippleResult<MediaProbe> {
    Err(StippleError::media(
        "video sources require the 'media-ffmpeg' feature",
    ))
}

/// Decode one RGBA8 frame at `time_secs` with `ffmpeg`.
///
/// Returns `Ok(None)` when ffmpeg succeeds but emits no frame, which happens for timestamps past
/// the last frame of the video stream.
#[cfg(feature = "media-ffmpeg")]
pub fn decode_video_frame_rgba8(
    source_path: &Path,
    width: u32,
    height: u32,
    time_secs: f64,
) -> StippleResult<Option<Vec<u8>>> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-ss", &format!("{time_secs:.9}")])
        .arg("-i")
        .arg(source_path)
        .args([
            "-frames:v",
            "1",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "pipe:1",
        ])
        .output()
        .map_err(|e| StippleError::media(format!("failed to run ffmpeg for video decode: {e}")))?;

    if !out.status.success() {
        return Err(StippleError::media(format!(
            "ffmpeg video decode failed for '{}' at {time_secs:.3}s: {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    if out.stdout.is_empty() {
        return Ok(None);
    }
    let expected_len = width as usize * height as usize * 4;
    if out.stdout.len() < expected_len {
        return Err(StippleError::media(format!(
            "decoded video frame has invalid size: got {} bytes, expected {expected_len}",
            out.stdout.len()
        )));
    }
    let mut frame = out.stdout;
    frame.truncate(expected_len);
    Ok(Some(frame))
}

/// Decode one frame; always fails without the `media-ffmpeg` feature.
#[cfg(not(feature = "media-ffmpeg"))]
pub fn decode_video_frame_rgba8(
    _source_path: &Path,
    _width: u32,
    _height: u32,
    _time_secs: f64,
) -> StippleResult<Option<Vec<u8>>> {
    Err(StippleError::media(
        "video sources require the 'media-ffmpeg' feature",
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
