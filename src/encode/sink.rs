use crate::foundation::{core::Fps, error::StippleResult};
use crate::render::stipple::RenderedFrame;

/// Bounded display area that frames are fitted into, keeping their aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Viewport {
    /// Total viewport width in pixels.
    pub width: u32,
    /// Total viewport height in pixels.
    pub height: u32,
    /// Horizontal space reserved for surrounding chrome.
    pub margin_x: u32,
    /// Vertical space reserved for surrounding chrome.
    pub margin_y: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            margin_x: 50,
            margin_y: 150,
        }
    }
}

/// Result of fitting a frame into a [`Viewport`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayFit {
    /// Uniform zoom applied to both axes.
    pub scale: f64,
    /// Displayed width, at least 1.
    pub width: u32,
    /// Displayed height, at least 1.
    pub height: u32,
}

impl Viewport {
    /// Zoom `min((W - mx) / w, (H - my) / h)` for a `w`x`h` frame.
    pub fn fit(&self, width: u32, height: u32) -> DisplayFit {
        let avail_w = f64::from(self.width.saturating_sub(self.margin_x).max(1));
        let avail_h = f64::from(self.height.saturating_sub(self.margin_y).max(1));
        let scale = (avail_w / f64::from(width.max(1))).min(avail_h / f64::from(height.max(1)));
        DisplayFit {
            scale,
            width: ((f64::from(width) * scale).round() as u32).max(1),
            height: ((f64::from(height) * scale).round() as u32).max(1),
        }
    }
}

/// Configuration handed to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SinkConfig {
    /// Source frame width.
    pub width: u32,
    /// Source frame height.
    pub height: u32,
    /// Presentation rate.
    pub fps: Fps,
    /// Target display size for sinks that scale.
    pub display: DisplayFit,
}

/// Consumer of rendered frames: a display, a file sequence, or an encoder.
///
/// `push_frame` is called with strictly increasing indices between one `begin` and one `end`.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> StippleResult<()>;
    /// Present one frame.
    fn push_frame(&mut self, idx: u64, frame: &RenderedFrame) -> StippleResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> StippleResult<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn begin(&mut self, cfg: SinkConfig) -> StippleResult<()> {
        (**self).begin(cfg)
    }

    fn push_frame(&mut self, idx: u64, frame: &RenderedFrame) -> StippleResult<()> {
        (**self).push_frame(idx, frame)
    }

    fn end(&mut self) -> StippleResult<()> {
        (**self).end()
    }
}

/// In-memory sink for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, RenderedFrame)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Frames received, in order.
    pub fn frames(&self) -> &[(u64, RenderedFrame)] {
        &self.frames
    }

    /// Whether `end` has been called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> StippleResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &RenderedFrame) -> StippleResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> StippleResult<()> {
        self.ended = true;
        Ok(())
    }
}
