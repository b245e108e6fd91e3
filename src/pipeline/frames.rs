use std::time::Duration;

use crate::{
    assets::media::{MediaDecoder, MediaProbe},
    foundation::{
        core::Fps,
        error::{StippleError, StippleResult},
    },
    pipeline::clock::Clock,
    render::stipple::{RenderedFrame, StippleRenderer},
};

/// Bounded polling policy for decoder metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryPolicy {
    /// Probes performed before giving up; must be at least 1.
    pub max_attempts: u32,
    /// Delay between consecutive probes, in milliseconds.
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            backoff_ms: 1000,
        }
    }
}

impl RetryPolicy {
    /// Delay between consecutive probes.
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    /// Reject a zero attempt budget.
    pub fn validate(&self) -> StippleResult<()> {
        if self.max_attempts == 0 {
            return Err(StippleError::validation(
                "metadata retry max_attempts must be at least 1",
            ));
        }
        Ok(())
    }
}

/// One stippled frame and the source timestamp it was captured at.
#[derive(Clone, Debug)]
pub struct TimedFrame {
    /// Position in the sequence, starting at 0.
    pub index: u64,
    /// Source timestamp in seconds (`index / fps`).
    pub time_secs: f64,
    /// The rendered stipple frame.
    pub frame: RenderedFrame,
}

/// Rendered frames in increasing timestamp order, plus the rate they were sampled at.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    fps: Fps,
    frames: Vec<TimedFrame>,
}

impl FrameSequence {
    /// Rate used for both sampling and playback.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frame was sampled (zero-length source).
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Borrow the frames in order.
    pub fn frames(&self) -> &[TimedFrame] {
        &self.frames
    }

    /// Source timestamps of every frame, in order.
    pub fn timestamps(&self) -> Vec<f64> {
        self.frames.iter().map(|f| f.time_secs).collect()
    }

    /// Common frame size, if any frame exists.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.frames
            .first()
            .map(|f| (f.frame.width(), f.frame.height()))
    }

    /// Consume the sequence and return its frames.
    pub fn into_frames(self) -> Vec<TimedFrame> {
        self.frames
    }
}

/// Timestamps `0, 1/fps, 2/fps, ...` strictly below `duration_secs`.
pub fn sample_times(duration_secs: f64, fps: Fps) -> impl Iterator<Item = f64> {
    (0u64..).map_while(move |i| sample_time(i, duration_secs, fps))
}

/// Timestamp of sample `index`, or `None` once it reaches `duration_secs`.
fn sample_time(index: u64, duration_secs: f64, fps: Fps) -> Option<f64> {
    let t = fps.frame_time_secs(index);
    (t < duration_secs).then_some(t)
}

/// Where a [`FramePipeline`] is in its run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PipelineState {
    /// Polling the decoder; `attempts` probes have been made so far.
    AwaitingMetadata {
        /// Probes performed so far.
        attempts: u32,
    },
    /// About to capture the frame at `time_secs`.
    Sampling {
        /// Index of the next frame.
        index: u64,
        /// Timestamp of the next frame.
        time_secs: f64,
    },
    /// Every timestamp below the duration has been rendered.
    Done,
}

/// Progress of frame extraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtractProgress {
    /// Frames rendered so far.
    pub frames_done: u64,
    /// Timestamp of the frame just rendered.
    pub time_secs: f64,
    /// `floor(100 * time / duration)`.
    pub percent: u32,
}

/// Sequential extract-and-stipple loop over a video decoder.
///
/// Drive it with [`FramePipeline::step`] or run it to completion with [`FramePipeline::run`].
/// Every wait (metadata backoff) goes through the supplied [`Clock`].
pub struct FramePipeline<D, C> {
    decoder: D,
    clock: C,
    renderer: StippleRenderer,
    fps: Fps,
    retry: RetryPolicy,
    state: PipelineState,
    probe: Option<MediaProbe>,
    frames: Vec<TimedFrame>,
    on_progress: Option<Box<dyn FnMut(ExtractProgress)>>,
}

impl<D: MediaDecoder, C: Clock> FramePipeline<D, C> {
    /// Create a pipeline in [`PipelineState::AwaitingMetadata`].
    pub fn new(
        decoder: D,
        renderer: StippleRenderer,
        fps: Fps,
        retry: RetryPolicy,
        clock: C,
    ) -> StippleResult<Self> {
        retry.validate()?;
        Ok(Self {
            decoder,
            clock,
            renderer,
            fps,
            retry,
            state: PipelineState::AwaitingMetadata { attempts: 0 },
            probe: None,
            frames: Vec::new(),
            on_progress: None,
        })
    }

    /// Call `f` after every rendered frame.
    pub fn on_progress(mut self, f: impl FnMut(ExtractProgress) + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    /// Current state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Metadata accepted when leaving [`PipelineState::AwaitingMetadata`].
    pub fn probe(&self) -> Option<MediaProbe> {
        self.probe
    }

    /// Perform one transition. Returns `false` once the pipeline is [`PipelineState::Done`].
    pub fn step(&mut self) -> StippleResult<bool> {
        match self.state {
            PipelineState::AwaitingMetadata { attempts } => {
                self.poll_metadata(attempts)?;
                Ok(true)
            }
            PipelineState::Sampling { index, time_secs } => {
                self.sample_frame(index, time_secs)?;
                Ok(true)
            }
            PipelineState::Done => Ok(false),
        }
    }

    /// Run until [`PipelineState::Done`] and return the rendered sequence.
    #[tracing::instrument(skip(self), fields(fps = self.fps.as_f64()))]
    pub fn run(mut self) -> StippleResult<FrameSequence> {
        while self.step()? {}
        tracing::info!(frames = self.frames.len(), "frame extraction finished");
        Ok(FrameSequence {
            fps: self.fps,
            frames: self.frames,
        })
    }

    fn poll_metadata(&mut self, attempts: u32) -> StippleResult<()> {
        if attempts > 0 {
            self.clock.sleep(self.retry.backoff());
        }
        let probe = self.decoder.probe()?;
        let attempts = attempts + 1;
        if probe.is_usable() {
            tracing::debug!(
                attempts,
                frames = sample_times(probe.duration_secs, self.fps).count(),
                duration_secs = probe.duration_secs,
                width = probe.width,
                height = probe.height,
                "media metadata ready"
            );
            self.probe = Some(probe);
            self.state = self.sampling_state(0, probe.duration_secs);
            return Ok(());
        }

        tracing::warn!(
            attempts,
            duration_secs = probe.duration_secs,
            ready = probe.ready,
            "media metadata not usable yet"
        );
        if attempts >= self.retry.max_attempts {
            return Err(StippleError::MediaMetadataUnavailable { attempts });
        }
        self.state = PipelineState::AwaitingMetadata { attempts };
        Ok(())
    }

    fn sample_frame(&mut self, index: u64, time_secs: f64) -> StippleResult<()> {
        let duration = self
            .probe
            .map(|p| p.duration_secs)
            .ok_or_else(|| StippleError::media("sampling started without metadata"))?;

        self.decoder.seek(time_secs)?;
        let source = self.decoder.capture()?;
        let frame = self.renderer.render(&source)?;
        self.frames.push(TimedFrame {
            index,
            time_secs,
            frame,
        });

        let progress = ExtractProgress {
            frames_done: index + 1,
            time_secs,
            percent: percent_of(time_secs, duration),
        };
        tracing::info!(percent = progress.percent, time_secs, "frame rendered");
        if let Some(cb) = self.on_progress.as_mut() {
            cb(progress);
        }

        self.state = self.sampling_state(index + 1, duration);
        Ok(())
    }

    fn sampling_state(&self, index: u64, duration_secs: f64) -> PipelineState {
        match sample_time(index, duration_secs, self.fps) {
            Some(time_secs) => PipelineState::Sampling { index, time_secs },
            None => PipelineState::Done,
        }
    }
}

fn percent_of(time_secs: f64, duration_secs: f64) -> u32 {
    if duration_secs <= 0.0 {
        return 100;
    }
    (100.0 * time_secs / duration_secs).floor().clamp(0.0, 100.0) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/frames.rs"]
mod tests;
