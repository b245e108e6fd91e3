use crate::{
    encode::sink::{FrameSink, SinkConfig, Viewport},
    foundation::error::StippleResult,
    pipeline::{clock::Clock, frames::FrameSequence},
};

/// Present every frame of `sequence` in order, holding each for `1000 / fps` ms.
///
/// The sequence is consumed; nothing is kept once playback finishes. An empty sequence leaves
/// the sink untouched.
#[tracing::instrument(skip_all, fields(frames = sequence.len()))]
pub fn play<S, C>(
    sequence: FrameSequence,
    sink: &mut S,
    viewport: Viewport,
    clock: &mut C,
) -> StippleResult<()>
where
    S: FrameSink + ?Sized,
    C: Clock + ?Sized,
{
    let Some((width, height)) = sequence.dimensions() else {
        tracing::debug!("nothing to play");
        return Ok(());
    };
    let fps = sequence.fps();
    let hold = fps.frame_hold();

    sink.begin(SinkConfig {
        width,
        height,
        fps,
        display: viewport.fit(width, height),
    })?;
    for timed in sequence.into_frames() {
        sink.push_frame(timed.index, &timed.frame)?;
        clock.sleep(hold);
    }
    sink.end()
}

/// Push every frame of `sequence` into `sink` without waiting between frames.
pub fn export<S>(sequence: &FrameSequence, sink: &mut S, viewport: Viewport) -> StippleResult<()>
where
    S: FrameSink + ?Sized,
{
    let Some((width, height)) = sequence.dimensions() else {
        return Ok(());
    };
    sink.begin(SinkConfig {
        width,
        height,
        fps: sequence.fps(),
        display: viewport.fit(width, height),
    })?;
    for timed in sequence.frames() {
        sink.push_frame(timed.index, &timed.frame)?;
    }
    sink.end()
}
