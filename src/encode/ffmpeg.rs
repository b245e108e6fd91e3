use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::{
    encode::{
        png::ensure_parent_dir,
        sink::{FrameSink, SinkConfig},
    },
    foundation::error::{StippleError, StippleResult},
    render::stipple::RenderedFrame,
};

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGBA frames to its stdin.
///
/// Stipple frames are fully opaque, so bytes are written as-is.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    cfg: Option<SinkConfig>,
    last_idx: Option<u64>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }
}

impl FfmpegSink {
    /// Fail fast on problems that do not depend on frame contents: an existing output file
    /// without `overwrite`, or no `ffmpeg` on `PATH`.
    ///
    /// Run this before a long extraction so the error surfaces before any work is done.
    pub fn preflight(opts: &FfmpegSinkOpts) -> StippleResult<()> {
        if !opts.overwrite && opts.out_path.exists() {
            return Err(StippleError::validation(format!(
                "output file '{}' already exists",
                opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(StippleError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }
        Ok(())
    }
}

/// Encoder arguments for `cfg`, excluding the overwrite flag and output path.
///
/// Odd sizes are padded with white to the next even size, as yuv420p requires.
fn encoder_args(cfg: &SinkConfig) -> Vec<String> {
    let mut args: Vec<String> = [
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    args.push(format!("{}x{}", cfg.width, cfg.height));
    // For rawvideo input, `-r` must come before `-i`.
    args.extend(["-r".to_owned(), format!("{}", cfg.fps.as_f64())]);
    args.extend(["-i", "pipe:0", "-an"].map(String::from));
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        args.extend([
            "-vf".to_owned(),
            "pad=ceil(iw/2)*2:ceil(ih/2)*2:0:0:white".to_owned(),
        ]);
    }
    args.extend(
        [
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]
        .map(String::from),
    );
    args
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> StippleResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(StippleError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        Self::preflight(&self.opts)?;

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if self.opts.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }
        cmd.args(encoder_args(&cfg));
        cmd.arg(&self.opts.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            StippleError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| StippleError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| StippleError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &RenderedFrame) -> StippleResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| StippleError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(StippleError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width() != cfg.width || frame.height() != cfg.height {
            return Err(StippleError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.width,
                cfg.height
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(StippleError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(frame.as_bytes()).map_err(|e| {
            StippleError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> StippleResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| StippleError::encode("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            StippleError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| StippleError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| StippleError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(StippleError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        Ok(())
    }
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
