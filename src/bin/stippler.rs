use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stippler", version, about = "Render images and videos as stipple drawings")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stipple a single image into a PNG.
    Image(ImageArgs),
    /// Stipple every sampled frame of a video (requires the `media-ffmpeg` feature).
    Video(VideoArgs),
    /// Pick `image` or `video` from the input's file type.
    Auto(AutoArgs),
}

#[derive(clap::Args, Debug)]
struct SharedArgs {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stipple mode.
    #[arg(long, value_enum)]
    mode: Option<ModeChoice>,

    /// Dot density; higher means more dots.
    #[arg(long)]
    precision: Option<f64>,

    /// Video sampling and playback rate.
    #[arg(long)]
    fps: Option<f64>,

    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(clap::Args, Debug)]
struct ImageArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    shared: SharedArgs,
}

#[derive(clap::Args, Debug)]
struct VideoOutputArgs {
    /// Also encode the stippled frames into this MP4 (requires `ffmpeg` on PATH).
    #[arg(long)]
    mp4: Option<PathBuf>,

    /// Present frames at the frame rate instead of writing them as fast as possible.
    #[arg(long)]
    play: bool,

    /// Resize written PNG frames to fit the configured viewport.
    #[arg(long)]
    scale_to_display: bool,
}

#[derive(clap::Args, Debug)]
struct VideoArgs {
    /// Input video.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory receiving `frame_NNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    #[command(flatten)]
    output: VideoOutputArgs,

    #[command(flatten)]
    shared: SharedArgs,
}

#[derive(clap::Args, Debug)]
struct AutoArgs {
    /// Input image or video.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path for images, output directory for videos.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    output: VideoOutputArgs,

    #[command(flatten)]
    shared: SharedArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Monochrome,
    Color,
}

impl From<ModeChoice> for stippler::RenderMode {
    fn from(value: ModeChoice) -> Self {
        match value {
            ModeChoice::Monochrome => Self::Monochrome,
            ModeChoice::Color => Self::Color,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Image(args) => {
            let cfg = resolve_config(&args.shared)?;
            cmd_image(&args.in_path, &args.out, &cfg)
        }
        Command::Video(args) => {
            let cfg = resolve_config(&args.shared)?;
            cmd_video(&args.in_path, &args.out_dir, &args.output, &cfg)
        }
        Command::Auto(args) => {
            let cfg = resolve_config(&args.shared)?;
            match stippler::MediaKind::detect(&args.in_path) {
                stippler::MediaKind::Image => cmd_image(&args.in_path, &args.out, &cfg),
                stippler::MediaKind::Video => {
                    cmd_video(&args.in_path, &args.out, &args.output, &cfg)
                }
            }
        }
    }
}

fn resolve_config(shared: &SharedArgs) -> anyhow::Result<stippler::StippleConfig> {
    let mut cfg = match &shared.config {
        Some(path) => stippler::StippleConfig::load(path)?,
        None => stippler::StippleConfig::default(),
    };
    if let Some(mode) = shared.mode {
        cfg.mode = mode.into();
    }
    if let Some(precision) = shared.precision {
        cfg.precision = precision;
    }
    if let Some(fps) = shared.fps {
        cfg.fps = fps;
    }
    if shared.seed.is_some() {
        cfg.seed = shared.seed;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_image(in_path: &Path, out: &Path, cfg: &stippler::StippleConfig) -> anyhow::Result<()> {
    let source = stippler::load_image(in_path)?;
    let mut renderer = stippler::StippleRenderer::new(cfg.settings()?, cfg.seed);
    let frame = renderer.render(&source)?;
    stippler::write_png(out, frame.pixels())?;

    eprintln!("wrote {} ({} dots)", out.display(), frame.dot_count());
    Ok(())
}

fn cmd_video(
    in_path: &Path,
    out_dir: &Path,
    output: &VideoOutputArgs,
    cfg: &stippler::StippleConfig,
) -> anyhow::Result<()> {
    let mp4 = output.mp4.as_ref().map(stippler::FfmpegSinkOpts::new);
    if let Some(opts) = &mp4 {
        stippler::FfmpegSink::preflight(opts)?;
    }

    let decoder = stippler::FfmpegDecoder::open(in_path)?;
    let renderer = stippler::StippleRenderer::new(cfg.settings()?, cfg.seed);
    let fps = cfg.fps()?;

    let sequence = stippler::FramePipeline::new(
        decoder,
        renderer,
        fps,
        cfg.metadata_retry,
        stippler::SystemClock,
    )?
    .run()
    .with_context(|| format!("stipple video '{}'", in_path.display()))?;

    if sequence.is_empty() {
        eprintln!("no frames sampled from {}", in_path.display());
        return Ok(());
    }

    let frames = sequence.len();
    let mut pngs =
        stippler::PngSequenceSink::new(out_dir).scale_to_display(output.scale_to_display);
    if output.play {
        // Playback consumes the sequence, so the MP4 has to be encoded first.
        if let Some(opts) = mp4 {
            write_mp4(&sequence, opts, cfg)?;
        }
        stippler::play(sequence, &mut pngs, cfg.viewport, &mut stippler::SystemClock)?;
    } else {
        stippler::export(&sequence, &mut pngs, cfg.viewport)?;
        if let Some(opts) = mp4 {
            write_mp4(&sequence, opts, cfg)?;
        }
    }

    eprintln!("wrote {frames} frames to {}", out_dir.display());
    Ok(())
}

fn write_mp4(
    sequence: &stippler::FrameSequence,
    opts: stippler::FfmpegSinkOpts,
    cfg: &stippler::StippleConfig,
) -> anyhow::Result<()> {
    let path = opts.out_path.clone();
    let mut sink = stippler::FfmpegSink::new(opts);
    stippler::export(sequence, &mut sink, cfg.viewport)
        .with_context(|| format!("encode '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
