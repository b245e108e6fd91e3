use rand::Rng;
use vello_cpu::kurbo::Shape as _;

use crate::{
    foundation::{
        core::{PixelBuffer, Precision, RenderMode, Rgba8},
        error::{StippleError, StippleResult},
    },
    stipple::{distribution::CumulativeDistribution, sampler::WeightedSampler},
};

/// Radius of every dot, in output pixels.
pub const DOT_RADIUS: f64 = 2.0;

/// Largest width or height [`render_stipple`] accepts, in pixels.
pub const MAX_DIMENSION: u32 = u16::MAX as u32;

/// Flattening tolerance used when turning dot circles into paths.
const CIRCLE_TOLERANCE: f64 = 0.05;

/// Per-render knobs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StippleSettings {
    /// Curve and dot coloring.
    pub mode: RenderMode,
    /// Dot density.
    pub precision: Precision,
}

/// A stippled frame: white paper with opaque dots, same size as its source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedFrame {
    pixels: PixelBuffer,
    dot_count: u64,
}

impl RenderedFrame {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Number of dots drawn into this frame.
    pub fn dot_count(&self) -> u64 {
        self.dot_count
    }

    /// Output pixels (straight RGBA8, every pixel opaque).
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Raw RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_bytes()
    }

    /// Consume the frame and return its pixel buffer.
    pub fn into_pixels(self) -> PixelBuffer {
        self.pixels
    }
}

/// Number of dots to draw for a distribution of `total_weight`.
///
/// `total_weight / factor` dots, doubled in color mode and rounded up. Non-positive totals yield
/// zero dots.
pub fn dot_count(total_weight: f64, mode: RenderMode, precision: Precision) -> u64 {
    let mut n = total_weight.max(0.0) / precision.scaling_factor();
    if mode == RenderMode::Color {
        n *= 2.0;
    }
    n.ceil() as u64
}

/// Stipple `source` onto a fresh white canvas.
///
/// # Errors
///
/// Returns [`StippleError::Validation`] when `source` is wider or taller than
/// [`MAX_DIMENSION`], the largest canvas the rasterizer accepts. Every other non-empty buffer
/// renders.
#[tracing::instrument(
    skip(source, settings, rng),
    fields(width = source.width(), height = source.height(), mode = ?settings.mode)
)]
pub fn render_stipple<R: Rng + ?Sized>(
    source: &PixelBuffer,
    settings: &StippleSettings,
    rng: &mut R,
) -> StippleResult<RenderedFrame> {
    let width: u16 = source
        .width()
        .try_into()
        .map_err(|_| {
            StippleError::validation(format!(
                "frame width {} exceeds the {MAX_DIMENSION} px render limit",
                source.width()
            ))
        })?;
    let height: u16 = source
        .height()
        .try_into()
        .map_err(|_| {
            StippleError::validation(format!(
                "frame height {} exceeds the {MAX_DIMENSION} px render limit",
                source.height()
            ))
        })?;

    let dist = CumulativeDistribution::build(source, settings.mode);
    let sampler = WeightedSampler::new(source, &dist)?;
    let dots = dot_count(dist.total_weight(), settings.mode, settings.precision);
    tracing::debug!(total_weight = dist.total_weight(), dots, "stipple distribution built");

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_paint(paint(Rgba8::WHITE));
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(width),
        f64::from(height),
    ));

    for _ in 0..dots {
        let hit = sampler.sample(rng);
        let ink = match settings.mode {
            RenderMode::Color => hit.color.to_opaque(),
            RenderMode::Monochrome => Rgba8::BLACK,
        };
        let cx = f64::from(hit.x) + rng.gen_range(0.0..1.0);
        let cy = f64::from(hit.y) + rng.gen_range(0.0..1.0);
        ctx.set_paint(paint(ink));
        ctx.fill_path(&vello_cpu::kurbo::Circle::new((cx, cy), DOT_RADIUS).to_path(CIRCLE_TOLERANCE));
    }

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    // Opaque paper under opaque ink: premultiplied bytes equal straight bytes.
    let pixels = PixelBuffer::new(
        source.width(),
        source.height(),
        pixmap.data_as_u8_slice().to_vec(),
    )?;
    Ok(RenderedFrame {
        pixels,
        dot_count: dots,
    })
}

/// Renders successive frames with one owned random stream.
///
/// Seeding makes output reproducible; frames rendered in sequence draw from the same stream, so
/// two renders of the same source differ unless a new renderer is created.
pub struct StippleRenderer {
    settings: StippleSettings,
    rng: rand::rngs::StdRng,
}

impl StippleRenderer {
    /// Create a renderer; `seed = None` seeds from OS entropy.
    pub fn new(settings: StippleSettings, seed: Option<u64>) -> Self {
        use rand::SeedableRng as _;
        let rng = match seed {
            Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
            None => rand::rngs::StdRng::from_entropy(),
        };
        Self { settings, rng }
    }

    /// Settings applied to every frame.
    pub fn settings(&self) -> &StippleSettings {
        &self.settings
    }

    /// Stipple one source frame; sizes above [`MAX_DIMENSION`] are rejected.
    pub fn render(&mut self, source: &PixelBuffer) -> StippleResult<RenderedFrame> {
        render_stipple(source, &self.settings, &mut self.rng)
    }
}

fn paint(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

#[cfg(test)]
#[path = "../../tests/unit/render/stipple.rs"]
mod tests;
