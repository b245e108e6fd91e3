use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    encode::sink::{FrameSink, SinkConfig},
    foundation::{
        core::PixelBuffer,
        error::{StippleError, StippleResult},
    },
    render::stipple::RenderedFrame,
};

/// Write one PNG to `path`, creating parent directories as needed.
pub fn write_png(path: &Path, pixels: &PixelBuffer) -> StippleResult<()> {
    ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        pixels.as_bytes(),
        pixels.width(),
        pixels.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> StippleResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Sink that writes `frame_00000.png`, `frame_00001.png`, ... into a directory.
///
/// With `scale_to_display` set, frames are resized to the fitted viewport size before writing.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    scale_to_display: bool,
    cfg: Option<SinkConfig>,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    /// Create a sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            scale_to_display: false,
            cfg: None,
            written: Vec::new(),
        }
    }

    /// Resize each frame to the viewport fit before writing.
    pub fn scale_to_display(mut self, yes: bool) -> Self {
        self.scale_to_display = yes;
        self
    }

    /// Paths written so far, in frame order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn frame_path(&self, idx: u64) -> PathBuf {
        self.dir.join(format!("frame_{idx:05}.png"))
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> StippleResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create frame directory '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &RenderedFrame) -> StippleResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| StippleError::encode("png sink not started"))?;
        let path = self.frame_path(idx);

        if self.scale_to_display
            && (cfg.display.width != frame.width() || cfg.display.height != frame.height())
        {
            let img = image::RgbaImage::from_raw(
                frame.width(),
                frame.height(),
                frame.as_bytes().to_vec(),
            )
            .ok_or_else(|| StippleError::encode("frame bytes do not match its dimensions"))?;
            let scaled = image::imageops::resize(
                &img,
                cfg.display.width,
                cfg.display.height,
                image::imageops::FilterType::Triangle,
            );
            let pixels = PixelBuffer::new(scaled.width(), scaled.height(), scaled.into_raw())?;
            write_png(&path, &pixels)?;
        } else {
            write_png(&path, frame.pixels())?;
        }

        tracing::debug!(path = %path.display(), "wrote frame");
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> StippleResult<()> {
        self.cfg = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
