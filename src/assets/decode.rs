use std::path::Path;

use anyhow::Context;

use crate::foundation::{
    core::PixelBuffer,
    error::{StippleError, StippleResult},
};

/// Whether a source is handled as a still image or as a video.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    /// Any format the `image` crate can decode.
    Image,
    /// Everything else; handed to a video decoder.
    Video,
}

impl MediaKind {
    /// Classify `path` by its extension.
    pub fn detect(path: &Path) -> Self {
        match image::ImageFormat::from_path(path) {
            Ok(format) if format.reading_enabled() => Self::Image,
            _ => Self::Video,
        }
    }
}

/// Decode encoded image bytes into an opaque [`PixelBuffer`].
///
/// Translucent pixels are composited over white so they read as paper, not ink.
pub fn decode_image(bytes: &[u8]) -> StippleResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    rgba_image_to_buffer(dyn_img.to_rgba8())
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> StippleResult<PixelBuffer> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes).map_err(|e| match e {
        StippleError::Other(err) => {
            StippleError::Other(err.context(format!("decode image '{}'", path.display())))
        }
        other => other,
    })
}

fn rgba_image_to_buffer(rgba: image::RgbaImage) -> StippleResult<PixelBuffer> {
    let (width, height) = rgba.dimensions();
    let mut data = rgba.into_raw();
    flatten_over_white_in_place(&mut data);
    PixelBuffer::new(width, height, data)
}

fn flatten_over_white_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        let inv = 255 - a;
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 255 * inv + 127) / 255) as u8;
        }
        px[3] = 255;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
