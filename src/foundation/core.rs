use std::time::Duration;

use crate::foundation::error::{StippleError, StippleResult};

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white, the stipple paper color.
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    /// Opaque black, the monochrome ink color.
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    /// Build an opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Return the same color with alpha forced to 255.
    pub fn to_opaque(self) -> Self {
        Self { a: 255, ..self }
    }
}

/// A rectangular RGBA8 pixel grid, tightly packed, row-major, origin top-left.
///
/// Both decoded sources and rendered stipple frames use this layout. Construction rejects empty
/// grids so every buffer has at least one pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA8 bytes. `data.len()` must equal `width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> StippleResult<Self> {
        if width == 0 || height == 0 {
            return Err(StippleError::validation(format!(
                "pixel buffer must be non-empty, got {width}x{height}"
            )));
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(StippleError::validation(format!(
                "pixel buffer byte length mismatch: got {}, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> StippleResult<Self> {
        let px = [color.r, color.g, color.b, color.a];
        let data = px.repeat(width as usize * height as usize);
        Self::new(width, height, data)
    }

    /// Build a buffer from a row-major list of pixels.
    pub fn from_pixels(width: u32, height: u32, pixels: &[Rgba8]) -> StippleResult<Self> {
        let data = pixels.iter().flat_map(|c| [c.r, c.g, c.b, c.a]).collect();
        Self::new(width, height, data)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels (`width * height`).
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Color of the pixel at row-major `index`.
    ///
    /// Panics if `index >= pixel_count()`.
    pub fn pixel_at(&self, index: usize) -> Rgba8 {
        let px = &self.data[index * 4..index * 4 + 4];
        Rgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        }
    }

    /// Color of the pixel at `(x, y)`.
    ///
    /// Panics if the coordinate is outside the grid.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.pixel_at(y as usize * self.width as usize + x as usize)
    }

    /// Iterate pixels in row-major order.
    pub fn pixels(&self) -> impl ExactSizeIterator<Item = Rgba8> + '_ {
        self.data.chunks_exact(4).map(|px| Rgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
    }
}

/// How dots are shaded and how many are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Black dots on white; uses the wider contrast curve.
    #[default]
    Monochrome,
    /// Dots take the sampled pixel's color; the dot budget is doubled.
    Color,
}

/// User-facing dot density knob. Larger values produce more dots.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Precision(f64);

impl Precision {
    /// Validate a precision value; it must be finite and strictly positive.
    pub fn new(value: f64) -> StippleResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(StippleError::validation(format!(
                "precision must be a positive finite number, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// The raw value.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Weight mass per dot: `1 + 20 / (precision / 20 + 0.2)`.
    ///
    /// Strictly decreasing in precision and always greater than 1.
    pub fn scaling_factor(self) -> f64 {
        1.0 + 20.0 / (self.0 / 20.0 + 0.2)
    }
}

/// Frame sampling and playback rate in frames per second.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Fps(f64);

impl Fps {
    /// Validate a frame rate; it must be finite and strictly positive.
    pub fn new(value: f64) -> StippleResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(StippleError::validation(format!(
                "fps must be a positive finite number, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// The raw value.
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Seconds between two sampled timestamps.
    pub fn interval_secs(self) -> f64 {
        1.0 / self.0
    }

    /// How long each frame is held during playback (`1000 / fps` ms).
    pub fn frame_hold(self) -> Duration {
        Duration::from_secs_f64(self.interval_secs())
    }

    /// Timestamp of the `index`-th sample.
    pub fn frame_time_secs(self, index: u64) -> f64 {
        index as f64 / self.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
