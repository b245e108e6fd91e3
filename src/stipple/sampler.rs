use rand::Rng;

use crate::{
    foundation::{
        core::{PixelBuffer, Rgba8},
        error::{StippleError, StippleResult},
    },
    stipple::distribution::CumulativeDistribution,
};

/// A pixel picked by [`WeightedSampler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampledPixel {
    /// Row-major index into the source buffer.
    pub index: usize,
    /// Column of the pixel.
    pub x: u32,
    /// Row of the pixel.
    pub y: u32,
    /// Source color of the pixel.
    pub color: Rgba8,
}

/// Inverse-CDF sampler over a [`CumulativeDistribution`].
///
/// Each draw is independent; the same pixel can be returned any number of times.
pub struct WeightedSampler<'a> {
    buffer: &'a PixelBuffer,
    dist: &'a CumulativeDistribution,
    range: f64,
}

impl<'a> WeightedSampler<'a> {
    /// Pair a source buffer with the distribution built from it.
    pub fn new(buffer: &'a PixelBuffer, dist: &'a CumulativeDistribution) -> StippleResult<Self> {
        if dist.len() != buffer.pixel_count() {
            return Err(StippleError::validation(format!(
                "distribution has {} entries but buffer has {} pixels",
                dist.len(),
                buffer.pixel_count()
            )));
        }
        Ok(Self {
            buffer,
            dist,
            // Negative totals would make the uniform range invalid.
            range: dist.total_weight().max(0.0),
        })
    }

    /// Upper bound of the uniform target range, `max(total_weight, 0)`.
    pub fn range(&self) -> f64 {
        self.range
    }

    /// Index of the first entry whose cumulative weight exceeds `target`.
    ///
    /// Binary search over the prefix sums, so it terminates for any non-empty distribution.
    /// When the search lands on index 0 there is no predecessor to compare against and pixel 0
    /// is returned directly. A target at or past the total weight (only reachable by calling
    /// this directly) resolves to the last entry with a positive weight.
    pub fn locate(&self, target: f64) -> usize {
        let entries = self.dist.entries();
        let idx = entries.partition_point(|e| e.cumulative <= target);
        if idx == 0 {
            return 0;
        }
        if idx < entries.len() {
            return idx;
        }
        (0..entries.len())
            .rev()
            .find(|&i| self.dist.weight_at(i) > 0.0)
            .unwrap_or(entries.len() - 1)
    }

    /// Resolve `target` to the sampled pixel with its coordinates and color.
    pub fn pick(&self, target: f64) -> SampledPixel {
        let index = self.locate(target);
        let entry = self.dist.entries()[index];
        SampledPixel {
            index,
            x: entry.x,
            y: entry.y,
            color: self.buffer.pixel_at(index),
        }
    }

    /// Draw `r ~ U[0, range)` and return the pixel it lands on.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SampledPixel {
        let target = if self.range > 0.0 {
            rng.gen_range(0.0..self.range)
        } else {
            0.0
        };
        self.pick(target)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stipple/sampler.rs"]
mod tests;
