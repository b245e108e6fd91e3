use crate::{
    foundation::core::{PixelBuffer, RenderMode},
    stipple::intensity::pixel_weight,
};

/// One prefix-sum entry: the running weight up to and including the pixel at `(x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CumulativeEntry {
    /// Sum of weights of this pixel and every pixel before it in row-major order.
    pub cumulative: f64,
    /// Column of the pixel.
    pub x: u32,
    /// Row of the pixel.
    pub y: u32,
}

/// Prefix sums of per-pixel weights over a [`PixelBuffer`], one entry per pixel.
///
/// Entry `i` minus entry `i - 1` is pixel `i`'s weight and the last entry is the total weight.
/// Weights of near-white pixels can be slightly negative, so the sequence is only
/// non-decreasing for images whose curve values stay non-negative.
#[derive(Clone, Debug)]
pub struct CumulativeDistribution {
    entries: Vec<CumulativeEntry>,
    total: f64,
}

impl CumulativeDistribution {
    /// Single row-major pass over `buffer`.
    pub fn build(buffer: &PixelBuffer, mode: RenderMode) -> Self {
        let width = buffer.width();
        let mut entries = Vec::with_capacity(buffer.pixel_count());
        let mut running = 0.0f64;
        for (idx, px) in buffer.pixels().enumerate() {
            running += pixel_weight(px, mode);
            let idx = idx as u32;
            entries.push(CumulativeEntry {
                cumulative: running,
                x: idx % width,
                y: idx / width,
            });
        }
        Self {
            entries,
            total: running,
        }
    }

    /// Build from raw per-index weights laid out on a `width`-wide grid.
    ///
    /// Returns `None` when `weights` is empty or `width` is zero.
    pub fn from_weights(weights: &[f64], width: u32) -> Option<Self> {
        if weights.is_empty() || width == 0 {
            return None;
        }
        let mut running = 0.0;
        let entries = weights
            .iter()
            .enumerate()
            .map(|(idx, w)| {
                running += w;
                let idx = idx as u32;
                CumulativeEntry {
                    cumulative: running,
                    x: idx % width,
                    y: idx / width,
                }
            })
            .collect();
        Some(Self {
            entries,
            total: running,
        })
    }

    /// Wrap precomputed entries. The total is the last entry's cumulative weight.
    ///
    /// Returns `None` for an empty list.
    pub fn from_entries(entries: Vec<CumulativeEntry>) -> Option<Self> {
        let total = entries.last()?.cumulative;
        Some(Self { entries, total })
    }

    /// All entries in row-major order.
    pub fn entries(&self) -> &[CumulativeEntry] {
        &self.entries
    }

    /// Number of entries (equals the source pixel count).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for distributions built from a [`PixelBuffer`].
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all pixel weights. May be zero or slightly negative for blank images.
    pub fn total_weight(&self) -> f64 {
        self.total
    }

    /// Weight contributed by the entry at `index` alone.
    pub fn weight_at(&self, index: usize) -> f64 {
        let prev = if index == 0 {
            0.0
        } else {
            self.entries[index - 1].cumulative
        };
        self.entries[index].cumulative - prev
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stipple/distribution.rs"]
mod tests;
