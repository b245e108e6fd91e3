//! Luminance to sampling weight.
//!
//! Dark pixels map near the top of the active curve and bright pixels toward its bottom, so ink
//! gathers in shadows. The curves are not clamped: near-white pixels get a slightly negative
//! weight and that is kept as-is.

use crate::foundation::core::{RenderMode, Rgba8};

/// Rec. 601 luma of an 8-bit RGB triple, in `[0, 255]`.
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)
}

/// Logistic step centered at mid-gray with steepness 12, in `(0, 1)`.
fn logistic(l: f64) -> f64 {
    1.0 / (1.0 + (-12.0 * (l / 255.0 - 0.5)).exp())
}

/// Sampling weight for a pixel under `mode`.
pub fn weight(r: u8, g: u8, b: u8, mode: RenderMode) -> f64 {
    let s = logistic(luminance(r, g, b));
    match mode {
        RenderMode::Monochrome => 0.95 - 0.9 * s,
        // Dips below zero for near-white pixels.
        RenderMode::Color => 1.01 - 1.02 * s,
    }
}

/// [`weight`] for an [`Rgba8`]; alpha is ignored.
pub fn pixel_weight(px: Rgba8, mode: RenderMode) -> f64 {
    weight(px.r, px.g, px.b, mode)
}

#[cfg(test)]
#[path = "../../tests/unit/stipple/intensity.rs"]
mod tests;
