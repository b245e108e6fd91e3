//! Stipple rasterization on the CPU.

/// Dot placement and drawing.
pub mod stipple;
