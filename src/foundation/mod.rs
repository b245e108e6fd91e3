/// Pixel buffers, colors, and validated scalar knobs.
pub mod core;
/// Crate error type.
pub mod error;
