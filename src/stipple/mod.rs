//! Weighted pixel sampling: intensity curves, prefix-sum distribution, inverse-CDF draws.

/// Prefix-sum distribution over pixel weights.
pub mod distribution;
/// Luminance and contrast curves.
pub mod intensity;
/// Inverse-CDF sampler.
pub mod sampler;
