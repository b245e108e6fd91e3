//! Boundary collaborators: image decoding and video decoders.

/// Still image decoding and media kind detection.
pub mod decode;
/// Video decoder contract and implementations.
pub mod media;
