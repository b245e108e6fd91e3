/// Convenience result type used across the stippler.
pub type StippleResult<T> = Result<T, StippleError>;

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum StippleError {
    /// Invalid user-provided configuration or buffer data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The media source could not be probed, decoded, or seeked.
    #[error("media error: {0}")]
    Media(String),

    /// The decoder never reported usable duration/dimensions within the retry budget.
    #[error("media metadata unavailable after {attempts} attempts")]
    MediaMetadataUnavailable {
        /// Number of probes performed before giving up.
        attempts: u32,
    },

    /// Errors while writing rendered frames to an output.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StippleError {
    /// Build a [`StippleError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StippleError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`StippleError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
