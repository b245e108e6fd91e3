use std::path::Path;

use anyhow::Context as _;

use crate::{
    encode::sink::Viewport,
    foundation::{
        core::{Fps, Precision, RenderMode},
        error::{StippleError, StippleResult},
    },
    pipeline::frames::RetryPolicy,
    render::stipple::StippleSettings,
};

/// User-facing configuration, loadable from JSON.
///
/// Missing fields take their defaults; unknown fields are rejected.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StippleConfig {
    /// Monochrome or color stippling.
    pub mode: RenderMode,
    /// Dot density knob; must be positive.
    pub precision: f64,
    /// Video sampling and playback rate; must be positive.
    pub fps: f64,
    /// Seed for reproducible dot placement; random when absent.
    pub seed: Option<u64>,
    /// Metadata polling budget for video sources.
    pub metadata_retry: RetryPolicy,
    /// Display bounds used by scaling sinks.
    pub viewport: Viewport,
}

impl Default for StippleConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Monochrome,
            precision: 50.0,
            fps: 10.0,
            seed: None,
            metadata_retry: RetryPolicy::default(),
            viewport: Viewport::default(),
        }
    }
}

impl StippleConfig {
    /// Parse a JSON document.
    pub fn from_json_str(s: &str) -> StippleResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| StippleError::validation(format!("invalid config JSON: {e}")))
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> StippleResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check every knob, returning the first problem.
    pub fn validate(&self) -> StippleResult<()> {
        self.settings()?;
        self.fps()?;
        self.metadata_retry.validate()
    }

    /// Validated per-render settings.
    pub fn settings(&self) -> StippleResult<StippleSettings> {
        Ok(StippleSettings {
            mode: self.mode,
            precision: Precision::new(self.precision)?,
        })
    }

    /// Validated frame rate.
    pub fn fps(&self) -> StippleResult<Fps> {
        Fps::new(self.fps)
    }
}
