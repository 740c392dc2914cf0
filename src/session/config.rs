use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{FrameshiftError, FrameshiftResult};
use crate::staging::area::StagedFormat;
use crate::upscale::external::DEFAULT_UPSCALER_BIN;

/// How mode strings are routed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteStrategy {
    /// Every named mode runs its in-process pipeline.
    #[default]
    InProcess,
    /// Upscale and filter modes go through the external tool, falling back to the CPU.
    AiWithFallback,
}

/// Fixed output size for the direct upscale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TargetSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for TargetSize {
    fn default() -> Self {
        Self {
            width: crate::effects::transform::UHD_WIDTH,
            height: crate::effects::transform::UHD_HEIGHT,
        }
    }
}

/// Pipeline configuration, loadable from JSON.
///
/// Tool location is explicit per run; nothing is cached process-wide.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Mode routing strategy.
    pub strategy: RouteStrategy,
    /// External upscaler executable.
    pub upscaler_bin: PathBuf,
    /// Image format for staged frames.
    pub staged_image_format: StagedFormat,
    /// Emit a progress event every this many frames.
    pub progress_every: u64,
    /// Overwrite an existing output file.
    pub overwrite: bool,
    /// Output size of the direct upscale.
    pub direct_target: TargetSize,
    /// Encoder quality override.
    pub crf: Option<u8>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            strategy: RouteStrategy::InProcess,
            upscaler_bin: PathBuf::from(DEFAULT_UPSCALER_BIN),
            staged_image_format: StagedFormat::Png,
            progress_every: 30,
            overwrite: true,
            direct_target: TargetSize::default(),
            crf: None,
        }
    }
}

impl PipelineConfig {
    /// Load and validate a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> FrameshiftResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read pipeline config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse pipeline config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> FrameshiftResult<()> {
        if self.progress_every == 0 {
            return Err(FrameshiftError::validation("progress_every must be > 0"));
        }
        let TargetSize { width, height } = self.direct_target;
        if width == 0 || height == 0 {
            return Err(FrameshiftError::validation(
                "direct_target width/height must be non-zero",
            ));
        }
        if self.crf.is_some_and(|crf| crf > 51) {
            return Err(FrameshiftError::validation("crf must be in 0..=51"));
        }
        if self.upscaler_bin.as_os_str().is_empty() {
            return Err(FrameshiftError::validation("upscaler_bin must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
