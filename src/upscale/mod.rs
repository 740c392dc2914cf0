//! Whole-directory upscaling over a [`StagingArea`].
//!
//! Two implementations share the [`Upscaler`] capability: [`ExternalUpscaler`] runs an
//! out-of-process learned-model tool, [`FallbackUpscaler`] does deterministic resampling on the
//! CPU. [`UpscaleSelector`] tries the first and branches to the second on any reported failure
//! or on outputs that do not decode at the scaled size.

/// Out-of-process upscaling tool wrapper.
pub mod external;
/// CPU resampling + sharpening fallback.
pub mod fallback;

pub use external::ExternalUpscaler;
pub use fallback::FallbackUpscaler;

use crate::foundation::error::{FrameshiftError, FrameshiftResult};
use crate::staging::area::StagingArea;

/// Model name and integer scale handed to an upscaler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelSelection {
    /// Model identifier understood by the external tool.
    pub model: &'static str,
    /// Integer scale factor applied to both axes.
    pub scale: u32,
}

impl ModelSelection {
    /// General-purpose photo model, 4x.
    pub const X4PLUS: Self = Self {
        model: "realesrgan-x4plus",
        scale: 4,
    };
    /// Lightweight video model, 2x.
    pub const ANIMEVIDEO: Self = Self {
        model: "realesr-animevideov3",
        scale: 2,
    };
}

/// Why an upscaler did not produce a complete output set.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UpscaleFailure {
    /// The tool executable could not be found or started.
    #[error("upscaler tool '{path}' is missing")]
    ToolMissing {
        /// Configured tool path.
        path: String,
    },
    /// The tool ran and exited unsuccessfully.
    #[error("upscaler exited with code {code:?}: {stderr}")]
    ExitFailure {
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
        /// Captured tool output (trimmed).
        stderr: String,
    },
    /// The tool reported success but an expected output frame is absent.
    #[error("upscaler produced no output for frame {index}")]
    NoOutputProduced {
        /// First staged index without an output file.
        index: u64,
    },
    /// An output frame exists but does not decode or has the wrong size.
    #[error("upscaler output for frame {index} is unusable: {reason}")]
    InvalidOutput {
        /// Staged index of the bad output.
        index: u64,
        /// What was wrong with it.
        reason: String,
    },
    /// Reading or writing staged frames failed.
    #[error("staging failure: {0}")]
    Staging(String),
}

/// Tagged result of one upscale attempt.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpscaleOutcome {
    /// Every staged index has an output frame.
    Completed,
    /// The attempt failed; outputs may be partial.
    Failed(UpscaleFailure),
}

/// Capability: turn every staged input frame into a scaled output frame with the same index.
pub trait Upscaler {
    /// Short name used in logs.
    fn name(&self) -> &'static str;
    /// Process the whole staged set.
    ///
    /// Implementations that work frame by frame call `progress` with the number of frames done
    /// so far; whole-directory tools may never call it.
    fn upscale_staged(
        &self,
        staging: &StagingArea,
        selection: ModelSelection,
        progress: &mut dyn FnMut(u64),
    ) -> UpscaleOutcome;
}

/// Hooks into [`UpscaleSelector::run`].
pub trait UpscaleObserver {
    /// The primary failed; the fallback starts next.
    fn on_fallback(&mut self, _failure: &UpscaleFailure) {}
    /// `frames_done` staged frames have been upscaled along `path`.
    fn on_frames(&mut self, _path: UpscalePath, _frames_done: u64) {}
}

impl UpscaleObserver for () {}

/// Which implementation produced the final outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpscalePath {
    /// The external tool succeeded.
    External,
    /// The CPU fallback ran.
    Fallback,
}

/// Result of [`UpscaleSelector::run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpscaleReport {
    /// Path that produced the outputs.
    pub path: UpscalePath,
    /// Failure of the primary upscaler, when the fallback was used.
    pub primary_failure: Option<UpscaleFailure>,
}

/// Try a primary upscaler, then a fallback on any failure.
pub struct UpscaleSelector {
    primary: Box<dyn Upscaler>,
    fallback: Box<dyn Upscaler>,
}

impl UpscaleSelector {
    /// Build a selector from two upscalers.
    pub fn new(primary: Box<dyn Upscaler>, fallback: Box<dyn Upscaler>) -> Self {
        Self { primary, fallback }
    }

    /// External tool first, CPU fallback second.
    pub fn external_then_fallback(external: ExternalUpscaler) -> Self {
        Self::new(Box::new(external), Box::new(FallbackUpscaler::default()))
    }

    /// Produce a valid output for every staged index.
    ///
    /// The primary's outputs are accepted only if every one decodes at the staged size times
    /// the scale. Otherwise the fallback reprocesses the whole staged set. Only a failing
    /// fallback, or a hole left after it, is reported as an error.
    pub fn run(
        &self,
        staging: &StagingArea,
        selection: ModelSelection,
        observer: &mut dyn UpscaleObserver,
    ) -> FrameshiftResult<UpscaleReport> {
        let outcome = self.primary.upscale_staged(staging, selection, &mut |n| {
            observer.on_frames(UpscalePath::External, n)
        });
        let primary_failure = match outcome {
            UpscaleOutcome::Completed => first_unusable_output(staging, selection),
            UpscaleOutcome::Failed(failure) => Some(failure),
        };
        let Some(primary_failure) = primary_failure else {
            tracing::info!(upscaler = self.primary.name(), "upscale completed");
            return Ok(UpscaleReport {
                path: UpscalePath::External,
                primary_failure: None,
            });
        };

        tracing::warn!(
            upscaler = self.primary.name(),
            fallback = self.fallback.name(),
            reason = %primary_failure,
            "upscaler failed; falling back"
        );
        observer.on_fallback(&primary_failure);

        let outcome = self.fallback.upscale_staged(staging, selection, &mut |n| {
            observer.on_frames(UpscalePath::Fallback, n)
        });
        match outcome {
            UpscaleOutcome::Completed => {}
            UpscaleOutcome::Failed(UpscaleFailure::NoOutputProduced { index }) => {
                return Err(FrameshiftError::MissingFrame { index });
            }
            UpscaleOutcome::Failed(other) => {
                return Err(FrameshiftError::staging_io(format!(
                    "fallback upscaler '{}' failed: {other}",
                    self.fallback.name()
                )));
            }
        }
        staging.verify_outputs()?;

        Ok(UpscaleReport {
            path: UpscalePath::Fallback,
            primary_failure: Some(primary_failure),
        })
    }
}

/// First staged index whose output is absent, undecodable or the wrong size.
fn first_unusable_output(
    staging: &StagingArea,
    selection: ModelSelection,
) -> Option<UpscaleFailure> {
    staging.indices().find_map(|idx| {
        match staging.check_output(idx, selection.scale) {
            Ok(()) => None,
            Err(FrameshiftError::MissingFrame { index }) => {
                Some(UpscaleFailure::NoOutputProduced { index })
            }
            Err(e) => Some(UpscaleFailure::InvalidOutput {
                index: idx.0,
                reason: e.to_string(),
            }),
        }
    })
}

#[cfg(test)]
#[path = "../../tests/unit/upscale/selector.rs"]
mod tests;
