use crate::effects::resample::{ResampleKernel, scale_rgb8};
use crate::effects::sharpen::upscale_sharpen;
use crate::foundation::core::FrameRgb8;
use crate::foundation::error::{FrameshiftError, FrameshiftResult};
use crate::staging::area::StagingArea;
use crate::upscale::{ModelSelection, UpscaleFailure, UpscaleOutcome, Upscaler};

/// Deterministic CPU upscaler: bicubic resize by the scale factor, then the shared unsharp mask.
///
/// The model name in a [`ModelSelection`] is ignored; only the scale is used.
#[derive(Clone, Copy, Debug, Default)]
pub struct FallbackUpscaler;

impl FallbackUpscaler {
    /// Upscale one frame to `(width * scale, height * scale)`.
    pub fn upscale(&self, frame: FrameRgb8, scale: u32) -> FrameshiftResult<FrameRgb8> {
        if scale == 0 {
            return Err(FrameshiftError::validation("upscale factor must be >= 1"));
        }
        let resized = scale_rgb8(frame, scale, ResampleKernel::Bicubic)?;
        upscale_sharpen(&resized)
    }
}

impl Upscaler for FallbackUpscaler {
    fn name(&self) -> &'static str {
        "cpu-fallback"
    }

    /// Reprocess every staged index, overwriting anything a previous attempt left behind.
    fn upscale_staged(
        &self,
        staging: &StagingArea,
        selection: ModelSelection,
        progress: &mut dyn FnMut(u64),
    ) -> UpscaleOutcome {
        let total = staging.staged_count();
        for idx in staging.indices() {
            let result = staging
                .read_staged_input(idx)
                .and_then(|frame| self.upscale(frame, selection.scale))
                .and_then(|frame| staging.write_output(idx, &frame));
            match result {
                Ok(()) => {}
                Err(FrameshiftError::MissingFrame { index }) => {
                    return UpscaleOutcome::Failed(UpscaleFailure::Staging(format!(
                        "staged input {index} is missing"
                    )));
                }
                Err(e) => return UpscaleOutcome::Failed(UpscaleFailure::Staging(e.to_string())),
            }
            tracing::trace!(index = idx.0, total, "fallback upscaled frame");
            progress(idx.0 + 1);
        }
        UpscaleOutcome::Completed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/upscale/fallback.rs"]
mod tests;
