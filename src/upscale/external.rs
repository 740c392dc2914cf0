use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::core::FrameIndex;
use crate::staging::area::{StagedFormat, StagingArea};
use crate::upscale::{ModelSelection, UpscaleFailure, UpscaleOutcome, Upscaler};

/// Default tool name, resolved through `PATH`.
pub const DEFAULT_UPSCALER_BIN: &str = "realesrgan-ncnn-vulkan";

const MAX_CAPTURED_OUTPUT: usize = 4096;

/// Wrapper around a command-line upscaler taking
/// `-i <inputDir> -o <outputDir> -n <model> -s <scale> -f <format>`.
///
/// The tool is invoked once over the whole staged directory and runs to completion.
#[derive(Clone, Debug)]
pub struct ExternalUpscaler {
    bin: PathBuf,
}

impl ExternalUpscaler {
    /// Use the executable at `bin` (a bare name is looked up on `PATH`).
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    /// Configured executable.
    pub fn bin(&self) -> &Path {
        &self.bin
    }

    /// Run the tool over `input_dir`, writing into `output_dir`, and check that the first
    /// output frame exists.
    pub fn run(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        selection: ModelSelection,
        format: StagedFormat,
        first_output: &Path,
    ) -> UpscaleOutcome {
        tracing::info!(
            bin = %self.bin.display(),
            model = selection.model,
            scale = selection.scale,
            "running external upscaler"
        );

        let output = Command::new(&self.bin)
            .arg("-i")
            .arg(input_dir)
            .arg("-o")
            .arg(output_dir)
            .args([
                "-n",
                selection.model,
                "-s",
                &selection.scale.to_string(),
                "-f",
                format.extension(),
            ])
            .stdin(Stdio::null())
            .output();

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!(error = %e, "failed to start external upscaler");
                return UpscaleOutcome::Failed(UpscaleFailure::ToolMissing {
                    path: self.bin.display().to_string(),
                });
            }
        };

        if !output.status.success() {
            let mut combined = output.stderr;
            combined.extend_from_slice(&output.stdout);
            return UpscaleOutcome::Failed(UpscaleFailure::ExitFailure {
                code: output.status.code(),
                stderr: tail_lossy(&combined, MAX_CAPTURED_OUTPUT),
            });
        }

        if !first_output.is_file() {
            return UpscaleOutcome::Failed(UpscaleFailure::NoOutputProduced { index: 0 });
        }
        UpscaleOutcome::Completed
    }
}

impl Default for ExternalUpscaler {
    fn default() -> Self {
        Self::new(DEFAULT_UPSCALER_BIN)
    }
}

impl Upscaler for ExternalUpscaler {
    fn name(&self) -> &'static str {
        "external"
    }

    fn upscale_staged(
        &self,
        staging: &StagingArea,
        selection: ModelSelection,
        _progress: &mut dyn FnMut(u64),
    ) -> UpscaleOutcome {
        self.run(
            staging.input_dir(),
            staging.output_dir(),
            selection,
            staging.format(),
            &staging.output_path(FrameIndex(0)),
        )
    }
}

/// Last `max` bytes of tool output as trimmed text.
fn tail_lossy(bytes: &[u8], max: usize) -> String {
    let start = bytes.len().saturating_sub(max);
    String::from_utf8_lossy(&bytes[start..]).trim().to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/upscale/external.rs"]
mod tests;
