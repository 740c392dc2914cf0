//! Frameshift transforms a video frame by frame and re-encodes the result.
//!
//! A run decodes the input with the system `ffmpeg`, applies exactly one mode, and streams the
//! transformed frames into a new MP4:
//!
//! - **In-process** modes ([`FrameTransform`]): cosmetic smoothing, color grading, or a direct
//!   Lanczos upscale to 3840x2160. Frames are streamed one at a time.
//! - **Staged** modes: every frame is written to a [`StagingArea`], an external learned-model
//!   tool upscales the whole directory, and a deterministic CPU fallback takes over on any tool
//!   failure. Outputs are re-read in index order and encoded.
//!
//! Frame count, order and the source frame rate are preserved. Audio is dropped.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Per-frame image processing.
pub mod effects;
/// Encoding sinks.
pub mod encode;
mod foundation;
/// Decoding sources.
pub mod media;
/// Run orchestration.
pub mod session;
/// Staging directories.
pub mod staging;
/// Whole-directory upscalers.
pub mod upscale;

pub use crate::foundation::core::{Fps, FrameIndex, FrameRgb8, VideoMetadata};
pub use crate::foundation::error::{FrameshiftError, FrameshiftResult};

pub use crate::effects::transform::FrameTransform;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::media::probe::{ffmpeg_tools_available, probe_video};
pub use crate::media::source::{FfmpegFrameSource, FrameSource, InMemorySource};
pub use crate::session::config::{PipelineConfig, RouteStrategy, TargetSize};
pub use crate::session::mode::{ModeRequest, Route, TransformMode, route};
pub use crate::session::pipeline::{
    Pipeline, PipelineResult, PipelineState, PipelineStatus, Progress, ProgressObserver,
};
pub use crate::staging::area::{StagedFormat, StagingArea};
pub use crate::upscale::{
    ExternalUpscaler, FallbackUpscaler, ModelSelection, UpscaleFailure, UpscaleObserver,
    UpscaleOutcome, UpscalePath, UpscaleReport, UpscaleSelector, Upscaler,
};
