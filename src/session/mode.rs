use crate::effects::bilateral::BilateralParams;
use crate::effects::transform::FrameTransform;
use crate::session::config::{PipelineConfig, RouteStrategy};
use crate::upscale::ModelSelection;

/// Mode string as supplied by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModeRequest {
    /// `"4k-upscale"`.
    FourKUpscale,
    /// `"beauty-filter"`.
    BeautyFilter,
    /// `"video-filter"`.
    VideoFilter,
    /// `"ai-upscale"`.
    AiUpscale,
    /// Anything else; treated as pass-through.
    Unrecognized(String),
}

impl ModeRequest {
    /// Parse a mode string. Unknown strings are kept, not rejected.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "4k-upscale" => Self::FourKUpscale,
            "beauty-filter" => Self::BeautyFilter,
            "video-filter" => Self::VideoFilter,
            "ai-upscale" => Self::AiUpscale,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

/// The single transform mode active for a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformMode {
    /// Bilateral smoothing + saturation.
    CosmeticSmoothing,
    /// Saturation + warm tint.
    ColorGrade,
    /// Fixed-target Lanczos upscale + sharpening.
    DirectUpscale,
    /// External learned-model upscale with CPU fallback.
    AiUpscale,
    /// Same-resolution copy.
    PassThrough,
}

/// Execution path chosen for a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Route {
    /// Stream frame-by-frame through an in-process transform.
    InProcess {
        /// Active mode.
        mode: TransformMode,
        /// Per-frame pipeline.
        transform: FrameTransform,
    },
    /// Stage every frame to disk and upscale the whole directory.
    Staged {
        /// Active mode.
        mode: TransformMode,
        /// Model and scale for the upscaler.
        selection: ModelSelection,
    },
}

impl Route {
    /// Active mode.
    pub fn mode(&self) -> TransformMode {
        match *self {
            Self::InProcess { mode, .. } | Self::Staged { mode, .. } => mode,
        }
    }
}

/// Resolve a mode request under the configured strategy.
pub fn route(request: &ModeRequest, cfg: &PipelineConfig) -> Route {
    let ai = cfg.strategy == RouteStrategy::AiWithFallback;
    let staged = |mode: TransformMode, selection: ModelSelection| Route::Staged { mode, selection };

    match request {
        ModeRequest::AiUpscale => staged(TransformMode::AiUpscale, ModelSelection::X4PLUS),
        ModeRequest::FourKUpscale if ai => staged(TransformMode::AiUpscale, ModelSelection::X4PLUS),
        ModeRequest::BeautyFilter if ai => {
            staged(TransformMode::CosmeticSmoothing, ModelSelection::ANIMEVIDEO)
        }
        ModeRequest::VideoFilter if ai => {
            staged(TransformMode::ColorGrade, ModelSelection::ANIMEVIDEO)
        }
        ModeRequest::FourKUpscale => Route::InProcess {
            mode: TransformMode::DirectUpscale,
            transform: FrameTransform::DirectUpscale {
                width: cfg.direct_target.width,
                height: cfg.direct_target.height,
            },
        },
        ModeRequest::BeautyFilter => Route::InProcess {
            mode: TransformMode::CosmeticSmoothing,
            transform: FrameTransform::CosmeticSmoothing(BilateralParams::SKIN),
        },
        ModeRequest::VideoFilter => Route::InProcess {
            mode: TransformMode::ColorGrade,
            transform: FrameTransform::ColorGrade,
        },
        ModeRequest::Unrecognized(_) => Route::InProcess {
            mode: TransformMode::PassThrough,
            transform: FrameTransform::PassThrough,
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/mode.rs"]
mod tests;
