/// Convenience result type used across Frameshift.
pub type FrameshiftResult<T> = Result<T, FrameshiftError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// External upscaler failures are deliberately absent: they are reported as
/// [`UpscaleFailure`](crate::UpscaleFailure) values and recovered by the fallback path.
#[derive(thiserror::Error, Debug)]
pub enum FrameshiftError {
    /// Input video is unreadable or has no decodable frames.
    #[error("open error: {0}")]
    Open(String),

    /// Output container could not be created.
    #[error("create error: {0}")]
    Create(String),

    /// Encoder rejected a frame or failed to finalize.
    #[error("encode error: {0}")]
    Encode(String),

    /// A staged output frame is absent after every upscale attempt.
    #[error("missing staged frame {index}")]
    MissingFrame {
        /// Zero-based staged frame index.
        index: u64,
    },

    /// Disk IO failure while staging frames.
    #[error("staging io error: {0}")]
    StagingIo(String),

    /// Invalid caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FrameshiftError {
    /// Build a [`FrameshiftError::Open`] value.
    pub fn open(msg: impl Into<String>) -> Self {
        Self::Open(msg.into())
    }

    /// Build a [`FrameshiftError::Create`] value.
    pub fn create(msg: impl Into<String>) -> Self {
        Self::Create(msg.into())
    }

    /// Build a [`FrameshiftError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`FrameshiftError::StagingIo`] value.
    pub fn staging_io(msg: impl Into<String>) -> Self {
        Self::StagingIo(msg.into())
    }

    /// Build a [`FrameshiftError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Open(_) => "OpenError",
            Self::Create(_) => "CreateError",
            Self::Encode(_) => "EncodeError",
            Self::MissingFrame { .. } => "MissingFrame",
            Self::StagingIo(_) => "StagingIOError",
            Self::Validation(_) => "ValidationError",
            Self::Other(_) => "Error",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
