use crate::foundation::core::{Fps, FrameIndex, FrameRgb8};
use crate::foundation::error::{FrameshiftError, FrameshiftResult};

/// Geometry and timing declared to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming frames in source order.
///
/// Ordering contract: `push_frame` is called with strictly increasing `FrameIndex`, and the
/// output order equals the call order. `end` is called exactly once and is where the container
/// becomes valid.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> FrameshiftResult<()>;
    /// Append one frame; its size must match the declared geometry.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgb8) -> FrameshiftResult<()>;
    /// Finalize the output.
    fn end(&mut self) -> FrameshiftResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRgb8)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRgb8)] {
        &self.frames
    }

    /// `true` once `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> FrameshiftResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgb8) -> FrameshiftResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| FrameshiftError::encode("in-memory sink not started"))?;
        check_frame_geometry(&cfg, frame)?;
        if let Some((last, _)) = self.frames.last()
            && idx.0 <= last.0
        {
            return Err(FrameshiftError::encode(
                "sink received out-of-order frame index",
            ));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> FrameshiftResult<()> {
        if self.finished {
            return Err(FrameshiftError::encode("sink already finalized"));
        }
        self.finished = true;
        Ok(())
    }
}

/// Reject frames whose size differs from the declared output.
pub(crate) fn check_frame_geometry(cfg: &SinkConfig, frame: &FrameRgb8) -> FrameshiftResult<()> {
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(FrameshiftError::validation(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
