//! Encode boundary.
//!
//! Sinks consume transformed frames in source order and finalize an output container.

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and in-memory sink.
pub mod sink;
