//! Decode boundary: probing and streaming frames out of a container.

/// `ffprobe`-based metadata probing.
pub mod probe;
/// Sequential frame sources.
pub mod source;
