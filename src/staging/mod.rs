//! On-disk frame staging for the external upscaler.

/// Index-keyed staging directories.
pub mod area;
