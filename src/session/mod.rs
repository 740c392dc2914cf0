//! Run orchestration: mode routing, configuration and the pipeline state machine.

/// Pipeline configuration.
pub mod config;
/// Mode strings and routing.
pub mod mode;
/// Orchestrator.
pub mod pipeline;
