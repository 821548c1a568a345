//! Application-level errors

use thiserror::Error;

/// Errors raised around the engine: loading settings and driving workloads.
/// The engine itself reports absence, never errors.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("config error: {message}")]
    Config { message: String },

    #[error("invalid parameters: {reason}")]
    InvalidParameters { reason: String },

    #[error("tree invariants violated after {phase} in cycle {cycle}")]
    Inconsistent { phase: &'static str, cycle: usize },

    #[error("count mismatch after {phase} in cycle {cycle}: expected {expected}, found {found}")]
    CountMismatch {
        phase: &'static str,
        cycle: usize,
        expected: usize,
        found: usize,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
