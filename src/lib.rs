pub mod config;
pub mod core;
pub mod engine;
pub mod kernel;
pub mod run_cmd;
pub mod workspace;

use thiserror::Error;

pub use crate::core::{Operation, RunReport, TimingSample};
pub use crate::engine::{Harness, RunState};
pub use crate::workspace::Workspace;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid arguments: {0}")]
    Argument(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to allocate {buffer} ({requested}): {reason}")]
    Allocation {
        buffer: &'static str,
        requested: String,
        reason: String,
    },
    #[error(
        "result of optimized operation did not match result of unoptimized operation \
         ({operation}: {buffer} differs at element {index})"
    )]
    ResultMismatch {
        operation: Operation,
        buffer: &'static str,
        index: usize,
    },
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl BenchError {
    /// Process status for this failure.
    ///
    /// Argument and allocation failures exit with a negated errno; a result
    /// mismatch always exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            BenchError::Argument(_) | BenchError::Config(_) => -libc::EINVAL,
            BenchError::Allocation { .. } => -libc::ENOMEM,
            BenchError::ResultMismatch { .. } => 1,
            BenchError::Message(_) | BenchError::Anyhow(_) => 1,
        }
    }
}

pub type BenchResult<T> = Result<T, BenchError>;
