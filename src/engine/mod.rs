//! Engine module: times kernels, verifies their output and sequences a run.
//!
//! # Architecture
//!
//! - **timing**: runs one kernel `loop` times against a workspace and
//!   measures process CPU time through the `CpuClock` seam.
//! - **verify**: snapshots the baseline's observable output and compares the
//!   optimized phase against it exactly.
//! - **workflow**: the `Harness` state machine tying allocation, timing and
//!   verification together.
//!
//! # Boundaries
//!
//! - Kernels know nothing about timing or verification.
//! - The timing engine trusts its caller for `loop >= 1`; the harness checks it.

pub mod timing;
pub mod verify;
pub mod workflow;

// Re-export key types for convenience
pub use timing::{CpuClock, ProcessCpuClock, time_op};
pub use verify::Snapshot;
pub use workflow::{Harness, PhaseEvent, RunState};
