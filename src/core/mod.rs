//! Core types shared by the harness: the operation table, report schema and
//! host detection.

pub mod env;
pub mod operation;
pub mod schema;

// Re-export key types for convenience
pub use env::EnvironmentInfo;
pub use operation::{OPERATIONS, Operation, USAGE};
pub use schema::{JsonReport, RunReport, TimingSample};
