//! Report types produced by a benchmark run.

use serde::{Deserialize, Serialize};

use super::env::EnvironmentInfo;
use super::operation::Operation;

/// One elapsed-time measurement covering every iteration of a phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingSample {
    /// Number of back-to-back kernel calls covered by the sample
    pub iterations: u32,
    /// Process CPU time for the whole loop in milliseconds
    pub elapsed_ms: f64,
}

/// Outcome of a verified baseline/optimized run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub operation: Operation,
    pub n: usize,
    #[serde(rename = "loop")]
    pub loops: u32,
    pub baseline: TimingSample,
    pub optimized: TimingSample,
    /// `baseline / optimized`; not finite when the optimized sample is zero
    pub speedup: f64,
    /// Elements (or scalars) compared during verification
    pub verified_elements: usize,
}

impl RunReport {
    pub fn new(
        operation: Operation,
        n: usize,
        loops: u32,
        baseline: TimingSample,
        optimized: TimingSample,
        verified_elements: usize,
    ) -> Self {
        RunReport {
            operation,
            n,
            loops,
            baseline,
            optimized,
            speedup: baseline.elapsed_ms / optimized.elapsed_ms,
            verified_elements,
        }
    }
}

/// Machine-readable document printed by `--format json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub env: EnvironmentInfo,
    #[serde(flatten)]
    pub run: RunReport,
}

impl JsonReport {
    pub fn new(run: RunReport, env: EnvironmentInfo) -> Self {
        let timestamp = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default();
        JsonReport { timestamp, env, run }
    }
}
