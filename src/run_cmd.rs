use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use crate::config;
use crate::core::{EnvironmentInfo, JsonReport, Operation, RunReport, TimingSample};
use crate::engine::{CpuClock, Harness, PhaseEvent, ProcessCpuClock};
use crate::kernel::Variant;
use crate::{BenchError, BenchResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON document
    Json,
}

#[derive(Debug, Clone)]
pub struct RunArgs {
    pub op: u8,
    pub n: u32,
    pub loops: u32,
    pub format: OutputFormat,
    pub config: Option<PathBuf>,
}

pub fn header_line(operation: Operation, n: usize, loops: u32) -> String {
    format!("Running {operation} with n = {n} loop = {loops}")
}

pub fn baseline_line(sample: &TimingSample) -> String {
    format!("UNOPTIMIZED(ms):  {:12.3}", sample.elapsed_ms)
}

/// The lines printed once the optimized output has been verified.
pub fn summary_lines(report: &RunReport) -> [String; 2] {
    [
        format!("OPTIMIZED(ms):    {:12.3}", report.optimized.elapsed_ms),
        format!("SPEEDUP:          {:12.3}", report.speedup),
    ]
}

fn write_error(e: std::io::Error) -> BenchError {
    BenchError::Message(format!("failed to write output: {e}"))
}

pub fn run(args: RunArgs) -> BenchResult<RunReport> {
    let operation = Operation::try_from(args.op)?;
    let cfg = config::load_or_default(args.config.as_deref())?;
    info!(?cfg, "loaded configuration");

    let harness = Harness::new(operation, &cfg.kernels);
    let stdout = std::io::stdout();
    run_with(&harness, args.n as usize, args.loops, args.format, &ProcessCpuClock, &mut stdout.lock())
}

/// Runs `harness` and writes its output to `out`.
///
/// In text mode the header and the UNOPTIMIZED line are flushed as soon as
/// they are known; OPTIMIZED and SPEEDUP follow only a verified run.
pub fn run_with<W: Write>(
    harness: &Harness,
    n: usize,
    loops: u32,
    format: OutputFormat,
    clock: &dyn CpuClock,
    out: &mut W,
) -> BenchResult<RunReport> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "{}\n", header_line(harness.operation(), n, loops))
                .and_then(|_| out.flush())
                .map_err(write_error)?;

            let mut write_failure = None;
            let report = harness.run_observed(n, loops, clock, &mut |event: &PhaseEvent| {
                if let PhaseEvent::Timed { variant: Variant::Baseline, sample } = event {
                    if let Err(e) = writeln!(out, "{}", baseline_line(sample)).and_then(|_| out.flush()) {
                        write_failure.get_or_insert(e);
                    }
                }
            })?;
            if let Some(e) = write_failure {
                return Err(write_error(e));
            }

            for line in summary_lines(&report) {
                writeln!(out, "{line}").map_err(write_error)?;
            }
            out.flush().map_err(write_error)?;
            Ok(report)
        }
        OutputFormat::Json => {
            let report = harness.run(n, loops, clock)?;
            let doc = JsonReport::new(report.clone(), EnvironmentInfo::detect());
            let json = serde_json::to_string_pretty(&doc).map_err(|e| BenchError::Message(e.to_string()))?;
            writeln!(out, "{json}").and_then(|_| out.flush()).map_err(write_error)?;
            Ok(report)
        }
    }
}
