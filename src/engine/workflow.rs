//! Run orchestration: baseline → snapshot → optimized → verify → report.
//!
//! # Design
//!
//! Each phase allocates its own workspace, so nothing written by the
//! baseline can leak into the optimized measurement. The baseline workspace
//! is dropped as soon as its snapshot has been taken. Every failure is
//! terminal; there are no retries.

use tracing::{debug, info, info_span};

use crate::config::KernelSettings;
use crate::core::{Operation, RunReport, TimingSample};
use crate::kernel::{KernelPair, Variant};
use crate::workspace::Workspace;
use crate::{BenchError, BenchResult};

use super::timing::{CpuClock, time_op};
use super::verify::Snapshot;

/// States of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    BaselineRunning,
    SnapshotCaptured,
    OptimizedRunning,
    Verified,
    Reported,
    Failed,
}

/// Progress notifications delivered while a run executes.
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseEvent {
    /// The run entered a new state.
    State(RunState),
    /// A phase finished timing.
    Timed { variant: Variant, sample: TimingSample },
}

struct Tracker<'a> {
    state: RunState,
    observer: &'a mut dyn FnMut(&PhaseEvent),
}

impl Tracker<'_> {
    fn enter(&mut self, next: RunState) {
        debug!(from = ?self.state, to = ?next, "state transition");
        self.state = next;
        (self.observer)(&PhaseEvent::State(next));
    }

    fn timed(&mut self, variant: Variant, sample: TimingSample) {
        (self.observer)(&PhaseEvent::Timed { variant, sample });
    }
}

/// Benchmarks one operation's baseline kernel against its optimized kernel.
pub struct Harness {
    operation: Operation,
    kernels: KernelPair,
}

impl Harness {
    /// Harness over the built-in kernels for `operation`.
    pub fn new(operation: Operation, settings: &KernelSettings) -> Self {
        Harness {
            operation,
            kernels: KernelPair::for_operation(operation, settings),
        }
    }

    /// Harness over a caller-supplied kernel pair. Both kernels must expect
    /// the workspace shape of `operation`.
    pub fn with_kernels(operation: Operation, kernels: KernelPair) -> Self {
        Harness { operation, kernels }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Run both phases and verify them; see [`Harness::run_observed`].
    pub fn run(&self, n: usize, loops: u32, clock: &dyn CpuClock) -> BenchResult<RunReport> {
        self.run_observed(n, loops, clock, &mut |_: &PhaseEvent| {})
    }

    /// Run both phases, reporting progress to `observer`.
    ///
    /// The optimized sample is only returned after its output matched the
    /// baseline's exactly; otherwise the run ends in `RunState::Failed` with
    /// `BenchError::ResultMismatch`.
    pub fn run_observed(
        &self,
        n: usize,
        loops: u32,
        clock: &dyn CpuClock,
        observer: &mut dyn FnMut(&PhaseEvent),
    ) -> BenchResult<RunReport> {
        if loops == 0 {
            return Err(BenchError::Argument("loop must be at least 1".into()));
        }

        info!(operation = %self.operation, n, loops, "starting run");
        let mut tracker = Tracker {
            state: RunState::Idle,
            observer,
        };
        let result = self.drive(n, loops, clock, &mut tracker);
        match &result {
            Ok(report) => {
                tracker.enter(RunState::Reported);
                info!(speedup = report.speedup, "run verified");
            }
            Err(e) => {
                debug!(state = ?tracker.state, error = %e, "run failed");
                tracker.enter(RunState::Failed);
            }
        }
        result
    }

    fn drive(&self, n: usize, loops: u32, clock: &dyn CpuClock, tracker: &mut Tracker<'_>) -> BenchResult<RunReport> {
        tracker.enter(RunState::BaselineRunning);
        let (baseline, snapshot) = {
            let _span = info_span!("phase", variant = "baseline", kernel = self.kernels.baseline.name()).entered();
            let mut ws = Workspace::allocate(self.operation, n)?;
            let sample = time_op(self.kernels.get(Variant::Baseline), &mut ws, loops, clock);
            tracker.timed(Variant::Baseline, sample);
            (sample, Snapshot::capture(&ws)?)
        };
        tracker.enter(RunState::SnapshotCaptured);

        tracker.enter(RunState::OptimizedRunning);
        let optimized = {
            let _span = info_span!("phase", variant = "optimized", kernel = self.kernels.optimized.name()).entered();
            let mut ws = Workspace::allocate(self.operation, n)?;
            let sample = time_op(self.kernels.get(Variant::Optimized), &mut ws, loops, clock);
            tracker.timed(Variant::Optimized, sample);
            snapshot.compare(&ws)?;
            sample
        };
        tracker.enter(RunState::Verified);

        Ok(RunReport::new(
            self.operation,
            n,
            loops,
            baseline,
            optimized,
            snapshot.element_count(),
        ))
    }
}
