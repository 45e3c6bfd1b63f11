//! Integration tests for the harness.
//!
//! These drive the public library API end to end with the built-in kernels,
//! deliberately broken kernels and a deterministic clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use copt_bench::config::KernelSettings;
use copt_bench::core::{OPERATIONS, Operation};
use copt_bench::engine::{CpuClock, Harness, ProcessCpuClock, Snapshot, time_op};
use copt_bench::kernel::array_init::ArrayInitBaseline;
use copt_bench::kernel::matrix_multiply::{MatrixMultiplyBaseline, MatrixMultiplyOptimized};
use copt_bench::kernel::{Kernel, KernelPair, Variant};
use copt_bench::{BenchError, Workspace};

/// Writes `i + 1` where the baseline writes `i * 64`.
struct BrokenArrayInit;

impl Kernel for BrokenArrayInit {
    fn name(&self) -> &str {
        "broken_array_init"
    }

    fn run(&self, ws: &mut Workspace) {
        for (i, slot) in ws.array_mut().iter_mut().enumerate() {
            *slot = i as i32 + 1;
        }
    }
}

/// Clock that advances a fixed step every time it is read.
struct TickClock {
    reads: AtomicU64,
    step: Duration,
}

impl TickClock {
    fn new(step: Duration) -> Self {
        TickClock { reads: AtomicU64::new(0), step }
    }
}

impl CpuClock for TickClock {
    fn cpu_time(&self) -> Duration {
        let reads = self.reads.fetch_add(1, Ordering::SeqCst) as u32;
        self.step * reads
    }
}

#[test]
fn test_every_operation_verifies_for_a_range_of_sizes() {
    let settings = KernelSettings::default();
    for op in OPERATIONS {
        let harness = Harness::new(op, &settings);
        for n in [0usize, 1, 2, 3, 7, 12, 33] {
            let report = harness
                .run(n, 2, &ProcessCpuClock)
                .unwrap_or_else(|e| panic!("{op} n = {n}: {e}"));
            assert_eq!(report.operation, op);
            assert_eq!(report.n, n);
            assert!(report.baseline.elapsed_ms >= 0.0);
            assert!(report.optimized.elapsed_ms >= 0.0);
        }
    }
}

#[test]
fn test_array_init_scenario() {
    let harness = Harness::new(Operation::ArrayInit, &KernelSettings::default());
    let report = harness.run(12, 1000, &ProcessCpuClock).unwrap();
    assert_eq!(report.verified_elements, 12);
    assert_eq!(report.baseline.iterations, 1000);
    assert_eq!(report.optimized.iterations, 1000);

    let mut ws = Workspace::allocate(Operation::ArrayInit, 12).unwrap();
    ArrayInitBaseline.run(&mut ws);
    let expected: Vec<i32> = (0..12).map(|i| i * ((500 % 12) * 8)).collect();
    assert_eq!(ws.array(), expected.as_slice());
}

#[test]
fn test_factorial_scenario() {
    let settings = KernelSettings::default();
    let pair = KernelPair::for_operation(Operation::Factorial, &settings);
    for variant in [Variant::Baseline, Variant::Optimized] {
        let mut ws = Workspace::allocate(Operation::Factorial, 5).unwrap();
        pair.get(variant).run(&mut ws);
        assert_eq!(ws.factorial(), 120, "{variant:?}");
    }

    let report = Harness::new(Operation::Factorial, &settings)
        .run(5, 1, &ProcessCpuClock)
        .unwrap();
    assert_eq!(report.verified_elements, 1);
}

#[test]
fn test_matrix_multiply_scenario() {
    let expected = [0, 0, 0, 6, 6, 6, 12, 12, 12];

    let mut baseline = Workspace::allocate(Operation::MatrixMultiply, 3).unwrap();
    let mut optimized = Workspace::allocate(Operation::MatrixMultiply, 3).unwrap();
    for _ in 0..2 {
        MatrixMultiplyBaseline.run(&mut baseline);
        MatrixMultiplyOptimized::default().run(&mut optimized);
    }
    assert_eq!(baseline.product().as_slice(), &expected);
    assert_eq!(optimized.product().as_slice(), &expected);

    let report = Harness::new(Operation::MatrixMultiply, &KernelSettings::default())
        .run(3, 2, &ProcessCpuClock)
        .unwrap();
    assert_eq!(report.verified_elements, 9);
}

#[test]
fn test_broken_optimized_kernel_is_a_result_mismatch() {
    let pair = KernelPair::new(Box::new(ArrayInitBaseline), Box::new(BrokenArrayInit));
    let harness = Harness::with_kernels(Operation::ArrayInit, pair);
    let err = harness.run(12, 3, &ProcessCpuClock).unwrap_err();

    assert!(matches!(
        err,
        BenchError::ResultMismatch { operation: Operation::ArrayInit, buffer: "array", index: 0 }
    ));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_zero_size_matrix_runs_verify_vacuously() {
    let settings = KernelSettings::default();
    for op in [Operation::MatrixInit, Operation::MatrixMultiply] {
        let report = Harness::new(op, &settings).run(0, 1, &ProcessCpuClock).unwrap();
        assert_eq!(report.verified_elements, 0);
    }
}

#[test]
fn test_speedup_uses_both_samples() {
    // Reads: baseline start/end = 0ms/4ms, optimized start/end = 8ms/12ms.
    let clock = TickClock::new(Duration::from_millis(4));
    let report = Harness::new(Operation::Factorial, &KernelSettings::default())
        .run(10, 3, &clock)
        .unwrap();
    assert!((report.baseline.elapsed_ms - 4.0).abs() < 1e-9);
    assert!((report.optimized.elapsed_ms - 4.0).abs() < 1e-9);
    assert!((report.speedup - 1.0).abs() < 1e-9);
}

#[test]
fn test_phases_use_independent_workspaces() {
    // A kernel that accumulates across calls would diverge if the optimized
    // phase reused the baseline's workspace.
    struct Accumulate;

    impl Kernel for Accumulate {
        fn name(&self) -> &str {
            "accumulate"
        }

        fn run(&self, ws: &mut Workspace) {
            for slot in ws.array_mut() {
                *slot += 1;
            }
        }
    }

    let pair = KernelPair::new(Box::new(Accumulate), Box::new(Accumulate));
    let harness = Harness::with_kernels(Operation::ArrayInit, pair);
    harness.run(16, 5, &ProcessCpuClock).unwrap();
}

#[test]
fn test_time_op_reuses_workspace_between_iterations() {
    let mut ws = Workspace::allocate(Operation::MatrixMultiply, 4).unwrap();
    let before = Snapshot::capture(&ws).unwrap();
    let sample = time_op(&MatrixMultiplyBaseline, &mut ws, 3, &ProcessCpuClock);
    assert_eq!(sample.iterations, 3);
    assert!(before.compare(&ws).is_err());
}
