//! Kernel strategies: a baseline and an optimized implementation per operation.
//!
//! Every kernel implements [`Kernel`] and mutates a [`Workspace`] in place.
//! [`KernelPair::for_operation`] selects the pair for an [`Operation`].
//!
//! All integer arithmetic wraps, so optimized variants that reorder
//! accumulation stay bit-identical to their baselines.

pub mod array_init;
pub mod factorial;
pub mod matrix_init;
pub mod matrix_multiply;

use crate::config::KernelSettings;
use crate::core::Operation;
use crate::workspace::Workspace;

/// Which side of a benchmark a kernel implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Baseline,
    Optimized,
}

/// A unit of work timed by the harness.
pub trait Kernel: Send + Sync {
    /// Short identifier used in logs (e.g., "array_init_opt").
    fn name(&self) -> &str;

    /// Run one iteration against `ws`.
    ///
    /// Kernels must tolerate being called repeatedly on the same workspace
    /// and must not leave any thread running once they return.
    fn run(&self, ws: &mut Workspace);
}

/// Baseline and optimized kernels for one operation.
pub struct KernelPair {
    pub baseline: Box<dyn Kernel>,
    pub optimized: Box<dyn Kernel>,
}

impl KernelPair {
    pub fn new(baseline: Box<dyn Kernel>, optimized: Box<dyn Kernel>) -> Self {
        KernelPair { baseline, optimized }
    }

    /// Built-in kernels for `operation`, tuned by `settings`.
    pub fn for_operation(operation: Operation, settings: &KernelSettings) -> Self {
        match operation {
            Operation::MatrixInit => KernelPair::new(
                Box::new(matrix_init::MatrixInitBaseline),
                Box::new(matrix_init::MatrixInitOptimized),
            ),
            Operation::ArrayInit => KernelPair::new(
                Box::new(array_init::ArrayInitBaseline),
                Box::new(array_init::ArrayInitOptimized::new(settings.array_workers)),
            ),
            Operation::Factorial => KernelPair::new(
                Box::new(factorial::FactorialBaseline),
                Box::new(factorial::FactorialOptimized),
            ),
            Operation::MatrixMultiply => KernelPair::new(
                Box::new(matrix_multiply::MatrixMultiplyBaseline),
                Box::new(matrix_multiply::MatrixMultiplyOptimized::new(settings.matmul_tile)),
            ),
        }
    }

    pub fn get(&self, variant: Variant) -> &dyn Kernel {
        match variant {
            Variant::Baseline => self.baseline.as_ref(),
            Variant::Optimized => self.optimized.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OPERATIONS;

    #[test]
    fn test_pairs_are_distinct_per_operation() {
        let settings = KernelSettings::default();
        for op in OPERATIONS {
            let pair = KernelPair::for_operation(op, &settings);
            assert_ne!(pair.get(Variant::Baseline).name(), pair.get(Variant::Optimized).name());
        }
    }
}
