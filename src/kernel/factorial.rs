//! `n!` modulo 2^64.

use crate::workspace::Workspace;

use super::Kernel;

/// Smallest `n` for which `2^64` divides `n!`, so the wrapped product is 0.
const FIRST_ZERO: u64 = 66;

/// One stack frame per factor. Release builds turn the recursion into a loop;
/// unoptimized builds keep every frame, so an `n` in the millions overflows
/// the main thread's stack there.
fn factorial_recursive(n: u64) -> u64 {
    if n == 0 {
        return 1;
    }
    n.wrapping_mul(factorial_recursive(n - 1))
}

fn factorial_iterative(n: u64) -> u64 {
    if n >= FIRST_ZERO {
        return 0;
    }
    (2..=n).fold(1u64, |acc, k| acc.wrapping_mul(k))
}

pub struct FactorialBaseline;

impl Kernel for FactorialBaseline {
    fn name(&self) -> &str {
        "factorial_unopt"
    }

    fn run(&self, ws: &mut Workspace) {
        let value = factorial_recursive(ws.n() as u64);
        ws.set_factorial(value);
    }
}

pub struct FactorialOptimized;

impl Kernel for FactorialOptimized {
    fn name(&self) -> &str {
        "factorial_opt"
    }

    fn run(&self, ws: &mut Workspace) {
        let value = factorial_iterative(ws.n() as u64);
        ws.set_factorial(value);
    }
}
