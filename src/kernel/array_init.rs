//! Fill an array with `arr[i] = i * (X % Y) * Z`.

use std::hint::black_box;

use crate::workspace::Workspace;

use super::Kernel;

pub const X: i32 = 500;
pub const Y: i32 = 12;
pub const Z: i32 = 8;

pub struct ArrayInitBaseline;

impl Kernel for ArrayInitBaseline {
    fn name(&self) -> &str {
        "array_init_unopt"
    }

    fn run(&self, ws: &mut Workspace) {
        let arr = ws.array_mut();
        for i in 0..arr.len() {
            // recomputed every iteration on purpose
            let modulus = black_box(X) % black_box(Y);
            arr[i] = (i as i32).wrapping_mul(modulus).wrapping_mul(Z);
        }
    }
}

/// Smallest slice a worker thread is given; shorter arrays are filled inline.
pub const MIN_CHUNK: usize = 4096;

/// Hoisted constant, multiply reduced to an add, and the index range split
/// across scoped worker threads that each own a disjoint chunk.
pub struct ArrayInitOptimized {
    workers: usize,
}

impl ArrayInitOptimized {
    pub fn new(workers: usize) -> Self {
        ArrayInitOptimized { workers: workers.max(1) }
    }

    /// Number of threads used for an array of `len` elements.
    fn split_workers(&self, len: usize) -> usize {
        if len < self.workers.saturating_mul(MIN_CHUNK) { 1 } else { self.workers }
    }
}

fn fill_range(out: &mut [i32], start: usize, step: i32) {
    let mut value = (start as i32).wrapping_mul(step);
    for slot in out {
        *slot = value;
        value = value.wrapping_add(step);
    }
}

impl Kernel for ArrayInitOptimized {
    fn name(&self) -> &str {
        "array_init_opt"
    }

    fn run(&self, ws: &mut Workspace) {
        let step = (X % Y) * Z;
        let arr = ws.array_mut();
        let len = arr.len();
        let workers = self.split_workers(len);
        if workers <= 1 {
            fill_range(arr, 0, step);
            return;
        }

        let chunk = len.div_ceil(workers);
        std::thread::scope(|s| {
            for (idx, part) in arr.chunks_mut(chunk).enumerate() {
                s.spawn(move || fill_range(part, idx * chunk, step));
            }
        });
    }
}
