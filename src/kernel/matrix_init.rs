//! Fill two square matrices: `lhs[i][j] = i`, `rhs[i][j] = i + 1`.

use crate::workspace::{Matrix, Workspace};

use super::Kernel;

const UNROLL: usize = 5;

#[inline(never)]
fn check(x: usize, y: usize) -> bool {
    x < y
}

#[inline(never)]
fn set(mat: &mut Matrix, idx: usize, value: i32) {
    mat.as_mut_slice()[idx] = value;
}

/// Baseline initializer. Also primes the matrix multiply operands.
pub fn initialize_baseline(lhs: &mut Matrix, rhs: &mut Matrix) {
    let n = lhs.n();
    let rows = lhs.rows().min(rhs.rows());
    let mut i = 0;
    while check(i, rows) {
        let mut j = 0;
        while check(j, n) {
            set(lhs, i * n + j, i as i32);
            set(rhs, i * n + j, (i as i32).wrapping_add(1));
            j += 1;
        }
        i += 1;
    }
}

/// Row offsets hoisted out of the column loop, `i + 1` computed once per row,
/// and the column loop unrolled by five with a remainder loop.
pub fn initialize_optimized(lhs: &mut Matrix, rhs: &mut Matrix) {
    let n = lhs.n();
    let rows = lhs.rows().min(rhs.rows());
    let body = n - n % UNROLL;
    let mat1 = lhs.as_mut_slice();
    let mat2 = rhs.as_mut_slice();

    let mut row_offset = 0;
    for i in 0..rows {
        let value = i as i32;
        let next = value.wrapping_add(1);
        let mut j = 0;
        while j < body {
            let k = row_offset + j;
            mat1[k] = value;
            mat1[k + 1] = value;
            mat1[k + 2] = value;
            mat1[k + 3] = value;
            mat1[k + 4] = value;
            mat2[k] = next;
            mat2[k + 1] = next;
            mat2[k + 2] = next;
            mat2[k + 3] = next;
            mat2[k + 4] = next;
            j += UNROLL;
        }
        while j < n {
            mat1[row_offset + j] = value;
            mat2[row_offset + j] = next;
            j += 1;
        }
        row_offset += n;
    }
}

pub struct MatrixInitBaseline;

impl Kernel for MatrixInitBaseline {
    fn name(&self) -> &str {
        "matrix_init_unopt"
    }

    fn run(&self, ws: &mut Workspace) {
        let (lhs, rhs) = ws.matrices_mut();
        initialize_baseline(lhs, rhs);
    }
}

pub struct MatrixInitOptimized;

impl Kernel for MatrixInitOptimized {
    fn name(&self) -> &str {
        "matrix_init_opt"
    }

    fn run(&self, ws: &mut Workspace) {
        let (lhs, rhs) = ws.matrices_mut();
        initialize_optimized(lhs, rhs);
    }
}
