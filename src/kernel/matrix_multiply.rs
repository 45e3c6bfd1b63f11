//! Square integer matrix product `product = lhs * rhs`.

use crate::workspace::{Matrix, Workspace};

use super::Kernel;

pub const DEFAULT_TILE: usize = 32;

/// Textbook i-j-k triple loop.
pub fn multiply_baseline(lhs: &Matrix, rhs: &Matrix, product: &mut Matrix) {
    let n = product.rows();
    for i in 0..n {
        for j in 0..n {
            product.set(i, j, 0);
            for k in 0..n {
                let acc = product.get(i, j);
                product.set(i, j, acc.wrapping_add(lhs.get(i, k).wrapping_mul(rhs.get(k, j))));
            }
        }
    }
}

/// Tiled i-k-j loop; `lhs[i][k]` is held in a local across the inner row
/// update so the innermost loop streams contiguous rows of `rhs` and `product`.
pub fn multiply_tiled(lhs: &Matrix, rhs: &Matrix, product: &mut Matrix, tile: usize) {
    let n = product.rows();
    let tile = tile.max(1);
    let a = lhs.as_slice();
    let b = rhs.as_slice();
    let out = product.as_mut_slice();
    out.fill(0);

    for ii in (0..n).step_by(tile) {
        let i_end = (ii + tile).min(n);
        for kk in (0..n).step_by(tile) {
            let k_end = (kk + tile).min(n);
            for jj in (0..n).step_by(tile) {
                let j_end = (jj + tile).min(n);
                for i in ii..i_end {
                    let row = i * n;
                    for k in kk..k_end {
                        let a_ik = a[row + k];
                        let b_seg = &b[k * n + jj..k * n + j_end];
                        let out_seg = &mut out[row + jj..row + j_end];
                        for (o, &b_kj) in out_seg.iter_mut().zip(b_seg) {
                            *o = o.wrapping_add(a_ik.wrapping_mul(b_kj));
                        }
                    }
                }
            }
        }
    }
}

pub struct MatrixMultiplyBaseline;

impl Kernel for MatrixMultiplyBaseline {
    fn name(&self) -> &str {
        "matrix_multiply_unopt"
    }

    fn run(&self, ws: &mut Workspace) {
        let (lhs, rhs, product) = ws.multiply_parts_mut();
        multiply_baseline(lhs, rhs, product);
    }
}

pub struct MatrixMultiplyOptimized {
    tile: usize,
}

impl MatrixMultiplyOptimized {
    pub fn new(tile: usize) -> Self {
        MatrixMultiplyOptimized { tile: tile.max(1) }
    }
}

impl Default for MatrixMultiplyOptimized {
    fn default() -> Self {
        MatrixMultiplyOptimized::new(DEFAULT_TILE)
    }
}

impl Kernel for MatrixMultiplyOptimized {
    fn name(&self) -> &str {
        "matrix_multiply_opt"
    }

    fn run(&self, ws: &mut Workspace) {
        let (lhs, rhs, product) = ws.multiply_parts_mut();
        multiply_tiled(lhs, rhs, product, self.tile);
    }
}
