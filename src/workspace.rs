//! Per-phase buffers and the allocator that shapes them for each operation.
//!
//! A `Workspace` is owned by exactly one phase of a run. The allocator hands
//! out zeroed buffers sized for the selected operation; allocation failures
//! surface as `BenchError::Allocation` instead of aborting the process.

use tracing::debug;

use crate::core::Operation;
use crate::kernel::matrix_init;
use crate::{BenchError, BenchResult};

/// Square integer matrix stored row-major in a flat buffer.
///
/// Element `(i, j)` lives at `i * n + j`; every access is bounds-checked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Matrix {
    data: Vec<i32>,
    n: usize,
}

impl Matrix {
    /// Allocate an `n x n` matrix filled with zeros.
    pub fn zeroed(n: usize, buffer: &'static str) -> BenchResult<Self> {
        let len = n.checked_mul(n).ok_or_else(|| BenchError::Allocation {
            buffer,
            requested: format!("{n}x{n} elements"),
            reason: "element count overflows usize".to_string(),
        })?;
        Ok(Matrix { data: zeroed_buffer(len, buffer)?, n })
    }

    /// Build a matrix from row-major data; `None` unless `data.len() == n * n`.
    pub fn from_row_major(n: usize, data: Vec<i32>) -> Option<Self> {
        (n.checked_mul(n) == Some(data.len())).then_some(Matrix { data, n })
    }

    /// Row stride, which is also the edge length.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of complete rows actually backed by storage.
    pub fn rows(&self) -> usize {
        if self.n == 0 { 0 } else { self.data.len() / self.n }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> i32 {
        self.data[i * self.n + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: i32) {
        self.data[i * self.n + j] = value;
    }

    pub fn row(&self, i: usize) -> &[i32] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.data
    }
}

/// Allocate `len` zeroed integers, reporting failure instead of aborting.
fn zeroed_buffer(len: usize, buffer: &'static str) -> BenchResult<Vec<i32>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|e| BenchError::Allocation {
        buffer,
        requested: format!("{len} elements"),
        reason: e.to_string(),
    })?;
    data.resize(len, 0);
    Ok(data)
}

/// Buffers and scalar a kernel reads and writes during one phase.
///
/// Which fields are populated depends on the operation:
///
/// | operation       | lhs   | rhs   | product | array | factorial |
/// |-----------------|-------|-------|---------|-------|-----------|
/// | MatrixInit      | out   | out   |         |       |           |
/// | ArrayInit       |       |       |         | out   |           |
/// | Factorial       |       |       |         |       | out       |
/// | MatrixMultiply  | in    | in    | out     |       |           |
#[derive(Debug)]
pub struct Workspace {
    operation: Operation,
    n: usize,
    lhs: Matrix,
    rhs: Matrix,
    product: Matrix,
    array: Vec<i32>,
    factorial: u64,
}

impl Workspace {
    /// Allocate a fresh, zeroed workspace for `operation` with size `n`.
    ///
    /// Matrix multiply inputs are primed with the baseline matrix
    /// initializer before returning, so every multiply phase starts from the
    /// same deterministic operands.
    pub fn allocate(operation: Operation, n: usize) -> BenchResult<Self> {
        let mut ws = Workspace {
            operation,
            n,
            lhs: Matrix::default(),
            rhs: Matrix::default(),
            product: Matrix::default(),
            array: Vec::new(),
            factorial: 0,
        };

        match operation {
            Operation::MatrixInit => {
                ws.lhs = Matrix::zeroed(n, "lhs")?;
                ws.rhs = Matrix::zeroed(n, "rhs")?;
            }
            Operation::ArrayInit => {
                ws.array = zeroed_buffer(n, "array")?;
            }
            Operation::Factorial => {}
            Operation::MatrixMultiply => {
                ws.lhs = Matrix::zeroed(n, "lhs")?;
                ws.rhs = Matrix::zeroed(n, "rhs")?;
                ws.product = Matrix::zeroed(n, "product")?;
                matrix_init::initialize_baseline(&mut ws.lhs, &mut ws.rhs);
            }
        }

        debug!(operation = %operation, n, "allocated workspace");
        Ok(ws)
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn lhs(&self) -> &Matrix {
        &self.lhs
    }

    pub fn rhs(&self) -> &Matrix {
        &self.rhs
    }

    pub fn product(&self) -> &Matrix {
        &self.product
    }

    pub fn array(&self) -> &[i32] {
        &self.array
    }

    pub fn factorial(&self) -> u64 {
        self.factorial
    }

    /// Both operand matrices, mutably. Written by the matrix initializers.
    pub fn matrices_mut(&mut self) -> (&mut Matrix, &mut Matrix) {
        (&mut self.lhs, &mut self.rhs)
    }

    /// Read-only operands and the writable product, for the multiply kernels.
    pub fn multiply_parts_mut(&mut self) -> (&Matrix, &Matrix, &mut Matrix) {
        (&self.lhs, &self.rhs, &mut self.product)
    }

    pub fn array_mut(&mut self) -> &mut [i32] {
        &mut self.array
    }

    pub fn set_factorial(&mut self, value: u64) {
        self.factorial = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_init_workspace_shape() {
        let ws = Workspace::allocate(Operation::MatrixInit, 4).unwrap();
        assert_eq!(ws.lhs().len(), 16);
        assert_eq!(ws.rhs().len(), 16);
        assert!(ws.product().is_empty());
        assert!(ws.array().is_empty());
        assert!(ws.lhs().as_slice().iter().all(|v| *v == 0));
        assert!(ws.rhs().as_slice().iter().all(|v| *v == 0));
    }

    #[test]
    fn test_array_init_workspace_shape() {
        let ws = Workspace::allocate(Operation::ArrayInit, 12).unwrap();
        assert_eq!(ws.array(), &[0; 12]);
        assert!(ws.lhs().is_empty());
    }

    #[test]
    fn test_factorial_workspace_has_no_buffers() {
        let ws = Workspace::allocate(Operation::Factorial, 20).unwrap();
        assert_eq!(ws.n(), 20);
        assert_eq!(ws.factorial(), 0);
        assert!(ws.lhs().is_empty() && ws.rhs().is_empty() && ws.product().is_empty());
        assert!(ws.array().is_empty());
    }

    #[test]
    fn test_matrix_multiply_inputs_are_primed() {
        let ws = Workspace::allocate(Operation::MatrixMultiply, 3).unwrap();
        for i in 0..3 {
            assert_eq!(ws.lhs().row(i), &[i as i32; 3]);
            assert_eq!(ws.rhs().row(i), &[i as i32 + 1; 3]);
        }
        assert_eq!(ws.product().as_slice(), &[0; 9]);
    }

    #[test]
    fn test_zero_size_yields_empty_buffers() {
        for op in crate::core::OPERATIONS {
            let ws = Workspace::allocate(op, 0).unwrap();
            assert!(ws.lhs().is_empty());
            assert!(ws.rhs().is_empty());
            assert!(ws.product().is_empty());
            assert!(ws.array().is_empty());
        }
    }

    #[test]
    fn test_overflowing_matrix_size_is_allocation_failure() {
        let err = Workspace::allocate(Operation::MatrixInit, usize::MAX).unwrap_err();
        assert!(matches!(err, BenchError::Allocation { buffer: "lhs", .. }));
    }

    #[test]
    fn test_oversized_array_is_allocation_failure() {
        let err = Workspace::allocate(Operation::ArrayInit, usize::MAX / 2).unwrap_err();
        assert!(matches!(err, BenchError::Allocation { buffer: "array", .. }));
    }

    #[test]
    fn test_matrix_accessors_use_row_stride() {
        let mut m = Matrix::zeroed(3, "m").unwrap();
        m.set(1, 2, 7);
        assert_eq!(m.as_slice()[5], 7);
        assert_eq!(m.get(1, 2), 7);
        assert_eq!(m.rows(), 3);
        assert!(Matrix::from_row_major(2, vec![1, 2, 3]).is_none());
        assert_eq!(Matrix::from_row_major(2, vec![1, 2, 3, 4]).unwrap().row(1), &[3, 4]);
    }
}
