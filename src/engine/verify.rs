//! Verification engine: capture the baseline's observable output and check
//! the optimized phase against it exactly.

use tracing::debug;

use crate::core::Operation;
use crate::workspace::Workspace;
use crate::{BenchError, BenchResult};

const FACTORIAL: &str = "factorial";

/// Buffers and scalar that make up an operation's observable output.
fn observable(ws: &Workspace) -> (Vec<(&'static str, &[i32])>, Option<u64>) {
    match ws.operation() {
        Operation::MatrixInit => (
            vec![("lhs", ws.lhs().as_slice()), ("rhs", ws.rhs().as_slice())],
            None,
        ),
        Operation::ArrayInit => (vec![("array", ws.array())], None),
        Operation::Factorial => (Vec::new(), Some(ws.factorial())),
        Operation::MatrixMultiply => (vec![("product", ws.product().as_slice())], None),
    }
}

fn copy_buffer(name: &'static str, src: &[i32]) -> BenchResult<Vec<i32>> {
    let mut out = Vec::new();
    out.try_reserve_exact(src.len()).map_err(|e| BenchError::Allocation {
        buffer: name,
        requested: format!("{} elements", src.len()),
        reason: e.to_string(),
    })?;
    out.extend_from_slice(src);
    Ok(out)
}

/// Owned copy of a phase's observable output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    operation: Operation,
    buffers: Vec<(&'static str, Vec<i32>)>,
    scalar: Option<u64>,
}

impl Snapshot {
    /// Copy the observable output out of `ws`; `ws` is left untouched.
    pub fn capture(ws: &Workspace) -> BenchResult<Self> {
        let (views, scalar) = observable(ws);
        let buffers = views
            .into_iter()
            .map(|(name, data)| -> BenchResult<_> { Ok((name, copy_buffer(name, data)?)) })
            .collect::<BenchResult<Vec<_>>>()?;
        let snapshot = Snapshot {
            operation: ws.operation(),
            buffers,
            scalar,
        };
        debug!(operation = %snapshot.operation, elements = snapshot.element_count(), "captured snapshot");
        Ok(snapshot)
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Total number of buffer elements plus the scalar, if any.
    pub fn element_count(&self) -> usize {
        self.buffers.iter().map(|(_, b)| b.len()).sum::<usize>() + usize::from(self.scalar.is_some())
    }

    /// Exact comparison of every observable buffer and scalar.
    ///
    /// Returns `BenchError::ResultMismatch` naming the first differing
    /// buffer and element.
    pub fn compare(&self, ws: &Workspace) -> BenchResult<()> {
        if ws.operation() != self.operation {
            return Err(BenchError::Message(format!(
                "snapshot of {} cannot verify a {} workspace",
                self.operation,
                ws.operation()
            )));
        }

        let (views, scalar) = observable(ws);
        for ((name, expected), (_, actual)) in self.buffers.iter().zip(views) {
            let differs_at = expected
                .iter()
                .zip(actual)
                .position(|(e, a)| e.to_ne_bytes() != a.to_ne_bytes())
                .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())));
            if let Some(index) = differs_at {
                return Err(BenchError::ResultMismatch {
                    operation: self.operation,
                    buffer: *name,
                    index,
                });
            }
        }

        if self.scalar != scalar {
            return Err(BenchError::ResultMismatch {
                operation: self.operation,
                buffer: FACTORIAL,
                index: 0,
            });
        }
        Ok(())
    }
}
