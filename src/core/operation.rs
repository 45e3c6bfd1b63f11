//! The closed set of benchmarked operations and the static usage text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operation selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    /// Initialize a pair of square integer matrices.
    MatrixInit,
    /// Initialize an integer array.
    ArrayInit,
    /// Compute a factorial with a recursive routine.
    Factorial,
    /// Multiply two square integer matrices.
    MatrixMultiply,
}

/// Operations indexed by their command-line selector.
pub const OPERATIONS: [Operation; 4] = [
    Operation::MatrixInit,
    Operation::ArrayInit,
    Operation::Factorial,
    Operation::MatrixMultiply,
];

impl Operation {
    /// Look up an operation by its numeric selector (0-3).
    pub fn from_selector(selector: u8) -> Option<Self> {
        OPERATIONS.get(selector as usize).copied()
    }

    pub fn selector(self) -> u8 {
        match self {
            Operation::MatrixInit => 0,
            Operation::ArrayInit => 1,
            Operation::Factorial => 2,
            Operation::MatrixMultiply => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::MatrixInit => "MATRIX_INIT",
            Operation::ArrayInit => "ARRAY_INIT",
            Operation::Factorial => "FACTORIAL",
            Operation::MatrixMultiply => "MATRIX_MULTIPLY",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Operation {
    type Error = crate::BenchError;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        Operation::from_selector(selector)
            .ok_or_else(|| crate::BenchError::Argument(format!("unknown operation {selector}")))
    }
}

pub const USAGE: &str = "\
Usage: copt OP N LOOP

copt measures the execution time impact of source level optimizations.
copt runs and times an unoptimized and optimized version of a given
operation and input size.

Argument description:

OP is the operation to run for this invocation of copt. There are four
possible operations, each of which takes exactly one argument N:
  0: initialize a pair of square integer matrices. N is the size of the
     matrices.
  1: initialize an integer array. N is the length of the array
  2: compute factorial with a recursive routine. N is the number for
     which the routine computes the factorial
  3: multiply two square integer matrices. N is the size of the matrix

LOOP is the number of times to run the given operation with the given
argument. Timing starts before the first operation begins and ends when
the last operation has completed.

OP, N, and LOOP all must be integers <= INT_MAX; LOOP must be at least 1.
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_round_trip() {
        for op in OPERATIONS {
            assert_eq!(Operation::from_selector(op.selector()), Some(op));
        }
        assert_eq!(Operation::from_selector(4), None);
    }

    #[test]
    fn test_names_match_serde_representation() {
        for op in OPERATIONS {
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{}\"", op.name()));
        }
    }

    #[test]
    fn test_try_from_rejects_unknown_selector() {
        let err = Operation::try_from(9).unwrap_err();
        assert!(matches!(err, crate::BenchError::Argument(_)));
    }
}
