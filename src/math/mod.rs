mod matrix;
mod quaternion;
mod vector;

pub use matrix::Matrix;
pub use quaternion::Quaternion;
pub use vector::{Vector, cross, dot};

use thiserror::Error;

/// Domain errors of the math kernel.
///
/// These are programmer errors: a caller holding well-formed values never
/// sees them, so they are reported eagerly and are not recoverable for the
/// failing call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MathError {
    #[error("all matrix columns must have the same dimension")]
    ColumnDimensionMismatch,

    #[error("attempt to construct a matrix with no columns")]
    EmptyMatrix,

    #[error("cross product is only defined in 3 dimensions (got {left} and {right})")]
    CrossDimension { left: usize, right: usize },

    #[error("operation requires a square matrix (got {rows}x{cols})")]
    NotSquare { rows: usize, cols: usize },

    #[error("matrix is singular and cannot be inverted")]
    Singular,

    #[error("cannot normalize a zero-length value")]
    ZeroLength,

    #[error("index {index} out of range for dimension {dimension}")]
    IndexOutOfRange { index: usize, dimension: usize },

    #[error("operand dimensions are incompatible ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },

    #[error("quaternion imaginary part must be 3-dimensional (got {got})")]
    ImaginaryDimension { got: usize },
}
