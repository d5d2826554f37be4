use std::ops::{Add, Sub};

use num_traits::Float;

use super::{MathError, Vector};

/// A matrix stored as a sequence of equal-dimension column vectors.
///
/// Like [`Vector`], binary `+`/`-` between two matrices operate over the
/// shorter column count. Products validate their operand dimensions and
/// report a [`MathError`] on mismatch.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<T> {
    columns: Vec<Vector<T>>,
}

impl<T: Float> Matrix<T> {
    /// Builds a matrix from columns, all of which must share one dimension.
    pub fn new(columns: Vec<Vector<T>>) -> Result<Matrix<T>, MathError> {
        let Some(first) = columns.first() else {
            return Err(MathError::EmptyMatrix);
        };
        if first.dim() == 0 {
            return Err(MathError::EmptyMatrix);
        }
        let rows = first.dim();
        if columns.iter().any(|c| c.dim() != rows) {
            return Err(MathError::ColumnDimensionMismatch);
        }
        Ok(Matrix { columns })
    }

    pub fn identity(n: usize) -> Matrix<T> {
        let columns = (0..n)
            .map(|c| {
                let mut column = Vector::zeros(n);
                column
                    .set(c, T::one())
                    .unwrap_or_else(|_| unreachable!("index {c} is within dimension {n}"));
                column
            })
            .collect();
        Matrix { columns }
    }

    pub fn rows(&self) -> usize {
        self.columns[0].dim()
    }

    pub fn cols(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, index: usize) -> Result<&Vector<T>, MathError> {
        self.columns.get(index).ok_or(MathError::IndexOutOfRange {
            index,
            dimension: self.cols(),
        })
    }

    pub fn set_column(&mut self, index: usize, column: Vector<T>) -> Result<(), MathError> {
        if column.dim() != self.rows() {
            return Err(MathError::ColumnDimensionMismatch);
        }
        let dimension = self.cols();
        match self.columns.get_mut(index) {
            Some(slot) => {
                *slot = column;
                Ok(())
            }
            None => Err(MathError::IndexOutOfRange { index, dimension }),
        }
    }

    pub fn value_at(&self, row: usize, col: usize) -> Result<T, MathError> {
        self.column(col)?.get(row)
    }

    pub fn transpose(&self) -> Matrix<T> {
        let columns = (0..self.rows())
            .map(|r| Vector::new(self.columns.iter().map(|col| col[r]).collect()))
            .collect();
        Matrix { columns }
    }

    /// Determinant by recursive Laplace expansion along the first column,
    /// base case dimension 2. O(N!), which is fine for the 3x3 camera basis
    /// this crate actually uses.
    pub fn determinant(&self) -> Result<T, MathError> {
        if self.rows() != self.cols() {
            return Err(MathError::NotSquare {
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok(self.det_unchecked())
    }

    fn det_unchecked(&self) -> T {
        match self.cols() {
            1 => self.columns[0][0],
            2 => self.columns[0][0] * self.columns[1][1] - self.columns[1][0] * self.columns[0][1],
            n => {
                let mut result = T::zero();
                for i in 0..n {
                    let term = self.columns[0][i] * self.minor(i, 0).det_unchecked();
                    result = if i % 2 == 0 { result + term } else { result - term };
                }
                result
            }
        }
    }

    /// The matrix with row `skip_row` and column `skip_col` removed.
    fn minor(&self, skip_row: usize, skip_col: usize) -> Matrix<T> {
        let columns = self
            .columns
            .iter()
            .enumerate()
            .filter(|(c, _)| *c != skip_col)
            .map(|(_, col)| {
                Vector::new(
                    col.iter()
                        .enumerate()
                        .filter(|(r, _)| *r != skip_row)
                        .map(|(_, x)| x)
                        .collect(),
                )
            })
            .collect();
        Matrix { columns }
    }

    /// Inverse as adjugate over determinant; fails on singular matrices.
    pub fn inverse(&self) -> Result<Matrix<T>, MathError> {
        let det = self.determinant()?;
        if det == T::zero() {
            return Err(MathError::Singular);
        }
        let n = self.cols();
        if n == 1 {
            return Ok(Matrix {
                columns: vec![Vector::new(vec![det.recip()])],
            });
        }
        let cofactors = Matrix {
            columns: (0..n)
                .map(|c| {
                    Vector::new(
                        (0..n)
                            .map(|r| {
                                let m = self.minor(r, c).det_unchecked();
                                if (r + c) % 2 == 0 { m } else { -m }
                            })
                            .collect(),
                    )
                })
                .collect(),
        };
        Ok(cofactors.transpose().scale(det.recip()))
    }

    pub fn scale(&self, factor: T) -> Matrix<T> {
        Matrix {
            columns: self.columns.iter().map(|c| c.scale(factor)).collect(),
        }
    }

    pub fn mul_vector(&self, v: &Vector<T>) -> Result<Vector<T>, MathError> {
        if v.dim() != self.cols() {
            return Err(MathError::DimensionMismatch {
                left: self.cols(),
                right: v.dim(),
            });
        }
        let mut result = Vector::zeros(self.rows());
        for (c, column) in self.columns.iter().enumerate() {
            result += &column.scale(v[c]);
        }
        Ok(result)
    }

    pub fn mul_matrix(&self, rhs: &Matrix<T>) -> Result<Matrix<T>, MathError> {
        if rhs.rows() != self.cols() {
            return Err(MathError::DimensionMismatch {
                left: self.cols(),
                right: rhs.rows(),
            });
        }
        let columns = rhs
            .columns
            .iter()
            .map(|rhs_col| {
                let mut column = Vector::zeros(self.rows());
                for (r, own_col) in self.columns.iter().enumerate() {
                    column += &own_col.scale(rhs_col[r]);
                }
                column
            })
            .collect();
        Ok(Matrix { columns })
    }

    /// Flattens into column-major order, the layout GL-style shader uniforms
    /// expect for a basis matrix.
    pub fn to_column_major(&self) -> Vec<T> {
        self.columns.iter().flat_map(|c| c.iter()).collect()
    }
}

impl<T: Float> Add for &Matrix<T> {
    type Output = Matrix<T>;

    fn add(self, rhs: &Matrix<T>) -> Matrix<T> {
        Matrix {
            columns: self
                .columns
                .iter()
                .zip(&rhs.columns)
                .map(|(a, b)| a + b)
                .collect(),
        }
    }
}

impl<T: Float> Sub for &Matrix<T> {
    type Output = Matrix<T>;

    fn sub(self, rhs: &Matrix<T>) -> Matrix<T> {
        Matrix {
            columns: self
                .columns
                .iter()
                .zip(&rhs.columns)
                .map(|(a, b)| a - b)
                .collect(),
        }
    }
}
