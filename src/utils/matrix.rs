//! Dense row-major matrix and the vector kernels used by the layer engine
//!
//! Only the handful of operations backpropagation needs are provided:
//! matrix-vector products (plain and transposed), outer-product accumulation
//! and elementwise blending of flat buffers.

use crate::error::{ensure_len, NetworkError, Result};

/// Real-valued matrix stored row-major (`rows × cols`).
///
/// For a layer, `rows` is the number of outputs and `cols` the number of inputs,
/// so `weights[(i, j)]` connects input `j` to output `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates a `rows × cols` matrix filled with zeros.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `rows × cols` does not fit in `usize`.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        let len = element_count(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            data: vec![0.0; len],
        })
    }

    /// Wraps a row-major buffer, checking that it holds exactly `rows × cols` values.
    ///
    /// # Examples
    ///
    /// ```
    /// use multilayer_perceptron::utils::matrix::Matrix;
    ///
    /// let m = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(m.get(1, 0), 3.0);
    /// ```
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        ensure_len("matrix buffer", element_count(rows, cols)?, data.len())?;
        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix by evaluating `f(row, col)` for every element.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> f64,
    ) -> Result<Self> {
        let mut data = Vec::with_capacity(element_count(rows, cols)?);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col));
            }
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "matrix index out of bounds");
        self.data[row * self.cols + col]
    }

    /// One row as a slice.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Sets every element to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.iter_mut().for_each(|x| *x = value);
    }

    /// Computes `self · vector`.
    pub fn mat_vec(&self, vector: &[f64]) -> Result<Vec<f64>> {
        ensure_len("matrix-vector product", self.cols, vector.len())?;

        Ok((0..self.rows).map(|row| dot(self.row(row), vector)).collect())
    }

    /// Computes `selfᵀ · vector` without materialising the transpose.
    pub fn transpose_mat_vec(&self, vector: &[f64]) -> Result<Vec<f64>> {
        ensure_len("transposed matrix-vector product", self.rows, vector.len())?;

        let mut result = vec![0.0; self.cols];
        for (row, &scale) in vector.iter().enumerate() {
            for (out, &w) in result.iter_mut().zip(self.row(row)) {
                *out += w * scale;
            }
        }
        Ok(result)
    }

    /// Accumulates the outer product `left ⊗ right` into `self`.
    ///
    /// `left` must have `rows` elements and `right` must have `cols` elements.
    pub fn add_outer_product(&mut self, left: &[f64], right: &[f64]) -> Result<()> {
        ensure_len("outer product (rows)", self.rows, left.len())?;
        ensure_len("outer product (columns)", self.cols, right.len())?;

        if self.cols == 0 {
            return Ok(());
        }
        for (row, &l) in self.data.chunks_exact_mut(self.cols).zip(left) {
            for (value, &r) in row.iter_mut().zip(right) {
                *value += l * r;
            }
        }
        Ok(())
    }

    /// Fails unless `other` has exactly the same shape.
    pub(crate) fn ensure_same_shape(&self, other: &Matrix, context: &'static str) -> Result<()> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(NetworkError::DimensionMismatch {
                context,
                expected: self.rows * self.cols,
                actual: other.rows * other.cols,
            });
        }
        Ok(())
    }
}

/// Number of elements in a `rows × cols` matrix, or an error on overflow.
fn element_count(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or_else(|| {
        NetworkError::InvalidConfiguration(format!(
            "matrix shape {rows} x {cols} is too large"
        ))
    })
}

/// Inner product of two equally sized slices.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// `target[i] = keep * target[i] + scale * source[i]`
pub fn blend_into(target: &mut [f64], keep: f64, source: &[f64], scale: f64) {
    debug_assert_eq!(target.len(), source.len());
    for (t, &s) in target.iter_mut().zip(source) {
        *t = keep * *t + scale * s;
    }
}

/// `target[i] += source[i]`
pub fn add_into(target: &mut [f64], source: &[f64]) {
    debug_assert_eq!(target.len(), source.len());
    for (t, &s) in target.iter_mut().zip(source) {
        *t += s;
    }
}

/// Elementwise `left - right`.
pub fn difference(left: &[f64], right: &[f64]) -> Result<Vec<f64>> {
    ensure_len("vector difference", left.len(), right.len())?;
    Ok(left.iter().zip(right).map(|(l, r)| l - r).collect())
}

/// Sum of squared elements.
pub fn sum_of_squares(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum()
}
