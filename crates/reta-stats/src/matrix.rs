use std::ops::{Index, IndexMut};

/// Dense row-major matrix of `f64` values.
///
/// This is the small amount of linear algebra the Newton-Raphson trainer needs:
/// transpose, products, row scaling and a Gauss-Jordan inverse. Column vectors are
/// passed around as plain slices.
///
/// # Examples
///
/// ```
/// # use reta_stats::matrix::Matrix;
/// let a = Matrix::from_row_major(2, 2, vec![4.0, 7.0, 2.0, 6.0]);
/// let inv = a.inverse().unwrap();
/// let id = a.product(&inv);
/// assert!((id[(0, 0)] - 1.0).abs() < 1e-12);
/// assert!(id[(0, 1)].abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates a `rows` x `cols` matrix filled with zeros.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Creates an `n` x `n` identity matrix.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |r, c| if r == c { 1.0 } else { 0.0 })
    }

    /// Creates a matrix whose element at `(r, c)` is `f(r, c)`.
    #[must_use]
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    /// Wraps a row-major buffer.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != rows * cols`.
    #[must_use]
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), rows * cols, "buffer does not match dimensions");
        Self { rows, cols, data }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns row `r` as a slice.
    #[must_use]
    pub fn row(&self, r: usize) -> &[f64] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// Returns the main diagonal.
    #[must_use]
    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.rows.min(self.cols)).map(|i| self[(i, i)]).collect()
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |r, c| self[(c, r)])
    }

    /// Matrix product `self * other`.
    ///
    /// # Panics
    ///
    /// Panics if `self.cols() != other.rows()`.
    #[must_use]
    pub fn product(&self, other: &Self) -> Self {
        assert_eq!(self.cols, other.rows, "incompatible matrix dimensions");
        let mut result = Self::zeros(self.rows, other.cols);
        for r in 0..self.rows {
            let lhs = self.row(r);
            for (k, &a) in lhs.iter().enumerate() {
                if a == 0.0 {
                    continue;
                }
                let rhs = other.row(k);
                let out = &mut result.data[r * other.cols..(r + 1) * other.cols];
                for (o, &b) in out.iter_mut().zip(rhs) {
                    *o += a * b;
                }
            }
        }
        result
    }

    /// Matrix-vector product `self * v`.
    ///
    /// # Panics
    ///
    /// Panics if `v.len() != self.cols()`.
    #[must_use]
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(self.cols, v.len(), "incompatible vector length");
        (0..self.rows)
            .map(|r| self.row(r).iter().zip(v).map(|(a, b)| a * b).sum())
            .collect()
    }

    /// Multiplies row `i` by `weights[i]`.
    ///
    /// Equivalent to `diag(weights) * self` without building the diagonal matrix.
    ///
    /// # Panics
    ///
    /// Panics if `weights.len() != self.rows()`.
    #[must_use]
    pub fn scale_rows(&self, weights: &[f64]) -> Self {
        assert_eq!(self.rows, weights.len(), "one weight per row is required");
        let mut result = self.clone();
        for (r, &w) in weights.iter().enumerate() {
            for v in &mut result.data[r * self.cols..(r + 1) * self.cols] {
                *v *= w;
            }
        }
        result
    }

    /// Computes the inverse with Gauss-Jordan elimination and partial pivoting.
    ///
    /// Returns `None` when the matrix is not square, is singular (a pivot falls below
    /// `n * f64::EPSILON` relative to the largest element), or the result is not finite.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        if self.rows != self.cols {
            return None;
        }
        let n = self.rows;
        let scale = self.data.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        if !scale.is_finite() || (n > 0 && scale == 0.0) {
            return None;
        }
        #[expect(clippy::cast_precision_loss)]
        let tolerance = scale * n as f64 * f64::EPSILON;

        let mut a = self.clone();
        let mut inv = Self::identity(n);
        for col in 0..n {
            let pivot_row =
                (col..n).max_by(|&i, &j| a[(i, col)].abs().total_cmp(&a[(j, col)].abs()))?;
            let pivot = a[(pivot_row, col)];
            if pivot.abs() <= tolerance {
                return None;
            }
            a.swap_rows(col, pivot_row);
            inv.swap_rows(col, pivot_row);

            for c in 0..n {
                a[(col, c)] /= pivot;
                inv[(col, c)] /= pivot;
            }
            for r in 0..n {
                if r == col {
                    continue;
                }
                let factor = a[(r, col)];
                if factor == 0.0 {
                    continue;
                }
                for c in 0..n {
                    let (pa, pi) = (a[(col, c)], inv[(col, c)]);
                    a[(r, c)] -= factor * pa;
                    inv[(r, c)] -= factor * pi;
                }
            }
        }

        inv.data.iter().all(|v| v.is_finite()).then_some(inv)
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for c in 0..self.cols {
            self.data.swap(a * self.cols + c, b * self.cols + c);
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        assert!(r < self.rows && c < self.cols, "index out of bounds");
        &self.data[r * self.cols + c]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f64 {
        assert!(r < self.rows && c < self.cols, "index out of bounds");
        &mut self.data[r * self.cols + c]
    }
}
