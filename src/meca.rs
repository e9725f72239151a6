//! Interface to the mechanical linear system that confinement forces feed into.
//!
//! A confined point contributes a linear force `M * x + b`, where `x` holds
//! the coordinates of all points. Spaces only ever accumulate into `M` and
//! `b`; they never read them back.

use nalgebra::{DMatrix, DVector};

/// Base index of a point in the coefficient system.
///
/// The coordinate along axis `d` of a point with base `i` lives at row
/// `dim * i + d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointIndex(pub usize);

impl PointIndex {
    /// Returns the row of the given axis for a system of dimension `dim`.
    #[must_use]
    pub fn axis(self, dim: usize, axis: usize) -> usize {
        dim * self.0 + axis
    }
}

/// Accumulator for symmetric stiffness coefficients and bias terms.
pub trait StiffnessSystem {
    /// Adds `delta` to the diagonal coefficient `(index, index)`.
    fn add_diagonal(&mut self, index: usize, delta: f64);

    /// Adds `delta` to the symmetric pair of coefficients `(a, b)` and `(b, a)`.
    fn add_off_diagonal(&mut self, a: usize, b: usize, delta: f64);

    /// Adds `delta` to the bias term of row `index`.
    fn add_bias(&mut self, index: usize, delta: f64);
}

/// Dense, in-memory [`StiffnessSystem`].
#[derive(Debug, Clone, PartialEq)]
pub struct DenseStiffness {
    matrix: DMatrix<f64>,
    bias: DVector<f64>,
}

impl DenseStiffness {
    /// Creates a zeroed system with `size` rows.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            matrix: DMatrix::zeros(size, size),
            bias: DVector::zeros(size),
        }
    }

    /// Creates a zeroed system for `points` points in `dim` dimensions.
    #[must_use]
    pub fn for_points(points: usize, dim: usize) -> Self {
        Self::new(points * dim)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn size(&self) -> usize {
        self.bias.len()
    }

    /// Returns the coefficient matrix.
    #[must_use]
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Returns the bias vector.
    #[must_use]
    pub fn bias(&self) -> &DVector<f64> {
        &self.bias
    }

    /// Evaluates the linear force `M * x + b` for the coordinates `x`.
    ///
    /// Returns `None` if `x` does not have one entry per row.
    #[must_use]
    pub fn force(&self, x: &DVector<f64>) -> Option<DVector<f64>> {
        (x.len() == self.size()).then(|| &self.matrix * x + &self.bias)
    }

    /// Resets every coefficient and bias term to zero.
    pub fn clear(&mut self) {
        self.matrix.fill(0.0);
        self.bias.fill(0.0);
    }
}

impl StiffnessSystem for DenseStiffness {
    fn add_diagonal(&mut self, index: usize, delta: f64) {
        self.matrix[(index, index)] += delta;
    }

    fn add_off_diagonal(&mut self, a: usize, b: usize, delta: f64) {
        self.matrix[(a, b)] += delta;
        if a != b {
            self.matrix[(b, a)] += delta;
        }
    }

    fn add_bias(&mut self, index: usize, delta: f64) {
        self.bias[index] += delta;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn axis_rows_use_dimension_stride() {
        assert_eq!(PointIndex(0).axis(3, 2), 2);
        assert_eq!(PointIndex(4).axis(3, 1), 13);
        assert_eq!(PointIndex(4).axis(2, 1), 9);
    }

    #[test]
    fn off_diagonal_is_symmetric() {
        let mut sys = DenseStiffness::new(3);
        sys.add_off_diagonal(0, 2, -1.5);
        sys.add_off_diagonal(1, 1, 2.0);
        assert_relative_eq!(sys.matrix()[(0, 2)], -1.5);
        assert_relative_eq!(sys.matrix()[(2, 0)], -1.5);
        assert_relative_eq!(sys.matrix()[(1, 1)], 2.0);
        assert_eq!(sys.matrix(), &sys.matrix().transpose());
    }

    #[test]
    fn contributions_accumulate() {
        let mut sys = DenseStiffness::for_points(2, 2);
        assert_eq!(sys.size(), 4);
        sys.add_diagonal(3, -1.0);
        sys.add_diagonal(3, -2.0);
        sys.add_bias(3, 4.0);
        sys.add_bias(3, 0.5);
        assert_relative_eq!(sys.matrix()[(3, 3)], -3.0);
        assert_relative_eq!(sys.bias()[3], 4.5);

        sys.clear();
        assert_eq!(sys, DenseStiffness::new(4));
    }

    #[test]
    fn force_is_affine() {
        let mut sys = DenseStiffness::new(1);
        sys.add_diagonal(0, -2.0);
        sys.add_bias(0, 2.0);
        // spring of stiffness 2 toward x = 1
        let f = sys.force(&DVector::from_vec(vec![3.0])).unwrap();
        assert_relative_eq!(f[0], -4.0);
        assert!(sys.force(&DVector::zeros(2)).is_none());
    }
}
