//! System matrix assembly and dense LU solving.

use crate::circuit::NodeId;
use crate::elements::Stamp;

/// Smallest pivot accepted by the factorization, relative to the largest
/// magnitude in the pivot's column of A.
pub const PIVOT_TOLERANCE: f64 = 1e-14;

/// The factorization hit a pivot too small to divide by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingularPivot {
    /// Elimination step at which the pivot vanished
    pub column: usize,
}

/// Augmented system `[A | z]` with ground already removed.
#[derive(Debug, Clone)]
pub struct SystemMatrix {
    /// System matrix A (row-major)
    pub a: Vec<f64>,
    /// Right-hand side z
    pub z: Vec<f64>,
    /// Solution vector x
    pub x: Vec<f64>,
    /// Number of unknowns
    pub size: usize,
    /// LU decomposition of A
    lu: Vec<f64>,
    /// Row permutation from partial pivoting
    pivots: Vec<usize>,
    /// Largest magnitude in each column of A
    scale: Vec<f64>,
}

impl SystemMatrix {
    /// Create an all-zero system with `size` unknowns.
    pub fn new(size: usize) -> Self {
        Self {
            a: vec![0.0; size * size],
            z: vec![0.0; size],
            x: vec![0.0; size],
            size,
            lu: vec![0.0; size * size],
            pivots: vec![0; size],
            scale: vec![0.0; size],
        }
    }

    /// Clear the matrix and right-hand side to zero.
    pub fn clear(&mut self) {
        self.a.fill(0.0);
        self.z.fill(0.0);
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.a[row * self.size + col]
    }

    /// Get an entry of the augmented matrix; column `size` is the RHS.
    pub fn augmented(&self, row: usize, col: usize) -> f64 {
        if col == self.size {
            self.z[row]
        } else {
            self.get(row, col)
        }
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] += value;
    }

    /// Add to right-hand side element.
    pub fn add_source(&mut self, row: usize, value: f64) {
        self.z[row] += value;
    }

    /// Scatter a local stamp into the system.
    ///
    /// `nodes[j]` is the global node of the stamp's terminal `j`. Rows and
    /// columns that land on ground are dropped; everything else accumulates.
    pub fn scatter(&mut self, nodes: &[NodeId], stamp: &Stamp) {
        debug_assert_eq!(nodes.len(), stamp.terminals());

        for (j, row_node) in nodes.iter().enumerate() {
            let Some(row) = row_node.unknown_index() else {
                continue;
            };
            for (k, col_node) in nodes.iter().enumerate() {
                if let Some(col) = col_node.unknown_index() {
                    self.add(row, col, stamp.get(j, k));
                }
            }
            self.add_source(row, stamp.rhs(j));
        }
    }

    /// Perform LU decomposition with partial pivoting.
    ///
    /// A pivot is rejected when it is below `PIVOT_TOLERANCE` times its
    /// column's scale, so uniformly tiny conductances still factor.
    pub fn factor(&mut self) -> Result<(), SingularPivot> {
        let n = self.size;
        self.lu.copy_from_slice(&self.a);

        self.scale.fill(0.0);
        for row in self.a.chunks_exact(n.max(1)) {
            for (scale, v) in self.scale.iter_mut().zip(row) {
                *scale = scale.max(v.abs());
            }
        }

        for i in 0..n {
            self.pivots[i] = i;
        }

        for k in 0..n {
            // Find pivot
            let mut max_val = self.lu[k * n + k].abs();
            let mut max_row = k;

            for i in (k + 1)..n {
                let val = self.lu[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            // Also rejects NaN pivots and all-zero columns
            if !(max_val > PIVOT_TOLERANCE * self.scale[k]) || !max_val.is_finite() {
                return Err(SingularPivot { column: k });
            }

            // Swap rows if needed
            if max_row != k {
                self.pivots.swap(k, max_row);
                for j in 0..n {
                    self.lu.swap(k * n + j, max_row * n + j);
                }
            }

            // Eliminate
            let pivot = self.lu[k * n + k];
            for i in (k + 1)..n {
                let factor = self.lu[i * n + k] / pivot;
                self.lu[i * n + k] = factor;
                for j in (k + 1)..n {
                    self.lu[i * n + j] -= factor * self.lu[k * n + j];
                }
            }
        }

        Ok(())
    }

    /// Solve the system using the pre-computed LU decomposition.
    pub fn solve(&mut self) -> Result<(), SingularPivot> {
        let n = self.size;

        // Apply pivot permutation to z
        for i in 0..n {
            self.x[i] = self.z[self.pivots[i]];
        }

        // Forward substitution (L * y = Pb)
        for i in 0..n {
            for j in 0..i {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
        }

        // Back substitution (U * x = y)
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
            self.x[i] /= self.lu[i * n + i];
        }

        if self.x.iter().any(|v| !v.is_finite()) {
            return Err(SingularPivot { column: n });
        }

        Ok(())
    }

    /// Factor and solve in one go.
    pub fn factor_and_solve(&mut self) -> Result<&[f64], SingularPivot> {
        self.factor()?;
        self.solve()?;
        Ok(&self.x)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_scatter_drops_ground_and_accumulates() {
        let mut m = SystemMatrix::new(1);
        let mut stamp = Stamp::zeros(2);
        stamp.stamp_admittance(0, 1, 2.0);
        stamp.add_rhs(0, 1.0);

        // Two identical elements between node 1 and ground
        let nodes = [NodeId(1), NodeId::GROUND];
        m.scatter(&nodes, &stamp);
        m.scatter(&nodes, &stamp);

        assert_eq!(m.get(0, 0), 4.0);
        assert_eq!(m.augmented(0, 1), 2.0);
    }

    #[test]
    fn test_solve_with_pivoting() {
        // [0 1; 1 0] x = [2; 3] needs a row swap
        let mut m = SystemMatrix::new(2);
        m.add(0, 1, 1.0);
        m.add(1, 0, 1.0);
        m.add_source(0, 2.0);
        m.add_source(1, 3.0);

        let x = m.factor_and_solve().unwrap();
        assert_relative_eq!(x[0], 3.0);
        assert_relative_eq!(x[1], 2.0);
    }

    #[test]
    fn test_singular_matrix_detected() {
        let mut m = SystemMatrix::new(2);
        m.add(0, 0, 1.0);
        assert_eq!(m.factor(), Err(SingularPivot { column: 1 }));
    }

    #[test]
    fn test_tiny_but_regular_system_solves() {
        // Every entry is far below any absolute cutoff
        let mut m = SystemMatrix::new(2);
        m.add(0, 0, 2e-16);
        m.add(0, 1, -1e-16);
        m.add(1, 0, -1e-16);
        m.add(1, 1, 2e-16);
        m.add_source(0, 1e-16);

        let x = m.factor_and_solve().unwrap();
        assert_relative_eq!(x[0], 2.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tiny_dependent_rows_are_singular() {
        let mut m = SystemMatrix::new(2);
        for (row, col) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            m.add(row, col, 1e-20);
        }
        assert_eq!(m.factor(), Err(SingularPivot { column: 1 }));
    }

    #[test]
    fn test_nan_is_singular() {
        let mut m = SystemMatrix::new(1);
        m.add(0, 0, f64::NAN);
        assert!(m.factor().is_err());
    }
}
