//! Local stamp matrices.
//!
//! A stamp is the contribution one element makes to the system of
//! equations, expressed in the element's own terminal order. For an element
//! with `n` terminals the stamp is `n × (n + 1)`: one row per terminal
//! equation, one column per terminal unknown, and a trailing right-hand-side
//! column. Mapping terminals to global matrix rows is the environment's job.

use std::ops::{AddAssign, Neg};

use num_complex::Complex64;

/// Scalar types a stamp can carry (real for DC/transient, complex for AC).
pub trait StampValue: Copy + Default + AddAssign + Neg<Output = Self> + From<f64> {}

impl<T> StampValue for T where T: Copy + Default + AddAssign + Neg<Output = T> + From<f64> {}

/// A dense local stamp with an augmented right-hand-side column.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamp<T = f64> {
    terminals: usize,
    data: Vec<T>,
}

/// Stamp used for frequency-domain analysis.
pub type AcStamp = Stamp<Complex64>;

impl<T: StampValue> Stamp<T> {
    /// Create an all-zero stamp for an element with `terminals` terminals.
    pub fn zeros(terminals: usize) -> Self {
        Self {
            terminals,
            data: vec![T::default(); terminals * (terminals + 1)],
        }
    }

    /// Number of terminals (rows).
    pub fn terminals(&self) -> usize {
        self.terminals
    }

    /// Column index of the right-hand side.
    pub fn rhs_column(&self) -> usize {
        self.terminals
    }

    /// Get the entry at (row, col); `col == rhs_column()` reads the RHS.
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * (self.terminals + 1) + col]
    }

    /// Add to the entry at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: T) {
        self.data[row * (self.terminals + 1) + col] += value;
    }

    /// Get the right-hand side of a row.
    pub fn rhs(&self, row: usize) -> T {
        self.get(row, self.terminals)
    }

    /// Add to the right-hand side of a row.
    pub fn add_rhs(&mut self, row: usize, value: T) {
        self.add(row, self.terminals, value);
    }

    /// Stamp an admittance `y` between terminals `a` and `b`.
    pub fn stamp_admittance(&mut self, a: usize, b: usize, y: T) {
        self.add(a, a, y);
        self.add(b, b, y);
        self.add(a, b, -y);
        self.add(b, a, -y);
    }

    /// Stamp an ideal voltage constraint `V[pos] - V[neg] = value` using the
    /// branch-current terminal `branch`.
    pub fn stamp_voltage_constraint(&mut self, pos: usize, neg: usize, branch: usize, value: T) {
        let one = T::from(1.0);
        // KCL: branch current leaves through pos, returns through neg
        self.add(pos, branch, one);
        self.add(neg, branch, -one);
        // KVL row
        self.add(branch, pos, one);
        self.add(branch, neg, -one);
        self.add_rhs(branch, value);
    }
}
