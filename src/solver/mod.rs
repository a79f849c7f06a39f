//! MNA (Modified Nodal Analysis) solver.
//!
//! This module provides the numerical engine for circuit simulation.
//!
//! ## Modified Nodal Analysis
//!
//! MNA assembles a system of equations Ax = z where:
//! - x contains node voltages and branch currents
//! - A is the conductance/coefficient matrix
//! - z is the source vector
//!
//! The matrix structure is:
//! ```text
//! [ G   B ] [ v ]   [ i ]
//! [ C   D ] [ j ] = [ e ]
//! ```
//!
//! where:
//! - G is the conductance matrix (node equations)
//! - B, C connect voltage sources to their branch-current unknowns
//! - D is 0 for ideal voltage sources
//! - v is the vector of node voltages
//! - j is the vector of voltage source currents
//! - i is the sum of current sources into each node
//! - e is the vector of voltage source values
//!
//! Ground is node 0 and is removed from the system, so row `k` of A is the
//! equation of node `k + 1`.
//!
//! ## Transient analysis
//!
//! Time is advanced on a fixed grid with backward Euler. Each step solves a
//! purely resistive companion circuit in which every capacitor is a
//! conductance plus a history current, and every time-varying source is
//! evaluated at the last accepted time point.

mod engine;
mod mna;
mod options;
mod probe;
mod results;

pub use engine::{Engine, EngineState};
pub use mna::{SingularPivot, SystemMatrix, PIVOT_TOLERANCE};
pub use options::{Analysis, Mode, SimulationOptions};
pub use probe::{resolve_probes, ProbeRequest, ResolvedProbe};
pub use results::{solution_value, DcResult, SimulationResult, TransientResult};
