//! # Spicelet Core
//!
//! A small SPICE-style circuit simulator.
//!
//! This library provides:
//! - A netlist reader for SPICE-style circuit descriptions
//! - Modified Nodal Analysis (MNA) based DC operating point and transient analysis
//! - Linear elements (R, C), independent voltage sources (DC, pulse, PWL, sine)
//!   and voltage-controlled current sources
//! - `.alter` variants that run the same analysis on edited copies of a circuit
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`netlist`] - Reader for the netlist format
//! - [`circuit`] - Node registry, element store and stamp assembly
//! - [`elements`] - Element models and their stamps
//! - [`solver`] - System matrix, LU solving and the analysis engine
//! - [`session`] - Variant queue produced by the reader
//! - `report` - Table/CSV rendering (CLI only)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! spicelet rc.cir --format csv > rc.csv
//! ```
//!
//! ### Library
//!
//! ```
//! use spicelet_core::Session;
//!
//! let mut session = Session::from_netlist("V1 a 0 5\nR1 a 0 1k\n").unwrap();
//! let result = session.run_variant(0).unwrap();
//! assert_eq!(result.as_dc().unwrap().value("a"), Some(5.0));
//! ```
//!
//! ## Circuit Simulation Method
//!
//! Each element contributes a local stamp in its own terminal order, and
//! the environment scatters the stamps into one dense system:
//!
//! 1. Assemble the system matrix A and source vector z
//! 2. Solve Ax = z for node voltages and branch currents
//! 3. Feed the solution back to the elements so they can update their state
//!
//! Capacitors are discretized with backward Euler on a fixed time grid.

pub mod circuit;
pub mod elements;
pub mod error;
pub mod netlist;
pub mod session;
pub mod solver;

#[cfg(feature = "cli")]
pub mod report;

// Re-export main types for convenience
pub use circuit::Environment;
pub use elements::Element;
pub use error::{ErrorKind, Result, SpiceletError};
pub use session::Session;
pub use solver::{Engine, SimulationOptions, SimulationResult};
