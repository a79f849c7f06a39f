//! Linear passive elements: Resistor, Capacitor.

use num_complex::Complex64;

use super::stamp::{AcStamp, Stamp};
use crate::circuit::NodeValues;

/// A resistor element.
#[derive(Debug, Clone)]
pub struct Resistor {
    pub id: String,
    pub nodes: [String; 2], // [positive, negative]
    pub resistance: f64,
}

impl Resistor {
    /// Create a new resistor.
    pub fn new(id: String, nodes: [String; 2], resistance: f64) -> Self {
        Self {
            id,
            nodes,
            resistance,
        }
    }

    /// Get the conductance (1/R).
    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }

    /// Conductance stamp, shared by every analysis.
    pub fn stamp(&self) -> Stamp {
        let mut stamp = Stamp::zeros(2);
        stamp.stamp_admittance(0, 1, self.conductance());
        stamp
    }

    /// Frequency-domain stamp (purely real admittance).
    pub fn stamp_ac(&self) -> AcStamp {
        let mut stamp = Stamp::zeros(2);
        stamp.stamp_admittance(0, 1, Complex64::from(self.conductance()));
        stamp
    }
}

/// A capacitor element.
///
/// In transient analysis the capacitor is replaced by its backward Euler
/// companion model: a conductance `G = C/h` in parallel with a history
/// current source `G * v_prev`, where `v_prev` is the voltage across the
/// capacitor at the last accepted time point.
#[derive(Debug, Clone)]
pub struct Capacitor {
    pub id: String,
    pub nodes: [String; 2],
    pub capacitance: f64,

    /// Voltage across the capacitor at the last accepted step
    pub v_prev: f64,
}

impl Capacitor {
    /// Create a new, uncharged capacitor.
    pub fn new(id: String, nodes: [String; 2], capacitance: f64) -> Self {
        Self {
            id,
            nodes,
            capacitance,
            v_prev: 0.0,
        }
    }

    /// Companion conductance for a step of size `h`.
    pub fn conductance(&self, h: f64) -> f64 {
        self.capacitance / h
    }

    /// History current injected into the positive terminal.
    pub fn history_current(&self, h: f64) -> f64 {
        self.conductance(h) * self.v_prev
    }

    /// An open circuit at DC.
    pub fn stamp_dc(&self) -> Stamp {
        Stamp::zeros(2)
    }

    /// Admittance `jωC`.
    pub fn stamp_ac(&self, omega: f64) -> AcStamp {
        let mut stamp = Stamp::zeros(2);
        stamp.stamp_admittance(0, 1, Complex64::new(0.0, omega * self.capacitance));
        stamp
    }

    /// Backward Euler companion stamp.
    pub fn stamp_trans(&self, h: f64) -> Stamp {
        let mut stamp = Stamp::zeros(2);
        stamp.stamp_admittance(0, 1, self.conductance(h));
        let i_hist = self.history_current(h);
        stamp.add_rhs(0, i_hist);
        stamp.add_rhs(1, -i_hist);
        stamp
    }

    /// Sample the voltage across the capacitor after a solve.
    pub fn update_state(&mut self, values: &NodeValues<'_>) {
        self.v_prev = values.get(&self.nodes[0]) - values.get(&self.nodes[1]);
    }
}
