//! Simulation results.

use std::collections::HashMap;

use super::probe::ResolvedProbe;
use crate::circuit::NodeId;

/// Read a node out of a solution vector; ground reads 0.
pub fn solution_value(solution: &[f64], node: NodeId) -> f64 {
    node.unknown_index().map_or(0.0, |idx| solution[idx])
}

/// Result of a DC operating point.
///
/// Ground is never an unknown and has no entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DcResult {
    /// Solved value of every non-ground node.
    pub values: HashMap<String, f64>,
    /// Non-ground node names in index order, for stable printing.
    pub node_names: Vec<String>,
}

impl DcResult {
    /// Build from the unknowns' names and their solved values.
    pub fn new(node_names: &[String], values: &[f64]) -> Self {
        debug_assert_eq!(node_names.len(), values.len());
        Self {
            values: node_names
                .iter()
                .cloned()
                .zip(values.iter().copied())
                .collect(),
            node_names: node_names.to_vec(),
        }
    }

    /// Value of a node by name.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }
}

/// Result of a transient run.
///
/// Row `k` holds the state at `time[k]`; row 0 is the operating point.
/// Rows are solution vectors: entry `i` belongs to node `i + 1`, and
/// ground is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct TransientResult {
    pub time: Vec<f64>,
    pub solutions: Vec<Vec<f64>>,
    pub probes: Vec<ResolvedProbe>,
    /// Names of the unknowns, parallel to each row.
    pub node_names: Vec<String>,
}

impl TransientResult {
    /// Create an empty result with room for `steps` rows.
    pub fn new(node_names: &[String], probes: Vec<ResolvedProbe>, steps: usize) -> Self {
        Self {
            time: Vec::with_capacity(steps),
            solutions: Vec::with_capacity(steps),
            probes,
            node_names: node_names.to_vec(),
        }
    }

    /// Append one solution row.
    pub fn push(&mut self, time: f64, solution: &[f64]) {
        debug_assert_eq!(solution.len(), self.node_names.len());
        self.time.push(time);
        self.solutions.push(solution.to_vec());
    }

    /// Number of recorded rows.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Value of a node at a recorded step.
    pub fn value(&self, step: usize, name: &str) -> Option<f64> {
        let idx = self.node_names.iter().position(|n| n == name)?;
        self.solutions.get(step).map(|row| row[idx])
    }

    /// Whole waveform of a node.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.node_names.iter().position(|n| n == name)?;
        Some(self.solutions.iter().map(|row| row[idx]).collect())
    }

    /// Whole waveform of a resolved probe, looked up by label.
    pub fn probe_column(&self, label: &str) -> Option<Vec<f64>> {
        let probe = self.probes.iter().find(|p| p.label == label)?;
        Some(
            self.solutions
                .iter()
                .map(|row| solution_value(row, probe.node))
                .collect(),
        )
    }
}

/// Outcome of running one environment variant.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationResult {
    OperatingPoint(DcResult),
    Transient(TransientResult),
}

impl SimulationResult {
    pub fn as_dc(&self) -> Option<&DcResult> {
        match self {
            SimulationResult::OperatingPoint(dc) => Some(dc),
            SimulationResult::Transient(_) => None,
        }
    }

    pub fn as_transient(&self) -> Option<&TransientResult> {
        match self {
            SimulationResult::Transient(tran) => Some(tran),
            SimulationResult::OperatingPoint(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_ground_probe_reads_zero() {
        let probes = vec![
            ResolvedProbe {
                label: "V(0)".to_string(),
                node: NodeId::GROUND,
            },
            ResolvedProbe {
                label: "V(b)".to_string(),
                node: NodeId(2),
            },
        ];
        let mut tran = TransientResult::new(&names(&["a", "b"]), probes, 1);
        tran.push(0.0, &[1.0, 2.0]);

        assert_eq!(tran.probe_column("V(0)"), Some(vec![0.0]));
        assert_eq!(tran.probe_column("V(b)"), Some(vec![2.0]));
        assert_eq!(tran.value(0, "a"), Some(1.0));
        assert_eq!(tran.value(0, "0"), None);
    }
}
