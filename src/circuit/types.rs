//! Core types for circuit representation.

use std::fmt;

/// Name of the reference node.
pub const GROUND_NAME: &str = "0";

/// Suffix appended to an element id to name its branch-current node.
pub const BRANCH_SUFFIX: &str = "#branch";

/// A unique identifier for a node in the circuit.
/// Node 0 is always ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The ground node (always index 0).
    pub const GROUND: NodeId = NodeId(0);

    /// Check if this is the ground node.
    pub fn is_ground(&self) -> bool {
        self.0 == 0
    }

    /// Row/column of this node in the reduced system matrix.
    /// Returns None for ground, which is never an unknown.
    pub fn unknown_index(&self) -> Option<usize> {
        if self.is_ground() {
            None
        } else {
            Some(self.0 - 1)
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ground() {
            write!(f, "GND")
        } else {
            write!(f, "N{}", self.0)
        }
    }
}

/// Whether a node carries a voltage or a voltage source's branch current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A physical circuit node.
    Voltage,
    /// An auxiliary branch-current unknown.
    BranchCurrent,
}

impl NodeKind {
    /// Classify a node by its name.
    pub fn of(name: &str) -> Self {
        if name.ends_with(BRANCH_SUFFIX) {
            NodeKind::BranchCurrent
        } else {
            NodeKind::Voltage
        }
    }
}

/// Name of the branch-current node owned by the element `id`.
pub fn branch_node_name(id: &str) -> String {
    format!("{id}{BRANCH_SUFFIX}")
}
