//! Circuit environment: node registry, element store and stamp assembler.

use std::collections::HashMap;

use super::types::{NodeId, NodeKind, GROUND_NAME};
use crate::elements::Element;
use crate::error::{Result, SpiceletError};
use crate::solver::SystemMatrix;

/// Which stamp each element contributes during assembly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StampKind {
    /// Operating point: capacitors open, sources at their initial level.
    Dc,
    /// One backward Euler step of the given size.
    Transient { step_size: f64 },
}

/// Read-only view of solved node values, keyed by node name.
pub struct NodeValues<'a> {
    node_map: &'a HashMap<String, NodeId>,
    values: &'a [f64],
}

impl NodeValues<'_> {
    /// Value of the named node; unknown names and ground read 0.
    pub fn get(&self, name: &str) -> f64 {
        self.node_map
            .get(name)
            .and_then(|id| self.values.get(id.0))
            .copied()
            .unwrap_or(0.0)
    }
}

/// A complete circuit ready for simulation.
///
/// Nodes get indices in first-seen order, with ground pinned at index 0.
/// Cloning yields a fully independent variant.
#[derive(Debug, Clone)]
pub struct Environment {
    node_map: HashMap<String, NodeId>,
    node_names: Vec<String>,
    /// Indexed by `NodeId`; entry 0 (ground) is always 0.
    node_values: Vec<f64>,
    elements: Vec<Element>,
    /// Global node of each terminal, per element
    element_nodes: Vec<Vec<NodeId>>,
    element_index: HashMap<String, usize>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create an environment containing only the ground node.
    pub fn new() -> Self {
        let mut node_map = HashMap::new();
        node_map.insert(GROUND_NAME.to_string(), NodeId::GROUND);
        Self {
            node_map,
            node_names: vec![GROUND_NAME.to_string()],
            node_values: vec![0.0],
            elements: Vec::new(),
            element_nodes: Vec::new(),
            element_index: HashMap::new(),
        }
    }

    fn get_or_create_node(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.node_map.get(name) {
            return id;
        }
        let id = NodeId(self.node_names.len());
        self.node_map.insert(name.to_string(), id);
        self.node_names.push(name.to_string());
        self.node_values.push(0.0);
        id
    }

    fn map_terminals(&mut self, element: &Element) -> Vec<NodeId> {
        element
            .terminals()
            .iter()
            .map(|name| self.get_or_create_node(name))
            .collect()
    }

    /// Add an element, assigning indices to any new node names.
    pub fn register(&mut self, element: Element) -> Result<()> {
        if self.element_index.contains_key(element.id()) {
            return Err(SpiceletError::DuplicateElement {
                id: element.id().to_string(),
            });
        }

        let nodes = self.map_terminals(&element);
        self.element_index
            .insert(element.id().to_string(), self.elements.len());
        self.element_nodes.push(nodes);
        self.elements.push(element);
        Ok(())
    }

    /// Swap in an element with an existing id, or register it if new.
    ///
    /// Nodes are never removed, so nodes only the old element touched stay
    /// in the system.
    pub fn replace(&mut self, element: Element) -> Result<()> {
        match self.element_index.get(element.id()).copied() {
            Some(idx) => {
                let nodes = self.map_terminals(&element);
                self.element_nodes[idx] = nodes;
                self.elements[idx] = element;
                Ok(())
            }
            None => self.register(element),
        }
    }

    /// Look up an element by id.
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.element_index.get(id).map(|&idx| &self.elements[idx])
    }

    /// Mutable access for parameter edits on a variant.
    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        let idx = *self.element_index.get(id)?;
        Some(&mut self.elements[idx])
    }

    /// Global nodes of an element's terminals, in stamp order.
    pub fn element_nodes(&self, id: &str) -> Option<&[NodeId]> {
        self.element_index
            .get(id)
            .map(|&idx| self.element_nodes[idx].as_slice())
    }

    /// All elements in registration order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Index of a node by name.
    pub fn node_index(&self, name: &str) -> Option<NodeId> {
        self.node_map.get(name).copied()
    }

    /// Node names in index order, ground first.
    pub fn node_names(&self) -> &[String] {
        &self.node_names
    }

    /// Last solved value of a node.
    pub fn node_value(&self, name: &str) -> Option<f64> {
        self.node_index(name).map(|id| self.node_values[id.0])
    }

    /// Number of unknowns (every node except ground).
    pub fn unknown_count(&self) -> usize {
        self.node_names.len() - 1
    }

    /// Assemble a fresh system matrix.
    pub fn assemble(&self, kind: StampKind, gmin: f64) -> SystemMatrix {
        let mut matrix = SystemMatrix::new(self.unknown_count());
        self.assemble_into(kind, gmin, &mut matrix);
        matrix
    }

    /// Clear `matrix` and scatter every element's stamp into it.
    ///
    /// `gmin` is added to the diagonal of every voltage node.
    pub fn assemble_into(&self, kind: StampKind, gmin: f64, matrix: &mut SystemMatrix) {
        debug_assert_eq!(matrix.size, self.unknown_count());
        matrix.clear();

        for (element, nodes) in self.elements.iter().zip(&self.element_nodes) {
            let stamp = match kind {
                StampKind::Dc => element.stamp_dc(),
                StampKind::Transient { step_size } => element.stamp_trans(step_size),
            };
            matrix.scatter(nodes, &stamp);
        }

        if gmin != 0.0 {
            for (idx, name) in self.node_names.iter().enumerate().skip(1) {
                if NodeKind::of(name) == NodeKind::Voltage {
                    matrix.add(idx - 1, idx - 1, gmin);
                }
            }
        }
    }

    /// Store a solution vector and advance element state to `time`.
    ///
    /// `solution[i]` is the value of node `i + 1`; ground stays at 0.
    pub fn apply_solution(&mut self, time: f64, solution: &[f64]) {
        debug_assert_eq!(solution.len(), self.unknown_count());
        self.node_values[0] = 0.0;
        self.node_values[1..].copy_from_slice(solution);

        let values = NodeValues {
            node_map: &self.node_map,
            values: &self.node_values,
        };
        for element in &mut self.elements {
            element.update_state(time, &values);
        }
    }

    /// Current node values as a vector indexed by `NodeId`.
    pub fn values(&self) -> &[f64] {
        &self.node_values
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn element(text: &str) -> Element {
        Element::from_text(text, 1).unwrap()
    }

    #[test]
    fn test_node_indices_follow_first_appearance() {
        let mut env = Environment::new();
        env.register(element("R1 b a 1k")).unwrap();
        env.register(element("V1 a 0 5")).unwrap();

        assert_eq!(env.node_index("0"), Some(NodeId::GROUND));
        assert_eq!(env.node_index("b"), Some(NodeId(1)));
        assert_eq!(env.node_index("a"), Some(NodeId(2)));
        assert_eq!(env.node_index("V1#branch"), Some(NodeId(3)));
        assert_eq!(env.unknown_count(), 3);
        assert_eq!(env.node_names(), &["0", "b", "a", "V1#branch"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut env = Environment::new();
        env.register(element("R1 a 0 1k")).unwrap();
        let err = env.register(element("R1 b 0 2k")).unwrap_err();
        assert!(matches!(err, SpiceletError::DuplicateElement { .. }));
    }

    #[test]
    fn test_parallel_stamps_accumulate() {
        let mut env = Environment::new();
        env.register(element("R1 a 0 1k")).unwrap();
        env.register(element("R2 a 0 1k")).unwrap();

        let m = env.assemble(StampKind::Dc, 0.0);
        assert_relative_eq!(m.get(0, 0), 2e-3);
    }

    #[test]
    fn test_gmin_skips_branch_nodes() {
        let mut env = Environment::new();
        env.register(element("V1 a 0 5")).unwrap();

        let m = env.assemble(StampKind::Dc, 1e-12);
        assert_relative_eq!(m.get(0, 0), 1e-12);
        assert_eq!(m.get(1, 1), 0.0);
    }

    #[test]
    fn test_apply_solution_updates_capacitor_state() {
        let mut env = Environment::new();
        env.register(element("C1 a b 1u")).unwrap();
        env.apply_solution(0.0, &[3.0, 1.0]);

        assert_eq!(env.node_value("0"), Some(0.0));
        assert_eq!(env.node_value("a"), Some(3.0));
        match env.element("C1") {
            Some(Element::Capacitor(c)) => assert_relative_eq!(c.v_prev, 2.0),
            other => panic!("unexpected element {other:?}"),
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let mut env = Environment::new();
        env.register(element("R1 a 0 1k")).unwrap();
        let mut variant = env.clone();

        if let Some(Element::Resistor(r)) = variant.element_mut("R1") {
            r.resistance = 2e3;
        }
        variant.register(element("R2 a b 1k")).unwrap();

        match env.element("R1") {
            Some(Element::Resistor(r)) => assert_eq!(r.resistance, 1e3),
            other => panic!("unexpected element {other:?}"),
        }
        assert_eq!(env.unknown_count(), 1);
        assert_eq!(variant.unknown_count(), 2);
    }

    #[test]
    fn test_replace_swaps_in_place() {
        let mut env = Environment::new();
        env.register(element("R1 a 0 1k")).unwrap();
        env.replace(element("R1 a 0 2k")).unwrap();
        assert_eq!(env.elements().len(), 1);

        let m = env.assemble(StampKind::Dc, 0.0);
        assert_relative_eq!(m.get(0, 0), 5e-4);
    }
}
