use std::ops::Index;
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::trace;

use crate::error::CircuitError;
use crate::model::{Gate, NodeId};
use crate::HashMap;

static NEXT_CIRCUIT: AtomicU32 = AtomicU32::new(0);

/// Append-only arena of gates, apart from [`truncate`](Self::truncate).
///
/// A gate may only read nodes that are already allocated, so every edge
/// points to a lower index and the graph cannot contain a cycle.
pub struct CircuitBuilder {
    id: u32,
    nodes: Vec<Gate>,
    names: HashMap<String, NodeId>,
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitBuilder {
    pub fn new() -> Self {
        Self {
            id: NEXT_CIRCUIT.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
            names: HashMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn push(&mut self, gate: Gate) -> Result<NodeId, CircuitError> {
        for operand in gate.operands() {
            check(self.id, self.nodes.len(), operand)?;
        }
        let id = NodeId {
            circuit: self.id,
            index: self.nodes.len() as u32,
        };
        trace!(circuit = self.id, index = id.index, ?gate, "push");
        self.nodes.push(gate);
        Ok(id)
    }

    pub fn signal(&mut self, value: bool) -> Result<NodeId, CircuitError> {
        self.push(Gate::Signal(value))
    }

    pub fn named_signal(&mut self, name: &str, value: bool) -> Result<NodeId, CircuitError> {
        if self.names.contains_key(name) {
            return Err(CircuitError::DuplicateName { name: name.into() });
        }
        let id = self.signal(value)?;
        self.name(name, id)?;
        Ok(id)
    }

    /// Attaches a lookup name to an existing node.
    pub fn name(&mut self, name: &str, node: NodeId) -> Result<(), CircuitError> {
        check(self.id, self.nodes.len(), node)?;
        if self.names.contains_key(name) {
            return Err(CircuitError::DuplicateName { name: name.into() });
        }
        self.names.insert(name.into(), node);
        Ok(())
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Drops every node allocated at or after `len`, together with the
    /// names that point to them. Handles to dropped nodes must not be kept,
    /// as their slots are handed out again.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.nodes.len() {
            return;
        }
        trace!(circuit = self.id, from = self.nodes.len(), to = len, "truncate");
        self.nodes.truncate(len);
        self.names.retain(|_, node| node.index() < len);
    }

    pub fn and(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, CircuitError> {
        self.push(Gate::And(a, b))
    }

    pub fn or(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, CircuitError> {
        self.push(Gate::Or(a, b))
    }

    pub fn xor(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, CircuitError> {
        self.push(Gate::Xor(a, b))
    }

    pub fn not(&mut self, a: NodeId) -> Result<NodeId, CircuitError> {
        self.push(Gate::Not(a))
    }

    /// Freezes the arena. Handles issued so far stay valid for the result.
    pub fn finish(self) -> Circuit {
        Circuit {
            id: self.id,
            nodes: self.nodes,
            names: self.names,
        }
    }
}

fn check(circuit: u32, len: usize, node: NodeId) -> Result<(), CircuitError> {
    if node.circuit != circuit {
        Err(CircuitError::ForeignNode { node, circuit })
    } else if node.index() >= len {
        Err(CircuitError::ForwardReference { node, len })
    } else {
        Ok(())
    }
}

/// A finished, immutable gate graph.
#[derive(Debug)]
pub struct Circuit {
    id: u32,
    nodes: Vec<Gate>,
    names: HashMap<String, NodeId>,
}

impl Circuit {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        check(self.id, self.nodes.len(), node).is_ok()
    }

    pub(crate) fn validate(&self, node: NodeId) -> Result<(), CircuitError> {
        check(self.id, self.nodes.len(), node)
    }
}

impl Index<NodeId> for Circuit {
    type Output = Gate;

    /// Panics if `node` was issued by another builder.
    fn index(&self, node: NodeId) -> &Self::Output {
        assert_eq!(
            node.circuit, self.id,
            "node {:?} used with circuit {}",
            node, self.id
        );
        &self.nodes[node.index()]
    }
}
