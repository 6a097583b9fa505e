use thiserror::Error;

use crate::model::NodeId;

/// Failures while building or reading out a circuit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CircuitError {
    /// The handle was issued by a different builder
    #[error("node {node:?} does not belong to circuit {circuit}")]
    ForeignNode { node: NodeId, circuit: u32 },

    /// The operand has not been allocated yet, so using it would create a back-edge
    #[error("node {node:?} is not allocated yet (circuit has {len} nodes)")]
    ForwardReference { node: NodeId, len: usize },

    #[error("redefinition of {name}")]
    DuplicateName { name: String },

    #[error("undefined: {name}")]
    Undefined { name: String },

    /// A definition depends on itself; `path` lists the names along the loop
    #[error("cyclic definition: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },

    #[error("OVERFLOW")]
    Overflow,

    #[error("UNDERFLOW")]
    Underflow,
}
