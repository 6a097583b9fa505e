/// Handle to a node in one circuit's arena.
///
/// `circuit` tags the builder that allocated the node, `index` is the slot in
/// its arena. Handles are only created by [`CircuitBuilder`](crate::CircuitBuilder).
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct NodeId {
    pub(crate) circuit: u32,
    pub(crate) index: u32,
}

impl NodeId {
    pub fn index(self) -> usize {
        self.index as usize
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Gate {
    /// Constant input, the base case of evaluation
    Signal(bool),
    And(NodeId, NodeId),
    Or(NodeId, NodeId),
    Xor(NodeId, NodeId),
    Not(NodeId),
}

impl Gate {
    pub fn operands(&self) -> impl Iterator<Item = NodeId> {
        let (a, b) = match *self {
            Gate::Signal(_) => (None, None),
            Gate::And(a, b) | Gate::Or(a, b) | Gate::Xor(a, b) => (Some(a), Some(b)),
            Gate::Not(a) => (Some(a), None),
        };
        a.into_iter().chain(b)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum BinaryOp {
    And,
    Or,
    Xor,
}
