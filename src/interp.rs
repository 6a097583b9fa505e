use crate::circuit::Circuit;
use crate::error::CircuitError;
use crate::model::{BinaryOp, Gate, NodeId};
use crate::HashMap;

impl Circuit {
    /// Evaluates `node` by pulling its operands on demand.
    ///
    /// Operands are resolved with an explicit work stack, so the depth of the
    /// graph is not limited by the call stack. Values are memoised for the
    /// duration of one call only: a shared sub-graph is computed once per
    /// call, and the next call walks the graph again.
    ///
    /// Panics if `node` was issued by another builder.
    pub fn evaluate(&self, node: NodeId) -> bool {
        let mut values: HashMap<NodeId, bool> = HashMap::default();
        let mut stack = vec![node];
        while let Some(&top) = stack.last() {
            if values.contains_key(&top) {
                stack.pop();
                continue;
            }
            let gate = self[top];
            let pending = stack.len();
            stack.extend(gate.operands().filter(|operand| !values.contains_key(operand)));
            if stack.len() > pending {
                continue;
            }
            stack.pop();
            let value = match gate {
                Gate::Signal(value) => value,
                Gate::And(a, b) => calc(values[&a], values[&b], BinaryOp::And),
                Gate::Or(a, b) => calc(values[&a], values[&b], BinaryOp::Or),
                Gate::Xor(a, b) => calc(values[&a], values[&b], BinaryOp::Xor),
                Gate::Not(a) => !values[&a],
            };
            values.insert(top, value);
        }
        values[&node]
    }

    pub fn try_evaluate(&self, node: NodeId) -> Result<bool, CircuitError> {
        self.validate(node)?;
        Ok(self.evaluate(node))
    }
}

pub fn calc(left: bool, right: bool, op: BinaryOp) -> bool {
    match op {
        BinaryOp::And => left && right,
        BinaryOp::Or => left || right,
        BinaryOp::Xor => left != right,
    }
}
