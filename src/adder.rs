use tracing::trace;

use crate::circuit::{Circuit, CircuitBuilder};
use crate::error::CircuitError;
use crate::model::NodeId;

/// Adds two bits: `sum = a ^ b`, `carry = a & b`.
#[derive(Copy, Clone, Debug)]
pub struct HalfAdder {
    pub sum: NodeId,
    pub carry: NodeId,
}

impl HalfAdder {
    pub fn new(builder: &mut CircuitBuilder, a: NodeId, b: NodeId) -> Result<Self, CircuitError> {
        let sum = builder.xor(a, b)?;
        let carry = builder.and(a, b)?;
        trace!(?a, ?b, "half adder");
        Ok(Self { sum, carry })
    }

    pub fn sum(&self, circuit: &Circuit) -> bool {
        circuit.evaluate(self.sum)
    }

    pub fn carry(&self, circuit: &Circuit) -> bool {
        circuit.evaluate(self.carry)
    }
}

/// Adds two bits and an incoming carry using two chained half adders.
///
/// `first` adds the operands, `second` adds the carry-in to `first`'s sum,
/// and the carry-out is the OR of both partial carries.
#[derive(Copy, Clone, Debug)]
pub struct FullAdder {
    pub first: HalfAdder,
    pub second: HalfAdder,
    pub carry: NodeId,
}

impl FullAdder {
    pub fn new(
        builder: &mut CircuitBuilder,
        carry_in: NodeId,
        a: NodeId,
        b: NodeId,
    ) -> Result<Self, CircuitError> {
        let first = HalfAdder::new(builder, a, b)?;
        let second = HalfAdder::new(builder, first.sum, carry_in)?;
        let carry = builder.or(first.carry, second.carry)?;
        Ok(Self {
            first,
            second,
            carry,
        })
    }

    pub fn sum_node(&self) -> NodeId {
        self.second.sum
    }

    pub fn sum(&self, circuit: &Circuit) -> bool {
        circuit.evaluate(self.second.sum)
    }

    pub fn carry(&self, circuit: &Circuit) -> bool {
        circuit.evaluate(self.carry)
    }
}
