//! Eight-bit ripple-carry arithmetic.
//!
//! Operands are `[NodeId; WIDTH]` indexed by bit position: index 0 is the
//! least significant bit, index 7 the most significant. Every textual
//! rendering is MSB first.

use tracing::debug;

use crate::adder::{FullAdder, HalfAdder};
use crate::circuit::{Circuit, CircuitBuilder};
use crate::error::CircuitError;
use crate::model::NodeId;

pub const WIDTH: usize = 8;

pub type Bits = [NodeId; WIDTH];

/// One bit position of a ripple chain.
#[derive(Copy, Clone, Debug)]
pub enum Stage {
    Half(HalfAdder),
    Full(FullAdder),
}

impl Stage {
    pub fn sum(&self) -> NodeId {
        match self {
            Stage::Half(adder) => adder.sum,
            Stage::Full(adder) => adder.sum_node(),
        }
    }

    pub fn carry(&self) -> NodeId {
        match self {
            Stage::Half(adder) => adder.carry,
            Stage::Full(adder) => adder.carry,
        }
    }
}

/// Builds the carry chain. Without `carry_in`, bit 0 is a half adder.
fn chain(
    builder: &mut CircuitBuilder,
    carry_in: Option<NodeId>,
    a: &Bits,
    b: &Bits,
) -> Result<[Stage; WIDTH], CircuitError> {
    let first = match carry_in {
        Some(carry) => Stage::Full(FullAdder::new(builder, carry, a[0], b[0])?),
        None => Stage::Half(HalfAdder::new(builder, a[0], b[0])?),
    };
    let mut stages = [first; WIDTH];
    for i in 1..WIDTH {
        let carry = stages[i - 1].carry();
        stages[i] = Stage::Full(FullAdder::new(builder, carry, a[i], b[i])?);
    }
    Ok(stages)
}

fn evaluate_bits(circuit: &Circuit, stages: &[Stage; WIDTH]) -> [bool; WIDTH] {
    let mut bits = [false; WIDTH];
    for (bit, stage) in bits.iter_mut().zip(stages) {
        *bit = circuit.evaluate(stage.sum());
    }
    bits
}

/// Unsigned 8-bit adder. `overflow` is the carry out of bit 7.
#[derive(Copy, Clone, Debug)]
pub struct RippleCarryAdder {
    pub stages: [Stage; WIDTH],
}

impl RippleCarryAdder {
    pub fn new(builder: &mut CircuitBuilder, a: Bits, b: Bits) -> Result<Self, CircuitError> {
        let stages = chain(builder, None, &a, &b)?;
        debug!(nodes = builder.len(), "built ripple carry adder");
        Ok(Self { stages })
    }

    /// Bit `i` of the sum, or `None` past the most significant bit.
    pub fn sum_bit(&self, circuit: &Circuit, i: usize) -> Option<bool> {
        self.stages.get(i).map(|stage| circuit.evaluate(stage.sum()))
    }

    /// Not a valid result when [`overflow`](Self::overflow) is set.
    pub fn sum_bits(&self, circuit: &Circuit) -> [bool; WIDTH] {
        evaluate_bits(circuit, &self.stages)
    }

    pub fn overflow(&self, circuit: &Circuit) -> bool {
        circuit.evaluate(self.stages[WIDTH - 1].carry())
    }

    pub fn value(&self, circuit: &Circuit) -> Result<u8, CircuitError> {
        if self.overflow(circuit) {
            return Err(CircuitError::Overflow);
        }
        Ok(bits_to_u8(&self.sum_bits(circuit)))
    }

    pub fn render(&self, circuit: &Circuit) -> String {
        match self.value(circuit) {
            Ok(_) => render_bits(&self.sum_bits(circuit)),
            Err(err) => err.to_string(),
        }
    }
}

/// How the subtractor turns `a + !b` into a difference.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum Complement {
    /// Bit 0 gets a constant carry-in of 1, so the result is exactly `a - b`.
    #[default]
    Twos,
    /// Bit 0 is a plain half adder. The result is `a - b - 1` and equal
    /// operands also report a borrow.
    Ones,
}

/// Unsigned 8-bit subtractor built from the adder chain over inverted `b`.
#[derive(Copy, Clone, Debug)]
pub struct RippleCarrySubtractor {
    pub complement: Complement,
    pub inverted: Bits,
    pub stages: [Stage; WIDTH],
    pub borrow: NodeId,
}

impl RippleCarrySubtractor {
    pub fn new(
        builder: &mut CircuitBuilder,
        a: Bits,
        b: Bits,
        complement: Complement,
    ) -> Result<Self, CircuitError> {
        let mut inverted = b;
        for bit in inverted.iter_mut() {
            *bit = builder.not(*bit)?;
        }
        let carry_in = match complement {
            Complement::Twos => Some(builder.signal(true)?),
            Complement::Ones => None,
        };
        let stages = chain(builder, carry_in, &a, &inverted)?;
        let borrow = builder.not(stages[WIDTH - 1].carry())?;
        debug!(?complement, nodes = builder.len(), "built ripple carry subtractor");
        Ok(Self {
            complement,
            inverted,
            stages,
            borrow,
        })
    }

    /// Bit `i` of the difference, or `None` past the most significant bit.
    pub fn diff_bit(&self, circuit: &Circuit, i: usize) -> Option<bool> {
        self.stages.get(i).map(|stage| circuit.evaluate(stage.sum()))
    }

    /// Not a valid result when [`borrow`](Self::borrow) is set.
    pub fn diff_bits(&self, circuit: &Circuit) -> [bool; WIDTH] {
        evaluate_bits(circuit, &self.stages)
    }

    /// Set when the subtrahend exceeds the minuend.
    pub fn borrow(&self, circuit: &Circuit) -> bool {
        circuit.evaluate(self.borrow)
    }

    pub fn difference(&self, circuit: &Circuit) -> Result<u8, CircuitError> {
        if self.borrow(circuit) {
            return Err(CircuitError::Underflow);
        }
        Ok(bits_to_u8(&self.diff_bits(circuit)))
    }

    pub fn render(&self, circuit: &Circuit) -> String {
        match self.difference(circuit) {
            Ok(_) => render_bits(&self.diff_bits(circuit)),
            Err(err) => err.to_string(),
        }
    }
}

/// Allocates eight constant signals holding `value`.
pub fn byte(builder: &mut CircuitBuilder, value: u8) -> Result<Bits, CircuitError> {
    let mut bits = [builder.signal(value & 1 == 1)?; WIDTH];
    for (i, bit) in bits.iter_mut().enumerate().skip(1) {
        *bit = builder.signal((value >> i) & 1 == 1)?;
    }
    Ok(bits)
}

pub fn bits_to_u8(bits: &[bool; WIDTH]) -> u8 {
    bits.iter()
        .rev()
        .fold(0, |acc, &bit| (acc << 1) | bit as u8)
}

pub fn render_bits(bits: &[bool; WIDTH]) -> String {
    bits.iter()
        .rev()
        .map(|&bit| if bit { '1' } else { '0' })
        .collect()
}

#[cfg(test)]
mod test {
    use anyhow::Result;

    use super::*;

    fn add(a: u8, b: u8) -> Result<(Circuit, RippleCarryAdder)> {
        let mut builder = CircuitBuilder::new();
        let a = byte(&mut builder, a)?;
        let b = byte(&mut builder, b)?;
        let adder = RippleCarryAdder::new(&mut builder, a, b)?;
        Ok((builder.finish(), adder))
    }

    fn subtract(a: u8, b: u8, complement: Complement) -> Result<(Circuit, RippleCarrySubtractor)> {
        let mut builder = CircuitBuilder::new();
        let a = byte(&mut builder, a)?;
        let b = byte(&mut builder, b)?;
        let sub = RippleCarrySubtractor::new(&mut builder, a, b, complement)?;
        Ok((builder.finish(), sub))
    }

    #[test]
    fn one_plus_one() -> Result<()> {
        let (circuit, adder) = add(0b0000_0001, 0b0000_0001)?;
        assert!(!adder.overflow(&circuit));
        assert_eq!(adder.render(&circuit), "00000010");
        assert_eq!(adder.value(&circuit), Ok(2));
        assert_eq!(adder.sum_bit(&circuit, 1), Some(true));
        assert_eq!(adder.sum_bit(&circuit, 0), Some(false));
        assert_eq!(adder.sum_bit(&circuit, WIDTH), None);
        Ok(())
    }

    #[test]
    fn zero_plus_zero() -> Result<()> {
        let (circuit, adder) = add(0, 0)?;
        assert!(!adder.overflow(&circuit));
        assert_eq!(adder.sum_bits(&circuit), [false; WIDTH]);
        assert_eq!(adder.render(&circuit), "00000000");
        Ok(())
    }

    #[test]
    fn overflow_hides_sum() -> Result<()> {
        let (circuit, adder) = add(0b1111_1111, 0b1111_1111)?;
        assert!(adder.overflow(&circuit));
        assert_eq!(adder.value(&circuit), Err(CircuitError::Overflow));
        assert_eq!(adder.render(&circuit), "OVERFLOW");
        Ok(())
    }

    #[test]
    fn gate_operands() -> Result<()> {
        // 00000001 + 00000001 where some bits are themselves gate outputs
        let mut builder = CircuitBuilder::new();
        let one = builder.signal(true)?;
        let zero = builder.signal(false)?;
        let and = builder.and(zero, one)?;
        let or = builder.or(zero, zero)?;
        let xor = builder.xor(zero, one)?;
        let a = [one, zero, zero, zero, zero, zero, zero, and];
        let b = [xor, zero, zero, zero, zero, zero, or, zero];
        let adder = RippleCarryAdder::new(&mut builder, a, b)?;
        let circuit = builder.finish();
        assert_eq!(adder.render(&circuit), "00000010");
        Ok(())
    }

    #[test]
    fn twos_complement_difference() -> Result<()> {
        let (circuit, sub) = subtract(0b0000_0100, 0b0000_0001, Complement::Twos)?;
        assert!(!sub.borrow(&circuit));
        assert_eq!(sub.render(&circuit), "00000011");
        assert_eq!(sub.difference(&circuit), Ok(3));
        assert_eq!(sub.diff_bit(&circuit, 7), Some(false));
        assert_eq!(sub.diff_bit(&circuit, 8), None);

        let (circuit, sub) = subtract(9, 9, Complement::Twos)?;
        assert!(!sub.borrow(&circuit));
        assert_eq!(sub.difference(&circuit), Ok(0));
        Ok(())
    }

    #[test]
    fn ones_complement_is_one_short() -> Result<()> {
        let (circuit, sub) = subtract(0b0000_0100, 0b0000_0001, Complement::Ones)?;
        assert!(!sub.borrow(&circuit));
        assert_eq!(sub.render(&circuit), "00000010");

        let (circuit, sub) = subtract(9, 9, Complement::Ones)?;
        assert!(sub.borrow(&circuit));
        Ok(())
    }

    #[test]
    fn borrow_when_subtrahend_larger() -> Result<()> {
        for complement in [Complement::Twos, Complement::Ones] {
            let (circuit, sub) = subtract(0b0000_0001, 0b0000_0100, complement)?;
            assert!(sub.borrow(&circuit), "{complement:?}");
            assert_eq!(sub.difference(&circuit), Err(CircuitError::Underflow));
            assert_eq!(sub.render(&circuit), "UNDERFLOW");
        }
        Ok(())
    }

    #[test]
    fn repeated_queries_agree() -> Result<()> {
        let (circuit, adder) = add(0b1010_1010, 0b0001_0001)?;
        let first = adder.sum_bits(&circuit);
        for _ in 0..4 {
            assert_eq!(adder.sum_bits(&circuit), first);
            assert!(!adder.overflow(&circuit));
        }
        Ok(())
    }

    #[test]
    fn bit_helpers() {
        let bits = [true, false, true, false, false, false, false, true];
        assert_eq!(bits_to_u8(&bits), 0b1000_0101);
        assert_eq!(render_bits(&bits), "10000101");
    }
}
