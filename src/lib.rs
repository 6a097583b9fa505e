pub mod adder;
pub mod ast;
mod circuit;
mod error;
mod interp;
mod lowering;
pub mod model;
mod parse;
pub mod ripple;

pub use rustc_hash::FxHashMap as HashMap;

pub use adder::{FullAdder, HalfAdder};
pub use circuit::{Circuit, CircuitBuilder};
pub use error::CircuitError;
pub use interp::calc;
pub use lowering::lower;
pub use model::{Gate, NodeId};
pub use parse::arith::command as parse;
pub use parse::{Command, Op};
pub use ripple::{Complement, RippleCarryAdder, RippleCarrySubtractor};

/// Builds a fresh circuit for `command` and renders its result MSB first.
///
/// An overflowing sum renders as `OVERFLOW`. A borrowing difference is an
/// error, since there is no value to report.
pub fn run(command: Command, complement: Complement) -> Result<String, CircuitError> {
    let mut builder = CircuitBuilder::new();
    let a = ripple::byte(&mut builder, command.lhs)?;
    let b = ripple::byte(&mut builder, command.rhs)?;
    match command.op {
        Op::Add => {
            let adder = RippleCarryAdder::new(&mut builder, a, b)?;
            Ok(adder.render(&builder.finish()))
        }
        Op::Sub => {
            let sub = RippleCarrySubtractor::new(&mut builder, a, b, complement)?;
            let circuit = builder.finish();
            sub.difference(&circuit)?;
            Ok(sub.render(&circuit))
        }
    }
}

#[cfg(test)]
mod test {
    use anyhow::Result;

    use crate::*;

    #[test]
    fn test_run() -> Result<()> {
        assert_eq!(run(parse("00000001 + 00000001")?, Complement::Twos)?, "00000010");
        assert_eq!(run(parse("200 + 100")?, Complement::Twos)?, "OVERFLOW");
        assert_eq!(run(parse("00000100 - 00000001")?, Complement::Twos)?, "00000011");
        assert_eq!(run(parse("00000100 - 00000001")?, Complement::Ones)?, "00000010");
        Ok(())
    }

    #[test]
    fn test_underflow() -> Result<()> {
        let command = parse("00000001 - 00000100")?;
        assert_eq!(run(command, Complement::Twos), Err(CircuitError::Underflow));
        assert_eq!(run(command, Complement::Ones), Err(CircuitError::Underflow));
        Ok(())
    }

    #[test]
    fn test_half_adder_in_definitions() -> Result<()> {
        let mut defs = ast::Definitions::default();
        let (a, b) = (defs.reference("a"), defs.reference("b"));
        defs.define("a", ast::Expr::Const(true));
        defs.define("b", ast::Expr::Const(true));

        let mut builder = CircuitBuilder::new();
        let nodes = lower(&defs, &mut builder)?;
        let (a, b) = match (a, b) {
            (ast::Expr::Ref(a), ast::Expr::Ref(b)) => (nodes[&a], nodes[&b]),
            _ => unreachable!(),
        };
        let adder = HalfAdder::new(&mut builder, a, b)?;
        let circuit = builder.finish();

        assert!(!adder.sum(&circuit));
        assert!(adder.carry(&circuit));
        Ok(())
    }
}
