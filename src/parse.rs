#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Op {
    Add,
    Sub,
}

/// `lhs op rhs` on two unsigned bytes.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Command {
    pub lhs: u8,
    pub op: Op,
    pub rhs: u8,
}

peg::parser! { pub grammar arith() for str {

    rule _() = quiet!{[' ' | '\t']*}

    pub rule command() -> Command = _ lhs:operand() op:op() rhs:operand() {
        Command { lhs, op, rhs }
    }

    rule op() -> Op =
        "+" _ {Op::Add} /
        "-" _ {Op::Sub}

    // 8-digit literals are binary, so decimals may not have leading zeros
    rule operand() -> u8 = quiet!{num:(prefixed() / byte() / decimal()) _ {num}} / expected!("operand")

    rule prefixed() -> u8 = "0b" num: $(['0' | '1']*<1,8>) !['0'..='9'] {?
        u8::from_str_radix(num, 2).or(Err("binary literal"))
    }

    rule byte() -> u8 = num: $(['0' | '1']*<8>) !['0'..='9'] {?
        u8::from_str_radix(num, 2).or(Err("binary literal"))
    }

    rule decimal() -> u8 = num: $("0" / ['1'..='9']['0'..='9']*) !['0'..='9'] {?
        num.parse().or(Err("integer literal in 0..=255"))
    }
}}
