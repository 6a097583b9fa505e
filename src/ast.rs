//! Named gate definitions, assembled in memory before lowering.

use std::ops::Index;

pub use crate::model::BinaryOp;
use crate::HashMap;

#[derive(Default)]
pub struct Strings {
    pub ident_ids: HashMap<String, Ident>,
    pub idents: Vec<String>,
}

impl Strings {
    pub fn intern(&mut self, str: &str) -> Ident {
        if let Some(&id) = self.ident_ids.get(str) {
            id
        } else {
            let id = Ident(self.ident_ids.len() as u32);
            self.ident_ids.insert(str.into(), id);
            self.idents.push(str.into());
            id
        }
    }
}

impl Index<Ident> for Strings {
    type Output = str;

    fn index(&self, index: Ident) -> &Self::Output {
        &self.idents[index.0 as usize]
    }
}

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct Ident(pub u32);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Const(bool),
    Ref(Ident),
    Calc(Box<Expr>, Box<Expr>, BinaryOp),
    Not(Box<Expr>),
}

impl Expr {
    pub fn and(a: Expr, b: Expr) -> Self {
        Expr::Calc(Box::new(a), Box::new(b), BinaryOp::And)
    }

    pub fn or(a: Expr, b: Expr) -> Self {
        Expr::Calc(Box::new(a), Box::new(b), BinaryOp::Or)
    }

    pub fn xor(a: Expr, b: Expr) -> Self {
        Expr::Calc(Box::new(a), Box::new(b), BinaryOp::Xor)
    }

    pub fn not(a: Expr) -> Self {
        Expr::Not(Box::new(a))
    }
}

#[derive(Clone, Debug)]
pub struct Definition {
    pub name: Ident,
    pub expr: Expr,
}

/// `name := expr` bindings. Order does not matter; a definition may refer to
/// one declared later.
#[derive(Default)]
pub struct Definitions {
    pub strings: Strings,
    pub items: Vec<Definition>,
}

impl Definitions {
    pub fn ident(&mut self, name: &str) -> Ident {
        self.strings.intern(name)
    }

    pub fn reference(&mut self, name: &str) -> Expr {
        Expr::Ref(self.ident(name))
    }

    pub fn define(&mut self, name: &str, expr: Expr) -> Ident {
        let name = self.ident(name);
        self.items.push(Definition { name, expr });
        name
    }
}
