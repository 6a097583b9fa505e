use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::ast::{Definition, Definitions, Expr, Ident, Strings};
use crate::circuit::CircuitBuilder;
use crate::error::CircuitError;
use crate::model::{BinaryOp, Gate, NodeId};
use crate::HashMap;

#[derive(Copy, Clone, Eq, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

/// Allocates every definition in `builder`, dependencies first, and names
/// each resulting node after its definition.
///
/// Undefined names, cycles and redefinitions are found before anything is
/// allocated. On any error the builder is left as it was.
pub fn lower(defs: &Definitions, builder: &mut CircuitBuilder) -> Result<HashMap<Ident, NodeId>> {
    let ctx = &defs.strings;
    let mut map = HashMap::default();
    for Definition { name, expr } in &defs.items {
        if map.insert(*name, expr).is_some() || builder.has_name(&ctx[*name]) {
            bail!(CircuitError::DuplicateName {
                name: ctx[*name].into()
            })
        }
    }

    let order = order(ctx, &defs.items, &map)?;

    let start = builder.len();
    let mut nodes = HashMap::default();
    for name in order {
        let node = lower_expr(map[&name], &nodes, builder)
            .and_then(|node| {
                builder.name(&ctx[name], node)?;
                Ok(node)
            })
            .with_context(|| format!("in definition of {}", &ctx[name]));
        match node {
            Ok(node) => {
                nodes.insert(name, node);
            }
            Err(err) => {
                builder.truncate(start);
                return Err(err);
            }
        }
    }
    debug!(definitions = nodes.len(), nodes = builder.len() - start, "lowered");

    Ok(nodes)
}

/// Orders definitions so that each comes after everything it references.
fn order(
    ctx: &Strings,
    items: &[Definition],
    defs: &HashMap<Ident, &Expr>,
) -> Result<Vec<Ident>> {
    let mut marks: HashMap<Ident, Mark> = HashMap::default();
    let mut order = Vec::with_capacity(items.len());
    for def in items {
        if marks.contains_key(&def.name) {
            continue;
        }
        visit(ctx, def.name, defs, &mut marks, &mut order)
            .with_context(|| format!("in definition of {}", &ctx[def.name]))?;
    }
    Ok(order)
}

/// Depth-first walk over references with an explicit stack of
/// `(definition, its references, next reference)` frames.
fn visit(
    ctx: &Strings,
    root: Ident,
    defs: &HashMap<Ident, &Expr>,
    marks: &mut HashMap<Ident, Mark>,
    order: &mut Vec<Ident>,
) -> Result<()> {
    marks.insert(root, Mark::Visiting);
    let mut stack = vec![(root, references(defs[&root]), 0)];
    while let Some((name, refs, next)) = stack.last_mut() {
        let name = *name;
        let dep = refs.get(*next).copied();
        *next += 1;
        let Some(dep) = dep else {
            marks.insert(name, Mark::Done);
            order.push(name);
            stack.pop();
            continue;
        };
        match marks.get(&dep) {
            Some(Mark::Done) => {}
            Some(Mark::Visiting) => {
                let start = stack.iter().position(|(n, _, _)| *n == dep).unwrap_or(0);
                let path = stack[start..]
                    .iter()
                    .map(|(n, _, _)| *n)
                    .chain([dep])
                    .map(|n| ctx[n].to_string())
                    .collect();
                bail!(CircuitError::Cycle { path })
            }
            None => {
                let expr = *defs.get(&dep).ok_or_else(|| CircuitError::Undefined {
                    name: ctx[dep].into(),
                })?;
                marks.insert(dep, Mark::Visiting);
                stack.push((dep, references(expr), 0));
            }
        }
    }
    Ok(())
}

/// Names referenced by `expr`, in evaluation order.
fn references(expr: &Expr) -> Vec<Ident> {
    let mut refs = Vec::new();
    let mut pending = vec![expr];
    while let Some(expr) = pending.pop() {
        match expr {
            Expr::Const(_) => {}
            Expr::Ref(name) => refs.push(*name),
            Expr::Calc(a, b, _) => {
                pending.push(b);
                pending.push(a);
            }
            Expr::Not(a) => pending.push(a),
        }
    }
    refs
}

enum Step<'e> {
    Visit(&'e Expr),
    Build(&'e Expr),
}

/// Allocates `expr` post-order. Every reference must already be in `nodes`.
fn lower_expr(
    expr: &Expr,
    nodes: &HashMap<Ident, NodeId>,
    builder: &mut CircuitBuilder,
) -> Result<NodeId> {
    let mut steps = vec![Step::Visit(expr)];
    let mut values = Vec::new();
    while let Some(step) = steps.pop() {
        match step {
            Step::Visit(expr) => match expr {
                Expr::Const(value) => values.push(builder.signal(*value)?),
                Expr::Ref(name) => values.push(nodes[name]),
                Expr::Calc(a, b, _) => {
                    steps.push(Step::Build(expr));
                    steps.push(Step::Visit(b));
                    steps.push(Step::Visit(a));
                }
                Expr::Not(a) => {
                    steps.push(Step::Build(expr));
                    steps.push(Step::Visit(a));
                }
            },
            Step::Build(expr) => {
                let node = match expr {
                    Expr::Not(_) => {
                        let Some(a) = values.pop() else { unreachable!() };
                        builder.not(a)?
                    }
                    Expr::Calc(_, _, op) => {
                        let (Some(b), Some(a)) = (values.pop(), values.pop()) else {
                            unreachable!()
                        };
                        builder.push(match op {
                            BinaryOp::And => Gate::And(a, b),
                            BinaryOp::Or => Gate::Or(a, b),
                            BinaryOp::Xor => Gate::Xor(a, b),
                        })?
                    }
                    Expr::Const(_) | Expr::Ref(_) => unreachable!(),
                };
                values.push(node);
            }
        }
    }
    let Some(node) = values.pop() else { unreachable!() };
    Ok(node)
}
