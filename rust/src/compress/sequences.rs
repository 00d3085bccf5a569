use std::mem;

use super::is_pure;
use super::statement_list_mut;
use super::RuleContext;
use crate::ast::ForStmtHeader;
use crate::ast::ForThreeInit;
use crate::ast::Node;
use crate::ast::Syntax;
use crate::error::InvariantError;

/// Joins two expressions with a comma, flattening existing sequences.
pub fn sequence(left: Node, right: Node) -> Node {
    let loc = left.loc() + right.loc();
    let mut elements = Vec::new();
    for n in [left, right] {
        if !matches!(n.stx(), Syntax::SequenceExpr { .. }) {
            elements.push(n);
        } else if let Syntax::SequenceExpr { elements: inner } = n.into_stx() {
            elements.extend(inner);
        };
    }
    Node::new(loc, Syntax::SequenceExpr { elements })
}

// Whether a statement can take a preceding expression statement into one of its own expressions.
fn absorbs(stmt: &Node) -> bool {
    match stmt.stx() {
        Syntax::ExpressionStmt { .. }
        | Syntax::ReturnStmt { value: Some(_) }
        | Syntax::ThrowStmt { .. }
        | Syntax::IfStmt { .. }
        | Syntax::SwitchStmt { .. } => true,
        Syntax::ForStmt {
            header: ForStmtHeader::Three { init, .. },
            ..
        } => !matches!(init, ForThreeInit::Declaration(_)),
        _ => false,
    }
}

fn prepend(expression: Node, stmt: &mut Node) -> Result<(), InvariantError> {
    let slot = match stmt.stx_mut() {
        Syntax::ExpressionStmt { expression } => expression,
        Syntax::ReturnStmt { value: Some(value) } => value,
        Syntax::ThrowStmt { value } => value,
        Syntax::IfStmt { test, .. } => test,
        Syntax::SwitchStmt { test, .. } => test,
        Syntax::ForStmt {
            header: ForStmtHeader::Three { init, .. },
            ..
        } => match init {
            ForThreeInit::None => {
                *init = ForThreeInit::Expression(expression);
                return Ok(());
            }
            ForThreeInit::Expression(init) => init,
            ForThreeInit::Declaration(_) => {
                return Err(stmt.invariant("cannot prepend to a declaration"));
            }
        },
        _ => return Err(stmt.invariant("statement cannot absorb an expression")),
    };
    let existing = slot.take();
    *slot = sequence(expression, existing);
    Ok(())
}

// `a(); b(); return c` becomes `return a(), b(), c`. Consecutive expression statements are joined
// with commas, and so is one that precedes a statement starting with an expression.
pub fn maybe_join_sequences(
    n: &mut Node,
    _ctx: &RuleContext,
) -> Result<Option<Node>, InvariantError> {
    let Some(body) = statement_list_mut(n.stx_mut()) else {
        return Ok(None);
    };
    if !body
        .windows(2)
        .any(|w| matches!(w[0].stx(), Syntax::ExpressionStmt { .. }) && absorbs(&w[1]))
    {
        return Ok(None);
    };
    let mut joined: Vec<Node> = Vec::with_capacity(body.len());
    for mut stmt in mem::take(body) {
        let follows_expression =
            matches!(joined.last().map(|s| s.stx()), Some(Syntax::ExpressionStmt { .. }));
        if follows_expression && absorbs(&stmt) {
            let Some(prev) = joined.pop() else {
                return Err(stmt.invariant("missing previous statement"));
            };
            let Syntax::ExpressionStmt { expression } = prev.into_stx() else {
                return Err(stmt.invariant("previous statement is not an expression"));
            };
            prepend(expression, &mut stmt)?;
        };
        joined.push(stmt);
    }
    *body = joined;
    Ok(Some(n.take()))
}

fn binds_this_when_called(n: &Node) -> bool {
    match n.stx() {
        Syntax::MemberExpr { .. } | Syntax::ComputedMemberExpr { .. } => true,
        Syntax::IdentifierExpr { name } => name.as_str() == "eval",
        _ => false,
    }
}

// Drops parts of an expression whose value is unused and whose evaluation can't be observed.
pub fn maybe_drop_side_effect_free(
    n: &mut Node,
    _ctx: &RuleContext,
) -> Result<Option<Node>, InvariantError> {
    match n.stx_mut() {
        Syntax::SequenceExpr { elements } => {
            let Some(last) = elements.len().checked_sub(1) else {
                return Ok(None);
            };
            if !elements[..last].iter().any(is_pure) {
                return Ok(None);
            };
            // `(0, a.b)()` calls without `a` as `this`, and `(0, eval)(c)` is an indirect eval, so
            // a lone value like that keeps one element in front of it.
            let keep_prefix =
                elements[..last].iter().all(is_pure) && binds_this_when_called(&elements[last]);
            if keep_prefix && last == 1 {
                return Ok(None);
            };
            let mut kept: Vec<Node> = mem::take(elements)
                .into_iter()
                .enumerate()
                .filter(|(i, e)| *i == last || (keep_prefix && *i == 0) || !is_pure(e))
                .map(|(_, e)| e)
                .collect();
            if kept.len() == 1 {
                return Ok(kept.pop());
            };
            *elements = kept;
            Ok(Some(n.take()))
        }
        Syntax::ExpressionStmt { expression } => {
            if is_pure(expression) {
                return Ok(Some(n.derive(Syntax::EmptyStmt {})));
            };
            // The value of the last element is unused too.
            let Syntax::SequenceExpr { elements } = expression.stx_mut() else {
                return Ok(None);
            };
            if !elements.last().map_or(false, is_pure) {
                return Ok(None);
            };
            elements.retain(|e| !is_pure(e));
            match elements.pop() {
                Some(only) if elements.is_empty() => {
                    Ok(Some(n.derive(Syntax::ExpressionStmt { expression: only })))
                }
                Some(last) => {
                    elements.push(last);
                    Ok(Some(n.take()))
                }
                None => Ok(Some(n.derive(Syntax::EmptyStmt {}))),
            }
        }
        _ => Ok(None),
    }
}
