use std::mem;

use itertools::Itertools;

use super::has_hoisted_declaration;
use super::literal_truthiness;
use super::statement_list_mut;
use super::RuleContext;
use crate::ast::Node;
use crate::ast::Syntax;
use crate::ast::VarDeclMode;
use crate::ast::VariableDeclarator;
use crate::error::InvariantError;
use crate::source::SourceRange;
use crate::visit::children;

pub fn maybe_drop_debugger(
    n: &mut Node,
    _ctx: &RuleContext,
) -> Result<Option<Node>, InvariantError> {
    match n.stx() {
        Syntax::DebuggerStmt {} => Ok(Some(n.derive(Syntax::EmptyStmt {}))),
        _ => Ok(None),
    }
}

fn is_jump(stmt: &Node) -> bool {
    matches!(
        stmt.stx(),
        Syntax::ReturnStmt { .. }
            | Syntax::ThrowStmt { .. }
            | Syntax::BreakStmt { .. }
            | Syntax::ContinueStmt { .. }
    )
}

// Names declared by `var` anywhere in `n`, outside nested functions.
fn collect_var_names(n: &Node, out: &mut Vec<SourceRange>) -> () {
    match n.stx() {
        Syntax::FunctionDecl { .. }
        | Syntax::FunctionExpr { .. }
        | Syntax::ArrowFunctionExpr { .. }
        | Syntax::ClassDecl { .. }
        | Syntax::ClassExpr { .. } => {}
        Syntax::VarDecl {
            mode: VarDeclMode::Var,
            declarators,
        } => {
            for decl in declarators {
                collect_pattern_names(&decl.pattern, out);
            }
        }
        _ => {
            for c in children(n.stx()) {
                collect_var_names(c, out);
            }
        }
    };
}

fn collect_pattern_names(n: &Node, out: &mut Vec<SourceRange>) -> () {
    match n.stx() {
        Syntax::IdentifierPattern { name } => out.push(name.clone()),
        // Default values and computed keys are expressions, not bindings.
        Syntax::ArrayPattern { elements, rest } => {
            for elem in elements.iter().flatten() {
                collect_pattern_names(&elem.target, out);
            }
            if let Some(rest) = rest {
                collect_pattern_names(rest, out);
            };
        }
        Syntax::ObjectPattern { properties, rest } => {
            for prop in properties {
                if let Syntax::ObjectPatternProperty { target, .. } = prop.stx() {
                    collect_pattern_names(target, out);
                };
            }
            if let Some(rest) = rest {
                collect_pattern_names(rest, out);
            };
        }
        _ => {}
    };
}

// A statement after an unreachable point that still matters: hoisted functions, block-scoped
// declarations (whose names shadow outer ones), and `var` declarations without initialisers.
fn survives_unreachable(stmt: &Node) -> bool {
    match stmt.stx() {
        Syntax::FunctionDecl { .. } | Syntax::ClassDecl { .. } => true,
        Syntax::VarStmt { declaration } => match declaration.stx() {
            Syntax::VarDecl {
                mode: VarDeclMode::Var,
                declarators,
            } => declarators.iter().all(|d| {
                d.initializer.is_none() && matches!(d.pattern.stx(), Syntax::IdentifierPattern { .. })
            }),
            Syntax::VarDecl { .. } => true,
            _ => false,
        },
        _ => false,
    }
}

// Statements after a `return`, `throw`, `break` or `continue` in the same list never run. Hoisted
// declarations among them are kept, without their initialisers.
pub fn maybe_drop_unreachable(
    n: &mut Node,
    _ctx: &RuleContext,
) -> Result<Option<Node>, InvariantError> {
    let Some(body) = statement_list_mut(n.stx_mut()) else {
        return Ok(None);
    };
    let Some(jump) = body.iter().position(is_jump) else {
        return Ok(None);
    };
    if body[jump + 1..].iter().all(survives_unreachable) {
        return Ok(None);
    };
    let mut stmts = mem::take(body);
    let unreachable = stmts.split_off(jump + 1);
    let mut hoisted_vars = Vec::new();
    let mut kept = Vec::new();
    for stmt in unreachable {
        if survives_unreachable(&stmt) {
            kept.push(stmt);
        } else {
            collect_var_names(&stmt, &mut hoisted_vars);
        };
    }
    if !hoisted_vars.is_empty() {
        let loc = stmts[jump].loc().clone();
        let declarators = hoisted_vars
            .into_iter()
            .unique()
            .map(|name| VariableDeclarator {
                pattern: Node::new(loc.clone(), Syntax::IdentifierPattern { name }),
                initializer: None,
            })
            .collect();
        stmts.push(Node::new(loc.clone(), Syntax::VarStmt {
            declaration: Node::new(loc, Syntax::VarDecl {
                mode: VarDeclMode::Var,
                declarators,
            }),
        }));
    };
    stmts.extend(kept);
    *body = stmts;
    Ok(Some(n.take()))
}

// `if (true) a; else b` is `a`, and `false ? a : b` is `b`, as long as the dropped branch doesn't
// declare anything hoisted.
pub fn maybe_drop_constant_branch(
    n: &mut Node,
    _ctx: &RuleContext,
) -> Result<Option<Node>, InvariantError> {
    match n.stx_mut() {
        Syntax::IfStmt {
            test,
            consequent,
            alternate,
        } => {
            let Some(truthy) = literal_truthiness(test) else {
                return Ok(None);
            };
            if truthy {
                if alternate.as_ref().map_or(false, has_hoisted_declaration) {
                    return Ok(None);
                };
                Ok(Some(consequent.take()))
            } else {
                if has_hoisted_declaration(consequent) {
                    return Ok(None);
                };
                match alternate {
                    Some(alternate) => Ok(Some(alternate.take())),
                    None => Ok(Some(n.derive(Syntax::EmptyStmt {}))),
                }
            }
        }
        Syntax::ConditionalExpr {
            test,
            consequent,
            alternate,
        } => match literal_truthiness(test) {
            Some(true) => Ok(Some(consequent.take())),
            Some(false) => Ok(Some(alternate.take())),
            None => Ok(None),
        },
        _ => Ok(None),
    }
}
