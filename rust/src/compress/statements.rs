use std::mem;

use super::literal_truthiness;
use super::statement_list_mut;
use super::RuleContext;
use crate::ast::ForStmtHeader;
use crate::ast::ForThreeInit;
use crate::ast::Node;
use crate::ast::Syntax;
use crate::error::InvariantError;

// Whether a block's own statements declare names scoped to the block.
fn has_block_scoped_declaration(body: &[Node]) -> bool {
    body.iter()
        .any(|s| s.stx().is_lexical_decl() || matches!(s.stx(), Syntax::FunctionDecl { .. }))
}

fn is_flattenable(stmt: &Node) -> bool {
    match stmt.stx() {
        Syntax::EmptyStmt {} => true,
        Syntax::BlockStmt { body } => !has_block_scoped_declaration(body),
        _ => false,
    }
}

// Nested blocks without their own declarations are spliced into the enclosing list, and empty
// statements are removed.
pub fn maybe_flatten_blocks(
    n: &mut Node,
    _ctx: &RuleContext,
) -> Result<Option<Node>, InvariantError> {
    let Some(body) = statement_list_mut(n.stx_mut()) else {
        return Ok(None);
    };
    if !body.iter().any(is_flattenable) {
        return Ok(None);
    };
    let mut flat = Vec::with_capacity(body.len());
    for stmt in mem::take(body) {
        if !is_flattenable(&stmt) {
            flat.push(stmt);
        } else if let Syntax::BlockStmt { body: inner } = stmt.into_stx() {
            flat.extend(inner);
        };
    }
    *body = flat;
    Ok(Some(n.take()))
}

// Whether `else` after this statement would attach to an `if` inside it.
fn ends_with_open_if(stmt: &Node) -> bool {
    match stmt.stx() {
        Syntax::IfStmt {
            alternate: None, ..
        } => true,
        Syntax::IfStmt {
            alternate: Some(alternate),
            ..
        } => ends_with_open_if(alternate),
        Syntax::WhileStmt { body, .. }
        | Syntax::ForStmt { body, .. }
        | Syntax::WithStmt { body, .. }
        | Syntax::LabelStmt {
            statement: body, ..
        } => ends_with_open_if(body),
        _ => false,
    }
}

// Given a block in a single statement position, returns its only statement if that statement can
// stand there alone.
fn unwrappable(block: &Node, before_else: bool) -> bool {
    let Syntax::BlockStmt { body } = block.stx() else {
        return false;
    };
    body.len() == 1
        && !has_block_scoped_declaration(body)
        && !(before_else && ends_with_open_if(&body[0]))
}

fn unwrap(block: &mut Node) -> () {
    if let Syntax::BlockStmt { body } = block.stx_mut() {
        if let Some(stmt) = body.pop() {
            *block = stmt;
        };
    };
}

// `if (a) { b() }` => `if (a) b()`, and likewise for loop, label and `with` bodies. Function bodies
// are never touched, as their braces are required.
pub fn maybe_unwrap_single_statement_block(
    n: &mut Node,
    _ctx: &RuleContext,
) -> Result<Option<Node>, InvariantError> {
    let mut changed = false;
    match n.stx_mut() {
        Syntax::IfStmt {
            consequent,
            alternate,
            ..
        } => {
            if unwrappable(consequent, alternate.is_some()) {
                unwrap(consequent);
                changed = true;
            };
            if let Some(alternate) = alternate {
                if unwrappable(alternate, false) {
                    unwrap(alternate);
                    changed = true;
                };
            };
        }
        Syntax::WhileStmt { body, .. }
        | Syntax::DoWhileStmt { body, .. }
        | Syntax::ForStmt { body, .. }
        | Syntax::WithStmt { body, .. }
        | Syntax::LabelStmt {
            statement: body, ..
        } => {
            if unwrappable(body, false) {
                unwrap(body);
                changed = true;
            };
        }
        _ => {}
    };
    Ok(if changed { Some(n.take()) } else { None })
}

fn var_mode(stmt: &Node) -> Option<crate::ast::VarDeclMode> {
    match stmt.stx() {
        Syntax::VarStmt { declaration } => match declaration.stx() {
            Syntax::VarDecl { mode, .. } => Some(*mode),
            _ => None,
        },
        _ => None,
    }
}

// `var a = 1; var b = 2` => `var a = 1, b = 2`.
pub fn maybe_join_vars(n: &mut Node, _ctx: &RuleContext) -> Result<Option<Node>, InvariantError> {
    let Some(body) = statement_list_mut(n.stx_mut()) else {
        return Ok(None);
    };
    if !body
        .windows(2)
        .any(|w| var_mode(&w[0]).is_some() && var_mode(&w[0]) == var_mode(&w[1]))
    {
        return Ok(None);
    };
    let mut joined: Vec<Node> = Vec::with_capacity(body.len());
    for stmt in mem::take(body) {
        let mode = var_mode(&stmt);
        let prev = joined.last_mut().filter(|p| mode.is_some() && var_mode(p) == mode);
        let Some(prev) = prev else {
            joined.push(stmt);
            continue;
        };
        let (Syntax::VarStmt { declaration: prev_decl }, Syntax::VarStmt { declaration }) =
            (prev.stx_mut(), stmt.into_stx())
        else {
            return Err(InvariantError::new("expected variable statements"));
        };
        match (prev_decl.stx_mut(), declaration.into_stx()) {
            (
                Syntax::VarDecl {
                    declarators: into, ..
                },
                Syntax::VarDecl { declarators, .. },
            ) => into.extend(declarators),
            _ => return Err(InvariantError::new("expected variable declarations")),
        };
    }
    *body = joined;
    Ok(Some(n.take()))
}

// `while (1)` and `for (; true;)` => `for (;;)`.
pub fn maybe_loop_forever(
    n: &mut Node,
    _ctx: &RuleContext,
) -> Result<Option<Node>, InvariantError> {
    match n.stx_mut() {
        Syntax::WhileStmt { condition, body } if literal_truthiness(condition) == Some(true) => {
            let body = body.take();
            Ok(Some(n.derive(Syntax::ForStmt {
                header: ForStmtHeader::Three {
                    init: ForThreeInit::None,
                    condition: None,
                    post: None,
                },
                body,
            })))
        }
        Syntax::ForStmt {
            header: ForStmtHeader::Three {
                condition: condition @ Some(_),
                ..
            },
            ..
        } if condition.as_ref().and_then(literal_truthiness) == Some(true) => {
            *condition = None;
            Ok(Some(n.take()))
        }
        _ => Ok(None),
    }
}
