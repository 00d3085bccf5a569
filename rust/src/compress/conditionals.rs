use super::statement_list_mut;
use super::RuleContext;
use crate::ast::Node;
use crate::ast::Syntax;
use crate::error::InvariantError;
use crate::operator::OperatorName;

// A statement that's just an expression, possibly wrapped in blocks.
fn single_expression(stmt: &Node) -> Option<&Node> {
    match stmt.stx() {
        Syntax::ExpressionStmt { expression } => Some(expression),
        Syntax::BlockStmt { body } if body.len() == 1 => single_expression(&body[0]),
        _ => None,
    }
}

fn take_single_expression(stmt: &mut Node) -> Option<Node> {
    match stmt.stx_mut() {
        Syntax::ExpressionStmt { expression } => Some(expression.take()),
        Syntax::BlockStmt { body } if body.len() == 1 => take_single_expression(&mut body[0]),
        _ => None,
    }
}

fn single_return(stmt: &Node) -> Option<&Node> {
    match stmt.stx() {
        Syntax::ReturnStmt { value: Some(value) } => Some(value),
        Syntax::BlockStmt { body } if body.len() == 1 => single_return(&body[0]),
        _ => None,
    }
}

fn take_single_return(stmt: &mut Node) -> Option<Node> {
    match stmt.stx_mut() {
        Syntax::ReturnStmt { value: Some(value) } => Some(value.take()),
        Syntax::BlockStmt { body } if body.len() == 1 => take_single_return(&mut body[0]),
        _ => None,
    }
}

fn is_empty(stmt: &Node) -> bool {
    match stmt.stx() {
        Syntax::EmptyStmt {} => true,
        Syntax::BlockStmt { body } => body.iter().all(is_empty),
        _ => false,
    }
}

// Given `!a`, returns `a` and true; otherwise the node unchanged and false.
fn split_negation(mut n: Node) -> (Node, bool) {
    match n.stx_mut() {
        Syntax::UnaryExpr {
            operator: OperatorName::LogicalNot,
            argument,
        } => (argument.take(), true),
        _ => (n, false),
    }
}

fn binary(operator: OperatorName, left: Node, right: Node) -> Node {
    let loc = left.loc() + right.loc();
    Node::new(loc, Syntax::BinaryExpr {
        operator,
        left,
        right,
    })
}

// `if (a) b` and `if (!a) b` with only the consequent: `a && b`, `a || b`.
fn guard(test: Node, consequent: Node, run_if_truthy: bool) -> Node {
    let (test, negated) = split_negation(test);
    let operator = if run_if_truthy != negated {
        OperatorName::LogicalAnd
    } else {
        OperatorName::LogicalOr
    };
    binary(operator, test, consequent)
}

fn conditional(test: Node, consequent: Node, alternate: Node) -> Node {
    let loc = test.loc() + alternate.loc();
    let (test, negated) = split_negation(test);
    let (consequent, alternate) = if negated {
        (alternate, consequent)
    } else {
        (consequent, alternate)
    };
    Node::new(loc, Syntax::ConditionalExpr {
        test,
        consequent,
        alternate,
    })
}

// `if` statements whose branches are only expressions become expressions:
// - `if (a) b; else c` => `a ? b : c`
// - `if (a) b` => `a && b`
// - `if (a); else b` => `a || b`
// - `if (a);` => `a`
pub fn maybe_if_to_expression(
    n: &mut Node,
    _ctx: &RuleContext,
) -> Result<Option<Node>, InvariantError> {
    let Syntax::IfStmt {
        test,
        consequent,
        alternate,
    } = n.stx_mut()
    else {
        return Ok(None);
    };
    if alternate.as_ref().map_or(false, is_empty) {
        *alternate = None;
        return Ok(Some(n.take()));
    };
    let expression = match alternate {
        None if is_empty(consequent) => test.take(),
        None => match take_single_expression(consequent) {
            Some(cons) => guard(test.take(), cons, true),
            None => return Ok(None),
        },
        Some(alt) if is_empty(consequent) => match take_single_expression(alt) {
            Some(alt) => guard(test.take(), alt, false),
            None => return Ok(None),
        },
        Some(alt) => {
            if single_expression(consequent).is_none() || single_expression(alt).is_none() {
                return Ok(None);
            };
            match (take_single_expression(consequent), take_single_expression(alt)) {
                (Some(cons), Some(alt)) => conditional(test.take(), cons, alt),
                _ => return Err(n.invariant("if branches changed shape")),
            }
        }
    };
    Ok(Some(n.derive(Syntax::ExpressionStmt { expression })))
}

fn return_of(value: Node) -> Node {
    let loc = value.loc().clone();
    Node::new(loc, Syntax::ReturnStmt { value: Some(value) })
}

// `if (a) return b; else return c` and `if (a) return b; return c` both become
// `return a ? b : c`.
pub fn maybe_return_conditional(
    n: &mut Node,
    _ctx: &RuleContext,
) -> Result<Option<Node>, InvariantError> {
    if let Syntax::IfStmt {
        test,
        consequent,
        alternate: Some(alternate),
    } = n.stx_mut()
    {
        if single_return(consequent).is_none() || single_return(alternate).is_none() {
            return Ok(None);
        };
        return match (take_single_return(consequent), take_single_return(alternate)) {
            (Some(cons), Some(alt)) => Ok(Some(return_of(conditional(test.take(), cons, alt)))),
            _ => Err(n.invariant("return branches changed shape")),
        };
    };

    let Some(body) = statement_list_mut(n.stx_mut()) else {
        return Ok(None);
    };
    let Some(i) = body.windows(2).position(|w| {
        matches!(w[0].stx(), Syntax::IfStmt { consequent, alternate: None, .. } if single_return(consequent).is_some())
            && matches!(w[1].stx(), Syntax::ReturnStmt { value: Some(_) })
    }) else {
        return Ok(None);
    };
    let mut next = body.remove(i + 1);
    let merged = {
        let Syntax::IfStmt {
            test, consequent, ..
        } = body[i].stx_mut()
        else {
            return Err(next.invariant("expected if statement before return"));
        };
        let Syntax::ReturnStmt { value: Some(alt) } = next.stx_mut() else {
            return Err(next.invariant("expected return statement"));
        };
        match take_single_return(consequent) {
            Some(cons) => return_of(conditional(test.take(), cons, alt.take())),
            None => return Err(next.invariant("expected return in consequent")),
        }
    };
    body[i] = merged;
    Ok(Some(n.take()))
}
