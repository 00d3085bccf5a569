use super::is_literal_primitive;
use super::RuleContext;
use crate::ast::Node;
use crate::ast::Syntax;
use crate::error::InvariantError;
use crate::operator::OperatorName;

/// Whether `n` always evaluates to `undefined` without side effects.
pub fn is_undefined(n: &Node, ctx: &RuleContext) -> bool {
    match n.stx() {
        Syntax::LiteralUndefined {} => true,
        Syntax::IdentifierExpr { name } => !ctx.undefined_is_bound && name.as_str() == "undefined",
        Syntax::UnaryExpr {
            operator: OperatorName::Void,
            argument,
        } => is_literal_primitive(argument),
        _ => false,
    }
}

// `yield undefined` and `yield void 0` are both `yield`. A delegating yield needs its operand, as
// `yield*` iterates it.
pub fn maybe_drop_yield_undefined(
    n: &mut Node,
    ctx: &RuleContext,
) -> Result<Option<Node>, InvariantError> {
    let Syntax::YieldExpr {
        delegate: false,
        argument: Some(argument),
    } = n.stx()
    else {
        return Ok(None);
    };
    if !is_undefined(argument, ctx) {
        return Ok(None);
    };
    Ok(Some(n.derive(Syntax::YieldExpr {
        delegate: false,
        argument: None,
    })))
}

// `undefined` and `void <literal>` become the canonical `void 0`.
pub fn maybe_undefined_to_void(
    n: &mut Node,
    ctx: &RuleContext,
) -> Result<Option<Node>, InvariantError> {
    match n.stx() {
        Syntax::IdentifierExpr { .. } | Syntax::UnaryExpr { .. } if is_undefined(n, ctx) => {
            Ok(Some(n.derive(Syntax::LiteralUndefined {})))
        }
        _ => Ok(None),
    }
}
