use super::RuleContext;
use crate::ast::Node;
use crate::ast::Syntax;
use crate::emit::emit_node;
use crate::emit::EmitOptions;
use crate::error::InvariantError;
use crate::num::JsNumber;
use crate::operator::OperatorName;

enum Constant {
    Number(f64),
    String(String),
    Boolean(bool),
}

fn number_value(n: &Node) -> Option<f64> {
    match n.stx() {
        Syntax::LiteralNumberExpr { value } => Some(value.0),
        Syntax::UnaryExpr {
            operator: OperatorName::UnaryNegation,
            argument,
        } => match argument.stx() {
            Syntax::LiteralNumberExpr { value } => Some(-value.0),
            _ => None,
        },
        _ => None,
    }
}

fn constant_value(n: &Node) -> Option<Constant> {
    match n.stx() {
        Syntax::LiteralStringExpr { value, raw: None } => Some(Constant::String(value.clone())),
        Syntax::LiteralBooleanExpr { value } => Some(Constant::Boolean(*value)),
        _ => number_value(n).map(Constant::Number),
    }
}

fn to_uint32(v: f64) -> u32 {
    if !v.is_finite() {
        return 0;
    };
    v.trunc().rem_euclid(4294967296.0) as u32
}

fn to_int32(v: f64) -> i32 {
    to_uint32(v) as i32
}

fn fold_numbers(operator: OperatorName, l: f64, r: f64) -> Option<Constant> {
    let num = match operator {
        OperatorName::Addition => l + r,
        OperatorName::Subtraction => l - r,
        OperatorName::Multiplication => l * r,
        OperatorName::Division => l / r,
        OperatorName::Remainder => l % r,
        OperatorName::Exponentiation => {
            // Only exact results, as engines don't agree on the last bit of an inexact power.
            if !l.is_finite() || r.fract() != 0.0 || r.abs() > 64.0 {
                return None;
            };
            let result = l.powf(r);
            if result.fract() != 0.0 || result.abs() > 9007199254740992.0 {
                return None;
            };
            result
        }
        OperatorName::BitwiseAnd => (to_int32(l) & to_int32(r)) as f64,
        OperatorName::BitwiseOr => (to_int32(l) | to_int32(r)) as f64,
        OperatorName::BitwiseXor => (to_int32(l) ^ to_int32(r)) as f64,
        OperatorName::BitwiseLeftShift => to_int32(l).wrapping_shl(to_uint32(r) & 31) as f64,
        OperatorName::BitwiseRightShift => (to_int32(l) >> (to_uint32(r) & 31)) as f64,
        OperatorName::BitwiseUnsignedRightShift => (to_uint32(l) >> (to_uint32(r) & 31)) as f64,
        OperatorName::Equality | OperatorName::StrictEquality => {
            return Some(Constant::Boolean(l == r))
        }
        OperatorName::Inequality | OperatorName::StrictInequality => {
            return Some(Constant::Boolean(l != r))
        }
        OperatorName::LessThan => return Some(Constant::Boolean(l < r)),
        OperatorName::LessThanOrEqual => return Some(Constant::Boolean(l <= r)),
        OperatorName::GreaterThan => return Some(Constant::Boolean(l > r)),
        OperatorName::GreaterThanOrEqual => return Some(Constant::Boolean(l >= r)),
        _ => return None,
    };
    Some(Constant::Number(num))
}

fn fold_binary(operator: OperatorName, left: Constant, right: Constant) -> Option<Constant> {
    match (left, right) {
        (Constant::Number(l), Constant::Number(r)) => fold_numbers(operator, l, r),
        (Constant::String(l), Constant::String(r)) => match operator {
            OperatorName::Addition => Some(Constant::String(l + &r)),
            OperatorName::Equality | OperatorName::StrictEquality => {
                Some(Constant::Boolean(l == r))
            }
            OperatorName::Inequality | OperatorName::StrictInequality => {
                Some(Constant::Boolean(l != r))
            }
            _ => None,
        },
        (Constant::Boolean(l), Constant::Boolean(r)) => match operator {
            OperatorName::StrictEquality | OperatorName::Equality => Some(Constant::Boolean(l == r)),
            OperatorName::StrictInequality | OperatorName::Inequality => {
                Some(Constant::Boolean(l != r))
            }
            _ => None,
        },
        _ => None,
    }
}

fn fold_unary(operator: OperatorName, argument: Constant) -> Option<Constant> {
    match (operator, argument) {
        (OperatorName::LogicalNot, Constant::Number(v)) => {
            Some(Constant::Boolean(v == 0.0 || v.is_nan()))
        }
        (OperatorName::LogicalNot, Constant::String(v)) => Some(Constant::Boolean(v.is_empty())),
        (OperatorName::LogicalNot, Constant::Boolean(v)) => Some(Constant::Boolean(!v)),
        (OperatorName::BitwiseNot, Constant::Number(v)) => Some(Constant::Number(!to_int32(v) as f64)),
        (OperatorName::UnaryPlus, Constant::Number(v)) => Some(Constant::Number(v)),
        (OperatorName::UnaryNegation, Constant::Number(v)) => Some(Constant::Number(-v)),
        (OperatorName::Typeof, Constant::Number(_)) => Some(Constant::String("number".into())),
        (OperatorName::Typeof, Constant::String(_)) => Some(Constant::String("string".into())),
        (OperatorName::Typeof, Constant::Boolean(_)) => Some(Constant::String("boolean".into())),
        _ => None,
    }
}

fn constant_node(template: &Node, value: Constant) -> Node {
    match value {
        Constant::Number(v) if v.is_sign_negative() && !v.is_nan() => template.derive(Syntax::UnaryExpr {
            operator: OperatorName::UnaryNegation,
            argument: template.derive(Syntax::LiteralNumberExpr {
                value: JsNumber(-v),
            }),
        }),
        Constant::Number(v) => template.derive(Syntax::LiteralNumberExpr { value: JsNumber(v) }),
        Constant::String(value) => template.derive(Syntax::LiteralStringExpr { value, raw: None }),
        Constant::Boolean(value) => template.derive(Syntax::LiteralBooleanExpr { value }),
    }
}

// Folds operators over literal operands, e.g. `1 + 2` into `3` and `"a" + "b"` into `"ab"`. The
// result is kept only if it prints no longer than the original.
pub fn maybe_evaluate(n: &mut Node, _ctx: &RuleContext) -> Result<Option<Node>, InvariantError> {
    let folded = match n.stx() {
        Syntax::BinaryExpr {
            operator,
            left,
            right,
        } => match (constant_value(left), constant_value(right)) {
            (Some(l), Some(r)) => fold_binary(*operator, l, r),
            _ => None,
        },
        // A negated numeric literal is already as folded as it gets.
        Syntax::UnaryExpr {
            operator: OperatorName::UnaryNegation,
            argument,
        } if matches!(argument.stx(), Syntax::LiteralNumberExpr { .. }) => None,
        Syntax::UnaryExpr { operator, argument } => {
            constant_value(argument).and_then(|v| fold_unary(*operator, v))
        }
        _ => None,
    };
    let Some(folded) = folded else {
        return Ok(None);
    };
    let replacement = constant_node(n, folded);
    let options = EmitOptions::default();
    if emit_node(&replacement, &options)?.len() > emit_node(n, &options)?.len() {
        return Ok(None);
    };
    Ok(Some(replacement))
}
