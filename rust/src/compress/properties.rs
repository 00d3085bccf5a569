use super::RuleContext;
use crate::ast::ClassOrObjectMemberKey;
use crate::ast::Node;
use crate::ast::ObjectMemberType;
use crate::ast::Syntax;
use crate::error::InvariantError;
use crate::lex::is_canonical_index;
use crate::lex::is_identifier_name;
use crate::num::JsNumber;
use crate::source::SourceRange;

// `a["b"]` => `a.b`, and `a["0"]` => `a[0]`.
pub fn maybe_dot_member(n: &mut Node, _ctx: &RuleContext) -> Result<Option<Node>, InvariantError> {
    let Syntax::ComputedMemberExpr {
        optional_chaining,
        parenthesised,
        object,
        member,
    } = n.stx_mut()
    else {
        return Ok(None);
    };
    let Syntax::LiteralStringExpr { value, raw: None } = member.stx() else {
        return Ok(None);
    };
    if is_identifier_name(value) {
        let right = SourceRange::anonymous(value.as_str());
        let replacement = Syntax::MemberExpr {
            parenthesised: *parenthesised,
            optional_chaining: *optional_chaining,
            left: object.take(),
            right,
        };
        return Ok(Some(n.derive(replacement)));
    };
    if is_canonical_index(value) {
        let Ok(index) = value.parse::<f64>() else {
            return Ok(None);
        };
        *member = member.derive(Syntax::LiteralNumberExpr {
            value: JsNumber(index),
        });
        return Ok(Some(n.take()));
    };
    Ok(None)
}

// A quoted key that's a plain identifier name, e.g. `"a"`, without the quotes.
fn unquoted(key: &SourceRange) -> Option<String> {
    let raw = key.as_str();
    let inner = raw
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .or_else(|| raw.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')))?;
    if inner.is_empty() || !is_identifier_name(inner) {
        return None;
    };
    Some(inner.to_string())
}

// `{"a": 1}` => `{a: 1}`.
pub fn maybe_unquote_keys(
    n: &mut Node,
    _ctx: &RuleContext,
) -> Result<Option<Node>, InvariantError> {
    let Syntax::ObjectMember {
        typ: ObjectMemberType::Valued {
            key: ClassOrObjectMemberKey::Direct(key),
            ..
        },
    } = n.stx_mut()
    else {
        return Ok(None);
    };
    let Some(name) = unquoted(key) else {
        return Ok(None);
    };
    *key = SourceRange::anonymous(name);
    Ok(Some(n.take()))
}
