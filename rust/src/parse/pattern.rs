use crate::ast::{ArrayPatternElement, ClassOrObjectMemberKey, Node, Syntax};
use crate::error::{SyntaxError, SyntaxErrorType, SyntaxResult};
use crate::parse::expr::parse_expr_until_either;
use crate::parse::literal::parse_class_or_object_member_key;
use crate::parse::parser::Parser;
use crate::source::SourceRange;
use crate::token::TokenType;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BindingKind {
    // Variables, function and class names, catch parameters, imports.
    Declaration,
    Parameter,
}

/// Tokens that can name a binding or be referenced as a variable. Contextual keywords are
/// included; `yield` is further restricted by context, see `check_binding_name`.
pub fn is_binding_identifier(typ: TokenType) -> bool {
    matches!(
        typ,
        TokenType::Identifier
            | TokenType::KeywordAs
            | TokenType::KeywordAsync
            | TokenType::KeywordAwait
            | TokenType::KeywordConstructor
            | TokenType::KeywordFrom
            | TokenType::KeywordGet
            | TokenType::KeywordLet
            | TokenType::KeywordOf
            | TokenType::KeywordSet
            | TokenType::KeywordStatic
            | TokenType::KeywordYield
    )
}

/// Checks a name bound in a function that is a generator and/or strict. Only `yield` is restricted.
pub fn check_yield_name(
    name: &SourceRange,
    is_generator: bool,
    is_strict: bool,
    kind: BindingKind,
) -> SyntaxResult<()> {
    if name.as_str() != "yield" {
        return Ok(());
    };
    let typ = if is_generator {
        SyntaxErrorType::YieldIdentifierInGenerator
    } else if is_strict {
        match kind {
            BindingKind::Declaration => SyntaxErrorType::YieldIdentifierInStrictMode,
            BindingKind::Parameter => SyntaxErrorType::YieldParameterInStrictMode,
        }
    } else {
        return Ok(());
    };
    Err(SyntaxError::from_loc(name, typ))
}

pub fn is_eval_or_arguments(name: &SourceRange) -> bool {
    matches!(name.as_str(), "eval" | "arguments")
}

/// Parameters are checked for `eval` and `arguments` once the body is known, see
/// `check_param_names`.
pub fn check_binding_name(parser: &Parser, name: &SourceRange, kind: BindingKind) -> SyntaxResult<()> {
    let ctx = parser.ctx();
    check_yield_name(name, ctx.is_generator, ctx.is_strict, kind)?;
    if ctx.is_strict && kind == BindingKind::Declaration && is_eval_or_arguments(name) {
        return Err(SyntaxError::from_loc(
            name,
            SyntaxErrorType::EvalOrArgumentsInStrictMode(name.as_str().to_string()),
        ));
    };
    Ok(())
}

/// Identifier references follow the same `yield` rules as declarations.
pub fn check_reference_name(parser: &Parser, name: &SourceRange) -> SyntaxResult<()> {
    let ctx = parser.ctx();
    check_yield_name(name, ctx.is_generator, ctx.is_strict, BindingKind::Declaration)
}

fn parse_pattern_identifier(parser: &mut Parser, kind: BindingKind) -> SyntaxResult<Node> {
    let t = parser.require_predicate(is_binding_identifier)?;
    check_binding_name(parser, t.loc(), kind)?;
    Ok(Node::new(
        t.loc().clone(),
        Syntax::IdentifierPattern {
            name: t.loc_take(),
        },
    ))
}

pub fn parse_pattern(parser: &mut Parser, kind: BindingKind) -> SyntaxResult<Node> {
    let t = parser.peek()?;
    Ok(match t.typ() {
        TokenType::BraceOpen => {
            parser.consume_peeked();
            let mut properties = Vec::<Node>::new();
            let mut rest = None;
            loop {
                let key_tok = parser.peek()?;
                if key_tok.typ() == TokenType::BraceClose {
                    break;
                };
                let mut loc = key_tok.loc().clone();
                // Only valid at the start or after a comma.
                if parser.consume_if(TokenType::DotDotDot)?.is_match() {
                    rest = Some(parse_pattern_identifier(parser, kind)?);
                    break;
                };

                let key = parse_class_or_object_member_key(parser)?;
                let (target, shorthand) = if parser.consume_if(TokenType::Colon)?.is_match() {
                    (parse_pattern(parser, kind)?, false)
                } else {
                    match &key {
                        ClassOrObjectMemberKey::Direct(name) if is_binding_identifier(key_tok.typ()) => {
                            check_binding_name(parser, name, kind)?;
                            (
                                Node::new(name.clone(), Syntax::IdentifierPattern { name: name.clone() }),
                                true,
                            )
                        }
                        _ => return Err(parser.peek()?.unexpected()),
                    }
                };
                let default_value = parser.consume_if(TokenType::Equals)?.and_then(|| {
                    parse_expr_until_either(parser, TokenType::Comma, TokenType::BraceClose)
                })?;
                loc.extend(default_value.as_ref().unwrap_or(&target).loc());
                properties.push(Node::new(
                    loc,
                    Syntax::ObjectPatternProperty {
                        key,
                        target,
                        default_value,
                        shorthand,
                    },
                ));
                // This will break if `}`.
                if !parser.consume_if(TokenType::Comma)?.is_match() {
                    break;
                };
            }
            let close = parser.require(TokenType::BraceClose)?;
            Node::new(t.loc() + close.loc(), Syntax::ObjectPattern { properties, rest })
        }
        TokenType::BracketOpen => {
            parser.consume_peeked();
            let mut elements = Vec::<Option<ArrayPatternElement>>::new();
            let mut rest = None;
            loop {
                if parser.peek()?.typ() == TokenType::BracketClose {
                    break;
                };
                // Only valid at the start or after a comma.
                if parser.consume_if(TokenType::DotDotDot)?.is_match() {
                    rest = Some(parse_pattern(parser, kind)?);
                    break;
                };

                // A hole skips that element.
                if parser.consume_if(TokenType::Comma)?.is_match() {
                    elements.push(None);
                } else {
                    let target = parse_pattern(parser, kind)?;
                    let default_value = parser.consume_if(TokenType::Equals)?.and_then(|| {
                        parse_expr_until_either(parser, TokenType::Comma, TokenType::BracketClose)
                    })?;
                    elements.push(Some(ArrayPatternElement {
                        target,
                        default_value,
                    }));
                    // This will break if `]`.
                    if !parser.consume_if(TokenType::Comma)?.is_match() {
                        break;
                    };
                };
            }
            let close = parser.require(TokenType::BracketClose)?;
            Node::new(t.loc() + close.loc(), Syntax::ArrayPattern { elements, rest })
        }
        _ => parse_pattern_identifier(parser, kind)?,
    })
}

/// Every name a pattern binds, with its location.
pub fn pattern_names<'a>(pattern: &'a Node, out: &mut Vec<&'a SourceRange>) -> () {
    match pattern.stx() {
        Syntax::IdentifierPattern { name } => out.push(name),
        Syntax::ArrayPattern { elements, rest } => {
            for e in elements.iter().flatten() {
                pattern_names(&e.target, out);
            }
            if let Some(rest) = rest {
                pattern_names(rest, out);
            };
        }
        Syntax::ObjectPattern { properties, rest } => {
            for p in properties {
                if let Syntax::ObjectPatternProperty { target, .. } = p.stx() {
                    pattern_names(target, out);
                };
            }
            if let Some(rest) = rest {
                pattern_names(rest, out);
            };
        }
        _ => {}
    }
}
