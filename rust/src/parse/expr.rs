use crate::ast::{
    ArrayElement, ArrayPatternElement, ClassOrObjectMemberKey, ClassOrObjectMemberValue, Node,
    ObjectMemberType, Syntax,
};
use crate::error::{SyntaxError, SyntaxErrorType, SyntaxResult};
use crate::lex::LexMode;
use crate::operator::{assignment_precedence, OperatorName};
use crate::parse::class_or_object::{parse_class, parse_class_or_object_member, ParseClassOrObjectMemberResult, ParsedClass};
use crate::parse::context::ContextFrame;
use crate::parse::literal::{
    check_number_in_strict, normalise_literal_bigint, normalise_literal_number, normalise_literal_string,
    parse_template_parts,
};
use crate::parse::operator::{multary_operator, unary_operator};
use crate::parse::parser::Parser;
use crate::parse::pattern::{
    check_binding_name, check_reference_name, check_yield_name, is_binding_identifier, BindingKind,
};
use crate::parse::signature::{check_params, parse_function, parse_signature_function, ParsedFunction};
use crate::parse::stmt::parse_function_body;
use crate::source::SourceRange;
use crate::token::{Token, TokenType};
use crate::visit::any_node;

pub struct Asi {
    pub can_end_with_asi: bool,
    pub did_end_with_asi: bool,
}

impl Asi {
    pub fn can() -> Asi {
        Asi {
            can_end_with_asi: true,
            did_end_with_asi: false,
        }
    }

    pub fn no() -> Asi {
        Asi {
            can_end_with_asi: false,
            did_end_with_asi: false,
        }
    }
}

pub fn parse_call_args(parser: &mut Parser) -> SyntaxResult<Vec<Node>> {
    let mut args = Vec::<Node>::new();
    loop {
        if parser.peek()?.typ() == TokenType::ParenthesisClose {
            break;
        };
        let spread = parser.consume_if(TokenType::DotDotDot)?.match_loc_take();
        let value = parse_expr_until_either(parser, TokenType::Comma, TokenType::ParenthesisClose)?;
        let loc = match &spread {
            Some(start) => start + value.loc(),
            None => value.loc().clone(),
        };
        args.push(Node::new(
            loc,
            Syntax::CallArg {
                spread: spread.is_some(),
                value,
            },
        ));
        if !parser.consume_if(TokenType::Comma)?.is_match() {
            break;
        };
    }
    Ok(args)
}

pub fn parse_expr(parser: &mut Parser, terminator: TokenType) -> SyntaxResult<Node> {
    let mut asi = Asi::no();
    parse_expr_with_min_prec(parser, 1, terminator, TokenType::_Dummy, false, &mut asi)
}

pub fn parse_expr_with_asi(parser: &mut Parser, terminator: TokenType, asi: &mut Asi) -> SyntaxResult<Node> {
    parse_expr_with_min_prec(parser, 1, terminator, TokenType::_Dummy, false, asi)
}

/// Parses a single assignment-level expression, stopping before a comma or either terminator.
pub fn parse_expr_until_either(
    parser: &mut Parser,
    terminator_a: TokenType,
    terminator_b: TokenType,
) -> SyntaxResult<Node> {
    let mut asi = Asi::no();
    parse_expr_until_either_with_asi(parser, terminator_a, terminator_b, &mut asi)
}

pub fn parse_expr_until_either_with_asi(
    parser: &mut Parser,
    terminator_a: TokenType,
    terminator_b: TokenType,
    asi: &mut Asi,
) -> SyntaxResult<Node> {
    parse_expr_with_min_prec(
        parser,
        assignment_precedence(),
        terminator_a,
        terminator_b,
        false,
        asi,
    )
}

pub fn parse_grouping(parser: &mut Parser) -> SyntaxResult<Node> {
    parser.require(TokenType::ParenthesisOpen)?;
    let expr = parse_expr_with_min_prec(
        parser,
        1,
        TokenType::ParenthesisClose,
        TokenType::_Dummy,
        true,
        &mut Asi::no(),
    )?;
    parser.require(TokenType::ParenthesisClose)?;
    Ok(expr)
}

pub fn parse_expr_array(parser: &mut Parser) -> SyntaxResult<Node> {
    let loc_start = parser.require(TokenType::BracketOpen)?.loc_take();
    let mut elements = Vec::<ArrayElement>::new();
    loop {
        if parser.consume_if(TokenType::Comma)?.is_match() {
            elements.push(ArrayElement::Empty);
            continue;
        };
        if parser.peek()?.typ() == TokenType::BracketClose {
            break;
        };
        let rest = parser.consume_if(TokenType::DotDotDot)?.is_match();
        let value = parse_expr_until_either(parser, TokenType::Comma, TokenType::BracketClose)?;
        elements.push(if rest {
            ArrayElement::Rest(value)
        } else {
            ArrayElement::Single(value)
        });
        if parser.peek()?.typ() == TokenType::BracketClose {
            break;
        };
        parser.require(TokenType::Comma)?;
    }
    let loc_end = parser.require(TokenType::BracketClose)?.loc_take();
    Ok(Node::new(
        &loc_start + &loc_end,
        Syntax::LiteralArrayExpr { elements },
    ))
}

pub fn parse_expr_object(parser: &mut Parser) -> SyntaxResult<Node> {
    let loc_start = parser.require(TokenType::BraceOpen)?.loc_take();
    let mut members = Vec::<Node>::new();
    loop {
        if parser.peek()?.typ() == TokenType::BraceClose {
            break;
        };
        let loc_checkpoint = parser.checkpoint();
        if parser.consume_if(TokenType::DotDotDot)?.is_match() {
            let value = parse_expr_until_either(parser, TokenType::Comma, TokenType::BraceClose)?;
            members.push(Node::new(
                parser.since_checkpoint(&loc_checkpoint),
                Syntax::ObjectMember {
                    typ: ObjectMemberType::Rest { value },
                },
            ));
        } else {
            let ParseClassOrObjectMemberResult { key, value } = parse_class_or_object_member(
                parser,
                TokenType::Colon,
                TokenType::Comma,
                &mut Asi::no(),
            )?;
            let typ = match (key, value) {
                (
                    ClassOrObjectMemberKey::Direct(name),
                    ClassOrObjectMemberValue::Property { initializer: None },
                ) => ObjectMemberType::Shorthand { name },
                (key, value) => ObjectMemberType::Valued { key, value },
            };
            members.push(Node::new(
                parser.since_checkpoint(&loc_checkpoint),
                Syntax::ObjectMember { typ },
            ));
        }
        if parser.peek()?.typ() == TokenType::BraceClose {
            break;
        };
        parser.require(TokenType::Comma)?;
    }
    let loc_end = parser.require(TokenType::BraceClose)?.loc_take();
    Ok(Node::new(
        &loc_start + &loc_end,
        Syntax::LiteralObjectExpr { members },
    ))
}

fn parse_arrow_function_body(
    parser: &mut Parser,
    terminator_a: TokenType,
    terminator_b: TokenType,
    asi: &mut Asi,
) -> SyntaxResult<Node> {
    match parser.peek()?.typ() {
        TokenType::BraceOpen => parse_function_body(parser),
        _ => parse_expr_with_min_prec(
            parser,
            assignment_precedence(),
            terminator_a,
            terminator_b,
            false,
            asi,
        ),
    }
}

fn require_arrow(parser: &mut Parser) -> SyntaxResult<Token> {
    let arrow = parser.require(TokenType::EqualsChevronRight)?;
    if arrow.preceded_by_line_terminator() {
        // A newline before `=>` is not allowed.
        return Err(arrow.error(SyntaxErrorType::LineTerminatorBeforeArrow));
    };
    Ok(arrow)
}

fn check_arrow_precedence(arrow: &Token, min_prec: u8) -> SyntaxResult<()> {
    // An arrow function is an assignment-level expression and can't be the operand of a tighter
    // operator e.g. `a + b => c`.
    if min_prec > assignment_precedence() {
        return Err(arrow.unexpected());
    };
    Ok(())
}

fn parse_arrow_function_single_param(
    parser: &mut Parser,
    start: SourceRange,
    is_async: bool,
    param: Token,
    min_prec: u8,
    terminator_a: TokenType,
    terminator_b: TokenType,
    asi: &mut Asi,
) -> SyntaxResult<Node> {
    let arrow = require_arrow(parser)?;
    check_arrow_precedence(&arrow, min_prec)?;
    let outer_strict = parser.ctx().is_strict;
    let frame = parser.ctx().arrow(is_async);
    let ((signature, body), frame) = parser.with_frame(frame, |p| {
        check_binding_name(p, param.loc(), BindingKind::Parameter)?;
        let name = param.loc().clone();
        let pattern = Node::new(name.clone(), Syntax::IdentifierPattern { name: name.clone() });
        let param = Node::new(
            name.clone(),
            Syntax::ParamDecl {
                rest: false,
                pattern,
                default_value: None,
            },
        );
        let signature = Node::new(
            name,
            Syntax::FunctionSignature {
                parameters: vec![param],
            },
        );
        let body = parse_arrow_function_body(p, terminator_a, terminator_b, asi)?;
        Ok((signature, body))
    })?;
    check_params(&signature, outer_strict, frame.is_strict, true)?;
    Ok(Node::new(
        &start + body.loc(),
        Syntax::ArrowFunctionExpr {
            is_async,
            signature,
            body,
        },
    ))
}

/// Attempts to parse a parenthesised arrow function. Returns None with the parser rewound if what
/// follows is not an arrow function.
fn try_parse_arrow_function(
    parser: &mut Parser,
    start: Option<SourceRange>,
    is_async: bool,
    min_prec: u8,
    terminator_a: TokenType,
    terminator_b: TokenType,
    asi: &mut Asi,
) -> SyntaxResult<Option<Node>> {
    // On failure the parser is rewound and the caller tries the other readings. Past `=>` there is
    // no backtracking.
    let cp = parser.checkpoint();
    let outer_strict = parser.ctx().is_strict;
    let frame = parser.ctx().arrow(is_async);
    // Parameters are read with the enclosing generator's grammar, so `yield` there is rejected.
    let signature_frame = ContextFrame {
        is_generator: parser.ctx().is_generator,
        ..frame.clone()
    };
    let (signature, arrow) = match parser.with_frame(signature_frame, |p| {
        let signature = parse_signature_function(p)?;
        let arrow = require_arrow(p)?;
        Ok((signature, arrow))
    }) {
        Ok((res, _)) => res,
        Err(err) if *err.typ() == SyntaxErrorType::LineTerminatorBeforeArrow => return Err(err),
        Err(_) => {
            parser.restore_checkpoint(cp);
            return Ok(None);
        }
    };
    check_arrow_precedence(&arrow, min_prec)?;
    let (body, frame) = parser.with_frame(frame, |p| {
        parse_arrow_function_body(p, terminator_a, terminator_b, asi)
    })?;
    check_params(&signature, outer_strict, frame.is_strict, true)?;
    let start = start.unwrap_or_else(|| signature.loc().clone());
    Ok(Some(Node::new(
        &start + body.loc(),
        Syntax::ArrowFunctionExpr {
            is_async,
            signature,
            body,
        },
    )))
}

pub fn parse_expr_import(parser: &mut Parser) -> SyntaxResult<Node> {
    let start = parser.require(TokenType::KeywordImport)?;
    if parser.consume_if(TokenType::Dot)?.is_match() {
        let prop = parser.next()?;
        if prop.typ() != TokenType::Identifier || prop.loc().as_str() != "meta" {
            return Err(prop.unexpected());
        };
        return Ok(Node::new(start.loc() + prop.loc(), Syntax::ImportMeta {}));
    };
    parser.require(TokenType::ParenthesisOpen)?;
    let module = parse_expr_until_either(parser, TokenType::ParenthesisClose, TokenType::_Dummy)?;
    let end = parser.require(TokenType::ParenthesisClose)?;
    Ok(Node::new(start.loc() + end.loc(), Syntax::ImportExpr { module }))
}

pub fn parse_expr_function(parser: &mut Parser) -> SyntaxResult<Node> {
    let start = parser.checkpoint();
    let is_async = parser.consume_if(TokenType::KeywordAsync)?.is_match();
    parser.require(TokenType::KeywordFunction)?;
    let generator = parser.consume_if(TokenType::Asterisk)?.is_match();
    // The name of a function expression is only visible inside the function, so it follows the
    // rules of the function itself.
    let name = parser
        .consume_if_pred(|t| is_binding_identifier(t.typ()))?
        .match_loc_take();
    if let Some(name) = &name {
        check_yield_name(name, generator, parser.ctx().is_strict, BindingKind::Declaration)?;
    };
    let ParsedFunction {
        signature,
        body,
        became_strict,
    } = parse_function(parser, generator, is_async)?;
    if let Some(name) = &name {
        if became_strict {
            check_yield_name(name, false, true, BindingKind::Declaration)?;
        };
    };
    Ok(Node::new(
        parser.since_checkpoint(&start),
        Syntax::FunctionExpr {
            is_async,
            generator,
            name: name.map(|name| Node::new(name.clone(), Syntax::ClassOrFunctionName { name })),
            signature,
            body,
        },
    ))
}

pub fn parse_expr_class(parser: &mut Parser) -> SyntaxResult<Node> {
    let ParsedClass {
        loc,
        name,
        extends,
        members,
    } = parse_class(parser, false)?;
    Ok(Node::new(
        loc,
        Syntax::ClassExpr {
            name,
            extends,
            members,
        },
    ))
}

fn parse_expr_member_name(parser: &mut Parser) -> SyntaxResult<SourceRange> {
    let t = parser.next()?;
    match t.typ() {
        TokenType::Identifier
        | TokenType::PrivateMember
        | TokenType::LiteralTrue
        | TokenType::LiteralFalse
        | TokenType::LiteralNull => {}
        typ if typ.is_keyword() => {}
        _ => return Err(t.unexpected()),
    };
    Ok(t.loc_take())
}

// `new` binds to the member expression that follows it, including any arguments, so it is parsed
// separately from the other unary operators.
fn parse_expr_new(parser: &mut Parser, new_tok: Token) -> SyntaxResult<Node> {
    if parser.consume_if(TokenType::Dot)?.is_match() {
        let prop = parser.next()?;
        if prop.typ() != TokenType::Identifier
            || prop.loc().as_str() != "target"
            || !parser.ctx().in_function
        {
            return Err(prop.unexpected());
        };
        return Ok(Node::new(new_tok.loc() + prop.loc(), Syntax::NewTarget {}));
    };
    let mut callee = if parser.peek()?.typ() == TokenType::KeywordNew {
        let inner = parser.next()?;
        parse_expr_new(parser, inner)?
    } else {
        let (operand, _) = parse_expr_operand(
            parser,
            OperatorName::MemberAccess.precedence(),
            TokenType::_Dummy,
            TokenType::_Dummy,
            &mut Asi::no(),
        )?;
        operand
    };
    loop {
        let t = parser.peek()?;
        callee = match t.typ() {
            TokenType::Dot => {
                parser.consume_peeked();
                let right = parse_expr_member_name(parser)?;
                Node::new(
                    callee.loc() + &right,
                    Syntax::MemberExpr {
                        parenthesised: false,
                        optional_chaining: false,
                        left: callee,
                        right,
                    },
                )
            }
            TokenType::BracketOpen => {
                parser.consume_peeked();
                let member = parse_expr(parser, TokenType::BracketClose)?;
                let end = parser.require(TokenType::BracketClose)?;
                Node::new(
                    callee.loc() + end.loc(),
                    Syntax::ComputedMemberExpr {
                        optional_chaining: false,
                        parenthesised: false,
                        object: callee,
                        member,
                    },
                )
            }
            TokenType::LiteralTemplatePartString | TokenType::LiteralTemplatePartStringEnd => {
                parser.consume_peeked();
                let (parts, end) = parse_template_parts(parser, &t)?;
                Node::new(
                    callee.loc() + &end,
                    Syntax::TaggedTemplateExpr { tag: callee, parts },
                )
            }
            _ => break,
        };
    }
    let (arguments, end) = if parser.consume_if(TokenType::ParenthesisOpen)?.is_match() {
        let arguments = parse_call_args(parser)?;
        let end = parser.require(TokenType::ParenthesisClose)?;
        (arguments, end.loc_take())
    } else {
        (Vec::new(), callee.loc().clone())
    };
    Ok(Node::new(
        new_tok.loc() + &end,
        Syntax::NewExpr { callee, arguments },
    ))
}

/// Whether a yield expression's argument can begin with this token.
fn can_start_expression(typ: TokenType) -> bool {
    match typ {
        TokenType::BracketOpen
        | TokenType::BraceOpen
        | TokenType::ParenthesisOpen
        | TokenType::KeywordClass
        | TokenType::KeywordFunction
        | TokenType::KeywordImport
        | TokenType::KeywordNew
        | TokenType::KeywordSuper
        | TokenType::KeywordThis
        | TokenType::LiteralBigInt
        | TokenType::LiteralFalse
        | TokenType::LiteralNull
        | TokenType::LiteralNumber
        | TokenType::LiteralRegex
        | TokenType::LiteralString
        | TokenType::LiteralTemplatePartString
        | TokenType::LiteralTemplatePartStringEnd
        | TokenType::LiteralTrue => true,
        typ => is_binding_identifier(typ) || unary_operator(typ).is_some(),
    }
}

fn parse_expr_yield(
    parser: &mut Parser,
    yield_tok: Token,
    min_prec: u8,
    terminator_a: TokenType,
    terminator_b: TokenType,
    asi: &mut Asi,
) -> SyntaxResult<Node> {
    // A yield expression is assignment-level, so e.g. `a + yield b` is invalid.
    if min_prec > assignment_precedence() {
        return Err(yield_tok.unexpected());
    };
    if parser.ctx().in_params {
        return Err(yield_tok.error(SyntaxErrorType::YieldInParameters));
    };
    let next = parser.peek_with_mode(LexMode::SlashIsRegex)?;
    let (delegate, argument) = if next.preceded_by_line_terminator() {
        // Automatic Semicolon Insertion: `yield` followed by a newline has no argument, even if
        // the next line starts with `*`.
        (false, None)
    } else if next.typ() == TokenType::Asterisk {
        parser.consume_peeked();
        let argument = parse_expr_with_min_prec(
            parser,
            assignment_precedence(),
            terminator_a,
            terminator_b,
            false,
            asi,
        )?;
        (true, Some(argument))
    } else if can_start_expression(next.typ()) {
        let argument = parse_expr_with_min_prec(
            parser,
            assignment_precedence(),
            terminator_a,
            terminator_b,
            false,
            asi,
        )?;
        (false, Some(argument))
    } else {
        (false, None)
    };
    let loc = match &argument {
        Some(argument) => yield_tok.loc() + argument.loc(),
        None => yield_tok.loc().clone(),
    };
    Ok(Node::new(loc, Syntax::YieldExpr { delegate, argument }))
}

fn literal_string(t: &Token) -> SyntaxResult<Syntax> {
    let (value, representable) = normalise_literal_string(t.loc())?;
    Ok(Syntax::LiteralStringExpr {
        value,
        raw: if representable {
            None
        } else {
            Some(t.loc().as_str().to_string())
        },
    })
}

// The second value is true if the operand is an unparenthesised assignment-level expression
// (an arrow function or yield expression) that can't be the left operand of a binary operator.
fn parse_expr_operand(
    parser: &mut Parser,
    min_prec: u8,
    terminator_a: TokenType,
    terminator_b: TokenType,
    asi: &mut Asi,
) -> SyntaxResult<(Node, bool)> {
    let cp = parser.checkpoint();
    let t = parser.next_with_mode(LexMode::SlashIsRegex)?;
    if let Some(operator) = unary_operator(t.typ()) {
        let next_min_prec = operator.operand_min_precedence();
        let argument = parse_expr_with_min_prec(
            parser,
            next_min_prec,
            terminator_a,
            terminator_b,
            false,
            asi,
        )?;
        if operator.is_update() {
            check_update_target(&argument)?;
        };
        return Ok((
            Node::new(
                t.loc() + argument.loc(),
                Syntax::UnaryExpr {
                    operator,
                    argument,
                },
            ),
            false,
        ));
    };
    let operand = match t.typ() {
        TokenType::KeywordAwait if parser.ctx().is_async => {
            let argument = parse_expr_with_min_prec(
                parser,
                OperatorName::Await.precedence(),
                terminator_a,
                terminator_b,
                false,
                asi,
            )?;
            Node::new(
                t.loc() + argument.loc(),
                Syntax::UnaryExpr {
                    operator: OperatorName::Await,
                    argument,
                },
            )
        }
        TokenType::KeywordYield if parser.ctx().is_generator => {
            let node = parse_expr_yield(parser, t, min_prec, terminator_a, terminator_b, asi)?;
            return Ok((node, true));
        }
        TokenType::KeywordNew => parse_expr_new(parser, t)?,
        TokenType::KeywordAsync => {
            let next = parser.peek()?;
            if !next.preceded_by_line_terminator() {
                match next.typ() {
                    TokenType::KeywordFunction => {
                        parser.restore_checkpoint(cp);
                        return Ok((parse_expr_function(parser)?, false));
                    }
                    TokenType::ParenthesisOpen => {
                        if let Some(arrow) = try_parse_arrow_function(
                            parser,
                            Some(t.loc().clone()),
                            true,
                            min_prec,
                            terminator_a,
                            terminator_b,
                            asi,
                        )? {
                            return Ok((arrow, true));
                        };
                    }
                    typ if is_binding_identifier(typ) => {
                        let param = parser.next()?;
                        let arrow = parse_arrow_function_single_param(
                            parser,
                            t.loc().clone(),
                            true,
                            param,
                            min_prec,
                            terminator_a,
                            terminator_b,
                            asi,
                        )?;
                        return Ok((arrow, true));
                    }
                    _ => {}
                };
            };
            // Just an identifier named `async`, possibly called e.g. `async(a, b)`.
            Node::new(t.loc().clone(), Syntax::IdentifierExpr { name: t.loc_take() })
        }
        TokenType::BracketOpen => {
            parser.restore_checkpoint(cp);
            parse_expr_array(parser)?
        }
        TokenType::BraceOpen => {
            parser.restore_checkpoint(cp);
            parse_expr_object(parser)?
        }
        typ if is_binding_identifier(typ) => {
            if parser.peek()?.typ() == TokenType::EqualsChevronRight {
                // `a => ...`
                let start = t.loc().clone();
                let arrow = parse_arrow_function_single_param(
                    parser,
                    start,
                    false,
                    t,
                    min_prec,
                    terminator_a,
                    terminator_b,
                    asi,
                )?;
                return Ok((arrow, true));
            };
            check_reference_name(parser, t.loc())?;
            Node::new(t.loc().clone(), Syntax::IdentifierExpr { name: t.loc_take() })
        }
        TokenType::KeywordFunction => {
            parser.restore_checkpoint(cp);
            parse_expr_function(parser)?
        }
        TokenType::KeywordClass => {
            parser.restore_checkpoint(cp);
            parse_expr_class(parser)?
        }
        TokenType::KeywordImport => {
            parser.restore_checkpoint(cp);
            parse_expr_import(parser)?
        }
        TokenType::KeywordSuper => {
            if !parser.ctx().allow_super {
                return Err(t.error(SyntaxErrorType::SuperOutsideMethod));
            };
            Node::new(t.loc_take(), Syntax::SuperExpr {})
        }
        TokenType::KeywordThis => Node::new(t.loc_take(), Syntax::ThisExpr {}),
        TokenType::LiteralTrue | TokenType::LiteralFalse => Node::new(
            t.loc().clone(),
            Syntax::LiteralBooleanExpr {
                value: t.typ() == TokenType::LiteralTrue,
            },
        ),
        TokenType::LiteralNull => Node::new(t.loc_take(), Syntax::LiteralNull {}),
        TokenType::LiteralNumber => {
            check_number_in_strict(parser, &t)?;
            Node::new(
                t.loc().clone(),
                Syntax::LiteralNumberExpr {
                    value: normalise_literal_number(t.loc())?,
                },
            )
        }
        TokenType::LiteralBigInt => Node::new(
            t.loc().clone(),
            Syntax::LiteralBigIntExpr {
                value: normalise_literal_bigint(t.loc())?,
            },
        ),
        TokenType::LiteralRegex => Node::new(
            t.loc().clone(),
            Syntax::LiteralRegexExpr {
                value: t.loc().as_str().to_string(),
            },
        ),
        TokenType::LiteralString => Node::new(t.loc().clone(), literal_string(&t)?),
        TokenType::LiteralTemplatePartString | TokenType::LiteralTemplatePartStringEnd => {
            let (parts, loc) = parse_template_parts(parser, &t)?;
            Node::new(loc, Syntax::LiteralTemplateExpr { parts })
        }
        TokenType::ParenthesisOpen => {
            parser.restore_checkpoint(cp);
            if let Some(arrow) = try_parse_arrow_function(
                parser,
                None,
                false,
                min_prec,
                terminator_a,
                terminator_b,
                asi,
            )? {
                return Ok((arrow, true));
            };
            let grouping = parse_grouping(parser)?;
            let next = parser.peek()?;
            if next.typ() == TokenType::EqualsChevronRight {
                // Not a valid parameter list, or the arrow would have been parsed above.
                let has_yield =
                    any_node(&grouping, &mut |n| matches!(n.stx(), Syntax::YieldExpr { .. }));
                return Err(if has_yield {
                    SyntaxError::from_loc(grouping.loc(), SyntaxErrorType::YieldInParameters)
                } else {
                    next.unexpected()
                });
            };
            grouping
        }
        _ => return Err(t.unexpected()),
    };
    Ok((operand, false))
}

fn invalid_target(loc: &SourceRange) -> SyntaxError {
    SyntaxError::from_loc(loc, SyntaxErrorType::InvalidAssignmentTarget)
}

// Whether the node is part of an optional chain, which can't be assigned to e.g. `a?.b.c = 1`.
fn in_optional_chain(node: &Node) -> bool {
    match node.stx() {
        Syntax::MemberExpr {
            optional_chaining,
            parenthesised,
            left,
            ..
        } => !*parenthesised && (*optional_chaining || in_optional_chain(left)),
        Syntax::ComputedMemberExpr {
            optional_chaining,
            parenthesised,
            object,
            ..
        } => !*parenthesised && (*optional_chaining || in_optional_chain(object)),
        Syntax::CallExpr {
            optional_chaining,
            parenthesised,
            callee,
            ..
        } => !*parenthesised && (*optional_chaining || in_optional_chain(callee)),
        _ => false,
    }
}

fn check_update_target(node: &Node) -> SyntaxResult<()> {
    match node.stx() {
        Syntax::IdentifierExpr { .. } => Ok(()),
        Syntax::MemberExpr { .. } | Syntax::ComputedMemberExpr { .. } if !in_optional_chain(node) => Ok(()),
        _ => Err(invalid_target(node.loc())),
    }
}

fn split_target_and_default(elem: Node) -> SyntaxResult<(Node, Option<Node>)> {
    let loc = elem.loc().clone();
    match elem.into_stx() {
        // The left side has already been converted into a target when the assignment was parsed.
        Syntax::BinaryExpr {
            operator: OperatorName::Assignment,
            left,
            right,
        } => Ok((transform_literal_expr_to_destructuring_pattern(left)?, Some(right))),
        stx => Ok((
            transform_literal_expr_to_destructuring_pattern(Node::new(loc, stx))?,
            None,
        )),
    }
}

pub fn transform_literal_expr_to_destructuring_pattern(node: Node) -> SyntaxResult<Node> {
    let loc = node.loc().clone();
    match node.stx() {
        Syntax::MemberExpr { .. } | Syntax::ComputedMemberExpr { .. } => {
            return if in_optional_chain(&node) {
                Err(invalid_target(&loc))
            } else {
                Ok(node)
            };
        }
        Syntax::ArrayPattern { .. } | Syntax::ObjectPattern { .. } => return Ok(node),
        _ => {}
    };
    match node.into_stx() {
        Syntax::LiteralArrayExpr { elements } => {
            let mut pat_elements = Vec::<Option<ArrayPatternElement>>::new();
            let mut rest = None;
            for element in elements {
                if rest.is_some() {
                    return Err(invalid_target(&loc));
                };
                match element {
                    ArrayElement::Single(elem) => {
                        let (target, default_value) = split_target_and_default(elem)?;
                        pat_elements.push(Some(ArrayPatternElement {
                            target,
                            default_value,
                        }));
                    }
                    ArrayElement::Rest(expr) => {
                        rest = Some(transform_literal_expr_to_destructuring_pattern(expr)?);
                    }
                    ArrayElement::Empty => pat_elements.push(None),
                };
            }
            Ok(Node::new(
                loc,
                Syntax::ArrayPattern {
                    elements: pat_elements,
                    rest,
                },
            ))
        }
        Syntax::LiteralObjectExpr { members } => {
            let mut properties = Vec::<Node>::new();
            let mut rest = None;
            for member in members {
                if rest.is_some() {
                    return Err(invalid_target(&loc));
                };
                let member_loc = member.loc().clone();
                match member.into_stx() {
                    Syntax::ObjectMember {
                        typ:
                            ObjectMemberType::Valued {
                                key,
                                value:
                                    ClassOrObjectMemberValue::Property {
                                        initializer: Some(initializer),
                                    },
                            },
                    } => {
                        let (target, default_value) = split_target_and_default(initializer)?;
                        properties.push(Node::new(
                            member_loc,
                            Syntax::ObjectPatternProperty {
                                key,
                                target,
                                default_value,
                                shorthand: false,
                            },
                        ));
                    }
                    Syntax::ObjectMember {
                        typ: ObjectMemberType::Shorthand { name },
                    } => {
                        properties.push(Node::new(
                            member_loc,
                            Syntax::ObjectPatternProperty {
                                key: ClassOrObjectMemberKey::Direct(name.clone()),
                                target: Node::new(name.clone(), Syntax::IdentifierPattern { name }),
                                default_value: None,
                                shorthand: true,
                            },
                        ));
                    }
                    Syntax::ObjectMember {
                        typ: ObjectMemberType::Rest { value },
                    } => {
                        rest = Some(transform_literal_expr_to_destructuring_pattern(value)?);
                    }
                    _ => return Err(invalid_target(&member_loc)),
                };
            }
            Ok(Node::new(loc, Syntax::ObjectPattern { properties, rest }))
        }
        // In `{ a: b = 1 } = x`, `b = 1` was already parsed as an assignment whose target is a pattern.
        Syntax::IdentifierExpr { name } | Syntax::IdentifierPattern { name } => {
            Ok(Node::new(loc, Syntax::IdentifierPattern { name }))
        }
        _ => Err(invalid_target(&loc)),
    }
}

// The left side of an assignment is parsed as an expression, then converted here. Valid targets are:
// - member and computed member accesses without `?.`, the last of which isn't a call;
// - object and array literals that convert to patterns, and identifiers.
pub fn convert_assignment_lhs_to_target(lhs: Node, operator_name: OperatorName) -> SyntaxResult<Node> {
    match lhs.stx() {
        Syntax::LiteralArrayExpr { .. } | Syntax::LiteralObjectExpr { .. } => {
            if operator_name != OperatorName::Assignment {
                return Err(invalid_target(lhs.loc()));
            };
            transform_literal_expr_to_destructuring_pattern(lhs)
        }
        Syntax::IdentifierExpr { .. } | Syntax::ComputedMemberExpr { .. } | Syntax::MemberExpr { .. } => {
            transform_literal_expr_to_destructuring_pattern(lhs)
        }
        _ => Err(invalid_target(lhs.loc())),
    }
}

pub fn parse_expr_with_min_prec(
    parser: &mut Parser,
    min_prec: u8,
    terminator_a: TokenType,
    terminator_b: TokenType,
    parenthesised: bool,
    asi: &mut Asi,
) -> SyntaxResult<Node> {
    let (mut left, mut assignment_level) =
        parse_expr_operand(parser, min_prec, terminator_a, terminator_b, asi)?;
    // The logical operator `left` was last built with at this level, if it is still the root.
    let mut bare_logical: Option<OperatorName> = None;

    loop {
        if asi.did_end_with_asi {
            break;
        };
        let cp = parser.checkpoint();
        let t = parser.next()?;

        if t.typ() == terminator_a || t.typ() == terminator_b {
            parser.restore_checkpoint(cp);
            break;
        };
        // The left side of a for-of header is parsed with `in` as a terminator; `of` ends it too.
        if t.typ() == TokenType::KeywordOf && terminator_b == TokenType::KeywordIn {
            parser.restore_checkpoint(cp);
            break;
        };

        match t.typ() {
            // A newline before `++` or `--` ends the expression.
            TokenType::PlusPlus | TokenType::HyphenHyphen if !t.preceded_by_line_terminator() => {
                let operator_name = if t.typ() == TokenType::PlusPlus {
                    OperatorName::PostfixIncrement
                } else {
                    OperatorName::PostfixDecrement
                };
                if operator_name.precedence() < min_prec {
                    parser.restore_checkpoint(cp);
                    break;
                };
                if assignment_level {
                    return Err(t.unexpected());
                };
                check_update_target(&left)?;
                left = Node::new(
                    left.loc() + t.loc(),
                    Syntax::UnaryPostfixExpr {
                        operator: operator_name,
                        argument: left,
                    },
                );
                continue;
            }
            TokenType::LiteralTemplatePartString | TokenType::LiteralTemplatePartStringEnd => {
                if OperatorName::Call.precedence() < min_prec {
                    parser.restore_checkpoint(cp);
                    break;
                };
                if assignment_level {
                    return Err(t.unexpected());
                };
                let (parts, end) = parse_template_parts(parser, &t)?;
                left = Node::new(
                    left.loc() + &end,
                    Syntax::TaggedTemplateExpr { tag: left, parts },
                );
                continue;
            }
            _ => {}
        };

        match multary_operator(t.typ()) {
            None => {
                if asi.can_end_with_asi
                    && (t.preceded_by_line_terminator()
                        || t.typ() == TokenType::BraceClose
                        || t.typ() == TokenType::EOF)
                {
                    // Automatic Semicolon Insertion.
                    parser.restore_checkpoint(cp);
                    asi.did_end_with_asi = true;
                    break;
                };
                return Err(t.unexpected());
            }
            Some(operator) => {
                if operator.precedence() < min_prec {
                    parser.restore_checkpoint(cp);
                    break;
                };
                if assignment_level && operator.precedence() > assignment_precedence() {
                    if asi.can_end_with_asi && t.preceded_by_line_terminator() {
                        parser.restore_checkpoint(cp);
                        asi.did_end_with_asi = true;
                        break;
                    };
                    return Err(t.unexpected());
                };

                if let Some(prev) = bare_logical {
                    if operator.is_logical()
                        && (prev == OperatorName::NullishCoalescing)
                            != (operator == OperatorName::NullishCoalescing)
                    {
                        return Err(SyntaxError::from_loc(
                            t.loc(),
                            SyntaxErrorType::NullishCoalescingMixedWithLogical,
                        ));
                    };
                };
                bare_logical = operator.is_logical().then_some(operator);

                let next_min_prec = match operator {
                    // Keeps a bare `&&` out of the right operand so it is caught above.
                    OperatorName::NullishCoalescing => OperatorName::LogicalAnd.precedence() + 1,
                    _ => operator.operand_min_precedence(),
                };

                left = match operator {
                    OperatorName::Call | OperatorName::OptionalChainingCall => {
                        let arguments = parse_call_args(parser)?;
                        let end = parser.require(TokenType::ParenthesisClose)?;
                        Node::new(
                            left.loc() + end.loc(),
                            Syntax::CallExpr {
                                optional_chaining: operator == OperatorName::OptionalChainingCall,
                                parenthesised: false,
                                callee: left,
                                arguments,
                            },
                        )
                    }
                    OperatorName::ComputedMemberAccess
                    | OperatorName::OptionalChainingComputedMemberAccess => {
                        let member = parse_expr(parser, TokenType::BracketClose)?;
                        let end = parser.require(TokenType::BracketClose)?;
                        Node::new(
                            left.loc() + end.loc(),
                            Syntax::ComputedMemberExpr {
                                optional_chaining: operator
                                    == OperatorName::OptionalChainingComputedMemberAccess,
                                parenthesised: false,
                                object: left,
                                member,
                            },
                        )
                    }
                    OperatorName::Conditional => {
                        let consequent = parse_expr_with_min_prec(
                            parser,
                            assignment_precedence(),
                            TokenType::Colon,
                            TokenType::_Dummy,
                            false,
                            &mut Asi::no(),
                        )?;
                        parser.require(TokenType::Colon)?;
                        let alternate = parse_expr_with_min_prec(
                            parser,
                            assignment_precedence(),
                            terminator_a,
                            terminator_b,
                            false,
                            asi,
                        )?;
                        Node::new(
                            left.loc() + alternate.loc(),
                            Syntax::ConditionalExpr {
                                test: left,
                                consequent,
                                alternate,
                            },
                        )
                    }
                    OperatorName::MemberAccess | OperatorName::OptionalChainingMemberAccess => {
                        let right = parse_expr_member_name(parser)?;
                        Node::new(
                            left.loc() + &right,
                            Syntax::MemberExpr {
                                parenthesised: false,
                                optional_chaining: operator
                                    == OperatorName::OptionalChainingMemberAccess,
                                left,
                                right,
                            },
                        )
                    }
                    OperatorName::Comma => {
                        let right = parse_expr_with_min_prec(
                            parser,
                            next_min_prec,
                            terminator_a,
                            terminator_b,
                            false,
                            asi,
                        )?;
                        let loc = left.loc() + right.loc();
                        let left_loc = left.loc().clone();
                        let mut elements = match left.into_stx() {
                            Syntax::SequenceExpr { elements } => elements,
                            stx => vec![Node::new(left_loc, stx)],
                        };
                        elements.push(right);
                        Node::new(loc, Syntax::SequenceExpr { elements })
                    }
                    _ => {
                        if operator.is_assignment() {
                            left = convert_assignment_lhs_to_target(left, operator)?;
                        };
                        let right = parse_expr_with_min_prec(
                            parser,
                            next_min_prec,
                            terminator_a,
                            terminator_b,
                            false,
                            asi,
                        )?;
                        Node::new(
                            left.loc() + right.loc(),
                            Syntax::BinaryExpr {
                                operator,
                                left,
                                right,
                            },
                        )
                    }
                };
                assignment_level = false;
            }
        };
    }

    if parenthesised {
        match left.stx_mut() {
            Syntax::CallExpr {
                ref mut parenthesised,
                ..
            }
            | Syntax::ComputedMemberExpr {
                ref mut parenthesised,
                ..
            }
            | Syntax::MemberExpr {
                ref mut parenthesised,
                ..
            } => {
                *parenthesised = true;
            }
            _ => {}
        };
    };

    Ok(left)
}
