use crate::ast::{ClassMember, ClassOrObjectMemberKey, ClassOrObjectMemberValue, Node, Syntax};
use crate::error::SyntaxResult;
use crate::parse::expr::{parse_expr, parse_expr_until_either_with_asi, Asi};
use crate::parse::literal::parse_class_or_object_member_key;
use crate::parse::parser::Parser;
use crate::parse::pattern::{
    check_binding_name, check_reference_name, is_binding_identifier, parse_pattern, pattern_names,
    BindingKind,
};
use crate::parse::signature::{check_param_names, parse_method, ParsedFunction};
use crate::parse::stmt::parse_function_body;
use crate::source::SourceRange;
use crate::token::TokenType;

pub struct ParsedClass {
    pub loc: SourceRange,
    pub name: Option<Node>,
    pub extends: Option<Node>,
    pub members: Vec<ClassMember>,
}

/// Parses `class Name extends Base { ... }`. Everything after `class` is strict.
pub fn parse_class(parser: &mut Parser, name_required: bool) -> SyntaxResult<ParsedClass> {
    let start = parser.require(TokenType::KeywordClass)?.loc_take();
    let frame = parser.ctx().class_body();
    let ((name, extends, members, end), _) = parser.with_frame(frame, |p| {
        let name = p
            .consume_if_pred(|t| is_binding_identifier(t.typ()))?
            .match_loc_take();
        match &name {
            Some(name) => check_binding_name(p, name, BindingKind::Declaration)?,
            None if name_required => return Err(p.peek()?.unexpected()),
            None => {}
        };
        let extends = if p.consume_if(TokenType::KeywordExtends)?.is_match() {
            Some(parse_expr(p, TokenType::BraceOpen)?)
        } else {
            None
        };
        let (members, end) = parse_class_body(p)?;
        Ok((name, extends, members, end))
    })?;
    Ok(ParsedClass {
        loc: &start + &end,
        name: name.map(|name| Node::new(name.clone(), Syntax::ClassOrFunctionName { name })),
        extends,
        members,
    })
}

fn parse_class_body(parser: &mut Parser) -> SyntaxResult<(Vec<ClassMember>, SourceRange)> {
    parser.require(TokenType::BraceOpen)?;
    let mut members = Vec::<ClassMember>::new();
    while parser.peek()?.typ() != TokenType::BraceClose {
        if parser.consume_if(TokenType::Semicolon)?.is_match() {
            continue;
        };
        // `static` precedes every other modifier.
        let checkpoint = parser.checkpoint();
        let mut statik = parser.consume_if(TokenType::KeywordStatic)?.is_match();
        if statik {
            match parser.peek()?.typ() {
                // A member named `static`.
                TokenType::ParenthesisOpen
                | TokenType::Equals
                | TokenType::Semicolon
                | TokenType::BraceClose => {
                    parser.restore_checkpoint(checkpoint);
                    statik = false;
                }
                _ => {}
            };
        };
        let ParseClassOrObjectMemberResult { key, value } = parse_class_or_object_member(
            parser,
            TokenType::Equals,
            TokenType::Semicolon,
            &mut Asi::can(),
        )?;
        parser.consume_if(TokenType::Semicolon)?;
        members.push(ClassMember { key, statik, value });
    }
    let end = parser.require(TokenType::BraceClose)?.loc_take();
    Ok((members, end))
}

pub struct ParseClassOrObjectMemberResult {
    pub key: ClassOrObjectMemberKey,
    pub value: ClassOrObjectMemberValue,
}

fn parse_getter(parser: &mut Parser) -> SyntaxResult<ClassOrObjectMemberValue> {
    let frame = parser.ctx().method(false, false);
    let (body, _) = parser.with_frame(frame, |p| {
        p.require(TokenType::ParenthesisOpen)?;
        p.require(TokenType::ParenthesisClose)?;
        parse_function_body(p)
    })?;
    Ok(ClassOrObjectMemberValue::Getter { body })
}

fn parse_setter(parser: &mut Parser) -> SyntaxResult<ClassOrObjectMemberValue> {
    let outer_strict = parser.ctx().is_strict;
    let frame = parser.ctx().method(false, false);
    let ((parameter, body), frame) = parser.with_frame(frame, |p| {
        p.require(TokenType::ParenthesisOpen)?;
        let parameter = p.in_params(|p| parse_pattern(p, BindingKind::Parameter))?;
        p.require(TokenType::ParenthesisClose)?;
        let body = parse_function_body(p)?;
        Ok((parameter, body))
    })?;
    let mut names = Vec::new();
    pattern_names(&parameter, &mut names);
    check_param_names(&names, outer_strict, frame.is_strict, true)?;
    Ok(ClassOrObjectMemberValue::Setter { body, parameter })
}

// Member forms:
// <key> [ '=' <expr> ]? [ <asi> | ';' ]
// async? '*'? <key> '(' ...
// [ get | set ] <key> '(' ...
// where <key> = <ident> | <keyword> | <str> | <num> | '[' <expr> ']'
// Object literals use `:` as the value delimiter, and a key without a value is a shorthand.
pub fn parse_class_or_object_member(
    parser: &mut Parser,
    value_delimiter: TokenType,
    statement_delimiter: TokenType,
    property_initialiser_asi: &mut Asi,
) -> SyntaxResult<ParseClassOrObjectMemberResult> {
    let is_object = value_delimiter == TokenType::Colon;
    let checkpoint = parser.checkpoint();
    let mut is_getter = false;
    let mut is_setter = false;
    let mut is_async = false;
    if parser.consume_if(TokenType::KeywordGet)?.is_match() {
        is_getter = true;
    } else if parser.consume_if(TokenType::KeywordSet)?.is_match() {
        is_setter = true;
    } else if parser.consume_if(TokenType::KeywordAsync)?.is_match() {
        is_async = true;
    }
    if is_getter || is_setter || is_async {
        let next_tok = parser.peek()?;
        let is_key = match next_tok.typ() {
            t if t == value_delimiter || t == statement_delimiter => true,
            TokenType::ParenthesisOpen | TokenType::BraceClose | TokenType::Equals | TokenType::Semicolon => true,
            // `async` must be on the same line as the method name.
            _ => is_async && next_tok.preceded_by_line_terminator(),
        };
        if is_key {
            // `get`, `set` or `async` used as the key itself.
            parser.restore_checkpoint(checkpoint);
            is_getter = false;
            is_setter = false;
            is_async = false;
        };
    }
    if (is_getter || is_setter) && parser.peek()?.typ() == TokenType::Asterisk {
        return Err(parser.peek()?.unexpected());
    };
    let is_generator = parser.consume_if(TokenType::Asterisk)?.is_match();
    let key_tok = parser.peek()?;
    let key = parse_class_or_object_member_key(parser)?;
    // `get` and `set` are followed by `(` too, so they're checked before methods. Any `async` or `*`
    // prefix forces a method.
    let value = if is_getter {
        parse_getter(parser)?
    } else if is_setter {
        parse_setter(parser)?
    } else if is_generator || is_async || parser.peek()?.typ() == TokenType::ParenthesisOpen {
        let ParsedFunction {
            signature, body, ..
        } = parse_method(parser, is_generator, is_async)?;
        ClassOrObjectMemberValue::Method {
            is_async,
            generator: is_generator,
            signature,
            body,
        }
    } else if match key {
        ClassOrObjectMemberKey::Direct(_) => match parser.peek()? {
            // Given `class A {1}`, `"1" in new A`.
            t if t.typ() == TokenType::BraceClose => true,
            // Given `class A {1;}`, `"1" in new A`.
            t if t.typ() == statement_delimiter => true,
            // Given `class A {1\n2}`, `"2" in new A`.
            t if property_initialiser_asi.can_end_with_asi && t.preceded_by_line_terminator() => {
                true
            }
            _ => false,
        },
        _ => false,
    } {
        if is_object {
            // Shorthand, which references a variable of the same name.
            if !is_binding_identifier(key_tok.typ()) {
                return Err(parser.peek()?.unexpected());
            };
            check_reference_name(parser, key_tok.loc())?;
        };
        ClassOrObjectMemberValue::Property { initializer: None }
    } else {
        parser.require(value_delimiter)?;
        let value = if is_object {
            parse_expr_until_either_with_asi(
                parser,
                statement_delimiter,
                TokenType::BraceClose,
                property_initialiser_asi,
            )?
        } else {
            // Class field initialisers are evaluated like a method body.
            let frame = parser.ctx().method(false, false);
            parser
                .with_frame(frame, |p| {
                    parse_expr_until_either_with_asi(
                        p,
                        statement_delimiter,
                        TokenType::BraceClose,
                        property_initialiser_asi,
                    )
                })?
                .0
        };
        ClassOrObjectMemberValue::Property {
            initializer: Some(value),
        }
    };
    Ok(ParseClassOrObjectMemberResult { key, value })
}
