use ahash::AHashSet;

use crate::ast::{Node, Syntax};
use crate::error::{SyntaxError, SyntaxErrorType, SyntaxResult};
use crate::parse::context::ContextFrame;
use crate::parse::expr::parse_expr_until_either;
use crate::parse::parser::Parser;
use crate::parse::pattern::{check_yield_name, is_eval_or_arguments, parse_pattern, pattern_names, BindingKind};
use crate::parse::stmt::parse_function_body;
use crate::source::SourceRange;
use crate::token::TokenType;

/// Parses `(...)`. Must be called with the frame of the function the parameters belong to.
pub fn parse_signature_function(parser: &mut Parser) -> SyntaxResult<Node> {
    let start_pos = parser.checkpoint();

    let mut parameters = Vec::new();
    parser.require(TokenType::ParenthesisOpen)?;
    parser.in_params(|parser| {
        loop {
            let param_start = parser.checkpoint();
            if parser.consume_if(TokenType::ParenthesisClose)?.is_match() {
                break;
            };

            let rest = parser.consume_if(TokenType::DotDotDot)?.is_match();
            let pattern = parse_pattern(parser, BindingKind::Parameter)?;
            let default_value = parser.consume_if(TokenType::Equals)?.and_then(|| {
                parse_expr_until_either(parser, TokenType::Comma, TokenType::ParenthesisClose)
            })?;

            parameters.push(Node::new(
                parser.since_checkpoint(&param_start),
                Syntax::ParamDecl {
                    rest,
                    pattern,
                    default_value,
                },
            ));

            // A rest parameter must be last.
            if rest || !parser.consume_if(TokenType::Comma)?.is_match() {
                parser.require(TokenType::ParenthesisClose)?;
                break;
            };
        }
        Ok(())
    })?;

    Ok(Node::new(
        parser.since_checkpoint(&start_pos),
        Syntax::FunctionSignature { parameters },
    ))
}

/// Early errors on parameter names that depend on the body, as a "use strict" directive there
/// makes the parameters strict too. `unique` forbids duplicates even in sloppy code.
pub fn check_param_names(
    names: &[&SourceRange],
    outer_strict: bool,
    is_strict: bool,
    unique: bool,
) -> SyntaxResult<()> {
    let mut seen = AHashSet::new();
    for &name in names {
        if is_strict && !outer_strict {
            check_yield_name(name, false, true, BindingKind::Parameter)?;
        };
        if is_strict && is_eval_or_arguments(name) {
            return Err(SyntaxError::from_loc(
                name,
                SyntaxErrorType::EvalOrArgumentsInStrictMode(name.as_str().to_string()),
            ));
        };
        if !seen.insert(name.as_str()) && (is_strict || unique) {
            return Err(SyntaxError::from_loc(
                name,
                SyntaxErrorType::DuplicateParameter(name.as_str().to_string()),
            ));
        };
    }
    Ok(())
}

/// Arrow functions and methods pass `unique`. Parameter lists with defaults, rest or patterns
/// never allow duplicates.
pub fn check_params(signature: &Node, outer_strict: bool, is_strict: bool, unique: bool) -> SyntaxResult<()> {
    let Syntax::FunctionSignature { parameters } = signature.stx() else {
        return Ok(());
    };
    let mut names = Vec::new();
    let mut simple = true;
    for param in parameters {
        if let Syntax::ParamDecl {
            rest,
            pattern,
            default_value,
        } = param.stx()
        {
            simple &= !rest
                && default_value.is_none()
                && matches!(pattern.stx(), Syntax::IdentifierPattern { .. });
            pattern_names(pattern, &mut names);
        };
    }
    check_param_names(&names, outer_strict, is_strict, unique || !simple)
}

pub struct ParsedFunction {
    pub signature: Node,
    pub body: Node,
    // The body has a "use strict" directive and the surrounding code is not strict.
    pub became_strict: bool,
}

/// Parses the parameters and body of a function in a new frame.
pub fn parse_function(parser: &mut Parser, is_generator: bool, is_async: bool) -> SyntaxResult<ParsedFunction> {
    let frame = parser.ctx().function(is_generator, is_async);
    parse_function_in_frame(parser, frame, false)
}

/// Like `parse_function`, but `super` is allowed and parameter names must be unique.
pub fn parse_method(parser: &mut Parser, is_generator: bool, is_async: bool) -> SyntaxResult<ParsedFunction> {
    let frame = parser.ctx().method(is_generator, is_async);
    parse_function_in_frame(parser, frame, true)
}

fn parse_function_in_frame(parser: &mut Parser, frame: ContextFrame, unique: bool) -> SyntaxResult<ParsedFunction> {
    let outer_strict = parser.ctx().is_strict;
    let ((signature, body), frame) = parser.with_frame(frame, |p| {
        let signature = parse_signature_function(p)?;
        let body = parse_function_body(p)?;
        Ok((signature, body))
    })?;
    check_params(&signature, outer_strict, frame.is_strict, unique)?;
    Ok(ParsedFunction {
        signature,
        body,
        became_strict: frame.is_strict && !outer_strict,
    })
}
