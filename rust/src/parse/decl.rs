use crate::ast::{Node, Syntax, VarDeclMode, VariableDeclarator};
use crate::error::SyntaxResult;
use crate::parse::class_or_object::{parse_class, ParsedClass};
use crate::parse::expr::{parse_expr_until_either_with_asi, Asi};
use crate::parse::parser::Parser;
use crate::parse::pattern::{check_binding_name, check_yield_name, is_binding_identifier, parse_pattern, BindingKind};
use crate::parse::signature::{parse_function, ParsedFunction};
use crate::token::TokenType;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum VarDeclParseMode {
    // A statement; may end with ASI.
    Asi,
    // Stops before the first token that isn't a comma, leaving it for the `for` header.
    Leftmost,
}

pub fn parse_decl_var(parser: &mut Parser, parse_mode: VarDeclParseMode) -> SyntaxResult<Node> {
    let t = parser.next()?;
    let mode = match t.typ() {
        TokenType::KeywordLet => VarDeclMode::Let,
        TokenType::KeywordConst => VarDeclMode::Const,
        TokenType::KeywordVar => VarDeclMode::Var,
        _ => return Err(t.unexpected()),
    };
    let mut declarators = vec![];
    let mut loc = t.loc().clone();
    loop {
        let pattern = parse_pattern(parser, BindingKind::Declaration)?;
        loc.extend(pattern.loc());
        let mut asi = match parse_mode {
            VarDeclParseMode::Asi => Asi::can(),
            VarDeclParseMode::Leftmost => Asi::no(),
        };
        let initializer = if parser.consume_if(TokenType::Equals)?.is_match() {
            let expr = parse_expr_until_either_with_asi(
                parser,
                TokenType::Semicolon,
                match parse_mode {
                    VarDeclParseMode::Asi => TokenType::Comma,
                    // `in` can't appear unparenthesised in a for-loop header initialiser.
                    VarDeclParseMode::Leftmost => TokenType::KeywordIn,
                },
                &mut asi,
            )?;
            loc.extend(expr.loc());
            Some(expr)
        } else {
            None
        };
        declarators.push(VariableDeclarator {
            pattern,
            initializer,
        });
        match parse_mode {
            VarDeclParseMode::Asi => {
                if parser.consume_if(TokenType::Semicolon)?.is_match() || asi.did_end_with_asi {
                    break;
                }
                let t = parser.peek()?;
                if (t.preceded_by_line_terminator() && t.typ() != TokenType::Comma)
                    || t.typ() == TokenType::BraceClose
                    || t.typ() == TokenType::EOF
                {
                    break;
                };
                parser.require(TokenType::Comma)?;
            }
            VarDeclParseMode::Leftmost => {
                if !parser.consume_if(TokenType::Comma)?.is_match() {
                    break;
                }
            }
        }
    }
    Ok(Node::new(loc, Syntax::VarDecl { mode, declarators }))
}

// Only `export default` may omit the name.
pub fn parse_decl_function(parser: &mut Parser, name_required: bool) -> SyntaxResult<Node> {
    let start = parser.checkpoint();
    let is_async = parser.consume_if(TokenType::KeywordAsync)?.is_match();
    parser.require(TokenType::KeywordFunction)?;
    let generator = parser.consume_if(TokenType::Asterisk)?.is_match();
    // The name is declared in the enclosing scope, so `function a() { let a = 1; }` is legal.
    let name = parser
        .consume_if_pred(|t| is_binding_identifier(t.typ()))?
        .match_loc_take();
    match &name {
        Some(name) => check_binding_name(parser, name, BindingKind::Declaration)?,
        None if name_required => return Err(parser.peek()?.unexpected()),
        None => {}
    };
    let ParsedFunction {
        signature,
        body,
        became_strict,
    } = parse_function(parser, generator, is_async)?;
    if let (Some(name), true) = (&name, became_strict) {
        check_yield_name(name, false, true, BindingKind::Declaration)?;
    };
    Ok(Node::new(
        parser.since_checkpoint(&start),
        Syntax::FunctionDecl {
            is_async,
            generator,
            name: name.map(|name| Node::new(name.clone(), Syntax::ClassOrFunctionName { name })),
            signature,
            body,
        },
    ))
}

// Class declarations are block scoped.
pub fn parse_decl_class(parser: &mut Parser, name_required: bool) -> SyntaxResult<Node> {
    let ParsedClass {
        loc,
        name,
        extends,
        members,
    } = parse_class(parser, name_required)?;
    Ok(Node::new(
        loc,
        Syntax::ClassDecl {
            name,
            extends,
            members,
        },
    ))
}
