use std::mem;

use crate::ast::{ExportName, ExportNames, ForInOfStmtHeaderLhs, ForStmtHeader, ForThreeInit, Node, Syntax};
use crate::error::{SyntaxErrorType, SyntaxResult};
use crate::operator::OperatorName;
use crate::parse::context::Label;
use crate::parse::decl::{parse_decl_class, parse_decl_function, parse_decl_var, VarDeclParseMode};
use crate::parse::expr::{
    convert_assignment_lhs_to_target, parse_expr, parse_expr_until_either, parse_expr_until_either_with_asi,
    parse_expr_with_asi, parse_expr_with_min_prec, Asi,
};
use crate::parse::literal::parse_and_normalise_literal_string;
use crate::parse::operator::multary_operator;
use crate::parse::parser::Parser;
use crate::parse::pattern::{check_binding_name, is_binding_identifier, parse_pattern, BindingKind};
use crate::source::SourceRange;
use crate::token::{Token, TokenType};

fn is_identifier_name_token(typ: TokenType) -> bool {
    typ == TokenType::Identifier || typ.is_keyword()
}

fn identifier_pattern(name: SourceRange) -> Node {
    Node::new(name.clone(), Syntax::IdentifierPattern { name })
}

// Parses `a`, `a as b`, `default as b`. For imports, the alias is checked as a new binding.
fn parse_import_or_export_name(parser: &mut Parser, is_import: bool) -> SyntaxResult<ExportName> {
    let target = parser.require_predicate(is_identifier_name_token)?;
    let alias = if parser.consume_if(TokenType::KeywordAs)?.is_match() {
        if is_import {
            parser.require_predicate(is_binding_identifier)?.loc_take()
        } else {
            parser.require_predicate(is_identifier_name_token)?.loc_take()
        }
    } else {
        if is_import && !is_binding_identifier(target.typ()) {
            return Err(target.unexpected());
        };
        target.loc().clone()
    };
    if is_import {
        check_binding_name(parser, &alias, BindingKind::Declaration)?;
    };
    Ok(ExportName {
        target: target.loc_take(),
        alias: identifier_pattern(alias),
    })
}

fn parse_import_or_export_names(parser: &mut Parser, is_import: bool) -> SyntaxResult<Vec<ExportName>> {
    parser.require(TokenType::BraceOpen)?;
    let mut names = Vec::<ExportName>::new();
    loop {
        if parser.consume_if(TokenType::BraceClose)?.is_match() {
            break;
        };
        names.push(parse_import_or_export_name(parser, is_import)?);
        if !parser.consume_if(TokenType::Comma)?.is_match() {
            parser.require(TokenType::BraceClose)?;
            break;
        };
    }
    Ok(names)
}

// Whether a string token followed by this token on the next line continues the expression, so it
// isn't a directive.
fn continues_expression(typ: TokenType) -> bool {
    multary_operator(typ).is_some()
        || matches!(
            typ,
            TokenType::LiteralTemplatePartString | TokenType::LiteralTemplatePartStringEnd
        )
}

/// Parses the directives at the start of a script or function body. A "use strict" directive makes
/// the current frame strict.
pub fn parse_directive_prologue(parser: &mut Parser) -> SyntaxResult<Vec<Node>> {
    let mut directives = Vec::new();
    loop {
        let cp = parser.checkpoint();
        let t = parser.next()?;
        if t.typ() != TokenType::LiteralString {
            parser.restore_checkpoint(cp);
            break;
        };
        let after = parser.peek()?;
        let is_directive = match after.typ() {
            TokenType::Semicolon => {
                parser.consume_peeked();
                true
            }
            TokenType::BraceClose | TokenType::EOF => true,
            typ => after.preceded_by_line_terminator() && !continues_expression(typ),
        };
        if !is_directive {
            parser.restore_checkpoint(cp);
            break;
        };
        let raw = t.loc().as_str();
        // Only the exact text counts; `"use\x20strict"` is just a string.
        if &raw[1..raw.len() - 1] == "use strict" {
            parser.ctx_mut().is_strict = true;
        };
        directives.push(Node::new(
            t.loc().clone(),
            Syntax::DirectiveStmt {
                raw: raw.to_string(),
            },
        ));
    }
    Ok(directives)
}

/// Parses a function body block, including its directive prologue. Must be called with the
/// function's frame.
pub fn parse_function_body(parser: &mut Parser) -> SyntaxResult<Node> {
    let start = parser.require(TokenType::BraceOpen)?;
    let mut body = parse_directive_prologue(parser)?;
    loop {
        if let Some(end_loc) = parser.consume_if(TokenType::BraceClose)?.match_loc() {
            return Ok(Node::new(start.loc() + end_loc, Syntax::BlockStmt { body }));
        };
        body.push(parse_stmt(parser)?);
    }
}

// Tokens after `let` that make it a declaration rather than an identifier.
fn starts_let_declaration(parser: &mut Parser) -> SyntaxResult<bool> {
    let second = parser.peek_second()?.typ();
    Ok(is_binding_identifier(second) || second == TokenType::BracketOpen || second == TokenType::BraceOpen)
}

pub fn parse_stmt(parser: &mut Parser) -> SyntaxResult<Node> {
    let t = parser.peek()?;
    if is_binding_identifier(t.typ()) && parser.peek_second()?.typ() == TokenType::Colon {
        return parse_stmt_label(parser);
    };

    // Labels directly preceding a loop can be targeted by `continue`.
    let direct_labels = mem::take(&mut parser.ctx_mut().direct_labels);
    if matches!(
        t.typ(),
        TokenType::KeywordDo | TokenType::KeywordFor | TokenType::KeywordWhile
    ) {
        let labels = &mut parser.ctx_mut().labels;
        let first = labels.len() - direct_labels;
        for label in &mut labels[first..] {
            label.is_loop = true;
        }
    };

    match t.typ() {
        TokenType::BraceOpen => parse_stmt_block(parser),
        TokenType::KeywordBreak => parse_stmt_break(parser),
        TokenType::KeywordClass => parse_decl_class(parser, true),
        TokenType::KeywordConst | TokenType::KeywordVar => parse_stmt_var(parser),
        TokenType::KeywordLet if starts_let_declaration(parser)? => parse_stmt_var(parser),
        TokenType::KeywordContinue => parse_stmt_continue(parser),
        TokenType::KeywordDebugger => parse_stmt_debugger(parser),
        TokenType::KeywordDo => parse_stmt_do_while(parser),
        TokenType::KeywordExport => parse_stmt_export(parser),
        TokenType::KeywordFor => parse_stmt_for(parser),
        TokenType::KeywordFunction => parse_decl_function(parser, true),
        TokenType::KeywordAsync => {
            let second = parser.peek_second()?;
            if second.typ() == TokenType::KeywordFunction && !second.preceded_by_line_terminator() {
                parse_decl_function(parser, true)
            } else {
                parse_stmt_expression(parser)
            }
        }
        TokenType::KeywordIf => parse_stmt_if(parser),
        TokenType::KeywordImport => parse_stmt_import_or_expr_import(parser),
        TokenType::KeywordReturn => parse_stmt_return(parser),
        TokenType::KeywordSwitch => parse_stmt_switch(parser),
        TokenType::KeywordThrow => parse_stmt_throw(parser),
        TokenType::KeywordTry => parse_stmt_try(parser),
        TokenType::KeywordWhile => parse_stmt_while(parser),
        TokenType::KeywordWith => parse_stmt_with(parser),
        TokenType::Semicolon => parse_stmt_empty(parser),
        _ => parse_stmt_expression(parser),
    }
}

fn check_label_name(parser: &Parser, t: &Token) -> SyntaxResult<()> {
    if t.loc().as_str() == "yield" {
        if parser.ctx().is_generator {
            return Err(t.error(SyntaxErrorType::YieldLabelInGenerator));
        };
        if parser.ctx().is_strict {
            return Err(t.error(SyntaxErrorType::YieldIdentifierInStrictMode));
        };
    };
    Ok(())
}

pub fn parse_stmt_label(parser: &mut Parser) -> SyntaxResult<Node> {
    let t = parser.require_predicate(is_binding_identifier)?;
    check_label_name(parser, &t)?;
    if parser.ctx().find_label(t.loc()).is_some() {
        return Err(t.error(SyntaxErrorType::DuplicateLabel(
            t.loc().as_str().to_string(),
        )));
    };
    parser.require(TokenType::Colon)?;
    let ctx = parser.ctx_mut();
    ctx.labels.push(Label {
        name: t.loc().clone(),
        is_loop: false,
    });
    ctx.direct_labels += 1;
    let statement = parse_stmt(parser);
    parser.ctx_mut().labels.pop();
    let statement = statement?;
    Ok(Node::new(
        t.loc() + statement.loc(),
        Syntax::LabelStmt {
            name: t.loc_take(),
            statement,
        },
    ))
}

pub fn parse_stmt_empty(parser: &mut Parser) -> SyntaxResult<Node> {
    let loc = parser.require(TokenType::Semicolon)?.loc_take();
    Ok(Node::new(loc, Syntax::EmptyStmt {}))
}

pub fn parse_stmt_block(parser: &mut Parser) -> SyntaxResult<Node> {
    let start = parser.require(TokenType::BraceOpen)?;
    let mut body: Vec<Node> = Vec::new();
    loop {
        if let Some(end_loc) = parser.consume_if(TokenType::BraceClose)?.match_loc() {
            return Ok(Node::new(start.loc() + end_loc, Syntax::BlockStmt { body }));
        };
        body.push(parse_stmt(parser)?);
    }
}

pub fn parse_stmt_var(parser: &mut Parser) -> SyntaxResult<Node> {
    let declaration = parse_decl_var(parser, VarDeclParseMode::Asi)?;
    Ok(Node::new(
        declaration.loc().clone(),
        Syntax::VarStmt { declaration },
    ))
}

struct BreakOrContinue {
    loc: SourceRange,
    label: Option<SourceRange>,
}

fn parse_stmt_break_or_continue(parser: &mut Parser, t: TokenType) -> SyntaxResult<BreakOrContinue> {
    let start = parser.require(t)?;
    let mut loc = start.loc().clone();
    let next = parser.peek()?;
    let label = if is_binding_identifier(next.typ()) && !next.preceded_by_line_terminator() {
        parser.consume_peeked();
        loc.extend(next.loc());
        Some(next)
    } else {
        None
    };
    match &label {
        Some(label) => {
            check_label_name(parser, label)?;
            match parser.ctx().find_label(label.loc()) {
                None => {
                    return Err(label.error(SyntaxErrorType::UndefinedLabel(
                        label.loc().as_str().to_string(),
                    )))
                }
                Some(target) if t == TokenType::KeywordContinue && !target.is_loop => {
                    return Err(label.error(SyntaxErrorType::ContinueLabelNotLoop(
                        label.loc().as_str().to_string(),
                    )))
                }
                Some(_) => {}
            };
        }
        None => {
            let ctx = parser.ctx();
            if t == TokenType::KeywordBreak && !ctx.in_loop && !ctx.in_switch {
                return Err(start.error(SyntaxErrorType::BreakOutsideLoopOrSwitch));
            };
            if t == TokenType::KeywordContinue && !ctx.in_loop {
                return Err(start.error(SyntaxErrorType::ContinueOutsideLoop));
            };
        }
    };
    parser.require_semicolon_or_asi()?;
    Ok(BreakOrContinue {
        loc,
        label: label.map(|l| l.loc_take()),
    })
}

pub fn parse_stmt_break(parser: &mut Parser) -> SyntaxResult<Node> {
    let stmt = parse_stmt_break_or_continue(parser, TokenType::KeywordBreak)?;
    Ok(Node::new(stmt.loc, Syntax::BreakStmt { label: stmt.label }))
}

pub fn parse_stmt_continue(parser: &mut Parser) -> SyntaxResult<Node> {
    let stmt = parse_stmt_break_or_continue(parser, TokenType::KeywordContinue)?;
    Ok(Node::new(stmt.loc, Syntax::ContinueStmt { label: stmt.label }))
}

pub fn parse_stmt_debugger(parser: &mut Parser) -> SyntaxResult<Node> {
    let loc = parser.require(TokenType::KeywordDebugger)?.loc_take();
    parser.require_semicolon_or_asi()?;
    Ok(Node::new(loc, Syntax::DebuggerStmt {}))
}

// https://tc39.es/ecma262/#sec-exports
// https://jakearchibald.com/2021/export-default-thing-vs-thing-as-default/
pub fn parse_stmt_export(parser: &mut Parser) -> SyntaxResult<Node> {
    let start = parser.checkpoint();
    parser.require(TokenType::KeywordExport)?;
    let cp = parser.checkpoint();
    let t = parser.next()?;
    let stx = match t.typ() {
        TokenType::BraceOpen => {
            parser.restore_checkpoint(cp);
            let names = parse_import_or_export_names(parser, false)?;
            let from = parser
                .consume_if(TokenType::KeywordFrom)?
                .and_then(|| parse_and_normalise_literal_string(parser))?;
            parser.require_semicolon_or_asi()?;
            Syntax::ExportListStmt {
                names: ExportNames::Specific(names),
                from,
            }
        }
        TokenType::Asterisk => {
            let alias = if parser.consume_if(TokenType::KeywordAs)?.is_match() {
                let alias = parser.require_predicate(is_identifier_name_token)?.loc_take();
                // Not exposed within the module's scope.
                Some(identifier_pattern(alias))
            } else {
                None
            };
            parser.require(TokenType::KeywordFrom)?;
            let from = parse_and_normalise_literal_string(parser)?;
            parser.require_semicolon_or_asi()?;
            Syntax::ExportListStmt {
                names: ExportNames::All(alias),
                from: Some(from),
            }
        }
        TokenType::KeywordDefault => {
            let next = parser.peek()?;
            let is_async_function = next.typ() == TokenType::KeywordAsync && {
                let second = parser.peek_second()?;
                second.typ() == TokenType::KeywordFunction && !second.preceded_by_line_terminator()
            };
            match next.typ() {
                // `export default class` and `export default function` are declarations, and may be unnamed.
                TokenType::KeywordFunction => Syntax::ExportDeclStmt {
                    declaration: parse_decl_function(parser, false)?,
                    default: true,
                },
                TokenType::KeywordAsync if is_async_function => Syntax::ExportDeclStmt {
                    declaration: parse_decl_function(parser, false)?,
                    default: true,
                },
                TokenType::KeywordClass => Syntax::ExportDeclStmt {
                    declaration: parse_decl_class(parser, false)?,
                    default: true,
                },
                _ => {
                    let mut asi = Asi::can();
                    let expression = parse_expr_until_either_with_asi(
                        parser,
                        TokenType::Semicolon,
                        TokenType::_Dummy,
                        &mut asi,
                    )?;
                    if !asi.did_end_with_asi {
                        parser.require_semicolon_or_asi()?;
                    };
                    Syntax::ExportDefaultExprStmt { expression }
                }
            }
        }
        TokenType::KeywordVar
        | TokenType::KeywordLet
        | TokenType::KeywordConst
        | TokenType::KeywordFunction
        | TokenType::KeywordAsync
        | TokenType::KeywordClass => {
            // Rewind so the declaration parser sees its keyword.
            parser.restore_checkpoint(cp);
            let declaration = parse_stmt(parser)?;
            match declaration.stx() {
                Syntax::VarStmt { .. } | Syntax::FunctionDecl { .. } | Syntax::ClassDecl { .. } => {}
                _ => return Err(t.unexpected()),
            };
            Syntax::ExportDeclStmt {
                declaration,
                default: false,
            }
        }
        _ => return Err(t.unexpected()),
    };
    Ok(Node::new(parser.since_checkpoint(&start), stx))
}

// Produces a statement node; callers needing an expression must not use it.
pub fn parse_stmt_expression(parser: &mut Parser) -> SyntaxResult<Node> {
    let mut asi = Asi::can();
    let expression = parse_expr_with_asi(parser, TokenType::Semicolon, &mut asi)?;
    if !asi.did_end_with_asi {
        parser.require(TokenType::Semicolon)?;
    };
    Ok(Node::new(
        expression.loc().clone(),
        Syntax::ExpressionStmt { expression },
    ))
}

pub fn parse_stmt_for(parser: &mut Parser) -> SyntaxResult<Node> {
    let start = parser.require(TokenType::KeywordFor)?;
    let await_tok = parser.peek()?;
    let is_await = await_tok.typ() == TokenType::KeywordAwait;
    if is_await {
        if !parser.ctx().is_async {
            return Err(await_tok.unexpected());
        };
        parser.consume_peeked();
    };
    parser.require(TokenType::ParenthesisOpen)?;
    enum LhsRaw {
        Declaration(Node),
        Expression(Node),
        Empty,
    }
    let lhs_raw = match parser.peek()?.typ() {
        TokenType::KeywordVar | TokenType::KeywordConst => {
            LhsRaw::Declaration(parse_decl_var(parser, VarDeclParseMode::Leftmost)?)
        }
        TokenType::KeywordLet if starts_let_declaration(parser)? => {
            LhsRaw::Declaration(parse_decl_var(parser, VarDeclParseMode::Leftmost)?)
        }
        TokenType::Semicolon => LhsRaw::Empty,
        // `in` is not allowed unparenthesised in the header, so it's used as a terminator.
        _ => LhsRaw::Expression(parse_expr_with_min_prec(
            parser,
            1,
            TokenType::Semicolon,
            TokenType::KeywordIn,
            false,
            &mut Asi::no(),
        )?),
    };
    let t = parser.peek()?;
    let header = match t.typ() {
        TokenType::KeywordOf | TokenType::KeywordIn => {
            // for-of or for-in statement.
            parser.consume_peeked();
            let of = t.typ() == TokenType::KeywordOf;
            if is_await && !of {
                return Err(t.unexpected());
            };
            let lhs = match lhs_raw {
                LhsRaw::Empty => return Err(t.unexpected()),
                LhsRaw::Declaration(node) => {
                    match node.stx() {
                        Syntax::VarDecl { declarators, .. } if declarators.len() == 1 => {}
                        _ => return Err(t.unexpected()),
                    };
                    ForInOfStmtHeaderLhs::Declaration(node)
                }
                LhsRaw::Expression(expr) => ForInOfStmtHeaderLhs::Pattern(
                    convert_assignment_lhs_to_target(expr, OperatorName::Assignment)?,
                ),
            };
            let rhs = if of {
                parse_expr_until_either(parser, TokenType::ParenthesisClose, TokenType::_Dummy)?
            } else {
                parse_expr(parser, TokenType::ParenthesisClose)?
            };
            parser.require(TokenType::ParenthesisClose)?;
            ForStmtHeader::InOf {
                of,
                is_await,
                lhs,
                rhs,
            }
        }
        _ => {
            // for statement.
            if is_await {
                return Err(t.unexpected());
            };
            parser.require(TokenType::Semicolon)?;
            let init = match lhs_raw {
                LhsRaw::Declaration(decl) => ForThreeInit::Declaration(decl),
                LhsRaw::Expression(expr) => ForThreeInit::Expression(expr),
                LhsRaw::Empty => ForThreeInit::None,
            };
            let condition = if parser.consume_if(TokenType::Semicolon)?.is_match() {
                None
            } else {
                let expr = parse_expr(parser, TokenType::Semicolon)?;
                parser.require(TokenType::Semicolon)?;
                Some(expr)
            };
            let post = if parser.consume_if(TokenType::ParenthesisClose)?.is_match() {
                None
            } else {
                let expr = parse_expr(parser, TokenType::ParenthesisClose)?;
                parser.require(TokenType::ParenthesisClose)?;
                Some(expr)
            };
            ForStmtHeader::Three {
                init,
                condition,
                post,
            }
        }
    };
    let body = parser.in_loop_body(parse_stmt)?;
    Ok(Node::new(
        start.loc() + body.loc(),
        Syntax::ForStmt { header, body },
    ))
}

pub fn parse_stmt_if(parser: &mut Parser) -> SyntaxResult<Node> {
    let start = parser.require(TokenType::KeywordIf)?;
    parser.require(TokenType::ParenthesisOpen)?;
    let test = parse_expr(parser, TokenType::ParenthesisClose)?;
    parser.require(TokenType::ParenthesisClose)?;
    let consequent = parse_stmt(parser)?;
    let alternate = if parser.consume_if(TokenType::KeywordElse)?.is_match() {
        Some(parse_stmt(parser)?)
    } else {
        None
    };
    let end = alternate.as_ref().unwrap_or(&consequent).loc().clone();
    Ok(Node::new(
        start.loc() + &end,
        Syntax::IfStmt {
            test,
            consequent,
            alternate,
        },
    ))
}

pub fn parse_stmt_import_or_expr_import(parser: &mut Parser) -> SyntaxResult<Node> {
    let cp = parser.checkpoint();
    parser.require(TokenType::KeywordImport)?;
    let next = parser.peek()?;
    if next.typ() == TokenType::ParenthesisOpen || next.typ() == TokenType::Dot {
        parser.restore_checkpoint(cp);
        return parse_stmt_expression(parser);
    };

    // `import "module";` only runs the module.
    if next.typ() == TokenType::LiteralString {
        let module = parse_and_normalise_literal_string(parser)?;
        parser.require_semicolon_or_asi()?;
        return Ok(Node::new(
            parser.since_checkpoint(&cp),
            Syntax::ImportStmt {
                default: None,
                names: None,
                module,
            },
        ));
    };

    let (default, can_have_names) = if let Some(alias) = parser
        .consume_if_pred(|t| is_binding_identifier(t.typ()))?
        .match_loc_take()
    {
        check_binding_name(parser, &alias, BindingKind::Declaration)?;
        (
            Some(identifier_pattern(alias)),
            parser.consume_if(TokenType::Comma)?.is_match(),
        )
    } else {
        (None, true)
    };
    let names = if !can_have_names {
        None
    } else if parser.consume_if(TokenType::Asterisk)?.is_match() {
        parser.require(TokenType::KeywordAs)?;
        let alias = parser.require_predicate(is_binding_identifier)?.loc_take();
        check_binding_name(parser, &alias, BindingKind::Declaration)?;
        Some(ExportNames::All(Some(identifier_pattern(alias))))
    } else {
        Some(ExportNames::Specific(parse_import_or_export_names(parser, true)?))
    };
    parser.require(TokenType::KeywordFrom)?;
    let module = parse_and_normalise_literal_string(parser)?;
    parser.require_semicolon_or_asi()?;
    Ok(Node::new(
        parser.since_checkpoint(&cp),
        Syntax::ImportStmt {
            default,
            names,
            module,
        },
    ))
}

pub fn parse_stmt_return(parser: &mut Parser) -> SyntaxResult<Node> {
    let start = parser.require(TokenType::KeywordReturn)?;
    if !parser.ctx().in_function {
        return Err(start.error(SyntaxErrorType::ReturnOutsideFunction));
    };
    let mut loc = start.loc().clone();
    let next = parser.peek()?;
    let value = if next.preceded_by_line_terminator()
        || next.typ() == TokenType::BraceClose
        || next.typ() == TokenType::EOF
    {
        // Automatic Semicolon Insertion.
        None
    } else if parser.consume_if(TokenType::Semicolon)?.is_match() {
        None
    } else {
        let mut asi = Asi::can();
        let value = parse_expr_with_asi(parser, TokenType::Semicolon, &mut asi)?;
        if !asi.did_end_with_asi {
            parser.require(TokenType::Semicolon)?;
        };
        loc.extend(value.loc());
        Some(value)
    };
    Ok(Node::new(loc, Syntax::ReturnStmt { value }))
}

pub fn parse_stmt_throw(parser: &mut Parser) -> SyntaxResult<Node> {
    let start = parser.require(TokenType::KeywordThrow)?;
    if parser.peek()?.preceded_by_line_terminator() {
        // `throw` then a newline can't be completed by ASI.
        return Err(start.error(SyntaxErrorType::LineTerminatorAfterThrow));
    }
    let mut asi = Asi::can();
    let value = parse_expr_with_asi(parser, TokenType::Semicolon, &mut asi)?;
    if !asi.did_end_with_asi {
        parser.require(TokenType::Semicolon)?;
    };
    Ok(Node::new(
        start.loc() + value.loc(),
        Syntax::ThrowStmt { value },
    ))
}

pub fn parse_stmt_try(parser: &mut Parser) -> SyntaxResult<Node> {
    let start = parser.require(TokenType::KeywordTry)?;
    let mut loc = start.loc().clone();
    let wrapped = parse_stmt_block(parser)?;
    let catch = if let Some(catch_loc) = parser.consume_if(TokenType::KeywordCatch)?.match_loc_take() {
        let parameter = if parser.consume_if(TokenType::ParenthesisOpen)?.is_match() {
            let pattern = parse_pattern(parser, BindingKind::Declaration)?;
            parser.require(TokenType::ParenthesisClose)?;
            Some(pattern)
        } else {
            None
        };
        let body = parse_stmt_block(parser)?;
        loc.extend(body.loc());
        Some(Node::new(
            &catch_loc + body.loc(),
            Syntax::CatchBlock { parameter, body },
        ))
    } else {
        None
    };
    let finally = if parser.consume_if(TokenType::KeywordFinally)?.is_match() {
        let body = parse_stmt_block(parser)?;
        loc.extend(body.loc());
        Some(body)
    } else {
        None
    };
    if catch.is_none() && finally.is_none() {
        return Err(start.error(SyntaxErrorType::TryWithoutCatchOrFinally));
    }
    Ok(Node::new(
        loc,
        Syntax::TryStmt {
            wrapped,
            catch,
            finally,
        },
    ))
}

pub fn parse_stmt_while(parser: &mut Parser) -> SyntaxResult<Node> {
    let start = parser.require(TokenType::KeywordWhile)?;
    parser.require(TokenType::ParenthesisOpen)?;
    let condition = parse_expr(parser, TokenType::ParenthesisClose)?;
    parser.require(TokenType::ParenthesisClose)?;
    let body = parser.in_loop_body(parse_stmt)?;
    Ok(Node::new(
        start.loc() + body.loc(),
        Syntax::WhileStmt { condition, body },
    ))
}

pub fn parse_stmt_do_while(parser: &mut Parser) -> SyntaxResult<Node> {
    let start = parser.require(TokenType::KeywordDo)?;
    let body = parser.in_loop_body(parse_stmt)?;
    parser.require(TokenType::KeywordWhile)?;
    parser.require(TokenType::ParenthesisOpen)?;
    let condition = parse_expr(parser, TokenType::ParenthesisClose)?;
    let end = parser.require(TokenType::ParenthesisClose)?;
    // A semicolon is always inserted after `do ... while (...)`.
    parser.consume_if(TokenType::Semicolon)?;
    Ok(Node::new(
        start.loc() + end.loc(),
        Syntax::DoWhileStmt { condition, body },
    ))
}

pub fn parse_stmt_switch(parser: &mut Parser) -> SyntaxResult<Node> {
    let start = parser.require(TokenType::KeywordSwitch)?;
    parser.require(TokenType::ParenthesisOpen)?;
    let test = parse_expr(parser, TokenType::ParenthesisClose)?;
    parser.require(TokenType::ParenthesisClose)?;
    parser.require(TokenType::BraceOpen)?;
    let branches = parser.in_switch_body(|parser| {
        let mut branches = Vec::<Node>::new();
        while parser.peek()?.typ() != TokenType::BraceClose {
            let mut loc = parser.peek()?.loc_take();
            let case = if parser.consume_if(TokenType::KeywordCase)?.is_match() {
                Some(parse_expr(parser, TokenType::Colon)?)
            } else {
                parser.require(TokenType::KeywordDefault)?;
                None
            };
            loc.extend(parser.require(TokenType::Colon)?.loc());
            let mut body: Vec<Node> = Vec::new();
            loop {
                match parser.peek()?.typ() {
                    TokenType::KeywordCase | TokenType::KeywordDefault | TokenType::BraceClose => break,
                    _ => {
                        let stmt = parse_stmt(parser)?;
                        loc.extend(stmt.loc());
                        body.push(stmt);
                    }
                }
            }
            branches.push(Node::new(loc, Syntax::SwitchBranch { case, body }));
        }
        Ok(branches)
    })?;
    let end = parser.require(TokenType::BraceClose)?;
    Ok(Node::new(
        start.loc() + end.loc(),
        Syntax::SwitchStmt { test, branches },
    ))
}

pub fn parse_stmt_with(parser: &mut Parser) -> SyntaxResult<Node> {
    let start = parser.require(TokenType::KeywordWith)?;
    if parser.ctx().is_strict {
        return Err(start.error(SyntaxErrorType::WithInStrictMode));
    };
    parser.require(TokenType::ParenthesisOpen)?;
    let object = parse_expr(parser, TokenType::ParenthesisClose)?;
    parser.require(TokenType::ParenthesisClose)?;
    let body = parse_stmt(parser)?;
    Ok(Node::new(
        start.loc() + body.loc(),
        Syntax::WithStmt { object, body },
    ))
}
