use serde_json::{to_string_pretty, to_value, Value};
use similar::{ChangeTag, TextDiff};

use crate::ast::{Node, Syntax};
use crate::error::SyntaxError;
use crate::lex::Lexer;
use crate::parse::parser::Parser;
use crate::parse::toplevel::TopLevelMode;
use crate::{parse, Program};

/// A parser over `code` in script mode, positioned at the start.
pub fn p(code: &str) -> Parser {
    Parser::new(Lexer::new(code), TopLevelMode::Global)
}

pub fn parse_ok(code: &str) -> Program {
    match parse(code, TopLevelMode::Global) {
        Ok(program) => program,
        Err(err) => panic!("failed to parse {:?}: {}", code, err),
    }
}

pub fn parse_err(code: &str) -> SyntaxError {
    match parse(code, TopLevelMode::Global) {
        Ok(program) => panic!("expected {:?} to fail, got {:?}", code, program.top_level),
        Err(err) => err,
    }
}

pub fn parse_err_message(code: &str) -> String {
    parse_err(code).message()
}

/// Serialised statements of the top level of `code`.
pub fn parse_body_json(code: &str) -> Value {
    let program = parse_ok(code);
    match program.top_level.stx() {
        Syntax::TopLevel { body } => serialise_all(body),
        _ => unreachable!(),
    }
}

/// Serialised expression of `code`, which must be a single expression statement.
pub fn parse_expr_json(code: &str) -> Value {
    let program = parse_ok(code);
    let body = program.body();
    assert_eq!(body.len(), 1, "expected one statement in {:?}", code);
    match body[0].stx() {
        Syntax::ExpressionStmt { expression } => serialise(expression),
        stx => panic!("expected an expression statement, got {:?}", stx),
    }
}

/// The node as JSON: its syntax tagged with `$t`, locations omitted and ranges as their text.
pub fn serialise(node: &Node) -> Value {
    to_value(node).unwrap()
}

pub fn serialise_all(nodes: &[Node]) -> Value {
    to_value(nodes).unwrap()
}

pub fn assert_json_eq(actual: &Value, expected: &Value) {
    if actual != expected {
        let expected_fmt = to_string_pretty(expected).unwrap();
        let actual_fmt = to_string_pretty(actual).unwrap();
        let mut msg = "JSON mismatch:\n".to_string();
        let diff = TextDiff::from_lines(&expected_fmt, &actual_fmt);
        for change in diff.iter_all_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };
            msg.push_str(sign);
            msg.push_str(change.as_str().unwrap());
            if change.missing_newline() {
                msg.push('\n');
            };
        }
        panic!("{}", msg);
    }
}

/// Line diff of two code strings, for readable failures on long outputs.
pub fn assert_code_eq(actual: &str, expected: &str) {
    if actual != expected {
        let mut msg = format!("code mismatch:\nexpected: {}\nactual:   {}\n", expected, actual);
        let expected_lines = expected.replace(';', ";\n");
        let actual_lines = actual.replace(';', ";\n");
        let diff = TextDiff::from_lines(&expected_lines, &actual_lines);
        for change in diff.iter_all_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };
            msg.push_str(sign);
            msg.push_str(change.as_str().unwrap());
            if change.missing_newline() {
                msg.push('\n');
            };
        }
        panic!("{}", msg);
    }
}
