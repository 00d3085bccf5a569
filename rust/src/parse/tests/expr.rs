use serde_json::json;

use crate::parse::expr::parse_expr;
use crate::token::TokenType;
use crate::util::test::*;

fn ident(name: &str) -> serde_json::Value {
    json!({
        "$t": "IdentifierExpr",
        "name": name,
    })
}

fn num(value: f64) -> serde_json::Value {
    json!({
        "$t": "LiteralNumberExpr",
        "value": value,
    })
}

#[test]
fn test_parse_expression_conditional() {
    let mut parser = p("a ? b : c;");
    let expr = parse_expr(&mut parser, TokenType::Semicolon).unwrap();
    assert_json_eq(
        &serialise(&expr),
        &json!({
            "$t": "ConditionalExpr",
            "test": ident("a"),
            "consequent": ident("b"),
            "alternate": ident("c"),
        }),
    );
}

#[test]
fn test_parse_expression_conditional_alternate_is_assignment_level() {
    assert_json_eq(
        &parse_expr_json("a ? b : c = d, e"),
        &json!({
            "$t": "SequenceExpr",
            "elements": [
                {
                    "$t": "ConditionalExpr",
                    "test": ident("a"),
                    "consequent": ident("b"),
                    "alternate": {
                        "$t": "BinaryExpr",
                        "operator": "Assignment",
                        "left": {
                            "$t": "IdentifierPattern",
                            "name": "c",
                        },
                        "right": ident("d"),
                    },
                },
                ident("e"),
            ],
        }),
    );
}

#[test]
fn test_parse_expression_comma_is_flattened() {
    assert_json_eq(
        &parse_expr_json("a, b, c"),
        &json!({
            "$t": "SequenceExpr",
            "elements": [ident("a"), ident("b"), ident("c")],
        }),
    );
}

#[test]
fn test_parse_expression_precedence() {
    assert_json_eq(
        &parse_expr_json("1 + 2 * 3 ** 2 ** 1"),
        &json!({
            "$t": "BinaryExpr",
            "operator": "Addition",
            "left": num(1.0),
            "right": {
                "$t": "BinaryExpr",
                "operator": "Multiplication",
                "left": num(2.0),
                "right": {
                    "$t": "BinaryExpr",
                    "operator": "Exponentiation",
                    "left": num(3.0),
                    "right": {
                        "$t": "BinaryExpr",
                        "operator": "Exponentiation",
                        "left": num(2.0),
                        "right": num(1.0),
                    },
                },
            },
        }),
    );
}

#[test]
fn test_parse_expression_arrow_function() {
    assert_json_eq(
        &parse_expr_json("(a, b) => a"),
        &json!({
            "$t": "ArrowFunctionExpr",
            "async": false,
            "signature": {
                "$t": "FunctionSignature",
                "parameters": [
                    {
                        "$t": "ParamDecl",
                        "rest": false,
                        "pattern": {
                            "$t": "IdentifierPattern",
                            "name": "a",
                        },
                        "default_value": null,
                    },
                    {
                        "$t": "ParamDecl",
                        "rest": false,
                        "pattern": {
                            "$t": "IdentifierPattern",
                            "name": "b",
                        },
                        "default_value": null,
                    },
                ],
            },
            "body": ident("a"),
        }),
    );
}

#[test]
fn test_parse_expression_grouping_is_not_arrow() {
    assert_json_eq(
        &parse_expr_json("(a, b) * c"),
        &json!({
            "$t": "BinaryExpr",
            "operator": "Multiplication",
            "left": {
                "$t": "SequenceExpr",
                "elements": [ident("a"), ident("b")],
            },
            "right": ident("c"),
        }),
    );
}

#[test]
fn test_parse_expression_new() {
    assert_json_eq(
        &parse_expr_json("new a.b(c)"),
        &json!({
            "$t": "NewExpr",
            "callee": {
                "$t": "MemberExpr",
                "parenthesised": false,
                "optional_chaining": false,
                "left": ident("a"),
                "right": "b",
            },
            "arguments": [
                {
                    "$t": "CallArg",
                    "spread": false,
                    "value": ident("c"),
                },
            ],
        }),
    );
    assert_json_eq(
        &parse_expr_json("new a"),
        &json!({
            "$t": "NewExpr",
            "callee": ident("a"),
            "arguments": [],
        }),
    );
}

#[test]
fn test_parse_expression_destructuring_assignment() {
    assert_json_eq(
        &parse_expr_json("[a, b = 1] = c"),
        &json!({
            "$t": "BinaryExpr",
            "operator": "Assignment",
            "left": {
                "$t": "ArrayPattern",
                "elements": [
                    {
                        "target": {
                            "$t": "IdentifierPattern",
                            "name": "a",
                        },
                        "default_value": null,
                    },
                    {
                        "target": {
                            "$t": "IdentifierPattern",
                            "name": "b",
                        },
                        "default_value": num(1.0),
                    },
                ],
                "rest": null,
            },
            "right": ident("c"),
        }),
    );
}

#[test]
fn test_parse_expression_yield_in_generator() {
    let body = parse_body_json("function* f() { yield a, yield* b }");
    assert_json_eq(
        &body[0]["body"]["body"][0]["expression"],
        &json!({
            "$t": "SequenceExpr",
            "elements": [
                {
                    "$t": "YieldExpr",
                    "delegate": false,
                    "argument": ident("a"),
                },
                {
                    "$t": "YieldExpr",
                    "delegate": true,
                    "argument": ident("b"),
                },
            ],
        }),
    );
}

#[test]
fn test_parse_expression_yield_without_argument() {
    let body = parse_body_json("function* f() { x = yield; }");
    assert_json_eq(
        &body[0]["body"]["body"][0]["expression"]["right"],
        &json!({
            "$t": "YieldExpr",
            "delegate": false,
            "argument": null,
        }),
    );
}

#[test]
fn test_parse_expression_yield_outside_generator_is_identifier() {
    assert_json_eq(
        &parse_expr_json("yield * 2"),
        &json!({
            "$t": "BinaryExpr",
            "operator": "Multiplication",
            "left": ident("yield"),
            "right": num(2.0),
        }),
    );
}

#[test]
fn test_parse_expression_optional_chaining() {
    assert_json_eq(
        &parse_expr_json("a?.b"),
        &json!({
            "$t": "MemberExpr",
            "parenthesised": false,
            "optional_chaining": true,
            "left": ident("a"),
            "right": "b",
        }),
    );
}

#[test]
fn test_parse_expression_template() {
    assert_json_eq(
        &parse_expr_json("`a${b}c`"),
        &json!({
            "$t": "LiteralTemplateExpr",
            "parts": [
                { "string": "a" },
                { "substitution": ident("b") },
                { "string": "c" },
            ],
        }),
    );
}

#[test]
fn test_parse_expression_invalid_assignment_targets() {
    assert_eq!(parse_err_message("a + b = c"), "Invalid assignment target");
    assert_eq!(parse_err_message("a() = 1"), "Invalid assignment target");
    assert_eq!(parse_err_message("a?.b = 1"), "Invalid assignment target");
    assert_eq!(parse_err_message("[a] += 1"), "Invalid assignment target");
}

#[test]
fn test_parse_expression_unexpected_tokens() {
    assert_eq!(parse_err_message("a +"), "Unexpected token: eof (end of input)");
    assert_eq!(parse_err_message("a b"), "Unexpected token: name (b)");
    assert_eq!(parse_err_message("(a"), "Unexpected token: eof (end of input)");
    assert_eq!(parse_err_message("a = ]"), "Unexpected token: punc (])");
}

#[test]
fn test_parse_expression_nullish_coalescing_mixing() {
    let message = "Nullish coalescing cannot be mixed with || or && without parentheses";
    for src in ["a ?? b || c", "a || b ?? c", "a ?? b && c", "a && b ?? c", "x || a && b ?? c"] {
        assert_eq!(parse_err_message(src), message, "{}", src);
    }
    let expr = parse_expr_json("(a ?? b) || c && d");
    assert_eq!(expr["operator"], "LogicalOr");
    assert_eq!(expr["left"]["operator"], "NullishCoalescing");
    let expr = parse_expr_json("a ?? (b && c) ?? d");
    assert_eq!(expr["operator"], "NullishCoalescing");
    assert_eq!(expr["left"]["right"]["operator"], "LogicalAnd");
    let expr = parse_expr_json("a ?? b | c");
    assert_eq!(expr["right"]["operator"], "BitwiseOr");
    parse_ok("x = a ?? b ? c || d : e && f");
}
