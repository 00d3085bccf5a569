use serde_json::json;

use crate::ast::Syntax;
use crate::parse::toplevel::TopLevelMode;
use crate::parse;
use crate::util::test::*;

#[test]
fn test_parse_stmt_asi() {
    let body = parse_body_json("a\nb\n;c");
    assert_eq!(body.as_array().unwrap().len(), 3);
    for stmt in body.as_array().unwrap() {
        assert_eq!(stmt["$t"], "ExpressionStmt");
    }
}

#[test]
fn test_parse_stmt_asi_does_not_split_binary_operators() {
    let body = parse_body_json("a\n+b");
    assert_json_eq(
        &body,
        &json!([
            {
                "$t": "ExpressionStmt",
                "expression": {
                    "$t": "BinaryExpr",
                    "operator": "Addition",
                    "left": {
                        "$t": "IdentifierExpr",
                        "name": "a",
                    },
                    "right": {
                        "$t": "IdentifierExpr",
                        "name": "b",
                    },
                },
            },
        ]),
    );
}

#[test]
fn test_parse_stmt_return_asi() {
    let body = parse_body_json("function f() { return\na }");
    assert_json_eq(
        &body[0]["body"]["body"],
        &json!([
            {
                "$t": "ReturnStmt",
                "value": null,
            },
            {
                "$t": "ExpressionStmt",
                "expression": {
                    "$t": "IdentifierExpr",
                    "name": "a",
                },
            },
        ]),
    );
}

#[test]
fn test_parse_stmt_var() {
    let body = parse_body_json("let a = 1, [b] = c");
    assert_json_eq(
        &body,
        &json!([
            {
                "$t": "VarStmt",
                "declaration": {
                    "$t": "VarDecl",
                    "mode": "Let",
                    "declarators": [
                        {
                            "pattern": {
                                "$t": "IdentifierPattern",
                                "name": "a",
                            },
                            "initializer": {
                                "$t": "LiteralNumberExpr",
                                "value": 1.0,
                            },
                        },
                        {
                            "pattern": {
                                "$t": "ArrayPattern",
                                "elements": [
                                    {
                                        "target": {
                                            "$t": "IdentifierPattern",
                                            "name": "b",
                                        },
                                        "default_value": null,
                                    },
                                ],
                                "rest": null,
                            },
                            "initializer": {
                                "$t": "IdentifierExpr",
                                "name": "c",
                            },
                        },
                    ],
                },
            },
        ]),
    );
}

#[test]
fn test_parse_stmt_let_as_identifier() {
    let body = parse_body_json("let = 1");
    assert_eq!(body[0]["$t"], "ExpressionStmt");
    assert_eq!(body[0]["expression"]["left"]["name"], "let");
}

#[test]
fn test_parse_stmt_for_of() {
    let body = parse_body_json("for (const [a, b] of c) d()");
    let header = &body[0]["header"]["inOf"];
    assert_eq!(header["of"], true);
    assert_eq!(header["await"], false);
    assert_eq!(header["lhs"]["declaration"]["mode"], "Const");
    assert_eq!(header["rhs"]["name"], "c");
}

#[test]
fn test_parse_stmt_for_in_with_pattern() {
    let body = parse_body_json("for (a.b in c);");
    assert_json_eq(
        &body[0]["header"]["inOf"]["lhs"],
        &json!({
            "pattern": {
                "$t": "MemberExpr",
                "parenthesised": false,
                "optional_chaining": false,
                "left": {
                    "$t": "IdentifierExpr",
                    "name": "a",
                },
                "right": "b",
            },
        }),
    );
    assert_eq!(body[0]["body"]["$t"], "EmptyStmt");
}

#[test]
fn test_parse_stmt_for_three() {
    let body = parse_body_json("for (var i = 0; i < 1; i++) {}");
    let header = &body[0]["header"]["three"];
    assert_eq!(header["init"]["declaration"]["mode"], "Var");
    assert_eq!(header["condition"]["operator"], "LessThan");
    assert_eq!(header["post"]["operator"], "PostfixIncrement");
}

#[test]
fn test_parse_stmt_for_await() {
    let body = parse_body_json("async function f() { for await (const a of b); }");
    assert_eq!(body[0]["body"]["body"][0]["header"]["inOf"]["await"], true);
    assert_eq!(
        parse_err_message("function f() { for await (const a of b); }"),
        "Unexpected token: name (await)"
    );
}

#[test]
fn test_parse_stmt_directives() {
    let program = parse_ok("'use strict'; \"other\"\n a");
    assert!(program.strict);
    assert_json_eq(
        &parse_body_json("'use strict'; \"other\"\n a"),
        &json!([
            {
                "$t": "DirectiveStmt",
                "raw": "'use strict'",
            },
            {
                "$t": "DirectiveStmt",
                "raw": "\"other\"",
            },
            {
                "$t": "ExpressionStmt",
                "expression": {
                    "$t": "IdentifierExpr",
                    "name": "a",
                },
            },
        ]),
    );
}

#[test]
fn test_parse_stmt_string_expression_is_not_directive() {
    let program = parse_ok("'use strict' + 1");
    assert!(!program.strict);
    assert!(matches!(program.body()[0].stx(), Syntax::ExpressionStmt { .. }));
    let program = parse_ok("a; 'use strict'");
    assert!(!program.strict);
}

#[test]
fn test_parse_stmt_labels() {
    let body = parse_body_json("a: b: for (;;) { continue a; }");
    assert_eq!(body[0]["$t"], "LabelStmt");
    assert_eq!(body[0]["name"], "a");
    assert_eq!(body[0]["statement"]["name"], "b");
    assert_eq!(
        body[0]["statement"]["statement"]["body"]["body"][0],
        json!({
            "$t": "ContinueStmt",
            "label": "a",
        })
    );
}

#[test]
fn test_parse_stmt_label_errors() {
    assert_eq!(parse_err_message("a: { break b; }"), "Undefined label b");
    assert_eq!(parse_err_message("a: a: ;"), "Label a defined twice");
    assert_eq!(
        parse_err_message("a: { for (;;) continue a; }"),
        "Continue label a does not refer to a loop"
    );
    assert_eq!(
        parse_err_message("a: for (;;) { (function () { break a; }); }"),
        "Undefined label a"
    );
    // A label can be reused once its statement ends.
    parse_ok("a: ; a: ;");
    parse_ok("a: { break a; }");
}

#[test]
fn test_parse_stmt_jump_errors() {
    assert_eq!(parse_err_message("break;"), "break not inside a loop or switch");
    assert_eq!(parse_err_message("continue;"), "continue not inside a loop");
    assert_eq!(
        parse_err_message("switch (a) { case 1: continue; }"),
        "continue not inside a loop"
    );
    assert_eq!(
        parse_err_message("for (;;) { function f() { break; } }"),
        "break not inside a loop or switch"
    );
    parse_ok("switch (a) { case 1: break; default: }");
    parse_ok("while (1) { if (a) continue; else break; }");
    parse_ok("do x(); while (a) y()");
}

#[test]
fn test_parse_stmt_return_outside_function() {
    assert_eq!(parse_err_message("return 1"), "'return' outside of function");
    parse_ok("() => { return 1 }");
}

#[test]
fn test_parse_stmt_with() {
    parse_ok("with (a) b");
    assert_eq!(
        parse_err_message("'use strict'; with (a) b"),
        "Strict mode code may not include a with statement"
    );
    assert!(parse("with (a) b", TopLevelMode::Module).is_err());
}

#[test]
fn test_parse_stmt_throw_newline() {
    assert_eq!(parse_err_message("throw\na"), "Illegal newline after throw");
}

#[test]
fn test_parse_stmt_try() {
    let body = parse_body_json("try {} catch {} finally {}");
    assert_eq!(body[0]["catch"]["parameter"], json!(null));
    assert_eq!(body[0]["finally"]["$t"], "BlockStmt");
    assert_eq!(parse_err_message("try {}"), "Missing catch or finally after try");
}

#[test]
fn test_parse_stmt_import_and_export() {
    let program = parse("import a, {b as c, d} from 'm'; export {c as e}; export default 1; export * from \"n\"", TopLevelMode::Module).unwrap();
    let body = program.body();
    assert_eq!(body.len(), 4);
    let json = serialise(&body[0]);
    assert_json_eq(
        &json,
        &json!({
            "$t": "ImportStmt",
            "default": {
                "$t": "IdentifierPattern",
                "name": "a",
            },
            "names": {
                "specific": [
                    {
                        "target": "b",
                        "alias": {
                            "$t": "IdentifierPattern",
                            "name": "c",
                        },
                    },
                    {
                        "target": "d",
                        "alias": {
                            "$t": "IdentifierPattern",
                            "name": "d",
                        },
                    },
                ],
            },
            "module": "m",
        }),
    );
    assert_eq!(serialise(&body[1])["$t"], "ExportListStmt");
    assert_eq!(serialise(&body[2])["$t"], "ExportDefaultExprStmt");
    assert_eq!(serialise(&body[3])["names"], json!({ "all": null }));
    assert_eq!(serialise(&body[3])["from"], "n");
}

#[test]
fn test_parse_stmt_import_expression() {
    let body = parse_body_json("import('a').then(b)");
    assert_eq!(body[0]["$t"], "ExpressionStmt");
}

#[test]
fn test_parse_stmt_class() {
    let body = parse_body_json("class A extends B { static x = 1; get y() {} static() {} #z; }");
    let members = body[0]["members"].as_array().unwrap();
    assert_eq!(members.len(), 4);
    assert_eq!(members[0]["static"], true);
    assert_eq!(members[0]["key"], "x");
    assert_eq!(members[1]["value"]["getter"]["body"]["$t"], "BlockStmt");
    assert_eq!(members[2]["static"], false);
    assert_eq!(members[2]["key"], "static");
    assert_eq!(members[3]["key"], "#z");
    assert_eq!(body[0]["extends"]["name"], "B");
}

#[test]
fn test_parse_stmt_object_members() {
    let body = parse_body_json("({ a, b: 1, get c() {}, async *d() {}, [e]: 2, ...f })");
    let members = body[0]["expression"]["members"].as_array().unwrap();
    assert_eq!(members[0]["typ"], json!({ "shorthand": { "name": "a" } }));
    assert_eq!(members[2]["typ"]["valued"]["key"], "c");
    assert_eq!(
        members[3]["typ"]["valued"]["value"]["method"]["generator"],
        true
    );
    assert_eq!(members[3]["typ"]["valued"]["value"]["method"]["async"], true);
    assert_eq!(members[4]["typ"]["valued"]["key"]["name"], "e");
    assert_eq!(members[5]["typ"]["rest"]["value"]["name"], "f");
}

#[test]
fn test_parse_stmt_accessors() {
    let body = parse_body_json("({ get a() { return 1 }, set a(v) {}, get() {}, set: 1, get })");
    let members = body[0]["expression"]["members"].as_array().unwrap();
    let value = |i: usize| &members[i]["typ"]["valued"]["value"];
    assert_eq!(value(0)["getter"]["body"]["$t"], "BlockStmt");
    assert_eq!(value(1)["setter"]["parameter"]["$t"], "IdentifierPattern");
    assert_eq!(members[2]["typ"]["valued"]["key"], "get");
    assert_eq!(value(2)["method"]["generator"], false);
    assert_eq!(members[3]["typ"]["valued"]["key"], "set");
    assert_eq!(members[4]["typ"], json!({ "shorthand": { "name": "get" } }));

    let body = parse_body_json("class A { static set b(v) {} get [c]() {} }");
    let members = body[0]["members"].as_array().unwrap();
    assert_eq!(members[0]["static"], true);
    assert!(members[0]["value"]["setter"].is_object());
    assert!(members[1]["value"]["getter"].is_object());

    parse_err("({ get *a() {} })");
    parse_err("class A { set *b(v) {} }");
}
