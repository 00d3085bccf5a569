use crate::error::SyntaxErrorType;
use crate::parse::toplevel::TopLevelMode;
use crate::parse;
use crate::util::test::*;

fn is_strict_yield_message(message: &str) -> bool {
    message == "Unexpected yield identifier inside strict mode"
        || message == "Unexpected yield identifier as parameter inside strict mode"
}

#[test]
fn test_yield_newline_before_operator() {
    assert_eq!(
        parse_err_message("function* f() { yield\n*123; }"),
        "Unexpected token: operator (*)"
    );
    assert_eq!(
        parse_err_message("function* f() { yield*\n; }"),
        "Unexpected token: punc (;)"
    );
}

#[test]
fn test_yield_label_in_generator() {
    assert_eq!(
        parse_err_message("function* g() {yield: 1}"),
        "Yield cannot be used as label inside generators"
    );
    // Not a generator, so `yield` is an ordinary label.
    parse_ok("function g() {yield: 1}");
}

#[test]
fn test_yield_identifier_in_generator() {
    assert_eq!(
        *parse_err("function* g() { var yield; }").typ(),
        SyntaxErrorType::YieldIdentifierInGenerator
    );
    assert_eq!(
        *parse_err("(function* yield() {})").typ(),
        SyntaxErrorType::YieldIdentifierInGenerator
    );
    // An arrow function nested in a generator is not a generator.
    parse_ok("function* g() { () => { var yield; } }");
}

#[test]
fn test_yield_identifier_in_strict_mode() {
    let cases = [
        "import yield from \"bar\"",
        "yield = 123",
        "yield: \"123\"",
        "for(;;){break yield;}",
        "for(;;){continue yield;}",
        "function yield(){}",
        "function foo(...yield){}",
        "try{}catch(yield){}",
        "var yield = \"foo\"",
        "class yield {}",
        "var foo = yield;",
        "var foo = bar = yield",
        "var foo = {yield};",
    ];
    for case in cases {
        let code = format!("\"use strict\";{}", case);
        let message = parse_err_message(&code);
        assert!(
            is_strict_yield_message(&message),
            "{:?} failed with {:?}",
            code,
            message
        );
        // Without the directive, only class names and jump labels still fail.
        if !["class", "import", "for"].iter().any(|p| case.starts_with(p)) {
            parse_ok(case);
        };
    }
}

#[test]
fn test_yield_parameter_message_in_strict_mode() {
    assert_eq!(
        parse_err_message("'use strict'; function f(yield) {}"),
        "Unexpected yield identifier as parameter inside strict mode"
    );
}

#[test]
fn test_yield_property_names_in_strict_mode() {
    parse_ok("\"use strict\";({yield:42});({yield(){}});(class{yield(){}});class C{yield(){}}");
    parse_ok("\"use strict\"; a.yield; a = {get yield() {}}");
}

#[test]
fn test_strict_function_body_applies_to_name_and_parameters() {
    assert!(is_strict_yield_message(&parse_err_message(
        "function yield() { 'use strict'; }"
    )));
    assert_eq!(
        parse_err_message("function f(yield) { 'use strict'; }"),
        "Unexpected yield identifier as parameter inside strict mode"
    );
    assert_eq!(
        parse_err_message("(yield) => { 'use strict'; }"),
        "Unexpected yield identifier as parameter inside strict mode"
    );
    // Strictness doesn't leak out of the function.
    parse_ok("function f() { 'use strict'; } var yield;");
}

#[test]
fn test_module_code_is_strict() {
    let err = parse("var yield;", TopLevelMode::Module).unwrap_err();
    assert_eq!(*err.typ(), SyntaxErrorType::YieldIdentifierInStrictMode);
    assert!(parse("var yield;", TopLevelMode::Global).is_ok());
}

#[test]
fn test_class_bodies_are_strict() {
    assert!(is_strict_yield_message(&parse_err_message(
        "class A { m() { var yield; } }"
    )));
}

#[test]
fn test_yield_in_parameters() {
    assert_eq!(
        *parse_err("function* g(a = yield) {}").typ(),
        SyntaxErrorType::YieldInParameters
    );
    assert_eq!(
        parse_err_message("function* g() { function* h(a = yield 1) {} }"),
        "Yield expression not allowed in formal parameter"
    );
}

#[test]
fn test_yield_in_arrow_parameters() {
    assert_eq!(
        *parse_err("function* g() { (a = yield) => 1 }").typ(),
        SyntaxErrorType::YieldInParameters
    );
    assert_eq!(
        *parse_err("function* g() { (a, b = yield 1) => 1 }").typ(),
        SyntaxErrorType::YieldInParameters
    );
    // Still a grouping when no arrow follows.
    parse_ok("function* g() { (a = yield); }");
    // Outside generators `yield` is just a name.
    parse_ok("(a = yield) => 1");
}

#[test]
fn test_yield_precedence() {
    assert_eq!(
        parse_err_message("function* g() { a + yield b; }"),
        "Unexpected token: name (yield)"
    );
    parse_ok("function* g() { a = yield b; c(yield, yield d); e ? yield : yield f; }");
}

#[test]
fn test_await_is_identifier_outside_async() {
    parse_ok("var await = 1; await + 1");
    parse_ok("async function f() { await g(); }");
}

#[test]
fn test_error_position() {
    let err = parse_err("a;\nb c");
    assert_eq!(err.line(), 2);
    assert_eq!(err.col(), 2);
    assert_eq!(err.position(), 5);
}

#[test]
fn test_duplicate_parameters() {
    parse_ok("function f(a, a) {}");
    parse_ok("x = function (a, a) {}");
    for src in [
        "'use strict'; function f(a, a) {}",
        "function f(a, a) { 'use strict' }",
        "(a, a) => 1",
        "function f(a, [a]) {}",
        "function f(a, a = 1) {}",
        "x = { m(a, a) {} }",
        "class A { m(a, a) {} }",
    ] {
        assert_eq!(
            *parse_err(src).typ(),
            SyntaxErrorType::DuplicateParameter("a".to_string()),
            "{}",
            src
        );
    }
    assert_eq!(
        parse_err_message("(b, a, b) => 1"),
        "Parameter b declared twice"
    );
}

#[test]
fn test_eval_and_arguments_bindings_in_strict_mode() {
    parse_ok("var eval; function arguments() {} function f(eval) {}");
    for src in [
        "'use strict'; var eval",
        "'use strict'; let [arguments] = a",
        "'use strict'; function eval() {}",
        "'use strict'; try {} catch (eval) {}",
        "function f(arguments) { 'use strict' }",
        "'use strict'; (eval) => 1",
        "class A { set b(eval) {} }",
    ] {
        assert!(
            matches!(
                parse_err(src).typ(),
                SyntaxErrorType::EvalOrArgumentsInStrictMode(_)
            ),
            "{}",
            src
        );
    }
    assert_eq!(
        parse_err_message("'use strict'; var eval"),
        "Unexpected eval in strict mode"
    );
    // Only bindings are restricted.
    parse_ok("'use strict'; eval(a); arguments.length; x = { eval }");
}

#[test]
fn test_legacy_octal_in_strict_mode() {
    parse_ok("x = 010; y = 09; z = { 010: 1 }");
    parse_ok("'use strict'; x = 0; y = 0.5; z = 0o10");
    for src in [
        "'use strict'; x = 010",
        "'use strict'; x = 09",
        "function f() { 'use strict'; return 07 }",
        "'use strict'; x = { 010: 1 }",
        "class A { [010]() {} }",
    ] {
        assert_eq!(
            *parse_err(src).typ(),
            SyntaxErrorType::LegacyOctalInStrictMode,
            "{}",
            src
        );
    }
    assert_eq!(
        *parse("x = 010", TopLevelMode::Module).unwrap_err().typ(),
        SyntaxErrorType::LegacyOctalInStrictMode
    );
}

#[test]
fn test_super_outside_methods() {
    parse_ok("x = { m() { return super.m() } }");
    parse_ok("class A extends B { constructor() { super(); this.c = () => super.d } e = super.f }");
    parse_ok("x = { get a() { return super.a }, set a(v) { super.a = v } }");
    for src in [
        "super.x",
        "function f() { super.x }",
        "x = () => super.x",
        "class A { m() { function f() { super.x } } }",
    ] {
        assert_eq!(
            parse_err_message(src),
            "'super' keyword outside a method",
            "{}",
            src
        );
    }
}
