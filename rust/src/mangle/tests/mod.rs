use crate::emit::emit_program;
use crate::emit::EmitOptions;
use crate::mangle::mangle_program;
use crate::mangle::MangleOptions;
use crate::parse;
use crate::util::test::assert_code_eq;
use crate::TopLevelMode;

fn mangled(top_level_mode: TopLevelMode, src: &str, options: &MangleOptions) -> String {
    let mut program = parse(src, top_level_mode).unwrap();
    mangle_program(&mut program, options);
    emit_program(&program, &EmitOptions::default()).unwrap()
}

fn check(src: &str, expected: &str) -> () {
    let out = mangled(TopLevelMode::Global, src, &MangleOptions::default());
    assert_code_eq(&out, expected);
}

fn check_top_level(top_level_mode: TopLevelMode, src: &str, expected: &str) -> () {
    let options = MangleOptions {
        top_level: true,
        ..MangleOptions::default()
    };
    assert_code_eq(&mangled(top_level_mode, src, &options), expected);
}

#[test]
fn test_mangle_parameters_and_locals() {
    check(
        "function f(a, b) { var c = a + b; return c }",
        "function f(e,t){var n=e+t;return n}",
    );
    check(
        "function *foo(bar) { yield bar }",
        "function*foo(e){yield e}",
    );
    check("x = (a, b) => a * b", "x=(e,t)=>e*t");
}

#[test]
fn test_mangle_top_level_kept_by_default() {
    check(
        "var a = 1; let b = 2; function c() { return a + b }",
        "var a=1;let b=2;function c(){return a+b}",
    );
}

#[test]
fn test_mangle_top_level_when_enabled() {
    check_top_level(
        TopLevelMode::Global,
        "var a = 1; function b() { return a }",
        "var e=1;function t(){return e}",
    );
}

#[test]
fn test_mangle_blocked_by_dynamic_lookup() {
    check(
        "function f(a) { eval('a') } function g(b) { return b }",
        "function f(a){eval(\"a\")}function g(e){return e}",
    );
    check(
        "function f(a) { return function () { eval('a') } }",
        "function f(a){return function(){eval(\"a\")}}",
    );
    check("function f(a) { with (o) a }", "function f(a){with(o)a}");
}

#[test]
fn test_mangle_keeps_exported_names() {
    check_top_level(
        TopLevelMode::Module,
        "export const a = 1; const b = 2; export { b as c }; let d = a + b",
        "export const a=1;const b=2;export{b as c};let e=a+b",
    );
    check_top_level(
        TopLevelMode::Module,
        "export function f(x) { return x }",
        "export function f(e){return e}",
    );
}

#[test]
fn test_mangle_expands_shorthand() {
    check(
        "function f(a) { return {a} }",
        "function f(e){return{a:e}}",
    );
    check(
        "function f(o) { var {a} = o; return a }",
        "function f(e){var{a:t}=e;return t}",
    );
    // Keys of properties are never renamed.
    check(
        "function f(a) { return {a: a, b: a.b} }",
        "function f(e){return{a:e,b:e.b}}",
    );
}

#[test]
fn test_mangle_import_aliases() {
    check_top_level(
        TopLevelMode::Module,
        "import { a } from 'm'; import * as b from 'n'; a(b)",
        "import{a as e}from\"m\";import*as t from\"n\";e(t)",
    );
}

#[test]
fn test_mangle_reserved_names() {
    let options = MangleOptions {
        top_level: false,
        reserved: vec!["e".to_string()],
    };
    assert_code_eq(
        &mangled(TopLevelMode::Global, "function f(a, b) {}", &options),
        "function f(t,n){}",
    );
}

#[test]
fn test_mangle_avoids_inherited_names() {
    check(
        "function f(a) { return function (b) { return a + b } }",
        "function f(e){return function(t){return e+t}}",
    );
    // `e` is a global used inside, so it must not be shadowed.
    check("function f(a) { return e + a }", "function f(t){return e+t}");
    // Not used inside, so shadowing is fine.
    check(
        "function f(a) { g(a); return function (b) { return b } }",
        "function f(e){g(e);return function(e){return e}}",
    );
}

#[test]
fn test_mangle_catch_class_and_function_expression_names() {
    check(
        "try { a() } catch (err) { b(err) }",
        "try{a()}catch(e){b(e)}",
    );
    check(
        "x = class Foo { m() { return Foo } }",
        "x=class e{m(){return e}}",
    );
    check(
        "x = function foo(a) { return foo(a) }",
        "x=function e(t){return e(t)}",
    );
}

#[test]
fn test_mangle_setters_and_methods() {
    check(
        "x = { set v(value) { this._v = value }, m(a) { return a } }",
        "x={set v(e){this._v=e},m(e){return e}}",
    );
}

#[test]
fn test_mangle_redeclared_var_is_one_binding() {
    check(
        "function f() { var a = 1; var a = 2; return a }",
        "function f(){var e=1;var e=2;return e}",
    );
}
