use crate::error::MinifyError;
use crate::util::test::assert_code_eq;
use crate::{minify, CompressOptions, EmitOptions, MangleOptions, Options, TopLevelMode};

fn minified(src: &str, options: &Options) -> String {
    match minify(src, options) {
        Ok(minified) => minified.code,
        Err(err) => panic!("failed to minify {:?}: {}", src, err),
    }
}

fn uncompressed() -> Options {
    Options::default()
}

fn compressed_only() -> Options {
    Options {
        compress: Some(CompressOptions::all()),
        ..Options::default()
    }
}

#[test]
fn test_minify_generator_end_to_end() {
    assert_code_eq(
        &minified(
            "function *foo(bar) { yield 1; yield 2; return 3; }",
            &Options::recommended(),
        ),
        "function*foo(e){return yield 1,yield 2,3}",
    );
}

#[test]
fn test_minify_yield_undefined() {
    let src = "function *f() { yield undefined; yield; yield* undefined; yield void 0}";
    assert_code_eq(
        &minified(src, &uncompressed()),
        "function*f(){yield undefined;yield;yield*undefined;yield void 0}",
    );
    assert_code_eq(
        &minified(src, &compressed_only()),
        "function*f(){yield,yield,yield*void 0,yield}",
    );
}

#[test]
fn test_minify_folds_constants() {
    assert_code_eq(
        &minified("function *f() { yield 3-4; }", &compressed_only()),
        "function*f(){yield-1}",
    );
}

#[test]
fn test_minify_output_reparses_to_itself() {
    for src in [
        "function *foo(bar) { yield 1; yield 2; return 3; }",
        "var a = { b: 1, c }; if (a) { for (const k in a) console.log(k, a[k]) }",
        "x = function (a, b) { 'use strict'; return a ? b : -b }",
        "try { f() } catch ({ message }) { g(message) } finally { h() }",
        "label: while (true) { if (a) break label; else continue }",
        "x = `a${b}c`; y = 10n; z = { get d() { return y }, set d(v) { y = v } }",
    ] {
        let first = minified(src, &Options::recommended());
        let second = minified(&first, &uncompressed());
        assert_code_eq(&second, &first);
    }
}

#[test]
fn test_minify_beautified_output_reparses_to_itself() {
    let options = Options {
        emit: EmitOptions { beautify: true },
        ..Options::recommended()
    };
    let first = minified("function f(a) { if (a) { g(a); h() } return a + 1 }", &options);
    let second = minified(&first, &Options {
        emit: EmitOptions { beautify: true },
        ..Options::default()
    });
    assert_code_eq(&second, &first);
}

#[test]
fn test_minify_module() {
    let options = Options {
        top_level_mode: TopLevelMode::Module,
        mangle: Some(MangleOptions {
            top_level: true,
            ..MangleOptions::default()
        }),
        ..Options::recommended()
    };
    assert_code_eq(
        &minified(
            "import { helper } from './helper.js'; const value = helper(1); export { value as result };",
            &options,
        ),
        "import{helper as e}from\"./helper.js\";const value=e(1);export{value as result}",
    );
}

#[test]
fn test_minify_reports_syntax_errors() {
    let Err(MinifyError::Syntax(err)) = minify("function* f() { yield\n*123; }", &Options::recommended())
    else {
        panic!("expected a syntax error");
    };
    assert_eq!(err.message(), "Unexpected token: operator (*)");
    assert_eq!(err.line(), 2);
    assert_eq!(err.col(), 0);

    let Err(MinifyError::Syntax(err)) = minify("function* g() {yield: 1}", &Options::recommended())
    else {
        panic!("expected a syntax error");
    };
    assert_eq!(err.message(), "Yield cannot be used as label inside generators");
    assert!(!err.typ().is_lexical());

    let Err(MinifyError::Syntax(err)) = minify("x = 'abc", &Options::recommended()) else {
        panic!("expected a syntax error");
    };
    assert!(err.typ().is_lexical());
}

#[test]
fn test_minify_strict_yield_property_names_print_unchanged() {
    let src = r#""use strict";({yield:42});({yield(){}});(class{yield(){}});class C{yield(){}}"#;
    assert_code_eq(&minified(src, &uncompressed()), src);
}

#[test]
fn test_minify_keeps_accessors() {
    let src = "x = {get a(){return 1}, set a(v){}}";
    assert_code_eq(&minified(src, &uncompressed()), "x={get a(){return 1},set a(v){}}");
    assert_code_eq(&minified(src, &Options::recommended()), "x={get a(){return 1},set a(e){}}");
    assert_code_eq(
        &minified("class A { static get b() { return 1 } set b(value) { this.c = value } }", &uncompressed()),
        "class A{static get b(){return 1}set b(value){this.c=value}}",
    );
}

#[test]
fn test_options_from_json() {
    let options: Options = serde_json::from_str(
        r#"{"top_level_mode": "module", "compress": {"passes": 3, "sequences": true}, "emit": {"beautify": true}}"#,
    )
    .unwrap();
    assert_eq!(options.top_level_mode, TopLevelMode::Module);
    let compress = options.compress.unwrap();
    assert_eq!(compress.passes, 3);
    assert!(compress.sequences);
    assert!(!compress.evaluate);
    assert!(options.mangle.is_none());
    assert!(options.emit.beautify);
}
