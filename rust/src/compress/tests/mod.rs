use crate::compress::compress_program;
use crate::compress::CompressOptions;
use crate::emit::emit_program;
use crate::emit::EmitOptions;
use crate::parse;
use crate::util::test::assert_code_eq;
use crate::TopLevelMode;

fn only(configure: impl FnOnce(&mut CompressOptions)) -> CompressOptions {
    let mut options = CompressOptions::default();
    configure(&mut options);
    options
}

fn check(options: &CompressOptions, src: &str, expected: &str) -> () {
    let program = parse(src, TopLevelMode::Global).unwrap();
    let program = compress_program(program, options).unwrap();
    let out = emit_program(&program, &EmitOptions::default()).unwrap();
    assert_code_eq(&out, expected);
}

#[test]
fn test_compress_nothing_enabled() {
    check(
        &CompressOptions::default(),
        "if (a) { b() } var c = 1 + 2; debugger",
        "if(a){b()}var c=1+2;debugger",
    );
}

#[test]
fn test_compress_pass_limit() {
    assert_eq!(CompressOptions::default().pass_limit(), 1);
    assert_eq!(CompressOptions::all().pass_limit(), 2);
    let options = CompressOptions {
        passes: 20,
        ..CompressOptions::default()
    };
    assert_eq!(options.pass_limit(), 10);
    let options = CompressOptions {
        passes: 0,
        ..CompressOptions::default()
    };
    assert_eq!(options.pass_limit(), 1);
}

#[test]
fn test_compress_yield_undefined() {
    let options = only(|o| {
        o.yield_undefined = true;
        o.undefined_to_void = true;
        o.sequences = true;
    });
    check(
        &options,
        "function* f() { yield undefined; yield; yield* undefined; yield void 0 }",
        "function*f(){yield,yield,yield*void 0,yield}",
    );
}

#[test]
fn test_compress_yield_undefined_keeps_bound_undefined() {
    let options = only(|o| {
        o.yield_undefined = true;
        o.undefined_to_void = true;
    });
    check(
        &options,
        "function* f(undefined) { yield undefined }",
        "function*f(undefined){yield undefined}",
    );
}

#[test]
fn test_compress_generator_return_sequence() {
    check(
        &only(|o| o.sequences = true),
        "function *foo(bar) { yield 1; yield 2; return 3; }",
        "function*foo(bar){return yield 1,yield 2,3}",
    );
}

#[test]
fn test_compress_sequences() {
    let options = only(|o| o.sequences = true);
    check(&options, "a(); b(); c()", "a(),b(),c()");
    check(&options, "a(); if (b) c()", "if(a(),b)c()");
    check(&options, "a(); throw b", "throw a(),b");
    check(&options, "a(); for (;;) b()", "for(a();;)b()");
    check(&options, "a(); for (let i = 0;;) b()", "a();for(let i=0;;)b()");
    check(&options, "a(); var b = 1", "a();var b=1");
}

#[test]
fn test_compress_undefined_to_void() {
    let options = only(|o| o.undefined_to_void = true);
    check(&options, "x = undefined", "x=void 0");
    check(&options, "x = void 1", "x=void 0");
    check(&options, "x = void a()", "x=void a()");
    check(
        &options,
        "var undefined = 1; x = undefined",
        "var undefined=1;x=undefined",
    );
}

#[test]
fn test_compress_drop_debugger() {
    check(&only(|o| o.drop_debugger = true), "a(); debugger; b()", "a();b()");
}

#[test]
fn test_compress_dead_code() {
    let options = only(|o| o.dead_code = true);
    check(
        &options,
        "function f() { return 1; a(); var b = 2; function c() {} }",
        "function f(){return 1;var b;function c(){}}",
    );
    check(
        &options,
        "for (;;) { break; a() }",
        "for(;;){break}",
    );
    check(&options, "if (true) a(); else b()", "a()");
    check(&options, "if (0) a(); else b()", "b()");
    check(&options, "if (0) a()", "");
    check(&options, "if (0) { var x = 1 } else b()", "if(0){var x=1}else b()");
    check(&options, "x = false ? a : b", "x=b");
    check(&options, "x = 'a' ? b : c", "x=b");
}

#[test]
fn test_compress_evaluate() {
    let options = only(|o| o.evaluate = true);
    check(&options, "x = 1 + 2 * 3", "x=7");
    check(&options, "x = 'a' + 'b'", "x=\"ab\"");
    check(&options, "x = 2 ** 10", "x=1024");
    check(&options, "x = 1 / 3", "x=1/3");
    check(&options, "x = -(2 + 3)", "x=-5");
    check(&options, "x = 5 | 0", "x=5");
    check(&options, "x = 1 === 1", "x=true");
    check(&options, "x = 'a' !== 'a'", "x=false");
    check(&options, "x = typeof 1", "x=\"number\"");
    // Longer once folded.
    check(&options, "x = !0", "x=!0");
    check(&options, "x = 1 << 31", "x=1<<31");
    // Not constant.
    check(&options, "x = a + 1", "x=a+1");
    check(&options, "x = 1n + 2n", "x=1n+2n");
}

#[test]
fn test_compress_side_effects() {
    let options = only(|o| o.side_effects = true);
    check(&options, "a(), 1, b()", "a(),b()");
    check(&options, "x = (1, 2, a)", "x=a");
    check(&options, "a(), 1", "a()");
    check(&options, "1; 'b' + 'c'; a()", "a()");
    check(&options, "x; a()", "x;a()");
    check(&options, "[1, function () {}]; ({a: 1})", "");
    check(&options, "a = 1, 2", "a=1");
    check(&options, "(0, a.b)()", "(0,a.b)()");
    check(&options, "(0, 1, eval)(c)", "(0,eval)(c)");
}

#[test]
fn test_compress_conditionals() {
    let options = only(|o| o.conditionals = true);
    check(&options, "if (a) b()", "a&&b()");
    check(&options, "if (!a) b()", "a||b()");
    check(&options, "if (a) b(); else c()", "a?b():c()");
    check(&options, "if (!a) b(); else c()", "a?c():b()");
    check(&options, "if (a); else b()", "a||b()");
    check(&options, "if (a) {}", "a");
    check(&options, "if (a) b = 1", "a&&(b=1)");
    check(&options, "if (a) return_(); else {}", "a&&return_()");
    check(&options, "if (a) { b(); c() }", "if(a){b();c()}");
}

#[test]
fn test_compress_if_return() {
    let options = only(|o| o.if_return = true);
    check(
        &options,
        "function f() { if (a) return b; return c }",
        "function f(){return a?b:c}",
    );
    check(
        &options,
        "function f() { if (a) { return b } else { return c } }",
        "function f(){return a?b:c}",
    );
    check(
        &options,
        "function f() { if (!a) return b; return c }",
        "function f(){return a?c:b}",
    );
    check(
        &options,
        "function f() { if (a) return; return c }",
        "function f(){if(a)return;return c}",
    );
}

#[test]
fn test_compress_join_vars() {
    check(
        &only(|o| o.join_vars = true),
        "var a = 1; var b; let c; let d = 2; const e = 3; var f",
        "var a=1,b;let c,d=2;const e=3;var f",
    );
}

#[test]
fn test_compress_properties() {
    check(
        &only(|o| o.properties = true),
        "a['b']; a['0']; a['b-c']; a?.['d']; x = {'d': 1, \"e\": 2, 'f-g': 3}",
        "a.b;a[0];a[\"b-c\"];a?.d;x={d:1,e:2,'f-g':3}",
    );
}

#[test]
fn test_compress_loops() {
    let options = only(|o| o.loops = true);
    check(&options, "while (1) a()", "for(;;)a()");
    check(&options, "for (; true;) a()", "for(;;)a()");
    check(&options, "while (a) b()", "while(a)b()");
}

#[test]
fn test_compress_blocks() {
    let options = only(|o| o.blocks = true);
    check(&options, "{ a(); { b() } } if (a) { b() }", "a();b();if(a)b()");
    check(&options, "{ let x = 1 } for (;;) { a() }", "{let x=1}for(;;)a()");
    check(
        &options,
        "if (a) { if (b) c() } else d()",
        "if(a){if(b)c()}else d()",
    );
    check(&options, "while (a) { function f() {} }", "while(a){function f(){}}");
    check(&options, "a();;;b()", "a();b()");
}

#[test]
fn test_compress_all_rules_together() {
    let options = CompressOptions::all();
    check(
        &options,
        "function f(x) { if (x) { return 1 } else { return 2 } }",
        "function f(x){return x?1:2}",
    );
    check(
        &options,
        "function g() { debugger; a(); b(); return 1 + 2 }",
        "function g(){return a(),b(),3}",
    );
    check(&options, "while (true) { if (a) { b() } }", "for(;;)a&&b()");
}
