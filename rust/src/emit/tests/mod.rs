use crate::emit::emit_program;
use crate::emit::EmitOptions;
use crate::parse;
use crate::util::test::assert_code_eq;
use crate::TopLevelMode;

fn emit_with(top_level_mode: TopLevelMode, src: &str, options: &EmitOptions) -> String {
    let program = parse(src, top_level_mode).unwrap();
    emit_program(&program, options).unwrap()
}

fn check(src: &str, expected: &str) -> () {
    let out = emit_with(TopLevelMode::Global, src, &EmitOptions::default());
    assert_code_eq(&out, expected);
}

fn check_module(src: &str, expected: &str) -> () {
    let out = emit_with(TopLevelMode::Module, src, &EmitOptions::default());
    assert_code_eq(&out, expected);
}

// Printing, parsing and printing again must not change the output.
fn check_stable(top_level_mode: TopLevelMode, src: &str) -> () {
    for options in [EmitOptions::default(), EmitOptions { beautify: true }] {
        let first = emit_with(top_level_mode, src, &options);
        let second = emit_with(top_level_mode, &first, &options);
        assert_code_eq(&second, &first);
    }
}

#[test]
fn test_emit_global() {
    check(
        r#"
          /* Test code */
          function * gen () {
            yield * "hello world!";
          }
          (() => {
            com.java.names.long
            module.functions

            function this_is_a_function_decl_not_expr() {
              this_is_a_function_decl_not_expr()
            }

            var the = 1, quick, { brown, _: [ fox, jumped, , , ...over ], ...lazy } = i;

            (( {the} = this_is_a_function_decl_not_expr, [quick] = 2 ) => {
              {
                let brown = this_is_a_function_decl_not_expr(fox);
              }
              the,quick,brown,fox
              ;
              return
              1.2.toString()
            })();;;
          })()
        "#,
        "\
        function*gen(){yield*\"hello world!\"}\
        (()=>{\
        com.java.names.long;\
        module.functions;\
        function this_is_a_function_decl_not_expr(){this_is_a_function_decl_not_expr()}\
        var the=1,quick,{brown,_:[fox,jumped,,,...over],...lazy}=i;\
        (({the}=this_is_a_function_decl_not_expr,[quick]=2)=>{{let brown=this_is_a_function_decl_not_expr(fox)}the,quick,brown,fox;return;1.2.toString()})()\
        })()\
        ",
    )
}

#[test]
fn test_emit_module() {
    check_module(
        r#"
          import a, { b as c, d } from "m";
          import * as ns from 'n';
          import "side-effect";
          export { c as e, d };
          export * from "o";
          export const f = 1;
          export default function () {}
        "#,
        "\
        import a,{b as c,d}from\"m\";\
        import*as ns from\"n\";\
        import\"side-effect\";\
        export{c as e,d};\
        export*from\"o\";\
        export const f=1;\
        export default function(){}\
        ",
    );
}

#[test]
fn test_emit_parentheses_follow_precedence() {
    check("(a + b) * c", "(a+b)*c");
    check("a + (b * c)", "a+b*c");
    check("a - (b - c)", "a-(b-c)");
    check("(a - b) - c", "a-b-c");
    check("a ** (b ** c)", "a**b**c");
    check("(a ** b) ** c", "(a**b)**c");
    check("(-a) ** b", "(-a)**b");
    check("a = (b, c)", "a=(b,c)");
    check("f((a, b), c)", "f((a,b),c)");
    check("(a ? b : c) ? d : e", "(a?b:c)?d:e");
    check("a ? b : (c ? d : e)", "a?b:c?d:e");
    check("(a = b) ? c : d", "(a=b)?c:d");
    check("(a || b) ?? c", "(a||b)??c");
    check("a && (b ?? c)", "a&&(b??c)");
    check("!(a && b)", "!(a&&b)");
    check("(a++).b", "(a++).b");
    check("(yield_ = 1)", "yield_=1");
}

#[test]
fn test_emit_separates_tokens_only_when_needed() {
    check("a + +b", "a+ +b");
    check("a - -b", "a- -b");
    check("a + -b", "a+-b");
    check("- (-a)", "- -a");
    check("a-- > b", "a-- >b");
    check("a < !b", "a< !b");
    check("typeof a", "typeof a");
    check("typeof (a)", "typeof a");
    check("void 0", "void 0");
    check("x in y", "x in y");
    check("a instanceof B", "a instanceof B");
    check("/a/g instanceof RegExp", "/a/g instanceof RegExp");
    check("delete a[0]", "delete a[0]");
}

#[test]
fn test_emit_statements() {
    check("if (a) b(); else c();", "if(a)b();else c()");
    check("if (a) { b() } else { c() }", "if(a){b()}else{c()}");
    check("for (;;);", "for(;;);");
    check("for (;;); a()", "for(;;);a()");
    check("do x(); while (y)", "do x();while(y)");
    check("do { x() } while (y)", "do{x()}while(y)");
    check("while (a) {}", "while(a){}");
    check("l: for (const a of b) continue l", "l:for(const a of b)continue l");
    check("for (var k in o) {}", "for(var k in o){}");
    check("for (var a = (b in c); ;);", "for(var a=(b in c);;);");
    check(
        "switch (a) { case 1: b(); case 2: default: c() }",
        "switch(a){case 1:b();case 2:default:c()}",
    );
    check(
        "try { a() } catch (e) { b() } finally { c() }",
        "try{a()}catch(e){b()}finally{c()}",
    );
    check("throw new Error('x')", "throw new Error(\"x\")");
    check(
        "function f() { 'use strict'; return 1 }",
        "function f(){'use strict';return 1}",
    );
}

#[test]
fn test_emit_expression_statement_starts() {
    check("({a: 1}).b", "({a:1}.b)");
    check("(function () {})()", "(function(){}())");
    check("(class {})", "(class{})");
    check("({a} = b)", "({a}=b)");
}

#[test]
fn test_emit_arrow_functions() {
    check("(a) => a", "a=>a");
    check("(a, b) => a", "(a,b)=>a");
    check("(a = 1) => a", "(a=1)=>a");
    check("(...a) => a", "(...a)=>a");
    check("(a) => ({})", "a=>({})");
    check("(a) => (b, c)", "a=>(b,c)");
    check("async x => x", "async x=>x");
    check("a = (b) => c", "a=b=>c");
}

#[test]
fn test_emit_string_quotes() {
    check(r#"x = 'a"b'"#, r#"x='a"b'"#);
    check(r#"x = "it's""#, r#"x="it's""#);
    check(r#"x = 'a\'b"c"'"#, r#"x='a\'b"c"'"#);
    check(r#"x = '\n\t'"#, "x=\"\\n\t\"");
    check(r#"x = "</script>""#, r#"x="<\/script>""#);
    check(r#"x = "\0""#, r#"x="\0""#);
    check(r#"x = "\x001""#, r#"x="\x001""#);
}

#[test]
fn test_emit_numbers() {
    check("x = 1.0", "x=1");
    check("x = 0.5", "x=.5");
    check("x = 1000", "x=1e3");
    check("x = 0xff", "x=255");
    check("1..toString()", "1..toString()");
    check("1.5.toFixed()", "1.5.toFixed()");
    check("x = 10n", "x=10n");
    check("x = 10n; y = 0x10n; z = -1n", "x=10n;y=0x10n;z=-1n");
    check("x = 1n in a", "x=1n in a");
}

#[test]
fn test_emit_member_and_call_chains() {
    check("(a?.b).c", "(a?.b).c");
    check("(a.b).c", "a.b.c");
    check("a?.[0]?.(b)", "a?.[0]?.(b)");
    check("new (a())()", "new(a())()");
    check("new a", "new a()");
    check("new (a.b)", "new a.b()");
    check("new a.b().c", "new a.b().c");
    check("a`x${b}y`", "a`x${b}y`");
    check("x = `a${b}c`", "x=`a${b}c`");
}

#[test]
fn test_emit_template_text_is_untouched() {
    check("x = `a${1}b`", "x=`a${1}b`");
    check("x = `$${b}`", "x=`$${b}`");
    check("x = `in ${a}in${b}of`", "x=`in ${a}in${b}of`");
    check("x = `${a}`", "x=`${a}`");
}

#[test]
fn test_emit_classes_and_objects() {
    check(
        "class A extends B { static x = 1; y; get z() { return 1 } set z(v) {} async *m() {} }",
        "class A extends B{static x=1;y;get z(){return 1}set z(v){}async*m(){}}",
    );
    check(
        "x = { a, b: 1, [c]: 2, 'd': 3, get e() { return 1 }, ...f }",
        "x={a,b:1,[c]:2,'d':3,get e(){return 1},...f}",
    );
    check("x = [, a]", "x=[,a]");
    check("x = [a, ...b]", "x=[a,...b]");
}

#[test]
fn test_emit_beautify() {
    let options = EmitOptions { beautify: true };
    assert_code_eq(
        &emit_with(TopLevelMode::Global, "if (a) { b(); c() }", &options),
        "if (a) {\n    b();\n    c();\n}",
    );
    assert_code_eq(
        &emit_with(TopLevelMode::Global, "var a = 1 + 2, b", &options),
        "var a = 1 + 2, b;",
    );
    assert_code_eq(
        &emit_with(TopLevelMode::Global, "function f(a,b){return a}f(1,2)", &options),
        "function f(a, b) {\n    return a;\n}\nf(1, 2);",
    );
}

#[test]
fn test_emit_is_stable_across_reparsing() {
    for src in [
        "if (a) b(); else if (c) d(); else { e() }",
        "x = a ? b : c ? d : e, y = (a, b)",
        "for (var a = (b in c); a < 1; a++) { continue }",
        "x = -(-1); y = +(+a); z = a - (-b)",
        "(function* () { yield -1; yield* g(); yield })",
        "label: { break label }",
        "x = `a${ `b${c}` }`",
        "x = `a${1}b`, y = 10n + 0x10n",
        "x = (a ?? b) || c, y = a ?? (b && c), z = (a || b) ?? c",
        "x = { get a() { return 1 }, set a(v) {} }",
        "do; while (0)",
    ] {
        check_stable(TopLevelMode::Global, src);
    }
    check_stable(
        TopLevelMode::Module,
        "import a, * as b from 'c'; export default (class {}); export { a as default }",
    );
}
