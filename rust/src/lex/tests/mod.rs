use crate::error::SyntaxErrorType::{self, *};
use crate::lex::{is_identifier_name, lex_next, LexMode, Lexer};
use crate::token::TokenType::{self, *};

fn check_mode(
    mode: LexMode,
    code: &str,
    expecteds: &[TokenType],
    expected_err: Option<SyntaxErrorType>,
) -> () {
    let mut lexer = Lexer::new(code);
    for expected in expecteds {
        match lex_next(&mut lexer, mode) {
            Err(e) => panic!("Failed to parse code with error {:?}: {}", e.typ(), code),
            Ok(t) => assert_eq!(t.typ(), *expected, "{}", code),
        };
    }
    match lex_next(&mut lexer, mode) {
        Err(e) => match expected_err {
            Some(expected) => assert_eq!(e.typ(), &expected),
            None => panic!("Failed to parse code with error {:?}: {}", e.typ(), code),
        },
        Ok(t) => match expected_err {
            Some(_) => panic!("Code parsed successfully: {}", code),
            None => assert_eq!(EOF, t.typ()),
        },
    };
}

fn check(code: &str, expecteds: &[TokenType], expected_err: Option<SyntaxErrorType>) -> () {
    check_mode(LexMode::Standard, code, expecteds, expected_err)
}

#[test]
fn test_lex_keywords() {
    check("class", &[KeywordClass], None);
    check("instanceof", &[KeywordInstanceof], None);
    check("yield", &[KeywordYield], None);
    check("yieldx", &[Identifier], None);
    check("ifé", &[Identifier], None);
}

#[test]
fn test_lex_identifiers() {
    check("h929", &[Identifier], None);
    check("$_a b", &[Identifier, Identifier], None);
    check("café x", &[Identifier, Identifier], None);
}

#[test]
fn test_lex_literal_numbers() {
    check("1", &[LiteralNumber], None);
    check("929", &[LiteralNumber], None);
    check(".929", &[LiteralNumber], None);
    check(". 929", &[Dot, LiteralNumber], None);
    check(". 929.2.", &[Dot, LiteralNumber, Dot], None);
    check(".929.2..", &[LiteralNumber, LiteralNumber, Dot, Dot], None);
    check(".929. 2..", &[LiteralNumber, Dot, LiteralNumber, Dot], None);
    check("?.929", &[Question, LiteralNumber], None);
    check("?..929", &[QuestionDot, LiteralNumber], None);
    check("?...929", &[QuestionDot, Dot, LiteralNumber], None);
    check("?...929.", &[QuestionDot, Dot, LiteralNumber, Dot], None);
    check("1e3 1.5E-7 1_000", &[LiteralNumber, LiteralNumber, LiteralNumber], None);
    check("0x1F 0b101 0o17", &[LiteralNumber, LiteralNumber, LiteralNumber], None);
    check("10n 0xffn", &[LiteralBigInt, LiteralBigInt], None);
    check("1.5n", &[], Some(MalformedLiteralNumber));
    check("3in x", &[], Some(MalformedLiteralNumber));
    check("1e", &[], Some(MalformedLiteralNumber));
    check("0x", &[], Some(MalformedLiteralNumber));
}

#[test]
fn test_lex_literal_strings() {
    check("'hello world'", &[LiteralString], None);
    check("\"it's\" 'a \\' b'", &[LiteralString, LiteralString], None);
    check("'a\\\nb'", &[LiteralString], None);
    check("'a\\\r\nb'", &[LiteralString], None);
    check("'a\u{2028}b'", &[LiteralString], None);
    check("'hello world\n'", &[], Some(LineTerminatorInString));
    check("'hello world\r'", &[], Some(LineTerminatorInString));
    check("'hello world", &[], Some(UnterminatedString));
}

#[test]
fn test_lex_templates() {
    check("`abc`", &[LiteralTemplatePartStringEnd], None);
    check("`a$b\\``", &[LiteralTemplatePartStringEnd], None);
    check("`a${", &[LiteralTemplatePartString], None);
    check("`abc", &[], Some(UnterminatedTemplate));
}

#[test]
fn test_lex_regex() {
    check_mode(LexMode::SlashIsRegex, "/a[/]b/gi", &[LiteralRegex], None);
    check_mode(LexMode::SlashIsRegex, "/a\\/b/", &[LiteralRegex], None);
    check_mode(LexMode::SlashIsRegex, "/ab\n/", &[], Some(LineTerminatorInRegex));
    check_mode(LexMode::SlashIsRegex, "/ab", &[], Some(UnterminatedRegex));
    check("a/b/c", &[Identifier, Slash, Identifier, Slash, Identifier], None);
}

#[test]
fn test_lex_comments_and_line_terminators() {
    let mut lexer = Lexer::new("a /* x\n */ b // c\u{2028}d\r\ne /* f */ g");
    let expected = [
        ("a", false),
        ("b", true),
        ("d", true),
        ("e", true),
        ("g", false),
    ];
    for (raw, lt) in expected {
        let t = lex_next(&mut lexer, LexMode::Standard).unwrap();
        assert_eq!(t.loc().as_str(), raw);
        assert_eq!(t.preceded_by_line_terminator(), lt, "{}", raw);
    }
    check("/* abc", &[], Some(UnterminatedComment));
    check("#!/usr/bin/env node\nx", &[Identifier], None);
    check("\u{feff}x\u{a0}y", &[Identifier, Identifier], None);
}

#[test]
fn test_lex_operators() {
    check(
        "a?.b?.[c]?.(d)",
        &[
            Identifier,
            QuestionDot,
            Identifier,
            QuestionDotBracketOpen,
            Identifier,
            BracketClose,
            QuestionDotParenthesisOpen,
            Identifier,
            ParenthesisClose,
        ],
        None,
    );
    check(">>>= **= ??= &&=", &[
        ChevronRightChevronRightChevronRightEquals,
        AsteriskAsteriskEquals,
        QuestionQuestionEquals,
        AmpersandAmpersandEquals,
    ], None);
    check("#priv", &[PrivateMember], None);
    check("@", &[], Some(UnexpectedCharacter('@')));
}

#[test]
fn test_lex_import_statement() {
    check(
        "import * as a from \"./a\";",
        &[
            KeywordImport,
            Asterisk,
            KeywordAs,
            Identifier,
            KeywordFrom,
            LiteralString,
            Semicolon,
        ],
        None,
    );
}

#[test]
fn test_is_identifier_name() {
    assert!(is_identifier_name("foo"));
    assert!(is_identifier_name("yield"));
    assert!(!is_identifier_name("1a"));
    assert!(!is_identifier_name("a-b"));
    assert!(!is_identifier_name(""));
}
