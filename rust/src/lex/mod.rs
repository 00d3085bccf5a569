use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use lazy_static::lazy_static;
use memchr::{memchr, memchr3, memchr3_iter};

use crate::char::{
    unicode_space, CharFilter, DIGIT, DIGIT_BIN, DIGIT_HEX, DIGIT_OCT, DIGIT_OR_SEPARATOR,
    ID_CONTINUE, ID_START, ID_START_CHARSTR, WHITESPACE,
};
use crate::error::{SyntaxError, SyntaxErrorType, SyntaxResult};
use crate::source::{Source, SourceRange};
use crate::token::{Token, TokenType};

#[cfg(test)]
mod tests;

/// Whether a `/` at the current position starts a regular expression literal. The parser knows
/// this from the grammar: in operand position it does, after an operand it is division.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LexMode {
    SlashIsRegex,
    Standard,
}

#[derive(Copy, Clone)]
pub struct LexerCheckpoint {
    next: usize,
}

pub struct Lexer {
    source: Source,
    next: usize,
}

impl Lexer {
    pub fn new(code: &str) -> Lexer {
        Lexer {
            source: Source::new(code),
            next: 0,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    fn range(&self, start: usize, end: usize) -> SourceRange {
        SourceRange {
            source: self.source.clone(),
            start,
            end,
        }
    }

    /// The whole input.
    pub fn source_range(&self) -> SourceRange {
        self.range(0, self.source.code().len())
    }

    pub fn checkpoint(&self) -> LexerCheckpoint {
        LexerCheckpoint { next: self.next }
    }

    pub fn since_checkpoint(&self, checkpoint: LexerCheckpoint) -> SourceRange {
        self.range(checkpoint.next, self.next)
    }

    pub fn apply_checkpoint(&mut self, checkpoint: LexerCheckpoint) -> () {
        self.next = checkpoint.next;
    }

    fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
        SyntaxError::new(typ, &self.source, self.next)
    }

    fn error_at(&self, checkpoint: LexerCheckpoint, typ: SyntaxErrorType) -> SyntaxError {
        SyntaxError::new(typ, &self.source, checkpoint.next)
    }

    fn rest(&self) -> &[u8] {
        &self.source.code()[self.next..]
    }

    fn peek(&self, n: usize) -> Option<u8> {
        self.rest().get(n).copied()
    }

    fn count_while(&self, chars: &CharFilter) -> usize {
        self.rest().iter().take_while(|&&c| chars.has(c)).count()
    }

    fn advance(&mut self, n: usize) -> () {
        debug_assert!(self.next + n <= self.source.code().len());
        self.next += n;
    }

    fn advance_while(&mut self, chars: &CharFilter) -> usize {
        let n = self.count_while(chars);
        self.advance(n);
        n
    }

    /// Skips the rest of a UTF-8 sequence whose leading byte has already been consumed.
    fn skip_utf8_continuation(&mut self) -> () {
        while self.peek(0).filter(|c| c & 0xC0 == 0x80).is_some() {
            self.next += 1;
        }
    }

    /// Whether the next bytes form a line terminator: LF, CR, U+2028 or U+2029.
    fn at_line_terminator(&self) -> bool {
        match self.peek(0) {
            Some(b'\n') | Some(b'\r') => true,
            _ => unicode_space(self.rest()).filter(|(_, lt)| *lt).is_some(),
        }
    }

    // Non-ASCII sequences other than whitespace are taken to continue an identifier.
    fn continues_identifier(&self, n: usize) -> bool {
        match self.peek(n) {
            Some(c) if c.is_ascii() => ID_CONTINUE.has(c),
            Some(_) => unicode_space(&self.rest()[n..]).is_none(),
            None => false,
        }
    }

    fn token(&self, cp: LexerCheckpoint, typ: TokenType, preceded_by_line_terminator: bool) -> Token {
        Token::new(self.since_checkpoint(cp), typ, preceded_by_line_terminator)
    }
}

// Punctuators and operators by spelling. `?.` followed by a digit is handled by the matcher.
const PUNCTUATORS: &[(&str, TokenType)] = &[
    ("!", TokenType::Exclamation),
    ("!=", TokenType::ExclamationEquals),
    ("!==", TokenType::ExclamationEqualsEquals),
    ("#", TokenType::PrivateMember),
    ("%", TokenType::Percent),
    ("%=", TokenType::PercentEquals),
    ("&", TokenType::Ampersand),
    ("&&", TokenType::AmpersandAmpersand),
    ("&&=", TokenType::AmpersandAmpersandEquals),
    ("&=", TokenType::AmpersandEquals),
    ("(", TokenType::ParenthesisOpen),
    (")", TokenType::ParenthesisClose),
    ("*", TokenType::Asterisk),
    ("**", TokenType::AsteriskAsterisk),
    ("**=", TokenType::AsteriskAsteriskEquals),
    ("*=", TokenType::AsteriskEquals),
    ("+", TokenType::Plus),
    ("++", TokenType::PlusPlus),
    ("+=", TokenType::PlusEquals),
    (",", TokenType::Comma),
    ("-", TokenType::Hyphen),
    ("--", TokenType::HyphenHyphen),
    ("-=", TokenType::HyphenEquals),
    (".", TokenType::Dot),
    ("...", TokenType::DotDotDot),
    ("/", TokenType::Slash),
    ("/=", TokenType::SlashEquals),
    (":", TokenType::Colon),
    (";", TokenType::Semicolon),
    ("<", TokenType::ChevronLeft),
    ("<<", TokenType::ChevronLeftChevronLeft),
    ("<<=", TokenType::ChevronLeftChevronLeftEquals),
    ("<=", TokenType::ChevronLeftEquals),
    ("=", TokenType::Equals),
    ("==", TokenType::EqualsEquals),
    ("===", TokenType::EqualsEqualsEquals),
    ("=>", TokenType::EqualsChevronRight),
    (">", TokenType::ChevronRight),
    (">=", TokenType::ChevronRightEquals),
    (">>", TokenType::ChevronRightChevronRight),
    (">>=", TokenType::ChevronRightChevronRightEquals),
    (">>>", TokenType::ChevronRightChevronRightChevronRight),
    (">>>=", TokenType::ChevronRightChevronRightChevronRightEquals),
    ("?", TokenType::Question),
    ("?.", TokenType::QuestionDot),
    ("?.(", TokenType::QuestionDotParenthesisOpen),
    ("?.[", TokenType::QuestionDotBracketOpen),
    ("??", TokenType::QuestionQuestion),
    ("??=", TokenType::QuestionQuestionEquals),
    ("[", TokenType::BracketOpen),
    ("]", TokenType::BracketClose),
    ("^", TokenType::Caret),
    ("^=", TokenType::CaretEquals),
    ("{", TokenType::BraceOpen),
    ("|", TokenType::Bar),
    ("|=", TokenType::BarEquals),
    ("||", TokenType::BarBar),
    ("||=", TokenType::BarBarEquals),
    ("}", TokenType::BraceClose),
    ("~", TokenType::Tilde),
];

/// Reserved words, contextual keywords and literal words by spelling. A word matching one of these
/// lexes as its keyword token; the parser decides where it may still be used as a name.
pub const KEYWORDS: &[(&str, TokenType)] = &[
    ("as", TokenType::KeywordAs),
    ("async", TokenType::KeywordAsync),
    ("await", TokenType::KeywordAwait),
    ("break", TokenType::KeywordBreak),
    ("case", TokenType::KeywordCase),
    ("catch", TokenType::KeywordCatch),
    ("class", TokenType::KeywordClass),
    ("const", TokenType::KeywordConst),
    ("constructor", TokenType::KeywordConstructor),
    ("continue", TokenType::KeywordContinue),
    ("debugger", TokenType::KeywordDebugger),
    ("default", TokenType::KeywordDefault),
    ("delete", TokenType::KeywordDelete),
    ("do", TokenType::KeywordDo),
    ("else", TokenType::KeywordElse),
    ("export", TokenType::KeywordExport),
    ("extends", TokenType::KeywordExtends),
    ("false", TokenType::LiteralFalse),
    ("finally", TokenType::KeywordFinally),
    ("for", TokenType::KeywordFor),
    ("from", TokenType::KeywordFrom),
    ("function", TokenType::KeywordFunction),
    ("get", TokenType::KeywordGet),
    ("if", TokenType::KeywordIf),
    ("import", TokenType::KeywordImport),
    ("in", TokenType::KeywordIn),
    ("instanceof", TokenType::KeywordInstanceof),
    ("let", TokenType::KeywordLet),
    ("new", TokenType::KeywordNew),
    ("null", TokenType::LiteralNull),
    ("of", TokenType::KeywordOf),
    ("return", TokenType::KeywordReturn),
    ("set", TokenType::KeywordSet),
    ("static", TokenType::KeywordStatic),
    ("super", TokenType::KeywordSuper),
    ("switch", TokenType::KeywordSwitch),
    ("this", TokenType::KeywordThis),
    ("throw", TokenType::KeywordThrow),
    ("true", TokenType::LiteralTrue),
    ("try", TokenType::KeywordTry),
    ("typeof", TokenType::KeywordTypeof),
    ("var", TokenType::KeywordVar),
    ("void", TokenType::KeywordVoid),
    ("while", TokenType::KeywordWhile),
    ("with", TokenType::KeywordWith),
    ("yield", TokenType::KeywordYield),
];

lazy_static! {
    // Everything a token can start with. The index of a match in MATCHER is its index here.
    static ref PATTERNS: Vec<(Vec<u8>, TokenType)> = {
        let mut patterns: Vec<(Vec<u8>, TokenType)> = PUNCTUATORS
            .iter()
            .chain(KEYWORDS.iter())
            .map(|&(spelling, typ)| (spelling.as_bytes().to_vec(), typ))
            .collect();
        let mut add = |pat: &[u8], typ: TokenType| patterns.push((pat.to_vec(), typ));
        add(b"/*", TokenType::CommentMultiple);
        add(b"//", TokenType::CommentSingle);
        for &c in ID_START_CHARSTR {
            add(&[c], TokenType::Identifier);
        }
        for c in b'0'..=b'9' {
            add(&[c], TokenType::LiteralNumber);
            // `.5` is a number, not the `.` operator.
            add(&[b'.', c], TokenType::LiteralNumber);
            // `a?.5:b` is a conditional, not the `?.` operator.
            add(&[b'?', b'.', c], TokenType::Question);
        }
        for prefix in [b"0b", b"0B"] {
            add(prefix, TokenType::LiteralNumberBin);
        }
        for prefix in [b"0x", b"0X"] {
            add(prefix, TokenType::LiteralNumberHex);
        }
        for prefix in [b"0o", b"0O"] {
            add(prefix, TokenType::LiteralNumberOct);
        }
        add(b"\"", TokenType::LiteralString);
        add(b"'", TokenType::LiteralString);
        add(b"`", TokenType::LiteralTemplatePartString);
        patterns
    };

    static ref MATCHER: AhoCorasick = AhoCorasickBuilder::new()
        .anchored(true)
        .dfa(true)
        .match_kind(MatchKind::LeftmostLongest)
        .build(PATTERNS.iter().map(|(pat, _)| pat));

    static ref COMMENT_END: AhoCorasick = AhoCorasick::new(&[b"*/"]);
}

fn contains_line_terminator(s: &[u8]) -> bool {
    memchr3_iter(b'\n', b'\r', 0xE2, s).any(|i| match s[i] {
        b'\n' | b'\r' => true,
        _ => unicode_space(&s[i..]).filter(|(_, lt)| *lt).is_some(),
    })
}

/// Length up to (not including) the next line terminator, or the rest of the input.
fn until_line_terminator(s: &[u8]) -> usize {
    let mut from = 0;
    while let Some(i) = memchr3(b'\n', b'\r', 0xE2, &s[from..]) {
        let i = from + i;
        match s[i] {
            b'\n' | b'\r' => return i,
            _ if unicode_space(&s[i..]).filter(|(_, lt)| *lt).is_some() => return i,
            _ => from = i + 1,
        };
    }
    s.len()
}

// Returns whether the comment contained a line terminator.
fn lex_multiple_comment(lexer: &mut Lexer) -> SyntaxResult<bool> {
    let cp = lexer.checkpoint();
    lexer.advance(2);
    let end = COMMENT_END
        .find(lexer.rest())
        .ok_or_else(|| lexer.error_at(cp, SyntaxErrorType::UnterminatedComment))?
        .end();
    let had_line_terminator = contains_line_terminator(&lexer.rest()[..end]);
    lexer.advance(end);
    Ok(had_line_terminator)
}

fn lex_single_comment(lexer: &mut Lexer) -> () {
    lexer.advance(2);
    let len = until_line_terminator(lexer.rest());
    lexer.advance(len);
}

fn lex_identifier(lexer: &mut Lexer, preceded_by_line_terminator: bool) -> SyntaxResult<Token> {
    let cp = lexer.checkpoint();
    lexer.advance(1);
    lexer.skip_utf8_continuation();
    loop {
        lexer.advance_while(&ID_CONTINUE);
        if !lexer.continues_identifier(0) {
            break;
        };
        lexer.advance(1);
        lexer.skip_utf8_continuation();
    }
    Ok(lexer.token(cp, TokenType::Identifier, preceded_by_line_terminator))
}

// A numeric literal must not be immediately followed by an identifier character or digit e.g. `3in`.
fn finish_number(
    lexer: &mut Lexer,
    cp: LexerCheckpoint,
    allow_big_int: bool,
    preceded_by_line_terminator: bool,
) -> SyntaxResult<Token> {
    let typ = if allow_big_int && lexer.peek(0) == Some(b'n') {
        lexer.advance(1);
        TokenType::LiteralBigInt
    } else {
        TokenType::LiteralNumber
    };
    if lexer.continues_identifier(0) {
        return Err(lexer.error(SyntaxErrorType::MalformedLiteralNumber));
    };
    Ok(lexer.token(cp, typ, preceded_by_line_terminator))
}

fn lex_number(lexer: &mut Lexer, preceded_by_line_terminator: bool) -> SyntaxResult<Token> {
    let cp = lexer.checkpoint();
    lexer.advance_while(&DIGIT_OR_SEPARATOR);
    let mut is_integer = true;
    if lexer.peek(0) == Some(b'.') {
        is_integer = false;
        lexer.advance(1);
        lexer.advance_while(&DIGIT_OR_SEPARATOR);
    };
    if let Some(b'e' | b'E') = lexer.peek(0) {
        is_integer = false;
        lexer.advance(1);
        if let Some(b'+' | b'-') = lexer.peek(0) {
            lexer.advance(1);
        };
        if lexer.advance_while(&DIGIT_OR_SEPARATOR) == 0 {
            return Err(lexer.error(SyntaxErrorType::MalformedLiteralNumber));
        };
    };
    finish_number(lexer, cp, is_integer, preceded_by_line_terminator)
}

// `0b`, `0o` and `0x` literals.
fn lex_number_radix(
    lexer: &mut Lexer,
    digits: &CharFilter,
    preceded_by_line_terminator: bool,
) -> SyntaxResult<Token> {
    let cp = lexer.checkpoint();
    lexer.advance(2);
    if lexer.advance_while(digits) == 0 {
        return Err(lexer.error(SyntaxErrorType::MalformedLiteralNumber));
    };
    finish_number(lexer, cp, true, preceded_by_line_terminator)
}

fn lex_private_member(lexer: &mut Lexer, preceded_by_line_terminator: bool) -> SyntaxResult<Token> {
    let cp = lexer.checkpoint();
    lexer.advance(1);
    match lexer.peek(0) {
        Some(c) if ID_START.has(c) || !c.is_ascii() => {}
        _ => return Err(lexer.error(SyntaxErrorType::UnexpectedCharacter('#'))),
    };
    lex_identifier(lexer, false)?;
    Ok(lexer.token(cp, TokenType::PrivateMember, preceded_by_line_terminator))
}

// The pattern itself is not validated, only its extent.
fn lex_regex(lexer: &mut Lexer, preceded_by_line_terminator: bool) -> SyntaxResult<Token> {
    let cp = lexer.checkpoint();
    lexer.advance(1);
    let mut in_charset = false;
    loop {
        if lexer.at_line_terminator() {
            return Err(lexer.error(SyntaxErrorType::LineTerminatorInRegex));
        };
        let c = lexer
            .peek(0)
            .ok_or_else(|| lexer.error_at(cp, SyntaxErrorType::UnterminatedRegex))?;
        lexer.advance(1);
        match c {
            b'\\' => {
                if lexer.peek(0).is_none() {
                    return Err(lexer.error_at(cp, SyntaxErrorType::UnterminatedRegex));
                };
                if lexer.at_line_terminator() {
                    return Err(lexer.error(SyntaxErrorType::LineTerminatorInRegex));
                };
                lexer.advance(1);
                lexer.skip_utf8_continuation();
            }
            b'/' if !in_charset => break,
            b'[' => in_charset = true,
            b']' => in_charset = false,
            _ => {}
        };
    }
    // Flags.
    lexer.advance_while(&ID_CONTINUE);
    Ok(lexer.token(cp, TokenType::LiteralRegex, preceded_by_line_terminator))
}

// Escapes are only delimited here; they're decoded and validated by the parser.
fn lex_string(lexer: &mut Lexer, preceded_by_line_terminator: bool) -> SyntaxResult<Token> {
    let cp = lexer.checkpoint();
    let quote = lexer.rest()[0];
    lexer.advance(1);
    loop {
        let len = memchr3(b'\\', b'\n', quote, lexer.rest())
            .ok_or_else(|| lexer.error_at(cp, SyntaxErrorType::UnterminatedString))?;
        if memchr(b'\r', &lexer.rest()[..len]).is_some() {
            return Err(lexer.error(SyntaxErrorType::LineTerminatorInString));
        };
        lexer.advance(len);
        match lexer.rest()[0] {
            b'\\' => {
                lexer.advance(1);
                match lexer.peek(0) {
                    None => return Err(lexer.error_at(cp, SyntaxErrorType::UnterminatedString)),
                    // Line continuation.
                    Some(b'\r') if lexer.peek(1) == Some(b'\n') => lexer.advance(2),
                    Some(_) => {
                        lexer.advance(1);
                        lexer.skip_utf8_continuation();
                    }
                };
            }
            b'\n' => return Err(lexer.error(SyntaxErrorType::LineTerminatorInString)),
            _ => {
                lexer.advance(1);
                break;
            }
        };
    }
    Ok(lexer.token(cp, TokenType::LiteralString, preceded_by_line_terminator))
}

/// Lexes template characters up to and including the next `${` or closing backtick. Called by the
/// parser after the `}` that ends a substitution.
pub fn lex_template_string_continue(
    lexer: &mut Lexer,
    preceded_by_line_terminator: bool,
) -> SyntaxResult<Token> {
    let cp = lexer.checkpoint();
    let typ = loop {
        let len = memchr3(b'\\', b'`', b'$', lexer.rest())
            .ok_or_else(|| lexer.error_at(cp, SyntaxErrorType::UnterminatedTemplate))?;
        lexer.advance(len);
        match lexer.rest() {
            [b'\\', _, ..] => {
                lexer.advance(2);
                lexer.skip_utf8_continuation();
            }
            [b'\\'] => return Err(lexer.error_at(cp, SyntaxErrorType::UnterminatedTemplate)),
            [b'`', ..] => {
                lexer.advance(1);
                break TokenType::LiteralTemplatePartStringEnd;
            }
            [b'$', b'{', ..] => {
                lexer.advance(2);
                break TokenType::LiteralTemplatePartString;
            }
            _ => lexer.advance(1),
        };
    };
    Ok(lexer.token(cp, typ, preceded_by_line_terminator))
}

fn lex_template(lexer: &mut Lexer, preceded_by_line_terminator: bool) -> SyntaxResult<Token> {
    let cp = lexer.checkpoint();
    lexer.advance(1);
    let typ = lex_template_string_continue(lexer, preceded_by_line_terminator)?.typ();
    Ok(lexer.token(cp, typ, preceded_by_line_terminator))
}

fn unexpected_character(lexer: &Lexer) -> SyntaxError {
    let rest = lexer.rest();
    let c = std::str::from_utf8(&rest[..rest.len().min(4)])
        .ok()
        .or_else(|| std::str::from_utf8(&rest[..1]).ok())
        .and_then(|s| s.chars().next())
        .unwrap_or(char::REPLACEMENT_CHARACTER);
    lexer.error(SyntaxErrorType::UnexpectedCharacter(c))
}

/// Skips whitespace and comments, and returns whether a line terminator was among them.
fn skip_trivia(lexer: &mut Lexer) -> SyntaxResult<bool> {
    let mut saw_line_terminator = false;
    if lexer.next == 0 && lexer.rest().starts_with(b"#!") {
        let len = until_line_terminator(lexer.rest());
        lexer.advance(len);
    };
    loop {
        lexer.advance_while(&WHITESPACE);
        match lexer.rest() {
            [b'\n' | b'\r', ..] => {
                saw_line_terminator = true;
                lexer.advance(1);
            }
            [b'/', b'*', ..] => saw_line_terminator |= lex_multiple_comment(lexer)?,
            // The line terminator itself is picked up on the next iteration.
            [b'/', b'/', ..] => lex_single_comment(lexer),
            [c, ..] if !c.is_ascii() => match unicode_space(lexer.rest()) {
                Some((len, is_line_terminator)) => {
                    saw_line_terminator |= is_line_terminator;
                    lexer.advance(len);
                }
                None => return Ok(saw_line_terminator),
            },
            _ => return Ok(saw_line_terminator),
        };
    }
}

pub fn lex_next(lexer: &mut Lexer, mode: LexMode) -> SyntaxResult<Token> {
    let preceded_by_line_terminator = skip_trivia(lexer)?;
    let nl = preceded_by_line_terminator;
    let cp = lexer.checkpoint();
    let Some(&first) = lexer.rest().first() else {
        return Ok(lexer.token(cp, TokenType::EOF, nl));
    };
    // Non-ASCII sequences are assumed to be identifiers, though JS only allows a few Unicode
    // property types.
    if !first.is_ascii() {
        return lex_identifier(lexer, nl);
    };
    let Some(m) = MATCHER.find(lexer.rest()) else {
        return Err(unexpected_character(lexer));
    };
    let (len, typ) = (m.end(), PATTERNS[m.pattern()].1);
    match typ {
        TokenType::Identifier => lex_identifier(lexer, nl),
        TokenType::LiteralNumber => lex_number(lexer, nl),
        TokenType::LiteralNumberBin => lex_number_radix(lexer, &DIGIT_BIN, nl),
        TokenType::LiteralNumberHex => lex_number_radix(lexer, &DIGIT_HEX, nl),
        TokenType::LiteralNumberOct => lex_number_radix(lexer, &DIGIT_OCT, nl),
        TokenType::LiteralString => lex_string(lexer, nl),
        TokenType::LiteralTemplatePartString => lex_template(lexer, nl),
        TokenType::PrivateMember => lex_private_member(lexer, nl),
        TokenType::Slash | TokenType::SlashEquals if mode == LexMode::SlashIsRegex => {
            lex_regex(lexer, nl)
        }
        // A keyword that is only the start of a longer identifier.
        typ if typ.is_keyword() && lexer.continues_identifier(len) => lex_identifier(lexer, nl),
        typ => {
            // `?.5` only takes the `?`.
            let len = if typ == TokenType::Question { 1 } else { len };
            lexer.advance(len);
            Ok(lexer.token(cp, typ, nl))
        }
    }
}

/// Whether `name` lexes as a single identifier-like token (identifier or keyword), i.e. it can be
/// written after `.` or as a bare property key.
pub fn is_identifier_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    match bytes.first() {
        Some(&c) if ID_START.has(c) => bytes[1..].iter().all(|&c| ID_CONTINUE.has(c)),
        _ => false,
    }
}

/// Whether `name` is a decimal integer literal in canonical form, e.g. a property key `0` or `12`.
pub fn is_canonical_index(name: &str) -> bool {
    let bytes = name.as_bytes();
    !bytes.is_empty()
        && bytes.len() < 16
        && bytes.iter().all(|c| DIGIT.has(*c))
        && (bytes[0] != b'0' || bytes.len() == 1)
}
