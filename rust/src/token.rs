use crate::error::{SyntaxError, SyntaxErrorType};
use crate::source::SourceRange;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum TokenType {
    // Placeholder for "no token type", e.g. an unused second terminator. Never produced by the
    // lexer.
    _Dummy,

    Ampersand,
    AmpersandAmpersand,
    AmpersandAmpersandEquals,
    AmpersandEquals,
    Asterisk,
    AsteriskAsterisk,
    AsteriskAsteriskEquals,
    AsteriskEquals,
    Bar,
    BarBar,
    BarBarEquals,
    BarEquals,
    BraceClose,
    BraceOpen,
    BracketClose,
    BracketOpen,
    Caret,
    CaretEquals,
    ChevronLeft,
    ChevronLeftChevronLeft,
    ChevronLeftChevronLeftEquals,
    ChevronLeftEquals,
    ChevronRight,
    ChevronRightChevronRight,
    ChevronRightChevronRightChevronRight,
    ChevronRightChevronRightChevronRightEquals,
    ChevronRightChevronRightEquals,
    ChevronRightEquals,
    Colon,
    Comma,
    CommentMultiple,
    CommentSingle,
    Dot,
    DotDotDot,
    EOF,
    Equals,
    EqualsChevronRight,
    EqualsEquals,
    EqualsEqualsEquals,
    Exclamation,
    ExclamationEquals,
    ExclamationEqualsEquals,
    Hyphen,
    HyphenEquals,
    HyphenHyphen,
    Identifier,
    KeywordAs,
    KeywordAsync,
    KeywordAwait,
    KeywordBreak,
    KeywordCase,
    KeywordCatch,
    KeywordClass,
    KeywordConst,
    KeywordConstructor,
    KeywordContinue,
    KeywordDebugger,
    KeywordDefault,
    KeywordDelete,
    KeywordDo,
    KeywordElse,
    KeywordExport,
    KeywordExtends,
    KeywordFinally,
    KeywordFor,
    KeywordFrom,
    KeywordFunction,
    KeywordGet,
    KeywordIf,
    KeywordImport,
    KeywordIn,
    KeywordInstanceof,
    KeywordLet,
    KeywordNew,
    KeywordOf,
    KeywordReturn,
    KeywordSet,
    KeywordStatic,
    KeywordSuper,
    KeywordSwitch,
    KeywordThis,
    KeywordThrow,
    KeywordTry,
    KeywordTypeof,
    KeywordVar,
    KeywordVoid,
    KeywordWhile,
    KeywordWith,
    KeywordYield,
    LiteralBigInt,
    LiteralFalse,
    LiteralNull,
    LiteralNumber,
    // LiteralNumber* are only used for lexing.
    LiteralNumberHex,
    LiteralNumberBin,
    LiteralNumberOct,
    LiteralRegex,
    LiteralString,
    // A template head or middle, ending with `${`.
    LiteralTemplatePartString,
    // A complete template or a template tail, ending with a backtick.
    LiteralTemplatePartStringEnd,
    LiteralTrue,
    ParenthesisClose,
    ParenthesisOpen,
    Percent,
    PercentEquals,
    Plus,
    PlusEquals,
    PlusPlus,
    PrivateMember,
    Question,
    QuestionDot,
    QuestionDotBracketOpen,
    QuestionDotParenthesisOpen,
    QuestionQuestion,
    QuestionQuestionEquals,
    Semicolon,
    Slash,
    SlashEquals,
    Tilde,
}

impl TokenType {
    /// Whether this is the token for a word in the keyword table, including `true`, `false` and `null`.
    pub fn is_keyword(self) -> bool {
        use TokenType::*;
        (KeywordAs <= self && self <= KeywordYield)
            || matches!(self, LiteralFalse | LiteralNull | LiteralTrue)
    }

    /// Token category as named in diagnostics.
    pub fn kind(self) -> &'static str {
        use TokenType::*;
        match self {
            BraceClose | BraceOpen | BracketClose | BracketOpen | Colon | Comma | Dot
            | DotDotDot | ParenthesisClose | ParenthesisOpen | QuestionDot
            | QuestionDotBracketOpen | QuestionDotParenthesisOpen | Semicolon => "punc",
            EqualsChevronRight => "arrow",
            KeywordIn | KeywordInstanceof | KeywordTypeof | KeywordNew | KeywordVoid
            | KeywordDelete => "operator",
            KeywordBreak | KeywordCase | KeywordCatch | KeywordClass | KeywordConst
            | KeywordContinue | KeywordDebugger | KeywordDefault | KeywordDo | KeywordElse
            | KeywordExport | KeywordExtends | KeywordFinally | KeywordFor | KeywordFunction
            | KeywordIf | KeywordLet | KeywordReturn | KeywordSwitch | KeywordThrow | KeywordTry
            | KeywordVar | KeywordWhile | KeywordWith => "keyword",
            LiteralTrue | LiteralFalse | LiteralNull => "atom",
            Identifier | KeywordAs | KeywordAsync | KeywordAwait | KeywordConstructor
            | KeywordFrom | KeywordGet | KeywordImport | KeywordOf | KeywordSet | KeywordStatic
            | KeywordSuper | KeywordThis | KeywordYield => "name",
            LiteralNumber | LiteralNumberHex | LiteralNumberBin | LiteralNumberOct => "num",
            LiteralBigInt => "big_int",
            LiteralString => "string",
            LiteralRegex => "regexp",
            LiteralTemplatePartString | LiteralTemplatePartStringEnd => "template_string",
            PrivateMember => "privatename",
            EOF => "eof",
            _ => "operator",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Token {
    loc: SourceRange,
    // Set if a line terminator appears between the previous token and this one, including inside a
    // multi-line comment. Drives ASI.
    preceded_by_line_terminator: bool,
    typ: TokenType,
}

impl Token {
    pub fn new(loc: SourceRange, typ: TokenType, preceded_by_line_terminator: bool) -> Token {
        Token {
            loc,
            typ,
            preceded_by_line_terminator,
        }
    }

    pub fn typ(&self) -> TokenType {
        self.typ
    }

    pub fn loc(&self) -> &SourceRange {
        &self.loc
    }

    pub fn loc_take(self) -> SourceRange {
        self.loc
    }

    pub fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
        SyntaxError::from_loc(&self.loc, typ)
    }

    /// The "Unexpected token" diagnostic for this token.
    pub fn unexpected(&self) -> SyntaxError {
        if self.typ == TokenType::EOF {
            return self.error(SyntaxErrorType::UnexpectedEnd);
        };
        let raw = self.loc.as_str();
        let raw = match self.typ {
            TokenType::LiteralString => &raw[1..raw.len() - 1],
            TokenType::QuestionDotBracketOpen | TokenType::QuestionDotParenthesisOpen => "?.",
            _ => raw,
        };
        self.error(SyntaxErrorType::UnexpectedToken {
            kind: self.typ.kind(),
            raw: raw.to_string(),
        })
    }

    pub fn preceded_by_line_terminator(&self) -> bool {
        self.preceded_by_line_terminator
    }
}
