use std::fmt::{self, Debug, Formatter};

use thiserror::Error;

use crate::source::{Source, SourceRange};

/// Every diagnostic the tokenizer and parser can raise. The `Display` text is stable: hosts match
/// on it.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum SyntaxErrorType {
    // Lexical.
    #[error("Invalid escape sequence")]
    InvalidCharacterEscape,
    #[error("Unterminated regular expression")]
    LineTerminatorInRegex,
    #[error("Unterminated string constant")]
    LineTerminatorInString,
    #[error("Invalid number")]
    MalformedLiteralNumber,
    #[error("Unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("Unterminated multiline comment")]
    UnterminatedComment,
    #[error("Unterminated regular expression")]
    UnterminatedRegex,
    #[error("Unterminated string constant")]
    UnterminatedString,
    #[error("Unterminated template")]
    UnterminatedTemplate,

    // Grammar.
    #[error("break not inside a loop or switch")]
    BreakOutsideLoopOrSwitch,
    #[error("continue not inside a loop")]
    ContinueOutsideLoop,
    #[error("Continue label {0} does not refer to a loop")]
    ContinueLabelNotLoop(String),
    #[error("Label {0} defined twice")]
    DuplicateLabel(String),
    #[error("Parameter {0} declared twice")]
    DuplicateParameter(String),
    #[error("Unexpected {0} in strict mode")]
    EvalOrArgumentsInStrictMode(String),
    #[error("Invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("Unexpected newline before arrow")]
    LineTerminatorBeforeArrow,
    #[error("Illegal newline after throw")]
    LineTerminatorAfterThrow,
    #[error("Legacy octal literals are not allowed in strict mode")]
    LegacyOctalInStrictMode,
    #[error("Nullish coalescing cannot be mixed with || or && without parentheses")]
    NullishCoalescingMixedWithLogical,
    #[error("'return' outside of function")]
    ReturnOutsideFunction,
    #[error("'super' keyword outside a method")]
    SuperOutsideMethod,
    #[error("Missing catch or finally after try")]
    TryWithoutCatchOrFinally,
    #[error("Undefined label {0}")]
    UndefinedLabel(String),
    #[error("Unexpected token: eof (end of input)")]
    UnexpectedEnd,
    #[error("Unexpected token: {kind} ({raw})")]
    UnexpectedToken { kind: &'static str, raw: String },
    #[error("Strict mode code may not include a with statement")]
    WithInStrictMode,
    #[error("Yield cannot be used as identifier inside generators")]
    YieldIdentifierInGenerator,
    #[error("Yield cannot be used as label inside generators")]
    YieldLabelInGenerator,
    #[error("Unexpected yield identifier inside strict mode")]
    YieldIdentifierInStrictMode,
    #[error("Unexpected yield identifier as parameter inside strict mode")]
    YieldParameterInStrictMode,
    #[error("Yield expression not allowed in formal parameter")]
    YieldInParameters,
}

impl SyntaxErrorType {
    /// Whether the error was raised while forming a token rather than while applying grammar rules.
    pub fn is_lexical(&self) -> bool {
        matches!(
            self,
            SyntaxErrorType::InvalidCharacterEscape
                | SyntaxErrorType::LineTerminatorInRegex
                | SyntaxErrorType::LineTerminatorInString
                | SyntaxErrorType::MalformedLiteralNumber
                | SyntaxErrorType::UnexpectedCharacter(_)
                | SyntaxErrorType::UnterminatedComment
                | SyntaxErrorType::UnterminatedRegex
                | SyntaxErrorType::UnterminatedString
                | SyntaxErrorType::UnterminatedTemplate
        )
    }
}

#[derive(Clone, Error)]
#[error("{typ} ({line}:{col})")]
pub struct SyntaxError {
    typ: SyntaxErrorType,
    position: usize,
    line: usize,
    col: usize,
}

impl SyntaxError {
    pub fn new(typ: SyntaxErrorType, source: &Source, position: usize) -> SyntaxError {
        let (line, col) = source.line_col(position);
        SyntaxError {
            typ,
            position,
            line,
            col,
        }
    }

    pub fn from_loc(loc: &SourceRange, typ: SyntaxErrorType) -> SyntaxError {
        SyntaxError::new(typ, &loc.source, loc.start)
    }

    pub fn typ(&self) -> &SyntaxErrorType {
        &self.typ
    }

    pub fn message(&self) -> String {
        self.typ.to_string()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn col(&self) -> usize {
        self.col
    }
}

impl Debug for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "{:?} [{}:{} @{}]",
            self.typ, self.line, self.col, self.position
        ))
    }
}

impl PartialEq for SyntaxError {
    fn eq(&self, other: &Self) -> bool {
        self.typ == other.typ
    }
}

impl Eq for SyntaxError {}

pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// An AST shape that the parser never produces reached the compressor or the printer. This is a
/// defect in this crate, not in the input.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("internal invariant violated: {0}")]
pub struct InvariantError(pub String);

impl InvariantError {
    pub fn new<T: Into<String>>(msg: T) -> InvariantError {
        InvariantError(msg.into())
    }
}

#[derive(Debug, Error)]
pub enum MinifyError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("compression failed: {0}")]
    Compress(#[source] InvariantError),
    #[error("printing failed: {0}")]
    Emit(#[source] InvariantError),
}
