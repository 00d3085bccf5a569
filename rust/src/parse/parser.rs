use crate::error::{SyntaxError, SyntaxErrorType, SyntaxResult};
use crate::lex::{lex_next, LexMode, Lexer, LexerCheckpoint};
use crate::parse::context::ContextFrame;
use crate::parse::toplevel::TopLevelMode;
use crate::source::{Source, SourceRange};
use crate::token::{Token, TokenType};

#[derive(Debug)]
pub struct MaybeToken {
    range: SourceRange,
    matched: bool,
}

impl MaybeToken {
    pub fn is_match(&self) -> bool {
        self.matched
    }

    pub fn match_loc(&self) -> Option<&SourceRange> {
        if self.matched {
            Some(&self.range)
        } else {
            None
        }
    }

    pub fn match_loc_take(self) -> Option<SourceRange> {
        if self.matched {
            Some(self.range)
        } else {
            None
        }
    }

    pub fn and_then<R, F: FnOnce() -> SyntaxResult<R>>(self, f: F) -> SyntaxResult<Option<R>> {
        Ok(if self.matched { Some(f()?) } else { None })
    }
}

pub struct ParserCheckpoint {
    checkpoint: LexerCheckpoint,
}

struct BufferedToken {
    token: Token,
    lex_mode: LexMode,
    after_checkpoint: LexerCheckpoint,
}

pub struct Parser {
    lexer: Lexer,
    buffered: Option<BufferedToken>,
    mode: TopLevelMode,
    ctx: Vec<ContextFrame>,
}

impl Parser {
    pub fn new(lexer: Lexer, mode: TopLevelMode) -> Parser {
        Parser {
            lexer,
            buffered: None,
            mode,
            ctx: vec![ContextFrame::top_level(mode == TopLevelMode::Module)],
        }
    }

    pub fn mode(&self) -> TopLevelMode {
        self.mode
    }

    pub fn source(&self) -> &Source {
        self.lexer.source()
    }

    pub fn source_range(&self) -> SourceRange {
        self.lexer.source_range()
    }

    pub fn ctx(&self) -> &ContextFrame {
        // There is always the top-level frame.
        &self.ctx[self.ctx.len() - 1]
    }

    pub fn ctx_mut(&mut self) -> &mut ContextFrame {
        let last = self.ctx.len() - 1;
        &mut self.ctx[last]
    }

    /// Runs `f` with `frame` as the innermost context. The frame is popped even if `f` fails, as
    /// callers may backtrack and continue.
    pub fn with_frame<R, F: FnOnce(&mut Parser) -> SyntaxResult<R>>(
        &mut self,
        frame: ContextFrame,
        f: F,
    ) -> SyntaxResult<(R, ContextFrame)> {
        self.ctx.push(frame);
        let res = f(self);
        let frame = self.ctx.pop();
        let res = res?;
        // The top-level frame is never popped, so this is always Some.
        Ok((res, frame.unwrap_or_default()))
    }

    fn with_flag<R, F: FnOnce(&mut Parser) -> SyntaxResult<R>>(
        &mut self,
        flag: fn(&mut ContextFrame) -> &mut bool,
        f: F,
    ) -> SyntaxResult<R> {
        let prev = *flag(self.ctx_mut());
        *flag(self.ctx_mut()) = true;
        let res = f(self);
        *flag(self.ctx_mut()) = prev;
        res
    }

    pub fn in_loop_body<R, F: FnOnce(&mut Parser) -> SyntaxResult<R>>(
        &mut self,
        f: F,
    ) -> SyntaxResult<R> {
        self.with_flag(|c| &mut c.in_loop, f)
    }

    pub fn in_switch_body<R, F: FnOnce(&mut Parser) -> SyntaxResult<R>>(
        &mut self,
        f: F,
    ) -> SyntaxResult<R> {
        self.with_flag(|c| &mut c.in_switch, f)
    }

    pub fn in_params<R, F: FnOnce(&mut Parser) -> SyntaxResult<R>>(
        &mut self,
        f: F,
    ) -> SyntaxResult<R> {
        self.with_flag(|c| &mut c.in_params, f)
    }

    pub fn lexer_mut(&mut self) -> &mut Lexer {
        &mut self.lexer
    }

    pub fn clear_buffered(&mut self) -> () {
        self.buffered = None;
    }

    pub fn error_at(&self, loc: &SourceRange, typ: SyntaxErrorType) -> SyntaxError {
        SyntaxError::from_loc(loc, typ)
    }

    pub fn checkpoint(&self) -> ParserCheckpoint {
        ParserCheckpoint {
            checkpoint: self.lexer.checkpoint(),
        }
    }

    pub fn since_checkpoint(&self, checkpoint: &ParserCheckpoint) -> SourceRange {
        self.lexer.since_checkpoint(checkpoint.checkpoint)
    }

    pub fn restore_checkpoint(&mut self, checkpoint: ParserCheckpoint) -> () {
        self.buffered = None;
        self.lexer.apply_checkpoint(checkpoint.checkpoint);
    }

    fn forward<K: FnOnce(&Token) -> bool>(&mut self, mode: LexMode, keep: K) -> SyntaxResult<Token> {
        match self.buffered.take() {
            Some(b) if b.lex_mode == mode => Ok(if keep(&b.token) {
                self.lexer.apply_checkpoint(b.after_checkpoint);
                b.token
            } else {
                let t = b.token.clone();
                self.buffered = Some(b);
                t
            }),
            _ => {
                // A lexer checkpoint; restoring a parser checkpoint would drop the buffer.
                let cp = self.lexer.checkpoint();
                let t = lex_next(&mut self.lexer, mode)?;
                self.buffered = if keep(&t) {
                    None
                } else {
                    let after_checkpoint = self.lexer.checkpoint();
                    self.lexer.apply_checkpoint(cp);
                    Some(BufferedToken {
                        token: t.clone(),
                        lex_mode: mode,
                        after_checkpoint,
                    })
                };
                Ok(t)
            }
        }
    }

    pub fn next_with_mode(&mut self, mode: LexMode) -> SyntaxResult<Token> {
        self.forward(mode, |_| true)
    }

    pub fn next(&mut self) -> SyntaxResult<Token> {
        self.next_with_mode(LexMode::Standard)
    }

    pub fn peek_with_mode(&mut self, mode: LexMode) -> SyntaxResult<Token> {
        self.forward(mode, |_| false)
    }

    pub fn peek(&mut self) -> SyntaxResult<Token> {
        self.peek_with_mode(LexMode::Standard)
    }

    /// Type of the token after the next one.
    pub fn peek_second(&mut self) -> SyntaxResult<Token> {
        let cp = self.checkpoint();
        self.next()?;
        let t = self.peek();
        self.restore_checkpoint(cp);
        t
    }

    pub fn consume_peeked(&mut self) -> () {
        if let Some(b) = self.buffered.take() {
            self.lexer.apply_checkpoint(b.after_checkpoint);
        };
    }

    pub fn maybe_with_mode(&mut self, typ: TokenType, mode: LexMode) -> SyntaxResult<MaybeToken> {
        let t = self.forward(mode, |t| t.typ() == typ)?;
        Ok(MaybeToken {
            matched: t.typ() == typ,
            range: t.loc_take(),
        })
    }

    pub fn consume_if(&mut self, typ: TokenType) -> SyntaxResult<MaybeToken> {
        self.maybe_with_mode(typ, LexMode::Standard)
    }

    pub fn consume_if_pred<F: FnOnce(&Token) -> bool>(&mut self, pred: F) -> SyntaxResult<MaybeToken> {
        let mut matched = false;
        let t = self.forward(LexMode::Standard, |t| {
            matched = pred(t);
            matched
        })?;
        Ok(MaybeToken {
            matched,
            range: t.loc_take(),
        })
    }

    pub fn require_with_mode(&mut self, typ: TokenType, mode: LexMode) -> SyntaxResult<Token> {
        let t = self.next_with_mode(mode)?;
        if t.typ() != typ {
            Err(t.unexpected())
        } else {
            Ok(t)
        }
    }

    pub fn require_predicate<P: FnOnce(TokenType) -> bool>(&mut self, pred: P) -> SyntaxResult<Token> {
        let t = self.next_with_mode(LexMode::Standard)?;
        if !pred(t.typ()) {
            Err(t.unexpected())
        } else {
            Ok(t)
        }
    }

    pub fn require(&mut self, typ: TokenType) -> SyntaxResult<Token> {
        self.require_with_mode(typ, LexMode::Standard)
    }

    /// Ends a statement: consumes `;`, or accepts an inserted one before `}`, the end of input, or a
    /// line break.
    pub fn require_semicolon_or_asi(&mut self) -> SyntaxResult<()> {
        let t = self.peek()?;
        match t.typ() {
            TokenType::Semicolon => {
                self.consume_peeked();
                Ok(())
            }
            TokenType::BraceClose | TokenType::EOF => Ok(()),
            _ if t.preceded_by_line_terminator() => Ok(()),
            _ => Err(t.unexpected()),
        }
    }
}
