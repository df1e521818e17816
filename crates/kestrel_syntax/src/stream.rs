//! Cursor over a lexed token sequence.
//!
//! [`TokenStream`] is what the parser and the composite resolvers read from. It never runs past the final
//! `Eof`: peeking beyond the end keeps returning that `Eof`.
//!
//! ## Notes
//! - Checkpoints are plain positions. [`TokenStream::rewind`] is how all-or-nothing productions undo a failed
//!   attempt.
//! - The sequence is **restartable once**: [`TokenStream::restart`] rewinds to the first token the first time
//!   it is called and fails with an internal diagnostic afterwards.

use crate::ast::Span;
use crate::diagnostics::{CompileError, CompileResult, errors};
use crate::func::{CompilePredicate, CompileSupplier};
use crate::lexer::{Token, TokenKind};

/// Saved stream position; see [`TokenStream::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

pub struct TokenStream<'a> {
    tokens: &'a [Token],
    pos: usize,
    restarted: bool,
    eof: Token,
}

impl<'a> TokenStream<'a> {
    /// Create a stream over `tokens`. A missing trailing `Eof` is synthesised at the end of the last token.
    pub fn new(tokens: &'a [Token]) -> Self {
        let eof = match tokens.last() {
            Some(t) if t.is_eof() => t.clone(),
            Some(t) => Token::eof(t.span.end),
            None => Token::eof(0),
        };
        Self {
            tokens,
            pos: 0,
            restarted: false,
            eof,
        }
    }

    pub fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    /// The token `n` positions ahead of the cursor (`peek_nth(0) == peek()`).
    pub fn peek_nth(&self, n: usize) -> &Token {
        self.tokens.get(self.pos + n).unwrap_or(&self.eof)
    }

    pub fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    /// Consume and return the current token. At the end this keeps returning `Eof`.
    pub fn advance(&mut self) -> &Token {
        let at = self.pos;
        if self.tokens.get(at).is_some_and(|t| !t.is_eof()) {
            self.pos += 1;
        }
        self.tokens.get(at).unwrap_or(&self.eof)
    }

    pub fn at_end(&self) -> bool {
        self.peek().is_eof()
    }

    /// Span of the current token.
    pub fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Span of the most recently consumed token (the start of the input if nothing was consumed).
    pub fn previous_span(&self) -> Span {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(t) => t.span,
            None => Span::new(0, 0),
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.pos)
    }

    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.0.min(self.tokens.len());
    }

    /// Rewind to the first token. Allowed once per stream.
    ///
    /// ## Errors
    /// Returns an internal diagnostic on the second call.
    pub fn restart(&mut self) -> CompileResult<()> {
        if self.restarted {
            return Err(CompileError::internal(
                "Token stream has already been restarted once",
                self.current_span(),
            ));
        }
        self.restarted = true;
        self.pos = 0;
        Ok(())
    }

    /// Consume tokens while `predicate` accepts their kind.
    pub fn take_while<P>(&mut self, predicate: &P) -> CompileResult<Vec<Token>>
    where
        P: CompilePredicate<TokenKind> + ?Sized,
    {
        let mut taken = Vec::new();
        while !self.at_end() && predicate.test(&self.peek_kind())? {
            taken.push(self.advance().clone());
        }
        Ok(taken)
    }
}

impl CompileSupplier<Token> for TokenStream<'_> {
    /// Hands out every token including the final `Eof`, then fails.
    fn get(&mut self) -> CompileResult<Token> {
        let end = if self.tokens.last().is_some_and(Token::is_eof) {
            self.tokens.len()
        } else {
            self.tokens.len() + 1
        };
        if self.pos >= end {
            return Err(errors::unexpected_end_of_input("another token", self.eof.span.end));
        }
        let token = self.tokens.get(self.pos).unwrap_or(&self.eof).clone();
        self.pos += 1;
        Ok(token)
    }
}
