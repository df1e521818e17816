/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Matching / expecting keywords and punctuation
/// - Error recovery (`synchronize`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    fn check_keyword(&self, id: KeywordId) -> bool {
        self.stream.peek().kind.is_keyword(id)
    }

    fn check_punct(&self, id: PunctuationId) -> bool {
        self.stream.peek().kind.is_punctuation(id)
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.stream.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.stream.advance();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, id: PunctuationId) -> CompileResult<Span> {
        expect_punct(&mut self.stream, id)
    }

    fn identifier(&mut self) -> CompileResult<Spanned<Ident>> {
        expect_ident(&mut self.stream)
    }

    /// Skip to just past the next `;` (or to the end).
    fn synchronize(&mut self) {
        while !self.stream.at_end() {
            if self.stream.advance().kind.is_punctuation(PunctuationId::Semicolon) {
                return;
            }
        }
    }

    fn current_span(&self) -> Span {
        self.stream.current_span()
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.stream.previous_span())
    }
}
