//! Lexer for the Kestrel language
//!
//! Handles tokenization including:
//! - Keywords (`package`, `import`, modifiers, primitive type names, literals)
//! - Identifiers and literals (int, long, float, double, char, string)
//! - Punctuation (`; , . ( ) [ ] < > = * ?`)
//!
//! ## Trivia policy
//!
//! Whitespace, `// line` comments and `/* block */` comments are **discarded**. They never produce tokens and are
//! not attached to neighbouring tokens. Every other byte of the input belongs to exactly one token, spans never
//! overlap, and the token sequence always ends with a single `Eof`.
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)
//! - `strings` - String/char literal scanning and escape decoding
//! - `numbers` - Numeric literal scanning

mod numbers;
mod strings;
pub mod tokens;

pub use tokens::{Token, TokenKind, keyword_id};

pub(crate) use strings::unescape;

use crate::ast::Span;
use crate::diagnostics::{CompileError, CompileResult};
use crate::func::{CompileSupplier, drain_until};
use kestrel_core::lang::punctuation;

// ============================================================================
// LEXER STATE
// ============================================================================

/// Pull-based lexer for Kestrel source code.
///
/// [`Lexer::next_token`] produces one token per call and keeps returning `Eof` once the input is exhausted. A
/// lexical error is returned *after* the offending input has been consumed, so the caller may keep pulling to
/// find further errors.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
        }
    }

    /// Scan the next token.
    ///
    /// ## Errors
    /// Returns a lexical [`CompileError`] for an unexpected character, a malformed literal, or an unterminated
    /// string/char literal or block comment.
    pub fn next_token(&mut self) -> CompileResult<Token> {
        self.skip_trivia()?;

        let start = self.current_pos;
        let Some(c) = self.advance() else {
            return Ok(Token::eof(self.source.len()));
        };

        match c {
            c if is_ident_start(c) => Ok(self.scan_identifier(start)),
            c if c.is_ascii_digit() => self.scan_number(start),
            '.' if self.peek().is_some_and(|n| n.is_ascii_digit()) => self.scan_number(start),
            '"' => self.scan_string(start),
            '\'' => self.scan_char(start),
            c => match punctuation::from_char(c) {
                Some(id) => Ok(self.make_token(TokenKind::Punctuation(id), start)),
                None => Err(CompileError::lexical(
                    format!("Unexpected character '{}'", c.escape_debug()),
                    Span::new(start, self.current_pos),
                )),
            },
        }
    }

    /// Tokenize the entire source code.
    ///
    /// Returns a vector of tokens on success, or every lexical error found on failure. The token stream always
    /// ends with an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<CompileError>> {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        loop {
            match self.next_token() {
                Ok(token) if token.kind == TokenKind::Eof => {
                    tokens.push(token);
                    break;
                }
                Ok(token) => tokens.push(token),
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() { Ok(tokens) } else { Err(errors) }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next(); // skip current
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    fn make_token(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, &self.source[start..self.current_pos], Span::new(start, self.current_pos))
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    fn skip_trivia(&mut self) -> CompileResult<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_next() == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_next() == Some('*') => {
                    let start = self.current_pos;
                    self.advance();
                    self.advance();
                    let mut closed = false;
                    while let Some(c) = self.advance() {
                        if c == '*' && self.peek() == Some('/') {
                            self.advance();
                            closed = true;
                            break;
                        }
                    }
                    if !closed {
                        return Err(CompileError::lexical(
                            "Unterminated block comment",
                            Span::new(start, self.current_pos),
                        )
                        .with_hint("Close the comment with '*/'"));
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    fn scan_identifier(&mut self, start: usize) -> Token {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let spelling = &self.source[start..self.current_pos];

        if let Some(id) = keyword_id(spelling) {
            self.make_token(TokenKind::Keyword(id), start)
        } else {
            self.make_token(TokenKind::Ident, start)
        }
    }
}

impl CompileSupplier<Token> for Lexer<'_> {
    fn get(&mut self) -> CompileResult<Token> {
        self.next_token()
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can start an identifier (ASCII-only).
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

/// Check if a character can continue an identifier (ASCII-only).
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<CompileError>> {
    Lexer::new(source).tokenize()
}

/// Lex until `Eof`, stopping at the first lexical error.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex_fail_fast(source: &str) -> CompileResult<Vec<Token>> {
    drain_until(&mut Lexer::new(source), &|t: &Token| -> CompileResult<bool> { Ok(t.is_eof()) })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_core::lang::keywords::{self, KeywordId};
    use kestrel_core::lang::punctuation::PunctuationId;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keyword_registry_parity() {
        for k in keywords::KEYWORDS {
            let tokens = lex(k.canonical).unwrap();
            assert_eq!(tokens.len(), 2, "{} should lex to one token plus EOF", k.canonical);
            assert_eq!(tokens[0].kind, TokenKind::Keyword(k.id));
            assert_eq!(tokens[0].text, k.canonical);
        }
    }

    #[test]
    fn test_punctuation_registry_parity() {
        for p in punctuation::PUNCTUATION {
            let tokens = lex(p.canonical).unwrap_or_else(|errs| {
                panic!("lex({:?}) failed: {:?}", p.canonical, errs);
            });
            assert_eq!(tokens[0].kind, TokenKind::Punctuation(p.id));
            assert_eq!(tokens[1].kind, TokenKind::Eof);
        }
    }

    #[test]
    fn test_field_declaration() {
        assert_eq!(
            kinds("private static int count = 0;"),
            vec![
                TokenKind::Keyword(KeywordId::Private),
                TokenKind::Keyword(KeywordId::Static),
                TokenKind::Keyword(KeywordId::Int),
                TokenKind::Ident,
                TokenKind::Punctuation(PunctuationId::Eq),
                TokenKind::IntLiteral,
                TokenKind::Punctuation(PunctuationId::Semicolon),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_nested_type_arguments_are_separate_angles() {
        assert_eq!(
            kinds("Map<K,List<V>>"),
            vec![
                TokenKind::Ident,
                TokenKind::Punctuation(PunctuationId::LAngle),
                TokenKind::Ident,
                TokenKind::Punctuation(PunctuationId::Comma),
                TokenKind::Ident,
                TokenKind::Punctuation(PunctuationId::LAngle),
                TokenKind::Ident,
                TokenKind::Punctuation(PunctuationId::RAngle),
                TokenKind::Punctuation(PunctuationId::RAngle),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_and_whitespace_are_discarded() {
        let source = "// header\nint /* inline */ x; /* trailing */\n";
        let tokens = lex(source).unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["int", "x", ";", ""]);
        assert_eq!(tokens[0].span, Span::new(10, 13));
        assert_eq!(tokens.last().unwrap().span, Span::new(source.len(), source.len()));
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(kinds("Int"), vec![TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn test_unexpected_character_reports_and_continues() {
        let errs = lex("int # x; @").unwrap_err();
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().all(CompileError::is_lexical));
        assert_eq!(errs[0].span, Span::new(4, 5));
        assert!(errs[0].message.contains("'#'"), "got: {}", errs[0].message);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let errs = lex("int x; /* never closed").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].message, "Unterminated block comment");
        assert_eq!(errs[0].span, Span::new(7, 22));
    }

    #[test]
    fn test_next_token_repeats_eof() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Ident);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn test_lexer_is_a_supplier() {
        let mut lexer = Lexer::new("a b");
        let first = CompileSupplier::get(&mut lexer).unwrap();
        assert_eq!(first.text, "a");
    }

    #[test]
    fn test_lex_fail_fast_stops_at_first_error() {
        let err = lex_fail_fast("int # x; @").unwrap_err();
        assert_eq!(err.span, Span::new(4, 5));

        let tokens = lex_fail_fast("int x;").unwrap();
        assert_eq!(tokens.len(), 4);
        assert!(tokens[3].is_eof());
    }
}
