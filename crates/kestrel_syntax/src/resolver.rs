//! Resolvers: map tokens (or short token windows) to tree nodes.
//!
//! - [`KindResolver`] resolves a single token against a closed enumeration ([`ClosedSet`]); the primitive-type
//!   and modifier resolvers are instances of it.
//! - [`resolve_literal`] decodes a literal token into a [`Literal`] value.
//! - [`TypeResolver`] resolves the composite type production from a [`TokenStream`].
//!
//! ## Notes
//! - Every resolver is all-or-nothing. On failure nothing is returned but the diagnostic, and
//!   [`TypeResolver::resolve`] leaves the stream where it started.
//! - A token outside a resolver's domain always raises an illegal-token diagnostic carrying that exact token.

use std::marker::PhantomData;

use kestrel_core::lang::keywords::KeywordId;
use kestrel_core::lang::punctuation::{self, PunctuationId};
use kestrel_core::lang::types;

use crate::ast::{
    ArrayType, Literal, Modifier, ParameterizedType, PrimitiveType, QualifiedName, ReferenceType, Span, Spanned,
    TypeArg, TypeDenoting, TypeNode, WildcardBound,
};
use crate::diagnostics::{CompileError, CompileResult, errors};
use crate::func::{CompileFunction, CompilePredicate};
use crate::lexer::{Token, TokenKind, unescape};
use crate::stream::TokenStream;

// ============================================================================
// Closed enumerations
// ============================================================================

/// A closed enumeration whose members are each recognised by exactly one token kind.
pub trait ClosedSet: Copy + Eq + 'static {
    /// Expectation label used in illegal-token diagnostics (e.g. `"primitive type"`).
    const EXPECTED: &'static str;

    fn members() -> &'static [Self];

    /// The token kind this member is spelled as.
    fn token_kind(self) -> TokenKind;
}

impl ClosedSet for PrimitiveType {
    const EXPECTED: &'static str = "primitive type";

    fn members() -> &'static [Self] {
        &PrimitiveType::ALL
    }

    fn token_kind(self) -> TokenKind {
        TokenKind::Keyword(types::keyword(self))
    }
}

impl ClosedSet for Modifier {
    const EXPECTED: &'static str = "modifier";

    fn members() -> &'static [Self] {
        &Modifier::ALL
    }

    fn token_kind(self) -> TokenKind {
        TokenKind::Keyword(match self {
            Modifier::Public => KeywordId::Public,
            Modifier::Private => KeywordId::Private,
            Modifier::Protected => KeywordId::Protected,
            Modifier::Static => KeywordId::Static,
            Modifier::Final => KeywordId::Final,
        })
    }
}

/// `true` if no two members of `T` share a token kind.
pub fn is_bijective<T: ClosedSet>() -> bool {
    let members = T::members();
    members
        .iter()
        .enumerate()
        .all(|(i, a)| members[i + 1..].iter().all(|b| a.token_kind() != b.token_kind()))
}

// ============================================================================
// Single-token resolvers
// ============================================================================

/// Resolves a token to the member of `T` it spells.
pub struct KindResolver<T> {
    _set: PhantomData<fn() -> T>,
}

pub type PrimitiveTypeResolver = KindResolver<PrimitiveType>;
pub type ModifierResolver = KindResolver<Modifier>;

impl<T: ClosedSet> KindResolver<T> {
    pub const fn new() -> Self {
        Self { _set: PhantomData }
    }

    /// Linear scan over `T::members()`; the first (and, for a bijective set, only) match wins.
    ///
    /// ## Errors
    /// An illegal-token diagnostic with expectation [`ClosedSet::EXPECTED`] if no member matches.
    pub fn resolve(&self, token: &Token) -> CompileResult<T> {
        T::members()
            .iter()
            .copied()
            .find(|m| m.token_kind() == token.kind)
            .ok_or_else(|| CompileError::illegal_token(token, T::EXPECTED))
    }

    pub fn accepts(&self, kind: &TokenKind) -> bool {
        T::members().iter().any(|m| m.token_kind() == *kind)
    }
}

impl<T: ClosedSet> Default for KindResolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: ClosedSet> CompileFunction<&'a Token, T> for KindResolver<T> {
    fn apply(&self, token: &'a Token) -> CompileResult<T> {
        self.resolve(token)
    }
}

impl<T: ClosedSet> CompilePredicate<TokenKind> for KindResolver<T> {
    fn test(&self, kind: &TokenKind) -> CompileResult<bool> {
        Ok(self.accepts(kind))
    }
}

pub fn resolve_primitive(token: &Token) -> CompileResult<PrimitiveType> {
    PrimitiveTypeResolver::new().resolve(token)
}

/// Decode a literal token.
///
/// ## Errors
/// - Illegal token (expected `"literal"`) if `token` is not a literal.
/// - Semantic `literal_out_of_range` if a numeric value does not fit its type.
pub fn resolve_literal(token: &Token) -> CompileResult<Spanned<Literal>> {
    let text = token.text.as_str();
    let literal = match token.kind {
        TokenKind::IntLiteral => {
            let (digits, is_long) = match text.strip_suffix(|c: char| matches!(c, 'L' | 'l')) {
                Some(digits) => (digits, true),
                None => (text, false),
            };
            let digits = digits.replace('_', "");
            if is_long {
                let value = digits
                    .parse::<i64>()
                    .map_err(|_| errors::literal_out_of_range(text, "long", token.span))?;
                Literal::Long(value)
            } else {
                let value = digits
                    .parse::<i32>()
                    .map_err(|_| errors::literal_out_of_range(text, "int", token.span))?;
                Literal::Int(value)
            }
        }
        TokenKind::FloatLiteral => {
            let (digits, is_float) = match text.strip_suffix(|c: char| matches!(c, 'f' | 'F')) {
                Some(digits) => (digits, true),
                None => (text.strip_suffix(|c: char| matches!(c, 'd' | 'D')).unwrap_or(text), false),
            };
            let digits = digits.replace('_', "");
            if is_float {
                match digits.parse::<f32>() {
                    Ok(v) if v.is_finite() => Literal::Float(v),
                    _ => return Err(errors::literal_out_of_range(text, "float", token.span)),
                }
            } else {
                match digits.parse::<f64>() {
                    Ok(v) if v.is_finite() => Literal::Double(v),
                    _ => return Err(errors::literal_out_of_range(text, "double", token.span)),
                }
            }
        }
        TokenKind::CharLiteral => {
            let decoded = quoted_body(token).and_then(unescape);
            let mut chars = decoded.as_deref().unwrap_or_default().chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Literal::Char(c),
                _ => return Err(CompileError::lexical("Malformed character literal", token.span)),
            }
        }
        TokenKind::StringLiteral => match quoted_body(token).and_then(unescape) {
            Some(s) => Literal::String(s),
            None => return Err(CompileError::lexical("Malformed string literal", token.span)),
        },
        TokenKind::Keyword(KeywordId::True) => Literal::Bool(true),
        TokenKind::Keyword(KeywordId::False) => Literal::Bool(false),
        TokenKind::Keyword(KeywordId::Null) => Literal::Null,
        _ => return Err(CompileError::illegal_token(token, "literal")),
    };
    Ok(Spanned::new(literal, token.span))
}

fn quoted_body(token: &Token) -> Option<&str> {
    let text = token.text.as_str();
    text.get(1..text.len().checked_sub(1)?)
}

// ============================================================================
// Composite type resolver
// ============================================================================

/// Resolves `Type := (Primitive | QualifiedName [TypeArgs]) {"[" "]"}`.
///
/// ```text
/// TypeArgs := "<" TypeArg {"," TypeArg} ">"
/// TypeArg  := Type                       (must denote a reference type)
///           | "?" [("extends" | "super") Type]
/// ```
pub struct TypeResolver;

impl TypeResolver {
    /// Resolve one type starting at the stream's cursor.
    ///
    /// ## Errors
    /// The first illegal or missing token. The stream is rewound to where resolution started.
    pub fn resolve(stream: &mut TokenStream<'_>) -> CompileResult<Spanned<TypeNode>> {
        let start = stream.checkpoint();
        let result = Self::ty(stream);
        if result.is_err() {
            stream.rewind(start);
        }
        result
    }

    /// `true` if the current token can begin a type.
    pub fn starts_type(stream: &TokenStream<'_>) -> bool {
        let kind = stream.peek_kind();
        kind == TokenKind::Ident || PrimitiveTypeResolver::new().accepts(&kind)
    }

    fn ty(stream: &mut TokenStream<'_>) -> CompileResult<Spanned<TypeNode>> {
        let mut ty = Self::base(stream)?;
        while stream.peek().kind.is_punctuation(PunctuationId::LBracket) {
            stream.advance();
            let close = expect_punct(stream, PunctuationId::RBracket)?;
            let span = ty.span.merge(close);
            ty = Spanned::new(TypeNode::Array(ArrayType { element: Box::new(ty) }), span);
        }
        Ok(ty)
    }

    fn base(stream: &mut TokenStream<'_>) -> CompileResult<Spanned<TypeNode>> {
        let primitives = PrimitiveTypeResolver::new();
        if primitives.accepts(&stream.peek_kind()) {
            let token = stream.advance();
            let primitive = primitives.resolve(token)?;
            return Ok(Spanned::new(TypeNode::Primitive(primitive), token.span));
        }
        if stream.peek_kind() != TokenKind::Ident {
            return Err(CompileError::illegal_token(stream.peek(), "type"));
        }

        let name = qualified_name(stream)?;
        let raw = ReferenceType { name: name.node };
        if !stream.peek().kind.is_punctuation(PunctuationId::LAngle) {
            return Ok(Spanned::new(TypeNode::Reference(raw), name.span));
        }

        stream.advance();
        let mut args = vec![Self::type_arg(stream)?];
        while stream.peek().kind.is_punctuation(PunctuationId::Comma) {
            stream.advance();
            args.push(Self::type_arg(stream)?);
        }
        let close = expect_punct(stream, PunctuationId::RAngle)?;
        Ok(Spanned::new(
            TypeNode::Parameterized(ParameterizedType { raw, args }),
            name.span.merge(close),
        ))
    }

    fn type_arg(stream: &mut TokenStream<'_>) -> CompileResult<Spanned<TypeArg>> {
        if stream.peek().kind.is_punctuation(PunctuationId::Question) {
            let question = stream.advance().span;
            let bound = match stream.peek_kind() {
                TokenKind::Keyword(KeywordId::Extends) => {
                    stream.advance();
                    Some(WildcardBound::Extends(Box::new(Self::reference_type(stream)?)))
                }
                TokenKind::Keyword(KeywordId::Super) => {
                    stream.advance();
                    Some(WildcardBound::Super(Box::new(Self::reference_type(stream)?)))
                }
                _ => None,
            };
            let span = match &bound {
                Some(WildcardBound::Extends(t) | WildcardBound::Super(t)) => question.merge(t.span),
                None => question,
            };
            return Ok(Spanned::new(TypeArg::Wildcard(bound), span));
        }

        let ty = Self::reference_type(stream)?;
        Ok(ty.map(TypeArg::Type))
    }

    /// A type that must denote a reference type; a bare primitive is rejected at its own token.
    fn reference_type(stream: &mut TokenStream<'_>) -> CompileResult<Spanned<TypeNode>> {
        let first = stream.peek().clone();
        let ty = Self::ty(stream)?;
        if ty.node.is_primitive() {
            return Err(CompileError::illegal_token(&first, "reference type").with_hint(format!(
                "Type arguments cannot be primitive; use a wrapper type instead of '{}'",
                first.text
            )));
        }
        Ok(ty)
    }
}

/// `Ident {"." Ident}`. Stops before a `.` that is not followed by an identifier.
pub fn qualified_name(stream: &mut TokenStream<'_>) -> CompileResult<Spanned<QualifiedName>> {
    let first = expect_ident(stream)?;
    let mut span = first.span;
    let mut segments = vec![first.node];
    while stream.peek().kind.is_punctuation(PunctuationId::Dot) && stream.peek_nth(1).kind == TokenKind::Ident {
        stream.advance();
        let segment = expect_ident(stream)?;
        span = span.merge(segment.span);
        segments.push(segment.node);
    }
    Ok(Spanned::new(QualifiedName::new(segments), span))
}

pub(crate) fn expect_ident(stream: &mut TokenStream<'_>) -> CompileResult<Spanned<String>> {
    if stream.peek_kind() == TokenKind::Ident {
        let token = stream.advance();
        Ok(Spanned::new(token.text.clone(), token.span))
    } else {
        Err(CompileError::illegal_token(stream.peek(), "identifier"))
    }
}

pub(crate) fn expect_punct(stream: &mut TokenStream<'_>, id: PunctuationId) -> CompileResult<Span> {
    if stream.peek().kind.is_punctuation(id) {
        Ok(stream.advance().span)
    } else {
        Err(CompileError::illegal_token(stream.peek(), format!("'{}'", punctuation::as_str(id))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;
    use crate::func::try_map;
    use crate::lexer::lex;

    fn token(source: &str) -> Token {
        lex(source).unwrap().remove(0)
    }

    fn resolve_type(source: &str) -> (CompileResult<Spanned<TypeNode>>, Token) {
        let tokens = lex(source).unwrap();
        let mut stream = TokenStream::new(&tokens);
        let result = TypeResolver::resolve(&mut stream);
        let next = stream.peek().clone();
        (result, next)
    }

    #[test]
    fn test_primitive_and_modifier_sets_are_bijective() {
        assert!(is_bijective::<PrimitiveType>());
        assert!(is_bijective::<Modifier>());
    }

    #[test]
    fn test_resolve_primitive_int() {
        assert_eq!(resolve_primitive(&token("int")).unwrap(), PrimitiveType::Int);
    }

    #[test]
    fn test_resolve_primitive_rejects_identifier() {
        let foo = token("foo");
        let err = resolve_primitive(&foo).unwrap_err();
        let illegal = err.as_illegal_token().unwrap();
        assert_eq!(illegal.expected, "primitive type");
        assert_eq!(illegal.token, foo);
        assert_eq!(err.message, "Expected primitive type, found identifier 'foo'");
    }

    #[test]
    fn test_modifier_resolver_as_function_and_predicate() {
        let tokens = lex("public static final").unwrap();
        let resolver = ModifierResolver::new();
        let modifiers = try_map(tokens[..3].iter(), &resolver).unwrap();
        assert_eq!(modifiers, vec![Modifier::Public, Modifier::Static, Modifier::Final]);
        assert!(resolver.test(&TokenKind::Keyword(KeywordId::Private)).unwrap());
        assert!(!resolver.test(&TokenKind::Keyword(KeywordId::Int)).unwrap());
    }

    #[test]
    fn test_resolve_literals() {
        let cases = [
            ("42", Literal::Int(42)),
            ("1_000", Literal::Int(1000)),
            ("9000000000L", Literal::Long(9_000_000_000)),
            ("2.5", Literal::Double(2.5)),
            ("1.5f", Literal::Float(1.5)),
            ("3d", Literal::Double(3.0)),
            ("'\\n'", Literal::Char('\n')),
            ("\"a\\tb\"", Literal::String("a\tb".to_string())),
            ("true", Literal::Bool(true)),
            ("null", Literal::Null),
        ];
        for (source, expected) in cases {
            let tok = token(source);
            let resolved = resolve_literal(&tok).unwrap();
            assert_eq!(resolved.node, expected, "{source}");
            assert_eq!(resolved.span, tok.span);
        }
    }

    #[test]
    fn test_int_literal_out_of_range_is_semantic() {
        let err = resolve_literal(&token("2147483648")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Semantic);
        assert!(err.message.contains("out of range for type 'int'"));
        assert_eq!(resolve_literal(&token("2147483647")).unwrap().node, Literal::Int(i32::MAX));
    }

    #[test]
    fn test_resolve_literal_rejects_non_literal() {
        let err = resolve_literal(&token("x")).unwrap_err();
        assert_eq!(err.as_illegal_token().unwrap().expected, "literal");
    }

    #[test]
    fn test_type_resolver_shapes() {
        let sources = [
            "int",
            "String",
            "java.util.List",
            "double[][]",
            "Map<String, List<Integer>>",
            "List<? extends Number>[]",
            "Box<?>",
            "Sink<? super int[]>",
        ];
        for source in sources {
            let (result, next) = resolve_type(source);
            let ty = result.unwrap_or_else(|e| panic!("{source}: {e}"));
            assert_eq!(ty.node.to_string(), source);
            assert!(next.is_eof(), "{source} left {next:?}");
        }
    }

    #[test]
    fn test_type_span_covers_production() {
        let (result, _) = resolve_type("Map<K, V>[]");
        assert_eq!(result.unwrap().span, Span::new(0, 11));
    }

    #[test]
    fn test_primitive_type_argument_is_illegal() {
        let tokens = lex("List<int> x").unwrap();
        let mut stream = TokenStream::new(&tokens);
        let err = TypeResolver::resolve(&mut stream).unwrap_err();
        let illegal = err.as_illegal_token().unwrap();
        assert_eq!(illegal.expected, "reference type");
        assert_eq!(illegal.token, tokens[2]);
        // all-or-nothing: nothing consumed
        assert_eq!(stream.peek(), &tokens[0]);
    }

    #[test]
    fn test_unclosed_type_arguments() {
        let (result, next) = resolve_type("List<String x");
        let err = result.unwrap_err();
        assert_eq!(err.as_illegal_token().unwrap().expected, "'>'");
        assert_eq!(next.text, "List");
    }

    #[test]
    fn test_qualified_name_stops_before_wildcard() {
        let tokens = lex("java.util.*").unwrap();
        let mut stream = TokenStream::new(&tokens);
        let name = qualified_name(&mut stream).unwrap();
        assert_eq!(name.node.to_string(), "java.util");
        assert!(stream.peek().kind.is_punctuation(PunctuationId::Dot));
    }
}
