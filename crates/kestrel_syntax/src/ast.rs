//! Syntax tree definitions for Kestrel
//!
//! The tree is a closed set of variants unified by small capability traits instead of a shared base type:
//!
//! - [`SyntaxNode`]: every node; reports a stable label for diagnostics and dumps.
//! - [`TypeDenoting`]: every node that can appear where a type is expected.
//! - [`Declares`]: every node that introduces a name.
//!
//! ## Notes
//! - Nodes own their children exclusively (`Box`/`Vec`). There are no back-references.
//! - Nodes are immutable once the parser hands them out; every field is plain data.

use std::fmt;

pub use kestrel_core::lang::types::PrimitiveType;

/// Source location span (byte offsets, half-open)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned::new(f(self.node), self.span)
    }
}

pub type Ident = String;

// ============================================================================
// Capabilities
// ============================================================================

/// Implemented by every tree node.
pub trait SyntaxNode {
    /// Stable, human-readable label of the production (e.g. `"array type"`).
    fn node_name(&self) -> &'static str;
}

/// Implemented by every node usable where a type is expected.
///
/// ## Notes
/// - Arrays are reference types, whatever their element type.
pub trait TypeDenoting: SyntaxNode + fmt::Display {
    fn is_primitive(&self) -> bool;

    fn is_reference(&self) -> bool {
        !self.is_primitive()
    }

    /// Number of `[]` dimensions.
    fn array_depth(&self) -> usize {
        0
    }

    /// The type with every type argument removed (`List<String>[]` erases to `List[]`).
    fn erasure(&self) -> TypeNode;
}

/// Implemented by nodes that introduce a name into the compilation unit.
pub trait Declares: SyntaxNode {
    fn name(&self) -> &str;
}

// ============================================================================
// Compilation unit
// ============================================================================

/// Root of the tree: one parsed source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompilationUnit {
    pub package: Option<Spanned<QualifiedName>>,
    pub imports: Vec<Spanned<ImportDecl>>,
    pub members: Vec<Spanned<Member>>,
}

impl SyntaxNode for CompilationUnit {
    fn node_name(&self) -> &'static str {
        "compilation unit"
    }
}

/// Dotted name such as `java.util.List`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub segments: Vec<Ident>,
}

impl QualifiedName {
    pub fn new(segments: Vec<Ident>) -> Self {
        Self { segments }
    }

    /// Last segment (`List` for `java.util.List`).
    pub fn simple_name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// `import a.b.C;` or `import a.b.*;`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub path: QualifiedName,
    pub wildcard: bool,
}

impl SyntaxNode for ImportDecl {
    fn node_name(&self) -> &'static str {
        "import"
    }
}

// ============================================================================
// Members
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Static,
    Final,
}

impl Modifier {
    pub const ALL: [Modifier; 5] = [
        Modifier::Public,
        Modifier::Private,
        Modifier::Protected,
        Modifier::Static,
        Modifier::Final,
    ];

    pub fn is_access(self) -> bool {
        matches!(self, Modifier::Public | Modifier::Private | Modifier::Protected)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Modifier::Public => "public",
            Modifier::Private => "private",
            Modifier::Protected => "protected",
            Modifier::Static => "static",
            Modifier::Final => "final",
        };
        f.write_str(s)
    }
}

/// Top-level member declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
}

impl Member {
    pub fn modifiers(&self) -> &[Spanned<Modifier>] {
        match self {
            Member::Field(f) => &f.modifiers,
            Member::Method(m) => &m.modifiers,
        }
    }
}

impl SyntaxNode for Member {
    fn node_name(&self) -> &'static str {
        match self {
            Member::Field(f) => f.node_name(),
            Member::Method(m) => m.node_name(),
        }
    }
}

impl Declares for Member {
    fn name(&self) -> &str {
        match self {
            Member::Field(f) => f.name(),
            Member::Method(m) => m.name(),
        }
    }
}

/// `[modifiers] Type name [= literal];`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub modifiers: Vec<Spanned<Modifier>>,
    pub ty: Spanned<TypeNode>,
    pub name: Spanned<Ident>,
    pub init: Option<Spanned<Literal>>,
}

impl SyntaxNode for FieldDecl {
    fn node_name(&self) -> &'static str {
        "field"
    }
}

impl Declares for FieldDecl {
    fn name(&self) -> &str {
        &self.name.node
    }
}

/// `[modifiers] (Type | void) name(params);`
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub modifiers: Vec<Spanned<Modifier>>,
    pub return_type: Spanned<ReturnType>,
    pub name: Spanned<Ident>,
    pub params: Vec<Spanned<Param>>,
}

impl MethodDecl {
    /// Name plus erased parameter types, e.g. `area(int,List)`. Two methods with the same signature clash.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|p| p.node.ty.node.erasure().to_string()).collect();
        format!("{}({})", self.name.node, params.join(","))
    }
}

impl SyntaxNode for MethodDecl {
    fn node_name(&self) -> &'static str {
        "method"
    }
}

impl Declares for MethodDecl {
    fn name(&self) -> &str {
        &self.name.node
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReturnType {
    Void,
    Type(TypeNode),
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Void => f.write_str("void"),
            ReturnType::Type(t) => t.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub is_final: bool,
    pub ty: Spanned<TypeNode>,
    pub name: Spanned<Ident>,
}

impl SyntaxNode for Param {
    fn node_name(&self) -> &'static str {
        "parameter"
    }
}

impl Declares for Param {
    fn name(&self) -> &str {
        &self.name.node
    }
}

// ============================================================================
// Literals
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    String(String),
    Bool(bool),
    Null,
}

impl SyntaxNode for Literal {
    fn node_name(&self) -> &'static str {
        "literal"
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Long(v) => write!(f, "{v}L"),
            Literal::Float(v) => write!(f, "{v:?}f"),
            Literal::Double(v) => write!(f, "{v:?}"),
            Literal::Char(c) => write!(f, "{:?}", c),
            Literal::String(s) => write!(f, "{:?}", s),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Null => f.write_str("null"),
        }
    }
}

// ============================================================================
// Types
// ============================================================================

/// Any type-denoting production.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Primitive(PrimitiveType),
    Reference(ReferenceType),
    Parameterized(ParameterizedType),
    Array(ArrayType),
}

impl TypeNode {
    /// Innermost non-array type (`int` for `int[][]`).
    pub fn element(&self) -> &TypeNode {
        match self {
            TypeNode::Array(a) => a.element.node.element(),
            other => other,
        }
    }
}

impl SyntaxNode for TypeNode {
    fn node_name(&self) -> &'static str {
        match self {
            TypeNode::Primitive(p) => p.node_name(),
            TypeNode::Reference(r) => r.node_name(),
            TypeNode::Parameterized(p) => p.node_name(),
            TypeNode::Array(a) => a.node_name(),
        }
    }
}

impl TypeDenoting for TypeNode {
    fn is_primitive(&self) -> bool {
        matches!(self, TypeNode::Primitive(_))
    }

    fn array_depth(&self) -> usize {
        match self {
            TypeNode::Array(a) => a.array_depth(),
            _ => 0,
        }
    }

    fn erasure(&self) -> TypeNode {
        match self {
            TypeNode::Primitive(p) => p.erasure(),
            TypeNode::Reference(r) => r.erasure(),
            TypeNode::Parameterized(p) => p.erasure(),
            TypeNode::Array(a) => a.erasure(),
        }
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Primitive(p) => p.fmt(f),
            TypeNode::Reference(r) => r.fmt(f),
            TypeNode::Parameterized(p) => p.fmt(f),
            TypeNode::Array(a) => a.fmt(f),
        }
    }
}

impl SyntaxNode for PrimitiveType {
    fn node_name(&self) -> &'static str {
        "primitive type"
    }
}

impl TypeDenoting for PrimitiveType {
    fn is_primitive(&self) -> bool {
        true
    }

    fn erasure(&self) -> TypeNode {
        TypeNode::Primitive(*self)
    }
}

/// A named, non-generic reference type (`String`, `java.io.File`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceType {
    pub name: QualifiedName,
}

impl SyntaxNode for ReferenceType {
    fn node_name(&self) -> &'static str {
        "reference type"
    }
}

impl TypeDenoting for ReferenceType {
    fn is_primitive(&self) -> bool {
        false
    }

    fn erasure(&self) -> TypeNode {
        TypeNode::Reference(self.clone())
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

/// A reference type applied to type arguments (`Map<String, List<Integer>>`).
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterizedType {
    pub raw: ReferenceType,
    pub args: Vec<Spanned<TypeArg>>,
}

impl SyntaxNode for ParameterizedType {
    fn node_name(&self) -> &'static str {
        "parameterized type"
    }
}

impl TypeDenoting for ParameterizedType {
    fn is_primitive(&self) -> bool {
        false
    }

    fn erasure(&self) -> TypeNode {
        TypeNode::Reference(self.raw.clone())
    }
}

impl fmt::Display for ParameterizedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<", self.raw)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            arg.node.fmt(f)?;
        }
        f.write_str(">")
    }
}

/// `T[]`; multi-dimensional arrays nest.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub element: Box<Spanned<TypeNode>>,
}

impl SyntaxNode for ArrayType {
    fn node_name(&self) -> &'static str {
        "array type"
    }
}

impl TypeDenoting for ArrayType {
    fn is_primitive(&self) -> bool {
        false
    }

    fn array_depth(&self) -> usize {
        1 + self.element.node.array_depth()
    }

    fn erasure(&self) -> TypeNode {
        let element = self.element.node.erasure();
        TypeNode::Array(ArrayType {
            element: Box::new(Spanned::new(element, self.element.span)),
        })
    }
}

impl fmt::Display for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[]", self.element.node)
    }
}

/// One argument inside `<...>`.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeArg {
    Type(TypeNode),
    Wildcard(Option<WildcardBound>),
}

impl fmt::Display for TypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArg::Type(t) => t.fmt(f),
            TypeArg::Wildcard(None) => f.write_str("?"),
            TypeArg::Wildcard(Some(WildcardBound::Extends(t))) => write!(f, "? extends {}", t.node),
            TypeArg::Wildcard(Some(WildcardBound::Super(t))) => write!(f, "? super {}", t.node),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WildcardBound {
    Extends(Box<Spanned<TypeNode>>),
    Super(Box<Spanned<TypeNode>>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(path: &str) -> TypeNode {
        TypeNode::Reference(ReferenceType {
            name: QualifiedName::new(path.split('.').map(str::to_string).collect()),
        })
    }

    fn array_of(element: TypeNode) -> TypeNode {
        TypeNode::Array(ArrayType {
            element: Box::new(Spanned::new(element, Span::default())),
        })
    }

    #[test]
    fn primitive_is_type_denoting() {
        let ty = TypeNode::Primitive(PrimitiveType::Int);
        assert!(ty.is_primitive());
        assert!(!ty.is_reference());
        assert_eq!(ty.node_name(), "primitive type");
        assert_eq!(ty.to_string(), "int");
    }

    #[test]
    fn arrays_are_references_with_depth() {
        let ty = array_of(array_of(TypeNode::Primitive(PrimitiveType::Double)));
        assert!(ty.is_reference());
        assert_eq!(ty.array_depth(), 2);
        assert_eq!(ty.to_string(), "double[][]");
        assert_eq!(ty.element(), &TypeNode::Primitive(PrimitiveType::Double));
    }

    #[test]
    fn erasure_drops_type_arguments_at_every_depth() {
        let list = TypeNode::Parameterized(ParameterizedType {
            raw: ReferenceType {
                name: QualifiedName::new(vec!["List".to_string()]),
            },
            args: vec![Spanned::new(TypeArg::Type(reference("String")), Span::default())],
        });
        assert_eq!(list.to_string(), "List<String>");
        assert_eq!(list.erasure(), reference("List"));
        assert_eq!(array_of(list).erasure().to_string(), "List[]");
    }

    #[test]
    fn wildcard_display() {
        let arg = TypeArg::Wildcard(Some(WildcardBound::Super(Box::new(Spanned::new(
            reference("Number"),
            Span::default(),
        )))));
        assert_eq!(arg.to_string(), "? super Number");
        assert_eq!(TypeArg::Wildcard(None).to_string(), "?");
    }

    #[test]
    fn qualified_name_simple_name() {
        let name = QualifiedName::new(vec!["java".into(), "util".into(), "Map".into()]);
        assert_eq!(name.simple_name(), "Map");
        assert_eq!(name.to_string(), "java.util.Map");
    }
}
