//! Semantic checks over a parsed compilation unit.
//!
//! Each check is a [`CompileConsumer`] fed the unit's members in source order. A check keeps whatever it
//! needs from earlier members (names, signatures) and fails on the member that breaks its rule.
//!
//! | Check | Rule |
//! |---|---|
//! | [`DuplicateFields`] | field names are unique |
//! | [`DuplicateMethods`] | method signatures (name + erased parameter types) are unique |
//! | [`DuplicateParameters`] | parameter names are unique within a method |
//! | [`ModifierRules`] | no repeated modifier, at most one access modifier |
//! | [`InitializerTypes`] | a field initializer is assignable to the field's type |

use std::collections::HashMap;

use crate::ast::*;
use crate::diagnostics::{CompileError, CompileResult, errors};
use crate::func::{CompileConsumer, try_for_each};
use crate::parser::DiagnosticPolicy;

/// A semantic check over members.
pub type MemberCheck = Box<dyn for<'m> CompileConsumer<&'m Spanned<Member>> + Send>;

/// Fresh instances of every check, in reporting order.
pub fn default_checks() -> Vec<MemberCheck> {
    vec![
        Box::new(ModifierRules),
        Box::new(DuplicateParameters),
        Box::new(DuplicateFields::default()),
        Box::new(DuplicateMethods::default()),
        Box::new(InitializerTypes),
    ]
}

/// Run every check over `unit`.
///
/// Under [`DiagnosticPolicy::FailFast`] at most one diagnostic is returned. Under
/// [`DiagnosticPolicy::Accumulate`] each check reports at most one diagnostic per member.
#[tracing::instrument(skip_all, fields(members = unit.members.len()))]
pub fn check_unit(unit: &CompilationUnit, policy: DiagnosticPolicy) -> Vec<CompileError> {
    let mut checks = default_checks();
    match policy {
        DiagnosticPolicy::FailFast => {
            let mut run_all = |member: &Spanned<Member>| -> CompileResult<()> {
                checks.iter_mut().try_for_each(|check| check.accept(member))
            };
            match try_for_each(unit.members.iter(), &mut run_all) {
                Ok(()) => Vec::new(),
                Err(e) => vec![e],
            }
        }
        DiagnosticPolicy::Accumulate => unit
            .members
            .iter()
            .flat_map(|member| {
                checks
                    .iter_mut()
                    .filter_map(|check| check.accept(member).err())
                    .collect::<Vec<_>>()
            })
            .collect(),
    }
}

// ============================================================================
// Checks
// ============================================================================

#[derive(Debug, Default)]
pub struct DuplicateFields {
    seen: HashMap<String, Span>,
}

impl<'m> CompileConsumer<&'m Spanned<Member>> for DuplicateFields {
    fn accept(&mut self, member: &'m Spanned<Member>) -> CompileResult<()> {
        let Member::Field(field) = &member.node else {
            return Ok(());
        };
        match self.seen.get(&field.name.node) {
            Some(previous) => Err(errors::duplicate_field(&field.name.node, field.name.span, *previous)),
            None => {
                self.seen.insert(field.name.node.clone(), field.name.span);
                Ok(())
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct DuplicateMethods {
    seen: HashMap<String, Span>,
}

impl<'m> CompileConsumer<&'m Spanned<Member>> for DuplicateMethods {
    fn accept(&mut self, member: &'m Spanned<Member>) -> CompileResult<()> {
        let Member::Method(method) = &member.node else {
            return Ok(());
        };
        let signature = method.signature();
        match self.seen.get(&signature) {
            Some(previous) => Err(errors::duplicate_method(&signature, method.name.span, *previous)),
            None => {
                self.seen.insert(signature, method.name.span);
                Ok(())
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct DuplicateParameters;

impl<'m> CompileConsumer<&'m Spanned<Member>> for DuplicateParameters {
    fn accept(&mut self, member: &'m Spanned<Member>) -> CompileResult<()> {
        let Member::Method(method) = &member.node else {
            return Ok(());
        };
        for (i, param) in method.params.iter().enumerate() {
            let name = param.node.name();
            if method.params[..i].iter().any(|p| p.node.name() == name) {
                return Err(errors::duplicate_parameter(name, param.node.name.span));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ModifierRules;

impl<'m> CompileConsumer<&'m Spanned<Member>> for ModifierRules {
    fn accept(&mut self, member: &'m Spanned<Member>) -> CompileResult<()> {
        let modifiers = member.node.modifiers();
        let mut access: Option<Modifier> = None;
        for (i, modifier) in modifiers.iter().enumerate() {
            if modifiers[..i].iter().any(|m| m.node == modifier.node) {
                return Err(errors::repeated_modifier(&modifier.node.to_string(), modifier.span));
            }
            if modifier.node.is_access() {
                if let Some(first) = access {
                    return Err(errors::conflicting_access(
                        &first.to_string(),
                        &modifier.node.to_string(),
                        modifier.span,
                    ));
                }
                access = Some(modifier.node);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InitializerTypes;

impl<'m> CompileConsumer<&'m Spanned<Member>> for InitializerTypes {
    fn accept(&mut self, member: &'m Spanned<Member>) -> CompileResult<()> {
        let Member::Field(FieldDecl { ty, init: Some(init), .. }) = &member.node else {
            return Ok(());
        };
        if let (TypeNode::Primitive(p), Literal::Int(v)) = (&ty.node, &init.node) {
            let fits = match p {
                PrimitiveType::Byte => i8::try_from(*v).is_ok(),
                PrimitiveType::Short => i16::try_from(*v).is_ok(),
                PrimitiveType::Char => u16::try_from(*v).is_ok(),
                _ => true,
            };
            if !fits {
                return Err(errors::literal_out_of_range(&init.node.to_string(), &p.to_string(), init.span));
            }
        }
        if assignable(&ty.node, &init.node) {
            Ok(())
        } else {
            Err(errors::initializer_type_mismatch(&init.node.to_string(), &ty.node.to_string(), init.span))
        }
    }
}

/// Whether `literal` may initialize a field of type `ty`, ignoring the value range.
fn assignable(ty: &TypeNode, literal: &Literal) -> bool {
    match ty {
        TypeNode::Primitive(p) => match (p, literal) {
            (PrimitiveType::Boolean, Literal::Bool(_)) => true,
            (PrimitiveType::Char, Literal::Char(_)) => true,
            (PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Char | PrimitiveType::Int, Literal::Int(_)) => {
                true
            }
            (PrimitiveType::Long, Literal::Int(_) | Literal::Long(_) | Literal::Char(_)) => true,
            (PrimitiveType::Int, Literal::Char(_)) => true,
            (PrimitiveType::Float, Literal::Int(_) | Literal::Long(_) | Literal::Char(_) | Literal::Float(_)) => true,
            (
                PrimitiveType::Double,
                Literal::Int(_) | Literal::Long(_) | Literal::Char(_) | Literal::Float(_) | Literal::Double(_),
            ) => true,
            _ => false,
        },
        TypeNode::Reference(r) if r.name.simple_name() == "String" => {
            matches!(literal, Literal::String(_) | Literal::Null)
        }
        _ => matches!(literal, Literal::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::parse;

    fn diagnostics(source: &str, policy: DiagnosticPolicy) -> Vec<CompileError> {
        let tokens = lex(source).unwrap();
        let unit = parse(&tokens).unwrap();
        check_unit(&unit, policy)
    }

    fn messages(source: &str) -> Vec<String> {
        diagnostics(source, DiagnosticPolicy::Accumulate)
            .into_iter()
            .map(|d| d.message)
            .collect()
    }

    #[test]
    fn test_clean_unit_has_no_diagnostics() {
        let source = "public static final int ORIGIN = 0;\nprivate double[][] grid;\nString name = \"x\";\n\
                      long area(int w, int h);\nlong area(int w, long h);\nvoid reset();";
        assert!(messages(source).is_empty(), "{:?}", messages(source));
    }

    #[test]
    fn test_duplicate_field() {
        let errs = diagnostics("int x;\ndouble x;", DiagnosticPolicy::Accumulate);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].message, "Duplicate field 'x'");
        assert_eq!(errs[0].span, Span::new(14, 15));
        assert_eq!(errs[0].notes, vec!["previously declared at byte 4".to_string()]);
    }

    #[test]
    fn test_duplicate_method_uses_erased_signature() {
        assert_eq!(
            messages("void f(List<String> a);\nint f(List<Integer> b);"),
            vec!["Duplicate method 'f(List)'".to_string()]
        );
    }

    #[test]
    fn test_duplicate_parameter() {
        assert_eq!(
            messages("void f(int a, long a);"),
            vec!["Duplicate parameter 'a'".to_string()]
        );
    }

    #[test]
    fn test_modifier_rules() {
        assert_eq!(
            messages("static static int a;\npublic private int b;"),
            vec![
                "Repeated modifier 'static'".to_string(),
                "Conflicting access modifiers 'public' and 'private'".to_string(),
            ]
        );
    }

    #[test]
    fn test_initializer_types() {
        assert_eq!(
            messages("int a = \"s\";\nbyte b = 300;\nString c = null;\ndouble d = 1;\nboolean e = 1;"),
            vec![
                "Cannot initialize 'int' with \"s\"".to_string(),
                "Literal 300 is out of range for type 'byte'".to_string(),
                "Cannot initialize 'boolean' with 1".to_string(),
            ]
        );
    }

    #[test]
    fn test_fail_fast_returns_first_only() {
        let errs = diagnostics("int x;\nint x;\nint x;", DiagnosticPolicy::FailFast);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, crate::diagnostics::ErrorKind::Semantic);
    }
}
