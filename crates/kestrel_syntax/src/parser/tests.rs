#[cfg(test)]
/// Parser unit tests.
///
/// These tests focus on the shape of parsed declarations, the diagnostic policies, and interruption.
mod tests {
    use super::*;
    use crate::lexer;

    fn parse_str(source: &str) -> Result<CompilationUnit, Vec<CompileError>> {
        let tokens = lexer::lex(source).map_err(|_| vec![])?;
        parse(&tokens)
    }

    fn outcome(source: &str, policy: DiagnosticPolicy) -> ParseOutcome {
        let tokens = lexer::lex(source).unwrap();
        Parser::new(&tokens).with_policy(policy).parse()
    }

    #[test]
    fn test_parse_package_and_imports() {
        let unit = parse_str("package demo.geometry;\nimport java.util.List;\nimport java.util.*;\n").unwrap();
        assert_eq!(unit.package.unwrap().node.to_string(), "demo.geometry");
        assert_eq!(unit.imports.len(), 2);
        assert!(!unit.imports[0].node.wildcard);
        assert_eq!(unit.imports[1].node.path.to_string(), "java.util");
        assert!(unit.imports[1].node.wildcard);
        assert!(unit.members.is_empty());
    }

    #[test]
    fn test_parse_field_with_initializer() {
        let unit = parse_str("public static final int ORIGIN = 0;").unwrap();
        assert_eq!(unit.members.len(), 1);
        match &unit.members[0].node {
            Member::Field(f) => {
                assert_eq!(f.name.node, "ORIGIN");
                assert_eq!(f.modifiers.len(), 3);
                assert_eq!(f.ty.node, TypeNode::Primitive(PrimitiveType::Int));
                assert_eq!(f.init.as_ref().unwrap().node, Literal::Int(0));
            }
            other => panic!("Expected field, got {other:?}"),
        }
        assert_eq!(unit.members[0].span, Span::new(0, 35));
    }

    #[test]
    fn test_parse_method() {
        let unit = parse_str("public long area(final int width, List<String>[] names);\nvoid reset();").unwrap();
        assert_eq!(unit.members.len(), 2);
        match &unit.members[0].node {
            Member::Method(m) => {
                assert_eq!(m.return_type.node.to_string(), "long");
                assert_eq!(m.params.len(), 2);
                assert!(m.params[0].node.is_final);
                assert_eq!(m.params[1].node.ty.node.to_string(), "List<String>[]");
                assert_eq!(m.signature(), "area(int,List[])");
            }
            other => panic!("Expected method, got {other:?}"),
        }
        match &unit.members[1].node {
            Member::Method(m) => {
                assert_eq!(m.return_type.node, ReturnType::Void);
                assert!(m.params.is_empty());
            }
            other => panic!("Expected method, got {other:?}"),
        }
    }

    #[test]
    fn test_fail_fast_stops_at_first_error() {
        match outcome("int x\nint y;\nList<int> z;", DiagnosticPolicy::FailFast) {
            ParseOutcome::Failed(e) => {
                let illegal = e.as_illegal_token().unwrap();
                assert_eq!(illegal.expected, "';'");
                assert_eq!(illegal.token.text, "int");
            }
            other => panic!("Expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_accumulate_reports_every_error_and_keeps_complete_members() {
        let source = "List<int> a;\nint ok;\nvoid b;\nString c(int);\ndouble fine();";
        match outcome(source, DiagnosticPolicy::Accumulate) {
            ParseOutcome::Complete { unit, diagnostics } => {
                let names: Vec<&str> = unit.members.iter().map(|m| m.node.name()).collect();
                assert_eq!(names, vec!["ok", "fine"]);
                let expected: Vec<&str> = diagnostics
                    .iter()
                    .map(|d| d.as_illegal_token().unwrap().expected.as_str())
                    .collect();
                assert_eq!(expected, vec!["reference type", "'('", "identifier"]);
            }
            other => panic!("Expected completion, got {other:?}"),
        }
    }

    #[test]
    fn test_void_parameter_is_rejected() {
        let err = parse_str("void f(void x);").unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].as_illegal_token().unwrap().expected, "parameter type");
    }

    #[test]
    fn test_import_after_member_is_reported() {
        let err = parse_str("int x;\nimport a.B;").unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(err[0].message.contains("must come before"), "{}", err[0].message);
    }

    #[test]
    fn test_initializer_must_be_literal() {
        let err = parse_str("int x = y;").unwrap_err();
        assert_eq!(err[0].as_illegal_token().unwrap().expected, "literal");
    }

    #[test]
    fn test_interrupt_before_start() {
        let tokens = lexer::lex("int x;").unwrap();
        let flag = AtomicBool::new(true);
        let result = Parser::new(&tokens).with_interrupt(&flag).parse();
        assert_eq!(result, ParseOutcome::Interrupted);
    }

    /// Fires after a fixed number of polls.
    struct AfterPolls(std::sync::atomic::AtomicUsize);

    impl Interrupt for AfterPolls {
        fn is_interrupted(&self) -> bool {
            self.0.fetch_sub(1, Ordering::SeqCst) == 0
        }
    }

    #[test]
    fn test_interrupt_between_members() {
        let tokens = lexer::lex("int a;\nint b;\nint c;").unwrap();
        let interrupt = AfterPolls(std::sync::atomic::AtomicUsize::new(2));
        let result = Parser::new(&tokens).with_interrupt(&interrupt).parse();
        assert_eq!(result, ParseOutcome::Interrupted);
    }

    #[test]
    fn test_empty_input_is_empty_unit() {
        assert_eq!(parse_str("// nothing here\n").unwrap(), CompilationUnit::default());
    }
}
