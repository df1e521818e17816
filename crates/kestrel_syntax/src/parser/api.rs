/// Parse a token sequence into a [`CompilationUnit`].
///
/// This is the main public entrypoint for parsing. It accumulates diagnostics, so one call reports every
/// syntax error in the file.
///
/// ## Parameters
/// - `tokens`: Token sequence produced by `kestrel_syntax::lexer`.
///
/// ## Errors
/// Returns `Err(Vec<CompileError>)` if any production failed.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<CompilationUnit, Vec<CompileError>> {
    match Parser::new(tokens).with_policy(DiagnosticPolicy::Accumulate).parse() {
        ParseOutcome::Complete { unit, diagnostics } if diagnostics.is_empty() => Ok(unit),
        ParseOutcome::Complete { diagnostics, .. } => Err(diagnostics),
        ParseOutcome::Failed(e) => Err(vec![e]),
        ParseOutcome::Interrupted => Err(vec![CompileError::internal(
            "Parser interrupted without an interrupt source",
            Span::default(),
        )]),
    }
}
