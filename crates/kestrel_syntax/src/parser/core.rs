/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type, its diagnostic policy and interruption hook, and the top-level
/// `parse()` loop.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.

/// What the parser does with a diagnostic raised by a production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticPolicy {
    /// Stop at the first diagnostic.
    #[default]
    FailFast,
    /// Record the diagnostic, skip past the next `;` and keep parsing. Only fully parsed productions end up
    /// in the compilation unit.
    Accumulate,
}

/// Cooperative interruption signal, polled between top-level productions.
pub trait Interrupt: Sync {
    fn is_interrupted(&self) -> bool;
}

impl Interrupt for AtomicBool {
    fn is_interrupted(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

/// An interrupt that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl Interrupt for Never {
    fn is_interrupted(&self) -> bool {
        false
    }
}

static NEVER: Never = Never;

/// Result of running the parser to completion.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Every token was consumed. `diagnostics` is always empty under [`DiagnosticPolicy::FailFast`].
    Complete {
        unit: CompilationUnit,
        diagnostics: Vec<CompileError>,
    },
    /// A production failed under [`DiagnosticPolicy::FailFast`].
    Failed(CompileError),
    /// The interrupt fired between two top-level productions.
    Interrupted,
}

/// Parser state.
///
/// ## Notes
/// - The parser is single-pass. Under [`DiagnosticPolicy::Accumulate`] it recovers by synchronizing at the
///   next `;`.
/// - Most parsing helpers are implemented on `Parser` but split across multiple files.
pub struct Parser<'a> {
    stream: TokenStream<'a>,
    policy: DiagnosticPolicy,
    interrupt: &'a dyn Interrupt,
    errors: Vec<CompileError>,
}

impl<'a> Parser<'a> {
    /// Create a new fail-fast, uninterruptible parser.
    ///
    /// ## Parameters
    /// - `tokens`: Token sequence produced by `kestrel_syntax::lexer`.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            policy: DiagnosticPolicy::default(),
            interrupt: &NEVER,
            errors: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: DiagnosticPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_interrupt(mut self, interrupt: &'a dyn Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Parse the entire token sequence.
    ///
    /// The interrupt is polled before the package clause, before each import and before each member.
    pub fn parse(mut self) -> ParseOutcome {
        let mut unit = CompilationUnit::default();

        if self.interrupt.is_interrupted() {
            return ParseOutcome::Interrupted;
        }
        if self.check_keyword(KeywordId::Package) {
            match self.package_decl() {
                Ok(package) => unit.package = Some(package),
                Err(e) => {
                    if let Err(e) = self.record(e) {
                        return ParseOutcome::Failed(e);
                    }
                }
            }
        }

        while self.check_keyword(KeywordId::Import) {
            if self.interrupt.is_interrupted() {
                return ParseOutcome::Interrupted;
            }
            match self.import_decl() {
                Ok(import) => unit.imports.push(import),
                Err(e) => {
                    if let Err(e) = self.record(e) {
                        return ParseOutcome::Failed(e);
                    }
                }
            }
        }

        while !self.stream.at_end() {
            if self.interrupt.is_interrupted() {
                return ParseOutcome::Interrupted;
            }
            match self.member() {
                Ok(member) => unit.members.push(member),
                Err(e) => {
                    if let Err(e) = self.record(e) {
                        return ParseOutcome::Failed(e);
                    }
                }
            }
        }

        ParseOutcome::Complete {
            unit,
            diagnostics: self.errors,
        }
    }

    /// Apply the diagnostic policy: hand the error back under fail-fast, otherwise keep it and recover.
    fn record(&mut self, error: CompileError) -> CompileResult<()> {
        match self.policy {
            DiagnosticPolicy::FailFast => Err(error),
            DiagnosticPolicy::Accumulate => {
                tracing::debug!(error = %error, "recovering after parse error");
                self.errors.push(error);
                self.synchronize();
                Ok(())
            }
        }
    }
}
