#![no_main]

use kestrel_syntax::checks::check_unit;
use kestrel_syntax::parser::{DiagnosticPolicy, ParseOutcome, Parser};
use kestrel_syntax::{lexer, parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = lexer::lex_fail_fast(s);
        if let Ok(tokens) = lexer::lex(s) {
            let _ = parser::parse(&tokens);
            if let ParseOutcome::Complete { unit, .. } = Parser::new(&tokens).with_policy(DiagnosticPolicy::Accumulate).parse() {
                let _ = check_unit(&unit, DiagnosticPolicy::Accumulate);
            }
        }
    }
});
