//! TypeScript and JavaScript parser using SWC
//!
//! Global invariants enforced:
//! - Deterministic parsing order
//! - The dialect is chosen by the caller, never guessed from content

use crate::language::Dialect;
use anyhow::Result;
use swc_common::{sync::Lrc, FileName, SourceFile, SourceMap};
use swc_ecma_ast::{EsVersion, Program};
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax};

/// Remaining stack below which parsing moves to a dedicated stack
pub(crate) const SYNTAX_RED_ZONE: usize = 32 * 1024 * 1024;

/// Size of the dedicated stack parsing and lowering run on
pub(crate) const SYNTAX_STACK_SIZE: usize = 256 * 1024 * 1024;

/// Run `f` with enough stack for recursive descent over deeply nested input
pub(crate) fn with_syntax_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(SYNTAX_RED_ZONE, SYNTAX_STACK_SIZE, f)
}

/// Parsed program together with the source file it was read from
pub struct ParsedSource {
    pub program: Program,
    pub file: Lrc<SourceFile>,
}

/// Build the SWC syntax configuration for a dialect
///
/// Decorators are accepted in every dialect so decorator callbacks can be named.
fn syntax_for_dialect(dialect: Dialect) -> Syntax {
    match dialect {
        Dialect::TypeScript | Dialect::TypeScriptReact => {
            Syntax::Typescript(swc_ecma_parser::TsSyntax {
                tsx: dialect.allows_jsx(),
                decorators: true,
                dts: false,
                ..Default::default()
            })
        }
        Dialect::JavaScript | Dialect::JavaScriptReact => Syntax::Es(swc_ecma_parser::EsSyntax {
            jsx: dialect.allows_jsx(),
            decorators: true,
            ..Default::default()
        }),
    }
}

/// Parse source code in the given dialect
///
/// Scripts and modules are both accepted. Recoverable diagnostics are logged
/// and the best-effort tree is returned; fatal errors are returned as `Err`.
pub fn parse_source(
    src: &str,
    source_map: &Lrc<SourceMap>,
    filename: &str,
    dialect: Dialect,
) -> Result<ParsedSource> {
    let file: Lrc<SourceFile> = source_map.new_source_file(
        FileName::Custom(filename.into()).into(),
        src.to_string(),
    );

    let lexer = Lexer::new(
        syntax_for_dialect(dialect),
        EsVersion::EsNext,
        StringInput::from(&*file),
        None,
    );
    let mut parser = Parser::new_from(lexer);

    let program = with_syntax_stack(|| parser.parse_program()).map_err(|e| {
        let error_msg = e.kind().msg();
        anyhow::anyhow!("Parse error: {}", error_msg)
            .context(format!("Failed to parse source file: {}", filename))
    })?;

    for error in parser.take_errors() {
        tracing::debug!(file = filename, "recovered from parse error: {}", error.kind().msg());
    }

    Ok(ParsedSource { program, file })
}
