//! Analysis driver
//!
//! One [`analyze`] call runs the full pipeline over a source string:
//!
//! 1. a reporting scan that collects every token and the four-way category
//!    counts;
//! 2. an independent parse (the parser re-derives its own tokens) that
//!    builds the AST and fills a fresh symbol table;
//! 3. consolidation of the error slot.
//!
//! All state is call-scoped. Two calls with the same input produce the same
//! [`Analysis`], and concurrent calls share nothing.
//!
//! # The error slot
//!
//! A single message survives per call, and it is the *last* one written,
//! not the first detected. Write order: the final lexical diagnostic from
//! the parser's internal scan, then either the fatal parse error (on
//! failure) or the pending non-fatal undeclared-variable error (on
//! success). A structurally valid program can therefore carry an error
//! message, and a lexical diagnostic survives only when nothing later
//! overwrote it.

pub mod symbols;

use crate::parser::lexer::{Lexer, Token, TokenCategory};
use crate::parser::parser::Parser;
use crate::parser::ast::Program;
use symbols::SymbolTable;

/// Per-category token counts for the analysis report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenCounts {
    pub reserved: usize,
    pub identifiers: usize,
    pub numbers: usize,
    pub symbols: usize,
}

impl TokenCounts {
    /// Count every token in the stream by category. The EOF marker has no
    /// category and is not counted.
    pub fn tally(tokens: &[Token]) -> Self {
        let mut counts = TokenCounts::default();
        for token in tokens {
            match token.category() {
                Some(TokenCategory::ReservedWord) => counts.reserved += 1,
                Some(TokenCategory::Identifier) => counts.identifiers += 1,
                Some(TokenCategory::Number) => counts.numbers += 1,
                Some(TokenCategory::Symbol) => counts.symbols += 1,
                None => {}
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.reserved + self.identifiers + self.numbers + self.symbols
    }
}

/// Everything one analysis call produces.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Ordered token stream from the reporting scan, EOF excluded.
    pub tokens: Vec<Token>,
    pub counts: TokenCounts,
    /// The parsed program; `None` when the parse failed.
    pub ast: Option<Program>,
    /// Identifier values as left by declarations and assignments.
    pub symbols: SymbolTable,
    /// Last-written error message, if any error occurred.
    pub error: Option<String>,
}

/// Analyze one MiniWhile source string.
pub fn analyze(source: &str) -> Analysis {
    // Reporting scan: every token plus category counts. Its diagnostics are
    // logged by the lexer; the error slot is fed by the parse scan below.
    let mut lexer = Lexer::new(source);
    let (mut tokens, _) = lexer.tokenize();
    tokens.retain(|t| !matches!(t, Token::Eof(_)));
    let counts = TokenCounts::tally(&tokens);

    // Independent parse pass with its own tokenization and a fresh table.
    let mut parser = Parser::new(source);
    let mut error = parser
        .scan_diagnostics()
        .last()
        .map(|diag| diag.to_string());

    let ast = match parser.parse_program() {
        Ok(program) => Some(program),
        Err(fatal) => {
            error = Some(fatal.to_string());
            None
        }
    };

    // Non-fatal semantic errors only survive a structurally successful
    // parse; a fatal error is always the later write.
    if ast.is_some() {
        if let Some(pending) = parser.pending_error() {
            error = Some(pending.to_string());
        }
    }

    tracing::debug!(
        tokens = tokens.len(),
        parsed = ast.is_some(),
        error = error.as_deref(),
        "analysis finished"
    );

    Analysis {
        tokens,
        counts,
        ast,
        symbols: parser.into_symbols(),
        error,
    }
}
