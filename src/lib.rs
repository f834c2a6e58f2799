//! # Introduction
//!
//! MiniWhile analyzes source text written in a small fixed-shape imperative
//! mini-language: `int` declarations, a `DO ... ENDDO` block of arithmetic
//! assignments, and one trailing `WHILE(int IDENT == NUMBER) ENDWHILE`
//! clause. The loop is parsed, never executed.
//!
//! ## Analysis pipeline
//!
//! ```text
//! Source → Lexer → Tokens + counts
//!        → Parser → AST + symbol table + error slot
//!        → Analysis
//! ```
//!
//! 1. [`parser::lexer`] — tokenises the source, skipping (and diagnosing)
//!    unrecognized characters.
//! 2. [`parser::parser`] — recursive descent over its own token scan,
//!    recording declared identifiers and their values as it goes.
//! 3. [`analyzer`] — the [`analyzer::analyze`] driver ties both passes
//!    together and consolidates the single per-call error message.
//!
//! One call, one result: no state survives between [`analyzer::analyze`]
//! invocations.
//!
//! ## Example
//!
//! ```
//! use miniwhile::analyzer::analyze;
//!
//! let analysis = analyze("int x = 5; DO x = x + 1; ENDDO WHILE(int x == 6) ENDWHILE");
//! assert!(analysis.error.is_none());
//! assert_eq!(analysis.symbols.get("x"), Some(6));
//! ```

pub mod analyzer;
pub mod parser;
