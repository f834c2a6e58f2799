//! MiniWhile source code parser
//!
//! This module transforms MiniWhile source text into an Abstract Syntax
//! Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parser`]: Parsing (tokens → AST) plus the in-parse semantic checks
//! - [`ast`]: AST node definitions
//!
//! # The MiniWhile Language
//!
//! A fixed-shape imperative mini-language: one or more `int` declarations,
//! a `DO ... ENDDO` block of assignment statements over `+ - * /`
//! arithmetic, and a single trailing `WHILE(int IDENT == NUMBER) ENDWHILE`
//! clause. The loop is parsed but never executed.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one level per precedence tier
//! for binary operators. No parser generator dependencies.

pub mod ast;
pub mod lexer;
pub mod parser;
