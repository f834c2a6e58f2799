//! Lexer (tokenizer) for MiniWhile source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the
//! parser and by the analysis report. Unrecognized characters are not fatal:
//! each one produces a [`LexDiagnostic`], is skipped, and scanning resumes
//! with the next character.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and character offset without a separate token→location
/// table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Number(i64, SourceLocation),

    // Identifiers
    Ident(String, SourceLocation),

    // Reserved words (case-sensitive: `int` lowercase, the rest uppercase)
    Int(SourceLocation),
    Do(SourceLocation),
    EndDo(SourceLocation),
    While(SourceLocation),
    EndWhile(SourceLocation),

    // Operators
    Plus(SourceLocation),   // +
    Minus(SourceLocation),  // -
    Star(SourceLocation),   // *
    Slash(SourceLocation),  // /
    Assign(SourceLocation), // =
    EqEq(SourceLocation),   // ==

    // Punctuation
    LParen(SourceLocation),    // (
    RParen(SourceLocation),    // )
    Semicolon(SourceLocation), // ;
    Dot(SourceLocation),       // .

    // End of input (parser-internal; excluded from reports and counts)
    Eof(SourceLocation),
}

/// Coarse reporting category for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCategory {
    ReservedWord,
    Identifier,
    Number,
    Symbol,
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::Number(_, loc)
            | Token::Ident(_, loc)
            | Token::Int(loc)
            | Token::Do(loc)
            | Token::EndDo(loc)
            | Token::While(loc)
            | Token::EndWhile(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::Slash(loc)
            | Token::Assign(loc)
            | Token::EqEq(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::Semicolon(loc)
            | Token::Dot(loc)
            | Token::Eof(loc) => *loc,
        }
    }

    /// The token kind name used in analysis reports (`INT`, `IDENTIFIER`, ...).
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Number(_, _) => "NUMBER",
            Token::Ident(_, _) => "IDENTIFIER",
            Token::Int(_) => "INT",
            Token::Do(_) => "DO",
            Token::EndDo(_) => "ENDDO",
            Token::While(_) => "WHILE",
            Token::EndWhile(_) => "ENDWHILE",
            Token::Plus(_) => "PLUS",
            Token::Minus(_) => "MINUS",
            Token::Star(_) => "TIMES",
            Token::Slash(_) => "DIVIDE",
            Token::Assign(_) => "ASSIGN",
            Token::EqEq(_) => "EQUAL",
            Token::LParen(_) => "LPAREN",
            Token::RParen(_) => "RPAREN",
            Token::Semicolon(_) => "SEMICOLON",
            Token::Dot(_) => "DOT",
            Token::Eof(_) => "EOF",
        }
    }

    /// The literal source text of this token.
    pub fn text(&self) -> String {
        match self {
            Token::Number(n, _) => n.to_string(),
            Token::Ident(name, _) => name.clone(),
            Token::Int(_) => "int".to_string(),
            Token::Do(_) => "DO".to_string(),
            Token::EndDo(_) => "ENDDO".to_string(),
            Token::While(_) => "WHILE".to_string(),
            Token::EndWhile(_) => "ENDWHILE".to_string(),
            Token::Plus(_) => "+".to_string(),
            Token::Minus(_) => "-".to_string(),
            Token::Star(_) => "*".to_string(),
            Token::Slash(_) => "/".to_string(),
            Token::Assign(_) => "=".to_string(),
            Token::EqEq(_) => "==".to_string(),
            Token::LParen(_) => "(".to_string(),
            Token::RParen(_) => ")".to_string(),
            Token::Semicolon(_) => ";".to_string(),
            Token::Dot(_) => ".".to_string(),
            Token::Eof(_) => String::new(),
        }
    }

    /// Reporting category of this token; [`Token::Eof`] has none.
    pub fn category(&self) -> Option<TokenCategory> {
        match self {
            Token::Number(_, _) => Some(TokenCategory::Number),
            Token::Ident(_, _) => Some(TokenCategory::Identifier),
            Token::Int(_)
            | Token::Do(_)
            | Token::EndDo(_)
            | Token::While(_)
            | Token::EndWhile(_) => Some(TokenCategory::ReservedWord),
            Token::Eof(_) => None,
            _ => Some(TokenCategory::Symbol),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n, _) => write!(f, "number {}", n),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::Eof(_) => write!(f, "end of input"),
            other => write!(f, "'{}'", other.text()),
        }
    }
}

/// Non-fatal scan diagnostic. The offending input is skipped and scanning
/// resumes at the next character.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexDiagnostic {
    #[error("Illegal character '{ch}' at line {line}, position {offset}")]
    IllegalCharacter { ch: char, line: usize, offset: usize },

    #[error("Number too large at line {line}, position {offset}: {literal}")]
    NumberTooLarge {
        literal: String,
        line: usize,
        offset: usize,
    },
}

impl LexDiagnostic {
    pub fn location(&self) -> SourceLocation {
        match self {
            LexDiagnostic::IllegalCharacter { line, offset, .. }
            | LexDiagnostic::NumberTooLarge { line, offset, .. } => {
                SourceLocation::new(*line, *offset)
            }
        }
    }
}

/// Lexer for MiniWhile source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
        }
    }

    /// Tokenize the entire input.
    ///
    /// Always produces a token stream terminated by [`Token::Eof`]; lexical
    /// problems surface as [`LexDiagnostic`]s alongside it rather than
    /// aborting the scan.
    pub fn tokenize(&mut self) -> (Vec<Token>, Vec<LexDiagnostic>) {
        let mut tokens = Vec::new();
        let mut diagnostics = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                tokens.push(Token::Eof(self.current_location()));
                break;
            }

            match self.next_token() {
                Ok(token) => tokens.push(token),
                Err(diag) => {
                    // One skipped character per diagnostic; resume scanning.
                    tracing::warn!("{}", diag);
                    diagnostics.push(diag);
                }
            }
        }

        (tokens, diagnostics)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexDiagnostic> {
        let loc = self.current_location();
        // skip_whitespace guarantees a character is available here
        let ch = self.input[self.position];
        self.advance();

        match ch {
            '0'..='9' => self.number_literal(ch, loc),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier_or_keyword(ch, loc)),
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::EqEq(loc))
                } else {
                    Ok(Token::Assign(loc))
                }
            }
            '+' => Ok(Token::Plus(loc)),
            '-' => Ok(Token::Minus(loc)),
            '*' => Ok(Token::Star(loc)),
            '/' => Ok(Token::Slash(loc)),
            '(' => Ok(Token::LParen(loc)),
            ')' => Ok(Token::RParen(loc)),
            ';' => Ok(Token::Semicolon(loc)),
            '.' => Ok(Token::Dot(loc)),

            _ => Err(LexDiagnostic::IllegalCharacter {
                ch,
                line: loc.line,
                offset: loc.offset,
            }),
        }
    }

    /// Parse numeric literal (maximal digit run)
    fn number_literal(
        &mut self,
        first_digit: char,
        loc: SourceLocation,
    ) -> Result<Token, LexDiagnostic> {
        let mut num_str = String::new();
        num_str.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let value = num_str.parse::<i64>().map_err(|_| LexDiagnostic::NumberTooLarge {
            literal: num_str,
            line: loc.line,
            offset: loc.offset,
        })?;

        Ok(Token::Number(value, loc))
    }

    /// Parse identifier, reclassifying reserved words (exact casing only)
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "int" => Token::Int(loc),
            "DO" => Token::Do(loc),
            "ENDDO" => Token::EndDo(loc),
            "WHILE" => Token::While(loc),
            "ENDWHILE" => Token::EndWhile(loc),
            _ => Token::Ident(ident, loc),
        }
    }

    /// Skip spaces, tabs, and newlines. Only these three are whitespace to
    /// this language; anything else (`\r` included) is an illegal character.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\n' => {
                    self.advance();
                }
                _ => break,
            }
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Advance to next character, tracking the line counter
    fn advance(&mut self) {
        if let Some(&ch) = self.input.get(self.position) {
            self.position += 1;
            if ch == '\n' {
                self.line += 1;
            }
        }
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokens() {
        let mut lexer = Lexer::new("int x = 5;");
        let (tokens, diagnostics) = lexer.tokenize();

        assert!(diagnostics.is_empty());
        assert!(matches!(tokens[0], Token::Int(_)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "x"));
        assert!(matches!(tokens[2], Token::Assign(_)));
        assert!(matches!(tokens[3], Token::Number(5, _)));
        assert!(matches!(tokens[4], Token::Semicolon(_)));
        assert!(matches!(tokens[5], Token::Eof(_)));
    }

    #[test]
    fn test_double_equals_is_one_token() {
        let mut lexer = Lexer::new("= == =");
        let (tokens, _) = lexer.tokenize();

        assert!(matches!(tokens[0], Token::Assign(_)));
        assert!(matches!(tokens[1], Token::EqEq(_)));
        assert!(matches!(tokens[2], Token::Assign(_)));
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let mut lexer = Lexer::new("int Int INT do DO EndWhile ENDWHILE");
        let (tokens, _) = lexer.tokenize();

        assert!(matches!(tokens[0], Token::Int(_)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "Int"));
        assert!(matches!(tokens[2], Token::Ident(ref s, _) if s == "INT"));
        assert!(matches!(tokens[3], Token::Ident(ref s, _) if s == "do"));
        assert!(matches!(tokens[4], Token::Do(_)));
        assert!(matches!(tokens[5], Token::Ident(ref s, _) if s == "EndWhile"));
        assert!(matches!(tokens[6], Token::EndWhile(_)));
    }

    #[test]
    fn test_line_and_offset_tracking() {
        let mut lexer = Lexer::new("int x\n= 5");
        let (tokens, _) = lexer.tokenize();

        assert_eq!(tokens[0].location(), SourceLocation::new(1, 0)); // int
        assert_eq!(tokens[1].location(), SourceLocation::new(1, 4)); // x
        assert_eq!(tokens[2].location(), SourceLocation::new(2, 6)); // =
        assert_eq!(tokens[3].location(), SourceLocation::new(2, 8)); // 5
    }

    #[test]
    fn test_illegal_character_is_skipped() {
        let mut lexer = Lexer::new("int #x;");
        let (tokens, diagnostics) = lexer.tokenize();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0],
            LexDiagnostic::IllegalCharacter {
                ch: '#',
                line: 1,
                offset: 4
            }
        );
        assert_eq!(
            diagnostics[0].to_string(),
            "Illegal character '#' at line 1, position 4"
        );

        // Scanning resumed after the bad byte
        assert!(matches!(tokens[0], Token::Int(_)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "x"));
        assert!(matches!(tokens[2], Token::Semicolon(_)));
    }

    #[test]
    fn test_carriage_return_is_illegal() {
        let mut lexer = Lexer::new("int\r x");
        let (tokens, diagnostics) = lexer.tokenize();

        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics[0],
            LexDiagnostic::IllegalCharacter { ch: '\r', .. }
        ));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "x"));
    }

    #[test]
    fn test_oversized_number_literal() {
        let mut lexer = Lexer::new("99999999999999999999999999 7");
        let (tokens, diagnostics) = lexer.tokenize();

        assert!(matches!(
            diagnostics[0],
            LexDiagnostic::NumberTooLarge { .. }
        ));
        assert!(matches!(tokens[0], Token::Number(7, _)));
    }

    #[test]
    fn test_kind_names_and_categories() {
        let mut lexer = Lexer::new("WHILE(int a == 3).");
        let (tokens, _) = lexer.tokenize();

        let names: Vec<&str> = tokens.iter().map(|t| t.kind_name()).collect();
        assert_eq!(
            names,
            vec!["WHILE", "LPAREN", "INT", "IDENTIFIER", "EQUAL", "NUMBER", "RPAREN", "DOT", "EOF"]
        );

        assert_eq!(tokens[0].category(), Some(TokenCategory::ReservedWord));
        assert_eq!(tokens[1].category(), Some(TokenCategory::Symbol));
        assert_eq!(tokens[3].category(), Some(TokenCategory::Identifier));
        assert_eq!(tokens[5].category(), Some(TokenCategory::Number));
        assert_eq!(tokens[8].category(), None);
    }
}
