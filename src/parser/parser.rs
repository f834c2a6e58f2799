//! Recursive descent parser for the MiniWhile grammar
//!
//! ```text
//! program      := declarations DO statements ENDDO while_statement ENDWHILE
//! declarations := declaration+
//! declaration  := 'int' IDENTIFIER '=' NUMBER ';'
//! statements   := statement+
//! statement    := IDENTIFIER '=' expression ';'
//! expression   := term (('+'|'-') term)*
//! term         := factor (('*'|'/') factor)*
//! factor       := NUMBER | IDENTIFIER
//! while_statement := 'WHILE' '(' condition ')'
//! condition    := 'int' IDENTIFIER '==' NUMBER
//! ```
//!
//! Semantic checks run during the parse and are threaded through parser
//! state rather than process globals, so every analysis call is isolated:
//! - declarations and assignments update the parser's [`SymbolTable`];
//! - an assignment target or expression operand that was never declared
//!   writes the *pending* error slot (last writer wins) but does not stop
//!   the parse;
//! - an undeclared identifier in the `WHILE` condition is fatal and aborts
//!   the parse with no AST.

use crate::analyzer::symbols::SymbolTable;
use crate::parser::ast::{AstNode, BinOp, Program, SourceLocation};
use crate::parser::lexer::{LexDiagnostic, Lexer, Token};
use thiserror::Error;

/// Parser error type. Fatal variants abort the parse; `UndeclaredVariable`
/// is also used for the non-fatal pending slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Variable '{name}' no declarada")]
    UndeclaredVariable { name: String },

    #[error("Error de sintaxis en '{text}', position {offset}")]
    UnexpectedToken { text: String, offset: usize },

    #[error("Syntax error at EOF")]
    UnexpectedEof,
}

/// Recursive descent parser for MiniWhile
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    diagnostics: Vec<LexDiagnostic>,
    symbols: SymbolTable,
    pending_error: Option<ParseError>,
}

impl Parser {
    /// Tokenize `source` and set up a fresh parse with an empty symbol table.
    ///
    /// Lexical diagnostics are non-fatal; they are retained and exposed via
    /// [`Parser::scan_diagnostics`] while parsing proceeds over the tokens
    /// that did scan.
    pub fn new(source: &str) -> Self {
        let mut lexer = Lexer::new(source);
        let (tokens, diagnostics) = lexer.tokenize();
        Self {
            tokens,
            position: 0,
            diagnostics,
            symbols: SymbolTable::new(),
            pending_error: None,
        }
    }

    /// Diagnostics from this parser's internal scan of the source.
    pub fn scan_diagnostics(&self) -> &[LexDiagnostic] {
        &self.diagnostics
    }

    /// The non-fatal semantic error recorded during the parse, if any.
    pub fn pending_error(&self) -> Option<&ParseError> {
        self.pending_error.as_ref()
    }

    /// The symbol table built during the parse.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Consume the parser, yielding its symbol table.
    pub fn into_symbols(self) -> SymbolTable {
        self.symbols
    }

    /// Parse the entire program
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        // declarations := declaration+ (the DO keyword ends the run)
        let mut declarations = vec![self.parse_declaration()?];
        while self.check(&Token::Int(self.current_location())) {
            declarations.push(self.parse_declaration()?);
        }

        self.expect(&Token::Do(self.current_location()))?;

        // statements := statement+ (the ENDDO keyword ends the run)
        let mut statements = vec![self.parse_statement()?];
        while matches!(self.peek(), Token::Ident(_, _)) {
            statements.push(self.parse_statement()?);
        }

        self.expect(&Token::EndDo(self.current_location()))?;

        let while_clause = self.parse_while_statement()?;

        self.expect(&Token::EndWhile(self.current_location()))?;

        // Nothing may follow ENDWHILE
        if !self.is_at_end() {
            return Err(self.syntax_error());
        }

        Ok(Program {
            declarations,
            statements,
            while_clause,
        })
    }

    /// Parse declaration: int IDENT = NUMBER ;
    fn parse_declaration(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        self.expect(&Token::Int(loc))?;
        let name = self.expect_identifier()?;
        self.expect(&Token::Assign(self.current_location()))?;
        let value = self.expect_number()?;
        self.expect(&Token::Semicolon(self.current_location()))?;

        // Redeclaration silently overwrites
        self.symbols.insert(&name, value);

        Ok(AstNode::Declare {
            name,
            value,
            location: loc,
        })
    }

    /// Parse statement: IDENT = expression ;
    ///
    /// The undeclared-target check runs after the expression has been
    /// parsed, so it overwrites any error an expression operand recorded.
    /// Either way the parse continues and the evaluated value is stored.
    fn parse_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        let name = self.expect_identifier()?;
        self.expect(&Token::Assign(self.current_location()))?;
        let expr = self.parse_expression()?;
        self.expect(&Token::Semicolon(self.current_location()))?;

        if !self.symbols.contains(&name) {
            self.pending_error = Some(ParseError::UndeclaredVariable { name: name.clone() });
        }

        let value = self.eval_expression(&expr);
        self.symbols.insert(&name, value);

        Ok(AstNode::Assign {
            name,
            expr: Box::new(expr),
            location: loc,
        })
    }

    /// Parse expression: term (('+'|'-') term)*, left-associative
    fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.parse_term()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::Plus(loc)) {
                BinOp::Add
            } else if self.match_token(&Token::Minus(loc)) {
                BinOp::Sub
            } else {
                break;
            };

            let right = Box::new(self.parse_term()?);
            left = AstNode::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse term: factor (('*'|'/') factor)*, left-associative
    fn parse_term(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.parse_factor()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::Star(loc)) {
                BinOp::Mul
            } else if self.match_token(&Token::Slash(loc)) {
                BinOp::Div
            } else {
                break;
            };

            let right = Box::new(self.parse_factor()?);
            left = AstNode::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse factor: NUMBER | IDENTIFIER
    ///
    /// An identifier that was never declared records a non-fatal pending
    /// error; the factor still parses.
    fn parse_factor(&mut self) -> Result<AstNode, ParseError> {
        match self.peek().clone() {
            Token::Number(n, loc) => {
                self.advance();
                Ok(AstNode::Number(n, loc))
            }
            Token::Ident(name, loc) => {
                self.advance();
                if !self.symbols.contains(&name) {
                    self.pending_error =
                        Some(ParseError::UndeclaredVariable { name: name.clone() });
                }
                Ok(AstNode::Variable(name, loc))
            }
            _ => Err(self.syntax_error()),
        }
    }

    /// Parse while statement: WHILE ( condition )
    fn parse_while_statement(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        self.expect(&Token::While(loc))?;
        self.expect(&Token::LParen(self.current_location()))?;
        let condition = self.parse_condition()?;
        self.expect(&Token::RParen(self.current_location()))?;

        Ok(AstNode::While {
            condition: Box::new(condition),
            location: loc,
        })
    }

    /// Parse condition: int IDENT == NUMBER
    ///
    /// Unlike assignment targets and expression operands, an undeclared
    /// identifier here aborts the entire parse. The check runs once the
    /// whole production has matched; a malformed condition surfaces as a
    /// generic syntax error instead.
    fn parse_condition(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        self.expect(&Token::Int(loc))?;
        let name = self.expect_identifier()?;
        self.expect(&Token::EqEq(self.current_location()))?;
        let value = self.expect_number()?;

        if !self.symbols.contains(&name) {
            return Err(ParseError::UndeclaredVariable { name });
        }

        Ok(AstNode::Condition {
            name,
            value,
            location: loc,
        })
    }

    /// Evaluate an expression against the current symbol table. Undeclared
    /// operands read as 0, as does division by zero; arithmetic wraps.
    fn eval_expression(&self, expr: &AstNode) -> i64 {
        match expr {
            AstNode::Number(n, _) => *n,
            AstNode::Variable(name, _) => self.symbols.get(name).unwrap_or(0),
            AstNode::BinaryOp { op, left, right, .. } => {
                let l = self.eval_expression(left);
                let r = self.eval_expression(right);
                match op {
                    BinOp::Add => l.wrapping_add(r),
                    BinOp::Sub => l.wrapping_sub(r),
                    BinOp::Mul => l.wrapping_mul(r),
                    BinOp::Div => {
                        if r == 0 {
                            0
                        } else {
                            l.wrapping_div(r)
                        }
                    }
                }
            }
            // Only expression nodes are ever evaluated
            _ => 0,
        }
    }

    // ===== Helper methods =====

    fn match_token(&mut self, token: &Token) -> bool {
        if std::mem::discriminant(self.peek()) == std::mem::discriminant(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    fn expect(&mut self, token: &Token) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(self.syntax_error())
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek().clone() {
            self.advance();
            Ok(name)
        } else {
            Err(self.syntax_error())
        }
    }

    fn expect_number(&mut self) -> Result<i64, ParseError> {
        if let Token::Number(n, _) = self.peek() {
            let n = *n;
            self.advance();
            Ok(n)
        } else {
            Err(self.syntax_error())
        }
    }

    /// Syntax error at the current token: its literal text and offset, or
    /// the end-of-input message when the tokens ran out.
    fn syntax_error(&self) -> ParseError {
        let token = self.peek();
        if matches!(token, Token::Eof(_)) {
            ParseError::UnexpectedEof
        } else {
            ParseError::UnexpectedToken {
                text: token.text(),
                offset: token.location().offset,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_program() {
        let source = "int x = 5; DO x = x + 1; ENDDO WHILE(int x == 6) ENDWHILE";
        let mut parser = Parser::new(source);
        let program = parser.parse_program().unwrap();

        assert!(parser.pending_error().is_none());
        assert_eq!(program.declarations.len(), 1);
        assert_eq!(program.statements.len(), 1);
        match &program.declarations[0] {
            AstNode::Declare { name, value, .. } => {
                assert_eq!(name, "x");
                assert_eq!(*value, 5);
            }
            other => panic!("Expected declaration, got {:?}", other),
        }
        match &program.while_clause {
            AstNode::While { condition, .. } => match condition.as_ref() {
                AstNode::Condition { name, value, .. } => {
                    assert_eq!(name, "x");
                    assert_eq!(*value, 6);
                }
                other => panic!("Expected condition, got {:?}", other),
            },
            other => panic!("Expected while clause, got {:?}", other),
        }
    }

    #[test]
    fn test_expression_precedence() {
        let source = "int a = 0; DO a = 1 + 2 * 3; ENDDO WHILE(int a == 7) ENDWHILE";
        let mut parser = Parser::new(source);
        let program = parser.parse_program().unwrap();

        // 1 + (2 * 3)
        match &program.statements[0] {
            AstNode::Assign { expr, .. } => match expr.as_ref() {
                AstNode::BinaryOp { op: BinOp::Add, left, right, .. } => {
                    assert!(matches!(left.as_ref(), AstNode::Number(1, _)));
                    assert!(matches!(
                        right.as_ref(),
                        AstNode::BinaryOp { op: BinOp::Mul, .. }
                    ));
                }
                other => panic!("Expected addition at the root, got {:?}", other),
            },
            other => panic!("Expected assignment, got {:?}", other),
        }
        assert_eq!(parser.symbols().get("a"), Some(7));
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let source = "int a = 0; DO a = 10 - 4 - 3; ENDDO WHILE(int a == 3) ENDWHILE";
        let mut parser = Parser::new(source);
        let program = parser.parse_program().unwrap();

        // (10 - 4) - 3, which evaluates to 3 rather than 9
        match &program.statements[0] {
            AstNode::Assign { expr, .. } => match expr.as_ref() {
                AstNode::BinaryOp { op: BinOp::Sub, left, right, .. } => {
                    assert!(matches!(
                        left.as_ref(),
                        AstNode::BinaryOp { op: BinOp::Sub, .. }
                    ));
                    assert!(matches!(right.as_ref(), AstNode::Number(3, _)));
                }
                other => panic!("Expected subtraction at the root, got {:?}", other),
            },
            other => panic!("Expected assignment, got {:?}", other),
        }
        assert_eq!(parser.symbols().get("a"), Some(3));
    }

    #[test]
    fn test_undeclared_assignment_target_is_advisory() {
        let source = "int x = 5; DO y = x + 1; ENDDO WHILE(int x == 6) ENDWHILE";
        let mut parser = Parser::new(source);
        let program = parser.parse_program().unwrap();

        assert_eq!(
            parser.pending_error(),
            Some(&ParseError::UndeclaredVariable {
                name: "y".to_string()
            })
        );
        // Parse completed structurally and the value was still stored
        assert_eq!(program.statements.len(), 1);
        assert_eq!(parser.symbols().get("x"), Some(5));
        assert_eq!(parser.symbols().get("y"), Some(6));
    }

    #[test]
    fn test_undeclared_condition_identifier_is_fatal() {
        let source = "int x = 5; DO x = x + 1; ENDDO WHILE(int z == 6) ENDWHILE";
        let mut parser = Parser::new(source);

        assert_eq!(
            parser.parse_program(),
            Err(ParseError::UndeclaredVariable {
                name: "z".to_string()
            })
        );
    }

    #[test]
    fn test_missing_endwhile_fails() {
        let source = "int x = 5; DO x = 6; ENDDO WHILE(int x == 6)";
        let mut parser = Parser::new(source);

        assert_eq!(parser.parse_program(), Err(ParseError::UnexpectedEof));
    }

    #[test]
    fn test_trailing_input_after_endwhile_fails() {
        let source = "int x = 5; DO x = 6; ENDDO WHILE(int x == 6) ENDWHILE extra";
        let mut parser = Parser::new(source);

        match parser.parse_program() {
            Err(ParseError::UnexpectedToken { text, .. }) => assert_eq!(text, "extra"),
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_syntax_error_reports_token_and_offset() {
        // ';' instead of '=' at offset 6
        let source = "int x ; 5;";
        let mut parser = Parser::new(source);

        let err = parser.parse_program().unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                text: ";".to_string(),
                offset: 6
            }
        );
        assert_eq!(err.to_string(), "Error de sintaxis en ';', position 6");
    }

    #[test]
    fn test_statement_check_overwrites_factor_check() {
        // Both the operand `q` and the target `p` are undeclared; the
        // target check runs last and wins the error slot.
        let source = "int x = 1; DO p = q + 1; ENDDO WHILE(int x == 1) ENDWHILE";
        let mut parser = Parser::new(source);
        parser.parse_program().unwrap();

        assert_eq!(
            parser.pending_error(),
            Some(&ParseError::UndeclaredVariable {
                name: "p".to_string()
            })
        );
    }

    #[test]
    fn test_condition_does_not_update_symbol_table() {
        let source = "int x = 5; DO x = 2; ENDDO WHILE(int x == 9) ENDWHILE";
        let mut parser = Parser::new(source);
        parser.parse_program().unwrap();

        assert_eq!(parser.symbols().get("x"), Some(2));
    }

    #[test]
    fn test_division_by_zero_reads_as_zero() {
        let source = "int a = 4; DO a = a / 0; ENDDO WHILE(int a == 0) ENDWHILE";
        let mut parser = Parser::new(source);
        parser.parse_program().unwrap();

        assert_eq!(parser.symbols().get("a"), Some(0));
    }

    #[test]
    fn test_parse_error_after_illegal_character() {
        // '#' is dropped by the lexer, leaving `int x = 5;` to parse; the
        // program is then incomplete.
        let mut parser = Parser::new("int x # = 5;");
        assert_eq!(parser.scan_diagnostics().len(), 1);
        assert_eq!(parser.parse_program(), Err(ParseError::UnexpectedEof));
    }
}
