use crate::lexer::{Position, Scanner, Token, TokenKind};
use crate::parser::{BinaryOp, Expr, ParserError};
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Recursive-descent parser with a single token of lookahead.
pub struct Parser<R = File> {
    scanner: Scanner<R>,
    current: Token,
    pub(crate) diagnostics: Vec<ParserError>,
}

impl Parser<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ParserError> {
        Ok(Self::new(Scanner::open(path)?))
    }

    /// Point the parser at another file; the next `parse` reads it.
    pub fn reset_to_file(&mut self, path: impl AsRef<Path>) -> Result<(), ParserError> {
        self.scanner.reset_to_file(path)?;
        Ok(())
    }
}

impl Parser<Cursor<Vec<u8>>> {
    pub fn from_source(name: &str, source: impl Into<String>) -> Result<Self, ParserError> {
        Ok(Self::new(Scanner::from_source(name, source)?))
    }
}

impl<R: Read + Seek> Parser<R> {
    #[must_use]
    pub fn new(scanner: Scanner<R>) -> Self {
        Self {
            scanner,
            current: Token::new(TokenKind::Eof, Position::start()),
            diagnostics: Vec::new(),
        }
    }

    pub fn scanner(&self) -> &Scanner<R> {
        &self.scanner
    }

    pub(crate) fn scanner_mut(&mut self) -> &mut Scanner<R> {
        &mut self.scanner
    }

    /// Syntax errors recorded by the last call to `parse`
    #[must_use]
    pub fn diagnostics(&self) -> &[ParserError] {
        &self.diagnostics
    }

    /// The token under inspection
    pub(crate) fn current(&self) -> &Token {
        &self.current
    }

    /// Replace the current token with the scanner's next one
    pub(crate) fn advance(&mut self) -> Result<(), ParserError> {
        self.current = self.scanner.next_token()?;
        Ok(())
    }

    /// Fail unless the current token is the punctuator `text`. Does not consume.
    pub(crate) fn expect_punct(&self, text: &str, context: &str) -> Result<(), ParserError> {
        if self.current.is_punct(text) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{text}' {context}")))
        }
    }

    pub(crate) fn unexpected(&self, expected: &str) -> ParserError {
        ParserError::ExpectedToken(
            expected.to_string(),
            self.current.spelling(),
            self.current.pos,
        )
    }

    /// expression ::= primary binoprhs
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParserError> {
        let lhs = self.parse_primary()?;
        self.parse_binop_rhs(0, lhs)
    }

    /// primary ::= numberexpr | identifierexpr | parenexpr
    fn parse_primary(&mut self) -> Result<Expr, ParserError> {
        match self.current.kind {
            TokenKind::Identifier(_) => self.parse_identifier_expr(),
            TokenKind::Number(_) => self.parse_number_expr(),
            TokenKind::Punctuator("(") => self.parse_paren_expr(),
            _ => Err(ParserError::ExpectedExpression(
                self.current.spelling(),
                self.current.pos,
            )),
        }
    }

    /// numberexpr ::= number
    fn parse_number_expr(&mut self) -> Result<Expr, ParserError> {
        let TokenKind::Number(value) = self.current.kind else {
            return Err(self.unexpected("a number"));
        };
        self.advance()?;
        Ok(Expr::Number(value))
    }

    /// parenexpr ::= '(' expression ')'
    fn parse_paren_expr(&mut self) -> Result<Expr, ParserError> {
        self.expect_punct("(", "to open a parenthesized expression")?;
        self.advance()?;

        let inner = self.parse_expression()?;

        self.expect_punct(")", "to close a parenthesized expression")?;
        self.advance()?;
        Ok(inner)
    }

    /// identifierexpr ::= identifier
    ///                ::= identifier '(' (expression (',' expression)*)? ')'
    fn parse_identifier_expr(&mut self) -> Result<Expr, ParserError> {
        let name = match self.current.identifier() {
            Some(name) => name.to_string(),
            None => return Err(self.unexpected("an identifier")),
        };
        self.advance()?;

        if !self.current.is_punct("(") {
            return Ok(Expr::Variable(name));
        }
        self.advance()?; // consume '('

        let mut args = Vec::new();
        if !self.current.is_punct(")") {
            loop {
                args.push(self.parse_expression()?);

                if self.current.is_punct(")") {
                    break;
                } else if self.current.is_punct(",") {
                    self.advance()?;
                } else {
                    return Err(self.unexpected("',' or ')' in argument list"));
                }
            }
        }
        self.advance()?; // consume ')'

        Ok(Expr::Call { callee: name, args })
    }

    /// Binding strength of the current token as a binary operator, or -1.
    fn current_precedence(&self) -> i32 {
        match self.current.kind {
            TokenKind::Punctuator(text) => BinaryOp::from_symbol(text).map_or(-1, BinaryOp::precedence),
            _ => -1,
        }
    }

    /// binoprhs ::= (binop primary)*
    ///
    /// Folds operators binding at least as tightly as `min_prec` onto `lhs`.
    fn parse_binop_rhs(&mut self, min_prec: i32, mut lhs: Expr) -> Result<Expr, ParserError> {
        loop {
            let prec = self.current_precedence();
            if prec < min_prec {
                return Ok(lhs);
            }

            let TokenKind::Punctuator(symbol) = self.current.kind else {
                return Ok(lhs);
            };
            let pos = self.current.pos;
            self.advance()?; // consume operator

            let mut rhs = self.parse_primary()?;

            // A tighter operator after rhs takes rhs as its left operand.
            if prec < self.current_precedence() {
                rhs = self.parse_binop_rhs(prec + 1, rhs)?;
            }

            lhs = Expr::binary(symbol, lhs, rhs, pos)?;
        }
    }
}
