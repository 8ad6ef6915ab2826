use crate::lexer::{LexerError, Position};
use thiserror::Error;

/// Parser error types
#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Expected {0} but found '{1}' at {2}")]
    ExpectedToken(String, String, Position),

    #[error("Unknown token '{0}' when parsing a primary expression at {1}")]
    ExpectedExpression(String, Position),

    #[error("Unknown binary operator '{0}' at {1}")]
    UnknownOperator(String, Position),

    #[error("Lexer error: {0}")]
    Lexer(#[from] LexerError),
}

impl ParserError {
    /// Lexical failures stop the whole pipeline; everything else is a syntax
    /// error the top-level loop recovers from.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParserError::Lexer(_))
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            ParserError::ExpectedToken(_, _, pos)
            | ParserError::ExpectedExpression(_, pos)
            | ParserError::UnknownOperator(_, pos) => Some(*pos),
            ParserError::Lexer(LexerError::LexemeTooLong(pos))
            | ParserError::Lexer(LexerError::UnexpectedChar(_, pos))
            | ParserError::Lexer(LexerError::InvalidNumber(_, pos)) => Some(*pos),
            ParserError::Lexer(_) => None,
        }
    }
}
