use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Position in source file.
///
/// Counted from zero; `Display` prints the 1-based `line:column` form used in
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }

    pub fn start() -> Self {
        Self::default()
    }

    pub(crate) fn advance_column(&mut self) {
        self.column += 1;
        self.offset += 1;
    }

    pub(crate) fn advance_line(&mut self) {
        self.line += 1;
        self.column = 0;
        self.offset += 1;
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Lexer error types
#[derive(Error, Debug)]
pub enum LexerError {
    #[error("cannot open file '{}'", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read source: {0}")]
    Io(#[from] io::Error),

    #[error("failed to write token dump: {0}")]
    Write(#[source] io::Error),

    #[error("Lexeme starting at {0} is too long")]
    LexemeTooLong(Position),

    #[error("Unexpected character '{}' at {}", .0.escape_default(), .1)]
    UnexpectedChar(char, Position),

    #[error("Invalid number format '{0}' at {1}")]
    InvalidNumber(String, Position),
}
