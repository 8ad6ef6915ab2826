use crate::lexer::Position;
use std::fmt;
use std::rc::Rc;

/// Language keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Def,
    Extern,
}

impl Keyword {
    /// Every reserved word, in the order the scanner seeds them.
    pub const ALL: [Keyword; 2] = [Keyword::Def, Keyword::Extern];

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Def => "def",
            Keyword::Extern => "extern",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multi-character punctuators, probed in this order before falling back to a
/// single punctuation character.
pub const MULTI_CHAR_PUNCTUATORS: [&str; 21] = [
    "<<=", ">>=", "==", "!=", "<=", ">=", "->", "+=", "-=", "*=", "/=",
    "++", "--", "%=", "&=", "|=", "^=", "&&", "||", "<<", ">>",
];

const ASCII_PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// The one-character punctuator spelled by `ch`, if `ch` is ASCII punctuation.
pub fn single_char_punctuator(ch: char) -> Option<&'static str> {
    ASCII_PUNCTUATION
        .find(ch)
        .map(|i| &ASCII_PUNCTUATION[i..i + 1])
}

/// Token kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Eof,
    Number(f64),
    /// Shares its allocation with every other occurrence of the same name in
    /// one scan session.
    Identifier(Rc<str>),
    Punctuator(&'static str),
    Keyword(Keyword),
}

/// A token with position information
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Position,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Position) -> Self {
        Self { kind, pos }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// True if this is the punctuator spelled `text`.
    pub fn is_punct(&self, text: &str) -> bool {
        matches!(self.kind, TokenKind::Punctuator(p) if p == text)
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.kind, TokenKind::Keyword(k) if k == keyword)
    }

    /// Source-like spelling used in diagnostics
    pub fn spelling(&self) -> String {
        match &self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Number(value) => NumberLiteral(*value).to_string(),
            TokenKind::Identifier(name) => name.to_string(),
            TokenKind::Punctuator(text) => text.to_string(),
            TokenKind::Keyword(kw) => kw.to_string(),
        }
    }

    pub fn identifier(&self) -> Option<&Rc<str>> {
        match &self.kind {
            TokenKind::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

/// Shortest spelling of a numeric value.
///
/// Magnitudes from `1e-5` up to `1e16` print positionally; anything outside
/// that range switches to exponent form with an explicit sign (`1e+21`,
/// `2.5e-7`).
#[derive(Debug, Clone, Copy)]
pub struct NumberLiteral(pub f64);

impl fmt::Display for NumberLiteral {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = self.0;
        let magnitude = value.abs();
        if !value.is_finite() || magnitude == 0.0 || (1e-5..1e16).contains(&magnitude) {
            return write!(f, "{value}");
        }

        let text = format!("{value:e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                write!(f, "{mantissa}e+{exponent}")
            }
            _ => f.write_str(&text),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Eof => write!(f, "eof"),
            TokenKind::Number(value) => write!(f, "number {}", NumberLiteral(*value)),
            TokenKind::Identifier(name) => write!(f, "identifier {}", name),
            TokenKind::Punctuator(text) => write!(f, "punctuator {}", text),
            TokenKind::Keyword(kw) => write!(f, "keyword {}", kw),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.pos, self.kind)
    }
}
