use crate::lexer::source::SourceBuffer;
use crate::lexer::{
    single_char_punctuator, LexerError, Position, Token, TokenKind, MULTI_CHAR_PUNCTUATORS,
};
use crate::symbol::{SymbolTable, Word};
use log::{debug, trace};
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

/// States of the numeric literal recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    Start,
    AfterSign,
    DecimalDigit,
    DecimalEnd,
    LeadingZero,
    FirstHexDigit,
    HexDigit,
    HexEnd,
    OctalDigit,
    OctalEnd,
    FirstBinaryDigit,
    BinaryDigit,
    BinaryEnd,
    IntZero,
    AfterDot,
    AfterDotOpt,
    FractionDigit,
    AfterExpChar,
    AfterExpSign,
    ExpDigit,
    FloatEnd,
}

pub struct Scanner<R = File> {
    source: SourceBuffer<R>,
    symbols: SymbolTable,
}

impl Scanner<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LexerError> {
        Ok(Self::new(SourceBuffer::open(path)?))
    }

    /// Switch to another file and start over
    pub fn reset_to_file(&mut self, path: impl AsRef<Path>) -> Result<(), LexerError> {
        self.source.reopen(path)?;
        self.reset()
    }
}

impl Scanner<Cursor<Vec<u8>>> {
    /// Scanner over an in-memory source
    pub fn from_source(name: &str, source: impl Into<String>) -> Result<Self, LexerError> {
        let bytes = source.into().into_bytes();
        Ok(Self::new(SourceBuffer::new(Cursor::new(bytes), name)?))
    }
}

impl<R: Read + Seek> Scanner<R> {
    pub fn new(source: SourceBuffer<R>) -> Self {
        Self {
            source,
            symbols: SymbolTable::new(),
        }
    }

    pub fn source(&self) -> &SourceBuffer<R> {
        &self.source
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Position of the next character the scanner will look at
    pub fn position(&self) -> Position {
        self.source.position()
    }

    /// True once the underlying buffer has nothing left to load
    pub fn is_finished(&self) -> bool {
        !self.source.has_more_chunks()
    }

    /// Forget interned words and rewind to the start of the source
    pub fn reset(&mut self) -> Result<(), LexerError> {
        debug!("resetting scanner for '{}'", self.source.name());
        self.symbols.clear();
        self.source.rewind()
    }

    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        loop {
            self.skip_blanks()?;
            if self.source.starts_with("#")? {
                self.skip_line_comment()?;
                continue;
            }
            break;
        }

        let pos = self.source.start_position();
        let kind = if let Some(value) = self.scan_number()? {
            TokenKind::Number(value)
        } else if let Some(word) = self.scan_word()? {
            match word {
                Word::Identifier(name) => TokenKind::Identifier(name),
                Word::Keyword(keyword) => TokenKind::Keyword(keyword),
            }
        } else if let Some(text) = self.scan_punctuator()? {
            TokenKind::Punctuator(text)
        } else if self.source.is_eof() {
            TokenKind::Eof
        } else {
            return Err(LexerError::UnexpectedChar(self.source.peek(), pos));
        };

        let token = Token::new(kind, pos);
        trace!("{token}");
        Ok(token)
    }

    /// Write every remaining token, one per line, up to and including the end
    /// of input, then reset the scanner.
    pub fn dump_tokens(&mut self, out: &mut impl Write) -> Result<(), LexerError> {
        loop {
            let token = self.next_token()?;
            writeln!(out, "{token}").map_err(LexerError::Write)?;
            if token.is_eof() {
                break;
            }
        }
        self.reset()
    }

    fn skip_blanks(&mut self) -> Result<(), LexerError> {
        while is_blank(self.source.peek()) {
            self.source.advance()?;
            self.source.mark_lexeme_start();
        }
        Ok(())
    }

    fn skip_line_comment(&mut self) -> Result<(), LexerError> {
        // Test the buffer, not the sentinel: a NUL byte is comment text.
        while !self.source.is_eof() {
            let ch = self.source.advance()?;
            self.source.mark_lexeme_start();
            if ch == '\n' {
                break;
            }
        }
        Ok(())
    }

    fn scan_word(&mut self) -> Result<Option<Word>, LexerError> {
        if !is_ident_char(self.source.peek()) {
            return Ok(None);
        }
        while is_ident_char(self.source.peek()) {
            self.source.advance()?;
        }
        let spelling = self.source.lexeme();
        self.source.mark_lexeme_start();
        Ok(Some(self.symbols.intern(&spelling)))
    }

    fn scan_punctuator(&mut self) -> Result<Option<&'static str>, LexerError> {
        for punct in MULTI_CHAR_PUNCTUATORS {
            if self.source.starts_with(punct)? {
                for _ in 0..punct.len() {
                    self.source.advance()?;
                }
                self.source.mark_lexeme_start();
                return Ok(Some(punct));
            }
        }

        match single_char_punctuator(self.source.peek()) {
            Some(punct) => {
                self.source.advance()?;
                self.source.mark_lexeme_start();
                Ok(Some(punct))
            }
            None => Ok(None),
        }
    }

    /// Run the numeric literal recognizer at the cursor.
    ///
    /// Returns `None` with the cursor rewound when the input does not start a
    /// number. Malformed radix and exponent forms are errors.
    fn scan_number(&mut self) -> Result<Option<f64>, LexerError> {
        let mut state = NumberState::Start;

        loop {
            let ch = self.source.peek();
            state = match state {
                NumberState::Start => {
                    // Signs belong to the grammar, never to the literal.
                    if ch == '+' || ch == '-' {
                        break;
                    }
                    NumberState::AfterSign
                }
                NumberState::AfterSign => match ch {
                    '0' => self.bump(NumberState::LeadingZero)?,
                    '1'..='9' => self.bump(NumberState::DecimalDigit)?,
                    '.' => self.bump(NumberState::AfterDot)?,
                    _ => break,
                },
                NumberState::DecimalDigit => match ch {
                    '0'..='9' => self.bump(NumberState::DecimalDigit)?,
                    '.' => self.bump(NumberState::AfterDotOpt)?,
                    'e' | 'E' => self.bump(NumberState::AfterExpChar)?,
                    _ => NumberState::DecimalEnd,
                },
                NumberState::LeadingZero => match ch {
                    'x' | 'X' => self.bump(NumberState::FirstHexDigit)?,
                    'b' | 'B' => self.bump(NumberState::FirstBinaryDigit)?,
                    '0'..='7' => NumberState::OctalDigit,
                    '.' => self.bump(NumberState::AfterDotOpt)?,
                    _ => NumberState::IntZero,
                },
                NumberState::FirstHexDigit if ch.is_ascii_hexdigit() => {
                    self.bump(NumberState::HexDigit)?
                }
                NumberState::HexDigit if ch.is_ascii_hexdigit() => {
                    self.bump(NumberState::HexDigit)?
                }
                NumberState::HexDigit => NumberState::HexEnd,
                NumberState::OctalDigit if ch.is_digit(8) => self.bump(NumberState::OctalDigit)?,
                NumberState::OctalDigit => NumberState::OctalEnd,
                NumberState::FirstBinaryDigit if ch == '0' || ch == '1' => {
                    self.bump(NumberState::BinaryDigit)?
                }
                NumberState::BinaryDigit if ch == '0' || ch == '1' => {
                    self.bump(NumberState::BinaryDigit)?
                }
                NumberState::BinaryDigit => NumberState::BinaryEnd,
                NumberState::AfterDot if ch.is_ascii_digit() => {
                    self.bump(NumberState::FractionDigit)?
                }
                NumberState::AfterDot => break,
                NumberState::AfterDotOpt | NumberState::FractionDigit => match ch {
                    '0'..='9' => self.bump(NumberState::FractionDigit)?,
                    'e' | 'E' => self.bump(NumberState::AfterExpChar)?,
                    _ => NumberState::FloatEnd,
                },
                NumberState::AfterExpChar => {
                    if ch == '+' || ch == '-' {
                        self.source.advance()?;
                    }
                    NumberState::AfterExpSign
                }
                NumberState::AfterExpSign if ch.is_ascii_digit() => {
                    self.bump(NumberState::ExpDigit)?
                }
                NumberState::ExpDigit if ch.is_ascii_digit() => self.bump(NumberState::ExpDigit)?,
                NumberState::ExpDigit => NumberState::FloatEnd,
                NumberState::FirstHexDigit
                | NumberState::FirstBinaryDigit
                | NumberState::AfterExpSign => {
                    return Err(self.invalid_number(ch));
                }
                NumberState::DecimalEnd | NumberState::FloatEnd => {
                    return self.finish_number(|text| text.parse::<f64>().ok());
                }
                NumberState::HexEnd => {
                    return self.finish_number(|text| radix_to_f64(&text[2..], 16));
                }
                NumberState::BinaryEnd => {
                    return self.finish_number(|text| radix_to_f64(&text[2..], 2));
                }
                NumberState::OctalEnd => {
                    return self.finish_number(|text| radix_to_f64(text, 8));
                }
                NumberState::IntZero => {
                    self.source.mark_lexeme_start();
                    return Ok(Some(0.0));
                }
            };
        }

        self.source.reset_to_lexeme_start();
        Ok(None)
    }

    fn bump(&mut self, next: NumberState) -> Result<NumberState, LexerError> {
        self.source.advance()?;
        Ok(next)
    }

    fn finish_number(
        &mut self,
        convert: impl FnOnce(&str) -> Option<f64>,
    ) -> Result<Option<f64>, LexerError> {
        let text = self.source.lexeme();
        let value = convert(&text)
            .ok_or_else(|| LexerError::InvalidNumber(text.clone(), self.source.start_position()))?;
        self.source.mark_lexeme_start();
        Ok(Some(value))
    }

    fn invalid_number(&mut self, found: char) -> LexerError {
        let mut text = self.source.lexeme();
        if !self.source.is_eof() {
            text.push(found);
        }
        LexerError::InvalidNumber(text, self.source.start_position())
    }
}

fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Convert a run of digits in `radix` to the nearest double.
fn radix_to_f64(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    match u64::from_str_radix(digits, radix) {
        Ok(value) => Some(value as f64),
        // Wider than 64 bits: fold digit by digit.
        Err(_) => digits.chars().try_fold(0.0, |acc: f64, ch| {
            ch.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        }),
    }
}
