use crate::lexer::{LexerError, Position};
use log::debug;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Size of each of the two input chunks.
pub const CHUNK_SIZE: usize = 4096;

/// Longest lexeme the buffer can hold without overwriting its start.
pub const MAX_LEXEME_LEN: usize = CHUNK_SIZE - 1;

/// Sentinel returned past the final character.
pub const EOF: char = '\0';

/// One half of the double buffer.
///
/// `stamp` cycles through 0, 1, 2. A chunk whose stamp is the successor of the
/// lexeme-start chunk's stamp already holds the data following that lexeme and
/// must not be reloaded.
struct Chunk {
    data: [u8; CHUNK_SIZE],
    len: usize,
    last: bool,
    stamp: u8,
}

impl Chunk {
    fn empty() -> Self {
        Self {
            data: [0; CHUNK_SIZE],
            len: 0,
            last: false,
            stamp: 0,
        }
    }
}

fn next_stamp(stamp: u8) -> u8 {
    (stamp + 1) % 3
}

/// Reads a source through two alternating fixed-size chunks.
///
/// The buffer keeps two cursors: `forward`, the scan position, and the lexeme
/// start. Characters between the two form the current lexeme, which can be
/// committed with [`SourceBuffer::mark_lexeme_start`] or discarded with
/// [`SourceBuffer::reset_to_lexeme_start`].
pub struct SourceBuffer<R = File> {
    name: String,
    reader: R,
    chunks: Box<[Chunk; 2]>,

    forward: usize,
    forward_chunk: usize,
    forward_pos: Position,

    begin: usize,
    start_chunk: usize,
    start_pos: Position,

    extent: usize,
}

impl SourceBuffer<File> {
    /// Open `path` and load its first chunk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LexerError> {
        let path = path.as_ref();
        debug!("opening source file '{}'", path.display());
        let file = File::open(path).map_err(|source| LexerError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(file, path.display().to_string())
    }

    /// Close the current file and continue from the start of `path`.
    pub fn reopen(&mut self, path: impl AsRef<Path>) -> Result<(), LexerError> {
        let path = path.as_ref();
        debug!("reopening source as '{}'", path.display());
        self.reader = File::open(path).map_err(|source| LexerError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.name = path.display().to_string();
        self.rewind()
    }
}

impl<R: Read + Seek> SourceBuffer<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Result<Self, LexerError> {
        let mut buffer = Self {
            name: name.into(),
            reader,
            chunks: Box::new([Chunk::empty(), Chunk::empty()]),
            forward: 0,
            forward_chunk: 0,
            forward_pos: Position::start(),
            begin: 0,
            start_chunk: 0,
            start_pos: Position::start(),
            extent: 0,
        };
        buffer.load_chunk()?;
        Ok(buffer)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of the scan cursor.
    pub fn position(&self) -> Position {
        self.forward_pos
    }

    /// Position where the current lexeme begins.
    pub fn start_position(&self) -> Position {
        self.start_pos
    }

    pub fn peek(&self) -> char {
        let chunk = &self.chunks[self.forward_chunk];
        if self.forward < chunk.len {
            chunk.data[self.forward] as char
        } else {
            EOF
        }
    }

    /// True when the cursor sits past the last character of the source.
    pub fn is_eof(&self) -> bool {
        let chunk = &self.chunks[self.forward_chunk];
        chunk.last && self.forward >= chunk.len
    }

    /// False once the terminal chunk has been loaded and consumed.
    pub fn has_more_chunks(&self) -> bool {
        !self.is_eof()
    }

    /// Return the character under the cursor and move past it.
    pub fn advance(&mut self) -> Result<char, LexerError> {
        if self.is_eof() {
            return Ok(EOF);
        }
        if self.extent >= MAX_LEXEME_LEN {
            return Err(LexerError::LexemeTooLong(self.start_pos));
        }

        let ch = self.peek();
        if ch == '\n' {
            self.forward_pos.advance_line();
        } else {
            self.forward_pos.advance_column();
        }
        self.forward += 1;
        self.extent += 1;

        if self.forward == CHUNK_SIZE {
            self.forward = 0;
            self.forward_chunk ^= 1;
            self.load_chunk()?;
        }
        Ok(ch)
    }

    /// Commit everything consumed so far; the next lexeme starts at the cursor.
    pub fn mark_lexeme_start(&mut self) {
        self.begin = self.forward;
        self.start_chunk = self.forward_chunk;
        self.start_pos = self.forward_pos;
        self.extent = 0;
    }

    /// Discard everything consumed since the last commit.
    pub fn reset_to_lexeme_start(&mut self) {
        self.forward = self.begin;
        self.forward_chunk = self.start_chunk;
        self.forward_pos = self.start_pos;
        self.extent = 0;
    }

    /// Probe whether the input at the cursor spells `pattern`.
    ///
    /// The cursor is always rewound to the lexeme start before returning, so
    /// this is only meaningful right after a commit.
    pub fn starts_with(&mut self, pattern: &str) -> Result<bool, LexerError> {
        let mut matched = true;
        for expected in pattern.chars() {
            if self.advance()? != expected {
                matched = false;
                break;
            }
        }
        self.reset_to_lexeme_start();
        Ok(matched)
    }

    /// Text of the uncommitted lexeme.
    pub fn lexeme(&self) -> String {
        let mut text = String::with_capacity(self.extent);
        if self.start_chunk == self.forward_chunk {
            let chunk = &self.chunks[self.forward_chunk];
            text.extend(chunk.data[self.begin..self.forward].iter().map(|&b| b as char));
        } else {
            let head = &self.chunks[self.start_chunk];
            let tail = &self.chunks[self.forward_chunk];
            text.extend(head.data[self.begin..head.len].iter().map(|&b| b as char));
            text.extend(tail.data[..self.forward].iter().map(|&b| b as char));
        }
        text
    }

    /// Go back to the beginning of the source and drop every loaded chunk.
    pub fn rewind(&mut self) -> Result<(), LexerError> {
        self.reader.seek(SeekFrom::Start(0))?;
        for chunk in self.chunks.iter_mut() {
            chunk.len = 0;
            chunk.last = false;
            chunk.stamp = 0;
        }
        self.forward = 0;
        self.forward_chunk = 0;
        self.forward_pos = Position::start();
        self.mark_lexeme_start();
        self.load_chunk()
    }

    fn load_chunk(&mut self) -> Result<(), LexerError> {
        let expected = next_stamp(self.chunks[self.start_chunk].stamp);
        let index = self.forward_chunk;
        if index != self.start_chunk && self.chunks[index].stamp == expected {
            return Ok(());
        }

        let chunk = &mut self.chunks[index];
        chunk.len = fill(&mut self.reader, &mut chunk.data)?;
        chunk.last = chunk.len < CHUNK_SIZE;
        chunk.stamp = expected;
        Ok(())
    }
}

fn fill(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
