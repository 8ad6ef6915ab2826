use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

use kaleidoscope_rust::lexer::source::{SourceBuffer, CHUNK_SIZE, EOF, MAX_LEXEME_LEN};
use kaleidoscope_rust::lexer::{LexerError, Position};

fn buffer(text: &str) -> SourceBuffer<Cursor<Vec<u8>>> {
    SourceBuffer::new(Cursor::new(text.as_bytes().to_vec()), "<test>")
        .expect("Failed to create source buffer")
}

/// Consume `count` characters and commit them.
fn skip(buf: &mut SourceBuffer<Cursor<Vec<u8>>>, count: usize) {
    for _ in 0..count {
        buf.advance().expect("Failed to advance");
        buf.mark_lexeme_start();
    }
}

#[test]
fn test_advance_tracks_lines_and_columns() {
    let mut buf = buffer("ab\ncd");

    assert_eq!(buf.advance().unwrap(), 'a');
    assert_eq!(buf.advance().unwrap(), 'b');
    assert_eq!(buf.position(), Position::new(0, 2, 2));

    assert_eq!(buf.advance().unwrap(), '\n');
    assert_eq!(buf.position(), Position::new(1, 0, 3));

    assert_eq!(buf.advance().unwrap(), 'c');
    assert_eq!(buf.position(), Position::new(1, 1, 4));
    assert_eq!(buf.position().to_string(), "2:2");
}

#[test]
fn test_end_of_input_is_sticky() {
    let mut buf = buffer("x");

    assert!(buf.has_more_chunks());
    assert_eq!(buf.advance().unwrap(), 'x');
    assert!(buf.is_eof());
    assert!(!buf.has_more_chunks());

    let pos = buf.position();
    assert_eq!(buf.peek(), EOF);
    assert_eq!(buf.advance().unwrap(), EOF);
    assert_eq!(buf.position(), pos, "Advancing at end of input must not move");
}

#[test]
fn test_empty_source() {
    let buf = buffer("");
    assert!(buf.is_eof());
    assert_eq!(buf.peek(), EOF);
    assert_eq!(buf.lexeme(), "");
}

#[test]
fn test_lexeme_commit_and_discard() {
    let mut buf = buffer("hello world");

    for _ in 0..5 {
        buf.advance().unwrap();
    }
    assert_eq!(buf.lexeme(), "hello");

    buf.reset_to_lexeme_start();
    assert_eq!(buf.position(), Position::start());
    assert_eq!(buf.lexeme(), "");
    assert_eq!(buf.peek(), 'h');

    for _ in 0..6 {
        buf.advance().unwrap();
    }
    buf.mark_lexeme_start();
    assert_eq!(buf.start_position(), Position::new(0, 6, 6));
    assert_eq!(buf.peek(), 'w');
}

#[test]
fn test_starts_with_restores_cursor() {
    let mut buf = buffer("<<= rest");

    assert!(buf.starts_with("<<=").unwrap());
    assert_eq!(buf.position(), Position::start());

    assert!(buf.starts_with("<<").unwrap());
    assert!(!buf.starts_with("<=").unwrap());
    assert!(!buf.starts_with("<<=x").unwrap());
    assert_eq!(buf.position(), Position::start());
    assert_eq!(buf.peek(), '<');
}

#[test]
fn test_starts_with_past_end_of_input() {
    let mut buf = buffer("-");
    assert!(!buf.starts_with("->").unwrap());
    assert!(buf.starts_with("-").unwrap());
    assert_eq!(buf.peek(), '-');
}

#[test]
fn test_lexeme_spanning_chunk_boundary() {
    let padding = CHUNK_SIZE - 6;
    let text = format!("{}abcdefghijkl tail", " ".repeat(padding));
    let mut buf = buffer(&text);

    skip(&mut buf, padding);
    for _ in 0..12 {
        buf.advance().expect("Failed to advance across chunk boundary");
    }
    assert_eq!(buf.lexeme(), "abcdefghijkl");

    // Probing back and forth over the boundary must not reload the chunk.
    buf.reset_to_lexeme_start();
    assert!(buf.starts_with("abcdefghijkl tail").unwrap());
    for _ in 0..12 {
        buf.advance().unwrap();
    }
    assert_eq!(buf.lexeme(), "abcdefghijkl");
    buf.mark_lexeme_start();

    skip(&mut buf, 1);
    for _ in 0..4 {
        buf.advance().unwrap();
    }
    assert_eq!(buf.lexeme(), "tail");
    assert!(buf.is_eof());
}

#[test]
fn test_many_chunks_read_in_order() {
    let text: String = (0..3 * CHUNK_SIZE + 17)
        .map(|i| char::from(b'a' + (i % 26) as u8))
        .collect();
    let mut buf = buffer(&text);

    let mut read = String::new();
    loop {
        let ch = buf.advance().expect("Failed to advance");
        if ch == EOF {
            break;
        }
        read.push(ch);
        buf.mark_lexeme_start();
    }
    assert_eq!(read, text);
}

#[test]
fn test_lexeme_too_long() {
    let text = "a".repeat(CHUNK_SIZE);
    let mut buf = buffer(&text);

    for _ in 0..MAX_LEXEME_LEN {
        buf.advance().expect("A lexeme of the maximum length must fit");
    }
    assert_eq!(buf.lexeme().len(), MAX_LEXEME_LEN);

    match buf.advance() {
        Err(LexerError::LexemeTooLong(pos)) => assert_eq!(pos, Position::start()),
        other => panic!("Expected LexemeTooLong, got {other:?}"),
    }
}

#[test]
fn test_rewind_after_several_chunks() {
    let text = format!("{}end", "x".repeat(2 * CHUNK_SIZE));
    let mut buf = buffer(&text);

    skip(&mut buf, 2 * CHUNK_SIZE + 3);
    assert!(buf.is_eof());

    buf.rewind().expect("Failed to rewind");
    assert_eq!(buf.position(), Position::start());
    assert_eq!(buf.start_position(), Position::start());
    assert!(buf.has_more_chunks());
    assert_eq!(buf.peek(), 'x');

    skip(&mut buf, 2 * CHUNK_SIZE);
    for _ in 0..3 {
        buf.advance().unwrap();
    }
    assert_eq!(buf.lexeme(), "end");
}

#[test]
fn test_open_and_reopen_files() {
    let mut first = NamedTempFile::new().expect("Failed to create temp file");
    write!(first, "first").unwrap();
    let mut second = NamedTempFile::new().expect("Failed to create temp file");
    write!(second, "second").unwrap();

    let mut buf = SourceBuffer::open(first.path()).expect("Failed to open source");
    assert_eq!(buf.name(), first.path().display().to_string());
    assert_eq!(buf.advance().unwrap(), 'f');

    buf.reopen(second.path()).expect("Failed to reopen source");
    assert_eq!(buf.name(), second.path().display().to_string());
    assert_eq!(buf.position(), Position::start());
    assert_eq!(buf.advance().unwrap(), 's');
}

#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = dir.path().join("missing.kal");

    match SourceBuffer::open(&missing) {
        Err(LexerError::Open { path, .. }) => assert_eq!(path, missing),
        Err(other) => panic!("Expected Open error, got {other:?}"),
        Ok(_) => panic!("Opening a missing file must fail"),
    }
}
