//! Record stream reader for stroke-font data
//!
//! Font files are a flat stream of whitespace-separated integers read three
//! at a time. The reader stops at end of input or at the first token that is
//! not an integer, whichever comes first.

use std::str::SplitAsciiWhitespace;

/// First field of a triple that opens a glyph record
pub const GLYPH_HEADER: i64 = 999;

/// Reads integer triples from the front of a font source
pub struct RecordReader<'a> {
    tokens: SplitAsciiWhitespace<'a>,
    exhausted: bool,
}

impl<'a> RecordReader<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            tokens: source.split_ascii_whitespace(),
            exhausted: false,
        }
    }

    /// Next complete triple, or `None` once the stream cannot supply one
    pub fn next_triple(&mut self) -> Option<[i64; 3]> {
        let mut triple = [0i64; 3];
        for field in triple.iter_mut() {
            *field = self.next_integer()?;
        }
        Some(triple)
    }

    fn next_integer(&mut self) -> Option<i64> {
        if self.exhausted {
            return None;
        }
        match self.tokens.next().map(str::parse::<i64>) {
            Some(Ok(value)) => Some(value),
            _ => {
                self.exhausted = true;
                None
            }
        }
    }
}

impl Iterator for RecordReader<'_> {
    type Item = [i64; 3];

    fn next(&mut self) -> Option<Self::Item> {
        self.next_triple()
    }
}
