//! Text input for drawing runs
//!
//! Splits input text into whitespace-delimited words and converts each word
//! into the single-byte character codes the stroke font is keyed by.

use crate::core::errors::EncodingError;
use std::io::{self, BufRead};

/// Longest word handed to the layout engine; longer runs are split
pub const MAX_WORD_LEN: usize = 63;

/// Reads words from a buffered text source
pub struct WordReader<R> {
    reader: R,
    pending: Vec<String>,
}

impl<R: BufRead> WordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: Vec::new(),
        }
    }

    /// The next word, or `None` at end of input
    ///
    /// Bytes that are not valid UTF-8 are kept in the word as replacement
    /// characters, so encoding rejects that word alone.
    pub fn next_word(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(word) = self.pending.pop() {
                return Ok(Some(word));
            }

            let mut line = Vec::new();
            if self.reader.read_until(b'\n', &mut line)? == 0 {
                return Ok(None);
            }

            // Stored reversed so `pop` yields words in reading order
            self.pending = line
                .split(|byte| byte.is_ascii_whitespace())
                .filter(|word| !word.is_empty())
                .flat_map(|word| word.chunks(MAX_WORD_LEN))
                .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
                .rev()
                .collect();
        }
    }
}

impl<R: BufRead> Iterator for WordReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_word().transpose()
    }
}

/// Character codes for a word, one byte per character
pub fn encode_word(word: &str) -> Result<Vec<u8>, EncodingError> {
    word.chars()
        .enumerate()
        .map(|(position, character)| {
            if character.is_ascii() {
                Ok(character as u8)
            } else {
                Err(EncodingError {
                    character,
                    position,
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn words(text: &str) -> Vec<String> {
        WordReader::new(Cursor::new(text))
            .collect::<io::Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_splits_on_any_whitespace() {
        assert_eq!(
            words("Hello,  world\n\tsecond line\r\n\nend"),
            vec!["Hello,", "world", "second", "line", "end"]
        );
    }

    #[test]
    fn test_empty_input_has_no_words() {
        assert!(words("").is_empty());
        assert!(words("   \n\n  ").is_empty());
    }

    #[test]
    fn test_long_words_are_split() {
        let long = "x".repeat(MAX_WORD_LEN + 5);
        let result = words(&long);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].len(), MAX_WORD_LEN);
        assert_eq!(result[1].len(), 5);
    }

    #[test]
    fn test_invalid_utf8_stays_in_its_word() {
        let result = WordReader::new(Cursor::new(&b"A A caf\xe9 B\n"[..]))
            .collect::<io::Result<Vec<_>>>()
            .unwrap();

        assert_eq!(result, vec!["A", "A", "caf\u{FFFD}", "B"]);
        assert!(encode_word(&result[2]).is_err());
    }

    #[test]
    fn test_encode_ascii_word() {
        assert_eq!(encode_word("Az9!").unwrap(), vec![65, 122, 57, 33]);
    }

    #[test]
    fn test_encode_rejects_multibyte_characters() {
        let error = encode_word("café").unwrap_err();
        assert_eq!(
            error,
            EncodingError {
                character: 'é',
                position: 3
            }
        );
    }
}
