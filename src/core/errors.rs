//! Error types for font lookup, text encoding, transport and whole runs

use std::time::Duration;
use thiserror::Error;

/// Failure resolving a character code to its strokes
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FontError {
    /// No glyph header for this code before the end of the stream
    #[error("no stroke data for character code {code}")]
    NotFound { code: u32 },

    /// The header promised more stroke records than the stream holds
    #[error("stroke data for character code {code} is truncated: expected {expected} moves, found {found}")]
    Truncated {
        code: u32,
        expected: usize,
        found: usize,
    },

    /// The header carries a move count that cannot be valid
    #[error("malformed glyph header for character code {code}: move count {count}")]
    MalformedHeader { code: u32, count: i64 },

    /// Stroke buffers for the glyph could not be allocated
    #[error("out of memory loading {moves} moves for character code {code}")]
    Allocation { code: u32, moves: usize },
}

impl FontError {
    /// Whether this is a "not in font" failure rather than a resource failure
    pub fn is_missing_glyph(&self) -> bool {
        matches!(
            self,
            FontError::NotFound { .. } | FontError::Truncated { .. } | FontError::MalformedHeader { .. }
        )
    }
}

/// A word contained a character that does not fit in a single byte
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("character {character:?} at position {position} is not a single-byte character")]
pub struct EncodingError {
    pub character: char,
    pub position: usize,
}

/// Failure talking to the plotter
#[derive(Debug, Error)]
pub enum TransportError {
    /// No acknowledgment arrived within the configured wait
    #[error("no acknowledgment for `{command}` after {timeout:?}")]
    AcknowledgmentTimeout { command: String, timeout: Duration },

    /// The device never announced it was ready
    #[error("device did not report ready after {0:?}")]
    ReadyTimeout(Duration),

    /// The channel was closed by the other side
    #[error("channel closed")]
    ChannelClosed,

    /// An operation was attempted in the wrong protocol state
    #[error("cannot {operation} while transport is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// I/O error on the underlying device
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A failure that ends a drawing run, tagged with the word being drawn
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("stroke data missing for `{word}`: {source}")]
    GlyphNotFound {
        word: String,
        #[source]
        source: FontError,
    },

    #[error("could not allocate strokes for `{word}`: {source}")]
    AllocationFailure {
        word: String,
        #[source]
        source: FontError,
    },

    #[error("character conversion failed for `{word}`: {source}")]
    EncodingMismatch {
        word: String,
        #[source]
        source: EncodingError,
    },

    #[error("no vertical space left for `{word}` (baseline {baseline:.1}mm)")]
    VerticalSpaceExhausted { word: String, baseline: f64 },

    #[error("transport fault: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to read text: {0}")]
    TextSource(#[source] std::io::Error),
}

impl PlotError {
    pub fn from_font(word: &str, source: FontError) -> Self {
        let word = word.to_string();
        if source.is_missing_glyph() {
            PlotError::GlyphNotFound { word, source }
        } else {
            PlotError::AllocationFailure { word, source }
        }
    }
}
