//! Single-stroke font source
//!
//! Glyph records are resolved by scanning the record stream from the start on
//! every lookup. The first header matching a code wins, so a font that
//! repeats a character always draws the earlier definition. Fonts are a few
//! hundred records, so no index is kept.

pub mod metrics;
pub mod records;

pub use metrics::FontMetrics;

use crate::core::errors::FontError;
use crate::geometry::StrokePoint;
use records::{RecordReader, GLYPH_HEADER};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, trace};

/// The strokes that draw one character
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub code: u32,
    pub strokes: Vec<StrokePoint>,
}

impl Glyph {
    pub fn new(code: u32, strokes: Vec<StrokePoint>) -> Self {
        Self { code, strokes }
    }

    /// Glyphs with no strokes are legal and draw nothing
    pub fn is_blank(&self) -> bool {
        self.strokes.is_empty()
    }
}

/// A stroke font held as its serialized record stream
#[derive(Debug, Clone)]
pub struct FontTable {
    source: String,
}

impl FontTable {
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        debug!("Loaded stroke font from {:?} ({} bytes)", path, source.len());
        Ok(Self::from_source(source))
    }

    /// Resolve a character code to its glyph
    pub fn lookup(&self, code: u32) -> Result<Glyph, FontError> {
        let mut records = RecordReader::new(&self.source);

        while let Some([tag, found_code, count]) = records.next_triple() {
            if tag != GLYPH_HEADER || found_code != i64::from(code) {
                continue;
            }

            let moves = usize::try_from(count)
                .map_err(|_| FontError::MalformedHeader { code, count })?;

            let mut strokes = Vec::new();
            strokes
                .try_reserve_exact(moves)
                .map_err(|_| FontError::Allocation { code, moves })?;

            for found in 0..moves {
                let Some([x, y, pen]) = records.next_triple() else {
                    return Err(FontError::Truncated {
                        code,
                        expected: moves,
                        found,
                    });
                };
                strokes.push(StrokePoint::new(x as f64, y as f64, pen != 0));
            }

            trace!("Resolved character code {} with {} moves", code, moves);
            return Ok(Glyph::new(code, strokes));
        }

        Err(FontError::NotFound { code })
    }

    /// Character codes with a glyph header, in file order
    pub fn codes(&self) -> Vec<u32> {
        let mut codes = Vec::new();
        let mut records = RecordReader::new(&self.source);
        while let Some([tag, code, count]) = records.next_triple() {
            if tag != GLYPH_HEADER {
                continue;
            }
            if let Ok(code) = u32::try_from(code) {
                if !codes.contains(&code) {
                    codes.push(code);
                }
            }
            // Skip the stroke block so its triples are not read as headers
            for _ in 0..count.max(0) {
                if records.next_triple().is_none() {
                    return codes;
                }
            }
        }
        codes
    }
}
