//! Per-word glyph working set
//!
//! A `GlyphStore` holds the resolved glyphs of exactly one word while it is
//! laid out and converted to commands. Dropping the store releases every
//! stroke buffer, whichever way the word's processing ends.

use crate::core::errors::FontError;
use crate::font_source::{FontTable, Glyph};
use tracing::trace;

#[derive(Debug, Default)]
pub struct GlyphStore {
    glyphs: Vec<Glyph>,
}

impl GlyphStore {
    /// Resolve every code of a word, failing on the first code that cannot be loaded
    pub fn load(font: &FontTable, codes: &[u8]) -> Result<Self, FontError> {
        let mut glyphs = Vec::with_capacity(codes.len());
        for &code in codes {
            glyphs.push(font.lookup(u32::from(code))?);
        }
        Ok(Self { glyphs })
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn glyphs_mut(&mut self) -> &mut [Glyph] {
        &mut self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Total stroke points across the word
    pub fn stroke_count(&self) -> usize {
        self.glyphs.iter().map(|glyph| glyph.strokes.len()).sum()
    }
}

impl Drop for GlyphStore {
    fn drop(&mut self) {
        if !self.glyphs.is_empty() {
            trace!(
                "Releasing {} glyphs ({} strokes)",
                self.glyphs.len(),
                self.stroke_count()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FONT: &str = "999 104 2 0 0 0 0 10 1 999 105 1 0 0 1";

    #[test]
    fn test_load_word() {
        let font = FontTable::from_source(FONT);
        let store = GlyphStore::load(&font, b"hih").unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.stroke_count(), 5);
        let codes: Vec<u32> = store.glyphs().iter().map(|g| g.code).collect();
        assert_eq!(codes, vec![104, 105, 104]);
    }

    #[test]
    fn test_load_fails_on_first_missing_code() {
        let font = FontTable::from_source(FONT);
        let error = GlyphStore::load(&font, b"hix").unwrap_err();
        assert_eq!(error, FontError::NotFound { code: 120 });
    }

    #[test]
    fn test_empty_word() {
        let font = FontTable::from_source(FONT);
        let store = GlyphStore::load(&font, b"").unwrap();
        assert!(store.is_empty());
        assert_eq!(store.stroke_count(), 0);
    }
}
