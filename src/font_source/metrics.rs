//! Font metrics and spacing rules
//!
//! The stroke font is drawn on a fixed nominal grid. Every physical size is
//! derived from the requested font height in millimetres.

/// Height of the font's design grid in font units
pub const NOMINAL_UNIT_HEIGHT: f64 = 18.0;
/// Gap between lines in millimetres, added to the font height
pub const LINE_GAP_MM: f64 = 5.0;
/// Space between letters of a word, as a share of the font height
pub const LETTER_SPACING_RATIO: f64 = 0.15;
/// Space between words, as a share of the font height
pub const WORD_SPACING_RATIO: f64 = 0.8;

/// Font metrics for scaling and spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub nominal_unit_height: f64,
    pub line_gap: f64,
    pub letter_spacing_ratio: f64,
    pub word_spacing_ratio: f64,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            nominal_unit_height: NOMINAL_UNIT_HEIGHT,
            line_gap: LINE_GAP_MM,
            letter_spacing_ratio: LETTER_SPACING_RATIO,
            word_spacing_ratio: WORD_SPACING_RATIO,
        }
    }
}

impl FontMetrics {
    /// Font units to millimetres for the given font height
    pub fn scale_for(&self, font_size: f64) -> f64 {
        font_size / self.nominal_unit_height
    }

    pub fn letter_spacing(&self, font_size: f64) -> f64 {
        font_size * self.letter_spacing_ratio
    }

    pub fn word_spacing(&self, font_size: f64) -> f64 {
        font_size * self.word_spacing_ratio
    }

    /// Distance the baseline drops for each new line
    pub fn line_advance(&self, font_size: f64) -> f64 {
        font_size + self.line_gap
    }
}
