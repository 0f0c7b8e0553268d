//! Text flow positioning for plotted words
//!
//! Moves a word's glyphs from font units into absolute device millimetres.
//!
//! LAYOUT LOGIC:
//! - Scale font units by `font_size / nominal_unit_height`
//! - If the whole word would cross the right edge, wrap to x=0 one line down
//! - If the baseline has left the drawing area, leave the word untouched
//! - Otherwise place each glyph from its own left edge and advance the cursor
//!   by the glyph width plus letter spacing

use crate::font_source::{FontMetrics, Glyph};
use crate::geometry::{horizontal_extent, horizontal_span, Cursor, DrawingArea};
use kurbo::Point;
use tracing::debug;

/// Outcome of placing one word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The word was positioned; `wrapped` is set when it started a new line
    Placed { wrapped: bool },
    /// No vertical space remains; the word's coordinates were not touched
    Exhausted,
}

impl Placement {
    pub fn is_placed(&self) -> bool {
        matches!(self, Placement::Placed { .. })
    }
}

/// Lays words out on the drawing area, threading the cursor between calls
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine {
    metrics: FontMetrics,
}

impl LayoutEngine {
    pub fn new(metrics: FontMetrics) -> Self {
        Self { metrics }
    }

    /// Scaled width of a word from the leftmost to the rightmost stroke point
    pub fn word_width(&self, glyphs: &[Glyph], font_size: f64) -> f64 {
        let points = glyphs.iter().flat_map(|glyph| glyph.strokes.iter());
        horizontal_span(points) * self.metrics.scale_for(font_size)
    }

    /// Position a word at the cursor, wrapping to a new line when it does not fit
    pub fn place_word(
        &self,
        glyphs: &mut [Glyph],
        font_size: f64,
        cursor: &mut Cursor,
        area: &DrawingArea,
    ) -> Placement {
        let scale = self.metrics.scale_for(font_size);
        let word_width = self.word_width(glyphs, font_size);

        let mut wrapped = false;
        if cursor.x + word_width > area.max_width {
            debug!(
                "Word wrap at X={:.1}mm (word width {:.1}mm)",
                cursor.x, word_width
            );
            cursor.new_line(self.metrics.line_advance(font_size));
            wrapped = true;
        }

        if !area.has_room_for(cursor.y) {
            debug!("No vertical space left at Y={:.1}mm", cursor.y);
            return Placement::Exhausted;
        }

        let letter_spacing = self.metrics.letter_spacing(font_size);
        for glyph in glyphs.iter_mut() {
            let (char_min_x, char_max_x) = horizontal_extent(&glyph.strokes).unwrap_or((0.0, 0.0));
            let char_width = (char_max_x - char_min_x) * scale;

            for stroke in glyph.strokes.iter_mut() {
                let relative_x = stroke.position.x - char_min_x;
                let relative_y = stroke.position.y;
                stroke.position = Point::new(
                    cursor.x + relative_x * scale,
                    cursor.y + relative_y * scale,
                );
            }

            cursor.x += char_width + letter_spacing;
        }

        Placement::Placed { wrapped }
    }

    /// Advance past the space that follows a word
    ///
    /// When the cursor ends up within `wrap_margin` of the right edge the next
    /// word starts on a new line. Returns whether that happened.
    pub fn advance_word_gap(
        &self,
        font_size: f64,
        cursor: &mut Cursor,
        area: &DrawingArea,
        wrap_margin: f64,
    ) -> bool {
        cursor.x += self.metrics.word_spacing(font_size);
        if cursor.x > area.max_width - wrap_margin {
            debug!("Word wrap at X={:.1}mm", cursor.x);
            cursor.new_line(self.metrics.line_advance(font_size));
            return true;
        }
        false
    }
}
