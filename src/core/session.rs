//! A single drawing run
//!
//! Owns the state that lives for the whole run (the layout cursor, the pen
//! state and the open transport) and draws words one at a time. The glyphs of
//! a word are released when the word is finished, whether it was drawn,
//! skipped or failed.

use crate::core::errors::PlotError;
use crate::core::settings::{MissingGlyphPolicy, PlotSettings};
use crate::data::GlyphStore;
use crate::font_source::FontTable;
use crate::geometry::{Cursor, DrawingArea};
use crate::io::encode_word;
use crate::rendering::gcode::CommandGenerator;
use crate::systems::text_flow::{LayoutEngine, Placement};
use crate::transport::{Channel, Transport};
use std::io;
use tracing::{debug, info, warn};

/// What happened to one word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordOutcome {
    Drawn { commands: usize },
    Skipped,
}

/// Totals reported at the end of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub words_drawn: usize,
    pub words_skipped: usize,
    pub commands_sent: usize,
    pub cursor: Cursor,
}

pub struct PlotSession<'a, C: Channel> {
    font: &'a FontTable,
    layout: LayoutEngine,
    generator: CommandGenerator,
    transport: Transport<C>,
    cursor: Cursor,
    font_size: f64,
    area: DrawingArea,
    wrap_margin: f64,
    missing_glyphs: MissingGlyphPolicy,
    words_drawn: usize,
    words_skipped: usize,
}

impl<'a, C: Channel> PlotSession<'a, C> {
    /// Start a run on an already initialized transport
    pub fn new(font: &'a FontTable, settings: &PlotSettings, transport: Transport<C>) -> Self {
        Self {
            font,
            layout: LayoutEngine::new(settings.metrics),
            generator: CommandGenerator::new(),
            transport,
            cursor: Cursor::origin(),
            font_size: settings.font_size,
            area: settings.area,
            wrap_margin: settings.wrap_margin,
            missing_glyphs: settings.missing_glyphs,
            words_drawn: 0,
            words_skipped: 0,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Look up, lay out and plot one word
    pub fn draw_word(&mut self, word: &str) -> Result<WordOutcome, PlotError> {
        let codes = encode_word(word).map_err(|source| PlotError::EncodingMismatch {
            word: word.to_string(),
            source,
        })?;

        let mut store = match GlyphStore::load(self.font, &codes) {
            Ok(store) => store,
            Err(source) => {
                let error = PlotError::from_font(word, source);
                if self.missing_glyphs == MissingGlyphPolicy::SkipWord
                    && matches!(error, PlotError::GlyphNotFound { .. })
                {
                    warn!("Skipping word: {}", error);
                    self.words_skipped += 1;
                    return Ok(WordOutcome::Skipped);
                }
                return Err(error);
            }
        };

        let placement = self.layout.place_word(
            store.glyphs_mut(),
            self.font_size,
            &mut self.cursor,
            &self.area,
        );
        if placement == Placement::Exhausted {
            return Err(PlotError::VerticalSpaceExhausted {
                word: word.to_string(),
                baseline: self.cursor.y,
            });
        }

        let commands = self.generator.emit(store.glyphs());
        self.transport.send_all(&commands)?;

        if self
            .layout
            .advance_word_gap(self.font_size, &mut self.cursor, &self.area, self.wrap_margin)
        {
            debug!("Next word starts a new line at Y={:.1}mm", self.cursor.y);
        }

        self.words_drawn += 1;
        Ok(WordOutcome::Drawn {
            commands: commands.len(),
        })
    }

    /// Draw every word, then lift the pen and close the transport
    ///
    /// The first failure ends the run. The transport is closed either way.
    pub fn run<I>(mut self, words: I) -> Result<RunSummary, PlotError>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        let drawn = self.draw_all(words);
        let closed = self.transport.close();

        let summary = RunSummary {
            words_drawn: self.words_drawn,
            words_skipped: self.words_skipped,
            commands_sent: self.transport.commands_sent(),
            cursor: self.cursor,
        };
        info!(
            "Drew {} words | Final position: X={:.1} Y={:.1}",
            summary.words_drawn, summary.cursor.x, summary.cursor.y
        );

        drawn?;
        closed?;
        Ok(summary)
    }

    fn draw_all<I>(&mut self, words: I) -> Result<(), PlotError>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        for word in words {
            let word = word.map_err(PlotError::TextSource)?;
            self.draw_word(&word)?;
        }
        Ok(())
    }
}
