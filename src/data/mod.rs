//! Working data for a drawing run

pub mod glyph_store;

pub use glyph_store::GlyphStore;
