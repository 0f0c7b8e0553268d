//! Layout systems
//!
//! Positioning of words and glyphs on the drawing area.

pub mod text_flow;

// Re-export commonly used items
pub use text_flow::{LayoutEngine, Placement};
