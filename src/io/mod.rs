//! Input handling
//!
//! Reading the text to draw and turning it into character codes.

pub mod text_source;

pub use text_source::{encode_word, WordReader};
