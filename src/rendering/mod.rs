//! Rendering positioned strokes into motion commands

pub mod gcode;

// Re-export commonly used items
pub use gcode::{CommandGenerator, MotionCommand, PenState};
