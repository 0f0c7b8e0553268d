//! Geometric Primitives and Operations

pub mod point;
pub mod utilities;

// Re-export commonly used items
pub use point::{Cursor, DrawingArea, StrokePoint};
pub use utilities::{horizontal_extent, horizontal_span, stroke_bounds};
