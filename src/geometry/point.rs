//! Stroke points and the layout cursor
//!
//! A glyph is drawn by visiting its stroke points in order. Each point says
//! where the pen goes next and whether it touches the paper on the way.

use kurbo::Point;

/// One waypoint of a glyph's pen path
///
/// Coordinates are in font units when loaded and in device millimetres once
/// the word has been laid out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePoint {
    pub position: Point, // Font units before layout, millimetres after
    pub pen_down: bool,  // Whether the pen draws while moving here
}

impl StrokePoint {
    pub fn new(x: f64, y: f64, pen_down: bool) -> Self {
        Self {
            position: Point::new(x, y),
            pen_down,
        }
    }
}

/// Where the next word starts, in millimetres
///
/// Starts at the origin for each run. X grows to the right; Y only ever
/// decreases as lines advance down the page.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cursor {
    pub x: f64,
    pub y: f64,
}

impl Cursor {
    pub fn origin() -> Self {
        Self::default()
    }

    /// Return to column 0 and drop down one line
    pub fn new_line(&mut self, line_advance: f64) {
        self.x = 0.0;
        self.y -= line_advance;
    }
}

/// The bounded physical surface text is drawn on, in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingArea {
    pub max_width: f64,
    pub max_height: f64,
}

impl DrawingArea {
    pub fn new(max_width: f64, max_height: f64) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    /// Whether a baseline at `y` is still within the vertical bound
    pub fn has_room_for(&self, y: f64) -> bool {
        y.abs() <= self.max_height
    }
}
