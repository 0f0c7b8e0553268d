//! G-code generation for positioned strokes
//!
//! Every stroke point becomes one linear move. Pen lift and drop commands are
//! only emitted where the pen state changes.

use crate::font_source::Glyph;
use kurbo::Point;
use std::fmt;

/// Feed rate sent with the homing move, in mm/min
pub const DEFAULT_FEED_RATE: u32 = 1000;
/// Spindle power that lowers the pen
pub const PEN_DOWN_POWER: u32 = 1000;

/// One line of the motion protocol
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionCommand {
    /// Drawing move to the origin that also sets the feed rate
    Home { feed_rate: u32 },
    /// Enable the pen (spindle) module
    EnablePen,
    PenUp,
    PenDown,
    /// Non-drawing linear move
    Travel(Point),
    /// Drawing linear move
    Draw(Point),
}

impl MotionCommand {
    /// The command as sent on the wire, including its line terminator
    pub fn to_line(&self) -> String {
        format!("{self}\n")
    }

    pub fn is_pen_change(&self) -> bool {
        matches!(self, MotionCommand::PenUp | MotionCommand::PenDown)
    }
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionCommand::Home { feed_rate } => write!(f, "G1 X0 Y0 F{feed_rate}"),
            MotionCommand::EnablePen => write!(f, "M3"),
            MotionCommand::PenUp => write!(f, "S0"),
            MotionCommand::PenDown => write!(f, "S{PEN_DOWN_POWER}"),
            // The controller resolves exactly three decimal places
            MotionCommand::Travel(p) => write!(f, "G0 X{:.3} Y{:.3}", p.x, p.y),
            MotionCommand::Draw(p) => write!(f, "G1 X{:.3} Y{:.3}", p.x, p.y),
        }
    }
}

/// Whether the pen is touching the paper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PenState {
    pub down: bool,
}

impl PenState {
    pub fn up() -> Self {
        Self { down: false }
    }
}

/// Converts positioned glyphs into motion commands
///
/// The pen state lives for the whole run, so a generator must be reused
/// across words rather than created per word.
#[derive(Debug, Default)]
pub struct CommandGenerator {
    pen: PenState,
}

impl CommandGenerator {
    /// Generator for a stream whose pen starts lifted
    pub fn new() -> Self {
        Self::with_pen(PenState::up())
    }

    pub fn with_pen(pen: PenState) -> Self {
        Self { pen }
    }

    pub fn pen(&self) -> PenState {
        self.pen
    }

    /// Commands that draw `glyphs` in order, ending with the pen lifted
    pub fn emit(&mut self, glyphs: &[Glyph]) -> Vec<MotionCommand> {
        let mut commands = Vec::new();

        for stroke in glyphs.iter().flat_map(|glyph| glyph.strokes.iter()) {
            if stroke.pen_down != self.pen.down {
                commands.push(if stroke.pen_down {
                    MotionCommand::PenDown
                } else {
                    MotionCommand::PenUp
                });
                self.pen.down = stroke.pen_down;
            }

            commands.push(if self.pen.down {
                MotionCommand::Draw(stroke.position)
            } else {
                MotionCommand::Travel(stroke.position)
            });
        }

        if self.pen.down {
            commands.push(MotionCommand::PenUp);
            self.pen.down = false;
        }

        commands
    }
}
