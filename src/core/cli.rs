//! Command line interface for strokeplot
//!
//! Handles parsing command line arguments and provides
//! validation for user inputs.

use clap::Parser;
use std::path::PathBuf;

/// strokeplot CLI arguments
///
/// Examples:
///   strokeplot notes.txt --port /dev/ttyUSB0          # Draw on a plotter
///   strokeplot notes.txt --port /dev/ttyUSB0 -s 6     # 6 mm high letters
///   strokeplot notes.txt --output notes.gcode         # Write G-code instead
///   strokeplot notes.txt --output -                   # Print G-code
///   strokeplot --new-config                           # Create settings.json
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "strokeplot",
    version,
    about = "Draw text on a pen plotter with a single-stroke font",
    long_about = "strokeplot reads plain text, lays it out on the drawing area with word and line wrapping, and streams the resulting G-code to a Grbl-style pen plotter one acknowledged command at a time."
)]
pub struct CliArgs {
    /// Text file to draw
    #[clap(default_value = "InputText.txt")]
    pub text: PathBuf,

    /// Stroke font data file
    #[clap(
        long = "font",
        short = 'f',
        help = "Stroke font data file",
        long_help = "Stroke font data file made of integer triples. A `999 <code> <moves>` header is followed by <moves> `x y pen` records. Defaults to the config file setting or SingleStrokeFont.txt."
    )]
    pub font: Option<PathBuf>,

    /// Font height in millimetres, clamped to 4-10
    #[clap(long = "size", short = 's', help = "Font height in mm (4-10)")]
    pub font_size: Option<f64>,

    /// Drawing area width in millimetres
    #[clap(long = "width", help = "Drawing area width in mm")]
    pub width: Option<f64>,

    /// Drawing area height in millimetres
    #[clap(long = "height", help = "Drawing area height in mm")]
    pub height: Option<f64>,

    /// Serial device of the plotter
    #[clap(
        long = "port",
        short = 'p',
        help = "Serial device of the plotter",
        long_help = "Serial device the plotter is attached to, for example /dev/ttyUSB0. Ignored when --output is given."
    )]
    pub port: Option<PathBuf>,

    /// Serial baud rate
    #[clap(long = "baud", help = "Serial baud rate (default 115200)")]
    pub baud_rate: Option<u32>,

    /// Write the command stream to a file instead of a plotter
    #[clap(
        long = "output",
        short = 'o',
        help = "Write G-code to a file ('-' for stdout) instead of plotting",
        long_help = "Run without hardware: every command is written to this file (or stdout for '-') and acknowledged immediately."
    )]
    pub output: Option<PathBuf>,

    /// Pause after each acknowledged command, in milliseconds
    #[clap(long = "settle-ms", help = "Pause after each command in ms (default 100)")]
    pub settle_ms: Option<u64>,

    /// Longest wait for an acknowledgment, in milliseconds
    #[clap(
        long = "ack-timeout-ms",
        help = "Acknowledgment timeout in ms, 0 waits forever (default 30000)"
    )]
    pub ack_timeout_ms: Option<u64>,

    /// Longest wait for the plotter to report ready, in milliseconds
    #[clap(long = "ready-timeout-ms", help = "Ready timeout in ms (default: wait forever)")]
    pub ready_timeout_ms: Option<u64>,

    /// Skip words with characters missing from the font
    #[clap(
        long = "skip-missing",
        help = "Skip words with characters missing from the font",
        long_help = "By default a character missing from the font ends the run. With this flag the word is skipped with a warning and drawing continues."
    )]
    pub skip_missing: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to the config directory
    #[clap(
        long = "log-file",
        help = "Also write logs to ~/.config/strokeplot/logs/"
    )]
    pub log_file: bool,

    /// Initialize user configuration directory with default settings
    #[clap(
        long = "new-config",
        help = "Initialize user config directory with settings",
        long_help = "Initialize the ~/.config/strokeplot directory with a settings.json file holding the default font, drawing area and timing values."
    )]
    pub new_config: bool,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    pub fn validate(&self) -> Result<(), String> {
        if self.new_config {
            return Ok(());
        }

        if !self.text.is_file() {
            return Err(format!(
                "Text file does not exist: {}\nMake sure the path is correct and the file exists.",
                self.text.display()
            ));
        }

        if let Some(font) = &self.font {
            if !font.is_file() {
                return Err(format!("Font file does not exist: {}", font.display()));
            }
        }

        let dimensions = [
            ("--size", self.font_size),
            ("--width", self.width),
            ("--height", self.height),
        ];
        for (flag, value) in dimensions {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(format!("{flag} must be a positive number of millimetres, got {value}"));
                }
            }
        }

        if self.baud_rate == Some(0) {
            return Err("--baud must be greater than zero".to_string());
        }

        Ok(())
    }
}
