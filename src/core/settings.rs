//! Resolved settings for a drawing run
//!
//! Each value comes from the first of: CLI argument, config file, built-in
//! default.

use crate::core::cli::CliArgs;
use crate::core::config_file::ConfigFile;
use crate::font_source::FontMetrics;
use crate::geometry::DrawingArea;
use crate::transport::serial::DEFAULT_BAUD_RATE;
use crate::transport::TransportSettings;
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_FONT_PATH: &str = "SingleStrokeFont.txt";
pub const DEFAULT_FONT_SIZE: f64 = 8.0;
pub const MIN_FONT_SIZE: f64 = 4.0;
pub const MAX_FONT_SIZE: f64 = 10.0;
pub const DEFAULT_AREA_WIDTH: f64 = 100.0;
pub const DEFAULT_AREA_HEIGHT: f64 = 50.0;
/// Words ending this close to the right edge push the next word to a new line
pub const WRAP_MARGIN: f64 = 5.0;

/// Where the command stream goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// A plotter on a serial device
    Serial { port: PathBuf, baud_rate: u32 },
    /// A G-code file, or stdout for "-"
    DryRun(PathBuf),
}

/// What to do with a word whose characters are not in the font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingGlyphPolicy {
    /// End the run
    #[default]
    Abort,
    /// Leave the word out and carry on
    SkipWord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotSettings {
    pub font_path: PathBuf,
    pub font_size: f64,
    pub area: DrawingArea,
    pub wrap_margin: f64,
    pub metrics: FontMetrics,
    pub transport: TransportSettings,
    pub output: OutputTarget,
    pub missing_glyphs: MissingGlyphPolicy,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
            font_size: DEFAULT_FONT_SIZE,
            area: DrawingArea::new(DEFAULT_AREA_WIDTH, DEFAULT_AREA_HEIGHT),
            wrap_margin: WRAP_MARGIN,
            metrics: FontMetrics::default(),
            transport: TransportSettings::default(),
            output: OutputTarget::DryRun(PathBuf::from("-")),
            missing_glyphs: MissingGlyphPolicy::Abort,
        }
    }
}

/// Keep the font height within what the plotter can draw legibly
pub fn clamp_font_size(font_size: f64) -> f64 {
    let clamped = font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    if clamped != font_size {
        warn!(
            "Font height {}mm is outside {}-{}mm, using {}mm",
            font_size, MIN_FONT_SIZE, MAX_FONT_SIZE, clamped
        );
    }
    clamped
}

impl PlotSettings {
    /// Merge CLI arguments over the config file over built-in defaults
    pub fn resolve(cli: &CliArgs, config: Option<&ConfigFile>) -> Result<Self> {
        let defaults = Self::default();
        let config = config.cloned().unwrap_or_default();

        let font_path = cli
            .font
            .clone()
            .or(config.font)
            .unwrap_or(defaults.font_path);

        let font_size = clamp_font_size(
            cli.font_size
                .or(config.font_size)
                .unwrap_or(defaults.font_size),
        );

        let area = DrawingArea::new(
            cli.width.or(config.area_width).unwrap_or(defaults.area.max_width),
            cli.height
                .or(config.area_height)
                .unwrap_or(defaults.area.max_height),
        );

        let mut transport = defaults.transport;
        if let Some(settle_ms) = cli.settle_ms.or(config.settle_ms) {
            transport.settle = Duration::from_millis(settle_ms);
        }
        if let Some(ack_ms) = cli.ack_timeout_ms.or(config.ack_timeout_ms) {
            transport.ack_timeout = (ack_ms > 0).then(|| Duration::from_millis(ack_ms));
        }
        if let Some(ready_ms) = cli.ready_timeout_ms {
            transport.ready_timeout = (ready_ms > 0).then(|| Duration::from_millis(ready_ms));
        }
        if let Some(feed_rate) = config.feed_rate {
            transport.feed_rate = feed_rate;
        }

        let output = match (&cli.output, cli.port.clone().or(config.port)) {
            (Some(path), _) => OutputTarget::DryRun(path.clone()),
            (None, Some(port)) => OutputTarget::Serial {
                port,
                baud_rate: cli
                    .baud_rate
                    .or(config.baud_rate)
                    .unwrap_or(DEFAULT_BAUD_RATE),
            },
            (None, None) => bail!(
                "No plotter port given.\nUse --port <device>, set \"port\" in {:?}, or pass --output to write G-code instead.",
                ConfigFile::config_path()
            ),
        };

        let missing_glyphs = if cli.skip_missing {
            MissingGlyphPolicy::SkipWord
        } else {
            MissingGlyphPolicy::Abort
        };

        let settings = Self {
            font_path,
            font_size,
            area,
            wrap_margin: defaults.wrap_margin,
            metrics: defaults.metrics,
            transport,
            output,
            missing_glyphs,
        };
        debug!("Resolved settings: {:?}", settings);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> CliArgs {
        CliArgs {
            output: Some(PathBuf::from("-")),
            ..CliArgs::default()
        }
    }

    #[test]
    fn test_defaults_apply_without_config() {
        let settings = PlotSettings::resolve(&cli(), None).unwrap();
        assert_eq!(settings.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(settings.area, DrawingArea::new(100.0, 50.0));
        assert_eq!(settings.font_path, PathBuf::from(DEFAULT_FONT_PATH));
        assert_eq!(settings.output, OutputTarget::DryRun(PathBuf::from("-")));
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = ConfigFile {
            font_size: Some(5.0),
            area_width: Some(150.0),
            ..ConfigFile::default()
        };
        let args = CliArgs {
            font_size: Some(9.0),
            ..cli()
        };

        let settings = PlotSettings::resolve(&args, Some(&config)).unwrap();
        assert_eq!(settings.font_size, 9.0);
        assert_eq!(settings.area.max_width, 150.0);
    }

    #[test]
    fn test_font_size_is_clamped() {
        assert_eq!(clamp_font_size(2.0), MIN_FONT_SIZE);
        assert_eq!(clamp_font_size(25.0), MAX_FONT_SIZE);
        assert_eq!(clamp_font_size(6.5), 6.5);
    }

    #[test]
    fn test_port_from_config() {
        let config = ConfigFile {
            port: Some(PathBuf::from("/dev/ttyUSB1")),
            ..ConfigFile::default()
        };
        let settings = PlotSettings::resolve(&CliArgs::default(), Some(&config)).unwrap();
        assert_eq!(
            settings.output,
            OutputTarget::Serial {
                port: PathBuf::from("/dev/ttyUSB1"),
                baud_rate: DEFAULT_BAUD_RATE
            }
        );
    }

    #[test]
    fn test_missing_port_is_an_error() {
        assert!(PlotSettings::resolve(&CliArgs::default(), None).is_err());
    }

    #[test]
    fn test_zero_ack_timeout_waits_forever() {
        let args = CliArgs {
            ack_timeout_ms: Some(0),
            skip_missing: true,
            ..cli()
        };
        let settings = PlotSettings::resolve(&args, None).unwrap();
        assert_eq!(settings.transport.ack_timeout, None);
        assert_eq!(settings.missing_glyphs, MissingGlyphPolicy::SkipWord);
    }
}
