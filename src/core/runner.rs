//! Application runner logic
//!
//! Resolves settings, opens the font, the text and the plotter, and hands
//! them to a drawing session.

use crate::core::cli::CliArgs;
use crate::core::config_file::ConfigFile;
use crate::core::session::PlotSession;
use crate::core::settings::{OutputTarget, PlotSettings};
use crate::font_source::FontTable;
use crate::io::WordReader;
use crate::logging;
use crate::transport::{Channel, DryRunChannel, SerialChannel, Transport};
use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Create and run the application with the given CLI arguments.
/// Handles special CLI flags and delegates to the drawing session.
pub fn run_app(cli_args: CliArgs) -> Result<()> {
    // Handle --new-config flag specially
    if cli_args.new_config {
        return ConfigFile::initialize_config_directory()
            .context("Failed to initialize config directory");
    }

    let _log_guard = logging::init(cli_args.verbose, cli_args.log_file)?;

    cli_args
        .validate()
        .map_err(|e| anyhow!("CLI validation failed: {}", e))?;

    let config = ConfigFile::load();
    let settings = PlotSettings::resolve(&cli_args, config.as_ref())?;

    let font = FontTable::load(&settings.font_path)
        .with_context(|| format!("Could not open font file {:?}", settings.font_path))?;
    debug!("Font defines {} characters", font.codes().len());

    let text = File::open(&cli_args.text)
        .with_context(|| format!("Could not open text file {:?}", cli_args.text))?;
    let words = WordReader::new(BufReader::new(text));

    info!(
        "Font height: {:.1}mm | Letter spacing: {:.1}mm | Word spacing: {:.1}mm",
        settings.font_size,
        settings.metrics.letter_spacing(settings.font_size),
        settings.metrics.word_spacing(settings.font_size)
    );

    let channel = open_channel(&settings.output)?;
    let transport =
        Transport::open(channel, settings.transport).context("Could not start the plotter")?;

    let summary = PlotSession::new(&font, &settings, transport).run(words)?;
    if summary.words_skipped > 0 {
        info!("Skipped {} words", summary.words_skipped);
    }
    Ok(())
}

/// Open the channel the command stream is written to
fn open_channel(target: &OutputTarget) -> Result<Box<dyn Channel>> {
    let channel: Box<dyn Channel> = match target {
        OutputTarget::Serial { port, baud_rate } => Box::new(
            SerialChannel::open(port, *baud_rate)
                .with_context(|| format!("Unable to open serial port {:?}", port))?,
        ),
        OutputTarget::DryRun(path) if path.as_path() == Path::new("-") => {
            Box::new(DryRunChannel::new(io::stdout()))
        }
        OutputTarget::DryRun(path) => Box::new(
            DryRunChannel::create(path)
                .with_context(|| format!("Unable to create output file {:?}", path))?,
        ),
    };
    Ok(channel)
}
