//! Draws plain text on a pen plotter with a single-stroke font.

use anyhow::Result;
use strokeplot::core;

/// Run the application with the given CLI arguments.
fn run_app(cli_args: core::cli::CliArgs) -> Result<()> {
    core::runner::run_app(cli_args)
}

fn main() {
    let cli_args = core::platform::get_cli_args();
    if let Err(error) = run_app(cli_args) {
        core::platform::handle_error(error);
    }
}
