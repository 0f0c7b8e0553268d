//! Process-level entry helpers and error reporting.

/// Report a failed run and exit with code 1.
///
/// Prints the error and its causes to stderr.
pub fn handle_error(error: anyhow::Error) -> ! {
    eprintln!();
    eprintln!("strokeplot failed:");
    eprintln!("{error}");
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
    eprintln!();
    eprintln!("Try running with --help for usage information.");
    std::process::exit(1);
}

/// Parse command line arguments.
pub fn get_cli_args() -> crate::core::cli::CliArgs {
    use clap::Parser;
    crate::core::cli::CliArgs::parse()
}
