//! Core application functionality
//!
//! This module contains the core application logic, including:
//! - CLI handling, user configuration and resolved settings
//! - Error types shared across the crate
//! - The drawing session that ties font, layout and transport together

pub mod cli;
pub mod config_file;
pub mod errors;
pub mod platform;
pub mod runner;
pub mod session;
pub mod settings;

// Re-export commonly used items
pub use cli::CliArgs;
pub use config_file::ConfigFile;
pub use errors::{EncodingError, FontError, PlotError, TransportError};
pub use runner::run_app;
pub use session::{PlotSession, RunSummary, WordOutcome};
pub use settings::{MissingGlyphPolicy, OutputTarget, PlotSettings};
