//! User configuration file handling
//!
//! Manages settings from ~/.config/strokeplot/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// User configuration from ~/.config/strokeplot/settings.json
///
/// These settings override built-in defaults but are overridden by CLI arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConfigFile {
    /// Stroke font to draw with
    pub font: Option<PathBuf>,
    /// Serial device the plotter is attached to (e.g. "/dev/ttyUSB0")
    pub port: Option<PathBuf>,
    pub baud_rate: Option<u32>,
    /// Font height in millimetres
    pub font_size: Option<f64>,
    /// Drawing area width in millimetres
    pub area_width: Option<f64>,
    /// Drawing area height in millimetres
    pub area_height: Option<f64>,
    /// Pause after each acknowledged command
    pub settle_ms: Option<u64>,
    /// Longest wait for an acknowledgment; 0 waits forever
    pub ack_timeout_ms: Option<u64>,
    /// Feed rate for the homing move, in mm/min
    pub feed_rate: Option<u32>,
}

impl ConfigFile {
    /// Get the path to the strokeplot config directory
    pub fn config_dir() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
        config_dir.join("strokeplot")
    }

    /// Get the path to the user config file
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Load configuration from the user config file
    pub fn load() -> Option<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, `None` if missing or unreadable
    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    debug!("Loaded user settings from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to parse {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read {:?}: {}", path, e);
                None
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Starting values written by `--new-config`
    pub fn example() -> Self {
        use crate::core::settings;

        Self {
            font: Some(PathBuf::from(settings::DEFAULT_FONT_PATH)),
            port: None,
            baud_rate: Some(crate::transport::serial::DEFAULT_BAUD_RATE),
            font_size: Some(settings::DEFAULT_FONT_SIZE),
            area_width: Some(settings::DEFAULT_AREA_WIDTH),
            area_height: Some(settings::DEFAULT_AREA_HEIGHT),
            settle_ms: Some(100),
            ack_timeout_ms: Some(30_000),
            feed_rate: Some(crate::rendering::gcode::DEFAULT_FEED_RATE),
        }
    }

    /// Initialize the user configuration directory
    ///
    /// This creates:
    /// 1. The ~/.config/strokeplot directory with a logs/ subdirectory
    /// 2. A settings.json file with default values
    pub fn initialize_config_directory() -> anyhow::Result<()> {
        let config_dir = Self::config_dir();

        fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {:?}", config_dir);

        let logs_dir = config_dir.join("logs");
        fs::create_dir_all(&logs_dir)?;
        println!("Created logs directory: {:?}", logs_dir);

        let settings_path = Self::config_path();
        if !settings_path.exists() {
            Self::example().save_to(&settings_path)?;
            println!("Created settings file: {:?}", settings_path);
        } else {
            println!("Settings file already exists: {:?}", settings_path);
        }

        println!("\nConfiguration initialized successfully!");
        println!("Set \"port\" in {:?} to your plotter's serial device.", settings_path);

        Ok(())
    }
}
