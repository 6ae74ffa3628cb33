//! Platform-specific data directory paths.
//!
//!   Windows: %APPDATA%/reading-craze/data
//!   macOS:   ~/Library/Application Support/reading-craze/data
//!   Linux:   $XDG_CONFIG_HOME/reading-craze/data (default ~/.config)

use std::path::PathBuf;

/// Get the Reading Craze data directory (cross-platform).
pub fn get_data_dir() -> PathBuf {
    let base = if cfg!(target_os = "windows") {
        // %APPDATA% (typically C:\Users\<user>\AppData\Roaming)
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .or_else(dirs::config_dir)
    } else if cfg!(target_os = "macos") {
        dirs::home_dir().map(|home| home.join("Library").join("Application Support"))
    } else {
        // Linux and other Unix: respect XDG_CONFIG_HOME, default ~/.config
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
    };

    base.unwrap_or_else(|| PathBuf::from("."))
        .join("reading-craze")
        .join("data")
}
