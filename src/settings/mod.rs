//! Persisted reader settings with install-time defaults.
//!
//! One settings.json in the data directory, camelCase keys (the popup and
//! content script are JavaScript). Missing or malformed files degrade to
//! defaults; unknown fields are ignored, absent fields filled per-field.

pub mod paths;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dictionary::TooltipTheme;
use crate::style::ReadingMode;
use paths::get_data_dir;

/// Full settings key set, as saved by the popup form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReaderSettings {
    pub font: String,
    pub font_size: u32,
    pub font_color: String,
    pub bg_color: String,
    pub line_height: f32,
    pub paragraph_spacing: f32,
    pub side_margin: u32,
    pub reading_mode: ReadingMode,
    pub auto_scroll: bool,
    pub auto_scroll_speed: f64,
    pub dictionary_enabled: bool,
    pub dictionary_theme: TooltipTheme,
    pub tts_enabled: bool,
    pub tts_voice: String,
    pub tts_rate: f32,
    pub tts_pitch: f32,
    pub tts_volume: f32,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            font: "Georgia, serif".to_string(),
            font_size: 18,
            font_color: "#333333".to_string(),
            bg_color: "#F8F3E9".to_string(),
            line_height: 1.8,
            paragraph_spacing: 1.5,
            side_margin: 20,
            reading_mode: ReadingMode::Light,
            auto_scroll: false,
            auto_scroll_speed: 2.0,
            dictionary_enabled: false,
            dictionary_theme: TooltipTheme::Light,
            tts_enabled: false,
            tts_voice: "default".to_string(),
            tts_rate: 1.0,
            tts_pitch: 1.0,
            tts_volume: 1.0,
        }
    }
}

/// Path to settings.json.
pub fn settings_path() -> PathBuf {
    get_data_dir().join("settings.json")
}

/// Read settings.json, seeding it with defaults on first run. A present
/// but unreadable file degrades to defaults without overwriting it.
pub fn load_or_seed() -> ReaderSettings {
    let path = settings_path();
    if !path.exists() {
        let defaults = ReaderSettings::default();
        if let Err(e) = save(&defaults) {
            warn!("Failed to seed default settings: {}", e);
        }
        return defaults;
    }
    read_json_file(&path).unwrap_or_default()
}

/// Write settings.json, creating the data directory if needed.
pub fn save(settings: &ReaderSettings) -> anyhow::Result<()> {
    let path = settings_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(&path, json)?;
    Ok(())
}

/// Generic helper: read a JSON file and deserialize it.
fn read_json_file<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Option<T> {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(val) => Some(val),
            Err(e) => {
                warn!("Failed to parse {}: {}", path.display(), e);
                None
            }
        },
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to read {}: {}", path.display(), e);
            }
            None
        }
    }
}
