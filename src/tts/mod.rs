//! Text-to-speech playback core.
//!
//! The platform speech engine and the page surface (highlight, scrolling,
//! control widget) live browser-side; this module drives them through the
//! `SpeechEngine` and `PageView` seams. `PlaybackSession` owns the state
//! machine, `VoiceRegistry` the platform voice catalog, and the locator
//! turns page snapshots into the paragraph sequence.

pub mod controls;
pub mod locator;
pub mod session;
pub mod voices;

use crate::ipc::bridge::emit;
use crate::ipc::HostCommand;
use crate::settings::ReaderSettings;

/// Sentinel voice preference meaning "use the platform default".
pub const DEFAULT_VOICE: &str = "default";

/// Read-only snapshot of the TTS settings, refreshed on explicit update
/// events.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    pub enabled: bool,
    pub voice_id: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl PlaybackConfig {
    pub fn from_settings(settings: &ReaderSettings) -> Self {
        Self {
            enabled: settings.tts_enabled,
            voice_id: settings.tts_voice.clone(),
            rate: settings.tts_rate,
            pitch: settings.tts_pitch,
            volume: settings.tts_volume,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            voice_id: DEFAULT_VOICE.to_string(),
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// One unit of synthesized speech: a paragraph's text plus the prosody
/// settings in effect when it was constructed. No clamping is applied; the
/// platform owns range enforcement.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: u64,
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Resolved voice name; `None` means the platform default.
    pub voice: Option<String>,
}

/// Platform speech engine seam. One utterance outstanding at a time;
/// submitting implicitly replaces any prior platform-side state.
pub trait SpeechEngine {
    fn submit(&mut self, utterance: &Utterance);
    /// Suspend the active utterance without cancelling it.
    fn pause(&mut self);
    /// Resume a suspended utterance.
    fn resume(&mut self);
    /// Cancel the active utterance, if any.
    fn cancel(&mut self);
    /// Ask the platform to (re)announce its voice list.
    fn request_voices(&mut self);
}

/// Page surface seam: highlight, scrolling, and the floating controls.
pub trait PageView {
    fn highlight(&mut self, block: u64);
    fn clear_highlight(&mut self);
    /// Smooth, centered scroll bringing a block into view.
    fn scroll_to_block(&mut self, block: u64);
    fn mount_controls(&mut self);
    fn remove_controls(&mut self);
    fn set_play_icon(&mut self, playing: bool);
}

/// Production `SpeechEngine`: forwards to the browser's speech synthesis
/// over IPC.
#[derive(Debug, Default)]
pub struct HostSpeech;

impl SpeechEngine for HostSpeech {
    fn submit(&mut self, utterance: &Utterance) {
        emit(&HostCommand::Speak {
            id: utterance.id,
            text: utterance.text.clone(),
            rate: utterance.rate,
            pitch: utterance.pitch,
            volume: utterance.volume,
            voice: utterance.voice.clone(),
        });
    }

    fn pause(&mut self) {
        emit(&HostCommand::PauseSpeech {});
    }

    fn resume(&mut self) {
        emit(&HostCommand::ResumeSpeech {});
    }

    fn cancel(&mut self) {
        emit(&HostCommand::CancelSpeech {});
    }

    fn request_voices(&mut self) {
        emit(&HostCommand::QueryVoices {});
    }
}

/// Production `PageView`: forwards to the content script over IPC.
#[derive(Debug, Default)]
pub struct HostPage;

impl PageView for HostPage {
    fn highlight(&mut self, block: u64) {
        emit(&HostCommand::Highlight { block });
    }

    fn clear_highlight(&mut self) {
        emit(&HostCommand::ClearHighlight {});
    }

    fn scroll_to_block(&mut self, block: u64) {
        emit(&HostCommand::ScrollToBlock { block });
    }

    fn mount_controls(&mut self) {
        emit(&HostCommand::MountControls {});
    }

    fn remove_controls(&mut self) {
        emit(&HostCommand::RemoveControls {});
    }

    fn set_play_icon(&mut self, playing: bool) {
        emit(&HostCommand::PlayIcon { playing });
    }
}
