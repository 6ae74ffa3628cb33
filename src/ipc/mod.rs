//! IPC protocol types for communication with the browser host.
//!
//! Events use `{"event": "<name>", ...}` format (browser -> core).
//! Commands use `{"command": "<name>", "data": {...}}` format (core -> browser).

pub mod bridge;

use serde::{Deserialize, Serialize};

use crate::dictionary::{TooltipBody, TooltipTheme};
use crate::settings::ReaderSettings;
use crate::style::InlineTextStyle;

// ---------------------------------------------------------------------------
// Geometry and page-snapshot carriers
// ---------------------------------------------------------------------------

/// Axis-aligned box in page-absolute CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Scroll position and window dimensions, reported by the content script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    #[serde(default)]
    pub scroll_y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    /// Full document height, used for reading-progress percent.
    #[serde(default)]
    pub scroll_height: f64,
}

/// One rendered text block from the page snapshot.
///
/// `id` is an opaque element handle assigned by the content script; commands
/// that target an element (highlight, scroll) echo it back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    pub id: u64,
    pub tag: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub parent_tag: String,
    #[serde(default)]
    pub parent_classes: Vec<String>,
    #[serde(default)]
    pub text: String,
    /// Length of the block's raw markup (innerHTML), for the text:markup
    /// ratio heuristic.
    #[serde(default)]
    pub markup_len: usize,
    #[serde(default)]
    pub rect: Rect,
}

/// One platform speech-synthesis voice, as announced by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceInfo {
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub lang: String,
    #[serde(default, rename = "default")]
    pub is_default: bool,
}

/// Floating-widget buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlButton {
    PlayPause,
    Stop,
    Next,
    Prev,
}

// ---------------------------------------------------------------------------
// Events: browser -> core (stdin)
// ---------------------------------------------------------------------------

/// All events received from the browser host via stdin as JSON lines.
///
/// Deserialized from `{"event": "<variant>", ...}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event")]
#[serde(rename_all = "snake_case")]
pub enum HostEvent {
    /// Content script injected and ready.
    PageLoaded {
        url: String,
        #[serde(default)]
        speech_supported: bool,
        #[serde(default)]
        viewport: Viewport,
    },
    /// Full text-block snapshot; sent after load and whenever page content
    /// materially changes.
    Snapshot {
        #[serde(default)]
        blocks: Vec<RawBlock>,
        #[serde(default)]
        viewport: Viewport,
    },
    /// Scroll or resize.
    ViewportChanged { viewport: Viewport },
    /// Floating-widget button press.
    Control { button: ControlButton },
    /// Platform voice list (re)announced; may arrive any number of times.
    Voices {
        #[serde(default)]
        voices: Vec<VoiceInfo>,
    },
    /// The platform speech engine finished the utterance with this id.
    UtteranceEnded { id: u64 },
    /// The platform speech engine failed the utterance with this id.
    UtteranceErrored {
        id: u64,
        #[serde(default)]
        message: String,
    },
    /// Popup Save: full settings replacement.
    ApplySettings { settings: ReaderSettings },
    /// TTS-only settings delta; absent fields keep their previous values.
    UpdateTts {
        enabled: bool,
        #[serde(default)]
        voice: Option<String>,
        #[serde(default)]
        rate: Option<f32>,
        #[serde(default)]
        pitch: Option<f32>,
        #[serde(default)]
        volume: Option<f32>,
    },
    /// Dictionary-only settings delta.
    UpdateDictionary {
        enabled: bool,
        #[serde(default)]
        theme: Option<TooltipTheme>,
    },
    /// Pointer dwelled on a word (dictionary lookup).
    WordHovered { word: String, x: f64, y: f64 },
    /// Popup reset-all-progress action.
    ResetProgress {},
    Ping {},
    Stop {},
}

// ---------------------------------------------------------------------------
// Commands: core -> browser (stdout)
// ---------------------------------------------------------------------------

/// All commands emitted to the browser host via stdout as JSON lines.
///
/// Serialized as `{"command": "<variant>", "data": {...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum HostCommand {
    Starting {},
    Ready {},
    Stopping {},
    Pong {},
    Error { message: String },

    // Restyling
    InjectStyles { css: String },
    ApplyInlineStyles { rules: InlineTextStyle },
    ProgressBar { percent: f64 },
    RestorePosition { scroll_y: f64 },
    ScrollBy { amount: f64 },

    // TTS page side
    MountControls {},
    RemoveControls {},
    PlayIcon { playing: bool },
    Highlight { block: u64 },
    ClearHighlight {},
    ScrollToBlock { block: u64 },

    // Platform speech engine
    Speak {
        id: u64,
        text: String,
        rate: f32,
        pitch: f32,
        volume: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        voice: Option<String>,
    },
    PauseSpeech {},
    ResumeSpeech {},
    CancelSpeech {},
    QueryVoices {},

    // Dictionary tooltip
    ShowTooltip {
        x: f64,
        y: f64,
        theme: TooltipTheme,
        body: TooltipBody,
    },
    HideTooltip {},
}
