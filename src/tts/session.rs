//! Playback state machine.
//!
//! Owns the playback state, the current paragraph index, and the paragraph
//! sequence; orchestrates utterance submission, highlight application and
//! removal, viewport scrolling, and advancement on completion. Every
//! transition, including the speech engine's asynchronous completion and
//! error callbacks, is delivered through `handle`, so the transition logic
//! lives in one place.
//!
//! Stop cancels audio and clears the highlight but leaves the index and
//! the paragraph sequence alone: a following Play resumes at the same
//! spot. Only cycling the feature off and on, or reading past the last
//! paragraph, forgets the position.

use tracing::{debug, error, info};

use crate::ipc::{ControlButton, RawBlock, Rect, Viewport, VoiceInfo};

use super::controls::ControlSurface;
use super::locator::{self, ParagraphHandle};
use super::voices::VoiceRegistry;
use super::{PageView, PlaybackConfig, SpeechEngine, Utterance};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Playing => write!(f, "playing"),
            Self::Paused => write!(f, "paused"),
        }
    }
}

/// Everything that can drive a transition.
#[derive(Debug)]
pub enum PlaybackEvent {
    Play,
    Pause,
    Stop,
    Next,
    Prev,
    UtteranceEnded { id: u64 },
    UtteranceErrored { id: u64, message: String },
    ConfigChanged { config: PlaybackConfig },
}

/// One playback session per page context. All mutable playback state lives
/// here; there are no ambient globals.
pub struct PlaybackSession {
    engine: Box<dyn SpeechEngine>,
    page: Box<dyn PageView>,
    config: PlaybackConfig,
    speech_supported: bool,
    state: PlaybackState,
    /// Current paragraph index; `None` until Play picks a starting point.
    current: Option<usize>,
    paragraphs: Vec<ParagraphHandle>,
    /// Latest page snapshot, scanned lazily when the sequence is empty.
    blocks: Vec<RawBlock>,
    viewport: Viewport,
    voices: VoiceRegistry,
    controls: ControlSurface,
    /// Id of the utterance the platform is currently working on. Terminal
    /// events for any other id are stale and dropped.
    active: Option<u64>,
    next_utterance_id: u64,
}

impl PlaybackSession {
    pub fn new(
        engine: Box<dyn SpeechEngine>,
        page: Box<dyn PageView>,
        config: PlaybackConfig,
    ) -> Self {
        Self {
            engine,
            page,
            config,
            speech_supported: false,
            state: PlaybackState::Stopped,
            current: None,
            paragraphs: Vec::new(),
            blocks: Vec::new(),
            viewport: Viewport::default(),
            voices: VoiceRegistry::default(),
            controls: ControlSurface::default(),
            active: None,
            next_utterance_id: 1,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Content script is up. If the platform has no speech synthesis the
    /// feature silently never activates.
    pub fn on_page_ready(&mut self, speech_supported: bool) {
        self.speech_supported = speech_supported;
        if !speech_supported {
            debug!("speech synthesis unsupported, tts stays inactive");
            return;
        }
        if self.feature_active() {
            self.engine.request_voices();
            self.controls.mount(&mut *self.page);
            self.paragraphs = locator::locate(&self.blocks);
        }
    }

    /// Cache a fresh page snapshot. Active playback keeps its current
    /// sequence; the new blocks are scanned the next time Play starts with
    /// an empty sequence.
    pub fn set_snapshot(&mut self, blocks: Vec<RawBlock>, viewport: Viewport) {
        self.blocks = blocks;
        self.viewport = viewport;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Rebuild the voice catalog. The in-flight utterance is unaffected;
    /// the new catalog applies from the next-spoken paragraph.
    pub fn refresh_voices(&mut self, voices: Vec<VoiceInfo>) {
        self.voices.refresh(voices);
    }

    /// Map a control-widget press onto a transition event.
    pub fn on_control(&mut self, button: ControlButton) {
        let event = match button {
            ControlButton::PlayPause => match self.state {
                PlaybackState::Playing => PlaybackEvent::Pause,
                _ => PlaybackEvent::Play,
            },
            ControlButton::Stop => PlaybackEvent::Stop,
            ControlButton::Next => PlaybackEvent::Next,
            ControlButton::Prev => PlaybackEvent::Prev,
        };
        self.handle(event);
    }

    /// The transition function. All playback behavior routes through here.
    pub fn handle(&mut self, event: PlaybackEvent) {
        let active = self.feature_active();
        match event {
            PlaybackEvent::ConfigChanged { config } => self.apply_config(config),
            _ if !active => debug!("tts inactive, ignoring playback event"),
            PlaybackEvent::Play => match self.state {
                PlaybackState::Stopped => self.start(),
                PlaybackState::Paused => self.resume(),
                PlaybackState::Playing => {}
            },
            PlaybackEvent::Pause => match self.state {
                PlaybackState::Playing => self.pause(),
                // Toggle semantics: pausing while paused resumes.
                PlaybackState::Paused => self.resume(),
                PlaybackState::Stopped => {}
            },
            PlaybackEvent::Stop => {
                if self.state != PlaybackState::Stopped {
                    self.stop_playback();
                }
            }
            PlaybackEvent::Next => self.step(1),
            PlaybackEvent::Prev => self.step(-1),
            PlaybackEvent::UtteranceEnded { id } => self.on_utterance_ended(id),
            PlaybackEvent::UtteranceErrored { id, message } => {
                self.on_utterance_errored(id, &message)
            }
        }
    }

    fn feature_active(&self) -> bool {
        self.config.enabled && self.speech_supported
    }

    fn start(&mut self) {
        if self.paragraphs.is_empty() {
            self.paragraphs = locator::locate(&self.blocks);
            if self.paragraphs.is_empty() {
                debug!("no readable paragraphs found, staying stopped");
                return;
            }
        }
        if self.current.is_none() {
            self.current = Some(self.nearest_to_viewport());
        }
        self.begin_speaking();
    }

    fn pause(&mut self) {
        self.engine.pause();
        self.set_state(PlaybackState::Paused);
    }

    fn resume(&mut self) {
        self.engine.resume();
        self.set_state(PlaybackState::Playing);
    }

    /// Cancel audio and clear the highlight; index and sequence survive.
    fn stop_playback(&mut self) {
        self.engine.cancel();
        self.active = None;
        self.page.clear_highlight();
        self.set_state(PlaybackState::Stopped);
    }

    /// Next/Prev: no-op at the edges, otherwise cancel and restart on the
    /// neighboring paragraph.
    fn step(&mut self, delta: isize) {
        if self.state == PlaybackState::Stopped {
            return;
        }
        let Some(current) = self.current else { return };
        let target = current as isize + delta;
        if target < 0 || target as usize >= self.paragraphs.len() {
            return;
        }
        self.engine.cancel();
        self.active = None;
        self.current = Some(target as usize);
        self.begin_speaking();
    }

    fn on_utterance_ended(&mut self, id: u64) {
        if self.active != Some(id) {
            debug!(id, "stale utterance end, ignoring");
            return;
        }
        self.active = None;
        if self.state != PlaybackState::Playing {
            return;
        }
        let next = self.current.map_or(0, |i| i + 1);
        self.current = Some(next);
        if next < self.paragraphs.len() {
            self.begin_speaking();
        } else {
            // Read past the last paragraph: full stop, highlight cleared.
            self.stop_playback();
        }
    }

    fn on_utterance_errored(&mut self, id: u64, message: &str) {
        if self.active != Some(id) {
            debug!(id, "stale utterance error, ignoring");
            return;
        }
        error!("Speech engine error: {}", message);
        self.active = None;
        self.stop_playback();
    }

    fn apply_config(&mut self, config: PlaybackConfig) {
        let was_active = self.feature_active();
        self.config = config;
        let now_active = self.feature_active();

        if was_active && !now_active {
            self.engine.cancel();
            self.active = None;
            self.page.clear_highlight();
            self.controls.unmount(&mut *self.page);
            self.state = PlaybackState::Stopped;
            info!("tts disabled");
        } else if !was_active && now_active {
            self.engine.request_voices();
            self.controls.mount(&mut *self.page);
            self.paragraphs = locator::locate(&self.blocks);
            self.current = None;
            self.state = PlaybackState::Stopped;
            info!(paragraphs = self.paragraphs.len(), "tts enabled");
        } else if now_active {
            self.controls.sync(self.state, &mut *self.page);
        }
    }

    /// Index of the paragraph nearest the vertical center of the viewport;
    /// ties go to the earlier paragraph.
    fn nearest_to_viewport(&self) -> usize {
        let viewport_center = self.viewport.scroll_y + self.viewport.height / 2.0;
        let mut best = 0;
        let mut best_distance = f64::MAX;
        for (index, paragraph) in self.paragraphs.iter().enumerate() {
            let center = paragraph.rect.y + paragraph.rect.height / 2.0;
            let distance = (center - viewport_center).abs();
            if distance < best_distance {
                best_distance = distance;
                best = index;
            }
        }
        best
    }

    fn fully_visible(&self, rect: &Rect) -> bool {
        let top = self.viewport.scroll_y;
        let bottom = top + self.viewport.height;
        rect.y >= top
            && rect.y + rect.height <= bottom
            && rect.x >= 0.0
            && rect.x + rect.width <= self.viewport.width
    }

    /// Highlight the current paragraph, bring it on screen if needed, and
    /// hand its text to the speech engine.
    fn begin_speaking(&mut self) {
        let Some(index) = self.current else { return };
        let Some(paragraph) = self.paragraphs.get(index).cloned() else {
            // Index survived past a shorter sequence (e.g. Play after a
            // run-out); treat like the original end-of-document stop.
            self.stop_playback();
            return;
        };

        self.page.clear_highlight();
        self.page.highlight(paragraph.block);
        if !self.fully_visible(&paragraph.rect) {
            self.page.scroll_to_block(paragraph.block);
        }

        let id = self.next_utterance_id;
        self.next_utterance_id += 1;
        let utterance = Utterance {
            id,
            text: paragraph.text.clone(),
            rate: self.config.rate,
            pitch: self.config.pitch,
            volume: self.config.volume,
            voice: self
                .voices
                .resolve(&self.config.voice_id)
                .map(|v| v.name.clone()),
        };
        self.active = Some(id);
        self.engine.submit(&utterance);
        self.set_state(PlaybackState::Playing);
        debug!(index, id, "speaking paragraph");
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            debug!(from = %self.state, to = %state, "playback state");
        }
        self.state = state;
        self.controls.sync(self.state, &mut *self.page);
    }
}
