//! Reading Craze — native reading core.
//!
//! Owns settings, per-URL reading progress, page restyling, dictionary
//! lookup, and the TTS playback state machine; the browser side is a thin
//! host reached via JSON-line IPC on stdin/stdout. This is the entry point
//! that loads configuration and runs the main event loop.

mod dictionary;
mod ipc;
mod progress;
mod settings;
mod style;
mod tts;

use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use dictionary::{DictionaryClient, TooltipBody};
use ipc::bridge::{emit, spawn_stdin_reader};
use ipc::{HostCommand, HostEvent};
use progress::ProgressStore;
use settings::paths::get_data_dir;
use settings::ReaderSettings;
use tts::session::{PlaybackEvent, PlaybackSession};
use tts::{HostPage, HostSpeech, PlaybackConfig};

/// Auto-scroll step cadence.
const AUTO_SCROLL_TICK: Duration = Duration::from_millis(50);
/// Quiet period after the last scroll event before progress hits disk.
const PROGRESS_DEBOUNCE: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() {
    // Initialize tracing (respects RUST_LOG env, defaults to info).
    // stderr only; stdout carries the IPC protocol.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Emit starting event immediately so the host knows we're alive.
    emit(&HostCommand::Starting {});

    let reader_settings = settings::load_or_seed();
    info!(?reader_settings, "Settings loaded");

    let mut app = App::new(reader_settings);
    let mut events = spawn_stdin_reader();

    emit(&HostCommand::Ready {});
    info!("Reading core ready");

    let mut scroll_tick = time::interval(AUTO_SCROLL_TICK);
    scroll_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let flush_at = app
            .flush_deadline
            .unwrap_or_else(|| Instant::now() + Duration::from_secs(60));
        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(event) => {
                        if !app.handle_event(event) {
                            break; // Stop event received
                        }
                    }
                    None => {
                        // stdin closed — browser host gone
                        info!("stdin closed, shutting down");
                        break;
                    }
                }
            }
            _ = scroll_tick.tick(), if app.settings.auto_scroll => {
                emit(&HostCommand::ScrollBy { amount: app.settings.auto_scroll_speed });
            }
            _ = time::sleep_until(flush_at), if app.flush_deadline.is_some() => {
                app.flush_deadline = None;
                if let Err(e) = app.progress.flush() {
                    warn!("Failed to flush reading progress: {}", e);
                }
            }
        }
    }

    if app.progress.is_dirty() {
        if let Err(e) = app.progress.flush() {
            warn!("Failed to flush reading progress: {}", e);
        }
    }
    emit(&HostCommand::Stopping {});
    info!("Reading core shutting down");
}

/// Everything the core owns, one instance per page context.
struct App {
    settings: ReaderSettings,
    progress: ProgressStore,
    session: PlaybackSession,
    dictionary: DictionaryClient,
    lookup_task: Option<tokio::task::JoinHandle<()>>,
    page_url: Option<String>,
    flush_deadline: Option<Instant>,
}

impl App {
    fn new(settings: ReaderSettings) -> Self {
        let session = PlaybackSession::new(
            Box::new(HostSpeech),
            Box::new(HostPage),
            PlaybackConfig::from_settings(&settings),
        );
        let progress = ProgressStore::load(&get_data_dir().join("progress.json"));
        Self {
            settings,
            progress,
            session,
            dictionary: DictionaryClient::new(),
            lookup_task: None,
            page_url: None,
            flush_deadline: None,
        }
    }

    /// Handle a single event from the browser host.
    /// Returns `false` if the main loop should exit.
    fn handle_event(&mut self, event: HostEvent) -> bool {
        match event {
            HostEvent::PageLoaded {
                url,
                speech_supported,
                viewport,
            } => {
                info!(%url, speech_supported, "Page loaded");
                self.push_styles();
                emit(&HostCommand::ProgressBar {
                    percent: style::progress_percent(&viewport),
                });
                if let Some(entry) = self.progress.get(&url) {
                    emit(&HostCommand::RestorePosition {
                        scroll_y: entry.scroll_position,
                    });
                }
                self.session.set_viewport(viewport);
                self.session.on_page_ready(speech_supported);
                self.page_url = Some(url);
            }

            HostEvent::Snapshot { blocks, viewport } => {
                self.session.set_snapshot(blocks, viewport);
                // Mutation-added content needs the direct styles again.
                emit(&HostCommand::ApplyInlineStyles {
                    rules: style::inline_rules(&self.settings),
                });
            }

            HostEvent::ViewportChanged { viewport } => {
                self.session.set_viewport(viewport);
                emit(&HostCommand::ProgressBar {
                    percent: style::progress_percent(&viewport),
                });
                if let Some(url) = &self.page_url {
                    self.progress
                        .update(url, viewport.scroll_y, viewport.scroll_height);
                    self.flush_deadline = Some(Instant::now() + PROGRESS_DEBOUNCE);
                }
            }

            HostEvent::Control { button } => {
                self.session.on_control(button);
                debug!(
                    state = %self.session.state(),
                    index = ?self.session.current_index(),
                    "control handled"
                );
            }

            HostEvent::Voices { voices } => self.session.refresh_voices(voices),

            HostEvent::UtteranceEnded { id } => {
                self.session.handle(PlaybackEvent::UtteranceEnded { id });
            }

            HostEvent::UtteranceErrored { id, message } => {
                self.session
                    .handle(PlaybackEvent::UtteranceErrored { id, message });
            }

            HostEvent::ApplySettings { settings } => {
                self.settings = settings;
                self.persist_settings();
                self.push_styles();
                self.session.handle(PlaybackEvent::ConfigChanged {
                    config: PlaybackConfig::from_settings(&self.settings),
                });
                if !self.settings.dictionary_enabled {
                    self.cancel_lookup();
                    emit(&HostCommand::HideTooltip {});
                }
            }

            HostEvent::UpdateTts {
                enabled,
                voice,
                rate,
                pitch,
                volume,
            } => {
                self.settings.tts_enabled = enabled;
                if let Some(voice) = voice {
                    self.settings.tts_voice = voice;
                }
                if let Some(rate) = rate {
                    self.settings.tts_rate = rate;
                }
                if let Some(pitch) = pitch {
                    self.settings.tts_pitch = pitch;
                }
                if let Some(volume) = volume {
                    self.settings.tts_volume = volume;
                }
                self.persist_settings();
                self.session.handle(PlaybackEvent::ConfigChanged {
                    config: PlaybackConfig::from_settings(&self.settings),
                });
            }

            HostEvent::UpdateDictionary { enabled, theme } => {
                self.settings.dictionary_enabled = enabled;
                if let Some(theme) = theme {
                    self.settings.dictionary_theme = theme;
                }
                self.persist_settings();
                if !enabled {
                    self.cancel_lookup();
                    emit(&HostCommand::HideTooltip {});
                }
            }

            HostEvent::WordHovered { word, x, y } => self.schedule_lookup(word, x, y),

            HostEvent::ResetProgress {} => {
                self.progress.reset();
                self.flush_deadline = None;
            }

            HostEvent::Ping {} => emit(&HostCommand::Pong {}),

            HostEvent::Stop {} => return false,
        }
        true
    }

    /// Send the stylesheet and inline-rule payloads for the current
    /// settings.
    fn push_styles(&self) {
        emit(&HostCommand::InjectStyles {
            css: style::page_css(&self.settings),
        });
        emit(&HostCommand::ApplyInlineStyles {
            rules: style::inline_rules(&self.settings),
        });
    }

    fn persist_settings(&self) {
        if let Err(e) = settings::save(&self.settings) {
            warn!("Failed to save settings: {}", e);
        }
    }

    /// Abort any scheduled or in-flight lookup and start a fresh dwell
    /// timer for the hovered word.
    fn schedule_lookup(&mut self, word: String, x: f64, y: f64) {
        if !self.settings.dictionary_enabled || !dictionary::is_lookup_word(&word) {
            return;
        }
        self.cancel_lookup();
        let client = self.dictionary.clone();
        let theme = self.settings.dictionary_theme;
        self.lookup_task = Some(tokio::spawn(async move {
            // Dwell before looking up, so quick pointer sweeps stay quiet.
            time::sleep(Duration::from_millis(dictionary::LOOKUP_DELAY_MS)).await;
            emit(&HostCommand::ShowTooltip {
                x,
                y,
                theme,
                body: TooltipBody::loading(&word),
            });
            let body = client.lookup(&word).await;
            emit(&HostCommand::ShowTooltip { x, y, theme, body });
        }));
    }

    fn cancel_lookup(&mut self) {
        if let Some(task) = self.lookup_task.take() {
            task.abort();
        }
    }
}
