//! Floating playback-control widget, as seen from the core.
//!
//! The widget itself is rendered by the content script; this is the thin
//! view state that mounts/unmounts it and keeps the play/pause icon in
//! sync. Button presses come back as `control` events and map 1:1 onto
//! session operations.

use super::session::PlaybackState;
use super::PageView;

#[derive(Debug, Default)]
pub struct ControlSurface {
    mounted: bool,
}

impl ControlSurface {
    /// Mount the widget; idempotent.
    pub fn mount(&mut self, page: &mut dyn PageView) {
        if self.mounted {
            return;
        }
        page.mount_controls();
        page.set_play_icon(false);
        self.mounted = true;
    }

    /// Remove the widget; idempotent.
    pub fn unmount(&mut self, page: &mut dyn PageView) {
        if !self.mounted {
            return;
        }
        page.remove_controls();
        self.mounted = false;
    }

    /// Mirror the playback state in the play/pause icon.
    pub fn sync(&self, state: PlaybackState, page: &mut dyn PageView) {
        if self.mounted {
            page.set_play_icon(state == PlaybackState::Playing);
        }
    }
}
