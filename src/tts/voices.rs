//! Platform voice catalog.
//!
//! The host announces its speech-synthesis voices whenever the platform
//! reports a change; the list may be empty at first and populate later.

use crate::ipc::VoiceInfo;

use super::DEFAULT_VOICE;

/// Wholesale-rebuilt catalog of platform voices. Never persisted.
#[derive(Debug, Default)]
pub struct VoiceRegistry {
    voices: Vec<VoiceInfo>,
}

impl VoiceRegistry {
    /// Replace the catalog entirely. Callable any number of times as the
    /// platform populates voices asynchronously.
    pub fn refresh(&mut self, voices: Vec<VoiceInfo>) {
        self.voices = voices;
    }

    /// Resolve a persisted voice preference to a catalog entry.
    ///
    /// Returns `None` for the "default" sentinel or when nothing matches;
    /// the caller falls back to the platform's implicit default voice.
    /// Match order: exact display name, then stable voice URI.
    pub fn resolve(&self, voice_id: &str) -> Option<&VoiceInfo> {
        if voice_id == DEFAULT_VOICE {
            return None;
        }
        self.voices
            .iter()
            .find(|v| v.name == voice_id)
            .or_else(|| self.voices.iter().find(|v| v.uri == voice_id))
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(name: &str, uri: &str) -> VoiceInfo {
        VoiceInfo {
            name: name.to_string(),
            uri: uri.to_string(),
            lang: "en-US".to_string(),
            is_default: false,
        }
    }

    #[test]
    fn default_sentinel_resolves_to_none() {
        let mut registry = VoiceRegistry::default();
        registry.refresh(vec![voice("Alex", "com.apple.alex")]);
        assert!(registry.resolve("default").is_none());
    }

    #[test]
    fn exact_name_match() {
        let mut registry = VoiceRegistry::default();
        registry.refresh(vec![
            voice("Alex", "com.apple.alex"),
            voice("Samantha", "com.apple.samantha"),
        ]);
        assert_eq!(registry.resolve("Samantha").unwrap().uri, "com.apple.samantha");
    }

    #[test]
    fn uri_match_when_name_fails() {
        let mut registry = VoiceRegistry::default();
        registry.refresh(vec![voice("Samantha (Enhanced)", "com.apple.samantha")]);
        let hit = registry.resolve("com.apple.samantha").unwrap();
        assert_eq!(hit.name, "Samantha (Enhanced)");
    }

    #[test]
    fn name_takes_precedence_over_uri() {
        let mut registry = VoiceRegistry::default();
        registry.refresh(vec![
            voice("com.apple.alex", "uri-one"),
            voice("Alex", "com.apple.alex"),
        ]);
        // The first voice's *name* equals the query, so it wins even though
        // the second voice's URI also matches.
        assert_eq!(registry.resolve("com.apple.alex").unwrap().uri, "uri-one");
    }

    #[test]
    fn near_miss_resolves_to_none() {
        // "Samantha" matches neither the exact name "Samantha (Enhanced)"
        // nor the URI "com.apple.samantha", so the platform default is used.
        let mut registry = VoiceRegistry::default();
        registry.refresh(vec![
            voice("Alex", "com.apple.alex"),
            voice("Samantha (Enhanced)", "com.apple.samantha"),
        ]);
        assert!(registry.resolve("Samantha").is_none());
    }

    #[test]
    fn refresh_replaces_wholesale() {
        let mut registry = VoiceRegistry::default();
        registry.refresh(vec![voice("Alex", "com.apple.alex")]);
        registry.refresh(vec![voice("Daniel", "com.apple.daniel")]);
        assert!(registry.resolve("Alex").is_none());
        assert!(registry.resolve("Daniel").is_some());
    }
}
