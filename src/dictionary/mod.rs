//! Dictionary-lookup feature backed by the Free Dictionary API.
//!
//! The content script reports the word under the pointer; after a dwell
//! delay the core fetches a definition and sends the tooltip body back.
//! Only a handful of response fields are read; the API schema beyond them
//! is deliberately not modeled.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Dwell time before a hovered word triggers a lookup.
pub const LOOKUP_DELAY_MS: u64 = 500;

const API_BASE: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

/// At most this many meanings / definitions-per-meaning in a tooltip.
const MAX_MEANINGS: usize = 2;
const MAX_DEFINITIONS: usize = 2;

/// Tooltip color scheme, selected in the popup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipTheme {
    #[default]
    Light,
    Dark,
}

/// Gate for lookup candidates: a plain English word, not too short, not
/// absurdly long.
pub fn is_lookup_word(word: &str) -> bool {
    word.len() > 2 && word.len() < 30 && word.chars().all(|c| c.is_ascii_alphabetic())
}

// ---------------------------------------------------------------------------
// API response (partial)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ApiEntry {
    #[serde(default)]
    meanings: Vec<ApiMeaning>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMeaning {
    #[serde(default)]
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<ApiDefinition>,
}

#[derive(Debug, Deserialize)]
struct ApiDefinition {
    #[serde(default)]
    definition: String,
    #[serde(default)]
    example: Option<String>,
}

// ---------------------------------------------------------------------------
// Tooltip body
// ---------------------------------------------------------------------------

/// Rendered tooltip content, assembled core-side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipBody {
    pub word: String,
    pub status: TooltipStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub senses: Vec<Sense>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TooltipStatus {
    Loading,
    Definition,
    NotFound,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sense {
    pub part_of_speech: String,
    pub definitions: Vec<SenseDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SenseDefinition {
    pub definition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl TooltipBody {
    /// "Looking up ..." placeholder shown while the request is in flight.
    pub fn loading(word: &str) -> Self {
        Self {
            word: word.to_string(),
            status: TooltipStatus::Loading,
            senses: Vec::new(),
            message: None,
        }
    }

    pub fn not_found(word: &str) -> Self {
        Self {
            word: word.to_string(),
            status: TooltipStatus::NotFound,
            senses: Vec::new(),
            message: None,
        }
    }

    pub fn error(word: &str, message: &str) -> Self {
        Self {
            word: word.to_string(),
            status: TooltipStatus::Error,
            senses: Vec::new(),
            message: Some(message.to_string()),
        }
    }

    /// Build a definition body from the first API entry, truncated for the
    /// tooltip.
    fn from_entries(word: &str, entries: &[ApiEntry]) -> Self {
        let Some(entry) = entries.first() else {
            return Self::not_found(word);
        };
        let senses = entry
            .meanings
            .iter()
            .take(MAX_MEANINGS)
            .map(|meaning| Sense {
                part_of_speech: meaning.part_of_speech.clone(),
                definitions: meaning
                    .definitions
                    .iter()
                    .take(MAX_DEFINITIONS)
                    .map(|d| SenseDefinition {
                        definition: d.definition.clone(),
                        example: d.example.clone(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            word: word.to_string(),
            status: TooltipStatus::Definition,
            senses,
            message: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Free Dictionary API client.
#[derive(Debug, Clone)]
pub struct DictionaryClient {
    client: reqwest::Client,
}

impl DictionaryClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Look up a word; network and API failures fold into the tooltip body
    /// rather than surfacing as errors.
    pub async fn lookup(&self, word: &str) -> TooltipBody {
        let url = format!("{}/{}", API_BASE, word);
        debug!(word, "Dictionary lookup");

        let resp = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => return TooltipBody::error(word, &e.to_string()),
        };

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return TooltipBody::not_found(word);
        }
        if !resp.status().is_success() {
            return TooltipBody::error(word, &format!("API error {}", resp.status()));
        }

        match resp.json::<Vec<ApiEntry>>().await {
            Ok(entries) => TooltipBody::from_entries(word, &entries),
            Err(e) => TooltipBody::error(word, &e.to_string()),
        }
    }
}

impl Default for DictionaryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_gate() {
        assert!(is_lookup_word("reading"));
        assert!(is_lookup_word("abc"));
        // Too short.
        assert!(!is_lookup_word("ab"));
        assert!(!is_lookup_word(""));
        // Too long.
        assert!(!is_lookup_word("pneumonoultramicroscopicsilicovolcanoconiosis"));
        // Non-alphabetic.
        assert!(!is_lookup_word("well-read"));
        assert!(!is_lookup_word("word7"));
        assert!(!is_lookup_word("caf\u{e9}"));
    }

    #[test]
    fn definition_body_truncates_meanings_and_definitions() {
        let json = r#"[{
            "word": "run",
            "meanings": [
                {"partOfSpeech": "verb", "definitions": [
                    {"definition": "move fast", "example": "run home"},
                    {"definition": "operate"},
                    {"definition": "flow"}
                ]},
                {"partOfSpeech": "noun", "definitions": [{"definition": "a jog"}]},
                {"partOfSpeech": "adjective", "definitions": [{"definition": "melted"}]}
            ]
        }]"#;
        let entries: Vec<ApiEntry> = serde_json::from_str(json).unwrap();
        let body = TooltipBody::from_entries("run", &entries);

        assert_eq!(body.status, TooltipStatus::Definition);
        assert_eq!(body.senses.len(), 2);
        assert_eq!(body.senses[0].part_of_speech, "verb");
        assert_eq!(body.senses[0].definitions.len(), 2);
        assert_eq!(body.senses[0].definitions[0].example.as_deref(), Some("run home"));
        assert!(body.senses[0].definitions[1].example.is_none());
        assert_eq!(body.senses[1].part_of_speech, "noun");
    }

    #[test]
    fn empty_response_is_not_found() {
        let body = TooltipBody::from_entries("xyzzy", &[]);
        assert_eq!(body.status, TooltipStatus::NotFound);
        assert!(body.senses.is_empty());
    }
}
