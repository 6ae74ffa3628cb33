//! Page restyling engine.
//!
//! Turns settings into the injected stylesheet and the per-element inline
//! rules the content script applies to mutation-added content on sites that
//! resist stylesheet specificity. Also computes the reading-progress-bar
//! percent from viewport geometry.

use serde::{Deserialize, Serialize};

use crate::ipc::Viewport;
use crate::settings::ReaderSettings;

/// Class on the wrapper the content script moves page content into.
pub const WRAPPER_CLASS: &str = "reading-craze-wrapper";
/// Class on the floating TTS control widget.
pub const CONTROLS_CLASS: &str = "reading-craze-tts-controls";
/// Class on the dictionary tooltip.
pub const TOOLTIP_CLASS: &str = "reading-craze-tooltip";
/// Class applied to the paragraph currently being spoken.
pub const HIGHLIGHT_CLASS: &str = "reading-craze-tts-highlight";
/// Class on the reading-progress bar container.
pub const PROGRESS_CLASS: &str = "reading-progress-container";

/// Color scheme applied on top of the user's font/background choices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingMode {
    #[default]
    Light,
    Dark,
    Sepia,
}

const DARK_BG: &str = "#121212";
const DARK_TEXT: &str = "#e0e0e0";
const DARK_LINK: &str = "#90caf9";
const SEPIA_BG: &str = "#F8F3E9";
const SEPIA_TEXT: &str = "#5B4636";

/// Direct per-element style payload, re-applied whenever a fresh snapshot
/// reports new content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineTextStyle {
    pub font: String,
    pub line_height: f32,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_color: Option<String>,
}

/// Mode-resolved text color for body elements.
fn text_color(settings: &ReaderSettings) -> String {
    match settings.reading_mode {
        ReadingMode::Dark => DARK_TEXT.to_string(),
        ReadingMode::Sepia => SEPIA_TEXT.to_string(),
        ReadingMode::Light => settings.font_color.clone(),
    }
}

/// Build the inline-rule payload for the current settings.
pub fn inline_rules(settings: &ReaderSettings) -> InlineTextStyle {
    InlineTextStyle {
        font: settings.font.clone(),
        line_height: settings.line_height,
        color: text_color(settings),
        link_color: match settings.reading_mode {
            ReadingMode::Dark => Some(DARK_LINK.to_string()),
            _ => None,
        },
    }
}

/// Build the full injected stylesheet for the current settings.
pub fn page_css(settings: &ReaderSettings) -> String {
    let mut css = format!(
        "html body, body {{\n\
         \x20   font-family: {font} !important;\n\
         \x20   font-size: {size}px !important;\n\
         \x20   color: {color} !important;\n\
         \x20   line-height: {line_height} !important;\n\
         }}\n\
         .{wrapper} {{\n\
         \x20   padding: 0 {margin}px;\n\
         }}\n\
         body p, body div, body span, body li, body h1, body h2, body h3, body h4, body h5, body h6,\n\
         body article, body section, body td, body th, body blockquote, body pre, body code,\n\
         body strong, body em, body small, body b, body i, body u, body s, body strike,\n\
         body a, body label, body input, body button, body textarea, body select, body option {{\n\
         \x20   font-family: {font} !important;\n\
         \x20   line-height: {line_height} !important;\n\
         \x20   color: {color} !important;\n\
         }}\n\
         body p {{\n\
         \x20   margin-bottom: {spacing}em !important;\n\
         }}\n\
         ::before, ::after, ::selection {{\n\
         \x20   color: {color} !important;\n\
         }}\n",
        font = settings.font,
        size = settings.font_size,
        color = text_color(settings),
        line_height = settings.line_height,
        wrapper = WRAPPER_CLASS,
        margin = settings.side_margin,
        spacing = settings.paragraph_spacing,
    );

    match settings.reading_mode {
        ReadingMode::Dark => {
            css.push_str(&format!(
                "html, body {{\n\
                 \x20   background-color: {bg} !important;\n\
                 \x20   color: {text} !important;\n\
                 }}\n\
                 body a {{\n\
                 \x20   color: {link} !important;\n\
                 }}\n",
                bg = DARK_BG,
                text = DARK_TEXT,
                link = DARK_LINK,
            ));
        }
        ReadingMode::Sepia => {
            css.push_str(&format!(
                "html, body {{\n\
                 \x20   background-color: {bg} !important;\n\
                 \x20   color: {text} !important;\n\
                 }}\n",
                bg = SEPIA_BG,
                text = SEPIA_TEXT,
            ));
        }
        ReadingMode::Light => {
            css.push_str(&format!(
                "html, body {{\n\
                 \x20   background-color: {bg} !important;\n\
                 \x20   color: {color} !important;\n\
                 }}\n",
                bg = settings.bg_color,
                color = settings.font_color,
            ));
        }
    }

    // Injected-UI styles: progress bar and the spoken-paragraph highlight.
    css.push_str(&format!(
        ".{progress} {{\n\
         \x20   position: fixed;\n\
         \x20   top: 0;\n\
         \x20   left: 0;\n\
         \x20   width: 100%;\n\
         \x20   height: 4px;\n\
         \x20   z-index: 10001;\n\
         \x20   background-color: rgba(0, 0, 0, 0.1);\n\
         }}\n\
         .{progress} > .reading-progress-bar {{\n\
         \x20   height: 100%;\n\
         \x20   width: 0;\n\
         \x20   background-color: #4caf50;\n\
         \x20   transition: width 0.1s linear;\n\
         }}\n\
         .{highlight} {{\n\
         \x20   background-color: rgba(255, 248, 107, 0.3);\n\
         \x20   border-radius: 3px;\n\
         \x20   transition: background-color 0.3s ease;\n\
         }}\n",
        progress = PROGRESS_CLASS,
        highlight = HIGHLIGHT_CLASS,
    ));

    css
}

/// Scroll progress through the document, 0..=100.
pub fn progress_percent(viewport: &Viewport) -> f64 {
    let scrollable = viewport.scroll_height - viewport.height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (viewport.scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_mode_palette() {
        let settings = ReaderSettings {
            reading_mode: ReadingMode::Dark,
            ..ReaderSettings::default()
        };
        let css = page_css(&settings);
        assert!(css.contains("background-color: #121212 !important"));
        assert!(css.contains("color: #e0e0e0 !important"));
        assert!(css.contains("color: #90caf9 !important"));

        let rules = inline_rules(&settings);
        assert_eq!(rules.color, "#e0e0e0");
        assert_eq!(rules.link_color.as_deref(), Some("#90caf9"));
    }

    #[test]
    fn sepia_mode_palette() {
        let settings = ReaderSettings {
            reading_mode: ReadingMode::Sepia,
            ..ReaderSettings::default()
        };
        let css = page_css(&settings);
        assert!(css.contains("background-color: #F8F3E9 !important"));
        assert!(css.contains("color: #5B4636 !important"));
        assert_eq!(inline_rules(&settings).color, "#5B4636");
        assert!(inline_rules(&settings).link_color.is_none());
    }

    #[test]
    fn light_mode_uses_configured_colors() {
        let settings = ReaderSettings {
            font_color: "#222222".to_string(),
            bg_color: "#fafafa".to_string(),
            ..ReaderSettings::default()
        };
        let css = page_css(&settings);
        assert!(css.contains("background-color: #fafafa !important"));
        assert_eq!(inline_rules(&settings).color, "#222222");
    }

    #[test]
    fn css_carries_spacing_and_margin() {
        let settings = ReaderSettings {
            side_margin: 32,
            paragraph_spacing: 2.5,
            ..ReaderSettings::default()
        };
        let css = page_css(&settings);
        assert!(css.contains("padding: 0 32px"));
        assert!(css.contains("margin-bottom: 2.5em !important"));
    }

    #[test]
    fn progress_percent_bounds() {
        let mut v = Viewport {
            scroll_y: 0.0,
            width: 800.0,
            height: 600.0,
            scroll_height: 600.0,
        };
        // Page does not scroll.
        assert_eq!(progress_percent(&v), 0.0);

        v.scroll_height = 1600.0;
        assert_eq!(progress_percent(&v), 0.0);
        v.scroll_y = 500.0;
        assert_eq!(progress_percent(&v), 50.0);
        v.scroll_y = 1000.0;
        assert_eq!(progress_percent(&v), 100.0);
        // Overscroll clamps.
        v.scroll_y = 1200.0;
        assert_eq!(progress_percent(&v), 100.0);
    }
}
