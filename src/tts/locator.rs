//! Paragraph locator: turns a page snapshot into the ordered sequence of
//! readable text blocks.
//!
//! Two passes over the snapshot, mirroring how readable content is laid
//! out in practice: paragraph-like elements first, then a broader sweep
//! over generic containers when a page marks up its text unconventionally.

use std::collections::HashSet;

use crate::ipc::{RawBlock, Rect};
use crate::style::{CONTROLS_CLASS, PROGRESS_CLASS, TOOLTIP_CLASS, WRAPPER_CLASS};

/// Minimum trimmed text length for a primary candidate.
const MIN_TEXT_LEN: usize = 10;
/// Primary-pass yield below which the fallback pass runs.
const FALLBACK_THRESHOLD: usize = 5;
/// Minimum trimmed text length for a fallback candidate.
const FALLBACK_MIN_TEXT_LEN: usize = 50;
/// Minimum trimmed-text : raw-markup length ratio for a fallback candidate.
const FALLBACK_TEXT_RATIO: f64 = 0.5;

/// Content-container classes whose members are primary candidates.
const CONTENT_CLASSES: [&str; 2] = ["chapter-text", "chapter-content"];
/// Container classes whose direct `<div>` children are primary candidates.
const CONTENT_PARENT_CLASSES: [&str; 2] = ["entry-content", "post-content"];

/// A located, visible text block: the atomic unit of speech playback and
/// highlighting.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphHandle {
    /// Host element handle, echoed back in highlight/scroll commands.
    pub block: u64,
    /// Cached plain-text content, trimmed.
    pub text: String,
    pub rect: Rect,
}

/// Scan the snapshot for readable paragraphs, in snapshot (document) order.
///
/// Fallback-pass matches are appended after the primary pass. Given an
/// unchanged snapshot, membership and order are stable.
pub fn locate(blocks: &[RawBlock]) -> Vec<ParagraphHandle> {
    let mut paragraphs = Vec::new();
    let mut picked: HashSet<u64> = HashSet::new();

    for block in blocks {
        if is_own_ui(block) || !is_visible(block) {
            continue;
        }
        let text = block.text.trim();
        if is_primary_candidate(block) && text.len() > MIN_TEXT_LEN {
            picked.insert(block.id);
            paragraphs.push(handle(block, text));
        }
    }

    // Sparse primary yield: broaden to generic containers that are mostly
    // text rather than markup.
    if paragraphs.len() < FALLBACK_THRESHOLD {
        for block in blocks {
            if block.tag != "div" || is_own_ui(block) || picked.contains(&block.id) {
                continue;
            }
            if !is_visible(block) {
                continue;
            }
            let text = block.text.trim();
            if text.len() > FALLBACK_MIN_TEXT_LEN
                && block.markup_len > 0
                && text.len() as f64 / block.markup_len as f64 > FALLBACK_TEXT_RATIO
            {
                picked.insert(block.id);
                paragraphs.push(handle(block, text));
            }
        }
    }

    paragraphs
}

fn handle(block: &RawBlock, text: &str) -> ParagraphHandle {
    ParagraphHandle {
        block: block.id,
        text: text.to_string(),
        rect: block.rect,
    }
}

/// Paragraph-like tags and known article/content container children.
fn is_primary_candidate(block: &RawBlock) -> bool {
    if block.tag == "p" {
        return true;
    }
    if block.classes.iter().any(|c| CONTENT_CLASSES.contains(&c.as_str())) {
        return true;
    }
    block.tag == "div"
        && (block.parent_tag == "article"
            || block
                .parent_classes
                .iter()
                .any(|c| CONTENT_PARENT_CLASSES.contains(&c.as_str())))
}

/// Rendered box has non-zero area.
fn is_visible(block: &RawBlock) -> bool {
    block.rect.width > 0.0 && block.rect.height > 0.0
}

/// Our own injected UI never reads itself aloud.
fn is_own_ui(block: &RawBlock) -> bool {
    block.classes.iter().any(|c| {
        c == CONTROLS_CLASS || c == TOOLTIP_CLASS || c == WRAPPER_CLASS || c == PROGRESS_CLASS
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: u64, tag: &str, text: &str) -> RawBlock {
        RawBlock {
            id,
            tag: tag.to_string(),
            classes: Vec::new(),
            parent_tag: "body".to_string(),
            parent_classes: Vec::new(),
            text: text.to_string(),
            markup_len: text.len(),
            rect: Rect {
                x: 0.0,
                y: id as f64 * 100.0,
                width: 600.0,
                height: 80.0,
            },
        }
    }

    fn long_text() -> String {
        "This block carries enough plain text to pass the fallback length gate.".to_string()
    }

    #[test]
    fn paragraphs_in_document_order() {
        let blocks = vec![
            block(1, "p", "Alpha text here."),
            block(2, "p", "Beta text here."),
            block(3, "p", "Gamma text here."),
        ];
        let found = locate(&blocks);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].text, "Alpha text here.");
        assert_eq!(found[1].text, "Beta text here.");
        assert_eq!(found[2].text, "Gamma text here.");
    }

    #[test]
    fn short_and_invisible_blocks_are_skipped() {
        let mut hidden = block(2, "p", "Long enough to pass the text gate.");
        hidden.rect.height = 0.0;
        let blocks = vec![
            block(1, "p", "tiny"),
            hidden,
            block(3, "p", "Visible and long enough."),
        ];
        let found = locate(&blocks);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].block, 3);
    }

    #[test]
    fn article_and_content_container_children_are_primary() {
        let mut article_child = block(1, "div", "Inside an article container body.");
        article_child.parent_tag = "article".to_string();
        let mut entry_child = block(2, "div", "Inside an entry-content container.");
        entry_child.parent_classes = vec!["entry-content".to_string()];
        let mut chapter = block(3, "span", "Chapter body text, any tag works.");
        chapter.classes = vec!["chapter-text".to_string()];
        let mut plain_div = block(4, "div", "A plain div is not a primary candidate.");
        // Force markup-heavy so the fallback pass skips it too.
        plain_div.markup_len = 10_000;

        let found = locate(&[article_child, entry_child, chapter, plain_div]);
        assert_eq!(found.iter().map(|p| p.block).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn fallback_ratio_gate() {
        // text 60 / markup 100 -> ratio 0.6, included;
        // text 60 / markup 200 -> ratio 0.3, excluded.
        let sixty = "x".repeat(60);
        let mut mostly_text = block(1, "div", &sixty);
        mostly_text.markup_len = 100;
        let mut mostly_markup = block(2, "div", &sixty);
        mostly_markup.markup_len = 200;

        let found = locate(&[mostly_text, mostly_markup]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].block, 1);
    }

    #[test]
    fn fallback_skipped_when_primary_yield_sufficient() {
        let mut blocks: Vec<RawBlock> = (1..=5)
            .map(|i| block(i, "p", "Primary paragraph with plenty of text."))
            .collect();
        let mut div = block(9, "div", &long_text());
        div.markup_len = 80;
        blocks.push(div);

        let found = locate(&blocks);
        assert_eq!(found.len(), 5);
        assert!(found.iter().all(|p| p.block != 9));
    }

    #[test]
    fn fallback_does_not_duplicate_primary_matches() {
        let mut article_child = block(1, "div", &long_text());
        article_child.parent_tag = "article".to_string();
        article_child.markup_len = 80;
        let found = locate(&[article_child]);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn own_ui_excluded_from_both_passes() {
        let mut controls = block(1, "div", &long_text());
        controls.classes = vec![CONTROLS_CLASS.to_string()];
        controls.markup_len = 80;
        let mut tooltip = block(2, "p", "Tooltip text long enough to pass.");
        tooltip.classes = vec![TOOLTIP_CLASS.to_string()];
        let found = locate(&[controls, tooltip]);
        assert!(found.is_empty());
    }

    #[test]
    fn whitespace_is_trimmed_before_gates() {
        let blocks = vec![block(1, "p", "   \n  padded   ")];
        // Trimmed length 6 <= 10.
        assert!(locate(&blocks).is_empty());
    }
}
