//! Text normalization and line filters shared by the passes.

use unicode_normalization::UnicodeNormalization;

use crate::config::{FILLER_GLYPH, FILLER_RATIO, MINISTRY_MIN_CHARS};

/// Sentence-final punctuation.
pub const TERMINAL_PUNCTUATION: [char; 3] = ['。', '！', '？'];

/// Normalize paragraph text as read from a document.
///
/// Applies Unicode NFC, turns non-breaking spaces into plain spaces and
/// strips zero-width characters that authoring tools leave behind. Tabs and
/// ideographic spaces are kept since they separate verse references from
/// verse text.
///
/// # Examples
/// ```
/// use tehui_extractor::text::normalize_text;
///
/// assert_eq!(normalize_text("壹\u{00A0}要点\u{200B}"), "壹 要点");
/// ```
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.nfc()
        .filter(|c| !matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}'))
        .map(|c| if c == '\u{00A0}' { ' ' } else { c })
        .collect()
}

/// Number of characters (not bytes) in `text`.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Whether `c` is a CJK unified ideograph.
#[must_use]
pub fn is_ideograph(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Whether a line ends a sentence.
#[must_use]
pub fn ends_sentence(text: &str) -> bool {
    text.trim_end().ends_with(TERMINAL_PUNCTUATION)
}

/// Decide whether an excerpt line carries content.
///
/// Rejects blank lines, lines made (almost) entirely of the filler glyph
/// templates use for empty answer space, and very short lines without a
/// single ideograph.
///
/// # Examples
/// ```
/// use tehui_extractor::text::is_valid_excerpt_line;
///
/// assert!(is_valid_excerpt_line("基督是生命"));
/// assert!(!is_valid_excerpt_line("x"));
/// assert!(!is_valid_excerpt_line(&"_".repeat(20)));
/// ```
#[must_use]
pub fn is_valid_excerpt_line(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }

    let total = char_len(text);
    let filler = text.chars().filter(|c| *c == FILLER_GLYPH).count();
    if filler == total || filler as f64 / total as f64 > FILLER_RATIO {
        return false;
    }

    total >= MINISTRY_MIN_CHARS || text.chars().any(is_ideograph)
}
