//! Rejoining paragraphs that were broken across a page boundary.
//!
//! Schedule documents are exported page by page, so a sentence running
//! over a page end arrives as two paragraphs. The heuristic below decides
//! whether a paragraph continues the previous one; it is intentionally
//! conservative about anything that looks like a heading.

use std::sync::LazyLock;

use regex::Regex;

use crate::text::{char_len, is_ideograph};

/// Previous-line endings that close a paragraph.
const CLOSING: [char; 8] = ['。', '！', '？', '；', '：', '）', '"', '”'];

/// Previous-line endings that demand a continuation.
const CONNECTIVES: [char; 8] = ['，', '、', '—', '－', '和', '与', '及', '或'];

/// Endings treated as complete when checking for a truncated line.
const COMPLETE: [char; 8] = ['。', '！', '？', '：', '；', '）', '"', '】'];

/// Openers of a new block: chapter or week markers and brackets.
const BLOCK_OPENERS: [char; 5] = ['第', '(', '（', '[', '【'];

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static HEADING_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[壹贰叁肆伍陆柒捌玖拾]+[、\s]|[一二三四五六七八九十]+[、\s]|\d+[、.\s]|[a-z][、.\s])")
        .expect("valid regex")
});

/// Ordinal glyphs that usually begin a new point.
fn starts_with_ordinal(text: &str, with_digits: bool) -> bool {
    text.chars().next().is_some_and(|c| {
        "壹贰叁肆伍陆一二三四五六七八九十".contains(c) || (with_digits && c.is_ascii_digit())
    })
}

/// Decide whether `current` continues `previous`.
///
/// `current` is passed untrimmed so that an indented line can be told
/// apart from a continuation.
///
/// # Examples
/// ```
/// use tehui_extractor::schedule::should_merge;
///
/// assert!(should_merge("我们需要在灵里，", "并且借着祷告接触主"));
/// assert!(!should_merge("这是完整的句子。", "下一段落的开头文字"));
/// assert!(!should_merge("我们需要在灵里，", "壹 新的要点"));
/// ```
#[must_use]
pub fn should_merge(previous: &str, current: &str) -> bool {
    let prev = previous.trim();
    let cur = current.trim();
    if prev.is_empty() || cur.is_empty() {
        return false;
    }

    if prev.ends_with(CLOSING) {
        return false;
    }
    if char_len(cur) < 4 {
        return false;
    }
    if HEADING_START.is_match(cur) || cur.starts_with(BLOCK_OPENERS) {
        return false;
    }
    if current.starts_with([' ', '\t']) {
        return false;
    }

    if prev.ends_with(CONNECTIVES) {
        return true;
    }

    let prev_len = char_len(prev);
    if prev_len > 3 && !prev.ends_with(COMPLETE) && !prev.ends_with('』') {
        return true;
    }

    let starts_like_text = cur
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || is_ideograph(c));
    if prev_len > 3 && starts_like_text && !starts_with_ordinal(cur, false) {
        return true;
    }

    prev_len < 25 && char_len(cur) > 15 && !starts_with_ordinal(cur, true)
}

/// Append `line` to `buffer`, joining it onto the last entry when it
/// continues that entry.
pub fn push_merged(buffer: &mut Vec<String>, line: &str) {
    if let Some(last) = buffer.last_mut() {
        if should_merge(last, line) {
            last.push_str(line.trim());
            return;
        }
    }
    buffer.push(line.trim().to_string());
}
