//! Training title and subtitle from the head of the outline document.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{HEADER_SCAN_LIMIT, HEADER_TITLE_MAX_CHARS};
use crate::text::char_len;
use crate::types::Paragraph;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static HEADER_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"目\s*录|^第[一二三四五六七八九十百]+篇").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static THEME_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"经历|享受|彰显|基督|神|生命|召会").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NOT_A_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(.+\)$|^\d+$|^页\s*\d+").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TRAINING_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"训练|特会").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static YEAR_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[二〇一三四五六七八九零]+年|20\d+年").expect("valid regex"));

/// Training kinds recognizable from a folder or file name.
const TRAINING_KINDS: [&str; 8] = ["夏季", "秋季", "春季", "冬季", "感恩节", "圣诞节", "国殇节", "新年"];

/// Title used when nothing better is found.
pub const GENERIC_TITLE: &str = "训练";

/// Title and subtitle of a training.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrainingHeading {
    pub title: String,
    pub subtitle: String,
}

/// Scan the head of an outline document for the training title.
///
/// # Arguments
/// * `paragraphs` - The outline document's paragraphs
/// * `source` - Path of the document, used to infer the training kind
///   when the document itself names none
#[must_use]
pub fn extract_heading(paragraphs: &[Paragraph], source: &Path) -> TrainingHeading {
    let mut subtitle = String::new();
    let mut candidates: Vec<&str> = Vec::new();
    let mut seen = 0usize;
    let mut skip_next = false;

    for (index, paragraph) in paragraphs.iter().enumerate() {
        let text = paragraph.text.trim();
        if text.is_empty() {
            continue;
        }
        if skip_next {
            skip_next = false;
            continue;
        }
        if seen >= HEADER_SCAN_LIMIT || HEADER_END.is_match(text) {
            break;
        }
        seen += 1;

        if text == "总题：" || text == "总题:" {
            let next = paragraphs[index + 1..]
                .iter()
                .map(|p| p.text.trim())
                .find(|t| !t.is_empty());
            if let Some(next) = next.filter(|t| !HEADER_END.is_match(t)) {
                subtitle = next.to_string();
                skip_next = true;
            }
            continue;
        }

        let len = char_len(text);
        if seen == 1 && subtitle.is_empty() && len > 5 && len < HEADER_TITLE_MAX_CHARS && THEME_WORDS.is_match(text) {
            subtitle = text.to_string();
            continue;
        }

        if subtitle.is_empty() && len < HEADER_TITLE_MAX_CHARS && !NOT_A_TITLE.is_match(text) {
            candidates.push(text);
        }
    }

    let title = first_run_matching(&candidates, &TRAINING_WORDS)
        .or_else(|| first_run_matching(&candidates, &YEAR_WORDS))
        .or_else(|| title_from_path(source))
        .unwrap_or_else(|| GENERIC_TITLE.to_string());

    TrainingHeading { title, subtitle }
}

/// Shortest contiguous run of candidates, earliest start first, whose
/// space-joined text matches `pattern`.
fn first_run_matching(candidates: &[&str], pattern: &Regex) -> Option<String> {
    (0..candidates.len()).find_map(|start| {
        (start + 1..=candidates.len())
            .map(|end| candidates[start..end].join(" "))
            .find(|joined| pattern.is_match(joined))
    })
}

/// Infer `<kind>训练` from a training kind named in the path.
fn title_from_path(source: &Path) -> Option<String> {
    let path = source.to_string_lossy();
    TRAINING_KINDS
        .iter()
        .find(|kind| path.contains(*kind))
        .map(|kind| format!("{kind}{GENERIC_TITLE}"))
}
