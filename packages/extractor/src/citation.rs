//! Scripture citation lines, verse cache and range resolution.
//!
//! Lesson documents quote a verse in full the first time it appears and
//! later refer back to it with an abbreviated range line marked `从略`
//! ("omitted"). The [`CitationCache`] remembers every full verse seen during
//! a run so that omitted ranges can be expanded again.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::numerals::parse_ordinal;

/// One- or two-glyph abbreviations of the scripture books.
const BOOK_GLYPHS: &str = "创出利民申书士得撒王代拉尼斯伯诗箴传歌赛耶哀结但何珥摩俄拿弥鸿哈番该亚玛太可路约徒罗林加弗腓西帖提门多彼犹启";

/// Token marking a range whose text was left out.
pub const OMITTED_MARKER: &str = "从略";

/// Book, decimal chapter, verse; the book may carry a part suffix (`林前`).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static REFERENCE_DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^([{BOOK_GLYPHS}][前后上下一二三]?)(\d+)[:：](\d+)"
    ))
    .expect("valid regex")
});

/// Book, ideographic chapter, verse.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static REFERENCE_IDEOGRAPHIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^([{BOOK_GLYPHS}])([一二三四五六七八九十百]+)[:：](\d+)"
    ))
    .expect("valid regex")
});

/// Range tail after the first verse: separator and end verse.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static RANGE_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[~～\-－—](\d+)").expect("valid regex"));

/// Cache key of a single verse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerseKey {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

impl VerseKey {
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self {
            book: book.into(),
            chapter,
            verse,
        }
    }
}

/// A recognized citation line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitationLine {
    /// A full verse: reference, whitespace, verse text.
    Verse { key: VerseKey, text: String },

    /// A verse range, possibly marked as omitted.
    Range {
        book: String,
        chapter: u32,
        start: u32,
        end: u32,
        omitted: bool,
    },
}

/// Split a leading verse reference off `text`.
fn parse_reference(text: &str) -> Option<(VerseKey, &str)> {
    let caps = REFERENCE_DECIMAL
        .captures(text)
        .or_else(|| REFERENCE_IDEOGRAPHIC.captures(text))?;

    let book = caps.get(1)?.as_str();
    let chapter = parse_ordinal(caps.get(2)?.as_str())?;
    let verse = caps.get(3)?.as_str().parse().ok()?;
    let rest = &text[caps.get(0)?.end()..];

    Some((VerseKey::new(book, chapter, verse), rest))
}

/// Parse a citation line.
///
/// # Examples
/// ```
/// use tehui_extractor::citation::{parse_citation, CitationLine, VerseKey};
///
/// let line = parse_citation("腓2:5\t你们里面要思念").unwrap();
/// assert_eq!(
///     line,
///     CitationLine::Verse {
///         key: VerseKey::new("腓", 2, 5),
///         text: "你们里面要思念".to_string(),
///     }
/// );
///
/// let range = parse_citation("腓2:5~6 从略。").unwrap();
/// assert!(matches!(range, CitationLine::Range { start: 5, end: 6, omitted: true, .. }));
///
/// assert!(parse_citation("这是正文。").is_none());
/// ```
#[must_use]
pub fn parse_citation(text: &str) -> Option<CitationLine> {
    let text = text.trim();
    let (key, rest) = parse_reference(text)?;

    if let Some(caps) = RANGE_TAIL.captures(rest) {
        let end = caps.get(1)?.as_str().parse().ok()?;
        return Some(CitationLine::Range {
            book: key.book,
            chapter: key.chapter,
            start: key.verse,
            end,
            omitted: rest.contains(OMITTED_MARKER),
        });
    }

    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let verse_text = rest.trim();
    if verse_text.is_empty() {
        return None;
    }

    Some(CitationLine::Verse {
        key,
        text: verse_text.to_string(),
    })
}

/// Whether the text is a single-verse or range citation line.
#[must_use]
pub fn is_citation_line(text: &str) -> bool {
    parse_citation(text).is_some()
}

/// Verse texts seen so far in one extraction run.
#[derive(Debug, Default, Clone)]
pub struct CitationCache {
    verses: HashMap<VerseKey, String>,
}

impl CitationCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a full verse line. Later lines for the same verse replace
    /// earlier ones.
    ///
    /// # Returns
    /// `true` if the line was a full verse and was cached.
    pub fn record(&mut self, line: &str) -> bool {
        match parse_citation(line) {
            Some(CitationLine::Verse { key, text }) => {
                self.verses.insert(key, text);
                true
            }
            _ => false,
        }
    }

    /// Look up one verse.
    #[must_use]
    pub fn get(&self, key: &VerseKey) -> Option<&str> {
        self.verses.get(key).map(String::as_str)
    }

    /// Concatenate the cached verses `start..=end` of a chapter, newline
    /// separated, in verse order. Verses never seen are skipped.
    ///
    /// # Returns
    /// `None` when no verse of the range is cached.
    #[must_use]
    pub fn resolve(&self, book: &str, chapter: u32, start: u32, end: u32) -> Option<String> {
        let mut found: Vec<(u32, &str)> = self
            .verses
            .iter()
            .filter(|(key, _)| {
                key.book == book && key.chapter == chapter && (start..=end).contains(&key.verse)
            })
            .map(|(key, text)| (key.verse, text.as_str()))
            .collect();
        found.sort_unstable_by_key(|(verse, _)| *verse);

        (!found.is_empty()).then(|| {
            found
                .into_iter()
                .map(|(_, text)| text)
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    /// Handle a line classified as a citation.
    ///
    /// Omitted ranges are replaced by their cached verses and full verses
    /// are cached. Every other non-empty line, including verse lines whose
    /// reference cannot be parsed, passes through unchanged.
    ///
    /// # Returns
    /// The text to attach, or `None` for a blank line or an omitted range
    /// with nothing cached.
    pub fn absorb(&mut self, line: &str) -> Option<String> {
        let line = line.trim();
        let Some(parsed) = parse_citation(line) else {
            return (!line.is_empty()).then(|| line.to_string());
        };
        match parsed {
            CitationLine::Range {
                book,
                chapter,
                start,
                end,
                omitted: true,
            } => {
                let resolved = self.resolve(&book, chapter, start, end);
                if resolved.is_none() {
                    tracing::debug!(
                        book = %book,
                        chapter,
                        start,
                        end,
                        "Omitted range has no cached verses"
                    );
                }
                resolved
            }
            CitationLine::Verse { key, text } => {
                self.verses.insert(key, text);
                Some(line.to_string())
            }
            CitationLine::Range { .. } => Some(line.to_string()),
        }
    }

    /// Number of cached verses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.verses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_two_glyph_book() {
        let line = parse_citation("林前1:9 神是信实的").unwrap();
        assert_eq!(
            line,
            CitationLine::Verse {
                key: VerseKey::new("林前", 1, 9),
                text: "神是信实的".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_ideographic_chapter() {
        let line = parse_citation("腓二:5\u{3000}你们里面").unwrap();
        assert!(matches!(
            line,
            CitationLine::Verse { key, .. } if key == VerseKey::new("腓", 2, 5)
        ));
    }

    #[test]
    fn test_parse_requires_whitespace_and_text() {
        assert!(parse_citation("腓2:5").is_none());
        assert!(parse_citation("腓2:5你们").is_none());
        assert!(parse_citation("读2:5 不是书卷").is_none());
    }

    #[test]
    fn test_parse_range_not_omitted() {
        let line = parse_citation("约3:16～17 神爱世人").unwrap();
        assert_eq!(
            line,
            CitationLine::Range {
                book: "约".to_string(),
                chapter: 3,
                start: 16,
                end: 17,
                omitted: false,
            }
        );
    }

    #[test]
    fn test_resolve_range_in_order() {
        let mut cache = CitationCache::new();
        assert!(cache.record("腓2:5\tA"));
        assert!(cache.record("腓2:6\tB"));

        assert_eq!(cache.resolve("腓", 2, 5, 6), Some("A\nB".to_string()));
    }

    #[test]
    fn test_resolve_skips_missing_verses() {
        let mut cache = CitationCache::new();
        cache.record("腓2:5\tA");
        cache.record("腓2:7\tC");

        assert_eq!(cache.resolve("腓", 2, 5, 7), Some("A\nC".to_string()));
        assert_eq!(cache.resolve("腓", 3, 1, 2), None);
    }

    #[test]
    fn test_resolve_reversed_range_is_empty() {
        let mut cache = CitationCache::new();
        cache.record("腓2:5\tA");
        assert_eq!(cache.resolve("腓", 2, 6, 5), None);
    }

    #[test]
    fn test_record_last_write_wins() {
        let mut cache = CitationCache::new();
        cache.record("约1:1\t旧");
        cache.record("约1:1\t新");
        assert_eq!(cache.get(&VerseKey::new("约", 1, 1)), Some("新"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_absorb_never_caches_omitted_line() {
        let mut cache = CitationCache::new();
        assert_eq!(cache.absorb("腓2:5~6 从略。"), None);
        assert!(cache.is_empty());

        cache.absorb("腓2:5\tA");
        assert_eq!(cache.absorb("腓2:5~6 从略。"), Some("A".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_absorb_keeps_unparsed_verse_lines() {
        let mut cache = CitationCache::new();
        assert_eq!(
            cache.absorb("太五3\t清心的人有福了"),
            Some("太五3\t清心的人有福了".to_string())
        );
        assert_eq!(
            cache.absorb("因为他们必得见神。"),
            Some("因为他们必得见神。".to_string())
        );
        assert_eq!(cache.absorb("  "), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_resolve_huge_range_uses_cached_verses() {
        let mut cache = CitationCache::new();
        cache.record("腓2:3\tC");
        cache.record("腓2:1\tA");
        cache.record("腓3:1\tX");

        assert_eq!(cache.resolve("腓", 2, 1, 4_000_000_000), Some("A\nC".to_string()));
        assert_eq!(
            cache.absorb("腓2:1~4000000000 从略"),
            Some("A\nC".to_string())
        );
    }

    #[test]
    fn test_absorb_returns_full_line_verbatim() {
        let mut cache = CitationCache::new();
        assert_eq!(
            cache.absorb("  腓2:5\tA "),
            Some("腓2:5\tA".to_string())
        );
    }
}
