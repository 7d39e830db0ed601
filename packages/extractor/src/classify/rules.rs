//! Ordered text-pattern rules for paragraphs without a known style.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::types::{Role, SectionKind};
use crate::citation::is_citation_line;
use crate::numerals::{chapter_number, day_of_week, parse_ordinal};
use crate::types::Level;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CHAPTER_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^第(?:[零〇一二两三四五六七八九十百]+|\d+)篇[\s:：]*(.*)$").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LEVEL_ONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([壹贰叁肆伍陆柒捌玖拾]+)[、\s]+(.*)$").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LEVEL_TWO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([一二三四五六七八九十百]+)[、\s]+(.*)$").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LEVEL_THREE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)[、\s]+(.*)$").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LEVEL_FOUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z])[、\s]+(.*)$").expect("valid regex"));

/// `第<n>周 • <rest>`: captures the week ordinal and the rest.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static WEEK_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^第([一二三四五六七八九十百]+|\d+)周[\s\u{3000}]*[•·・][\s\u{3000}]*(.*)$")
        .expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static WEEK_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^周[\s\u{3000}]*([一二三四五六七日天])").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DAY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^周[\s\u{3000}]*[一二三四五六日天]").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DAY_GLYPHS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"周[\s\u{3000}]*([一二三四五六日天])").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static STRAY_DAY_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^第.+周\s*[•·・]\s*周[一二三四五六七日]$").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TABLE_OF_CONTENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^目\s*录$").expect("valid regex"));

/// Line prefixes of the hymnals referenced in lesson headers.
const HYMNAL_PREFIXES: [&str; 7] = ["MC ", "JL ", "SC ", "RM ", "NL/", "HL ", "RA "];

/// A named text rule: returns a role if the trimmed paragraph text matches.
pub struct TextRule {
    pub name: &'static str,
    pub apply: fn(&str) -> Option<Role>,
}

static TEXT_RULES: [TextRule; 13] = [
    TextRule {
        name: "chapter_title",
        apply: chapter_title,
    },
    TextRule {
        name: "level1",
        apply: |text| heading_with(Level::One, text),
    },
    TextRule {
        name: "level2",
        apply: |text| heading_with(Level::Two, text),
    },
    TextRule {
        name: "level3",
        apply: |text| heading_with(Level::Three, text),
    },
    TextRule {
        name: "level4",
        apply: |text| heading_with(Level::Four, text),
    },
    TextRule {
        name: "citation",
        apply: |text| is_citation_line(text).then_some(Role::Citation),
    },
    TextRule {
        name: "week_section",
        apply: week_section,
    },
    TextRule {
        name: "day_marker",
        apply: day_marker,
    },
    TextRule {
        name: "feeding",
        apply: |text| prefixed(text, "晨兴喂养", SectionKind::Feeding),
    },
    TextRule {
        name: "reading",
        apply: |text| prefixed(text, "信息选读", SectionKind::Reading),
    },
    TextRule {
        name: "ministry_excerpt",
        apply: |text| prefixed(text, "职事信息摘录", SectionKind::MinistryExcerpt),
    },
    TextRule {
        name: "scripture_reading",
        apply: scripture_reading,
    },
    TextRule {
        name: "hymn_or_contents",
        apply: hymn_or_contents,
    },
];

/// The text rules in evaluation order.
#[must_use]
pub fn text_rules() -> &'static [TextRule] {
    &TEXT_RULES
}

fn level_pattern(level: Level) -> &'static Regex {
    match level {
        Level::One => &LEVEL_ONE,
        Level::Two => &LEVEL_TWO,
        Level::Three => &LEVEL_THREE,
        Level::Four => &LEVEL_FOUR,
    }
}

fn heading_from(level: Level, caps: &Captures<'_>) -> Role {
    let group = |i| caps.get(i).map_or("", |m| m.as_str());
    Role::Heading {
        level,
        marker: group(1).to_string(),
        title: group(2).trim().to_string(),
    }
}

fn heading_with(level: Level, text: &str) -> Option<Role> {
    level_pattern(level)
        .captures(text)
        .map(|caps| heading_from(level, &caps))
}

/// Build a heading role for a paragraph already known to be at `level`.
///
/// The level's own marker pattern is tried first, then the others, so a
/// styled heading keeps its ordinal even when the glyph family differs.
/// Without any marker the whole text becomes the title.
#[must_use]
pub fn parse_heading(level: Level, text: &str) -> Role {
    let text = text.trim();
    std::iter::once(level)
        .chain(Level::ALL.into_iter().filter(|l| *l != level))
        .find_map(|candidate| {
            level_pattern(candidate)
                .captures(text)
                .map(|caps| heading_from(level, &caps))
        })
        .unwrap_or_else(|| Role::Heading {
            level,
            marker: String::new(),
            title: text.to_string(),
        })
}

pub(super) fn chapter_title(text: &str) -> Option<Role> {
    let caps = CHAPTER_TITLE.captures(text)?;
    Some(Role::ChapterTitle {
        number: chapter_number(text),
        title: caps.get(1).map_or("", |m| m.as_str()).trim().to_string(),
    })
}

fn week_section(text: &str) -> Option<Role> {
    let caps = WEEK_SECTION.captures(text)?;
    let week = caps.get(1).and_then(|m| parse_ordinal(m.as_str()))?;
    let rest = caps.get(2).map_or("", |m| m.as_str()).trim();

    let kind = if rest.starts_with("纲目") {
        SectionKind::WeekOutline { week }
    } else if rest.starts_with("诗歌") {
        SectionKind::WeekHymn { week }
    } else if rest.starts_with("申言") {
        SectionKind::Proclamation { week }
    } else {
        let day = WEEK_DAY
            .captures(rest)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().chars().next())
            .and_then(day_of_week)?;
        SectionKind::DayHeader { week, day }
    };
    Some(Role::Section(kind))
}

/// Day numbers named by a day marker, e.g. `周二、周三` gives `[2, 3]`.
pub(super) fn day_numbers(text: &str) -> Vec<u32> {
    DAY_GLYPHS
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().chars().next())
        .filter_map(day_of_week)
        .collect()
}

fn day_marker(text: &str) -> Option<Role> {
    if !DAY_MARKER.is_match(text) {
        return None;
    }
    Some(Role::Section(SectionKind::DayMarker {
        days: day_numbers(text),
    }))
}

fn prefixed(text: &str, prefix: &str, kind: SectionKind) -> Option<Role> {
    text.starts_with(prefix).then_some(Role::Section(kind))
}

fn scripture_reading(text: &str) -> Option<Role> {
    (text.starts_with("读经：") || text.starts_with("读经:"))
        .then_some(Role::Section(SectionKind::ScriptureReading))
}

fn hymn_or_contents(text: &str) -> Option<Role> {
    if TABLE_OF_CONTENTS.is_match(text) {
        return Some(Role::Section(SectionKind::TableOfContents));
    }
    let is_hymn = text.contains("诗歌：")
        || HYMNAL_PREFIXES.iter().any(|p| text.starts_with(p));
    is_hymn.then_some(Role::Section(SectionKind::HymnReference))
}

/// Whether a line is a bare day header such as `第二周 • 周三`.
///
/// Used to keep day headers that slipped past classification out of
/// feeding and reading text.
#[must_use]
pub fn looks_like_day_header(text: &str) -> bool {
    STRAY_DAY_HEADER.is_match(text.trim())
}
