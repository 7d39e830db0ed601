//! Ordinal parsing for chapter, week and day markers.

use std::sync::LazyLock;

use regex::Regex;

/// Chapter marker: `第<n>篇` with an ideographic or decimal ordinal.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CHAPTER_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"第([零〇一二两三四五六七八九十百]+|\d+)篇").expect("valid regex")
});

fn digit_value(c: char) -> Option<u32> {
    let value = match c {
        '零' | '〇' => 0,
        '一' => 1,
        '二' | '两' => 2,
        '三' => 3,
        '四' => 4,
        '五' => 5,
        '六' => 6,
        '七' => 7,
        '八' => 8,
        '九' => 9,
        _ => return None,
    };
    Some(value)
}

/// Convert an ideographic numeral up to the hundreds into a number.
///
/// A bare `十` counts as ten, so `十二` is 12 and `二十` is 20.
///
/// # Returns
/// `None` for empty input, unknown glyphs, or a zero result.
///
/// # Examples
/// ```
/// use tehui_extractor::numerals::parse_cjk_number;
///
/// assert_eq!(parse_cjk_number("十"), Some(10));
/// assert_eq!(parse_cjk_number("三十一"), Some(31));
/// assert_eq!(parse_cjk_number("一百零五"), Some(105));
/// assert_eq!(parse_cjk_number("甲"), None);
/// ```
#[must_use]
pub fn parse_cjk_number(text: &str) -> Option<u32> {
    let mut total = 0u32;
    let mut current = 0u32;

    for c in text.chars() {
        match c {
            '十' => {
                total += current.max(1) * 10;
                current = 0;
            }
            '百' => {
                total += current.max(1) * 100;
                current = 0;
            }
            _ => current = digit_value(c)?,
        }
    }

    let value = total + current;
    (value > 0).then_some(value)
}

/// Parse an ordinal written either in decimal digits or ideographs.
#[must_use]
pub fn parse_ordinal(text: &str) -> Option<u32> {
    let text = text.trim();
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        return text.parse().ok().filter(|n| *n > 0);
    }
    parse_cjk_number(text)
}

/// Extract the lesson number from a chapter title line.
///
/// # Examples
/// ```
/// use tehui_extractor::numerals::chapter_number;
///
/// assert_eq!(chapter_number("第十二篇 基督的身体"), Some(12));
/// assert_eq!(chapter_number("第3篇"), Some(3));
/// assert_eq!(chapter_number("没有篇题"), None);
/// ```
#[must_use]
pub fn chapter_number(text: &str) -> Option<u32> {
    CHAPTER_NUMBER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_ordinal(m.as_str()))
}

/// Day of week for the glyph following `周`: Monday is 1, Sunday is 7.
#[must_use]
pub fn day_of_week(glyph: char) -> Option<u32> {
    match glyph {
        '日' | '天' | '七' => Some(7),
        _ => digit_value(glyph).filter(|d| (1..=6).contains(d)),
    }
}
