//! Separating the verses that open a morning feeding from its prose.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::FEEDING_VERSE_MAX_CHARS;
use crate::text::char_len;

/// Book, chapter, verse or verse range: `路十一11~13 ...`, `林后十三14 ...`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static FULL_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[创出利民申书士得撒王代拉尼斯伯诗箴传歌赛耶哀结但何珥摩俄拿弥鸿哈番该亚玛太可路约徒罗林加弗腓西帖提多门彼犹启壹贰叁前后来]{1,2}[一二三四五六七八九十\d]+[:：]?\d+(?:[~～\-]\d+)?[\s\u{3000}]+",
    )
    .expect("valid regex")
});

/// Chapter and verse with the book left out: `二1 ...`, `十三14 ...`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SHORT_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[一二三四五六七八九十\d]+[:：]?\d+(?:[~～\-]\d+)?[\s\u{3000}]+")
        .expect("valid regex")
});

/// Verse number only: `5 ...`, `13~15 ...`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static VERSE_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:[~～\-]\d+)?[\s\u{3000}]+").expect("valid regex"));

/// Places where an over-long verse paragraph turns into prose.
const PROSE_MARKERS: [&str; 6] = ["……但", "……然而", "……可是", "……这", "……那", "耶稣生在"];

fn is_verse_paragraph(text: &str) -> bool {
    FULL_REFERENCE.is_match(text) || SHORT_REFERENCE.is_match(text) || VERSE_ONLY.is_match(text)
}

/// Split feeding paragraphs into leading verses and the remaining prose.
///
/// Verses are the paragraphs before the first one that does not start with
/// a reference. A verse paragraph longer than the feeding verse limit is cut
/// at the first prose marker, the tail starting the prose.
///
/// # Examples
/// ```
/// use tehui_extractor::schedule::split_feeding_verses;
///
/// let paragraphs = vec![
///     "弗三17　使基督借着信，安家在你们心里。".to_string(),
///     "19　并认识基督那超越知识的爱。".to_string(),
///     "基督安家在我们心里。".to_string(),
/// ];
/// let (verses, prose) = split_feeding_verses(paragraphs);
/// assert_eq!(verses.len(), 2);
/// assert_eq!(prose, vec!["基督安家在我们心里。".to_string()]);
/// ```
#[must_use]
pub fn split_feeding_verses(paragraphs: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut verses = Vec::new();
    let mut rest = paragraphs.into_iter();

    while let Some(paragraph) = rest.next() {
        if !is_verse_paragraph(&paragraph) {
            let prose = std::iter::once(paragraph).chain(rest).collect();
            return (verses, prose);
        }

        if char_len(&paragraph) > FEEDING_VERSE_MAX_CHARS {
            let cut = PROSE_MARKERS
                .iter()
                .filter_map(|marker| paragraph.find(marker))
                .find(|pos| *pos > 0);
            if let Some(pos) = cut {
                let (verse, prose_head) = paragraph.split_at(pos);
                verses.push(verse.trim().to_string());
                let prose = std::iter::once(prose_head.trim().to_string())
                    .chain(rest)
                    .collect();
                return (verses, prose);
            }
        }
        verses.push(paragraph);
    }

    (verses, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reference_shapes() {
        assert!(is_verse_paragraph("路十一11~13 你们虽然不好"));
        assert!(is_verse_paragraph("约壹一6\u{3000}我们若说"));
        assert!(is_verse_paragraph("十三14 愿主耶稣基督的恩"));
        assert!(is_verse_paragraph("5 你们里面要思念"));
        assert!(!is_verse_paragraph("基督是我们的生命。"));
    }

    #[test]
    fn test_no_verses() {
        let (verses, prose) = split_feeding_verses(strings(&["正文一。", "正文二。"]));
        assert!(verses.is_empty());
        assert_eq!(prose.len(), 2);
    }

    #[test]
    fn test_all_verses() {
        let (verses, prose) = split_feeding_verses(strings(&["腓二5 你们", "6 他本有"]));
        assert_eq!(verses.len(), 2);
        assert!(prose.is_empty());
    }

    #[test]
    fn test_prose_after_first_non_verse_is_kept_whole() {
        let (verses, prose) =
            split_feeding_verses(strings(&["腓二5 你们", "正文。", "7 看似经节的正文"]));
        assert_eq!(verses, strings(&["腓二5 你们"]));
        assert_eq!(prose, strings(&["正文。", "7 看似经节的正文"]));
    }

    #[test]
    fn test_long_verse_is_cut_at_marker() {
        let long = format!("路二11 {}……但这是正文", "经".repeat(FEEDING_VERSE_MAX_CHARS));
        let (verses, prose) = split_feeding_verses(vec![long, "后续。".to_string()]);

        assert_eq!(verses.len(), 1);
        assert!(verses[0].ends_with('经'));
        assert_eq!(prose, strings(&["……但这是正文", "后续。"]));
    }
}
