//! Outline pass: chapters, outline trees and chapter metadata.

use std::sync::LazyLock;

use regex::Regex;

use super::cursor::{LevelCursor, Placement};
use crate::citation::CitationCache;
use crate::classify::{Classifier, Role, SectionKind};
use crate::text::{ends_sentence, is_valid_excerpt_line};
use crate::types::{append_line, Chapter, ContentNode, Paragraph, TrainingCollection};

/// Hymn reference embedded in a chapter title: `EM 诗歌：s250, s432`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TITLE_HYMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(EM|RK)\s*诗歌[：:]\s*([^，。]*)").expect("valid regex")
});

/// Where the pass is in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Cover and heading region before the first lesson.
    Front,
    /// Table of contents; chapter lines here are entries, not lessons.
    Contents,
    Lessons,
}

/// State of the lesson being built.
struct Lesson {
    /// Index into the collection's chapters.
    chapter: usize,
    cursor: LevelCursor,
    /// Body lines may still extend the chapter title.
    title_open: bool,
    /// Collected excerpt lines, once the excerpt section has started.
    excerpt: Option<Vec<String>>,
}

impl Lesson {
    fn new(chapter: usize) -> Self {
        Self {
            chapter,
            cursor: LevelCursor::new(),
            title_open: true,
            excerpt: None,
        }
    }
}

/// Builds chapters and their outline trees from the outline document.
///
/// Chapters are appended to the collection in document order. Citations
/// are cached as they are met so that later passes can expand omitted
/// ranges.
pub struct OutlinePass<'a> {
    classifier: &'a Classifier,
    cache: &'a mut CitationCache,
}

impl<'a> OutlinePass<'a> {
    pub fn new(classifier: &'a Classifier, cache: &'a mut CitationCache) -> Self {
        Self { classifier, cache }
    }

    /// Run the pass over a paragraph stream.
    ///
    /// # Returns
    /// Number of chapters added.
    pub fn run(&mut self, paragraphs: &[Paragraph], collection: &mut TrainingCollection) -> usize {
        let before = collection.chapters.len();
        let mut phase = Phase::Front;
        let mut lesson: Option<Lesson> = None;

        for paragraph in paragraphs {
            let text = paragraph.text.trim();
            let role = self.classifier.classify(paragraph).role;

            match role {
                Role::Unknown => continue,
                Role::Section(SectionKind::TableOfContents) if lesson.is_none() => {
                    phase = Phase::Contents;
                    continue;
                }
                Role::ChapterTitle { number, title } => {
                    if phase == Phase::Contents && !title.is_empty() {
                        continue;
                    }
                    phase = Phase::Lessons;
                    if let Some(done) = lesson.take() {
                        finish_lesson(done, collection);
                    }
                    lesson = Some(open_chapter(number, &title, text, collection));
                    continue;
                }
                _ => {}
            }

            let Some(current) = lesson.as_mut() else {
                continue;
            };
            self.handle(role, text, current, collection);
        }

        if let Some(done) = lesson.take() {
            finish_lesson(done, collection);
        }

        let added = collection.chapters.len() - before;
        tracing::info!(chapters = added, cached_verses = self.cache.len(), "Outline pass complete");
        added
    }

    fn handle(&mut self, role: Role, text: &str, lesson: &mut Lesson, collection: &mut TrainingCollection) {
        if role != Role::Body {
            lesson.title_open = false;
        }

        if role == Role::Citation {
            if let Some(verses) = self.cache.absorb(text) {
                let chapter = &mut collection.chapters[lesson.chapter];
                match lesson.cursor.deepest_mut(&mut chapter.outline_tree) {
                    Some(node) => node.append_citation(&verses),
                    None => append_line(&mut chapter.scripture_text, &verses),
                }
            }
            return;
        }

        if let Some(excerpt) = lesson.excerpt.as_mut() {
            if is_valid_excerpt_line(text) {
                excerpt.push(text.to_string());
            }
            return;
        }

        let chapter = &mut collection.chapters[lesson.chapter];
        match role {
            Role::Heading { level, marker, title } => {
                let node = ContentNode::new(level, marker, title);
                if lesson.cursor.open(&mut chapter.outline_tree, level, node) == Placement::Orphan {
                    let message = format!(
                        "chapter {}: level {} heading '{}' has no parent",
                        chapter.number,
                        level.depth(),
                        text
                    );
                    collection.warn(message);
                }
            }
            Role::Section(SectionKind::ScriptureReading) => {
                chapter.scripture_reference = strip_label(text, "读经").to_string();
            }
            Role::Section(SectionKind::HymnReference) => {
                append_spaced(&mut chapter.hymn_reference, text);
            }
            Role::Section(SectionKind::MinistryExcerpt) => {
                let rest = strip_label(text, "职事信息摘录");
                let mut lines = Vec::new();
                if is_valid_excerpt_line(rest) {
                    lines.push(rest.to_string());
                }
                lesson.excerpt = Some(lines);
            }
            _ => {
                if lesson.title_open && !lesson.cursor.is_active() && !ends_sentence(text) {
                    extend_title(chapter, text);
                    return;
                }
                lesson.title_open = false;
                match lesson.cursor.deepest_mut(&mut chapter.outline_tree) {
                    Some(node) => node.add_body(text),
                    None => chapter.message_text.push(text.to_string()),
                }
            }
        }
    }
}

/// Create a chapter for a title line and return its lesson state.
fn open_chapter(
    number: Option<u32>,
    title: &str,
    line: &str,
    collection: &mut TrainingCollection,
) -> Lesson {
    let number = number.unwrap_or_else(|| {
        collection.warn(format!("chapter title '{line}' has no readable number, using 1"));
        1
    });
    if collection.chapters.iter().any(|c| c.number == number) {
        collection.warn(format!("chapter number {number} appears more than once"));
    }

    let mut chapter = Chapter::new(number, "");
    extend_title(&mut chapter, title);
    tracing::debug!(chapter = number, title = %chapter.title, "Opened chapter");

    collection.chapters.push(chapter);
    Lesson::new(collection.chapters.len() - 1)
}

fn finish_lesson(lesson: Lesson, collection: &mut TrainingCollection) {
    if let Some(lines) = lesson.excerpt.filter(|lines| !lines.is_empty()) {
        collection.chapters[lesson.chapter].ministry_excerpt = lines.join("\n\n");
    }
}

/// Append a title fragment, moving an embedded hymn reference out of it.
fn extend_title(chapter: &mut Chapter, fragment: &str) {
    let mut fragment = fragment.trim().to_string();
    if let Some(caps) = TITLE_HYMN.captures(&fragment) {
        let book = caps.get(1).map_or("", |m| m.as_str());
        let numbers = caps.get(2).map_or("", |m| m.as_str()).trim();
        append_spaced(&mut chapter.hymn_reference, &format!("{book} 诗歌: {numbers}"));
        let cleaned = TITLE_HYMN.replace(&fragment, "").trim().to_string();
        fragment = cleaned;
    }
    chapter.title.push_str(&fragment);
}

fn append_spaced(target: &mut String, text: &str) {
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text.trim());
}

/// Strip a `label：` prefix (full- or half-width colon).
fn strip_label<'t>(text: &'t str, label: &str) -> &'t str {
    text.strip_prefix(label)
        .map(|rest| rest.trim_start_matches(['：', ':']))
        .unwrap_or(text)
        .trim()
}
