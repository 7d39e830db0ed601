//! Detail pass: full transcript headings and body under existing chapters.

use super::cursor::{LevelCursor, Placement};
use crate::citation::CitationCache;
use crate::classify::{Classifier, Role};
use crate::types::{Chapter, ContentNode, Paragraph, TrainingCollection};

/// Fills `detail_tree` and `message_text` of the chapters created by the
/// outline pass.
///
/// A chapter title selects the chapter with the same number. Transcript
/// chapters with no outline counterpart are appended as new chapters and
/// recorded as a warning.
pub struct DetailPass<'a> {
    classifier: &'a Classifier,
    cache: &'a mut CitationCache,
}

impl<'a> DetailPass<'a> {
    pub fn new(classifier: &'a Classifier, cache: &'a mut CitationCache) -> Self {
        Self { classifier, cache }
    }

    /// Run the pass over a paragraph stream.
    pub fn run(&mut self, paragraphs: &[Paragraph], collection: &mut TrainingCollection) {
        let mut current: Option<usize> = None;
        let mut cursor = LevelCursor::new();
        let mut nodes = 0usize;

        for paragraph in paragraphs {
            let text = paragraph.text.trim();
            let role = self.classifier.classify(paragraph).role;

            if let Role::ChapterTitle { number, title } = role {
                current = Some(select_chapter(number.unwrap_or(1), &title, collection));
                cursor.reset();
                continue;
            }

            let Some(index) = current else {
                continue;
            };

            match role {
                Role::Unknown => {}
                Role::Heading { level, marker, title } => {
                    let chapter = &mut collection.chapters[index];
                    let node = ContentNode::new(level, marker, title);
                    if cursor.open(&mut chapter.detail_tree, level, node) == Placement::Orphan {
                        let message = format!(
                            "chapter {} transcript: level {} heading '{}' has no parent",
                            chapter.number,
                            level.depth(),
                            text
                        );
                        collection.warn(message);
                    }
                    nodes += 1;
                }
                Role::Citation => {
                    if let Some(verses) = self.cache.absorb(text) {
                        let chapter = &mut collection.chapters[index];
                        match cursor.deepest_mut(&mut chapter.detail_tree) {
                            Some(node) => node.append_citation(&verses),
                            None => chapter.message_text.push(verses),
                        }
                    }
                }
                _ => {
                    let chapter = &mut collection.chapters[index];
                    match cursor.deepest_mut(&mut chapter.detail_tree) {
                        Some(node) => node.add_body(text),
                        None => chapter.message_text.push(text.to_string()),
                    }
                }
            }
        }

        tracing::info!(nodes, "Detail pass complete");
    }
}

/// Index of the chapter numbered `number`, creating it if the outline had none.
fn select_chapter(number: u32, title: &str, collection: &mut TrainingCollection) -> usize {
    if let Some(index) = collection.chapters.iter().position(|c| c.number == number) {
        return index;
    }
    collection.warn(format!(
        "transcript chapter {number} has no outline counterpart"
    ));
    collection.chapters.push(Chapter::new(number, title));
    collection.chapters.len() - 1
}
