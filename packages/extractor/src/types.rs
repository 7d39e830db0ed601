//! Core data types for extracted lesson collections.
//!
//! A [`TrainingCollection`] owns its [`Chapter`]s, each chapter owns three
//! independent node trees (outline, detail and one per scheduled day) plus
//! its free-text fields. Trees are plain owned values; builders address
//! nodes by index path, never by shared reference.

use serde::{Deserialize, Serialize};

/// One paragraph delivered by a paragraph stream adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Style tag attached by the authoring tool, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Visible text of the paragraph.
    #[serde(default)]
    pub text: String,
}

impl Paragraph {
    /// Create an unstyled paragraph.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            style: None,
            text: text.into(),
        }
    }

    /// Create a paragraph carrying a style tag.
    pub fn styled(style: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            style: Some(style.into()),
            text: text.into(),
        }
    }
}

/// Heading depth of an outline point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Major point, numbered 壹 贰 叁 ...
    One,
    /// Sub point, numbered 一 二 三 ...
    Two,
    /// Minor point, numbered 1 2 3 ...
    Three,
    /// Leaf point, numbered a b c ...
    Four,
}

impl Level {
    /// All levels, outermost first.
    pub const ALL: [Level; 4] = [Level::One, Level::Two, Level::Three, Level::Four];

    /// One-based depth of this level.
    #[must_use]
    pub fn depth(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    /// Zero-based slot used by the level cursor.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.depth() - 1)
    }

    /// The enclosing level, `None` for level one.
    #[must_use]
    pub fn parent(self) -> Option<Level> {
        match self {
            Self::One => None,
            Self::Two => Some(Self::One),
            Self::Three => Some(Self::Two),
            Self::Four => Some(Self::Three),
        }
    }
}

/// A heading node in a lesson tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentNode {
    /// Heading depth, 1 to 4.
    pub depth: u8,

    /// Ordinal glyph or number taken from the heading marker.
    pub level: String,

    /// Heading text with the marker stripped.
    pub title: String,

    /// Scripture text attached under this heading, lines joined by `\n`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub citation: String,

    /// Body paragraphs, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<String>,

    /// Nested headings, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    /// Create a node without citation, body or children.
    pub fn new(level: Level, marker: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            depth: level.depth(),
            level: marker.into(),
            title: title.into(),
            citation: String::new(),
            body: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Append a scripture line, newline separated.
    pub fn append_citation(&mut self, text: &str) {
        append_line(&mut self.citation, text);
    }

    /// Append a body paragraph; blank text is ignored.
    pub fn add_body(&mut self, text: &str) {
        let text = text.trim();
        if !text.is_empty() {
            self.body.push(text.to_string());
        }
    }

    /// Key used to match nodes across trees: marker plus title with all
    /// ASCII and ideographic spaces removed.
    #[must_use]
    pub fn sync_key(&self) -> String {
        format!("{}{}", self.level, self.title)
            .chars()
            .filter(|c| *c != ' ' && *c != '\u{3000}')
            .collect()
    }

    /// Number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ContentNode::count).sum::<usize>()
    }
}

/// Append `text` to `target` as a new line.
pub(crate) fn append_line(target: &mut String, text: &str) {
    if !target.is_empty() {
        target.push('\n');
    }
    target.push_str(text);
}

/// One day of a chapter's daily schedule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Day header text as it appears in the schedule document.
    pub label: String,

    /// Week ordinal from the schedule document.
    pub week: u32,

    /// Day of week, 1 (Monday) to 7.
    pub day: u32,

    /// Outline headings for this day.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outline: Vec<ContentNode>,

    /// Scripture paragraphs leading the morning feeding.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feeding_verses: Vec<String>,

    /// Morning feeding paragraphs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feeding_text: Vec<String>,

    /// Ministry reading paragraphs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reading_text: Vec<String>,
}

impl DaySchedule {
    pub fn new(label: impl Into<String>, week: u32, day: u32) -> Self {
        Self {
            label: label.into(),
            week,
            day,
            ..Self::default()
        }
    }
}

/// One lesson of a training.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Chapter {
    /// Lesson number, parsed from the chapter title marker.
    pub number: u32,

    /// Lesson title without the chapter marker.
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hymn_reference: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scripture_reference: String,

    /// Scripture lines that precede the first outline heading.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scripture_text: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ministry_excerpt: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outline_tree: Vec<ContentNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detail_tree: Vec<ContentNode>,

    /// Body text appearing before any heading.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub message_text: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<DaySchedule>,
}

impl Chapter {
    pub fn new(number: u32, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            ..Self::default()
        }
    }
}

/// A full training: one batch of lessons with shared metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrainingCollection {
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subtitle: String,

    pub year: i32,

    pub season: String,

    pub chapters: Vec<Chapter>,

    /// Recovered structural anomalies, in the order they were met.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl TrainingCollection {
    /// Find a chapter by lesson number.
    pub fn chapter_mut(&mut self, number: u32) -> Option<&mut Chapter> {
        self.chapters.iter_mut().find(|c| c.number == number)
    }

    /// Record a recovered anomaly.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(warning = %message, "Recovered structural anomaly");
        self.warnings.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_level_parent_chain() {
        assert_eq!(Level::Four.parent(), Some(Level::Three));
        assert_eq!(Level::Two.parent(), Some(Level::One));
        assert_eq!(Level::One.parent(), None);
        assert_eq!(Level::Three.index(), 2);
    }

    #[test]
    fn test_sync_key_strips_spaces() {
        let node = ContentNode::new(Level::One, "壹", "基督 是\u{3000}生命");
        assert_eq!(node.sync_key(), "壹基督是生命");
    }

    #[test]
    fn test_append_citation_joins_lines() {
        let mut node = ContentNode::new(Level::Two, "一", "标题");
        node.append_citation("腓2:5\t你们里面要思念这在基督耶稣里所思念的");
        node.append_citation("腓2:6\t他本有神的形状");
        assert_eq!(node.citation.lines().count(), 2);
        assert!(node.citation.starts_with("腓2:5"));
    }

    #[test]
    fn test_add_body_ignores_blank() {
        let mut node = ContentNode::new(Level::Three, "1", "标题");
        node.add_body("  ");
        node.add_body(" 正文。 ");
        assert_eq!(node.body, vec!["正文。".to_string()]);
    }

    #[test]
    fn test_count_includes_descendants() {
        let mut root = ContentNode::new(Level::One, "壹", "a");
        let mut child = ContentNode::new(Level::Two, "一", "b");
        child.children.push(ContentNode::new(Level::Three, "1", "c"));
        root.children.push(child);
        assert_eq!(root.count(), 3);
    }

    #[test]
    fn test_chapter_serializes_without_empty_fields() {
        let chapter = Chapter::new(1, "测试篇");
        let json = serde_json::to_value(&chapter).unwrap();
        assert_eq!(json["number"], 1);
        assert!(json.get("outline_tree").is_none());
        assert!(json.get("hymn_reference").is_none());
    }
}
