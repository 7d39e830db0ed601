//! Types produced by the marker classifier.

use crate::types::Level;

/// Named section boundaries recognized in lesson and schedule documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    /// Table of contents heading (`目录`).
    TableOfContents,

    /// Week outline opener: `第一周 • 纲目`.
    WeekOutline { week: u32 },

    /// Week hymn section: `第一周 • 诗歌`.
    WeekHymn { week: u32 },

    /// Week proclamation section: `第一周 • 申言`. Its content is skipped.
    Proclamation { week: u32 },

    /// Day header: `第一周 • 周一`.
    DayHeader { week: u32, day: u32 },

    /// Day marker inside a week outline: `周一`, or `周二、周三` for shared days.
    DayMarker { days: Vec<u32> },

    /// Morning feeding section (`晨兴喂养`).
    Feeding,

    /// Ministry reading section (`信息选读`).
    Reading,

    /// Further-reading footer that closes feeding and reading.
    ReferenceReading,

    /// Running page header repeated on continuation pages.
    PageRepeat,

    /// Ministry excerpt section (`职事信息摘录`).
    MinistryExcerpt,

    /// Scripture reading line (`读经：...`).
    ScriptureReading,

    /// Hymn reference line (`诗歌：...`, or a hymnal prefix such as `JL `).
    HymnReference,
}

/// Structural role of one paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// Lesson title line: `第一篇 ...`.
    ChapterTitle {
        /// Lesson number, `None` when the marker carries no readable ordinal.
        number: Option<u32>,
        /// Title text with the chapter marker stripped.
        title: String,
    },

    /// Outline heading at one of four levels.
    Heading {
        level: Level,
        /// Ordinal glyph or number, empty if the style alone marked the level.
        marker: String,
        /// Heading text with the marker stripped.
        title: String,
    },

    Body,

    /// Scripture citation line, single verse or verse range.
    Citation,

    Section(SectionKind),

    /// Empty paragraph.
    Unknown,
}

impl Role {
    /// Short label for diagnostics.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::ChapterTitle { .. } => "chapter_title".to_string(),
            Self::Heading { level, .. } => format!("level{}", level.depth()),
            Self::Body => "body".to_string(),
            Self::Citation => "citation".to_string(),
            Self::Section(kind) => format!("section:{kind:?}"),
            Self::Unknown => "unknown".to_string(),
        }
    }
}

/// Role family a style tag maps to. The concrete [`Role`] is completed
/// from the paragraph text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleClass {
    ChapterTitle,
    Heading(Level),
    Body,
    Citation,
    DayMarker,
    ReferenceReading,
    PageRepeat,
}

/// Result of classifying one paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub role: Role,

    /// Whether the role came from the style table rather than text rules.
    pub from_style: bool,
}
