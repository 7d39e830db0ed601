//! Classifier that combines the style registry with the text rules.

use super::config::create_style_registry;
use super::core::StyleRegistry;
use super::rules::{self, parse_heading, text_rules};
use super::types::{Classification, Role, SectionKind, StyleClass};
use crate::types::Paragraph;

/// Assigns a [`Role`] to each paragraph.
///
/// Pure function of its inputs: the same paragraph always yields the same
/// classification.
pub struct Classifier {
    registry: StyleRegistry,
}

impl Classifier {
    /// Create a classifier with the given style registry.
    #[must_use]
    pub fn new(registry: StyleRegistry) -> Self {
        Self { registry }
    }

    /// Get a reference to the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    /// Classify one paragraph.
    ///
    /// # Arguments
    /// * `paragraph` - Style tag and text as delivered by the adapter
    ///
    /// # Returns
    /// The role plus whether it was decided by the style table.
    ///
    /// # Examples
    /// ```
    /// use tehui_extractor::classify::{Classifier, Role};
    /// use tehui_extractor::types::Paragraph;
    ///
    /// let classifier = Classifier::default();
    /// let result = classifier.classify(&Paragraph::plain("这是正文。"));
    /// assert_eq!(result.role, Role::Body);
    /// assert!(!result.from_style);
    /// ```
    #[must_use]
    pub fn classify(&self, paragraph: &Paragraph) -> Classification {
        let text = paragraph.text.trim();
        if text.is_empty() {
            return Classification {
                role: Role::Unknown,
                from_style: false,
            };
        }

        if let Some(class) = paragraph
            .style
            .as_deref()
            .and_then(|style| self.registry.lookup(style))
        {
            return Classification {
                role: resolve_style(class, text),
                from_style: true,
            };
        }

        let role = text_rules()
            .iter()
            .find_map(|rule| (rule.apply)(text))
            .unwrap_or(Role::Body);

        Classification {
            role,
            from_style: false,
        }
    }

    /// Classify by text rules only, ignoring any style tag.
    #[must_use]
    pub fn classify_text(&self, text: &str) -> Role {
        self.classify(&Paragraph::plain(text)).role
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(create_style_registry())
    }
}

/// Complete a style-table role family with details from the text.
fn resolve_style(class: StyleClass, text: &str) -> Role {
    match class {
        StyleClass::ChapterTitle => rules::chapter_title(text).unwrap_or(Role::ChapterTitle {
            number: None,
            title: text.to_string(),
        }),
        StyleClass::Heading(level) => parse_heading(level, text),
        StyleClass::Body => Role::Body,
        StyleClass::Citation => Role::Citation,
        StyleClass::DayMarker => Role::Section(SectionKind::DayMarker {
            days: rules::day_numbers(text),
        }),
        StyleClass::ReferenceReading => Role::Section(SectionKind::ReferenceReading),
        StyleClass::PageRepeat => Role::Section(SectionKind::PageRepeat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Level;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_style_takes_precedence() {
        let classifier = Classifier::default();
        // Text would be a level-two heading, style says body.
        let result = classifier.classify(&Paragraph::styled("8888文章正文", "一 不是标题"));
        assert_eq!(result.role, Role::Body);
        assert!(result.from_style);
    }

    #[test]
    fn test_unknown_style_falls_back_to_text() {
        let classifier = Classifier::default();
        let result = classifier.classify(&Paragraph::styled("Normal", "壹 第一要点"));
        assert_eq!(
            result.role,
            Role::Heading {
                level: Level::One,
                marker: "壹".to_string(),
                title: "第一要点".to_string()
            }
        );
        assert!(!result.from_style);
    }

    #[test]
    fn test_styled_chapter_title_without_marker() {
        let classifier = Classifier::default();
        let result = classifier.classify(&Paragraph::styled("０ａ總題", "神的经纶"));
        assert_eq!(
            result.role,
            Role::ChapterTitle {
                number: None,
                title: "神的经纶".to_string()
            }
        );
    }

    #[test]
    fn test_styled_day_marker() {
        let classifier = Classifier::default();
        let result = classifier.classify(&Paragraph::styled("周期", "周四、周五"));
        assert_eq!(
            result.role,
            Role::Section(SectionKind::DayMarker { days: vec![4, 5] })
        );
    }

    #[test]
    fn test_empty_is_unknown() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify_text("  \u{3000}"), Role::Unknown);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = Classifier::default();
        let paragraph = Paragraph::plain("腓2:5\t你们里面要思念");
        assert_eq!(classifier.classify(&paragraph), classifier.classify(&paragraph));
        assert_eq!(classifier.classify(&paragraph).role, Role::Citation);
    }

    #[test]
    fn test_verse_style() {
        let classifier = Classifier::default();
        let result = classifier.classify(&Paragraph::styled("verses", "腓2:5~6 从略。"));
        assert_eq!(result.role, Role::Citation);
    }
}
