//! Turning a week's outline lines into per-day outline trees.

use std::collections::BTreeMap;

use crate::classify::{Classifier, Role};
use crate::text::char_len;
use crate::tree::LevelCursor;
use crate::types::{ContentNode, DaySchedule};

/// Outline lines collected per day number for one week.
pub type DayOutlines = BTreeMap<u32, Vec<String>>;

/// Build a node tree from outline lines.
///
/// Headings nest by level; other lines become body text of the deepest
/// open heading. Text before the first heading and lines shorter than two
/// characters are dropped.
#[must_use]
pub fn parse_outline_lines(lines: &[String], classifier: &Classifier) -> Vec<ContentNode> {
    let mut roots = Vec::new();
    let mut cursor = LevelCursor::new();

    for line in lines {
        let text = line.trim();
        if char_len(text) < 2 {
            continue;
        }

        match classifier.classify_text(text) {
            Role::Heading { level, marker, title } => {
                cursor.open(&mut roots, level, ContentNode::new(level, marker, title));
            }
            Role::Citation => {
                if let Some(node) = cursor.deepest_mut(&mut roots) {
                    node.append_citation(text);
                }
            }
            _ => match cursor.deepest_mut(&mut roots) {
                Some(node) => node.add_body(text),
                None => tracing::debug!(line = %text, "Outline text before first heading dropped"),
            },
        }
    }

    roots
}

/// Fill in days that have no outline of their own.
///
/// Days before the earliest day with an outline take that outline; any
/// later gap inherits the outline of the closest earlier day.
pub fn backfill(outlines: &mut DayOutlines, days: impl IntoIterator<Item = u32>) {
    let Some(mut last) = outlines.values().next().cloned() else {
        return;
    };

    // Outlined days without a header still count as the closest earlier day.
    let mut days: Vec<u32> = days.into_iter().chain(outlines.keys().copied()).collect();
    days.sort_unstable();
    days.dedup();

    for day in days {
        match outlines.get(&day) {
            Some(lines) => last = lines.clone(),
            None => {
                outlines.insert(day, last.clone());
            }
        }
    }
}

/// Give each day schedule its outline tree.
pub fn assign_outlines(days: &mut [DaySchedule], outlines: &DayOutlines, classifier: &Classifier) {
    let mut filled = outlines.clone();
    backfill(&mut filled, days.iter().map(|d| d.day));

    for day in days.iter_mut() {
        match filled.get(&day.day) {
            Some(lines) => day.outline = parse_outline_lines(lines, classifier),
            None => tracing::debug!(day = day.day, label = %day.label, "No outline for day"),
        }
    }
}
