//! Copying outline citations into the other views of a chapter.
//!
//! Citations are captured once, while the outline tree is built. The
//! transcript tree and every day outline carry the same headings, so their
//! nodes pick up the citation of the outline node with the same key.

use std::collections::HashMap;

use crate::types::{Chapter, ContentNode};

/// Map of node key to citation text.
pub type CitationMap = HashMap<String, String>;

/// Collect the non-empty citations of a tree, keyed by [`ContentNode::sync_key`].
#[must_use]
pub fn citation_map(tree: &[ContentNode]) -> CitationMap {
    let mut map = CitationMap::new();
    collect(tree, &mut map);
    map
}

fn collect(nodes: &[ContentNode], map: &mut CitationMap) {
    for node in nodes {
        if !node.citation.is_empty() {
            map.insert(node.sync_key(), node.citation.clone());
        }
        collect(&node.children, map);
    }
}

/// Fill empty citations of `nodes` from `map`; existing citations are kept.
///
/// # Returns
/// Number of nodes filled.
pub fn fill_citations(nodes: &mut [ContentNode], map: &CitationMap) -> usize {
    let mut filled = 0;
    for node in nodes {
        if node.citation.is_empty() {
            if let Some(citation) = map.get(&node.sync_key()) {
                node.citation = citation.clone();
                filled += 1;
            }
        }
        filled += fill_citations(&mut node.children, map);
    }
    filled
}

/// Synchronize one chapter's citations from its outline tree.
pub fn synchronize_scripture(chapter: &mut Chapter) -> usize {
    let map = citation_map(&chapter.outline_tree);
    if map.is_empty() {
        return 0;
    }

    let mut filled = fill_citations(&mut chapter.detail_tree, &map);
    for day in &mut chapter.schedule {
        filled += fill_citations(&mut day.outline, &map);
    }
    tracing::debug!(chapter = chapter.number, filled, "Citations synchronized");
    filled
}
