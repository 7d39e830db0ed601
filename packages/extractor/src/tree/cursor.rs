//! Per-level insertion cursor over an owned node tree.
//!
//! The cursor remembers, for each of the four heading levels, the index
//! path of the most recently opened node at that level. Nodes are reached
//! by walking the path from the tree roots, so the tree itself stays a
//! plain `Vec<ContentNode>` owned by its chapter or day.

use crate::types::{ContentNode, Level};

/// Where a newly opened node ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Child of the active node one level up.
    Nested,
    /// Level-one node at the top of the tree.
    TopLevel,
    /// Deeper node with no active parent, appended at the top.
    Orphan,
}

/// Active node per heading level.
#[derive(Debug, Clone, Default)]
pub struct LevelCursor {
    slots: [Option<Vec<usize>>; 4],
}

fn node_at_mut<'a>(roots: &'a mut [ContentNode], path: &[usize]) -> Option<&'a mut ContentNode> {
    let (first, rest) = path.split_first()?;
    let mut node = roots.get_mut(*first)?;
    for index in rest {
        node = node.children.get_mut(*index)?;
    }
    Some(node)
}

impl LevelCursor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all active nodes.
    pub fn reset(&mut self) {
        self.slots = Default::default();
    }

    /// Whether any level has an active node.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }

    /// Insert `node` at `level` and make it the active node there.
    ///
    /// The node becomes a child of the active node one level up; without
    /// one it is appended to `roots`. Deeper levels are cleared.
    pub fn open(&mut self, roots: &mut Vec<ContentNode>, level: Level, node: ContentNode) -> Placement {
        let parent_path = level
            .parent()
            .and_then(|parent| self.slots[parent.index()].clone());

        if let Some(mut path) = parent_path {
            if let Some(parent) = node_at_mut(roots, &path) {
                parent.children.push(node);
                path.push(parent.children.len() - 1);
                self.activate(level, path);
                return Placement::Nested;
            }
        }

        roots.push(node);
        self.activate(level, vec![roots.len() - 1]);
        if level == Level::One {
            Placement::TopLevel
        } else {
            Placement::Orphan
        }
    }

    fn activate(&mut self, level: Level, path: Vec<usize>) {
        self.slots[level.index()] = Some(path);
        for slot in &mut self.slots[level.index() + 1..] {
            *slot = None;
        }
    }

    /// The deepest active node.
    pub fn deepest_mut<'a>(&self, roots: &'a mut [ContentNode]) -> Option<&'a mut ContentNode> {
        let path = self.slots.iter().rev().find_map(Option::as_ref)?;
        node_at_mut(roots, path)
    }

    /// The active node at `level`.
    pub fn active_mut<'a>(&self, roots: &'a mut [ContentNode], level: Level) -> Option<&'a mut ContentNode> {
        let path = self.slots[level.index()].as_ref()?;
        node_at_mut(roots, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node(level: Level, marker: &str) -> ContentNode {
        ContentNode::new(level, marker, format!("t{marker}"))
    }

    #[test]
    fn test_nested_levels() {
        let mut roots = Vec::new();
        let mut cursor = LevelCursor::new();

        assert_eq!(cursor.open(&mut roots, Level::One, node(Level::One, "壹")), Placement::TopLevel);
        assert_eq!(cursor.open(&mut roots, Level::Two, node(Level::Two, "一")), Placement::Nested);
        assert_eq!(cursor.open(&mut roots, Level::Three, node(Level::Three, "1")), Placement::Nested);
        assert_eq!(cursor.open(&mut roots, Level::Four, node(Level::Four, "a")), Placement::Nested);

        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].children[0].children[0].children[0].level, "a");
    }

    #[test]
    fn test_opening_clears_deeper_levels() {
        let mut roots = Vec::new();
        let mut cursor = LevelCursor::new();

        cursor.open(&mut roots, Level::One, node(Level::One, "壹"));
        cursor.open(&mut roots, Level::Two, node(Level::Two, "一"));
        cursor.open(&mut roots, Level::Three, node(Level::Three, "1"));
        cursor.open(&mut roots, Level::Two, node(Level::Two, "二"));

        // Level three was cleared, so a level-four node has no parent.
        assert_eq!(cursor.open(&mut roots, Level::Four, node(Level::Four, "a")), Placement::Orphan);
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].children.len(), 2);
    }

    #[test]
    fn test_orphan_goes_top_level() {
        let mut roots = Vec::new();
        let mut cursor = LevelCursor::new();

        assert_eq!(cursor.open(&mut roots, Level::Two, node(Level::Two, "一")), Placement::Orphan);
        assert_eq!(cursor.open(&mut roots, Level::Three, node(Level::Three, "1")), Placement::Nested);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].children[0].level, "1");
    }

    #[test]
    fn test_deepest_and_active() {
        let mut roots = Vec::new();
        let mut cursor = LevelCursor::new();
        assert!(cursor.deepest_mut(&mut roots).is_none());

        cursor.open(&mut roots, Level::One, node(Level::One, "壹"));
        cursor.open(&mut roots, Level::Two, node(Level::Two, "一"));
        cursor.deepest_mut(&mut roots).unwrap().add_body("正文");
        cursor.active_mut(&mut roots, Level::One).unwrap().add_body("要点正文");

        assert_eq!(roots[0].body, vec!["要点正文".to_string()]);
        assert_eq!(roots[0].children[0].body, vec!["正文".to_string()]);
    }

    #[test]
    fn test_reset() {
        let mut roots = Vec::new();
        let mut cursor = LevelCursor::new();
        cursor.open(&mut roots, Level::One, node(Level::One, "壹"));
        assert!(cursor.is_active());
        cursor.reset();
        assert!(!cursor.is_active());
    }
}
